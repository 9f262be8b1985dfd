//! User configuration loading for ansible-ls.
//!
//! This module handles loading user-wide configuration from the XDG config directory.
//! User config location: $XDG_CONFIG_HOME/ansible-ls/ansible-ls.toml
//! Fallback: ~/.config/ansible-ls/ansible-ls.toml

use std::path::PathBuf;

use thiserror::Error;

use super::settings::AnsibleLsSettings;

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type UserConfigResult<T> = Result<T, UserConfigError>;

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/ansible-ls/ansible-ls.toml
/// 2. Otherwise: ~/.config/ansible-ls/ansible-ls.toml
///
/// Returns None if the home directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::home_dir()?.join(".config"),
    };
    Some(base.join("ansible-ls").join("ansible-ls.toml"))
}

/// Loads the user configuration. A missing file is not an error.
pub fn load_user_config() -> UserConfigResult<Option<AnsibleLsSettings>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| UserConfigError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| UserConfigError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn with_xdg_config_home<R>(value: &std::path::Path, f: impl FnOnce() -> R) -> R {
        let original = env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: serialized through #[serial(xdg_env)]
        unsafe {
            env::set_var("XDG_CONFIG_HOME", value);
        }
        let result = f();
        // SAFETY: Same as above - restoring original env state
        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_path_uses_xdg_config_home_when_set() {
        let path = with_xdg_config_home(std::path::Path::new("/custom/config"), user_config_path);

        assert_eq!(
            path,
            Some(PathBuf::from("/custom/config/ansible-ls/ansible-ls.toml")),
            "should use XDG_CONFIG_HOME/ansible-ls/ansible-ls.toml"
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn missing_user_config_is_not_an_error() {
        let dir = TempDir::new().expect("failed to create temp dir");

        let loaded = with_xdg_config_home(dir.path(), load_user_config);

        assert!(matches!(loaded, Ok(None)));
    }

    #[test]
    #[serial(xdg_env)]
    fn loads_camel_case_toml() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config_dir = dir.path().join("ansible-ls");
        std::fs::create_dir_all(&config_dir).expect("failed to create config dir");
        std::fs::write(
            config_dir.join("ansible-ls.toml"),
            "[completion]\nprovideRedirectModules = false\n",
        )
        .expect("failed to write config");

        let loaded = with_xdg_config_home(dir.path(), load_user_config)
            .expect("config should parse")
            .expect("config should exist");

        assert_eq!(
            loaded.completion.and_then(|c| c.provide_redirect_modules),
            Some(false)
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn invalid_toml_reports_parse_error() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config_dir = dir.path().join("ansible-ls");
        std::fs::create_dir_all(&config_dir).expect("failed to create config dir");
        std::fs::write(config_dir.join("ansible-ls.toml"), "completion = [").expect("write");

        let loaded = with_xdg_config_home(dir.path(), load_user_config);

        assert!(matches!(loaded, Err(UserConfigError::Parse { .. })));
    }
}
