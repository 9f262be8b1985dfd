//! Settings resolution across the configuration layers.

use crate::config::{
    AnsibleLsSettings, WorkspaceSettings, defaults::default_settings, load_user_config, merge_all,
};
use crate::error::{AnsibleLsError, AnsibleLsResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Name of the project configuration file at the workspace root.
pub const PROJECT_CONFIG_FILE: &str = "ansible-ls.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsSource {
    InitializationOptions,
    ClientConfiguration,
}

impl SettingsSource {
    fn description(self) -> &'static str {
        match self {
            SettingsSource::InitializationOptions => "initialization options",
            SettingsSource::ClientConfiguration => "client configuration",
        }
    }
}

#[derive(Default, Debug)]
pub struct SettingsLoadOutcome {
    pub settings: Option<WorkspaceSettings>,
    pub events: Vec<SettingsEvent>,
}

/// Resolves settings from all layers: defaults < user config < project
/// config < client payload. Layers that fail to load are skipped with a
/// warning event.
pub fn load_settings(
    root_path: Option<&Path>,
    override_settings: Option<(SettingsSource, Value)>,
) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let user = match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config from XDG_CONFIG_HOME"));
            Some(settings)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!("Ignoring user config: {err}")));
            None
        }
    };

    let project = root_path
        .map(|root| root.join(PROJECT_CONFIG_FILE))
        .filter(|path| path.is_file())
        .and_then(|path| match read_project_config(&path) {
            Ok(settings) => {
                events.push(SettingsEvent::info(format!(
                    "Loaded project config from {}",
                    path.display()
                )));
                Some(settings)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Ignoring {}: {err}",
                    path.display()
                )));
                None
            }
        });

    let client = override_settings
        .filter(|(_, value)| !value.is_null())
        .and_then(|(source, value)| {
            match serde_json::from_value::<AnsibleLsSettings>(value) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    events.push(SettingsEvent::warning(format!(
                        "Ignoring {}: {err}",
                        source.description()
                    )));
                    None
                }
            }
        });

    let merged = merge_all(&[Some(default_settings()), user, project, client]);
    SettingsLoadOutcome {
        settings: merged.map(WorkspaceSettings::from),
        events,
    }
}

fn read_project_config(path: &Path) -> AnsibleLsResult<AnsibleLsSettings> {
    let contents = fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|err| AnsibleLsError::config(err.to_string()))
}
