//! Error handling types for ansible-ls
//!
//! Errors never abort a completion or hover request: collaborators return
//! [`AnsibleLsResult`] and the request pipelines log failures and continue
//! with whatever data is left.

use std::sync::PoisonError;
use thiserror::Error;

/// Comprehensive error type for language server operations
#[derive(Debug, Error)]
pub enum AnsibleLsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML that could not be deserialized (module docs, runtime routing, metadata)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON that could not be deserialized (inventory, settings payloads)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A document URI that does not map to a local file
    #[error("Invalid URI: {uri}")]
    InvalidUri { uri: String },

    /// Document not found in store
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: String },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for language server operations
pub type AnsibleLsResult<T> = Result<T, AnsibleLsError>;

/// Helper trait to recover from poisoned std locks
pub trait LockResultExt<T> {
    /// Convert a PoisonError into the inner guard with logging.
    ///
    /// The context parameter identifies which operation triggered lock recovery.
    fn recover_poison(self, context: &str) -> AnsibleLsResult<T>;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> AnsibleLsResult<T> {
        match self {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!(
                    target: "ansible_ls::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl AnsibleLsError {
    pub fn config(message: impl Into<String>) -> Self {
        AnsibleLsError::Config {
            message: message.into(),
        }
    }

    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        AnsibleLsError::InvalidUri { uri: uri.into() }
    }

    pub fn document_not_found(uri: impl Into<String>) -> Self {
        AnsibleLsError::DocumentNotFound { uri: uri.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AnsibleLsError::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn recover_poison_returns_inner_guard() {
        let lock = Arc::new(Mutex::new(1));
        let poisoner = Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let guard = lock.lock().recover_poison("test").unwrap();
        assert_eq!(*guard, 1);
    }

    #[test]
    fn helpers_build_messages() {
        assert_eq!(
            AnsibleLsError::document_not_found("file:///a.yml").to_string(),
            "Document not found: file:///a.yml"
        );
        assert_eq!(
            AnsibleLsError::config("bad").to_string(),
            "Invalid configuration: bad"
        );
    }
}
