//! Settings schema.
//!
//! [`AnsibleLsSettings`] is the raw, partially specified layer read from TOML
//! files or LSP payloads; every field is optional so layers can be merged.
//! [`WorkspaceSettings`] is the fully resolved view handed to requests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsibleSection {
    pub use_fully_qualified_collection_names: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSection {
    pub provide_redirect_modules: Option<bool>,
    pub provide_module_option_aliases: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsSection {
    /// Directories holding `ansible.builtin` module sources.
    pub module_paths: Option<Vec<PathBuf>>,
    /// Roots containing an `ansible_collections/` directory.
    pub collections_paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySection {
    /// JSON produced by `ansible-inventory --list`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsibleLsSettings {
    pub ansible: Option<AnsibleSection>,
    pub completion: Option<CompletionSection>,
    pub docs: Option<DocsSection>,
    pub inventory: Option<InventorySection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsibleSettings {
    pub use_fully_qualified_collection_names: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub provide_redirect_modules: bool,
    pub provide_module_option_aliases: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsSettings {
    pub module_paths: Vec<PathBuf>,
    pub collections_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySettings {
    pub path: Option<PathBuf>,
}

/// Resolved settings, read once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    pub ansible: AnsibleSettings,
    pub completion: CompletionSettings,
    pub docs: DocsSettings,
    pub inventory: InventorySettings,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            ansible: AnsibleSettings {
                use_fully_qualified_collection_names: true,
            },
            completion: CompletionSettings {
                provide_redirect_modules: true,
                provide_module_option_aliases: true,
            },
            docs: DocsSettings::default(),
            inventory: InventorySettings::default(),
        }
    }
}
