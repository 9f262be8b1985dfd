//! Default configuration values for ansible-ls.
//!
//! These form the lowest settings layer, so every field is populated.

use super::settings::{
    AnsibleLsSettings, AnsibleSection, CompletionSection, DocsSection, InventorySection,
    WorkspaceSettings,
};

/// Returns the programmed defaults as a fully populated settings layer.
pub fn default_settings() -> AnsibleLsSettings {
    let defaults = WorkspaceSettings::default();
    AnsibleLsSettings {
        ansible: Some(AnsibleSection {
            use_fully_qualified_collection_names: Some(
                defaults.ansible.use_fully_qualified_collection_names,
            ),
        }),
        completion: Some(CompletionSection {
            provide_redirect_modules: Some(defaults.completion.provide_redirect_modules),
            provide_module_option_aliases: Some(
                defaults.completion.provide_module_option_aliases,
            ),
        }),
        docs: Some(DocsSection {
            module_paths: Some(Vec::new()),
            collections_paths: Some(Vec::new()),
        }),
        inventory: Some(InventorySection { path: None }),
    }
}
