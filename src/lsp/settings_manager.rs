//! Workspace settings, client capabilities and root path of one session.
//!
//! Settings live in an `ArcSwap` so every request can take a cheap snapshot
//! that stays consistent while the request runs, even if the client pushes a
//! new configuration meanwhile.

use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tower_lsp_server::ls_types::ClientCapabilities;

use crate::config::WorkspaceSettings;

pub(crate) struct SettingsManager {
    root_path: ArcSwap<Option<PathBuf>>,
    settings: ArcSwap<WorkspaceSettings>,
    /// Set once by `initialize()`.
    client_capabilities: OnceLock<ClientCapabilities>,
}

impl std::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("root_path", &"ArcSwap<Option<PathBuf>>")
            .field("settings", &"ArcSwap<WorkspaceSettings>")
            .field("client_capabilities", &"OnceLock<ClientCapabilities>")
            .finish()
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    pub(crate) fn new() -> Self {
        Self {
            root_path: ArcSwap::new(Arc::new(None)),
            settings: ArcSwap::new(Arc::new(WorkspaceSettings::default())),
            client_capabilities: OnceLock::new(),
        }
    }

    /// Later calls are ignored; `initialize()` happens once per session.
    pub(crate) fn set_capabilities(&self, caps: ClientCapabilities) {
        let _ = self.client_capabilities.set(caps);
    }

    pub(crate) fn client_capabilities_lock(&self) -> &OnceLock<ClientCapabilities> {
        &self.client_capabilities
    }

    pub(crate) fn set_root_path(&self, path: Option<PathBuf>) {
        self.root_path.store(Arc::new(path));
    }

    pub(crate) fn root_path(&self) -> Arc<Option<PathBuf>> {
        self.root_path.load_full()
    }

    pub(crate) fn load_settings(&self) -> Arc<WorkspaceSettings> {
        self.settings.load_full()
    }

    /// Stores `settings` and returns what was active before.
    pub(crate) fn apply_settings(&self, settings: WorkspaceSettings) -> Arc<WorkspaceSettings> {
        self.settings.swap(Arc::new(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_survive_updates() {
        let manager = SettingsManager::new();
        let snapshot = manager.load_settings();

        let mut updated = WorkspaceSettings::default();
        updated.ansible.use_fully_qualified_collection_names = false;
        let previous = manager.apply_settings(updated.clone());

        assert_eq!(*snapshot, WorkspaceSettings::default());
        assert_eq!(*previous, WorkspaceSettings::default());
        assert_eq!(*manager.load_settings(), updated);
    }

    #[test]
    fn test_capabilities_are_set_once() {
        let manager = SettingsManager::new();
        assert!(manager.client_capabilities_lock().get().is_none());

        manager.set_capabilities(ClientCapabilities::default());
        manager.set_capabilities(ClientCapabilities {
            experimental: Some(serde_json::json!({ "second": true })),
            ..Default::default()
        });

        assert_eq!(
            manager.client_capabilities_lock().get(),
            Some(&ClientCapabilities::default())
        );
    }

    #[test]
    fn test_root_path_round_trip() {
        let manager = SettingsManager::new();
        assert!(manager.root_path().is_none());

        manager.set_root_path(Some(PathBuf::from("/workspace")));

        assert_eq!(*manager.root_path(), Some(PathBuf::from("/workspace")));
    }
}
