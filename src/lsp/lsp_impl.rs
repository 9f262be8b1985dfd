use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;
use tower_lsp_server::{Client, LanguageServer};
use url::Url;

use super::client::ClientNotifier;
use super::documents::DocumentStore;
use super::protocol::{apply_resolved, candidate_from_item, to_completion_item, to_hover, uri_to_url};
use super::settings::{SettingsLoadOutcome, SettingsSource, load_settings};
use super::settings_manager::SettingsManager;
use crate::completion::{complete, resolve};
use crate::config::WorkspaceSettings;
use crate::context::AnalysisContext;
use crate::docs::DocsLibrary;
use crate::hover::hover_info;
use crate::services::{InventoryLibrary, MetadataLibrary, ScopedVariables};
use crate::text::PositionMapper;

pub struct AnsibleLs {
    client: Client,
    settings_manager: SettingsManager,
    documents: DocumentStore,
    docs: Arc<DocsLibrary>,
    metadata: Arc<MetadataLibrary>,
    inventory: Arc<InventoryLibrary>,
    variables: Arc<ScopedVariables>,
}

impl std::fmt::Debug for AnsibleLs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsibleLs")
            .field("client", &self.client)
            .field("settings_manager", &self.settings_manager)
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

impl AnsibleLs {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            settings_manager: SettingsManager::new(),
            documents: DocumentStore::new(),
            docs: Arc::new(DocsLibrary::new()),
            metadata: Arc::new(MetadataLibrary::new()),
            inventory: Arc::new(InventoryLibrary::new()),
            variables: Arc::new(ScopedVariables::new()),
        }
    }

    fn notifier(&self) -> ClientNotifier<'_> {
        ClientNotifier::new(
            self.client.clone(),
            self.settings_manager.client_capabilities_lock(),
        )
    }

    /// Collaborators plus a settings snapshot for one request.
    fn context(&self, cancel: CancellationToken) -> AnalysisContext {
        AnalysisContext::new(self.docs.clone(), self.settings_manager.load_settings())
            .with_metadata(self.metadata.clone())
            .with_inventory(self.inventory.clone())
            .with_variables(self.variables.clone())
            .with_cancellation(cancel)
    }

    /// Stores freshly loaded settings; returns the previous ones when the
    /// load produced anything.
    async fn apply_outcome(&self, outcome: SettingsLoadOutcome) -> Option<Arc<WorkspaceSettings>> {
        self.notifier().log_settings_events(&outcome.events).await;
        let settings = outcome.settings?;
        Some(self.settings_manager.apply_settings(settings))
    }

    async fn reindex_docs(&self) {
        let settings = self.settings_manager.load_settings();
        match self.docs.reindex(&settings.docs).await {
            Ok(count) => {
                self.notifier()
                    .log_info(format!("Indexed {} module documentation files", count))
                    .await;
            }
            Err(err) => {
                log::error!(target: "ansible_ls::docs", "Docs indexing failed: {}", err);
                self.notifier()
                    .log_warning(format!("Failed to index module documentation: {}", err))
                    .await;
            }
        }
    }

    async fn reload_inventory(&self) {
        let settings = self.settings_manager.load_settings();
        if let Err(err) = self.inventory.reload(&settings.inventory).await {
            log::warn!(target: "ansible_ls::inventory", "Inventory reload failed: {}", err);
            self.notifier()
                .log_warning(format!("Failed to load inventory: {}", err))
                .await;
        }
    }

    fn document_url(&self, uri: &Uri) -> Option<Url> {
        uri_to_url(uri)
            .inspect_err(|err| {
                log::warn!(target: "ansible_ls::lsp", "Ignoring document: {}", err);
            })
            .ok()
    }
}

/// Workspace root from workspace folders, the deprecated root URI, or the
/// current directory.
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let from_uri = |uri: &Uri| uri_to_url(uri).ok()?.to_file_path().ok();
    if let Some(folders) = &params.workspace_folders {
        return folders.first().and_then(|folder| from_uri(&folder.uri));
    }
    if let Some(root_uri) = &params.root_uri {
        return from_uri(root_uri);
    }
    std::env::current_dir().ok()
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
            open_close: Some(true),
            change: Some(TextDocumentSyncKind::INCREMENTAL),
            save: Some(TextDocumentSyncSaveOptions::Supported(true)),
            ..Default::default()
        })),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..Default::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        ..Default::default()
    }
}

impl LanguageServer for AnsibleLs {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.settings_manager.set_capabilities(params.capabilities.clone());

        let root_path = workspace_root(&params);
        match &root_path {
            Some(path) => {
                self.notifier()
                    .log_info(format!("Using workspace root: {}", path.display()))
                    .await;
            }
            None => {
                self.notifier()
                    .log_warning("Failed to determine workspace root - project config will not be loaded")
                    .await;
            }
        }
        self.settings_manager.set_root_path(root_path.clone());

        let override_settings = params
            .initialization_options
            .map(|value| (SettingsSource::InitializationOptions, value));
        let outcome = load_settings(root_path.as_deref(), override_settings);
        self.apply_outcome(outcome).await;

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "ansible-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.reindex_docs().await;
        self.reload_inventory().await;
        self.notifier().log_info("ansible-ls initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let Some(uri) = self.document_url(&params.text_document.uri) else {
            return;
        };
        log::debug!(target: "ansible_ls::lsp", "Opened {}", uri);
        self.documents
            .open(uri, params.text_document.text, params.text_document.version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some(uri) = self.document_url(&params.text_document.uri) else {
            return;
        };
        if let Err(err) = self.documents.apply_changes(
            &uri,
            params.text_document.version,
            params.content_changes,
        ) {
            log::warn!(target: "ansible_ls::lsp", "Dropping change: {}", err);
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let Some(path) = self
            .document_url(&params.text_document.uri)
            .and_then(|uri| uri.to_file_path().ok())
        else {
            return;
        };
        // Role metadata may have changed the collections in scope
        if path.ends_with("meta/main.yml") {
            log::debug!(target: "ansible_ls::metadata", "Invalidating {}", path.display());
            self.metadata.invalidate(&path);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Some(uri) = self.document_url(&params.text_document.uri) {
            self.documents.close(&uri);
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let root_path = self.settings_manager.root_path();
        let outcome = load_settings(
            root_path.as_deref(),
            Some((SettingsSource::ClientConfiguration, params.settings)),
        );
        let Some(previous) = self.apply_outcome(outcome).await else {
            return;
        };
        let current = self.settings_manager.load_settings();
        if previous.docs != current.docs {
            self.reindex_docs().await;
        }
        if previous.inventory != current.inventory {
            self.reload_inventory().await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let Some(uri) = self.document_url(&params.text_document_position.text_document.uri) else {
            return Ok(None);
        };
        let Some(document) = self.documents.snapshot(&uri) else {
            log::debug!(target: "ansible_ls::lsp", "Completion for unknown document {}", uri);
            return Ok(None);
        };
        let mapper = PositionMapper::new(&document.text);
        let Some(offset) = mapper.position_to_byte(position) else {
            return Ok(None);
        };

        let ctx = self.context(document.cancel.clone());
        let candidates = complete(&ctx, &uri, &document.text, offset).await;
        if ctx.is_cancelled() {
            return Ok(None);
        }

        let supports_snippets = self.notifier().supports_snippets();
        let items = candidates
            .into_iter()
            .map(|candidate| to_completion_item(candidate, &mapper, supports_snippets))
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        let candidate = candidate_from_item(&item);
        let Some(data) = &candidate.data else {
            return Ok(item);
        };
        let cancel = Url::parse(&data.document_uri)
            .ok()
            .and_then(|uri| self.documents.snapshot(&uri))
            .map(|document| document.cancel)
            .unwrap_or_default();

        let ctx = self.context(cancel);
        let resolved = resolve(&ctx, candidate).await;
        if ctx.is_cancelled() {
            return Ok(item);
        }
        Ok(apply_resolved(item, resolved, self.notifier().supports_snippets()))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params.position;
        let Some(uri) = self.document_url(&params.text_document_position_params.text_document.uri) else {
            return Ok(None);
        };
        let Some(document) = self.documents.snapshot(&uri) else {
            return Ok(None);
        };
        let mapper = PositionMapper::new(&document.text);
        let Some(offset) = mapper.position_to_byte(position) else {
            return Ok(None);
        };

        let ctx = self.context(document.cancel.clone());
        let info = hover_info(&ctx, &uri, &document.text, offset).await;
        Ok(info.map(|info| to_hover(info, &mapper)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(deprecated)]
    fn params_with(folders: Option<Vec<&str>>, root_uri: Option<&str>) -> InitializeParams {
        InitializeParams {
            workspace_folders: folders.map(|folders| {
                folders
                    .into_iter()
                    .map(|folder| WorkspaceFolder {
                        uri: folder.parse().unwrap(),
                        name: "root".into(),
                    })
                    .collect()
            }),
            root_uri: root_uri.map(|uri| uri.parse().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_workspace_folders_take_precedence() {
        let params = params_with(Some(vec!["file:///work/a", "file:///work/b"]), Some("file:///other"));
        assert_eq!(workspace_root(&params), Some(PathBuf::from("/work/a")));
    }

    #[test]
    fn test_root_uri_is_the_fallback() {
        let params = params_with(None, Some("file:///other"));
        assert_eq!(workspace_root(&params), Some(PathBuf::from("/other")));
    }

    #[test]
    fn test_capabilities_advertise_resolve_and_hover() {
        let caps = server_capabilities();
        assert_eq!(
            caps.completion_provider.and_then(|c| c.resolve_provider),
            Some(true)
        );
        assert_eq!(caps.hover_provider, Some(HoverProviderCapability::Simple(true)));
        assert!(matches!(
            caps.text_document_sync,
            Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                ..
            }))
        ));
    }
}
