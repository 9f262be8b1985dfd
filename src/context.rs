//! Collaborators and settings shared by one completion, resolve or hover
//! request.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::ansible::collections::declared_collections;
use crate::config::WorkspaceSettings;
use crate::docs::{DocsLibrary, DocsProvider, ModuleLookup, PluginRoute};
use crate::services::{
    InventoryLibrary, InventoryProvider, MetadataLibrary, MetadataProvider, RankedName,
    ScopedVariables, VariableProvider,
};
use crate::yaml::Path;

#[derive(Clone)]
pub struct AnalysisContext {
    pub docs: Arc<dyn DocsProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub inventory: Arc<dyn InventoryProvider>,
    pub variables: Arc<dyn VariableProvider>,
    /// Snapshot taken when the request started.
    pub settings: Arc<WorkspaceSettings>,
    /// Cancelled once the document changed after the request started.
    pub cancel: CancellationToken,
}

impl AnalysisContext {
    pub fn new(docs: Arc<dyn DocsProvider>, settings: Arc<WorkspaceSettings>) -> Self {
        Self {
            docs,
            metadata: Arc::new(MetadataLibrary::new()),
            inventory: Arc::new(InventoryLibrary::new()),
            variables: Arc::new(ScopedVariables::new()),
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Context backed by an empty docs library and default settings.
    pub fn empty() -> Self {
        Self::new(Arc::new(DocsLibrary::new()), Arc::new(WorkspaceSettings::default()))
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn InventoryProvider>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_variables(mut self, variables: Arc<dyn VariableProvider>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Collections from the document's role metadata. Failures count as none.
    pub async fn metadata_collections(&self, document: &Url) -> Vec<String> {
        match self.metadata.collections(document).await {
            Ok(collections) => collections,
            Err(err) => {
                log::warn!(target: "ansible_ls::metadata", "Failed to read metadata for {}: {}", document, err);
                Vec::new()
            }
        }
    }

    /// Looks a module up for the key at `module_path`, searching the
    /// metadata collections and then those declared in the playbook.
    /// Failures count as "not found".
    pub async fn find_module(&self, name: &str, module_path: &Path<'_>, document: &Url) -> ModuleLookup {
        let mut collections = self.metadata_collections(document).await;
        for collection in declared_collections(module_path) {
            if !collections.contains(&collection) {
                collections.push(collection);
            }
        }
        self.find_module_in(name, &collections, Some(document)).await
    }

    pub async fn find_module_in(&self, name: &str, collections: &[String], document: Option<&Url>) -> ModuleLookup {
        match self.docs.find_module(name, collections, document).await {
            Ok(lookup) => lookup,
            Err(err) => {
                log::warn!(target: "ansible_ls::docs", "Module lookup of {} failed: {}", name, err);
                ModuleLookup::default()
            }
        }
    }

    /// Runtime routing of `fqcn`. Failures count as "no route".
    pub async fn module_route(&self, fqcn: &str, document: Option<&Url>) -> Option<PluginRoute> {
        self.docs.module_route(fqcn, document).await.unwrap_or_else(|err| {
            log::warn!(target: "ansible_ls::docs", "Routing of {} unavailable: {}", fqcn, err);
            None
        })
    }

    pub async fn hosts(&self) -> Vec<RankedName> {
        self.inventory.hosts().await.unwrap_or_else(|err| {
            log::warn!(target: "ansible_ls::inventory", "Inventory unavailable: {}", err);
            Vec::new()
        })
    }

    pub async fn variables_in_scope(&self, document: &Url, path: &Path<'_>) -> Vec<RankedName> {
        self.variables
            .variables_in_scope(document, path)
            .await
            .unwrap_or_else(|err| {
                log::warn!(target: "ansible_ls::variables", "Variables unavailable: {}", err);
                Vec::new()
            })
    }
}
