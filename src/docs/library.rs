//! Module documentation index and lookup.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use url::Url;

use super::module::{ModuleMetadata, PluginRoute};
use super::parser::parse_module_routing;
use crate::config::DocsSettings;
use crate::error::{AnsibleLsError, AnsibleLsResult, LockResultExt};

pub const BUILTIN_COLLECTION: &str = "ansible.builtin";

/// Result of a module lookup: the module, if documented, and the FQCN for
/// which either a module or a route was found.
#[derive(Debug, Clone, Default)]
pub struct ModuleLookup {
    pub module: Option<Arc<ModuleMetadata>>,
    pub fqcn: Option<String>,
}

/// Source of module documentation consumed by completion and hover.
#[async_trait]
pub trait DocsProvider: Send + Sync {
    /// Finds a module by short name or FQCN. `collections` lists the
    /// collections in scope for short names, in search order after
    /// `ansible.builtin`.
    async fn find_module(
        &self,
        name: &str,
        collections: &[String],
        document: Option<&Url>,
    ) -> AnsibleLsResult<ModuleLookup>;

    /// All module names known for a document, including redirects.
    async fn module_fqcns(&self, document: &Url) -> AnsibleLsResult<BTreeSet<String>>;

    /// Runtime routing of `fqcn`, preferring collections next to `document`.
    async fn module_route(&self, fqcn: &str, document: Option<&Url>) -> AnsibleLsResult<Option<PluginRoute>>;
}

/// FQCNs to try for `name`, in order.
pub fn candidate_fqcns(name: &str, collections: &[String]) -> Vec<String> {
    if name.split('.').count() >= 3 {
        return vec![name.to_string()];
    }
    std::iter::once(format!("{BUILTIN_COLLECTION}.{name}"))
        .chain(collections.iter().map(|c| format!("{c}.{name}")))
        .collect()
}

/// Indexed modules plus runtime routing, keyed by collection.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    modules: HashMap<String, Arc<ModuleMetadata>>,
    routing: HashMap<String, HashMap<String, PluginRoute>>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: ModuleMetadata) {
        self.modules.insert(module.fqcn.clone(), Arc::new(module));
    }

    pub fn add_routes(&mut self, collection: &str, routes: HashMap<String, PluginRoute>) {
        self.routing.entry(collection.to_string()).or_default().extend(routes);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module(&self, fqcn: &str) -> Option<Arc<ModuleMetadata>> {
        self.modules.get(fqcn).cloned()
    }

    pub fn route(&self, fqcn: &str) -> Option<&PluginRoute> {
        let mut parts = fqcn.splitn(3, '.');
        let (Some(namespace), Some(collection), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
            return None;
        };
        self.routing.get(&format!("{namespace}.{collection}"))?.get(name)
    }

    /// Module names plus every live (non-tombstone) redirect.
    pub fn fqcns(&self) -> BTreeSet<String> {
        let redirects = self.routing.iter().flat_map(|(collection, routes)| {
            routes
                .iter()
                .filter(|(_, route)| route.redirect.is_some() && route.tombstone.is_none())
                .map(move |(name, _)| format!("{collection}.{name}"))
        });
        self.modules.keys().cloned().chain(redirects).collect()
    }

    /// Routing takes precedence: a redirect resolves to its target's module.
    pub fn lookup(&self, candidates: &[String]) -> ModuleLookup {
        let routed = candidates
            .iter()
            .find_map(|fqcn| self.route(fqcn).map(|route| (fqcn, route)));
        let mut fqcn = routed.map(|(fqcn, _)| fqcn.clone());

        let module = match routed.and_then(|(_, route)| route.redirect.as_deref()) {
            Some(redirect) => self.module(redirect),
            None => candidates.iter().find_map(|candidate| {
                let module = self.module(candidate)?;
                fqcn.get_or_insert_with(|| candidate.clone());
                Some(module)
            }),
        };
        ModuleLookup { module, fqcn }
    }

    /// Indexes `ansible.builtin` modules below `dir` and the builtin runtime
    /// routing next to it (`../config/ansible_builtin_runtime.yml`).
    pub fn scan_module_path(&mut self, dir: &Path) -> AnsibleLsResult<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }
        let mut files = Vec::new();
        collect_python_files(dir, &mut files)?;
        let count = files.len();
        for file in files {
            let Some(name) = module_name(&file) else {
                continue;
            };
            self.add_module(ModuleMetadata::from_source(
                format!("{BUILTIN_COLLECTION}.{name}"),
                "ansible".to_string(),
                "builtin".to_string(),
                name,
                file,
            ));
        }

        if let Some(parent) = dir.parent() {
            let runtime = parent.join("config").join("ansible_builtin_runtime.yml");
            if runtime.is_file() {
                let routes = parse_module_routing(&std::fs::read_to_string(&runtime)?)?;
                self.add_routes(BUILTIN_COLLECTION, routes);
            }
        }
        Ok(count)
    }

    /// Indexes `<root>/ansible_collections/<namespace>/<collection>`: module
    /// sources under `plugins/modules` and routing from `meta/runtime.yml`.
    pub fn scan_collections_path(&mut self, root: &Path) -> AnsibleLsResult<usize> {
        let collections_dir = root.join("ansible_collections");
        if !collections_dir.is_dir() {
            return Ok(0);
        }
        let mut count = 0;
        for namespace in sorted_dirs(&collections_dir)? {
            for collection in sorted_dirs(&namespace)? {
                let (Some(ns), Some(col)) = (dir_name(&namespace), dir_name(&collection)) else {
                    continue;
                };
                count += self.scan_collection(&collection, &ns, &col)?;

                let runtime = collection.join("meta").join("runtime.yml");
                if runtime.is_file() {
                    match std::fs::read_to_string(&runtime)
                        .map_err(AnsibleLsError::from)
                        .and_then(|text| parse_module_routing(&text))
                    {
                        Ok(routes) => self.add_routes(&format!("{ns}.{col}"), routes),
                        Err(err) => log::warn!(
                            target: "ansible_ls::docs",
                            "Ignoring routing in {}: {}",
                            runtime.display(),
                            err
                        ),
                    }
                }
            }
        }
        Ok(count)
    }

    fn scan_collection(&mut self, collection_dir: &Path, namespace: &str, collection: &str) -> AnsibleLsResult<usize> {
        let modules_dir = collection_dir.join("plugins").join("modules");
        if !modules_dir.is_dir() {
            return Ok(0);
        }
        let mut files = Vec::new();
        collect_python_files(&modules_dir, &mut files)?;
        let mut count = 0;
        for file in files {
            let Some(name) = module_name(&file) else {
                continue;
            };
            // Modules in sub-directories belong to a dotted sub-collection
            let nested: Vec<String> = file
                .parent()
                .and_then(|parent| parent.strip_prefix(&modules_dir).ok())
                .map(|rel| {
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            let collection = std::iter::once(collection.to_string())
                .chain(nested)
                .collect::<Vec<_>>()
                .join(".");
            self.add_module(ModuleMetadata::from_source(
                format!("{namespace}.{collection}.{name}"),
                namespace.to_string(),
                collection,
                name,
                file,
            ));
            count += 1;
        }
        Ok(count)
    }
}

fn module_name(file: &Path) -> Option<String> {
    let stem = file.file_stem()?.to_str()?;
    (!stem.starts_with('_')).then(|| stem.to_string())
}

fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

fn sorted_dirs(dir: &Path) -> AnsibleLsResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Recursively collects `*.py` files, skipping symlinks and private modules.
fn collect_python_files(dir: &Path, files: &mut Vec<PathBuf>) -> AnsibleLsResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            collect_python_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "py") && module_name(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(())
}

/// Builds a fresh index from configured paths. Unreadable paths are logged
/// and skipped.
pub fn build_index(settings: &DocsSettings) -> ModuleIndex {
    let mut index = ModuleIndex::new();
    for dir in &settings.module_paths {
        if let Err(err) = index.scan_module_path(dir) {
            log::warn!(target: "ansible_ls::docs", "Failed to index {}: {}", dir.display(), err);
        }
    }
    for root in &settings.collections_paths {
        if let Err(err) = index.scan_collections_path(root) {
            log::warn!(target: "ansible_ls::docs", "Failed to index {}: {}", root.display(), err);
        }
    }
    index
}

/// Filesystem-backed [`DocsProvider`].
///
/// Collections next to a playbook (`<playbook dir>/collections`) are indexed
/// on first use and cached until the next [`DocsLibrary::reindex`].
pub struct DocsLibrary {
    index: ArcSwap<ModuleIndex>,
    adjacent: Mutex<HashMap<PathBuf, Arc<ModuleIndex>>>,
}

impl Default for DocsLibrary {
    fn default() -> Self {
        Self::from_index(ModuleIndex::new())
    }
}

impl DocsLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_index(index: ModuleIndex) -> Self {
        Self {
            index: ArcSwap::from_pointee(index),
            adjacent: Mutex::new(HashMap::new()),
        }
    }

    /// Rebuilds the index off the async runtime. Returns the module count.
    pub async fn reindex(&self, settings: &DocsSettings) -> AnsibleLsResult<usize> {
        let settings = settings.clone();
        let index = tokio::task::spawn_blocking(move || build_index(&settings))
            .await
            .map_err(|err| AnsibleLsError::internal(format!("docs indexing task failed: {err}")))?;
        let count = index.len();
        self.index.store(Arc::new(index));
        self.adjacent.lock().recover_poison("DocsLibrary::reindex")?.clear();
        log::info!(target: "ansible_ls::docs", "Indexed {} modules", count);
        Ok(count)
    }

    /// Index of the collections next to `document`. The first request for
    /// a directory scans it off the async runtime.
    async fn adjacent_index(&self, document: &Url) -> AnsibleLsResult<Option<Arc<ModuleIndex>>> {
        let Some(root) = adjacent_collections_root(document) else {
            return Ok(None);
        };
        let cached = self
            .adjacent
            .lock()
            .recover_poison("DocsLibrary::adjacent_index")?
            .get(&root)
            .cloned();
        if let Some(index) = cached {
            return Ok(Some(index));
        }

        let scan_root = root.clone();
        let index = tokio::task::spawn_blocking(move || {
            let mut index = ModuleIndex::new();
            index.scan_collections_path(&scan_root).map(|_| index)
        })
        .await
        .map_err(|err| AnsibleLsError::internal(format!("collection scan task failed: {err}")))??;
        log::debug!(
            target: "ansible_ls::docs",
            "Indexed {} modules next to {}",
            index.len(),
            root.display()
        );

        let mut cache = self.adjacent.lock().recover_poison("DocsLibrary::adjacent_index")?;
        // A concurrent request may have finished the same scan first
        let index = cache.entry(root).or_insert_with(|| Arc::new(index));
        Ok(Some(Arc::clone(index)))
    }
}

fn adjacent_collections_root(document: &Url) -> Option<PathBuf> {
    let path = document.to_file_path().ok()?;
    let root = path.parent()?.join("collections");
    root.is_dir().then_some(root)
}

#[async_trait]
impl DocsProvider for DocsLibrary {
    async fn find_module(
        &self,
        name: &str,
        collections: &[String],
        document: Option<&Url>,
    ) -> AnsibleLsResult<ModuleLookup> {
        let candidates = candidate_fqcns(name, collections);
        if let Some(document) = document
            && let Some(adjacent) = self.adjacent_index(document).await?
        {
            let lookup = adjacent.lookup(&candidates);
            if lookup.module.is_some() {
                return Ok(lookup);
            }
        }
        Ok(self.index.load().lookup(&candidates))
    }

    async fn module_fqcns(&self, document: &Url) -> AnsibleLsResult<BTreeSet<String>> {
        let mut fqcns = self.index.load().fqcns();
        if let Some(adjacent) = self.adjacent_index(document).await? {
            fqcns.extend(adjacent.fqcns());
        }
        Ok(fqcns)
    }

    async fn module_route(&self, fqcn: &str, document: Option<&Url>) -> AnsibleLsResult<Option<PluginRoute>> {
        if let Some(document) = document
            && let Some(adjacent) = self.adjacent_index(document).await?
            && let Some(route) = adjacent.route(fqcn)
        {
            return Ok(Some(route.clone()));
        }
        Ok(self.index.load().route(fqcn).cloned())
    }
}
