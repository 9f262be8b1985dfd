//! Collections declared by role metadata (`meta/main.yml`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use url::Url;

use crate::error::AnsibleLsResult;

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Collections declared by the metadata associated with `document`, in
    /// declaration order. Documents outside a `tasks` directory have none.
    async fn collections(&self, document: &Url) -> AnsibleLsResult<Vec<String>>;
}

/// Reads `meta/main.yml` next to the first `tasks` directory on the
/// document's path and caches the result per metadata file.
#[derive(Debug, Default)]
pub struct MetadataLibrary {
    cache: DashMap<PathBuf, Arc<Vec<String>>>,
}

impl MetadataLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the cached contents of a metadata file after it changed on disk.
    pub fn invalidate(&self, metadata_file: &Path) {
        self.cache.remove(metadata_file);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// `<dir>/meta/main.yml` for the outermost `<dir>/tasks/` on the path.
pub fn metadata_path(document: &Path) -> Option<PathBuf> {
    let mut prefix = PathBuf::new();
    for component in document.components() {
        if component.as_os_str() == "tasks" {
            return Some(prefix.join("meta").join("main.yml"));
        }
        prefix.push(component);
    }
    None
}

/// String entries of the top-level `collections` list of every document.
pub fn parse_metadata_collections(text: &str) -> AnsibleLsResult<Vec<String>> {
    let mut collections = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        let Some(items) = value.get("collections").and_then(|c| c.as_sequence()) else {
            continue;
        };
        collections.extend(items.iter().filter_map(|item| item.as_str().map(str::to_string)));
    }
    Ok(collections)
}

#[async_trait]
impl MetadataProvider for MetadataLibrary {
    async fn collections(&self, document: &Url) -> AnsibleLsResult<Vec<String>> {
        let Some(metadata_file) = document
            .to_file_path()
            .ok()
            .and_then(|path| metadata_path(&path))
        else {
            return Ok(Vec::new());
        };
        if let Some(cached) = self.cache.get(&metadata_file) {
            return Ok(cached.as_ref().clone());
        }

        let collections = match tokio::fs::read_to_string(&metadata_file).await {
            Ok(text) => parse_metadata_collections(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!(
            target: "ansible_ls::metadata",
            "Collections from {}: {:?}",
            metadata_file.display(),
            collections
        );
        self.cache.insert(metadata_file, Arc::new(collections.clone()));
        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn metadata_lives_next_to_the_outermost_tasks_dir() {
        assert_eq!(
            metadata_path(Path::new("/p/roles/web/tasks/sub/tasks/main.yml")),
            Some(PathBuf::from("/p/roles/web/meta/main.yml"))
        );
        assert_eq!(metadata_path(Path::new("/p/site.yml")), None);
    }

    #[test]
    fn parses_collections_from_every_document() {
        let text = "collections:\n  - a.b\n  - 3\n---\ncollections: [c.d]\n";
        assert_eq!(parse_metadata_collections(text).unwrap(), vec!["a.b", "c.d"]);
    }

    #[tokio::test]
    async fn reads_role_metadata_for_task_files() {
        // Given a role with metadata declaring a collection
        let dir = TempDir::new().unwrap();
        let role = dir.path().join("roles").join("web");
        fs::create_dir_all(role.join("meta")).unwrap();
        fs::create_dir_all(role.join("tasks")).unwrap();
        fs::write(role.join("meta/main.yml"), "collections:\n  - community.general\n").unwrap();
        let uri = Url::from_file_path(role.join("tasks/main.yml")).unwrap();

        // When collections are requested for a task file of that role
        let library = MetadataLibrary::new();
        let collections = library.collections(&uri).await.unwrap();

        // Then the declared collection is returned
        assert_eq!(collections, vec!["community.general"]);
    }

    #[tokio::test]
    async fn missing_metadata_declares_nothing() {
        let dir = TempDir::new().unwrap();
        let uri = Url::from_file_path(dir.path().join("tasks/main.yml")).unwrap();

        let library = MetadataLibrary::new();

        assert!(library.collections(&uri).await.unwrap().is_empty());
    }
}
