use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::TextDocumentContentChangeEvent;
use url::Url;

use super::text_sync::apply_content_changes;
use crate::error::{AnsibleLsError, AnsibleLsResult};

/// Text of an open document as seen by one request.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub text: Arc<str>,
    pub version: i32,
    /// Cancelled as soon as the document changes or closes.
    pub cancel: CancellationToken,
}

/// Open documents keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, DocumentSnapshot>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, uri: Url, text: String, version: i32) {
        let document = DocumentSnapshot {
            text: Arc::from(text),
            version,
            cancel: CancellationToken::new(),
        };
        if let Some(previous) = self.documents.insert(uri, document) {
            previous.cancel.cancel();
        }
    }

    /// Applies `changes` and cancels requests still running on the old text.
    pub fn apply_changes(
        &self,
        uri: &Url,
        version: i32,
        changes: Vec<TextDocumentContentChangeEvent>,
    ) -> AnsibleLsResult<()> {
        let mut document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| AnsibleLsError::document_not_found(uri.as_str()))?;
        let text = apply_content_changes(&document.text, changes);
        document.cancel.cancel();
        *document = DocumentSnapshot {
            text: Arc::from(text),
            version,
            cancel: CancellationToken::new(),
        };
        Ok(())
    }

    pub fn snapshot(&self, uri: &Url) -> Option<DocumentSnapshot> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    pub fn close(&self, uri: &Url) {
        if let Some((_, document)) = self.documents.remove(uri) {
            document.cancel.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp_server::ls_types::{Position, Range};

    fn uri() -> Url {
        Url::parse("file:///project/site.yml").unwrap()
    }

    #[test]
    fn edits_cancel_running_requests() {
        let store = DocumentStore::new();
        store.open(uri(), "- hosts: all\n".into(), 1);
        let before = store.snapshot(&uri()).unwrap();

        store
            .apply_changes(
                &uri(),
                2,
                vec![TextDocumentContentChangeEvent {
                    range: Some(Range {
                        start: Position { line: 0, character: 9 },
                        end: Position { line: 0, character: 12 },
                    }),
                    range_length: None,
                    text: "web".into(),
                }],
            )
            .unwrap();

        let after = store.snapshot(&uri()).unwrap();
        assert!(before.cancel.is_cancelled());
        assert!(!after.cancel.is_cancelled());
        assert_eq!(&*after.text, "- hosts: web\n");
        assert_eq!(after.version, 2);
    }

    #[test]
    fn changes_to_unknown_documents_fail() {
        let store = DocumentStore::new();
        let err = store.apply_changes(&uri(), 1, Vec::new()).unwrap_err();
        assert!(matches!(err, AnsibleLsError::DocumentNotFound { .. }));
    }

    #[test]
    fn close_cancels_and_forgets() {
        let store = DocumentStore::new();
        store.open(uri(), String::new(), 1);
        let snapshot = store.snapshot(&uri()).unwrap();

        store.close(&uri());

        assert!(snapshot.cancel.is_cancelled());
        assert!(store.is_empty());
    }
}
