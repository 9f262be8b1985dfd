//! Client notification abstraction for LSP communication.
//!
//! `ClientNotifier` wraps `tower_lsp_server::Client` and the capabilities
//! received in `initialize()`, so that log messages and capability checks go
//! through one place. Before `initialize()` the capabilities are unset and
//! every capability check answers `false`.

use std::sync::OnceLock;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::{ClientCapabilities, MessageType};

use super::settings::{SettingsEvent, SettingsEventKind};

/// Whether the client can expand snippet completions.
///
/// Missing or null capabilities count as unsupported.
pub(crate) fn check_snippet_support(caps: &ClientCapabilities) -> bool {
    caps.text_document
        .as_ref()
        .and_then(|td| td.completion.as_ref())
        .and_then(|completion| completion.completion_item.as_ref())
        .and_then(|item| item.snippet_support)
        .unwrap_or(false)
}

#[derive(Clone)]
pub(crate) struct ClientNotifier<'a> {
    client: Client,
    client_capabilities: &'a OnceLock<ClientCapabilities>,
}

impl std::fmt::Debug for ClientNotifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientNotifier")
            .field("client", &self.client)
            .field("client_capabilities", &"&OnceLock<ClientCapabilities>")
            .finish()
    }
}

impl<'a> ClientNotifier<'a> {
    pub(crate) fn new(client: Client, client_capabilities: &'a OnceLock<ClientCapabilities>) -> Self {
        Self {
            client,
            client_capabilities,
        }
    }

    pub(crate) async fn log(&self, level: MessageType, message: impl Into<String>) {
        self.client.log_message(level, message.into()).await;
    }

    pub(crate) async fn log_info(&self, message: impl Into<String>) {
        self.log(MessageType::INFO, message).await;
    }

    pub(crate) async fn log_warning(&self, message: impl Into<String>) {
        self.log(MessageType::WARNING, message).await;
    }

    /// Returns false until `initialize()` stored the capabilities.
    pub(crate) fn supports_snippets(&self) -> bool {
        self.client_capabilities
            .get()
            .is_some_and(check_snippet_support)
    }

    /// Forwards settings loading events to the client log.
    pub(crate) async fn log_settings_events(&self, events: &[SettingsEvent]) {
        for event in events {
            let message_type = match event.kind {
                SettingsEventKind::Info => MessageType::INFO,
                SettingsEventKind::Warning => MessageType::WARNING,
            };
            self.client.log_message(message_type, event.message.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tower_lsp_server::ls_types::{
        CompletionClientCapabilities, CompletionItemCapability, TextDocumentClientCapabilities,
    };

    /// Arguments control which level of the capability chain is present.
    #[rstest]
    #[case::snippets_true(true, true, Some(true), true)]
    #[case::snippets_false(true, true, Some(false), false)]
    #[case::snippets_none(true, true, None, false)]
    #[case::completion_item_none(true, false, None, false)]
    #[case::text_document_none(false, false, None, false)]
    fn test_check_snippet_support(
        #[case] text_document: bool,
        #[case] completion_item: bool,
        #[case] snippet_support: Option<bool>,
        #[case] expected: bool,
    ) {
        let caps = ClientCapabilities {
            text_document: text_document.then(|| TextDocumentClientCapabilities {
                completion: Some(CompletionClientCapabilities {
                    completion_item: completion_item.then(|| CompletionItemCapability {
                        snippet_support,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(check_snippet_support(&caps), expected);
    }

    #[test]
    fn test_check_snippet_support_when_capabilities_empty() {
        assert!(!check_snippet_support(&ClientCapabilities::default()));
    }
}
