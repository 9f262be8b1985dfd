//! Conversions between protocol types and the analysis types.

use std::str::FromStr;

use tower_lsp_server::ls_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Documentation, Hover, HoverContents,
    InsertTextFormat, MarkupContent, MarkupKind, TextEdit, Uri,
};
use url::Url;

use crate::completion::{CandidateData, CandidateKind, CompletionCandidate};
use crate::error::{AnsibleLsError, AnsibleLsResult};
use crate::hover::HoverInfo;
use crate::text::PositionMapper;

pub fn uri_to_url(uri: &Uri) -> AnsibleLsResult<Url> {
    Url::parse(uri.as_str()).map_err(|err| {
        log::debug!(target: "ansible_ls::lsp", "Unparsable URI {}: {}", uri.as_str(), err);
        AnsibleLsError::invalid_uri(uri.as_str())
    })
}

pub fn url_to_uri(url: &Url) -> Option<Uri> {
    Uri::from_str(url.as_str()).ok()
}

fn item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Property => CompletionItemKind::PROPERTY,
        CandidateKind::Class => CompletionItemKind::CLASS,
        CandidateKind::Reference => CompletionItemKind::REFERENCE,
        CandidateKind::Value => CompletionItemKind::VALUE,
        CandidateKind::Variable => CompletionItemKind::VARIABLE,
    }
}

fn candidate_kind(kind: Option<CompletionItemKind>) -> CandidateKind {
    match kind {
        Some(CompletionItemKind::CLASS) => CandidateKind::Class,
        Some(CompletionItemKind::REFERENCE) => CandidateKind::Reference,
        Some(CompletionItemKind::VALUE) => CandidateKind::Value,
        Some(CompletionItemKind::VARIABLE) => CandidateKind::Variable,
        _ => CandidateKind::Property,
    }
}

fn markdown(value: String) -> MarkupContent {
    MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    }
}

/// Protocol item for a candidate. The replacement span becomes a text
/// edit; without one the client inserts at the cursor.
pub fn to_completion_item(
    candidate: CompletionCandidate,
    mapper: &PositionMapper<'_>,
    supports_snippets: bool,
) -> CompletionItem {
    let range = candidate
        .range
        .as_ref()
        .and_then(|range| mapper.byte_range_to_range(range.start, range.end));
    let (insert_text, text_edit) = match range {
        Some(range) => (
            None,
            Some(CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: candidate.insert_text,
            })),
        ),
        None => (Some(candidate.insert_text), None),
    };
    CompletionItem {
        label: candidate.label,
        kind: Some(item_kind(candidate.kind)),
        sort_text: Some(candidate.sort_text),
        filter_text: candidate.filter_text,
        detail: candidate.detail,
        documentation: candidate.documentation.map(|doc| Documentation::MarkupContent(markdown(doc))),
        insert_text,
        insert_text_format: (candidate.snippet && supports_snippets).then_some(InsertTextFormat::SNIPPET),
        text_edit,
        data: candidate
            .data
            .and_then(|data| serde_json::to_value(data).ok()),
        ..Default::default()
    }
}

/// Candidate view of an item coming back for resolution. Items whose data
/// does not parse resolve to themselves.
pub fn candidate_from_item(item: &CompletionItem) -> CompletionCandidate {
    let data = item.data.clone().and_then(|value| {
        serde_json::from_value::<CandidateData>(value)
            .inspect_err(|err| {
                log::debug!(target: "ansible_ls::lsp", "Unresolvable item {}: {}", item.label, err);
            })
            .ok()
    });
    let (insert_text, has_range) = match &item.text_edit {
        Some(CompletionTextEdit::Edit(edit)) => (edit.new_text.clone(), true),
        Some(CompletionTextEdit::InsertAndReplace(edit)) => (edit.new_text.clone(), true),
        None => (item.insert_text.clone().unwrap_or_else(|| item.label.clone()), false),
    };
    CompletionCandidate {
        label: item.label.clone(),
        kind: candidate_kind(item.kind),
        sort_text: item.sort_text.clone().unwrap_or_default(),
        filter_text: item.filter_text.clone(),
        detail: item.detail.clone(),
        documentation: None,
        insert_text,
        // Only presence matters from here on; the protocol range is kept on the item
        range: has_range.then_some(0..0),
        snippet: item.insert_text_format == Some(InsertTextFormat::SNIPPET),
        data,
    }
}

/// Copies the resolved parts of `candidate` onto `item`.
pub fn apply_resolved(mut item: CompletionItem, candidate: CompletionCandidate, supports_snippets: bool) -> CompletionItem {
    match &mut item.text_edit {
        Some(CompletionTextEdit::Edit(edit)) => edit.new_text = candidate.insert_text,
        Some(CompletionTextEdit::InsertAndReplace(edit)) => edit.new_text = candidate.insert_text,
        None => item.insert_text = Some(candidate.insert_text),
    }
    if candidate.snippet && supports_snippets {
        item.insert_text_format = Some(InsertTextFormat::SNIPPET);
    }
    if let Some(documentation) = candidate.documentation {
        item.documentation = Some(Documentation::MarkupContent(markdown(documentation)));
    }
    item
}

pub fn to_hover(info: HoverInfo, mapper: &PositionMapper<'_>) -> Hover {
    Hover {
        contents: HoverContents::Markup(markdown(info.contents)),
        range: info
            .range
            .and_then(|range| mapper.byte_range_to_range(range.start, range.end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp_server::ls_types::{Position, Range};

    fn module_candidate() -> CompletionCandidate {
        CompletionCandidate::new("ansible.builtin.ping", CandidateKind::Class, "2_ansible.builtin.ping".into())
            .with_insert_text("ansible.builtin.ping:\n\t")
            .with_range(Some(4..6))
            .with_data(CandidateData {
                document_uri: "file:///p/site.yml".into(),
                module_fqcn: Some("ansible.builtin.ping".into()),
                at_end_of_line: true,
                ..Default::default()
            })
    }

    #[test]
    fn test_ranges_become_text_edits() {
        let text = "- x\n  pi\n";
        let item = to_completion_item(module_candidate(), &PositionMapper::new(text), true);

        assert_eq!(item.kind, Some(CompletionItemKind::CLASS));
        assert_eq!(item.sort_text.as_deref(), Some("2_ansible.builtin.ping"));
        assert_eq!(
            item.text_edit,
            Some(CompletionTextEdit::Edit(TextEdit {
                range: Range {
                    start: Position { line: 1, character: 0 },
                    end: Position { line: 1, character: 2 },
                },
                new_text: "ansible.builtin.ping:\n\t".into(),
            }))
        );
        assert_eq!(item.insert_text, None);
        assert_eq!(item.insert_text_format, None);
        assert_eq!(item.data.as_ref().unwrap()["moduleFqcn"], "ansible.builtin.ping");
    }

    #[test]
    fn test_resolve_round_trip_keeps_edit_range() {
        let text = "- x\n  pi\n";
        let item = to_completion_item(module_candidate(), &PositionMapper::new(text), true);

        let mut candidate = candidate_from_item(&item);
        assert_eq!(candidate.data.as_ref().and_then(|d| d.module_fqcn.as_deref()), Some("ansible.builtin.ping"));
        candidate.insert_text = "ping:\n\t".into();
        candidate.snippet = true;
        candidate.documentation = Some("*Ping*".into());

        let resolved = apply_resolved(item, candidate, true);

        let Some(CompletionTextEdit::Edit(edit)) = &resolved.text_edit else {
            panic!("expected a text edit");
        };
        assert_eq!(edit.new_text, "ping:\n\t");
        assert_eq!(edit.range.start, Position { line: 1, character: 0 });
        assert_eq!(resolved.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert!(matches!(resolved.documentation, Some(Documentation::MarkupContent(_))));
    }

    #[test]
    fn test_snippets_need_client_support() {
        let mut candidate = module_candidate();
        candidate.snippet = true;
        let item = to_completion_item(candidate, &PositionMapper::new("- x\n  pi\n"), false);
        assert_eq!(item.insert_text_format, None);
    }

    #[test]
    fn test_items_without_data_resolve_to_themselves() {
        let item = CompletionItem {
            label: "all".into(),
            kind: Some(CompletionItemKind::VALUE),
            ..Default::default()
        };
        let candidate = candidate_from_item(&item);
        assert!(candidate.data.is_none());
        assert_eq!(candidate.insert_text, "all");
    }

    #[test]
    fn test_uri_conversion_round_trip() {
        let url = Url::parse("file:///project/site.yml").unwrap();
        let uri = url_to_uri(&url).unwrap();
        assert_eq!(uri_to_url(&uri).unwrap(), url);
    }

    #[test]
    fn test_unparsable_uri_is_reported_as_invalid() {
        // IPvFuture hosts are valid URI syntax but not WHATWG URLs
        let uri = Uri::from_str("http://[v1.x]/site.yml").unwrap();

        let err = uri_to_url(&uri).unwrap_err();

        assert!(matches!(err, AnsibleLsError::InvalidUri { ref uri } if uri == "http://[v1.x]/site.yml"));
    }
}
