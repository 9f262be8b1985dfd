//! Whole-document heuristics.

use super::keywords::is_play_exclusive;
use crate::yaml::{Document, Node, PathNode, map_keys};

/// Whether the text is a playbook: a list of mappings, one of which declares
/// a play-only keyword.
pub fn is_playbook(documents: &[Document]) -> bool {
    let Some(items) = documents
        .first()
        .and_then(|doc| doc.contents.as_ref())
        .and_then(Node::as_sequence)
    else {
        return false;
    };
    items
        .iter()
        .flat_map(map_keys)
        .any(|key| is_play_exclusive(&key))
}

/// Whether `offset` sits inside an inline `{{ ... }}` expression on its line.
/// `last` is the node the cursor path ends at.
pub fn cursor_inside_jinja(text: &str, offset: usize, last: Option<&PathNode<'_>>) -> bool {
    // Unquoted values cannot start with `{{`, so a plain value that doesn't
    // contain one rules the cursor out.
    if let Some(value) = last.and_then(|n| n.as_node()).and_then(Node::as_str)
        && !value.contains("{{ ")
    {
        return false;
    }
    let Some(offset) = text.is_char_boundary(offset).then_some(offset) else {
        return false;
    };

    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    let before = &text[line_start..offset];
    let after = &text[offset..line_end];

    let Some(open) = before.rfind("{{ ") else {
        return false;
    };
    let Some(close) = after.find(" }}") else {
        return false;
    };
    let reopened = after.find("{{ ").is_some_and(|i| i < close);
    !reopened && line_start + open < offset
}
