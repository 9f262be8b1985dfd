//! Applying `didChange` content changes to a document's text.
//!
//! Incremental changes carry a range in UTF-16 positions of the text as it
//! is after the previous change of the same notification; a change without
//! a range replaces the whole text.

use tower_lsp_server::ls_types::TextDocumentContentChangeEvent;

use crate::text::PositionMapper;

pub(crate) fn apply_content_changes(old_text: &str, content_changes: Vec<TextDocumentContentChangeEvent>) -> String {
    let mut text = old_text.to_string();

    for change in content_changes {
        match change.range {
            Some(range) => {
                let mapper = PositionMapper::new(&text);
                let start = mapper.position_to_byte(range.start).unwrap_or(text.len());
                let end = mapper.position_to_byte(range.end).unwrap_or(text.len()).max(start);
                text.replace_range(start..end, &change.text);
            }
            None => text = change.text,
        }
    }

    text
}
