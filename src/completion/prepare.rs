//! Marker insertion that makes a half-typed line parseable.
//!
//! Before parsing, a two character marker is inserted at the cursor. At a key
//! position the marker `_:` forms a mapping entry, so indentation alone is
//! enough for the parser to place the cursor in the right mapping. At a value
//! position (a `: ` precedes the cursor on its line) the marker `__` extends
//! the scalar being typed without adding a separator.
//!
//! Ranges reported by the patched parse are mapped back onto the original
//! text before they reach the editor.

use crate::yaml::ByteRange;

pub const KEY_MARKER: &str = "_:";
pub const VALUE_MARKER: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Key,
    Value,
}

impl MarkerKind {
    pub fn marker(self) -> &'static str {
        match self {
            MarkerKind::Key => KEY_MARKER,
            MarkerKind::Value => VALUE_MARKER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreparedSource {
    /// Text with the marker inserted.
    pub text: String,
    /// Where the marker starts; equal to the cursor offset in the original.
    pub offset: usize,
    pub kind: MarkerKind,
}

/// Inserts the marker at `offset`. Offsets past the end or inside a UTF-8
/// sequence are clamped to the previous character boundary.
pub fn prepare(text: &str, offset: usize) -> PreparedSource {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let kind = if text[line_start..offset].contains(": ") {
        MarkerKind::Value
    } else {
        MarkerKind::Key
    };

    let marker = kind.marker();
    let mut patched = String::with_capacity(text.len() + marker.len());
    patched.push_str(&text[..offset]);
    patched.push_str(marker);
    patched.push_str(&text[offset..]);
    PreparedSource {
        text: patched,
        offset,
        kind,
    }
}

impl PreparedSource {
    pub fn marker_len(&self) -> usize {
        self.kind.marker().len()
    }

    /// Maps an offset of the patched text onto the original text. Offsets
    /// inside the marker collapse onto the insertion point.
    pub fn to_original(&self, patched: usize) -> usize {
        let marker_end = self.offset + self.marker_len();
        if patched <= self.offset {
            patched
        } else if patched >= marker_end {
            patched - self.marker_len()
        } else {
            self.offset
        }
    }

    pub fn original_range(&self, range: &ByteRange) -> ByteRange {
        self.to_original(range.start)..self.to_original(range.end)
    }
}

/// Whether only a line break (or the end of text) follows `offset`.
pub fn at_end_of_line(text: &str, offset: usize) -> bool {
    matches!(text.as_bytes().get(offset), None | Some(b'\n') | Some(b'\r'))
}

/// Whether the only thing between the line start and `range` is a `-`, i.e.
/// the key opens a new list item.
pub fn first_element_of_list(text: &str, range: Option<&ByteRange>) -> bool {
    let Some(start) = range.map(|r| r.start).filter(|&s| text.is_char_boundary(s)) else {
        return false;
    };
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..start].trim() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{Node, parse_all_documents, path_at};
    use rstest::rstest;

    #[rstest]
    #[case::empty_line("- name: x\n  ", 12, MarkerKind::Key, "- name: x\n  _:")]
    #[case::partial_key("- deb", 5, MarkerKind::Key, "- deb_:")]
    #[case::value("- name: x", 9, MarkerKind::Value, "- name: x__")]
    #[case::colon_on_previous_line("a: 1\nb", 6, MarkerKind::Key, "a: 1\nb_:")]
    fn chooses_marker_from_line_prefix(
        #[case] text: &str,
        #[case] offset: usize,
        #[case] kind: MarkerKind,
        #[case] patched: &str,
    ) {
        let prepared = prepare(text, offset);

        assert_eq!(prepared.kind, kind);
        assert_eq!(prepared.text, patched);
    }

    #[test]
    fn key_range_excludes_the_marker() {
        let text = "- name: x\n  deb\n";
        let prepared = prepare(text, 15);
        let docs = parse_all_documents(&prepared.text);
        let path = path_at(&docs, prepared.offset, true).unwrap();

        let key = path.last().and_then(|n| n.as_node()).unwrap();
        assert_eq!(key.as_str(), Some("deb_"));
        let range = prepared.original_range(key.range.as_ref().unwrap());
        assert_eq!(&text[range], "deb");
    }

    #[test]
    fn value_range_excludes_the_marker() {
        let text = "- state: pre\n";
        let prepared = prepare(text, 12);
        let docs = parse_all_documents(&prepared.text);
        let path = path_at(&docs, prepared.offset, true).unwrap();

        let value = path.last().and_then(|n| n.as_node()).unwrap();
        assert_eq!(value.as_str(), Some("pre__"));
        assert_eq!(&text[prepared.original_range(value.range.as_ref().unwrap())], "pre");
    }

    #[test]
    fn ranges_away_from_the_marker_are_unchanged() {
        let text = "- name: x\n  debug:\n    msg: hi\n";
        let offset = text.find("debug").unwrap();
        let prepared = prepare(text, offset);

        let original = parse_all_documents(text);
        let patched = parse_all_documents(&prepared.text);
        let range_of = |docs: &[crate::yaml::Document], needle: &str, source: &str| {
            let path = path_at(docs, source.find(needle).unwrap(), false).unwrap();
            path.last()
                .and_then(|n| n.as_node())
                .and_then(|n: &Node| n.range.clone())
                .unwrap()
        };

        for needle in ["name", "x\n", "msg", "hi"] {
            let before = range_of(&original, needle, text);
            let after = prepared.original_range(&range_of(&patched, needle, &prepared.text));
            assert_eq!(before, after, "range of {needle:?}");
        }
    }

    #[rstest]
    #[case::end_of_text("a", 1, true)]
    #[case::before_newline("a\nb", 1, true)]
    #[case::before_crlf("a\r\nb", 1, true)]
    #[case::mid_line("ab", 1, false)]
    fn detects_end_of_line(#[case] text: &str, #[case] offset: usize, #[case] expected: bool) {
        assert_eq!(at_end_of_line(text, offset), expected);
    }

    #[test]
    fn detects_first_list_element() {
        let text = "tasks:\n  - debug:\n    name: x\n";
        let debug = text.find("debug").unwrap();
        let name = text.find("name").unwrap();

        assert!(first_element_of_list(text, Some(&(debug..debug + 5))));
        assert!(!first_element_of_list(text, Some(&(name..name + 4))));
        assert!(!first_element_of_list(text, None));
    }
}
