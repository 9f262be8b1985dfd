use tower_lsp_server::ls_types::{Position, Range};

/// Maps between LSP positions (UTF-16 columns) and byte offsets of a text.
pub struct PositionMapper<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> PositionMapper<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = compute_line_starts(text);
        Self { text, line_starts }
    }

    fn line_text(&self, line: usize) -> Option<(usize, &'a str)> {
        let start = *self.line_starts.get(line)?;
        let end = match self.line_starts.get(line + 1) {
            // Exclude the newline
            Some(next) => next - 1,
            None => self.text.len(),
        };
        Some((start, &self.text[start..end]))
    }

    /// Byte offset of `position`. Columns past the end of a line clamp to
    /// the line end; lines past the end of the text yield `None`.
    pub fn position_to_byte(&self, position: Position) -> Option<usize> {
        let (line_start, line_text) = self.line_text(position.line as usize)?;
        let offset = convert_utf16_to_byte_in_line(line_text, position.character as usize)
            .unwrap_or(line_text.len());
        Some(line_start + offset)
    }

    /// Position of `offset`. An offset inside a multi-byte character maps to
    /// the start of that character.
    pub fn byte_to_position(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() {
            return None;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let (line_start, line_text) = self.line_text(line)?;
        let mut line_offset = (offset - line_start).min(line_text.len());
        while !line_text.is_char_boundary(line_offset) {
            line_offset -= 1;
        }
        let character = convert_byte_to_utf16_in_line(line_text, line_offset).unwrap_or(0);
        Some(Position {
            line: line as u32,
            character: character as u32,
        })
    }

    pub fn byte_range_to_range(&self, start: usize, end: usize) -> Option<Range> {
        Some(Range {
            start: self.byte_to_position(start)?,
            end: self.byte_to_position(end)?,
        })
    }
}

/// Byte offsets at which each line starts.
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Convert UTF-16 position to byte position within a line
/// Returns None if the UTF-16 position is beyond the end of the line
#[inline(always)]
pub fn convert_utf16_to_byte_in_line(line_text: &str, utf16_pos: usize) -> Option<usize> {
    let mut byte_offset = 0;
    let mut utf16_offset = 0;

    for ch in line_text.chars() {
        if utf16_offset >= utf16_pos {
            return Some(byte_offset);
        }
        utf16_offset += ch.len_utf16();
        byte_offset += ch.len_utf8();
    }

    (utf16_offset == utf16_pos).then_some(byte_offset)
}

/// Convert byte position to UTF-16 position within a line
/// Returns None inside a multi-byte character or past the end of the line
#[inline(always)]
pub fn convert_byte_to_utf16_in_line(line_text: &str, byte_pos: usize) -> Option<usize> {
    if byte_pos > line_text.len() || !line_text.is_char_boundary(byte_pos) {
        return None;
    }
    Some(line_text[..byte_pos].chars().map(char::len_utf16).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, character: u32) -> Position {
        Position { line, character }
    }

    #[test]
    fn ascii_round_trip() {
        let text = "- hosts: all\n  tasks:\n";
        let mapper = PositionMapper::new(text);

        assert_eq!(mapper.position_to_byte(pos(1, 2)), Some(15));
        assert_eq!(mapper.byte_to_position(15), Some(pos(1, 2)));
    }

    #[test]
    fn columns_count_utf16_units() {
        // "é" is two bytes but one UTF-16 unit; "😀" is four bytes and two units
        let text = "a: é😀x\n";
        let mapper = PositionMapper::new(text);

        assert_eq!(mapper.position_to_byte(pos(0, 4)), Some(5));
        assert_eq!(mapper.position_to_byte(pos(0, 6)), Some(9));
        assert_eq!(mapper.byte_to_position(9), Some(pos(0, 6)));
    }

    #[test]
    fn offsets_inside_a_character_snap_back() {
        let mapper = PositionMapper::new("é");
        assert_eq!(mapper.byte_to_position(1), Some(pos(0, 0)));
    }

    #[test]
    fn columns_past_line_end_clamp() {
        let mapper = PositionMapper::new("ab\ncd");
        assert_eq!(mapper.position_to_byte(pos(0, 10)), Some(2));
        assert_eq!(mapper.position_to_byte(pos(5, 0)), None);
    }

    #[test]
    fn end_of_text_after_trailing_newline() {
        let text = "a\n";
        let mapper = PositionMapper::new(text);
        assert_eq!(mapper.byte_to_position(2), Some(pos(1, 0)));
        assert_eq!(mapper.position_to_byte(pos(1, 0)), Some(2));
    }
}
