//! Read-only cursor for walking up an ancestry [`Path`].
//!
//! Assertions are chained from the most nested element upwards, e.g.
//! `AncestryCursor::new(&path).parent_of_key().parent_as(NodeType::Sequence)`.
//! The first failed assertion turns the cursor [`Position::Invalid`] and every
//! further call becomes a no-op returning `None`.

use super::node::{Node, NodeType, Pair, Path, PathNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Valid(usize),
    Invalid,
}

#[derive(Debug, Clone, Copy)]
pub struct AncestryCursor<'p, 'a> {
    path: &'p [PathNode<'a>],
    position: Position,
}

impl<'p, 'a> AncestryCursor<'p, 'a> {
    /// Starts at the last element of `path`.
    pub fn new(path: &'p [PathNode<'a>]) -> Self {
        let position = match path.len() {
            0 => Position::Invalid,
            len => Position::Valid(len - 1),
        };
        Self { path, position }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.position, Position::Valid(_))
    }

    /// Moves up one level, transparently skipping over a Pair.
    pub fn parent(self) -> Self {
        self.step_up(None)
    }

    /// Moves up one level and asserts the variant of the landing element.
    /// Pairs are skipped unless `NodeType::Pair` itself is asserted.
    pub fn parent_as(self, expected: NodeType) -> Self {
        self.step_up(Some(expected))
    }

    fn step_up(mut self, expected: Option<NodeType>) -> Self {
        self.position = match self.position {
            Position::Valid(index) if index > 0 => Position::Valid(index - 1),
            _ => Position::Invalid,
        };
        if matches!(self.get(), Some(PathNode::Pair(_))) && expected != Some(NodeType::Pair) {
            self.position = match self.position {
                Position::Valid(index) if index > 0 => Position::Valid(index - 1),
                _ => Position::Invalid,
            };
        }
        if let Some(expected) = expected
            && self.get().map(|n| n.node_type()) != Some(expected)
        {
            self.position = Position::Invalid;
        }
        self
    }

    /// Requires the current element to be the key of the Pair above it, and
    /// lands on the Mapping owning that Pair.
    pub fn parent_of_key(self) -> Self {
        let current = self.get();
        let moved = self.parent_as(NodeType::Pair);
        match (current, moved.get()) {
            (Some(node), Some(PathNode::Pair(pair))) if node.same(&PathNode::Node(&pair.key)) => {
                moved.parent_as(NodeType::Mapping)
            }
            _ => moved.invalidate(),
        }
    }

    fn invalidate(mut self) -> Self {
        self.position = Position::Invalid;
        self
    }

    /// The element the assertions have led to.
    pub fn get(&self) -> Option<PathNode<'a>> {
        match self.position {
            Position::Valid(index) => self.path.get(index).copied(),
            Position::Invalid => None,
        }
    }

    /// The current element when it is a node (not a Pair).
    pub fn node(&self) -> Option<&'a Node> {
        self.get().and_then(|n| n.as_node())
    }

    fn next_pair(&self) -> Option<&'a Pair> {
        match self.position {
            Position::Valid(index) => self.path.get(index + 1).and_then(|n| n.as_pair()),
            Position::Invalid => None,
        }
    }

    /// Key of the Pair one level down, if it is a string scalar.
    pub fn get_string_key(&self) -> Option<&'a str> {
        self.next_pair().and_then(|pair| pair.key.as_str())
    }

    /// Value of the Pair one level down.
    pub fn get_value(&self) -> Option<&'a Node> {
        self.next_pair().map(|pair| &pair.value)
    }

    /// Sub-path from the root up to the current element.
    pub fn get_path(&self) -> Option<Path<'a>> {
        match self.position {
            Position::Valid(index) => Some(self.path[..=index].to_vec()),
            Position::Invalid => None,
        }
    }

    /// Sub-path extended with the Pair one level down and its key.
    pub fn get_key_path(&self) -> Option<Path<'a>> {
        let pair = self.next_pair()?;
        let mut path = self.get_path()?;
        path.push(PathNode::Pair(pair));
        path.push(PathNode::Node(&pair.key));
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parser::parse_all_documents;
    use crate::yaml::path::path_at;

    const TASKS: &str = "- name: x\n  debug:\n    msg: hi\n";

    fn with_path_at<R>(text: &str, needle: &str, f: impl FnOnce(&Path<'_>) -> R) -> R {
        let docs = parse_all_documents(text);
        let offset = text.find(needle).unwrap() + 1;
        let path = path_at(&docs, offset, false).unwrap();
        f(&path)
    }

    #[test]
    fn parent_skips_pairs_by_default() {
        with_path_at(TASKS, "msg", |path| {
            let cursor = AncestryCursor::new(path).parent();
            assert_eq!(cursor.get().map(|n| n.node_type()), Some(NodeType::Mapping));
        });
    }

    #[test]
    fn parent_lands_on_pair_when_asserted() {
        with_path_at(TASKS, "msg", |path| {
            let cursor = AncestryCursor::new(path).parent_as(NodeType::Pair);
            assert!(cursor.get().and_then(|n| n.as_pair()).is_some());
        });
    }

    #[test]
    fn parent_of_key_reaches_owning_mapping() {
        with_path_at(TASKS, "msg", |path| {
            let cursor = AncestryCursor::new(path).parent_of_key();
            assert!(cursor.node().and_then(|n| n.get("msg")).is_some());
        });
    }

    #[test]
    fn parent_of_key_fails_on_values() {
        with_path_at(TASKS, "hi", |path| {
            assert!(!AncestryCursor::new(path).parent_of_key().is_valid());
        });
    }

    #[test]
    fn string_key_and_key_path_peek_one_level_down() {
        with_path_at(TASKS, "msg", |path| {
            let cursor = AncestryCursor::new(path).parent_of_key().parent_as(NodeType::Mapping);

            assert_eq!(cursor.get_string_key(), Some("debug"));
            let key_path = cursor.get_key_path().unwrap();
            assert_eq!(key_path.last().and_then(|n| n.as_node()).and_then(Node::as_str), Some("debug"));
            assert!(cursor.get_value().and_then(|v| v.get("msg")).is_some());
        });
    }

    #[test]
    fn invalid_cursor_stays_invalid() {
        with_path_at(TASKS, "msg", |path| {
            let cursor = AncestryCursor::new(path).parent_as(NodeType::Scalar);
            assert!(!cursor.is_valid());

            let cursor = cursor.parent().parent_as(NodeType::Mapping).parent_of_key();
            assert!(cursor.get().is_none());
            assert!(cursor.get_path().is_none());
            assert!(cursor.get_key_path().is_none());
            assert!(cursor.get_string_key().is_none());
            assert!(cursor.get_value().is_none());
        });
    }

    #[test]
    fn walking_above_root_invalidates() {
        with_path_at(TASKS, "msg", |path| {
            let mut cursor = AncestryCursor::new(path);
            for _ in 0..10 {
                cursor = cursor.parent();
            }
            assert!(!cursor.is_valid());
        });
    }

    #[test]
    fn empty_path_is_invalid() {
        let path: Path<'_> = Vec::new();
        assert!(AncestryCursor::new(&path).get().is_none());
    }
}
