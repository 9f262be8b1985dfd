//! Offset → ancestry path resolution over parsed documents.

use super::node::{ByteRange, Document, Node, NodeKind, Path, PathNode, PLACEHOLDER};

/// Whether `offset` lies inside `range`. Inclusive mode also accepts the
/// exact end boundary, since a cursor logically sits after the character it
/// touches.
pub fn range_contains(range: &ByteRange, offset: usize, inclusive: bool) -> bool {
    range.start <= offset && (range.end > offset || (inclusive && range.end >= offset))
}

/// Whether the node has a source range containing `offset`. Nodes without a
/// range (placeholders) contain nothing.
pub fn contains(node: &Node, offset: usize, inclusive: bool) -> bool {
    node.range
        .as_ref()
        .is_some_and(|range| range_contains(range, offset, inclusive))
}

/// Builds the ancestry path from the root content node of whichever document
/// contains `offset` down to the deepest node at that offset.
///
/// Returns `None` only when no document's root contains the offset.
pub fn path_at(documents: &[Document], offset: usize, inclusive: bool) -> Option<Path<'_>> {
    let root = documents
        .iter()
        .filter_map(|doc| doc.contents.as_ref())
        .find(|contents| contains(contents, offset, inclusive))?;
    Some(descend(vec![PathNode::Node(root)], root, offset, inclusive))
}

fn descend<'a>(mut path: Path<'a>, mut current: &'a Node, offset: usize, inclusive: bool) -> Path<'a> {
    loop {
        match &current.kind {
            NodeKind::Mapping(pairs) => {
                if let Some(pair) = pairs.iter().find(|p| contains(&p.key, offset, inclusive)) {
                    path.push(PathNode::Pair(pair));
                    path.push(PathNode::Node(&pair.key));
                    current = &pair.key;
                    continue;
                }
                if let Some(pair) = pairs.iter().find(|p| contains(&p.value, offset, inclusive)) {
                    path.push(PathNode::Pair(pair));
                    path.push(PathNode::Node(&pair.value));
                    current = &pair.value;
                    continue;
                }
                // Right after `key:` with nothing typed yet.
                let between = pairs.iter().find(|p| {
                    match (p.key.range.as_ref(), p.value.range.as_ref()) {
                        (Some(key), Some(value)) if key.end > 0 && value.start > 0 => {
                            range_contains(&(key.end..value.start - 1), offset, inclusive)
                        }
                        _ => false,
                    }
                });
                if let Some(pair) = between {
                    path.push(PathNode::Pair(pair));
                    path.push(PathNode::Node(&PLACEHOLDER));
                    return path;
                }
            }
            NodeKind::Sequence(items) => {
                if let Some(item) = items.iter().find(|n| contains(n, offset, inclusive)) {
                    path.push(PathNode::Node(item));
                    current = item;
                    continue;
                }
            }
            NodeKind::Scalar(_) => {
                if contains(current, offset, inclusive) {
                    return path;
                }
            }
        }
        // Cursor sits in indentation: nothing real here yet.
        path.push(PathNode::Node(&PLACEHOLDER));
        return path;
    }
}

/// Textual keys declared by a mapping, in declaration order.
pub fn map_keys(node: &Node) -> Vec<String> {
    node.as_mapping()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| pair.key.as_scalar().and_then(|s| s.value.to_text()))
                .filter(|key| !key.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::node::NodeType;
    use crate::yaml::parser::parse_all_documents;

    fn types(path: &Path<'_>) -> Vec<NodeType> {
        path.iter().map(PathNode::node_type).collect()
    }

    #[test]
    fn empty_text_has_no_path() {
        let docs = parse_all_documents("");
        assert!(path_at(&docs, 0, true).is_none());
    }

    #[test]
    fn key_offset_yields_pair_and_key() {
        let text = "- name: x\n  debug:\n    msg: hi\n";
        let docs = parse_all_documents(text);
        let offset = text.find("msg").unwrap() + 1;

        let path = path_at(&docs, offset, false).unwrap();

        assert_eq!(
            types(&path),
            vec![
                NodeType::Sequence,
                NodeType::Mapping,
                NodeType::Pair,
                NodeType::Mapping,
                NodeType::Pair,
                NodeType::Scalar,
            ]
        );
        assert_eq!(path.last().and_then(|n| n.as_node()).and_then(Node::as_str), Some("msg"));
    }

    #[test]
    fn value_offset_yields_pair_and_value() {
        let text = "key: value\n";
        let docs = parse_all_documents(text);

        let path = path_at(&docs, 7, false).unwrap();

        let last = path.last().and_then(|n| n.as_node()).unwrap();
        assert_eq!(last.as_str(), Some("value"));
    }

    #[test]
    fn gap_between_key_and_value_yields_placeholder() {
        let text = "key:     value\n";
        let docs = parse_all_documents(text);

        let path = path_at(&docs, 5, false).unwrap();

        assert_eq!(path.len(), 3);
        assert!(path[1].as_pair().is_some());
        assert!(path[2].same(&PathNode::Node(&PLACEHOLDER)));
    }

    #[test]
    fn inclusive_mode_accepts_end_boundary() {
        let text = "key: value";
        let docs = parse_all_documents(text);

        assert!(path_at(&docs, text.len(), false).is_none());
        let path = path_at(&docs, text.len(), true).unwrap();
        assert_eq!(path.last().and_then(|n| n.as_node()).and_then(Node::as_str), Some("value"));
    }

    #[test]
    fn map_keys_lists_declared_keys() {
        let docs = parse_all_documents("a: 1\nb: 2\n3: c\n");
        let root = docs[0].contents.as_ref().unwrap();

        assert_eq!(map_keys(root), vec!["a", "b", "3"]);
    }
}
