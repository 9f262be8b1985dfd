//! Collections declared with the `collections:` keyword.

use crate::yaml::{AncestryCursor, Node, NodeType, Path};

const BLOCK_KEYS: &[&str] = &["block", "rescue", "always"];

/// Collections declared for the task owning the key at `module_path`: on the
/// task itself, on every enclosing block, and on the play. Deduplicated,
/// nearest scope first.
pub fn declared_collections(module_path: &Path<'_>) -> Vec<String> {
    let mut declared = Vec::new();
    let task = AncestryCursor::new(module_path).parent_as(NodeType::Mapping);
    collect_from(task.node(), &mut declared);

    let mut path = task.get_path();
    loop {
        let Some(current) = path.as_ref() else {
            break;
        };
        let owner = AncestryCursor::new(current)
            .parent_as(NodeType::Sequence)
            .parent_as(NodeType::Mapping);
        match owner.get_string_key() {
            Some(key) if BLOCK_KEYS.contains(&key) => {
                collect_from(owner.node(), &mut declared);
                path = owner.get_path();
            }
            _ => break,
        }
    }

    if let Some(current) = path.as_ref() {
        let play = AncestryCursor::new(current)
            .parent_as(NodeType::Sequence)
            .parent_as(NodeType::Mapping);
        collect_from(play.node(), &mut declared);
    }
    declared
}

fn collect_from(map: Option<&Node>, declared: &mut Vec<String>) {
    let Some(items) = map.and_then(|m| m.get("collections")).and_then(Node::as_sequence) else {
        return;
    };
    for name in items.iter().filter_map(|item| item.as_scalar()?.value.to_text()) {
        if !declared.contains(&name) {
            declared.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{parse_all_documents, path_at};

    #[test]
    fn walks_blocks_up_to_the_play() {
        let text = "\
- hosts: all
  collections: [play.col, shared.col]
  tasks:
    - block:
        - ping:
          collections:
            - task.col
      collections:
        - block.col
        - shared.col
";
        let docs = parse_all_documents(text);
        let path = path_at(&docs, text.find("ping").unwrap(), false).unwrap();

        assert_eq!(
            declared_collections(&path),
            vec!["task.col", "block.col", "shared.col", "play.col"]
        );
    }

    #[test]
    fn root_task_list_declares_nothing() {
        let text = "- debug:\n";
        let docs = parse_all_documents(text);
        let path = path_at(&docs, 2, false).unwrap();

        assert!(declared_collections(&path).is_empty());
    }
}
