//! Structural classification of a mapping key.
//!
//! Every predicate takes a path ending in a mapping key (a prospective
//! parameter name) and asks what kind of Ansible construct owns that key.

use std::sync::LazyLock;

use regex::Regex;

use super::keywords::is_play_exclusive;
use crate::yaml::{AncestryCursor, NodeType, Path, map_keys};

/// Keys that hold a list of tasks.
pub const TASK_LIST_KEYS: &[&str] = &[
    "tasks",
    "pre_tasks",
    "post_tasks",
    "block",
    "rescue",
    "always",
    "handlers",
];

static ROLE_TASKS_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/roles/[^/]+/tasks/").expect("valid regex for role tasks uri"));

/// Play classification is tri-state: a mapping at the root of a sequence
/// may still become a play once a play-only keyword is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayClassification {
    True,
    False,
    Undetermined,
}

impl PlayClassification {
    pub fn is_true(self) -> bool {
        self == PlayClassification::True
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRole {
    Play,
    Block,
    Role,
    /// A task key. `play` records whether the mapping could still turn out
    /// to be a play.
    Task { play: PlayClassification },
    Unresolved,
}

/// Whether the key belongs to a play. `document_uri` helps when the tree
/// gives no clue: files under `roles/*/tasks/` never hold plays.
pub fn is_play(path: &Path<'_>, document_uri: Option<&str>) -> PlayClassification {
    let at_root = AncestryCursor::new(path)
        .parent_of_key()
        .parent_as(NodeType::Sequence)
        .get_path()
        .is_some_and(|p| p.len() == 1);
    if !at_root {
        return PlayClassification::False;
    }

    let declares_play_keyword = AncestryCursor::new(path)
        .parent_of_key()
        .node()
        .is_some_and(|map| map_keys(map).iter().any(|key| is_play_exclusive(key)));
    if declares_play_keyword {
        return PlayClassification::True;
    }
    if document_uri.is_some_and(|uri| ROLE_TASKS_URI.is_match(uri)) {
        return PlayClassification::False;
    }
    PlayClassification::Undetermined
}

/// Whether the key belongs to a `block:` mapping inside some list.
pub fn is_block(path: &Path<'_>) -> bool {
    let cursor = AncestryCursor::new(path).parent_of_key();
    let Some(map) = cursor.node() else {
        return false;
    };
    cursor.parent_as(NodeType::Sequence).is_valid() && map_keys(map).iter().any(|key| key == "block")
}

/// Whether the key belongs to an entry of a play's `roles:` list.
pub fn is_role(path: &Path<'_>) -> bool {
    AncestryCursor::new(path)
        .parent_of_key()
        .parent_as(NodeType::Sequence)
        .parent_as(NodeType::Mapping)
        .get_string_key()
        == Some("roles")
}

/// Whether the key is a task parameter: a module name or a task keyword.
pub fn is_task(path: &Path<'_>, document_uri: Option<&str>) -> bool {
    let Some(task_list) = AncestryCursor::new(path)
        .parent_of_key()
        .parent_as(NodeType::Sequence)
        .get_path()
    else {
        return false;
    };
    if is_play(path, document_uri).is_true() || is_block(path) || is_role(path) {
        return false;
    }
    if task_list.len() == 1 {
        return true;
    }
    AncestryCursor::new(&task_list)
        .parent_as(NodeType::Mapping)
        .get_string_key()
        .is_some_and(|key| TASK_LIST_KEYS.contains(&key))
}

/// Runs the classifiers in their precedence order.
pub fn classify(path: &Path<'_>, document_uri: Option<&str>) -> StructuralRole {
    let play = is_play(path, document_uri);
    if play.is_true() {
        StructuralRole::Play
    } else if is_block(path) {
        StructuralRole::Block
    } else if is_role(path) {
        StructuralRole::Role
    } else if is_task(path, document_uri) {
        StructuralRole::Task { play }
    } else {
        StructuralRole::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{parse_all_documents, path_at};
    use rstest::rstest;

    const PLAYBOOK: &str = "\
- hosts: web
  roles:
    - role: common
  tasks:
    - name: ping
      ansible.builtin.ping:
    - block:
        - debug:
      rescue: []
";

    fn classify_at(text: &str, needle: &str, uri: Option<&str>) -> StructuralRole {
        let offset = text.find(needle).unwrap();
        let docs = parse_all_documents(text);
        let path = path_at(&docs, offset, false).unwrap();
        classify(&path, uri)
    }

    #[rstest]
    #[case::play_key("hosts", StructuralRole::Play)]
    #[case::role_entry("role:", StructuralRole::Role)]
    #[case::block_key("block", StructuralRole::Block)]
    #[case::rescue_is_block_key("rescue", StructuralRole::Block)]
    #[case::task_keyword("name: ping", StructuralRole::Task { play: PlayClassification::False })]
    #[case::module_in_block("debug", StructuralRole::Task { play: PlayClassification::False })]
    #[case::module_value_is_not_a_key("web", StructuralRole::Unresolved)]
    fn classifies_playbook_keys(#[case] needle: &str, #[case] expected: StructuralRole) {
        assert_eq!(classify_at(PLAYBOOK, needle, None), expected);
    }

    #[test]
    fn root_task_list_is_undetermined_play() {
        let text = "- name: x\n  debug:\n";

        assert_eq!(
            classify_at(text, "debug", None),
            StructuralRole::Task {
                play: PlayClassification::Undetermined
            }
        );
    }

    #[test]
    fn role_tasks_file_is_never_a_play() {
        let text = "- name: x\n  debug:\n";

        assert_eq!(
            classify_at(text, "debug", Some("file:///p/roles/web/tasks/main.yml")),
            StructuralRole::Task {
                play: PlayClassification::False
            }
        );
    }

    #[test]
    fn vars_entries_are_not_tasks() {
        let text = "- hosts: all\n  vars:\n    answer: 42\n";
        assert_eq!(classify_at(text, "answer", None), StructuralRole::Unresolved);
    }

    #[test]
    fn nested_task_list_requires_task_list_key() {
        let text = "- hosts: all\n  tasks:\n    - debug:\n  notes:\n    - debug:\n";
        let tasks = text.find("debug").unwrap();
        let other = text.rfind("debug").unwrap();
        let docs = parse_all_documents(text);

        let task_path = path_at(&docs, tasks, false).unwrap();
        let other_path = path_at(&docs, other, false).unwrap();

        assert!(is_task(&task_path, None));
        assert!(!is_task(&other_path, None));
    }
}
