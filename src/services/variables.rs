//! Variables visible at a position of a playbook.

use std::path::{Path as FsPath, PathBuf};

use async_trait::async_trait;
use url::Url;

use super::RankedName;
use crate::ansible::classify::is_play;
use crate::error::AnsibleLsResult;
use crate::yaml::{AncestryCursor, Node, NodeType, Path, PathNode, map_keys};

#[async_trait]
pub trait VariableProvider: Send + Sync {
    /// Variables in scope at `path`, nearest scope first.
    async fn variables_in_scope(&self, document: &Url, path: &Path<'_>) -> AnsibleLsResult<Vec<RankedName>>;
}

/// Walks from the cursor up to the play, collecting `vars` of every scope on
/// the way, then the play's `vars_prompt` and `vars_files`. Each scope ranks
/// one lower than the one below it.
#[derive(Debug, Default)]
pub struct ScopedVariables;

impl ScopedVariables {
    pub fn new() -> Self {
        Self
    }
}

/// Scope maps between `path` and its play, nearest first. `None` when the
/// path does not lead to a play.
fn scopes<'a>(path: &Path<'a>) -> Option<(Vec<&'a Node>, &'a Node)> {
    let mut path = path.clone();
    let mut found = Vec::new();
    while !is_play(&path, None).is_true() {
        let as_dict = AncestryCursor::new(&path)
            .parent_as(NodeType::Mapping)
            .parent_as(NodeType::Mapping)
            .get_key_path();
        let as_list = || {
            AncestryCursor::new(&path)
                .parent_as(NodeType::Mapping)
                .parent_as(NodeType::Sequence)
                .parent_as(NodeType::Mapping)
                .get_key_path()
        };
        let next = as_dict
            .filter(|p| ends_in_string_key(p))
            .or_else(|| as_list().filter(|p| ends_in_string_key(p)))?;
        found.push(owning_map(&next)?);
        path = next;
    }
    let play = owning_map(&path)?;
    Some((found, play))
}

fn ends_in_string_key(path: &Path<'_>) -> bool {
    path.last().and_then(|n| n.as_node()).and_then(Node::as_str).is_some()
}

/// The mapping a key path's key belongs to (`..., Mapping, Pair, key`).
fn owning_map<'a>(key_path: &Path<'a>) -> Option<&'a Node> {
    key_path
        .len()
        .checked_sub(3)
        .and_then(|i| key_path.get(i))
        .and_then(PathNode::as_node)
}

/// Keys of a `vars` value: a mapping, or a list of mappings.
fn vars_keys(vars: &Node) -> Vec<String> {
    match vars.as_sequence() {
        Some(items) => items.iter().flat_map(map_keys).collect(),
        None => map_keys(vars),
    }
}

/// Variable names of a vars file: the keys of a mapping or of each mapping
/// in a list.
pub fn parse_vars_file(text: &str) -> AnsibleLsResult<Vec<String>> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    let keys = |map: &serde_yaml::Mapping| -> Vec<String> {
        map.keys().filter_map(|k| k.as_str().map(str::to_string)).collect()
    };
    Ok(match &value {
        serde_yaml::Value::Mapping(map) => keys(map),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .filter_map(serde_yaml::Value::as_mapping)
            .flat_map(keys)
            .collect(),
        _ => Vec::new(),
    })
}

fn resolve_vars_file(document: &Url, file: &str) -> Option<PathBuf> {
    let file = FsPath::new(file);
    if file.is_absolute() {
        return Some(file.to_path_buf());
    }
    let document = document.to_file_path().ok()?;
    Some(document.parent()?.join(file))
}

#[async_trait]
impl VariableProvider for ScopedVariables {
    async fn variables_in_scope(&self, document: &Url, path: &Path<'_>) -> AnsibleLsResult<Vec<RankedName>> {
        let Some((scope_maps, play)) = scopes(path) else {
            return Ok(Vec::new());
        };

        let mut variables = Vec::new();
        let mut rank = 0;
        for scope in scope_maps {
            rank += 1;
            if let Some(vars) = scope.get("vars") {
                variables.extend(vars_keys(vars).into_iter().map(|v| RankedName::new(v, rank)));
            }
        }

        rank += 1;
        if let Some(prompts) = play.get("vars_prompt").and_then(Node::as_sequence) {
            variables.extend(
                prompts
                    .iter()
                    .filter_map(|prompt| prompt.get("name")?.as_scalar()?.value.to_text())
                    .map(|name| RankedName::new(name, rank)),
            );
        }

        rank += 1;
        let files = play
            .get("vars_files")
            .and_then(Node::as_sequence)
            .unwrap_or_default()
            .iter()
            .filter_map(Node::as_str)
            .filter_map(|file| resolve_vars_file(document, file));
        for file in files {
            let text = match tokio::fs::read_to_string(&file).await {
                Ok(text) => text,
                Err(err) => {
                    log::debug!(target: "ansible_ls::variables", "Skipping {}: {}", file.display(), err);
                    continue;
                }
            };
            match parse_vars_file(&text) {
                Ok(names) => variables.extend(names.into_iter().map(|v| RankedName::new(v, rank))),
                Err(err) => log::warn!(
                    target: "ansible_ls::variables",
                    "Failed to parse vars file {}: {}",
                    file.display(),
                    err
                ),
            }
        }
        Ok(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{parse_all_documents, path_at};
    use tempfile::TempDir;

    const PLAYBOOK: &str = "\
- hosts: all
  vars:
    play_var: 1
  vars_prompt:
    - name: secret
  vars_files:
    - common.yml
  tasks:
    - name: t
      vars:
        task_var: 2
      debug:
        msg: \"{{ x }}\"
";

    #[tokio::test]
    async fn collects_scopes_prompts_and_files() {
        // Given a playbook next to a vars file
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("common.yml"), "file_var: 3\n").unwrap();
        let uri = Url::from_file_path(dir.path().join("site.yml")).unwrap();
        let docs = parse_all_documents(PLAYBOOK);
        let path = path_at(&docs, PLAYBOOK.find("x }}").unwrap(), false).unwrap();

        // When variables are collected at the jinja expression
        let vars = ScopedVariables::new().variables_in_scope(&uri, &path).await.unwrap();

        // Then nearer scopes rank first
        assert_eq!(
            vars,
            vec![
                RankedName::new("task_var", 1),
                RankedName::new("play_var", 2),
                RankedName::new("secret", 3),
                RankedName::new("file_var", 4),
            ]
        );
    }

    #[tokio::test]
    async fn paths_outside_a_play_have_no_variables() {
        let text = "key:\n  nested: \"{{ x }}\"\n";
        let docs = parse_all_documents(text);
        let path = path_at(&docs, text.find("x }}").unwrap(), false).unwrap();
        let uri = Url::parse("file:///tmp/vars.yml").unwrap();

        let vars = ScopedVariables::new().variables_in_scope(&uri, &path).await.unwrap();

        assert!(vars.is_empty());
    }

    #[test]
    fn vars_files_may_be_mappings_or_lists() {
        assert_eq!(parse_vars_file("a: 1\nb: 2\n").unwrap(), vec!["a", "b"]);
        assert_eq!(parse_vars_file("- a: 1\n- b: 2\n").unwrap(), vec!["a", "b"]);
        assert!(parse_vars_file("just text").unwrap().is_empty());
    }
}
