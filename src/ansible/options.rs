//! Module option lookup for keys below a task.

use std::sync::Arc;

use url::Url;

use super::classify::is_task;
use super::keywords::is_task_keyword;
use crate::context::AnalysisContext;
use crate::docs::{ModuleMetadata, OptionMap};
use crate::yaml::{AncestryCursor, Node, NodeType, Path, map_keys};

/// Shape of the value holding a nested option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Dict,
    List,
}

impl ContainerKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ContainerKind::Dict => "dict",
            ContainerKind::List => "list",
        }
    }
}

/// Walks up from a key to the task parameter (module name or `args`) it is
/// nested under. Returns the path of that task parameter and the trace of
/// option names passed on the way, nearest first.
pub fn task_param_path_with_trace<'a>(path: &Path<'a>) -> Option<(Path<'a>, Vec<(String, ContainerKind)>)> {
    let mut path = path.clone();
    let mut trace = Vec::new();
    while !is_task(&path, None) {
        let as_dict = AncestryCursor::new(&path)
            .parent_of_key()
            .parent_as(NodeType::Mapping)
            .get_key_path()
            .and_then(|p| string_key(&p).map(|key| (p, key, ContainerKind::Dict)));
        let step = as_dict.or_else(|| {
            AncestryCursor::new(&path)
                .parent_of_key()
                .parent_as(NodeType::Sequence)
                .parent_as(NodeType::Mapping)
                .get_key_path()
                .and_then(|p| string_key(&p).map(|key| (p, key, ContainerKind::List)))
        });
        let (parent, key, kind) = step?;
        trace.push((key, kind));
        path = parent;
    }
    Some((path, trace))
}

fn string_key(path: &Path<'_>) -> Option<String> {
    path.last()
        .and_then(|n| n.as_node())
        .and_then(Node::as_str)
        .map(str::to_string)
}

/// Options (or sub-options) that may be provided at the level of the key at
/// `path`, or `None` when the key is not below a documented module.
pub async fn options_for_path(ctx: &AnalysisContext, path: &Path<'_>, document: &Url) -> Option<OptionMap> {
    let (task_param_path, mut trace) = task_param_path_with_trace(path)?;
    // Module parameters are always given as a mapping
    match trace.pop() {
        Some((_, ContainerKind::Dict)) => {}
        _ => return None,
    }

    let task_param = string_key(&task_param_path)?;
    let module = if task_param == "args" {
        find_provided_module(ctx, &task_param_path, document).await?
    } else {
        ctx.find_module(&task_param, &task_param_path, document).await.module?
    };
    let documentation = module.documentation()?;

    let mut options = &documentation.options;
    for (name, kind) in trace.iter().rev() {
        let option = options.get(name)?;
        if option.type_name() != Some(kind.type_name()) || option.suboptions.is_empty() {
            return None;
        }
        options = &option.suboptions;
    }
    Some(options.clone())
}

/// The module invoked by the task owning the key at `task_param_path`: the
/// first task key that is not a task keyword and names a known module.
pub async fn find_provided_module(
    ctx: &AnalysisContext,
    task_param_path: &Path<'_>,
    document: &Url,
) -> Option<Arc<ModuleMetadata>> {
    let task = AncestryCursor::new(task_param_path)
        .parent_as(NodeType::Mapping)
        .node()?;
    for name in map_keys(task).into_iter().filter(|key| !is_task_keyword(key)) {
        if let Some(module) = ctx.find_module(&name, task_param_path, document).await.module {
            return Some(module);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::{parse_all_documents, path_at};

    fn trace_at(text: &str, needle: &str) -> Option<(String, Vec<(String, ContainerKind)>)> {
        let docs = parse_all_documents(text);
        let path = path_at(&docs, text.find(needle).unwrap(), false).unwrap();
        task_param_path_with_trace(&path).map(|(p, trace)| (string_key(&p).unwrap(), trace))
    }

    #[test]
    fn trace_records_dicts_and_lists() {
        let text = "\
- name: t
  ns.col.mod:
    outer:
      - inner:
          leaf: 1
";
        let (module, trace) = trace_at(text, "leaf").unwrap();

        assert_eq!(module, "ns.col.mod");
        assert_eq!(
            trace,
            vec![
                ("inner".to_string(), ContainerKind::Dict),
                ("outer".to_string(), ContainerKind::List),
                ("ns.col.mod".to_string(), ContainerKind::Dict),
            ]
        );
    }

    #[test]
    fn task_keys_have_an_empty_trace() {
        let (module, trace) = trace_at("- debug:\n    msg: x\n", "debug").unwrap();

        assert_eq!(module, "debug");
        assert!(trace.is_empty());
    }

    #[test]
    fn keys_outside_tasks_have_no_task_param() {
        assert!(trace_at("vars:\n  a:\n    b: 1\n", "b").is_none());
    }
}
