//! Completion candidates for a cursor position.

use serde_json::Value;
use url::Url;

use super::candidate::{
    CandidateData, CandidateKind, CompletionCandidate, indexed_sort_text, priority, ranked_sort_text,
};
use super::prepare::{PreparedSource, at_end_of_line, first_element_of_list, prepare};
use super::suffix::resolve_suffix;
use crate::ansible::classify::{PlayClassification, StructuralRole, classify, is_play};
use crate::ansible::collections::declared_collections;
use crate::ansible::keywords::{BLOCK_KEYWORDS, PLAY_KEYWORDS, ROLE_KEYWORDS, TASK_KEYWORDS, play_without_task};
use crate::ansible::options::{find_provided_module, options_for_path};
use crate::ansible::playbook::{cursor_inside_jinja, is_playbook};
use crate::context::AnalysisContext;
use crate::docs::format::{format_option, option_details, value_text};
use crate::docs::module::split_fqcn;
use crate::services::RankedName;
use crate::yaml::{AncestryCursor, ByteRange, Node, NodeType, Path, map_keys, parse_all_documents, path_at};

/// State shared by the branches of one completion request.
struct Request<'r> {
    ctx: &'r AnalysisContext,
    document: &'r Url,
    /// Original, unpatched text.
    text: &'r str,
    prepared: PreparedSource,
    playbook: bool,
    at_end_of_line: bool,
}

impl Request<'_> {
    /// Replacement span of a string scalar, in original offsets.
    fn node_range(&self, node: Option<&Node>) -> Option<ByteRange> {
        let node = node?;
        node.as_str()?;
        node.range.as_ref().map(|range| self.prepared.original_range(range))
    }

    fn data(&self, first_element_of_list: bool) -> CandidateData {
        CandidateData {
            document_uri: self.document.to_string(),
            at_end_of_line: self.at_end_of_line,
            first_element_of_list,
            playbook: self.playbook,
            ..Default::default()
        }
    }
}

fn last_node<'a>(path: &Path<'a>) -> Option<&'a Node> {
    path.last().and_then(|n| n.as_node())
}

/// Candidates for the cursor at byte `offset` of `text`. Every failure along
/// the way yields fewer candidates, never an error.
pub async fn complete(ctx: &AnalysisContext, document: &Url, text: &str, offset: usize) -> Vec<CompletionCandidate> {
    let playbook = is_playbook(&parse_all_documents(text));
    let prepared = prepare(text, offset);
    let documents = parse_all_documents(&prepared.text);
    // Inclusive: the cursor sits right after the character it touches
    let Some(path) = path_at(&documents, prepared.offset, true) else {
        return Vec::new();
    };
    let request = Request {
        ctx,
        document,
        text,
        at_end_of_line: at_end_of_line(text, prepared.offset),
        prepared,
        playbook,
    };

    let candidates = match classify(&path, Some(document.as_str())) {
        StructuralRole::Play => keyword_candidates(&request, &path, PLAY_KEYWORDS.iter()),
        StructuralRole::Block => keyword_candidates(&request, &path, BLOCK_KEYWORDS.iter()),
        StructuralRole::Role => keyword_candidates(&request, &path, ROLE_KEYWORDS.iter()),
        StructuralRole::Task { play } => task_candidates(&request, &path, play).await,
        StructuralRole::Unresolved => parameter_candidates(&request, &path).await,
    };
    if ctx.is_cancelled() {
        log::debug!(target: "ansible_ls::completion", "Completion for {} cancelled", document);
        return Vec::new();
    }
    log::debug!(
        target: "ansible_ls::completion",
        "{} candidates at {}:{}",
        candidates.len(),
        document,
        offset
    );
    candidates
}

fn keyword_candidates<'k>(
    request: &Request<'_>,
    path: &Path<'_>,
    keywords: impl Iterator<Item = (&'k str, &'k str)>,
) -> Vec<CompletionCandidate> {
    let provided = AncestryCursor::new(path)
        .parent_as(NodeType::Mapping)
        .node()
        .map(map_keys)
        .unwrap_or_default();
    let range = request.node_range(last_node(path));

    keywords
        .filter(|(keyword, _)| !provided.iter().any(|p| p.as_str() == *keyword))
        .map(|(keyword, description)| {
            let rank = if keyword == "name" {
                priority::NAME_KEYWORD
            } else {
                priority::KEYWORD
            };
            let insert_text = if request.at_end_of_line {
                format!("{keyword}:")
            } else {
                keyword.to_string()
            };
            CompletionCandidate::new(keyword, CandidateKind::Property, ranked_sort_text(rank, keyword))
                .with_insert_text(insert_text)
                .with_range(range.clone())
                .with_documentation(Some(description.to_string()))
        })
        .collect()
}

async fn task_candidates(
    request: &Request<'_>,
    path: &Path<'_>,
    play: PlayClassification,
) -> Vec<CompletionCandidate> {
    let mut candidates = keyword_candidates(request, path, TASK_KEYWORDS.iter());
    if play == PlayClassification::Undetermined {
        // The mapping can still turn into a play
        candidates.extend(keyword_candidates(request, path, play_without_task()));
    }

    // The marker is part of the key under the cursor, so that key never
    // resolves to a module here.
    if find_provided_module(request.ctx, path, request.document).await.is_some() {
        return candidates;
    }
    let block = BLOCK_KEYWORDS.iter().filter(|(keyword, _)| *keyword == "block");
    candidates.extend(keyword_candidates(request, path, block));
    candidates.extend(module_candidates(request, path).await);
    candidates
}

async fn module_candidates(request: &Request<'_>, path: &Path<'_>) -> Vec<CompletionCandidate> {
    let ctx = request.ctx;
    let settings = &ctx.settings;
    let use_fqcn = settings.ansible.use_fully_qualified_collection_names;
    let inline_collections = declared_collections(path);
    let range = request.node_range(last_node(path));
    let first_element = first_element_of_list(request.text, range.as_ref());

    let fqcns = match ctx.docs.module_fqcns(request.document).await {
        Ok(fqcns) => fqcns,
        Err(err) => {
            log::warn!(target: "ansible_ls::completion", "Module names unavailable: {}", err);
            return Vec::new();
        }
    };

    let mut candidates = Vec::with_capacity(fqcns.len());
    for fqcn in fqcns {
        let redirected = ctx
            .module_route(&fqcn, Some(request.document))
            .await
            .is_some_and(|route| route.redirect.is_some());
        if redirected && !settings.completion.provide_redirect_modules {
            continue;
        }
        let (rank, kind) = if redirected {
            (priority::REDIRECTED_MODULE, CandidateKind::Reference)
        } else {
            (priority::MODULE, CandidateKind::Class)
        };
        let (namespace, collection, name) = split_fqcn(&fqcn);
        let label = if use_fqcn { fqcn.as_str() } else { name };
        let insert_text = if request.at_end_of_line {
            format!("{label}:{}", resolve_suffix(Some("dict"), first_element, request.playbook))
        } else {
            label.to_string()
        };
        // Short name first so it wins fuzzy matching either way
        let filter_text = if use_fqcn {
            format!("{name} {fqcn} {collection} {namespace}")
        } else {
            format!("{name} {fqcn}")
        };

        let mut candidate = CompletionCandidate::new(label, kind, ranked_sort_text(rank, label))
            .with_insert_text(insert_text)
            .with_range(range.clone())
            .with_detail(Some(format!("{namespace}.{collection}")))
            .with_data(CandidateData {
                module_fqcn: Some(fqcn.clone()),
                inline_collections: inline_collections.clone(),
                ..request.data(first_element)
            });
        candidate.filter_text = Some(filter_text);
        candidates.push(candidate);
    }
    candidates
}

/// Keys and values below the task level: variables inside expressions,
/// module options, option values and inventory hosts, in that order.
async fn parameter_candidates(request: &Request<'_>, path: &Path<'_>) -> Vec<CompletionCandidate> {
    let ctx = request.ctx;
    if request.playbook && cursor_inside_jinja(request.text, request.prepared.offset, path.last()) {
        let variables = ctx.variables_in_scope(request.document, path).await;
        return ranked_names(variables, |_| CandidateKind::Variable);
    }

    if let Some(candidates) = option_candidates(request, path).await {
        return candidates;
    }
    if ctx.is_cancelled() {
        return Vec::new();
    }

    let key_path = value_key_path(path);
    if let Some(key_path) = &key_path
        && let Some(candidates) = value_candidates(request, path, key_path).await
    {
        return candidates;
    }

    if let Some(key_path) = &key_path
        && wants_hosts(key_path, request.document)
    {
        return ranked_names(ctx.hosts().await, |rank| {
            if rank <= 2 {
                CandidateKind::Variable
            } else {
                CandidateKind::Value
            }
        });
    }
    Vec::new()
}

fn ranked_names(names: Vec<RankedName>, kind: impl Fn(u32) -> CandidateKind) -> Vec<CompletionCandidate> {
    names
        .into_iter()
        .map(|entry| {
            let sort_text = ranked_sort_text(entry.rank, &entry.name);
            CompletionCandidate::new(entry.name, kind(entry.rank), sort_text)
        })
        .collect()
}

async fn option_candidates(request: &Request<'_>, path: &Path<'_>) -> Option<Vec<CompletionCandidate>> {
    let options = options_for_path(request.ctx, path, request.document).await?;
    if options.is_empty() {
        return None;
    }
    let provided = AncestryCursor::new(path)
        .parent_of_key()
        .node()
        .map(map_keys)
        .unwrap_or_default();
    let provide_aliases = request.ctx.settings.completion.provide_module_option_aliases;
    let range = request.node_range(last_node(path));
    let first_element = first_element_of_list(request.text, range.as_ref());

    let candidates = options
        .iter()
        .filter(|(_, option)| !provided.contains(&option.name))
        .filter(|(key, option)| provide_aliases || *key == option.name)
        .enumerate()
        .map(|(index, (key, option))| {
            let is_alias = key != option.name;
            let (rank, kind) = if is_alias {
                (priority::ALIAS_OPTION, CandidateKind::Reference)
            } else if option.required {
                (priority::REQUIRED_OPTION, CandidateKind::Property)
            } else {
                (priority::OPTION, CandidateKind::Property)
            };
            let insert_text = if request.at_end_of_line {
                format!("{key}:")
            } else {
                key.to_string()
            };
            CompletionCandidate::new(key, kind, indexed_sort_text(rank, index))
                .with_insert_text(insert_text)
                .with_range(range.clone())
                .with_detail(option_details(option))
                .with_documentation(Some(format_option(option, false)))
                .with_data(CandidateData {
                    option_type: option.option_type.clone(),
                    ..request.data(first_element)
                })
        })
        .collect();
    Some(candidates)
}

/// Path of the key whose value is being typed. When the marker opened a
/// nested mapping below an empty value, the key sits one mapping higher.
fn value_key_path<'a>(path: &Path<'a>) -> Option<Path<'a>> {
    let owner = AncestryCursor::new(path).parent_as(NodeType::Mapping);
    if owner.get_value().is_none_or(Node::is_null) {
        owner.parent_as(NodeType::Mapping).get_key_path()
    } else {
        owner.get_key_path()
    }
}

async fn value_candidates(
    request: &Request<'_>,
    path: &Path<'_>,
    key_path: &Path<'_>,
) -> Option<Vec<CompletionCandidate>> {
    let key = last_node(key_path)?.as_str()?;
    let options = options_for_path(request.ctx, key_path, request.document).await?;
    let option = options.get(key)?;

    let is_bool = option.type_name() == Some("bool");
    let default = match &option.default {
        // `yes`/`no` defaults stay strings under the YAML 1.2 core schema
        Some(Value::String(text)) if is_bool => Some(Value::Bool(matches!(
            text.to_ascii_lowercase().as_str(),
            "yes" | "y" | "true" | "on"
        ))),
        other => other.clone(),
    };
    let choices = match (&option.choices, &default) {
        (Some(choices), _) => choices.clone(),
        (None, _) if is_bool => vec![Value::Bool(true), Value::Bool(false)],
        (None, Some(default)) => vec![default.clone()],
        (None, None) => Vec::new(),
    };

    let range = request.node_range(last_node(path));
    let candidates = choices
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let is_default = default.as_ref() == Some(choice);
            let rank = if is_default {
                priority::DEFAULT_CHOICE
            } else {
                priority::CHOICE
            };
            CompletionCandidate::new(value_text(choice), CandidateKind::Value, indexed_sort_text(rank, index))
                .with_range(range.clone())
                .with_detail(is_default.then(|| "default".to_string()))
        })
        .collect();
    Some(candidates)
}

/// `hosts` of a play, or `ansible_host` inside a `vars` mapping.
fn wants_hosts(key_path: &Path<'_>, document: &Url) -> bool {
    match last_node(key_path).and_then(Node::as_str) {
        Some("hosts") => is_play(key_path, Some(document.as_str())).is_true(),
        Some("ansible_host") => {
            AncestryCursor::new(key_path)
                .parent()
                .parent_as(NodeType::Mapping)
                .get_string_key()
                == Some("vars")
        }
        _ => false,
    }
}
