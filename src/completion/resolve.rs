//! Second completion phase: enriching a single chosen candidate.

use url::Url;

use super::candidate::CompletionCandidate;
use super::suffix::resolve_suffix;
use crate::context::AnalysisContext;
use crate::docs::format::format_module;
use crate::docs::library::BUILTIN_COLLECTION;
use crate::docs::module::split_fqcn;

/// Attaches documentation to a module candidate and settles between short
/// name and FQCN; recomputes the suffix of an option candidate. Candidates
/// without resolve data are returned unchanged.
pub async fn resolve(ctx: &AnalysisContext, mut candidate: CompletionCandidate) -> CompletionCandidate {
    let Some(data) = candidate.data.clone() else {
        return candidate;
    };
    let document = Url::parse(&data.document_uri)
        .inspect_err(|err| {
            log::warn!(target: "ansible_ls::completion", "Bad document uri {}: {}", data.document_uri, err);
        })
        .ok();

    if let Some(fqcn) = &data.module_fqcn {
        let lookup = ctx.find_module_in(fqcn, &[], document.as_ref()).await;
        if ctx.is_cancelled() {
            return candidate;
        }
        if let Some(module) = lookup.module
            && let Some(documentation) = module.documentation()
        {
            let (namespace, collection, name) = split_fqcn(fqcn);
            let owner = format!("{namespace}.{collection}");
            let mut use_fqcn = ctx.settings.ansible.use_fully_qualified_collection_names;
            if !use_fqcn {
                let metadata = match &document {
                    Some(document) => ctx.metadata_collections(document).await,
                    None => Vec::new(),
                };
                if ctx.is_cancelled() {
                    return candidate;
                }
                // The short name only works for collections in scope
                let in_scope = data
                    .inline_collections
                    .iter()
                    .map(String::as_str)
                    .chain([BUILTIN_COLLECTION])
                    .chain(metadata.iter().map(String::as_str))
                    .any(|c| c == owner);
                use_fqcn = !in_scope;
            }

            let insert_name = if use_fqcn { fqcn.as_str() } else { name };
            candidate.insert_text = if data.at_end_of_line {
                format!(
                    "{insert_name}:{}",
                    resolve_suffix(Some("dict"), data.first_element_of_list, data.playbook)
                )
            } else {
                insert_name.to_string()
            };
            candidate.snippet = candidate.range.is_some();
            let route = ctx.module_route(fqcn, document.as_ref()).await;
            candidate.documentation = Some(format_module(documentation, route.as_ref()));
        }
    }

    if let Some(option_type) = &data.option_type {
        candidate.insert_text = if data.at_end_of_line {
            format!(
                "{}:{}",
                candidate.label,
                resolve_suffix(Some(option_type), data.first_element_of_list, data.playbook)
            )
        } else {
            candidate.label.clone()
        };
    }
    candidate
}
