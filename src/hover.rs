//! Documentation for the key under the cursor.

use url::Url;

use crate::ansible::classify::{is_block, is_play, is_role, is_task};
use crate::ansible::keywords::{BLOCK_KEYWORDS, PLAY_KEYWORDS, ROLE_KEYWORDS, TASK_KEYWORDS, Vocabulary, is_task_keyword};
use crate::ansible::options::options_for_path;
use crate::context::AnalysisContext;
use crate::docs::format::{format_module, format_option, format_tombstone};
use crate::yaml::{AncestryCursor, ByteRange, Node, parse_all_documents, path_at};

/// Markdown to show and the source span it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub contents: String,
    pub range: Option<ByteRange>,
}

/// Hover for keyword, module and option keys. Values are never hovered.
pub async fn hover_info(ctx: &AnalysisContext, document: &Url, text: &str, offset: usize) -> Option<HoverInfo> {
    let documents = parse_all_documents(text);
    let path = path_at(&documents, offset, false)?;
    let node = path.last()?.as_node()?;
    let key = node.as_str()?;
    // A key has a mapping two steps up; a value's pair is its direct parent
    AncestryCursor::new(&path).parent_of_key().get()?;
    let uri = Some(document.as_str());

    if is_play(&path, uri).is_true() {
        return keyword_hover(&PLAY_KEYWORDS, node, key);
    }
    if is_block(&path) {
        return keyword_hover(&BLOCK_KEYWORDS, node, key);
    }
    if is_role(&path) {
        return keyword_hover(&ROLE_KEYWORDS, node, key);
    }
    if is_task(&path, uri) {
        if is_task_keyword(key) {
            return keyword_hover(&TASK_KEYWORDS, node, key);
        }
        let lookup = ctx.find_module(key, &path, document).await;
        let route = ctx
            .module_route(lookup.fqcn.as_deref().unwrap_or(key), Some(document))
            .await;
        if let Some(module) = &lookup.module
            && let Some(documentation) = module.documentation()
        {
            return Some(HoverInfo {
                contents: format_module(documentation, route.as_ref()),
                range: node.range.clone(),
            });
        }
        if lookup.fqcn.is_some()
            && let Some(route) = route
        {
            return Some(HoverInfo {
                contents: format_tombstone(&route),
                range: node.range.clone(),
            });
        }
    }

    let options = options_for_path(ctx, &path, document).await?;
    let option = options.get(key)?;
    Some(HoverInfo {
        contents: format_option(option, true),
        range: node.range.clone(),
    })
}

fn keyword_hover(keywords: &Vocabulary, node: &Node, key: &str) -> Option<HoverInfo> {
    keywords.get(key).map(|description| HoverInfo {
        contents: description.to_string(),
        range: node.range.clone(),
    })
}
