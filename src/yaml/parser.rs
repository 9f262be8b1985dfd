//! Tolerant YAML parsing on top of tree-sitter-yaml.
//!
//! tree-sitter never refuses input: malformed regions surface as `ERROR` or
//! missing nodes inside an otherwise usable tree. The conversion below keeps
//! whatever structure survives and records the broken regions as
//! [`ParseError`]s, so callers always get a best-effort [`Document`].

use tree_sitter::{Node as TsNode, Parser};

use super::node::{ByteRange, Document, Node, Pair, ParseError, ScalarValue};

/// Parses every `---` separated segment of `text`.
///
/// Returns an empty list for blank input. Never panics on malformed YAML.
pub fn parse_all_documents(text: &str) -> Vec<Document> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&tree_sitter_yaml::LANGUAGE.into()) {
        log::error!(target: "ansible_ls::yaml", "Failed to load YAML grammar: {}", err);
        return Vec::new();
    }
    let Some(tree) = parser.parse(text, None) else {
        log::warn!(target: "ansible_ls::yaml", "tree-sitter returned no tree");
        return Vec::new();
    };

    let root = tree.root_node();
    let mut errors = Vec::new();
    collect_errors(root, &mut errors);

    let mut documents: Vec<(ByteRange, Document)> = Vec::new();
    for child in named_children(root) {
        match child.kind() {
            "document" => {
                let contents = named_children(child)
                    .into_iter()
                    .filter(|n| n.kind() != "comment")
                    .find_map(|n| convert(n, text));
                documents.push((
                    byte_range(child),
                    Document {
                        contents,
                        errors: Vec::new(),
                    },
                ));
            }
            "ERROR" => documents.push((
                byte_range(child),
                Document {
                    contents: salvage(child, text),
                    errors: Vec::new(),
                },
            )),
            _ => {}
        }
    }

    if documents.is_empty() {
        if errors.is_empty() {
            return Vec::new();
        }
        return vec![Document {
            contents: None,
            errors,
        }];
    }

    for error in errors {
        let owner = documents
            .iter()
            .position(|(range, _)| range.start <= error.range.start && error.range.start <= range.end)
            .unwrap_or(0);
        documents[owner].1.errors.push(error);
    }

    documents.into_iter().map(|(_, doc)| doc).collect()
}

fn named_children(node: TsNode<'_>) -> Vec<TsNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn byte_range(node: TsNode<'_>) -> ByteRange {
    node.start_byte()..node.end_byte()
}

fn node_text<'a>(node: TsNode<'_>, text: &'a str) -> &'a str {
    text.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

fn collect_errors(node: TsNode<'_>, errors: &mut Vec<ParseError>) {
    if node.is_error() {
        errors.push(ParseError {
            range: byte_range(node),
            name: "SyntaxError",
        });
    } else if node.is_missing() {
        errors.push(ParseError {
            range: byte_range(node),
            name: "MissingToken",
        });
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, errors);
    }
}

fn convert(node: TsNode<'_>, text: &str) -> Option<Node> {
    match node.kind() {
        "block_node" | "flow_node" => {
            let content = named_children(node)
                .into_iter()
                .filter(|n| !matches!(n.kind(), "anchor" | "tag" | "comment"))
                .find_map(|n| convert(n, text));
            // A node consisting of only a tag or anchor is an explicit null.
            Some(content.unwrap_or_else(|| {
                Node::scalar(ScalarValue::Null, node_text(node, text), byte_range(node))
            }))
        }
        "block_mapping" => {
            let mut pairs = Vec::new();
            for child in named_children(node) {
                match child.kind() {
                    "block_mapping_pair" => pairs.push(convert_pair(child, text)),
                    "ERROR" => pairs.extend(
                        named_children(child)
                            .into_iter()
                            .filter(|n| n.kind() == "block_mapping_pair")
                            .map(|n| convert_pair(n, text)),
                    ),
                    _ => {}
                }
            }
            Some(Node::mapping(pairs, byte_range(node)))
        }
        "flow_mapping" => {
            let pairs = named_children(node)
                .into_iter()
                .filter_map(|child| match child.kind() {
                    "flow_pair" => Some(convert_pair(child, text)),
                    "flow_node" => convert(child, text).map(|key| Pair {
                        key,
                        value: Node::placeholder(),
                    }),
                    _ => None,
                })
                .collect();
            Some(Node::mapping(pairs, byte_range(node)))
        }
        "block_sequence" => {
            let items = named_children(node)
                .into_iter()
                .filter(|n| n.kind() == "block_sequence_item")
                .map(|item| {
                    named_children(item)
                        .into_iter()
                        .filter(|n| n.kind() != "comment")
                        .find_map(|n| convert(n, text))
                        .unwrap_or_else(Node::placeholder)
                })
                .collect();
            Some(Node::sequence(items, byte_range(node)))
        }
        "flow_sequence" => {
            let items = named_children(node)
                .into_iter()
                .filter_map(|child| match child.kind() {
                    "flow_node" => convert(child, text),
                    "flow_pair" => Some(Node::mapping(
                        vec![convert_pair(child, text)],
                        byte_range(child),
                    )),
                    _ => None,
                })
                .collect();
            Some(Node::sequence(items, byte_range(node)))
        }
        "plain_scalar" | "double_quote_scalar" | "single_quote_scalar" | "block_scalar"
        | "alias" => Some(convert_scalar(node, text)),
        "ERROR" => salvage(node, text),
        _ => None,
    }
}

fn convert_pair(node: TsNode<'_>, text: &str) -> Pair {
    let key = node
        .child_by_field_name("key")
        .and_then(|n| convert(n, text))
        .unwrap_or_else(Node::placeholder);
    let value = node
        .child_by_field_name("value")
        .and_then(|n| convert(n, text))
        .unwrap_or_else(Node::placeholder);
    Pair { key, value }
}

/// Keeps what is recognizable inside an `ERROR` node: loose mapping pairs
/// become a mapping, otherwise the first convertible child wins.
fn salvage(node: TsNode<'_>, text: &str) -> Option<Node> {
    let mut pairs = Vec::new();
    let mut others = Vec::new();
    for child in named_children(node) {
        match child.kind() {
            "block_mapping_pair" | "flow_pair" => pairs.push(convert_pair(child, text)),
            "comment" => {}
            _ => {
                if let Some(converted) = convert(child, text) {
                    others.push(converted);
                }
            }
        }
    }
    if pairs.is_empty() {
        return others.into_iter().next();
    }
    let start = pairs
        .iter()
        .filter_map(|p| p.key.range.as_ref().or(p.value.range.as_ref()))
        .map(|r| r.start)
        .min()
        .unwrap_or(node.start_byte());
    let end = pairs
        .iter()
        .filter_map(|p| p.value.range.as_ref().or(p.key.range.as_ref()))
        .map(|r| r.end)
        .max()
        .unwrap_or(node.end_byte());
    Some(Node::mapping(pairs, start..end))
}

fn convert_scalar(node: TsNode<'_>, text: &str) -> Node {
    let source = node_text(node, text);
    let value = match node.kind() {
        "plain_scalar" => plain_value(node, source),
        "double_quote_scalar" => ScalarValue::Str(unescape_double_quoted(source)),
        "single_quote_scalar" => ScalarValue::Str(unescape_single_quoted(source)),
        "block_scalar" => ScalarValue::Str(block_scalar_value(source)),
        _ => ScalarValue::Str(source.to_string()),
    };
    Node::scalar(value, source, byte_range(node))
}

fn plain_value(node: TsNode<'_>, source: &str) -> ScalarValue {
    let kind = named_children(node)
        .first()
        .map(|n| n.kind())
        .unwrap_or("string_scalar");
    match kind {
        "null_scalar" => ScalarValue::Null,
        "boolean_scalar" => ScalarValue::Bool(source.eq_ignore_ascii_case("true")),
        "integer_scalar" => parse_int(source)
            .map(ScalarValue::Int)
            .unwrap_or_else(|| ScalarValue::Str(source.to_string())),
        "float_scalar" => parse_float(source)
            .map(ScalarValue::Float)
            .unwrap_or_else(|| ScalarValue::Str(source.to_string())),
        _ => ScalarValue::Str(fold_lines(source)),
    }
}

fn parse_int(source: &str) -> Option<i64> {
    if let Some(hex) = source.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(oct) = source.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok();
    }
    source.parse().ok()
}

fn parse_float(source: &str) -> Option<f64> {
    match source.to_ascii_lowercase().as_str() {
        ".inf" | "+.inf" => Some(f64::INFINITY),
        "-.inf" => Some(f64::NEG_INFINITY),
        ".nan" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

/// Multi-line plain scalars fold into a single space-separated line.
fn fold_lines(source: &str) -> String {
    if !source.contains('\n') {
        return source.to_string();
    }
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn unescape_double_quoted(source: &str) -> String {
    let inner = source
        .strip_prefix('"')
        .map(|s| s.strip_suffix('"').unwrap_or(s))
        .unwrap_or(source);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn unescape_single_quoted(source: &str) -> String {
    let inner = source
        .strip_prefix('\'')
        .map(|s| s.strip_suffix('\'').unwrap_or(s))
        .unwrap_or(source);
    inner.replace("''", "'")
}

fn block_scalar_value(source: &str) -> String {
    let mut lines = source.lines();
    let header = lines.next().unwrap_or("");
    let body: Vec<&str> = lines.collect();
    let indent = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let dedented: Vec<&str> = body
        .iter()
        .map(|line| line.get(indent..).unwrap_or(""))
        .collect();
    if header.starts_with('>') {
        dedented.join(" ")
    } else {
        dedented.join("\n")
    }
}
