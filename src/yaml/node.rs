//! Owned YAML node tree.
//!
//! Every node carries an optional half-open byte range into the text it was
//! parsed from. Nodes are produced once per request by [`super::parser`] and
//! are only ever borrowed afterwards.

use std::ops::Range;

use serde_json::Value;

/// Half-open byte range `[start, end)` into the source text.
pub type ByteRange = Range<usize>;

/// Typed value of a scalar, resolved with the YAML 1.2 core schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ScalarValue {
    /// Returns the value if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of any non-null value (`String(value)` semantics).
    pub fn to_text(&self) -> Option<String> {
        match self {
            ScalarValue::Null => None,
            ScalarValue::Bool(b) => Some(b.to_string()),
            ScalarValue::Int(i) => Some(i.to_string()),
            ScalarValue::Float(f) => Some(f.to_string()),
            ScalarValue::Str(s) => Some(s.clone()),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ScalarValue::Null => Value::Null,
            ScalarValue::Bool(b) => Value::Bool(*b),
            ScalarValue::Int(i) => Value::from(*i),
            ScalarValue::Float(f) => Value::from(*f),
            ScalarValue::Str(s) => Value::String(s.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub value: ScalarValue,
    /// Raw source text of the scalar, including quotes.
    pub source: String,
}

/// A mapping entry. Only ever reachable as a member of a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Node,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(Scalar),
    Mapping(Vec<Pair>),
    Sequence(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Option<ByteRange>,
}

/// The synthesized empty node that marks "cursor is here, but nothing has
/// been typed yet". It has no source range.
pub static PLACEHOLDER: Node = Node::placeholder();

impl Node {
    pub const fn placeholder() -> Self {
        Self {
            kind: NodeKind::Scalar(Scalar {
                value: ScalarValue::Null,
                source: String::new(),
            }),
            range: None,
        }
    }

    pub fn scalar(value: ScalarValue, source: impl Into<String>, range: ByteRange) -> Self {
        Self {
            kind: NodeKind::Scalar(Scalar {
                value,
                source: source.into(),
            }),
            range: Some(range),
        }
    }

    pub fn mapping(pairs: Vec<Pair>, range: ByteRange) -> Self {
        Self {
            kind: NodeKind::Mapping(pairs),
            range: Some(range),
        }
    }

    pub fn sequence(items: Vec<Node>, range: ByteRange) -> Self {
        Self {
            kind: NodeKind::Sequence(items),
            range: Some(range),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Scalar(_) => NodeType::Scalar,
            NodeKind::Mapping(_) => NodeType::Mapping,
            NodeKind::Sequence(_) => NodeType::Sequence,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[Pair]> {
        match &self.kind {
            NodeKind::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The value of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(|s| s.value.as_str())
    }

    /// True for null scalars, including the placeholder.
    pub fn is_null(&self) -> bool {
        matches!(
            &self.kind,
            NodeKind::Scalar(Scalar {
                value: ScalarValue::Null,
                ..
            })
        )
    }

    /// Looks up the value of a mapping entry by its textual key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|pair| pair.key.as_scalar().and_then(|s| s.value.to_text()).as_deref() == Some(key))
            .map(|pair| &pair.value)
    }

    /// Plain-data view of the subtree.
    pub fn to_json(&self) -> Value {
        match &self.kind {
            NodeKind::Scalar(scalar) => scalar.value.to_json(),
            NodeKind::Sequence(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            NodeKind::Mapping(pairs) => {
                let mut object = serde_json::Map::new();
                for pair in pairs {
                    let key = pair
                        .key
                        .as_scalar()
                        .and_then(|s| s.value.to_text())
                        .unwrap_or_else(|| "null".to_string());
                    object.insert(key, pair.value.to_json());
                }
                Value::Object(object)
            }
        }
    }
}

/// Variant tag used for type assertions while walking a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Scalar,
    Mapping,
    Sequence,
    Pair,
}

/// One element of a [`Path`]: either a node or the pair linking a mapping to
/// one of its keys or values.
#[derive(Debug, Clone, Copy)]
pub enum PathNode<'a> {
    Node(&'a Node),
    Pair(&'a Pair),
}

impl<'a> PathNode<'a> {
    pub fn node_type(&self) -> NodeType {
        match self {
            PathNode::Node(node) => node.node_type(),
            PathNode::Pair(_) => NodeType::Pair,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            PathNode::Node(node) => Some(node),
            PathNode::Pair(_) => None,
        }
    }

    pub fn as_pair(&self) -> Option<&'a Pair> {
        match self {
            PathNode::Pair(pair) => Some(pair),
            PathNode::Node(_) => None,
        }
    }

    pub fn range(&self) -> Option<ByteRange> {
        self.as_node().and_then(|node| node.range.clone())
    }

    /// Identity comparison; two path elements are equal only if they borrow
    /// the very same node or pair.
    pub fn same(&self, other: &PathNode<'_>) -> bool {
        match (self, other) {
            (PathNode::Node(a), PathNode::Node(b)) => std::ptr::eq(*a, *b),
            (PathNode::Pair(a), PathNode::Pair(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

/// Ancestry chain from a document's root content node down to a node of
/// interest.
pub type Path<'a> = Vec<PathNode<'a>>;

/// A recoverable parse error reported by the tolerant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub range: ByteRange,
    pub name: &'static str,
}

/// One stream segment (`---` separated) of a YAML text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub contents: Option<Node>,
    pub errors: Vec<ParseError>,
}
