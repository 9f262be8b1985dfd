//! YAML node model, tolerant parsing and ancestry navigation.

pub mod ancestry;
pub mod node;
pub mod parser;
pub mod path;

pub use ancestry::AncestryCursor;
pub use node::{
    ByteRange, Document, Node, NodeKind, NodeType, Pair, ParseError, Path, PathNode, Scalar,
    ScalarValue, PLACEHOLDER,
};
pub use parser::parse_all_documents;
pub use path::{contains, map_keys, path_at};
