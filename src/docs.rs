//! Module documentation: parsing, indexing and rendering.

pub mod format;
pub mod library;
pub mod module;
pub mod parser;

pub use library::{DocsLibrary, DocsProvider, ModuleIndex, ModuleLookup, candidate_fqcns};
pub use module::{
    Description, ModuleDocumentation, ModuleMetadata, ModuleOption, OptionMap, PluginRoute,
    RemovalInfo,
};
