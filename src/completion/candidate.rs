//! Completion candidates as produced by the synthesizer, before they are
//! turned into protocol items.

use serde::{Deserialize, Serialize};

use crate::yaml::ByteRange;

/// Sort ranks; lower sorts first.
pub mod priority {
    pub const NAME_KEYWORD: u32 = 1;
    pub const MODULE: u32 = 2;
    pub const REDIRECTED_MODULE: u32 = 3;
    pub const KEYWORD: u32 = 4;

    pub const REQUIRED_OPTION: u32 = 1;
    pub const OPTION: u32 = 2;
    pub const ALIAS_OPTION: u32 = 3;

    pub const DEFAULT_CHOICE: u32 = 1;
    pub const CHOICE: u32 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Keywords and module options.
    Property,
    /// Modules.
    Class,
    /// Redirected modules and option aliases.
    Reference,
    Value,
    Variable,
}

/// State carried from the completion request to the resolve request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateData {
    pub document_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_fqcn: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_collections: Vec<String>,
    /// Declared type of an option candidate.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub option_type: Option<String>,
    #[serde(default)]
    pub at_end_of_line: bool,
    #[serde(default)]
    pub first_element_of_list: bool,
    #[serde(default)]
    pub playbook: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CandidateKind,
    pub sort_text: String,
    pub filter_text: Option<String>,
    pub detail: Option<String>,
    /// Markdown.
    pub documentation: Option<String>,
    pub insert_text: String,
    /// Span of the original text replaced by `insert_text`.
    pub range: Option<ByteRange>,
    /// Whether `insert_text` is a snippet.
    pub snippet: bool,
    pub data: Option<CandidateData>,
}

impl CompletionCandidate {
    pub fn new(label: impl Into<String>, kind: CandidateKind, sort_text: String) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            sort_text,
            filter_text: None,
            detail: None,
            documentation: None,
            range: None,
            snippet: false,
            data: None,
        }
    }

    pub fn with_insert_text(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = insert_text.into();
        self
    }

    pub fn with_range(mut self, range: Option<ByteRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_data(mut self, data: CandidateData) -> Self {
        self.data = Some(data);
        self
    }
}

/// `"{priority}_{label}"`, for candidates ordered by name within a rank.
pub fn ranked_sort_text(priority: u32, label: &str) -> String {
    format!("{priority}_{label}")
}

/// Priority followed by the declaration index right-aligned in three
/// columns, for candidates that keep their declaration order within a rank.
pub fn indexed_sort_text(priority: u32, index: usize) -> String {
    format!("{priority}{index:>3}")
}
