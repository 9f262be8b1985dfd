pub mod ansible;
pub mod completion;
pub mod config;
pub mod context;
pub mod docs;
pub mod error;
pub mod hover;
pub mod lsp;
pub mod services;
pub mod text;
pub mod yaml;

pub use context::AnalysisContext;
pub use error::{AnsibleLsError, AnsibleLsResult};

// Re-export the main server implementation
pub use lsp::AnsibleLs;
