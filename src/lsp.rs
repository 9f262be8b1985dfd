mod client;
pub mod documents;
mod lsp_impl;
pub mod protocol;
mod settings;
mod settings_manager;
mod text_sync;

pub use documents::{DocumentSnapshot, DocumentStore};
pub use lsp_impl::AnsibleLs;
pub use settings::{
    PROJECT_CONFIG_FILE, SettingsEvent, SettingsEventKind, SettingsLoadOutcome, SettingsSource,
    load_settings,
};
