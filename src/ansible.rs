//! Ansible structure on top of the YAML path model.

pub mod classify;
pub mod collections;
pub mod keywords;
pub mod options;
pub mod playbook;

pub use classify::{PlayClassification, StructuralRole, classify, is_block, is_play, is_role, is_task};
pub use collections::declared_collections;
pub use keywords::is_task_keyword;
pub use options::{ContainerKind, find_provided_module, options_for_path, task_param_path_with_trace};
pub use playbook::{cursor_inside_jinja, is_playbook};
