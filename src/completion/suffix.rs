//! Text appended after a completed key.

pub const EOL: &str = "\n";
/// One indentation unit. Clients expand tabs according to their settings.
pub const INDENT: &str = "\t";

/// Suffix for a key whose value has type `option_type`. Containers open a
/// new, deeper line; anything else gets a single space.
///
/// A play is itself a list item, so inside playbooks the new line needs an
/// extra indentation level when the key opens a list item (`- key:`).
pub fn resolve_suffix(option_type: Option<&str>, first_element_of_list: bool, playbook: bool) -> String {
    let depth = if playbook && first_element_of_list { 2 } else { 1 };
    let indent = INDENT.repeat(depth);
    match option_type {
        Some("list") => format!("{EOL}{indent}- "),
        Some("dict") => format!("{EOL}{indent}"),
        _ => " ".to_string(),
    }
}
