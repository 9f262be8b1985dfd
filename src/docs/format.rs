//! Markdown rendering of module, option and tombstone documentation.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use super::module::{Description, ModuleDocumentation, ModuleOption, PluginRoute, RemovalInfo};

static MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<kind>[IBCMOVUL])\((?P<body>[^()]*)\)").expect("valid regex for doc macros")
});

pub fn format_module(module: &ModuleDocumentation, route: Option<&PluginRoute>) -> String {
    let mut sections = Vec::new();
    let deprecation = route.and_then(|r| r.deprecation.as_ref());
    if module.deprecated || deprecation.is_some() {
        sections.push("**DEPRECATED**".to_string());
        if let Some(deprecation) = deprecation {
            push_removal(&mut sections, deprecation);
        }
    }
    if let Some(redirect) = route.and_then(|r| r.redirect.as_deref()) {
        sections.push(format!("***Redirected to: {redirect}***"));
    }
    if let Some(short) = &module.short_description {
        sections.push(format!("*{}*", format_description(short, true)));
    }
    for (title, section) in [
        ("**Description**", &module.description),
        ("**Requirements**", &module.requirements),
        ("**Notes**", &module.notes),
    ] {
        if let Some(section) = section {
            sections.push(title.to_string());
            sections.push(format_description(section, true));
        }
    }
    sections.join("\n\n")
}

/// Documentation of a route whose module no longer exists.
pub fn format_tombstone(route: &PluginRoute) -> String {
    let mut sections = Vec::new();
    if let Some(tombstone) = &route.tombstone {
        sections.push("**REMOVED**".to_string());
        push_removal(&mut sections, tombstone);
    }
    if let Some(redirect) = &route.redirect {
        sections.push(format!("Use *{redirect}* instead."));
    }
    sections.join("\n\n")
}

fn push_removal(sections: &mut Vec<String>, info: &RemovalInfo) {
    if let Some(text) = &info.warning_text {
        sections.push(text.clone());
    }
    sections.push(format!(
        "Removal date: {}, removal version: {}",
        info.removal_date.as_deref().unwrap_or("undefined"),
        info.removal_version.as_deref().unwrap_or("undefined"),
    ));
}

pub fn format_option(option: &ModuleOption, with_details: bool) -> String {
    let mut sections = Vec::new();
    if with_details && let Some(details) = option_details(option) {
        sections.push(format!("`{details}`"));
    }
    if let Some(description) = &option.description {
        sections.push(format_description(description, false));
    }
    if let Some(default) = &option.default {
        sections.push(format!(
            "*Default*:\n ```javascript\n{}\n```",
            value_text(default)
        ));
    }
    if let Some(choices) = &option.choices {
        let choices: Vec<String> = choices.iter().map(|c| format!("`{}`", value_text(c))).collect();
        sections.push(format!("*Choices*: [{}]", choices.join(",")));
    }
    if !option.aliases.is_empty() {
        let names: Vec<String> = std::iter::once(&option.name)
            .chain(&option.aliases)
            .map(|a| format!("`{a}`"))
            .collect();
        sections.push(format!("*Aliases*: [{}]", names.join(",")));
    }
    sections.join("\n\n")
}

/// Short type summary such as `(required) list(str)`.
pub fn option_details(option: &ModuleOption) -> Option<String> {
    let mut details = Vec::new();
    if option.required {
        details.push("(required)".to_string());
    }
    match (option.type_name(), &option.elements) {
        (Some("list"), Some(elements)) => details.push(format!("list({elements})")),
        (Some(option_type), _) => details.push(option_type.to_string()),
        (None, _) => {}
    }
    (!details.is_empty()).then(|| details.join(" "))
}

pub fn format_description(description: &Description, as_list: bool) -> String {
    match description {
        Description::Text(text) => replace_macros(text),
        Description::Lines(lines) if as_list => lines
            .iter()
            .map(|line| format!("- {}", replace_macros(line)))
            .collect::<Vec<_>>()
            .join("\n"),
        Description::Lines(lines) => lines
            .iter()
            .map(|line| format!("{}\n", replace_macros(line)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Textual form of a JSON value; strings are not quoted.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rewrites Ansible doc macros (`C(...)`, `I(...)`, ...) as Markdown.
fn replace_macros(text: &str) -> String {
    MACRO
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps["body"];
            match &caps["kind"] {
                "I" => format!("*{body}*"),
                "B" => format!("**{body}**"),
                "C" | "O" | "V" => format!("`{body}`"),
                "M" => format!("*{body}*"),
                "L" => match body.split_once(',') {
                    Some((label, url)) => format!("[{}]({})", label.trim(), url.trim()),
                    None => body.to_string(),
                },
                _ => body.to_string(),
            }
        })
        .into_owned()
}
