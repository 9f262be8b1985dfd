//! Extraction of module documentation and runtime routing.
//!
//! Module sources embed their documentation as a YAML string assigned to
//! `DOCUMENTATION`. Parsing is lenient: fields with an unexpected shape are
//! dropped instead of failing the whole module.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};

use super::module::{Description, ModuleDocumentation, ModuleOption, OptionMap, PluginRoute, RemovalInfo};
use crate::error::AnsibleLsResult;

static DOC_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)[ \t]*(?P<name>[A-Z0-9_]+)\s*=\s*r?(?:'''(?:\n---)?\n?(?P<single>.*?)'''|"""(?:\n---)?\n?(?P<double>.*?)""")"#,
    )
    .expect("valid regex for documentation block")
});

/// Returns the raw YAML of the `DOCUMENTATION` block of a module source.
pub fn extract_documentation_block(source: &str) -> Option<&str> {
    DOC_BLOCK
        .captures_iter(source)
        .filter(|caps| caps.name("name").is_some_and(|m| m.as_str() == "DOCUMENTATION"))
        .find_map(|caps| caps.name("single").or_else(|| caps.name("double")))
        .map(|m| m.as_str())
}

/// Reads and parses the documentation of a module file.
pub fn read_module_documentation(path: &Path) -> AnsibleLsResult<Option<ModuleDocumentation>> {
    let source = std::fs::read_to_string(path)?;
    match extract_documentation_block(&source) {
        Some(block) => parse_documentation(block),
        None => Ok(None),
    }
}

/// Parses a `DOCUMENTATION` YAML document. Yields `None` unless it names
/// its module.
pub fn parse_documentation(yaml: &str) -> AnsibleLsResult<Option<ModuleDocumentation>> {
    let raw: YamlValue = serde_yaml::from_str(yaml)?;
    let Some(raw) = raw.as_mapping() else {
        return Ok(None);
    };
    let Some(module) = field(raw, "module").and_then(YamlValue::as_str) else {
        return Ok(None);
    };

    Ok(Some(ModuleDocumentation {
        module: module.to_string(),
        short_description: field(raw, "short_description").and_then(description),
        description: field(raw, "description").and_then(description),
        version_added: field(raw, "version_added").and_then(scalar_text),
        requirements: field(raw, "requirements").and_then(description),
        notes: field(raw, "notes").and_then(description),
        deprecated: field(raw, "deprecated").is_some_and(is_truthy),
        options: field(raw, "options").map(parse_options).unwrap_or_default(),
    }))
}

/// Converts a raw `options`/`suboptions` mapping, registering aliases.
pub fn parse_options(raw: &YamlValue) -> OptionMap {
    let mut options = OptionMap::new();
    let Some(raw) = raw.as_mapping() else {
        return options;
    };
    for (name, spec) in raw {
        let (Some(name), Some(spec)) = (scalar_text(name), spec.as_mapping()) else {
            continue;
        };
        options.insert(ModuleOption {
            name,
            description: field(spec, "description").and_then(description),
            required: field(spec, "required").is_some_and(is_truthy),
            default: field(spec, "default").and_then(to_json),
            choices: field(spec, "choices")
                .and_then(YamlValue::as_sequence)
                .map(|items| items.iter().filter_map(to_json).collect()),
            option_type: field(spec, "type").and_then(YamlValue::as_str).map(str::to_string),
            elements: field(spec, "elements").and_then(YamlValue::as_str).map(str::to_string),
            aliases: field(spec, "aliases")
                .and_then(YamlValue::as_sequence)
                .map(|items| items.iter().filter_map(scalar_text).collect())
                .unwrap_or_default(),
            version_added: field(spec, "version_added").and_then(scalar_text),
            suboptions: field(spec, "suboptions").map(parse_options).unwrap_or_default(),
        });
    }
    options
}

fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a YamlValue> {
    map.get(key).filter(|value| !value.is_null())
}

fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &YamlValue) -> bool {
    match value {
        YamlValue::Bool(b) => *b,
        YamlValue::Null => false,
        YamlValue::String(s) => !s.is_empty(),
        YamlValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

fn description(value: &YamlValue) -> Option<Description> {
    match value {
        YamlValue::String(s) => Some(Description::Text(s.clone())),
        YamlValue::Sequence(items) => Some(Description::Lines(
            items
                .iter()
                .map(|item| {
                    scalar_text(item).unwrap_or_else(|| {
                        to_json(item).map(|json| json.to_string()).unwrap_or_default()
                    })
                })
                .collect(),
        )),
        _ => None,
    }
}

fn to_json(value: &YamlValue) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

#[derive(Debug, Default, Deserialize)]
struct RawRuntime {
    #[serde(default)]
    plugin_routing: Option<RawPluginRouting>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPluginRouting {
    #[serde(default)]
    modules: Option<HashMap<String, RawRoute>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRoute {
    #[serde(default)]
    redirect: Option<YamlValue>,
    #[serde(default)]
    deprecation: Option<RawRemoval>,
    #[serde(default)]
    tombstone: Option<RawRemoval>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRemoval {
    #[serde(default)]
    warning_text: Option<YamlValue>,
    #[serde(default)]
    removal_date: Option<YamlValue>,
    #[serde(default)]
    removal_version: Option<YamlValue>,
}

impl From<RawRemoval> for RemovalInfo {
    fn from(raw: RawRemoval) -> Self {
        let text = |v: Option<YamlValue>| v.and_then(|v| v.as_str().map(str::to_string));
        RemovalInfo {
            warning_text: text(raw.warning_text),
            removal_date: text(raw.removal_date),
            removal_version: text(raw.removal_version),
        }
    }
}

/// Parses module routes (`plugin_routing.modules`) of a `meta/runtime.yml`.
pub fn parse_module_routing(yaml: &str) -> AnsibleLsResult<HashMap<String, PluginRoute>> {
    if yaml.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let raw: Option<RawRuntime> = serde_yaml::from_str(yaml)?;
    let modules = raw
        .and_then(|r| r.plugin_routing)
        .and_then(|p| p.modules)
        .unwrap_or_default();
    Ok(modules
        .into_iter()
        .map(|(name, route)| {
            let route = PluginRoute {
                redirect: route.redirect.and_then(|r| r.as_str().map(str::to_string)),
                deprecation: route.deprecation.map(RemovalInfo::from),
                tombstone: route.tombstone.map(RemovalInfo::from),
            };
            (name, route)
        })
        .collect())
}
