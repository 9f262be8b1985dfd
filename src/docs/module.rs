//! Typed module documentation and plugin routing.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

/// Description fields are either a single paragraph or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
}

/// Options in declaration order. Aliases are extra entries sharing the
/// canonical [`ModuleOption`], so an entry is an alias iff its key differs
/// from the option's `name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(String, Arc<ModuleOption>)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the option under its canonical name and each of its aliases.
    pub fn insert(&mut self, option: ModuleOption) {
        let option = Arc::new(option);
        self.insert_entry(option.name.clone(), Arc::clone(&option));
        for alias in &option.aliases {
            self.insert_entry(alias.clone(), Arc::clone(&option));
        }
    }

    fn insert_entry(&mut self, key: String, option: Arc<ModuleOption>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = option,
            None => self.entries.push((key, option)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<ModuleOption>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, o)| o)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ModuleOption>)> {
        self.entries.iter().map(|(k, o)| (k.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ModuleOption> for OptionMap {
    fn from_iter<I: IntoIterator<Item = ModuleOption>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for option in iter {
            map.insert(option);
        }
        map
    }
}

/// A documented module parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleOption {
    /// Canonical name.
    pub name: String,
    pub description: Option<Description>,
    pub required: bool,
    pub default: Option<Value>,
    pub choices: Option<Vec<Value>>,
    /// Type tag such as `str`, `bool`, `list` or `dict`.
    pub option_type: Option<String>,
    /// Element type of `list` options.
    pub elements: Option<String>,
    pub aliases: Vec<String>,
    pub version_added: Option<String>,
    pub suboptions: OptionMap,
}

impl ModuleOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, option_type: impl Into<String>) -> Self {
        self.option_type = Some(option_type.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn with_suboptions(mut self, suboptions: OptionMap) -> Self {
        self.suboptions = suboptions;
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.option_type.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDocumentation {
    pub module: String,
    pub short_description: Option<Description>,
    pub description: Option<Description>,
    pub version_added: Option<String>,
    pub requirements: Option<Description>,
    pub notes: Option<Description>,
    pub deprecated: bool,
    pub options: OptionMap,
}

/// An indexed module. Documentation is read from `source` on first use.
#[derive(Debug)]
pub struct ModuleMetadata {
    pub fqcn: String,
    pub namespace: String,
    pub collection: String,
    pub name: String,
    pub source: Option<PathBuf>,
    documentation: OnceLock<Option<ModuleDocumentation>>,
}

impl ModuleMetadata {
    /// Metadata for a module file whose documentation is parsed lazily.
    pub fn from_source(fqcn: String, namespace: String, collection: String, name: String, source: PathBuf) -> Self {
        Self {
            fqcn,
            namespace,
            collection,
            name,
            source: Some(source),
            documentation: OnceLock::new(),
        }
    }

    /// Metadata with already known documentation.
    pub fn with_documentation(fqcn: &str, documentation: ModuleDocumentation) -> Self {
        let (namespace, collection, name) = split_fqcn(fqcn);
        let cell = OnceLock::new();
        let _ = cell.set(Some(documentation));
        Self {
            fqcn: fqcn.to_string(),
            namespace: namespace.to_string(),
            collection: collection.to_string(),
            name: name.to_string(),
            source: None,
            documentation: cell,
        }
    }

    /// `namespace.collection` owning this module.
    pub fn collection_name(&self) -> String {
        format!("{}.{}", self.namespace, self.collection)
    }

    pub fn documentation(&self) -> Option<&ModuleDocumentation> {
        self.documentation
            .get_or_init(|| {
                let source = self.source.as_ref()?;
                match super::parser::read_module_documentation(source) {
                    Ok(doc) => doc,
                    Err(err) => {
                        log::warn!(
                            target: "ansible_ls::docs",
                            "Failed to read documentation of {} from {}: {}",
                            self.fqcn,
                            source.display(),
                            err
                        );
                        None
                    }
                }
            })
            .as_ref()
    }
}

/// Splits `namespace.collection.name`; anything after the second dot is the name.
pub fn split_fqcn(fqcn: &str) -> (&str, &str, &str) {
    let mut parts = fqcn.splitn(3, '.');
    let namespace = parts.next().unwrap_or("");
    let collection = parts.next().unwrap_or("");
    let name = parts.next().unwrap_or("");
    (namespace, collection, name)
}

/// Deprecation or removal notice from `meta/runtime.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalInfo {
    pub warning_text: Option<String>,
    pub removal_date: Option<String>,
    pub removal_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRoute {
    pub redirect: Option<String>,
    pub deprecation: Option<RemovalInfo>,
    pub tombstone: Option<RemovalInfo>,
}
