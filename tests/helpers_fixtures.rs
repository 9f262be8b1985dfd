//! Module documentation fixtures.
//!
//! `docs_context` serves an in-memory index; `write_module_tree` lays the
//! same kind of modules out on disk for tests that go through indexing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ansible_ls::AnalysisContext;
use ansible_ls::config::WorkspaceSettings;
use ansible_ls::docs::{
    Description, DocsLibrary, ModuleDocumentation, ModuleIndex, ModuleMetadata, ModuleOption,
    OptionMap,
};
use serde_json::json;

fn module(fqcn: &str, summary: &str, options: Vec<ModuleOption>) -> ModuleMetadata {
    ModuleMetadata::with_documentation(
        fqcn,
        ModuleDocumentation {
            module: fqcn.rsplit('.').next().unwrap_or(fqcn).to_string(),
            short_description: Some(Description::Text(summary.to_string())),
            options: options.into_iter().collect(),
            ..Default::default()
        },
    )
}

/// `ansible.builtin.{debug,copy,ping}` plus `ns.col.nested`, whose `opt1`
/// dict holds an `opt2` list of dicts.
pub fn docs_index() -> ModuleIndex {
    let mut index = ModuleIndex::new();
    index.add_module(module(
        "ansible.builtin.debug",
        "Print statements during execution",
        vec![
            ModuleOption::new("msg").with_type("str").with_default(json!("Hello world!")),
            ModuleOption::new("var").with_type("str"),
            ModuleOption::new("verbosity").with_type("int").with_default(json!(0)),
        ],
    ));
    index.add_module(module(
        "ansible.builtin.copy",
        "Copy files to remote locations",
        vec![
            ModuleOption::new("src").with_type("path"),
            ModuleOption::new("dest").with_type("path").required(),
            ModuleOption::new("backup").with_type("bool").with_default(json!(false)),
        ],
    ));
    index.add_module(module("ansible.builtin.ping", "Try to connect to host", vec![]));

    let leaf: OptionMap = [ModuleOption::new("leaf").with_type("int")].into_iter().collect();
    let mut opt2 = ModuleOption::new("opt2").with_type("list").with_suboptions(leaf);
    opt2.elements = Some("dict".to_string());
    let opt1 = ModuleOption::new("opt1")
        .with_type("dict")
        .with_suboptions([opt2].into_iter().collect());
    index.add_module(module("ns.col.nested", "Nested options", vec![opt1]));
    index
}

pub fn docs_context() -> AnalysisContext {
    AnalysisContext::new(
        Arc::new(DocsLibrary::from_index(docs_index())),
        Arc::new(WorkspaceSettings::default()),
    )
}

pub const DEBUG_SOURCE: &str = r#"#!/usr/bin/python

DOCUMENTATION = r'''
---
module: debug
short_description: Print statements during execution
options:
  msg:
    description: The customized message that is printed.
    type: str
    default: Hello world!
  var:
    description: A variable name to debug.
    type: str
  verbosity:
    description: A number that controls when the debug is run.
    type: int
    default: 0
'''

EXAMPLES = r'''
- ansible.builtin.debug:
    msg: hi
'''
"#;

/// Writes `<root>/plugins/modules/debug.py` and returns the modules dir.
pub fn write_module_tree(root: &Path) -> PathBuf {
    let modules = root.join("plugins").join("modules");
    fs::create_dir_all(&modules).expect("create modules dir");
    fs::write(modules.join("debug.py"), DEBUG_SOURCE).expect("write debug.py");
    modules
}
