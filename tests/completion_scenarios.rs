//! Completion over whole playbooks, driven through the public pipeline.

mod helpers;

use ansible_ls::completion::{CandidateKind, complete, resolve};
use ansible_ls::AnalysisContext;
use ansible_ls::config::WorkspaceSettings;
use ansible_ls::docs::DocsLibrary;
use helpers::fixtures::docs_context;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

const PLAYBOOK: &str = "- hosts: web\n  tasks:\n  - name: x\n    ansible.builtin.debug:\n      msg: hi\n";

fn uri() -> Url {
    Url::parse("file:///project/site.yml").unwrap()
}

#[tokio::test]
async fn key_at_line_start_offers_modules_and_task_keywords() {
    // Given the cursor at the start of the module key
    let offset = PLAYBOOK.find("ansible.builtin.debug").unwrap();

    // When completing
    let candidates = complete(&docs_context(), &uri(), PLAYBOOK, offset).await;
    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();

    // Then modules and unused task keywords are offered
    assert!(labels.contains(&"ansible.builtin.debug"), "{labels:?}");
    assert!(labels.contains(&"ansible.builtin.copy"));
    assert!(labels.contains(&"when"));
    assert!(!labels.contains(&"name"), "name is already provided");
    assert!(!labels.contains(&"tasks"), "tasks is a play keyword");

    // And the replacement range covers the key in the unpatched text
    let module = candidates
        .iter()
        .find(|c| c.label == "ansible.builtin.debug")
        .unwrap();
    assert_eq!(module.kind, CandidateKind::Class);
    let range = module.range.clone().unwrap();
    assert_eq!(&PLAYBOOK[range], "ansible.builtin.debug");
}

#[tokio::test]
async fn cursor_after_module_colon_replaces_the_whole_key() {
    // Given the cursor right after `debug:` on the module key line
    let offset = PLAYBOOK.find("debug:").unwrap() + "debug:".len();

    // When completing
    let candidates = complete(&docs_context(), &uri(), PLAYBOOK, offset).await;
    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();

    // Then the key is still being typed: keywords and modules, no options
    assert!(labels.contains(&"action"), "{labels:?}");
    assert!(labels.contains(&"ansible.builtin.copy"));
    assert!(!labels.contains(&"msg"));
    let action = candidates.iter().find(|c| c.label == "action").unwrap();
    assert_eq!(action.sort_text, "4_action");

    // And every edit spans the key including its colon
    for candidate in &candidates {
        let range = candidate.range.clone().unwrap();
        assert_eq!(&PLAYBOOK[range], "ansible.builtin.debug:", "{}", candidate.label);
    }
}

#[tokio::test]
async fn options_below_a_module_skip_provided_ones() {
    // Given a fresh line inside the debug arguments
    let text = format!("{PLAYBOOK}      ");

    // When completing at its end
    let candidates = complete(&docs_context(), &uri(), &text, text.len()).await;
    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();

    // Then the remaining debug options are offered in declaration order
    assert_eq!(labels, vec!["var", "verbosity"]);
    assert!(candidates.iter().all(|c| c.insert_text.ends_with(':')));
}

#[tokio::test]
async fn args_resolve_the_module_by_elimination() {
    // Given arguments given through `args` next to a copy module key
    let text = "- name: t\n  args:\n    src: a\n    \n  ansible.builtin.copy: {}\n";
    let offset = text.find("    \n").unwrap() + 4;

    // When completing inside `args`
    let candidates = complete(&docs_context(), &uri(), text, offset).await;
    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();

    // Then copy's options are offered, required first
    assert_eq!(labels.first(), Some(&"dest"));
    assert!(labels.contains(&"backup"));
    assert!(!labels.contains(&"src"));
}

#[tokio::test]
async fn option_values_offer_choices_with_the_default_first() {
    let text = "- name: t\n  ansible.builtin.copy:\n    backup: ";
    let candidates = complete(&docs_context(), &uri(), text, text.len()).await;

    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["true", "false"]);
    let default = candidates.iter().find(|c| c.label == "false").unwrap();
    assert_eq!(default.detail.as_deref(), Some("default"));
    assert!(default.sort_text < candidates[0].sort_text);
}

#[tokio::test]
async fn resolving_a_module_candidate_attaches_documentation() {
    // Given a module candidate from the first phase
    let text = "- name: t\n  ping";
    let candidates = complete(&docs_context(), &uri(), text, text.len()).await;
    let ping = candidates
        .into_iter()
        .find(|c| c.label == "ansible.builtin.ping")
        .unwrap();
    assert!(ping.documentation.is_none());

    // When resolving it
    let resolved = resolve(&docs_context(), ping).await;

    // Then docs are attached and the module opens a mapping
    assert_eq!(resolved.documentation.as_deref(), Some("*Try to connect to host*"));
    assert_eq!(resolved.insert_text, "ansible.builtin.ping:\n\t");
    assert!(resolved.snippet);
}

#[tokio::test]
async fn cancelled_requests_yield_nothing() {
    let ctx = docs_context();
    ctx.cancel.cancel();
    let offset = PLAYBOOK.find("ansible.builtin.debug").unwrap();

    assert!(complete(&ctx, &uri(), PLAYBOOK, offset).await.is_empty());
}

#[tokio::test]
async fn modules_next_to_the_playbook_resolve_with_documentation() {
    // Given a collection shipped in the playbook's `collections` directory
    let dir = TempDir::new().unwrap();
    let modules = dir.path().join("collections/ansible_collections/local/tools/plugins/modules");
    fs::create_dir_all(&modules).unwrap();
    fs::write(
        modules.join("scan.py"),
        "DOCUMENTATION = r'''\nmodule: scan\nshort_description: Scan the local network\n'''\n",
    )
    .unwrap();
    let playbook = dir.path().join("site.yml");
    let text = "- name: t\n  scan";
    fs::write(&playbook, text).unwrap();
    let document = Url::from_file_path(&playbook).unwrap();
    let ctx = AnalysisContext::new(Arc::new(DocsLibrary::new()), Arc::new(WorkspaceSettings::default()));

    // When completing then resolving the adjacent module
    let candidates = complete(&ctx, &document, text, text.len()).await;
    let scan = candidates
        .into_iter()
        .find(|c| c.label == "local.tools.scan")
        .expect("adjacent module offered");
    let resolved = resolve(&ctx, scan).await;

    // Then its documentation comes from the adjacent collection
    let documentation = resolved.documentation.unwrap_or_default();
    assert!(documentation.contains("Scan the local network"), "{documentation}");
    assert_eq!(resolved.insert_text, "local.tools.scan:\n\t");
}
