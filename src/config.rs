pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{
    AnsibleLsSettings, AnsibleSection, AnsibleSettings, CompletionSection, CompletionSettings,
    DocsSection, DocsSettings, InventorySection, InventorySettings, WorkspaceSettings,
};
pub use user::{UserConfigError, UserConfigResult, load_user_config, user_config_path};

/// Merge multiple settings layers in order.
/// Later configs in the slice have higher precedence (override earlier ones).
/// Use this for layered config: `merge_all(&[defaults, user, project, session])`
pub fn merge_all(configs: &[Option<AnsibleLsSettings>]) -> Option<AnsibleLsSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two settings layers, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<AnsibleLsSettings>,
    primary: Option<AnsibleLsSettings>,
) -> Option<AnsibleLsSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(AnsibleLsSettings {
            ansible: merge_section(fallback.ansible, primary.ansible, |f, p| AnsibleSection {
                use_fully_qualified_collection_names: p
                    .use_fully_qualified_collection_names
                    .or(f.use_fully_qualified_collection_names),
            }),
            completion: merge_section(fallback.completion, primary.completion, |f, p| {
                CompletionSection {
                    provide_redirect_modules: p
                        .provide_redirect_modules
                        .or(f.provide_redirect_modules),
                    provide_module_option_aliases: p
                        .provide_module_option_aliases
                        .or(f.provide_module_option_aliases),
                }
            }),
            // Path lists are replaced wholesale, never concatenated
            docs: merge_section(fallback.docs, primary.docs, |f, p| DocsSection {
                module_paths: p.module_paths.or(f.module_paths),
                collections_paths: p.collections_paths.or(f.collections_paths),
            }),
            inventory: merge_section(fallback.inventory, primary.inventory, |f, p| {
                InventorySection {
                    path: p.path.or(f.path),
                }
            }),
        }),
    }
}

fn merge_section<T>(fallback: Option<T>, primary: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (fallback, primary) {
        (Some(fallback), Some(primary)) => Some(merge(fallback, primary)),
        (fallback, primary) => primary.or(fallback),
    }
}

impl From<&AnsibleLsSettings> for WorkspaceSettings {
    fn from(settings: &AnsibleLsSettings) -> Self {
        let defaults = WorkspaceSettings::default();
        let ansible = settings.ansible.clone().unwrap_or_default();
        let completion = settings.completion.clone().unwrap_or_default();
        let docs = settings.docs.clone().unwrap_or_default();
        let inventory = settings.inventory.clone().unwrap_or_default();

        WorkspaceSettings {
            ansible: AnsibleSettings {
                use_fully_qualified_collection_names: ansible
                    .use_fully_qualified_collection_names
                    .unwrap_or(defaults.ansible.use_fully_qualified_collection_names),
            },
            completion: CompletionSettings {
                provide_redirect_modules: completion
                    .provide_redirect_modules
                    .unwrap_or(defaults.completion.provide_redirect_modules),
                provide_module_option_aliases: completion
                    .provide_module_option_aliases
                    .unwrap_or(defaults.completion.provide_module_option_aliases),
            },
            docs: DocsSettings {
                module_paths: docs.module_paths.unwrap_or_default(),
                collections_paths: docs.collections_paths.unwrap_or_default(),
            },
            inventory: InventorySettings {
                path: inventory.path,
            },
        }
    }
}

impl From<AnsibleLsSettings> for WorkspaceSettings {
    fn from(settings: AnsibleLsSettings) -> Self {
        WorkspaceSettings::from(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn completion(redirects: Option<bool>, aliases: Option<bool>) -> AnsibleLsSettings {
        AnsibleLsSettings {
            completion: Some(CompletionSection {
                provide_redirect_modules: redirects,
                provide_module_option_aliases: aliases,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_settings_with_none() {
        assert!(merge_settings(None, None).is_none());
    }

    #[test]
    fn test_merge_settings_fallback_only() {
        let fallback = completion(Some(false), None);
        let result = merge_settings(Some(fallback.clone()), None);
        assert_eq!(result, Some(fallback));
    }

    #[test]
    fn test_merge_settings_prefer_primary_per_field() {
        let fallback = completion(Some(false), Some(false));
        let primary = completion(None, Some(true));

        let merged = merge_settings(Some(fallback), Some(primary)).unwrap();

        let section = merged.completion.unwrap();
        assert_eq!(section.provide_redirect_modules, Some(false));
        assert_eq!(section.provide_module_option_aliases, Some(true));
    }

    #[test]
    fn test_merge_all_replaces_path_lists() {
        let lower = AnsibleLsSettings {
            docs: Some(DocsSection {
                module_paths: Some(vec![PathBuf::from("/lower")]),
                collections_paths: Some(vec![PathBuf::from("/collections")]),
            }),
            ..Default::default()
        };
        let upper = AnsibleLsSettings {
            docs: Some(DocsSection {
                module_paths: Some(vec![PathBuf::from("/upper")]),
                collections_paths: None,
            }),
            ..Default::default()
        };

        let merged = merge_all(&[Some(defaults::default_settings()), Some(lower), None, Some(upper)]);
        let settings = WorkspaceSettings::from(merged.unwrap());

        assert_eq!(settings.docs.module_paths, vec![PathBuf::from("/upper")]);
        assert_eq!(settings.docs.collections_paths, vec![PathBuf::from("/collections")]);
    }

    #[test]
    fn test_missing_sections_resolve_to_defaults() {
        let settings = WorkspaceSettings::from(AnsibleLsSettings::default());
        assert_eq!(settings, WorkspaceSettings::default());
        assert!(settings.ansible.use_fully_qualified_collection_names);
        assert!(settings.completion.provide_redirect_modules);
        assert!(settings.completion.provide_module_option_aliases);
    }

    #[test]
    fn test_settings_deserialize_from_camel_case_json() {
        let value = serde_json::json!({
            "ansible": { "useFullyQualifiedCollectionNames": false },
            "inventory": { "path": "/tmp/inventory.json" }
        });

        let settings: AnsibleLsSettings = serde_json::from_value(value).unwrap();
        let resolved = WorkspaceSettings::from(settings);

        assert!(!resolved.ansible.use_fully_qualified_collection_names);
        assert_eq!(resolved.inventory.path, Some(PathBuf::from("/tmp/inventory.json")));
    }
}
