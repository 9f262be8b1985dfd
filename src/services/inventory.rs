//! Inventory hosts for `hosts:` and `ansible_host` completion.
//!
//! Hosts come from the JSON printed by `ansible-inventory --list`, saved to
//! the file named by the `inventory.path` setting.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::Value;

use super::RankedName;
use crate::config::InventorySettings;
use crate::error::AnsibleLsResult;

pub const RANK_TOP_LEVEL_GROUP: u32 = 1;
pub const RANK_CHILD_GROUP: u32 = 2;
pub const RANK_UNGROUPED_HOST: u32 = 3;
pub const RANK_GROUP_HOST: u32 = 4;
pub const RANK_LOCALHOST: u32 = 5;
pub const RANK_ALL: u32 = 6;

#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn hosts(&self) -> AnsibleLsResult<Vec<RankedName>>;
}

/// Ranks groups and hosts of an inventory listing: top-level groups first,
/// then leaf groups nested below them, ungrouped hosts, `localhost`, `all`,
/// and finally the hosts of every group.
pub fn parse_inventory_hosts(inventory: &Value) -> Vec<RankedName> {
    let names = |value: Option<&Value>| -> Vec<String> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    };
    let children_of = |group: &str| inventory.get(group).and_then(|g| g.get("children"));

    let top_level: Vec<String> = names(children_of("all"))
        .into_iter()
        .filter(|group| group != "ungrouped")
        .collect();
    let with_children: Vec<String> = top_level
        .iter()
        .filter(|group| children_of(group).is_some())
        .cloned()
        .collect();
    let mut nested = Vec::new();
    collect_leaf_groups(inventory, &with_children, &mut nested, 0);

    let groups: Vec<RankedName> = top_level
        .into_iter()
        .map(|g| RankedName::new(g, RANK_TOP_LEVEL_GROUP))
        .chain(nested.into_iter().map(|g| RankedName::new(g, RANK_CHILD_GROUP)))
        .collect();

    let mut hosts = vec![
        RankedName::new("localhost", RANK_LOCALHOST),
        RankedName::new("all", RANK_ALL),
    ];
    hosts.extend(
        names(inventory.get("ungrouped").and_then(|g| g.get("hosts")))
            .into_iter()
            .map(|h| RankedName::new(h, RANK_UNGROUPED_HOST)),
    );
    for group in &groups {
        hosts.extend(
            names(inventory.get(&group.name).and_then(|g| g.get("hosts")))
                .into_iter()
                .map(|h| RankedName::new(h, RANK_GROUP_HOST)),
        );
    }

    groups.into_iter().chain(hosts).collect()
}

const MAX_GROUP_DEPTH: usize = 32;

fn collect_leaf_groups(inventory: &Value, groups: &[String], leaves: &mut Vec<String>, depth: usize) {
    if depth > MAX_GROUP_DEPTH {
        return;
    }
    for group in groups {
        match inventory
            .get(group)
            .and_then(|g| g.get("children"))
            .and_then(Value::as_array)
        {
            Some(children) => {
                let children: Vec<String> = children
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect();
                collect_leaf_groups(inventory, &children, leaves, depth + 1);
            }
            None => leaves.push(group.clone()),
        }
    }
}

/// Inventory loaded from the configured JSON file.
pub struct InventoryLibrary {
    hosts: ArcSwap<Vec<RankedName>>,
}

impl Default for InventoryLibrary {
    fn default() -> Self {
        Self {
            hosts: ArcSwap::from_pointee(Vec::new()),
        }
    }
}

impl InventoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hosts(hosts: Vec<RankedName>) -> Self {
        Self {
            hosts: ArcSwap::from_pointee(hosts),
        }
    }

    /// Re-reads the inventory file. Without a configured path the inventory
    /// becomes empty.
    pub async fn reload(&self, settings: &InventorySettings) -> AnsibleLsResult<usize> {
        let hosts = match &settings.path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await?;
                parse_inventory_hosts(&serde_json::from_str(&text)?)
            }
            None => Vec::new(),
        };
        let count = hosts.len();
        self.hosts.store(Arc::new(hosts));
        log::info!(target: "ansible_ls::inventory", "Loaded {} inventory entries", count);
        Ok(count)
    }
}

#[async_trait]
impl InventoryProvider for InventoryLibrary {
    async fn hosts(&self) -> AnsibleLsResult<Vec<RankedName>> {
        Ok(self.hosts.load().as_ref().clone())
    }
}
