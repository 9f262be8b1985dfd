//! External collaborators consulted by completion: role metadata, inventory
//! hosts and variables in scope.

pub mod inventory;
pub mod metadata;
pub mod variables;

pub use inventory::{InventoryLibrary, InventoryProvider, parse_inventory_hosts};
pub use metadata::{MetadataLibrary, MetadataProvider};
pub use variables::{ScopedVariables, VariableProvider};

/// A suggested name with its rank; lower ranks sort first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedName {
    pub name: String,
    pub rank: u32,
}

impl RankedName {
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}
