// Re-export all items from the submodules
mod inventory_config;

pub use inventory_config::{
    InventoryConfig,
    parse_region_list,
};
