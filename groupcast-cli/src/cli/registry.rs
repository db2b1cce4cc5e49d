//! Registry subcommands (list, add, remove)

use anyhow::{Context, Result};
use clap::Subcommand;
use groupcast_core::models::ChatId;
use groupcast_core::registry::{DestinationRegistry, JsonFileStore};
use std::path::Path;
use std::sync::Arc;

use super::{load_config, DEFAULT_CONFIG_ARG};

#[derive(Subcommand)]
pub enum RegistryCommands {
    /// List tracked group ids
    List {
        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG_ARG)]
        config: String,
    },
    /// Start tracking a group id
    Add {
        /// Group chat id (usually negative)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG_ARG)]
        config: String,
    },
    /// Stop tracking a group id
    Remove {
        /// Group chat id (usually negative)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG_ARG)]
        config: String,
    },
}

fn open_registry(path: &Path) -> DestinationRegistry {
    DestinationRegistry::open(Arc::new(JsonFileStore::new(path)))
}

pub fn handle_registry_command(command: RegistryCommands) -> Result<()> {
    match command {
        RegistryCommands::List { config } => {
            let config = load_config(&config)?;
            let registry = open_registry(&config.registry_path);
            for id in registry.snapshot() {
                println!("{}", id);
            }
            eprintln!("{} groups tracked", registry.len());
        }
        RegistryCommands::Add { id, config } => {
            let config = load_config(&config)?;
            let registry = open_registry(&config.registry_path);
            let added = registry
                .add(ChatId(id))
                .context("Failed to save registry")?;
            if added {
                println!("Added {} ({} groups tracked)", id, registry.len());
            } else {
                println!("{} is already tracked", id);
            }
        }
        RegistryCommands::Remove { id, config } => {
            let config = load_config(&config)?;
            let registry = open_registry(&config.registry_path);
            let removed = registry
                .remove(ChatId(id))
                .context("Failed to save registry")?;
            if removed {
                println!("Removed {} ({} groups tracked)", id, registry.len());
            } else {
                println!("{} was not tracked", id);
            }
        }
    }
    Ok(())
}
