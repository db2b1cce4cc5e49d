mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{handlers, registry};

#[derive(Parser)]
#[command(name = "groupcast")]
#[command(version)]
#[command(about = "Broadcast messages to every Telegram group a bot is in, and provision new groups")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the broadcast bot until interrupted
    ///
    /// Reads the bot token from GROUPCAST_BOT_TOKEN. Only the configured
    /// operator_id can use /start, /broadcast, /cancel and /skip.
    Serve {
        /// Path to config file
        #[arg(long, default_value = cli::DEFAULT_CONFIG_ARG)]
        config: String,
    },

    /// Create groups in bulk and make the configured helpers admins in each
    Provision {
        /// Path to config file
        #[arg(long, default_value = cli::DEFAULT_CONFIG_ARG)]
        config: String,

        /// Number of groups to create (overrides provisioning.group_count)
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Inspect or edit the tracked group registry
    ///
    /// Stop `groupcast serve` before using add or remove: a running bot rewrites the
    /// whole registry from memory on its next change and discards offline edits.
    Registry {
        #[command(subcommand)]
        command: registry::RegistryCommands,
    },

    /// Write a default configuration file
    Config {
        /// Create the configuration file
        #[arg(long)]
        init: bool,

        /// Path to config file
        #[arg(long, default_value = cli::DEFAULT_CONFIG_ARG)]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            handlers::handle_serve(&config).await?;
        }
        Commands::Provision { config, count } => {
            handlers::handle_provision(&config, count).await?;
        }
        Commands::Registry { command } => {
            registry::handle_registry_command(command)?;
        }
        Commands::Config { init, config } => {
            if init {
                handlers::handle_config_init(&config)?;
            } else {
                println!("Config command requires --init flag");
                println!("Usage: groupcast config --init [--config PATH]");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_provision_with_count() {
        let parsed = Cli::try_parse_from(["groupcast", "provision", "-n", "3"]).unwrap();
        match parsed.command {
            Commands::Provision { config, count } => {
                assert_eq!(count, Some(3));
                assert_eq!(config, cli::DEFAULT_CONFIG_ARG);
            }
            _ => panic!("expected provision"),
        }
    }

    #[test]
    fn test_registry_help_warns_about_running_bot() {
        let command = Cli::command();
        let registry = command.find_subcommand("registry").unwrap();
        let help = registry.get_long_about().unwrap().to_string();
        assert!(help.contains("Stop `groupcast serve`"));
    }

    #[test]
    fn test_parse_registry_remove() {
        let parsed = Cli::try_parse_from(["groupcast", "registry", "remove", "-1001"]).unwrap();
        assert!(matches!(
            parsed.command,
            Commands::Registry {
                command: registry::RegistryCommands::Remove { id: -1001, .. }
            }
        ));
    }
}
