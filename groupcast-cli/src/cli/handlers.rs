//! CLI command handlers

use anyhow::{Context, Result};
use groupcast_core::broadcast::Broadcaster;
use groupcast_core::models::{Configuration, BOT_TOKEN_ENV};
use groupcast_core::provision::{HttpAdminGateway, ProvisionPlan, ProvisioningLoop};
use groupcast_core::registry::{DestinationRegistry, JsonFileStore};
use groupcast_core::services::logging::init_logging;
use groupcast_core::services::BotService;
use groupcast_core::telegram::TelegramBotApi;
use std::sync::Arc;

use super::{load_config, resolve_config_path};

fn start_logging(config: &Configuration) -> Result<()> {
    init_logging(config.log_level).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Handle the 'serve' command
pub async fn handle_serve(config_arg: &str) -> Result<()> {
    let config = load_config(config_arg)?;
    start_logging(&config)?;

    if let Err(errors) = config.validate() {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    let operator = config
        .operator()
        .ok_or_else(|| anyhow::anyhow!("operator_id must be set"))?;

    let token = std::env::var(BOT_TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} is not set", BOT_TOKEN_ENV))?;

    let api = Arc::new(
        TelegramBotApi::from_settings(token, &config.telegram)
            .with_parse_mode(config.broadcast.parse_mode()),
    );

    let registry = Arc::new(DestinationRegistry::open(Arc::new(JsonFileStore::new(
        &config.registry_path,
    ))));
    tracing::info!(
        path = %config.registry_path.display(),
        destinations = registry.len(),
        "registry loaded"
    );

    let broadcaster = Broadcaster::new(api.clone(), registry.clone(), operator.private_chat())
        .with_progress_every(config.broadcast.progress_every)
        .with_delivery_interval(config.broadcast.delivery_interval());

    let service = BotService::new(registry, broadcaster, api.clone(), operator)
        .with_session_timeout(config.broadcast.session_timeout());

    println!("🤖 Bot is running... (Ctrl-C to stop)");
    service.run(api.as_ref()).await
}

/// Handle the 'provision' command
pub async fn handle_provision(config_arg: &str, count: Option<u32>) -> Result<()> {
    let mut config = load_config(config_arg)?;
    if let Err(errors) = config.validate_provisioning() {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    start_logging(&config)?;
    if let Some(count) = count {
        config.provisioning.group_count = count;
    }

    let gateway = HttpAdminGateway::new(&config.provisioning.gateway_url)
        .context("Failed to create admin gateway client")?;
    let plan = ProvisionPlan::from_settings(&config.provisioning);

    println!(
        "Creating {} groups titled \"{}\"",
        plan.group_count,
        plan.title(0)
    );
    let summary = ProvisioningLoop::new(Arc::new(gateway), plan).run().await;

    for chat in &summary.created {
        println!("✅ {} ({})", chat.title, chat.id);
    }
    for index in &summary.failed_indices {
        println!("❌ group {} could not be created", index + 1);
    }
    for setup in summary.exhausted() {
        println!(
            "⚠️  {} was not made admin in {} after {} attempts",
            setup.helper, setup.chat, setup.attempts
        );
    }
    println!(
        "Created {} of {} groups",
        summary.created.len(),
        summary.created.len() + summary.failed_indices.len()
    );
    Ok(())
}

/// Handle the 'config --init' command
pub fn handle_config_init(config_arg: &str) -> Result<()> {
    let path = resolve_config_path(config_arg)?;
    if path.exists() {
        println!("Configuration already exists: {}", path.display());
        return Ok(());
    }

    Configuration::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Configuration written to {}", path.display());
    println!("Set operator_id and export {} before running 'groupcast serve'", BOT_TOKEN_ENV);
    Ok(())
}
