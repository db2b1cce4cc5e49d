//! Logging service

use crate::models::{DeliveryOutcome, LogLevel, UserId};

/// Initialize logging with the specified level
pub fn init_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = format!(
        "groupcast={lvl},groupcast_core={lvl}",
        lvl = level.as_str()
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()?;

    Ok(())
}

/// Log the outcome of one delivery attempt
pub fn log_delivery(outcome: &DeliveryOutcome) {
    if outcome.succeeded {
        tracing::info!(destination = %outcome.destination, "message sent to group");
    } else {
        tracing::error!(
            destination = %outcome.destination,
            error = outcome.error_message.as_deref().unwrap_or(""),
            "failed to send to group"
        );
    }
}

/// Log a security event (always logged regardless of level)
pub fn log_security_event(event_type: &str, user: Option<UserId>, details: &str) {
    tracing::warn!(
        event_type = event_type,
        user = %user.map(|u| u.to_string()).unwrap_or_else(|| "unknown".to_string()),
        details = details,
        "Security event"
    );
}

/// Log a system error
pub fn log_error(error: &str, context: Option<&str>) {
    tracing::error!(
        error = error,
        context = context.unwrap_or(""),
        "System error occurred"
    );
}
