//! Long-running bot service, its provider seams, and logging

pub mod bot;
pub mod console;
pub mod inbound;
pub mod logging;

pub use bot::{BotService, DEFAULT_SESSION_TIMEOUT};
pub use console::OperatorConsole;
pub use inbound::{BotCommand, InboundEvent, UpdateSource};
