//! # Groupcast Core Library
//!
//! Destination registry, broadcast authoring state machine, fan-out delivery and the
//! group provisioning loop. Remote collaborators (Telegram Bot API, admin gateway) are
//! reached through traits so every flow can run against test doubles.

pub mod authoring;
pub mod broadcast;
pub mod error;
pub mod models;
pub mod provision;
pub mod registry;
pub mod retry;
pub mod services;
pub mod telegram;
