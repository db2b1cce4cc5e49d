//! Data models for groupcast

pub mod broadcast;
pub mod configuration;
pub mod ids;

pub use broadcast::*;
pub use configuration::*;
pub use ids::*;
