//! Fan-out delivery of finished broadcasts

mod broadcaster;
mod transport;

pub use broadcaster::{Broadcaster, DEFAULT_PROGRESS_EVERY};
pub use transport::DeliveryTransport;
