//! Provisioning loop: create groups in bulk and make helper bots admins in each

mod api;
mod gateway;
mod runner;

pub use api::{AdminApi, AdminRights, ProvisionedChat};
pub use gateway::HttpAdminGateway;
pub use runner::{
    current_title_stem, HelperSetup, ProvisionPlan, ProvisionSummary, ProvisioningLoop,
};
