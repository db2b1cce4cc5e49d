//! Remote administrative interface used by the provisioning loop

use crate::error::AdminError;
use crate::models::ChatId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A freshly created group, as returned by the admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedChat {
    pub id: ChatId,
    /// Opaque handle the admin session needs to address the group again.
    #[serde(default)]
    pub access_hash: i64,
    pub title: String,
}

/// Administrator capabilities granted to helper identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRights {
    pub change_info: bool,
    pub post_messages: bool,
    pub edit_messages: bool,
    pub delete_messages: bool,
    pub ban_users: bool,
    pub invite_users: bool,
    pub pin_messages: bool,
    pub add_admins: bool,
    pub manage_call: bool,
}

impl AdminRights {
    /// Every administrative right enabled.
    pub const fn full() -> Self {
        Self {
            change_info: true,
            post_messages: true,
            edit_messages: true,
            delete_messages: true,
            ban_users: true,
            invite_users: true,
            pin_messages: true,
            add_admins: true,
            manage_call: true,
        }
    }
}

/// User-session operations: create groups, invite members, grant admin rights.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create a group. `megagroup` selects a supergroup over a broadcast channel.
    async fn create_destination(
        &self,
        title: &str,
        about: &str,
        megagroup: bool,
    ) -> Result<ProvisionedChat, AdminError>;

    async fn invite_member(&self, chat: &ProvisionedChat, member: &str) -> Result<(), AdminError>;

    async fn set_admin_rights(
        &self,
        chat: &ProvisionedChat,
        member: &str,
        rights: &AdminRights,
        rank: &str,
    ) -> Result<(), AdminError>;

    /// Close the underlying session.
    async fn disconnect(&self) -> Result<(), AdminError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_rights_enable_everything() {
        let json = serde_json::to_value(AdminRights::full()).unwrap();
        let fields = json.as_object().unwrap();
        assert_eq!(fields.len(), 9);
        assert!(fields.values().all(|v| v == &serde_json::Value::Bool(true)));
    }
}
