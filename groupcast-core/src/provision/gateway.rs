//! JSON-over-HTTP client for a user-session admin gateway
//!
//! The gateway holds the authenticated user session and exposes one POST endpoint per
//! operation. Responses are `{"ok": true, "result": ...}` or `{"ok": false, "error": "..."}`.

use crate::error::AdminError;
use crate::provision::api::{AdminApi, AdminRights, ProvisionedChat};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
struct GatewayResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpAdminGateway {
    base: Url,
    client: Client,
}

impl HttpAdminGateway {
    pub fn new(base: &str) -> Result<Self, AdminError> {
        let mut base =
            Url::parse(base).map_err(|e| AdminError::Api(format!("invalid gateway URL: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    pub fn endpoint(&self, method: &str) -> Result<Url, AdminError> {
        self.base
            .join(method)
            .map_err(|e| AdminError::Api(format!("invalid gateway endpoint {}: {}", method, e)))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<Option<T>, AdminError> {
        let url = self.endpoint(method)?;
        let res = self.client.post(url).json(&body).send().await?;
        let status = res.status();
        let text = res.text().await?;
        decode_response(method, status, &text)
    }
}

fn decode_response<T: DeserializeOwned>(
    method: &str,
    status: StatusCode,
    text: &str,
) -> Result<Option<T>, AdminError> {
    let body: GatewayResponse<T> = serde_json::from_str(text)
        .map_err(|e| AdminError::Api(format!("{} returned HTTP {}: {}", method, status, e)))?;
    if !body.ok {
        return Err(AdminError::Api(body.error.unwrap_or_else(|| {
            format!("{} failed with HTTP {}", method, status)
        })));
    }
    Ok(body.result)
}

#[async_trait]
impl AdminApi for HttpAdminGateway {
    async fn create_destination(
        &self,
        title: &str,
        about: &str,
        megagroup: bool,
    ) -> Result<ProvisionedChat, AdminError> {
        let chat: Option<ProvisionedChat> = self
            .call(
                "createChannel",
                serde_json::json!({
                    "title": title,
                    "about": about,
                    "megagroup": megagroup,
                }),
            )
            .await?;
        chat.ok_or_else(|| AdminError::Api("createChannel returned no chat".to_string()))
    }

    async fn invite_member(&self, chat: &ProvisionedChat, member: &str) -> Result<(), AdminError> {
        self.call::<serde_json::Value>(
            "inviteToChannel",
            serde_json::json!({
                "chat": chat,
                "users": [member],
            }),
        )
        .await?;
        Ok(())
    }

    async fn set_admin_rights(
        &self,
        chat: &ProvisionedChat,
        member: &str,
        rights: &AdminRights,
        rank: &str,
    ) -> Result<(), AdminError> {
        self.call::<serde_json::Value>(
            "editAdmin",
            serde_json::json!({
                "chat": chat,
                "user": member,
                "admin_rights": rights,
                "rank": rank,
            }),
        )
        .await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), AdminError> {
        self.call::<serde_json::Value>("disconnect", serde_json::json!({}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let gateway = HttpAdminGateway::new("http://localhost:8088/api").unwrap();
        assert_eq!(
            gateway.endpoint("createChannel").unwrap().as_str(),
            "http://localhost:8088/api/createChannel"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(HttpAdminGateway::new("not a url").is_err());
    }

    #[test]
    fn test_decode_response_reads_created_chat() {
        let chat: Option<ProvisionedChat> = decode_response(
            "createChannel",
            StatusCode::OK,
            r#"{"ok": true, "result": {"id": -1009, "access_hash": 77, "title": "August 2025 Group 1"}}"#,
        )
        .unwrap();
        let chat = chat.unwrap();
        assert_eq!(chat.id, crate::models::ChatId(-1009));
        assert_eq!(chat.title, "August 2025 Group 1");

        let empty: Option<serde_json::Value> =
            decode_response("disconnect", StatusCode::OK, r#"{"ok": true}"#).unwrap();
        assert!(empty.is_none());

        let err = decode_response::<ProvisionedChat>(
            "createChannel",
            StatusCode::BAD_REQUEST,
            r#"{"ok": false, "error": "CHANNELS_TOO_MUCH"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("CHANNELS_TOO_MUCH"));
    }

    #[test]
    fn test_error_response_decodes() {
        let body: GatewayResponse<ProvisionedChat> =
            serde_json::from_str(r#"{"ok": false, "error": "FLOOD_WAIT_30"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("FLOOD_WAIT_30"));
        assert!(body.result.is_none());
    }
}
