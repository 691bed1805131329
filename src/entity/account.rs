use serde::{Deserialize, Serialize};

/// A provider account record keyed by its provider-scoped account id.
///
/// References the owning user by `user_id`; no referential integrity is
/// enforced by the store. The OAuth token fields keep their wire-format
/// snake_case names while the framework-level fields are camelCase, matching
/// the external contract exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    #[serde(default, rename = "refresh_token")]
    pub refresh_token: Option<String>,
    #[serde(default, rename = "access_token")]
    pub access_token: Option<String>,
    #[serde(default, rename = "expires_at")]
    pub expires_at: Option<i64>,
    #[serde(default, rename = "token_type")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, rename = "id_token")]
    pub id_token: Option<String>,
    #[serde(default, rename = "session_state")]
    pub session_state: Option<String>,
}
