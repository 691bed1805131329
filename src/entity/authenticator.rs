use serde::{Deserialize, Serialize};

use crate::entity::Binary;

/// A WebAuthn authenticator record.
///
/// # Purpose
/// Stores the credential material registered by a user's authenticator. The
/// record is keyed in its store by the base64url text form of
/// `credential_id` (see [`Binary::to_key`]), because raw byte sequences are
/// not usable as container keys. Lookups by account use
/// `provider_account_id`, not the user id directly.
///
/// The `counter` field is replay protection: the external framework rejects
/// assertions whose signature counter did not advance, so counter updates
/// must always write the updated record, never a stale one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticator {
    #[serde(rename = "credentialID")]
    pub credential_id: Binary,
    pub provider_account_id: String,
    pub user_id: String,
    pub credential_public_key: Binary,
    pub counter: u32,
    pub credential_device_type: String,
    pub credential_backed_up: bool,
    #[serde(default)]
    pub transports: Option<String>,
}

impl Authenticator {
    /// Returns the store key for this authenticator.
    pub fn key(&self) -> String {
        self.credential_id.to_key()
    }

    /// Returns a copy of this authenticator with the counter replaced.
    pub fn with_counter(&self, counter: u32) -> Authenticator {
        Authenticator {
            counter,
            ..self.clone()
        }
    }
}
