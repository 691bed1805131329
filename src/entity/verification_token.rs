use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use verification token, keyed by the token string itself.
///
/// The `identifier` is the email address the token was issued for. A token is
/// deleted on its first successful redemption; there is no other lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationToken {
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let token = VerificationToken {
            identifier: "alice@example.com".to_string(),
            token: "one-time".to_string(),
            expires: Utc::now(),
        };
        let text = serde_json::to_string(&token).unwrap();
        let restored: VerificationToken = serde_json::from_str(&text).unwrap();
        assert_eq!(token, restored);
    }
}
