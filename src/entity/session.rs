use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A session record keyed by its session token.
///
/// Carries an expiry instant. Sessions are the only entity with an automatic
/// lifecycle transition: a session whose expiry has passed is lazily evicted
/// the next time it is read through the façade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Checks whether this session's expiry instant has passed.
    ///
    /// Expiry is a strict comparison: a session expiring exactly at `now`
    /// is still live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires < now
    }

    /// Returns a copy of this session with the patch applied (shallow merge).
    pub fn merged(&self, patch: &SessionPatch) -> Session {
        Session {
            session_token: self.session_token.clone(),
            user_id: patch
                .user_id
                .clone()
                .unwrap_or_else(|| self.user_id.clone()),
            expires: patch.expires.unwrap_or(self.expires),
        }
    }
}

/// A partial session update, keyed by `session_token`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionPatch {
    pub session_token: String,
    pub user_id: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}
