use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record keyed by its opaque generated id.
///
/// # Purpose
/// `User` is the primary entity of the adapter. The store layer treats it as
/// an opaque record; uniqueness of `email` is enforced only by lookup logic
/// in the façade, never by the store itself.
///
/// The serialized field names follow the external framework's contract
/// (`emailVerified`, not `email_verified`), so a file-backed store produces
/// exactly the JSON layout that framework expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// Returns a copy of this user with the patch applied.
    ///
    /// Shallow merge: a field present in the patch replaces the prior value,
    /// an absent field keeps it. The merged record is written whole; a user
    /// is never partially updated in place.
    pub fn merged(&self, patch: &UserPatch) -> User {
        User {
            id: self.id.clone(),
            name: patch.name.clone().or_else(|| self.name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            email_verified: patch.email_verified.or(self.email_verified),
            image: patch.image.clone().or_else(|| self.image.clone()),
        }
    }
}

/// Input for user creation; the façade assigns the id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

impl NewUser {
    pub(crate) fn into_user(self, id: String) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            email_verified: self.email_verified,
            image: self.image,
        }
    }
}

/// A partial user update, keyed by `id`.
///
/// Fields set to `None` keep their prior value. Clearing a field back to
/// null is not expressible through a patch; callers needing that write a
/// full record instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}
