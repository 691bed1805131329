//! Entity record types stored by the adapter.
//!
//! Each entity is an explicit structured record with serde field names
//! matching the external authentication framework's contract. The store
//! layer treats records as opaque values; all lifecycle rules (expiry,
//! single-use redemption, cascades) live in the façade.

mod account;
mod authenticator;
mod binary;
mod session;
mod user;
mod verification_token;

pub use account::Account;
pub use authenticator::Authenticator;
pub use binary::Binary;
pub use session::{Session, SessionPatch};
pub use user::{NewUser, User, UserPatch};
pub use verification_token::VerificationToken;
