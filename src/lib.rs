//! # Authstore - In-Memory Persistence Adapter
//!
//! Authstore is a lightweight persistence adapter for an external
//! authentication framework's storage contract. It keeps every record in a
//! pluggable key-value store and composes those stores into the full CRUD
//! façade the framework expects.
//!
//! ## Key Features
//!
//! - **Pluggable Storage**: a small store trait with two conforming backends,
//!   a volatile in-memory mapping and a JSON-file-backed variant
//! - **Full Adapter Contract**: users, accounts, sessions, verification
//!   tokens, and WebAuthn authenticators with every required operation
//! - **Session Expiry**: expired sessions are lazily evicted on read
//! - **Single-Use Tokens**: verification tokens are deleted on redemption
//! - **Cascading Deletion**: deleting a user removes its sessions, accounts,
//!   and outstanding verification tokens
//! - **Binary Round-Trips**: byte-sequence fields survive the JSON text
//!   format through a tagged base64 encoding
//! - **Clean API**: PIMPL pattern provides stable, encapsulated interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use authstore::adapter::{Adapter, AdapterStores};
//! use authstore::entity::NewUser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = Adapter::builder(AdapterStores::in_memory()).build();
//!
//! let user = adapter.create_user(NewUser {
//!     email: "user@example.com".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let found = adapter.get_user_by_email("user@example.com")?;
//! assert_eq!(found, Some(user));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`adapter`]: the store registry and the composed CRUD façade
//! - [`store`]: the store trait, the in-memory backend, and the file backend
//! - [`entity`]: the five record types and the tagged binary newtype
//! - [`id`]: id-generation strategy, injectable for tests
//! - [`errors`]: error and result types used throughout the crate
//! - [`common`]: shared locking primitives

pub mod adapter;
pub mod common;
pub mod entity;
pub mod errors;
pub mod id;
pub mod store;

pub use adapter::{Adapter, AdapterBuilder, AdapterCapabilities, AdapterStores};
pub use errors::{AdapterError, AdapterResult, ErrorKind};
