//! The entity registry and CRUD façade.
//!
//! [`AdapterStores`] binds five named stores into one structure;
//! [`Adapter`] composes store operations into the external authentication
//! framework's required adapter contract.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

use crate::entity::{
    Account, Authenticator, Binary, NewUser, Session, SessionPatch, User, UserPatch,
    VerificationToken,
};
use crate::errors::{AdapterError, AdapterResult, ErrorKind};
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::store::{FileStore, InMemoryStore, Store};

/// The fixed set of five named stores the façade operates on.
///
/// Every store holds one entity type keyed by that entity's natural key.
/// The registry is backend-agnostic; any [`crate::store::StoreProvider`]
/// implementation can be plugged in per entity.
#[derive(Clone)]
pub struct AdapterStores {
    pub users: Store<User>,
    pub accounts: Store<Account>,
    pub sessions: Store<Session>,
    pub verification_tokens: Store<VerificationToken>,
    pub authenticators: Store<Authenticator>,
}

impl AdapterStores {
    /// Creates a registry of volatile in-memory stores.
    pub fn in_memory() -> Self {
        AdapterStores {
            users: Store::new(InMemoryStore::new("users")),
            accounts: Store::new(InMemoryStore::new("accounts")),
            sessions: Store::new(InMemoryStore::new("sessions")),
            verification_tokens: Store::new(InMemoryStore::new("verification_tokens")),
            authenticators: Store::new(InMemoryStore::new("authenticators")),
        }
    }

    /// Creates a registry of JSON-file-backed stores under `dir`.
    ///
    /// One file per entity type (`users.json`, `accounts.json`, ...). The
    /// directory is created if missing; file initialization itself never
    /// fails (see [`FileStore::open`]).
    pub fn file_backed(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        if let Err(err) = std::fs::create_dir_all(dir) {
            log::warn!(
                "Failed to create store directory {}: {}",
                dir.display(),
                err
            );
        }
        AdapterStores {
            users: Store::new(FileStore::open("users", dir.join("users.json"))),
            accounts: Store::new(FileStore::open("accounts", dir.join("accounts.json"))),
            sessions: Store::new(FileStore::open("sessions", dir.join("sessions.json"))),
            verification_tokens: Store::new(FileStore::open(
                "verification_tokens",
                dir.join("verification_tokens.json"),
            )),
            authenticators: Store::new(FileStore::open(
                "authenticators",
                dir.join("authenticators.json"),
            )),
        }
    }
}

/// The set of sibling operations available on the composed façade.
///
/// The external contract allows partial adapter implementations; cascading
/// user deletion depends on three sibling operations being present. A
/// capability disabled here makes the corresponding operation, and any
/// cascade through it, fail with a configuration error instead of silently
/// skipping the step.
#[derive(Clone, Debug)]
pub struct AdapterCapabilities {
    pub delete_session: bool,
    pub unlink_account: bool,
    pub use_verification_token: bool,
}

impl Default for AdapterCapabilities {
    fn default() -> Self {
        AdapterCapabilities {
            delete_session: true,
            unlink_account: true,
            use_verification_token: true,
        }
    }
}

/// Builder for [`Adapter`].
///
/// Injects the id-generation strategy and the capability set. Defaults:
/// [`RandomIdGenerator`] and all capabilities enabled.
pub struct AdapterBuilder {
    stores: AdapterStores,
    id_generator: Box<dyn IdGenerator>,
    capabilities: AdapterCapabilities,
}

impl AdapterBuilder {
    fn new(stores: AdapterStores) -> AdapterBuilder {
        AdapterBuilder {
            stores,
            id_generator: Box::new(RandomIdGenerator::new()),
            capabilities: AdapterCapabilities::default(),
        }
    }

    /// Replaces the id-generation strategy.
    pub fn id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    /// Removes the session-deletion operation from the composed façade.
    pub fn without_delete_session(mut self) -> Self {
        self.capabilities.delete_session = false;
        self
    }

    /// Removes the account-unlink operation from the composed façade.
    pub fn without_unlink_account(mut self) -> Self {
        self.capabilities.unlink_account = false;
        self
    }

    /// Removes the verification-token redemption operation from the
    /// composed façade.
    pub fn without_use_verification_token(mut self) -> Self {
        self.capabilities.use_verification_token = false;
        self
    }

    pub fn build(self) -> Adapter {
        Adapter {
            inner: Arc::new(AdapterInner {
                stores: self.stores,
                id_generator: self.id_generator,
                capabilities: self.capabilities,
            }),
        }
    }
}

/// The CRUD façade implementing the external adapter contract.
///
/// # Purpose
/// `Adapter` exposes the full operation set the external authentication
/// framework requires: create/read/update/delete per entity, session-expiry
/// eviction, verification-token single-use redemption, authenticator lookup
/// by credential id, and cascading user deletion.
///
/// # Error model
/// - Lookups report misses as `Ok(None)`, never as errors.
/// - Updates of nonexistent records fail with `ErrorKind::PreconditionFailed`.
/// - A cascade through a disabled capability fails with
///   `ErrorKind::ConfigurationError` before touching any record.
/// - I/O failures from file-backed stores propagate unchanged.
///
/// # Usage
/// ```text
/// let adapter = Adapter::builder(AdapterStores::in_memory()).build();
/// let user = adapter.create_user(NewUser { email: "user@example.com".into(), ..Default::default() })?;
/// ```
#[derive(Clone)]
pub struct Adapter {
    inner: Arc<AdapterInner>,
}

impl Adapter {
    /// Starts building an adapter over the given store registry.
    pub fn builder(stores: AdapterStores) -> AdapterBuilder {
        AdapterBuilder::new(stores)
    }

    /// Creates a user, assigning a fresh id from the injected generator.
    ///
    /// Id collisions are not checked; the default generator draws 32
    /// characters from the 62-character alphanumeric alphabet, which is an
    /// accepted risk at this trust level.
    pub fn create_user(&self, new_user: NewUser) -> AdapterResult<User> {
        self.inner.create_user(new_user)
    }

    /// Looks up a user by id.
    pub fn get_user(&self, id: &str) -> AdapterResult<Option<User>> {
        self.inner.stores.users.get(id)
    }

    /// Looks up a user by email via linear scan.
    ///
    /// Email uniqueness is enforced only here, not by the store.
    pub fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<User>> {
        self.inner.get_user_by_email(email)
    }

    /// Two-hop lookup: account by its id, then the owning user.
    ///
    /// Absent if either hop misses.
    pub fn get_user_by_account(&self, provider_account_id: &str) -> AdapterResult<Option<User>> {
        self.inner.get_user_by_account(provider_account_id)
    }

    /// Applies a shallow patch to an existing user.
    ///
    /// Fails with `PreconditionFailed` if the user does not exist; an update
    /// presumes prior existence.
    pub fn update_user(&self, patch: UserPatch) -> AdapterResult<User> {
        self.inner.update_user(patch)
    }

    /// Deletes a user and cascades to its dependent records.
    ///
    /// Deletes the user's sessions, unlinks its accounts, and redeems
    /// verification tokens issued for the user's email, then removes the
    /// user record. All three sibling operations must be enabled; a missing
    /// capability fails fast with `ConfigurationError` before any cascade
    /// step runs. Cascade completion is awaited: when this call returns,
    /// every dependent record is gone.
    pub fn delete_user(&self, id: &str) -> AdapterResult<()> {
        self.inner.delete_user(id)
    }

    /// Stores an account record keyed by its provider-scoped account id.
    pub fn link_account(&self, account: Account) -> AdapterResult<Account> {
        self.inner
            .stores
            .accounts
            .set(&account.provider_account_id.clone(), account.clone())?;
        Ok(account)
    }

    /// Looks up an account by its provider-scoped account id.
    pub fn get_account(&self, provider_account_id: &str) -> AdapterResult<Option<Account>> {
        self.inner.stores.accounts.get(provider_account_id)
    }

    /// Removes an account record. No-op if absent.
    pub fn unlink_account(&self, provider_account_id: &str) -> AdapterResult<()> {
        self.inner.unlink_account(provider_account_id)
    }

    /// Stores a session record keyed by its session token.
    pub fn create_session(&self, session: Session) -> AdapterResult<Session> {
        self.inner
            .stores
            .sessions
            .set(&session.session_token.clone(), session.clone())?;
        Ok(session)
    }

    /// Resolves a session token to its session and owning user.
    ///
    /// This read has a side effect: a session whose expiry instant has
    /// passed is deleted during the call and reported absent. A session
    /// expiring exactly now is still returned.
    pub fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<(Session, User)>> {
        self.inner.get_session_and_user(session_token)
    }

    /// Applies a shallow patch to an existing session.
    ///
    /// Fails with `PreconditionFailed` if the session does not exist.
    pub fn update_session(&self, patch: SessionPatch) -> AdapterResult<Session> {
        self.inner.update_session(patch)
    }

    /// Removes a session record. No-op if absent.
    pub fn delete_session(&self, session_token: &str) -> AdapterResult<()> {
        self.inner.delete_session(session_token)
    }

    /// Stores a verification token keyed by the token string.
    pub fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> AdapterResult<VerificationToken> {
        self.inner
            .stores
            .verification_tokens
            .set(&token.token.clone(), token.clone())?;
        Ok(token)
    }

    /// Redeems a verification token: single-use.
    ///
    /// The token is deleted on its first successful redemption; a second
    /// attempt, or an attempt with a mismatched identifier, reports absent.
    pub fn use_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> AdapterResult<Option<VerificationToken>> {
        self.inner.use_verification_token(identifier, token)
    }

    /// Stores an authenticator keyed by the text encoding of its
    /// credential id.
    pub fn create_authenticator(
        &self,
        authenticator: Authenticator,
    ) -> AdapterResult<Authenticator> {
        self.inner
            .stores
            .authenticators
            .set(&authenticator.key(), authenticator.clone())?;
        Ok(authenticator)
    }

    /// Looks up an authenticator by credential id.
    pub fn get_authenticator(
        &self,
        credential_id: &Binary,
    ) -> AdapterResult<Option<Authenticator>> {
        self.inner.stores.authenticators.get(&credential_id.to_key())
    }

    /// Lists all authenticators registered under a provider account id.
    pub fn list_authenticators_by_account_id(
        &self,
        provider_account_id: &str,
    ) -> AdapterResult<Vec<Authenticator>> {
        self.inner
            .list_authenticators_by_account_id(provider_account_id)
    }

    /// Replaces an authenticator's signature counter.
    ///
    /// Re-reads the current record, fails with `PreconditionFailed` if
    /// absent, and writes back the updated record. The counter is replay
    /// protection; the stale record must never be written.
    pub fn update_authenticator_counter(
        &self,
        credential_id: &Binary,
        counter: u32,
    ) -> AdapterResult<Authenticator> {
        self.inner.update_authenticator_counter(credential_id, counter)
    }

    /// Returns the store registry this façade operates on.
    pub fn stores(&self) -> &AdapterStores {
        &self.inner.stores
    }
}

struct AdapterInner {
    stores: AdapterStores,
    id_generator: Box<dyn IdGenerator>,
    capabilities: AdapterCapabilities,
}

impl AdapterInner {
    fn require_capability(&self, enabled: bool, operation: &str) -> AdapterResult<()> {
        if !enabled {
            log::error!("The {} operation is not available on this adapter", operation);
            return Err(AdapterError::new(
                &format!("The {} operation is not available on this adapter", operation),
                ErrorKind::ConfigurationError,
            ));
        }
        Ok(())
    }

    /// Checks every cascade dependency before any step runs, so a
    /// misconfigured façade fails fast instead of partially cascading.
    fn require_cascade_capabilities(&self) -> AdapterResult<()> {
        self.require_capability(self.capabilities.delete_session, "delete_session")?;
        self.require_capability(self.capabilities.unlink_account, "unlink_account")?;
        self.require_capability(
            self.capabilities.use_verification_token,
            "use_verification_token",
        )?;
        Ok(())
    }

    fn create_user(&self, new_user: NewUser) -> AdapterResult<User> {
        let user = new_user.into_user(self.id_generator.generate());
        self.stores.users.set(&user.id.clone(), user.clone())?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<User>> {
        for user in self.stores.users.values()? {
            if user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    fn get_user_by_account(&self, provider_account_id: &str) -> AdapterResult<Option<User>> {
        let account = match self.stores.accounts.get(provider_account_id)? {
            Some(account) => account,
            None => return Ok(None),
        };
        self.stores.users.get(&account.user_id)
    }

    fn update_user(&self, patch: UserPatch) -> AdapterResult<User> {
        let current = self.stores.users.get(&patch.id)?.ok_or_else(|| {
            log::error!("Cannot update user {}: record does not exist", patch.id);
            AdapterError::new(
                &format!("Cannot update user {}: record does not exist", patch.id),
                ErrorKind::PreconditionFailed,
            )
        })?;

        let updated = current.merged(&patch);
        self.stores.users.set(&patch.id, updated.clone())?;
        Ok(updated)
    }

    fn delete_user(&self, id: &str) -> AdapterResult<()> {
        self.require_cascade_capabilities()?;

        let user = match self.stores.users.get(id)? {
            Some(user) => user,
            // nothing to cascade from
            None => return Ok(()),
        };

        let session_tokens: Vec<String> = self
            .stores
            .sessions
            .values()?
            .filter(|session| session.user_id == id)
            .map(|session| session.session_token)
            .collect();
        for token in session_tokens {
            self.delete_session(&token)?;
        }

        let account_ids: Vec<String> = self
            .stores
            .accounts
            .values()?
            .filter(|account| account.user_id == id)
            .map(|account| account.provider_account_id)
            .collect();
        for provider_account_id in account_ids {
            self.unlink_account(&provider_account_id)?;
        }

        let tokens: Vec<String> = self
            .stores
            .verification_tokens
            .values()?
            .filter(|token| token.identifier == user.email)
            .map(|token| token.token)
            .collect();
        for token in tokens {
            self.use_verification_token(&user.email, &token)?;
        }

        self.stores.users.delete(id)
    }

    fn unlink_account(&self, provider_account_id: &str) -> AdapterResult<()> {
        self.require_capability(self.capabilities.unlink_account, "unlink_account")?;
        self.stores.accounts.delete(provider_account_id)
    }

    fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<(Session, User)>> {
        let session = match self.stores.sessions.get(session_token)? {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired(Utc::now()) {
            log::debug!("Session {} has expired, evicting", session_token);
            self.stores.sessions.delete(session_token)?;
            return Ok(None);
        }

        let user = match self.stores.users.get(&session.user_id)? {
            Some(user) => user,
            None => return Ok(None),
        };
        Ok(Some((session, user)))
    }

    fn update_session(&self, patch: SessionPatch) -> AdapterResult<Session> {
        let current = self
            .stores
            .sessions
            .get(&patch.session_token)?
            .ok_or_else(|| {
                log::error!(
                    "Cannot update session {}: record does not exist",
                    patch.session_token
                );
                AdapterError::new(
                    &format!(
                        "Cannot update session {}: record does not exist",
                        patch.session_token
                    ),
                    ErrorKind::PreconditionFailed,
                )
            })?;

        let updated = current.merged(&patch);
        self.stores
            .sessions
            .set(&patch.session_token, updated.clone())?;
        Ok(updated)
    }

    fn delete_session(&self, session_token: &str) -> AdapterResult<()> {
        self.require_capability(self.capabilities.delete_session, "delete_session")?;
        self.stores.sessions.delete(session_token)
    }

    fn use_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> AdapterResult<Option<VerificationToken>> {
        self.require_capability(
            self.capabilities.use_verification_token,
            "use_verification_token",
        )?;

        let existing = match self.stores.verification_tokens.get(token)? {
            Some(existing) => existing,
            None => return Ok(None),
        };
        if existing.identifier != identifier {
            return Ok(None);
        }

        self.stores.verification_tokens.delete(token)?;
        Ok(Some(existing))
    }

    fn list_authenticators_by_account_id(
        &self,
        provider_account_id: &str,
    ) -> AdapterResult<Vec<Authenticator>> {
        let authenticators = self
            .stores
            .authenticators
            .values()?
            .filter(|authenticator| authenticator.provider_account_id == provider_account_id)
            .collect();
        Ok(authenticators)
    }

    fn update_authenticator_counter(
        &self,
        credential_id: &Binary,
        counter: u32,
    ) -> AdapterResult<Authenticator> {
        let key = credential_id.to_key();
        let current = self.stores.authenticators.get(&key)?.ok_or_else(|| {
            log::error!("Cannot update counter: authenticator {} does not exist", key);
            AdapterError::new(
                &format!("Cannot update counter: authenticator {} does not exist", key),
                ErrorKind::PreconditionFailed,
            )
        })?;

        let updated = current.with_counter(counter);
        self.stores.authenticators.set(&key, updated.clone())?;
        Ok(updated)
    }
}
