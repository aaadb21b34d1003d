//! Registration, login, and session establishment.
//!
//! Login is the only point where the master key exists in derivable form:
//! the password is checked against the stored PHC hash, then the key is
//! re-derived from the password and placed in the session cache with the
//! login token's expiry. Nothing key-shaped touches durable storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use merklevault_crypto::{derive_master_key, hash_login_password, verify_login_password};
use merklevault_storage::{StorageError, UserRecord, UserStore};
use tracing::{debug, info};

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::session::MasterKeySession;

/// Credential verification and master-key session establishment.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    session: MasterKeySession,
    config: VaultConfig,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, session: MasterKeySession, config: VaultConfig) -> Self {
        Self {
            users,
            session,
            config,
        }
    }

    /// Registers a new user.
    ///
    /// The stored login hash carries its own random salt, independent of
    /// master-key derivation.
    pub async fn register(&self, email: &str, password: &str) -> VaultResult<()> {
        if email.is_empty() {
            return Err(VaultError::InvalidParameters("email must not be empty".into()));
        }

        let password_hash = hash_login_password(password)?;
        match self.users.insert(UserRecord::new(email, password_hash)).await {
            Ok(()) => {
                info!("registered user {email}");
                Ok(())
            }
            Err(StorageError::AlreadyExists(email)) => Err(VaultError::EmailInUse(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Verifies credentials, derives the master key, and caches it.
    ///
    /// Returns the session expiry. Unknown email and wrong password are the
    /// same `InvalidCredentials` to the caller.
    pub async fn login(&self, email: &str, password: &str) -> VaultResult<DateTime<Utc>> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(VaultError::InvalidCredentials)?;

        if !verify_login_password(password, &user.password_hash)? {
            debug!("failed login attempt for {email}");
            return Err(VaultError::InvalidCredentials);
        }

        let master_key = derive_master_key(
            password,
            email,
            &self.config.deployment_salt,
            self.config.kdf_iterations,
        )?;

        let expires_at = Utc::now() + self.config.session_ttl();
        self.session.store(email, master_key, expires_at).await;
        info!("established master-key session for {email}");
        Ok(expires_at)
    }

    /// Revokes the owner's cached master key.
    pub async fn logout(&self, email: &str) {
        self.session.remove(email).await;
        info!("logged out {email}");
    }
}
