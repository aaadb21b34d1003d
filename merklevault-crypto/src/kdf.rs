//! Password-based key derivation.
//!
//! Two independent derivations with two independent salts:
//!
//! - The **master key** is re-derived at every login from the password,
//!   the user identity, and a deployment-wide secondary salt. Deterministic,
//!   so the key never has to be persisted.
//! - The **login hash** uses a fresh random salt per user, embedded in the
//!   PHC output string. It exists only for credential verification and its
//!   salt is never reused for master-key derivation.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{pbkdf2_hmac, Params, Pbkdf2};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::key::{MasterKey, KEY_SIZE};

/// Lowest accepted master-key iteration count.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;

/// Default master-key iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 10_000;

/// Iteration count for the login credential hash.
pub const LOGIN_HASH_ITERATIONS: u32 = 100_000;

const LOGIN_SALT_SIZE: usize = 16;

/// Derives the per-user master key from the login password.
///
/// PBKDF2-HMAC-SHA256 over a salt built from `user_identity || deployment_salt`,
/// producing exactly [`KEY_SIZE`] bytes. Deterministic: identical inputs always
/// yield the identical key.
///
/// Malformed input (empty password or identity, iteration count below
/// [`MIN_KDF_ITERATIONS`]) fails with `InvalidParameters` before any
/// stretching work starts.
pub fn derive_master_key(
    password: &str,
    user_identity: &str,
    deployment_salt: &str,
    iterations: u32,
) -> CryptoResult<MasterKey> {
    if password.is_empty() {
        return Err(CryptoError::InvalidParameters(
            "password must not be empty".into(),
        ));
    }
    if user_identity.is_empty() {
        return Err(CryptoError::InvalidParameters(
            "user identity must not be empty".into(),
        ));
    }
    if iterations < MIN_KDF_ITERATIONS {
        return Err(CryptoError::InvalidParameters(format!(
            "iteration count {iterations} below minimum {MIN_KDF_ITERATIONS}"
        )));
    }

    // Per-user salt: identity concatenated with the deployment-wide salt,
    // exactly as the login flow reconstructs it.
    let salt = [user_identity.as_bytes(), deployment_salt.as_bytes()].concat();

    let mut out = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut out);
    Ok(MasterKey::from_bytes(out))
}

/// Hashes a password for credential storage.
///
/// Returns a PHC string (`$pbkdf2-sha256$...`) carrying its own random salt
/// and iteration count, so the string is the only thing that needs storing.
pub fn hash_login_password(password: &str) -> CryptoResult<String> {
    if password.is_empty() {
        return Err(CryptoError::InvalidParameters(
            "password must not be empty".into(),
        ));
    }

    let mut salt_bytes = [0u8; LOGIN_SALT_SIZE];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CryptoError::PasswordHash(e.to_string()))?;

    let params = Params {
        rounds: LOGIN_HASH_ITERATIONS,
        output_length: KEY_SIZE,
    };

    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(|e| CryptoError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// Recomputes with the embedded salt and compares in constant time.
/// A malformed stored hash is an error, not a failed verification.
pub fn verify_login_password(password: &str, stored: &str) -> CryptoResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| CryptoError::PasswordHash(e.to_string()))?;

    match Pbkdf2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(pbkdf2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CryptoError::PasswordHash(e.to_string())),
    }
}
