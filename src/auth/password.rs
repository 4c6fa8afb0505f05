//! Password hashing and verification.

use crate::types::{AppError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use sha2::{Digest, Sha256};
use tracing::warn;

/// One-way transform of a plaintext password into a stored digest.
pub trait PasswordHasher: Send + Sync {
    /// Produces the digest to store for `password`.
    fn hash(&self, password: &str) -> Result<String>;

    /// Checks `password` against a digest previously produced by [`hash`](Self::hash).
    fn verify(&self, password: &str, digest: &str) -> Result<bool>;

    /// A digest that no password verifies against, used to equalize the cost
    /// of logins for unknown names.
    fn decoy_digest(&self) -> &str;
}

/// Argon2id with a random per-user salt; digests are PHC strings.
pub struct Argon2PasswordHasher {
    decoy: String,
}

impl Argon2PasswordHasher {
    pub fn new() -> Result<Self> {
        let decoy = hash_argon2("decoy password that is never accepted")?;
        Ok(Self { decoy })
    }
}

fn hash_argon2(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        hash_argon2(password)
    }

    /// A stored digest that is not an Argon2 PHC string (for example one left
    /// by the keyed-digest scheme) never verifies.
    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "stored password digest is not a PHC string");
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn decoy_digest(&self) -> &str {
        &self.decoy
    }
}

/// Deterministic SHA-256 over `secret || password`, hex encoded.
///
/// Unsalted and fast. Kept for stores whose digests were produced this way;
/// new deployments should use [`Argon2PasswordHasher`].
pub struct KeyedDigestHasher {
    secret: Vec<u8>,
}

impl KeyedDigestHasher {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn digest(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for KeyedDigestHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(self.digest(password))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        Ok(self.digest(password) == digest)
    }

    fn decoy_digest(&self) -> &str {
        // Not valid hex, so it never equals a computed digest.
        "!"
    }
}
