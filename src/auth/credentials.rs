use crate::auth::password::PasswordHasher;
use crate::db::{CredentialStore, InsertUserError, NewUser, UserIdGenerator};
use crate::types::{AppError, Identity, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_NAME_LEN: usize = 64;
const MAX_PASSWORD_LEN: usize = 1024;
/// Fresh identifiers drawn before an id collision is treated as a store fault.
const ID_ATTEMPTS: usize = 3;

/// Resolves name+password pairs against the credential store.
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    ids: Arc<dyn UserIdGenerator>,
}

impl CredentialVerifier {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        ids: Arc<dyn UserIdGenerator>,
    ) -> Self {
        Self { store, hasher, ids }
    }

    /// Creates a user and returns its identity.
    ///
    /// Fails with `DuplicateName` when the name is taken. Uniqueness comes from
    /// the store's atomic insert; there is no separate existence check.
    pub async fn register(
        &self,
        name: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity> {
        validate_name(name)?;
        validate_password(password)?;

        let password_hash = self.hash_blocking(password).await?;

        for _ in 0..ID_ATTEMPTS {
            let id = self.ids.next_id();
            let outcome = self
                .store
                .insert_user(NewUser {
                    id,
                    name,
                    password_hash: &password_hash,
                    display_name,
                })
                .await;

            match outcome {
                Ok(()) => {
                    info!(user_id = id, name = %name, "user registered");
                    return Ok(Identity {
                        user_id: id,
                        name: name.to_string(),
                    });
                }
                Err(InsertUserError::DuplicateName) => {
                    debug!(name = %name, "registration rejected: name taken");
                    return Err(AppError::DuplicateName);
                }
                Err(InsertUserError::DuplicateId(id)) => {
                    warn!(user_id = id, "generated user id already assigned, retrying");
                }
                Err(InsertUserError::Store(e)) => return Err(e),
            }
        }

        Err(AppError::StoreUnavailable(format!(
            "no unused user id after {} attempts",
            ID_ATTEMPTS
        )))
    }

    /// Checks a name+password pair.
    ///
    /// Unknown names and wrong passwords both fail with `InvalidCredentials`.
    /// Unknown names still pay for one digest verification.
    pub async fn login(&self, name: &str, password: &str) -> Result<Identity> {
        if name.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "name and password are required".to_string(),
            ));
        }

        let user = self.store.get_user_by_name(name).await?;
        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.hasher.decoy_digest().to_string(),
        };
        let matches = self.verify_blocking(password, digest).await?;

        match user {
            Some(user) if matches => Ok(Identity {
                user_id: user.id,
                name: user.name,
            }),
            _ => {
                debug!(name = %name, "login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, password: &str, digest: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::InvalidInput("name is required".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "name must be at most {} bytes",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AppError::InvalidInput("password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}
