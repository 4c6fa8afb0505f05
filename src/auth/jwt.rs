use crate::types::{AppError, Claims, Identity, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Why a session token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

/// Issues and verifies HS256 session tokens.
///
/// Tokens are stateless: a token is valid iff its signature verifies against
/// the server secret and the verification instant is strictly before its
/// `exp` claim. Instants are whole Unix seconds; `issue` truncates `now`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    issuer: String,
}

impl TokenCodec {
    /// Creates a codec signing with `secret`.
    ///
    /// # Arguments
    /// * `secret` - HMAC key shared by issue and verify
    /// * `lifetime_secs` - Token validity in seconds
    /// * `issuer` - Value of the `iss` claim, required on verification
    pub fn new(secret: &[u8], lifetime_secs: i64, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        // Only HS256 is accepted; expiry is checked against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime: Duration::seconds(lifetime_secs),
            issuer,
        }
    }

    /// Token lifetime in whole seconds.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    /// Signs a token for `identity`, valid from `now` until `now + lifetime`.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let claims = Claims {
            uid: identity.user_id,
            name: identity.name.clone(),
            iat,
            exp: iat + self.lifetime.num_seconds(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies `token` at instant `now` and returns the embedded identity.
    pub fn verify(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Identity, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity {
            user_id: claims.uid,
            name: claims.name,
        })
    }
}
