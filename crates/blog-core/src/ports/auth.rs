//! Authentication ports: bearer token issuance and password hashing.

/// Claims carried by an identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens bound to a single numeric identity.
pub trait TokenService: Send + Sync {
    /// Issue a token for `user_id`, valid for [`TokenService::expiration_seconds`].
    fn generate_token(&self, user_id: i64) -> Result<String, AuthError>;

    /// Verify signature, algorithm and expiry, then decode the identity.
    ///
    /// Must return an error, never panic, on attacker-controlled input.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}
