//! Credential hashing port.

/// Password hashing service.
///
/// Implementations must be slow, salted and one-way.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password into a self-describing hash string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    ///
    /// Returns `false` for a mismatch and for a hash string the service
    /// cannot parse.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Hashing error: {0}")]
    HashingError(String),
}
