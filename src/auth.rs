//! Write gate for record mutations.
//!
//! Every create, update, or delete requires a PIN supplied by the operator.
//! This is a convenience gate against accidental edits, not access control:
//! the secret is shared, unattributed, and unrotated. Hosts that need real
//! authorization must layer it on top. The secret is never baked into the
//! library; callers provide it at construction time.

use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("write PIN must not be empty")]
    EmptyPin,
    #[error("write PIN does not match")]
    BadPin,
}

/// Holder of the configured write PIN.
#[derive(Debug)]
pub struct WritePin {
    secret: String,
}

impl WritePin {
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::EmptyPin);
        }
        Ok(Self { secret })
    }

    /// Checks a supplied PIN in constant time and mints a token on success.
    pub fn verify(&self, supplied: &str) -> Result<WriteToken, AuthError> {
        if bool::from(self.secret.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(WriteToken { _private: () })
        } else {
            Err(AuthError::BadPin)
        }
    }
}

/// Proof of a successful PIN check, demanded by every mutating storage call.
///
/// Only [`WritePin::verify`] can construct one.
#[derive(Debug)]
pub struct WriteToken {
    _private: (),
}
