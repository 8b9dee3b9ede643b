//! Secure (salted SHA-1) tripcodes.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use sha1::{Digest, Sha1};

/// Length of the visible part of a secure tripcode.
const SECURE_LEN: usize = 11;

/// Error decoding a configured secure tripcode salt.
#[derive(Debug, thiserror::Error)]
#[error("secure tripcode salt is not valid base64")]
pub struct SaltError(#[from] base64::DecodeError);

/// Server-side salt mixed into every secure tripcode.
///
/// Kept out of `Debug` output.
#[derive(Clone, Default)]
pub struct SecureSalt(Vec<u8>);

impl SecureSalt {
    /// An empty salt (secure tripcodes then only depend on the secret).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Use raw salt bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a base64-encoded salt, the form it is stored in configuration.
    pub fn from_base64(encoded: &str) -> Result<Self, SaltError> {
        Ok(Self(BASE64_STANDARD.decode(encoded.trim())?))
    }

    /// Raw salt bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecureSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureSalt({} bytes)", self.0.len())
    }
}

/// Derive a secure tripcode (`!!` followed by 11 characters).
///
/// # Example
///
/// ```
/// use kako_tripcode::{SecureSalt, secure_tripcode};
///
/// let salt = SecureSalt::from_bytes(*b"kakosalt");
/// assert_eq!(secure_tripcode("secret", &salt), "!!ZfStcew5KBY");
/// ```
pub fn secure_tripcode(secret: &str, salt: &SecureSalt) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt.as_bytes());
    let encoded = BASE64_STANDARD.encode(hasher.finalize());

    format!("!!{}", &encoded[..SECURE_LEN])
}
