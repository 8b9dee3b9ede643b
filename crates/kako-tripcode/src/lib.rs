//! Tripcode derivation for imageboard author names.
//!
//! A tripcode is a pseudo-identity derived from a secret typed after `#` in
//! the name field, so that the secret itself is never displayed.
//!
//! Two kinds exist:
//! - **Classic** (`!xxxxxxxxxx`): the secret is re-encoded to Shift-JIS and
//!   run through traditional DES `crypt(3)`, see [`classic_tripcode`].
//! - **Secure** (`!!xxxxxxxxxxx`): SHA-1 over the secret and a server-side
//!   salt, see [`secure_tripcode`].
//!
//! # Example
//!
//! ```
//! use kako_tripcode::{SecureSalt, parse_name};
//!
//! let parsed = parse_name("Anonymous #password", &SecureSalt::empty());
//! assert_eq!(parsed.name, "Anonymous");
//! assert_eq!(parsed.trip, "!ozOtJW9BFA");
//! ```

mod classic;
mod secure;
mod sjis;

pub use classic::classic_tripcode;
pub use secure::{SaltError, SecureSalt, secure_tripcode};
pub use sjis::encode_shift_jis;

/// Display name and tripcode split out of a raw name field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameAndTrip {
    /// Name to display (trimmed when a secret was present).
    pub name: String,
    /// Classic tripcode followed by secure tripcode; either may be empty.
    pub trip: String,
}

/// Split a raw name field into display name and tripcode.
///
/// Everything before the first `#` is the display name. The remainder is
/// split at the next run of `#` characters: the first part is the classic
/// secret, the second (when present, even if empty) the secure secret.
///
/// A name without `#` is returned untouched with an empty tripcode.
pub fn parse_name(raw: &str, salt: &SecureSalt) -> NameAndTrip {
    let Some((name, secret)) = raw.split_once('#') else {
        return NameAndTrip {
            name: raw.to_owned(),
            trip: String::new(),
        };
    };

    let (classic_secret, secure_secret) = match secret.split_once('#') {
        Some((classic, rest)) => (classic, Some(rest.trim_start_matches('#'))),
        None => (secret, None),
    };

    let mut trip = classic_tripcode(classic_secret);
    if let Some(secure_secret) = secure_secret {
        trip.push_str(&secure_tripcode(secure_secret, salt));
    }

    NameAndTrip {
        name: trim_blank(name).to_owned(),
        trip,
    }
}

/// Trim the blank characters the archive has always trimmed from names and
/// secrets: space, tab, line breaks, NUL and vertical tab.
pub(crate) fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
