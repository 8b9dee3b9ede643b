//! Classic DES-crypt tripcodes.

use crate::sjis::encode_shift_jis;
use crate::trim_blank;

/// Characters of the salt range that `crypt(3)` does not accept, and their
/// replacements.
const SALT_FROM: &[u8; 13] = b":;<=>?@[\\]^_`";
const SALT_TO: &[u8; 13] = b"ABCDEFGabcdef";

/// Length of the visible part of a classic tripcode.
const CLASSIC_LEN: usize = 10;

/// Derive a classic tripcode (`!` followed by 10 characters).
///
/// Returns an empty string when the secret is blank.
///
/// # Example
///
/// ```
/// use kako_tripcode::classic_tripcode;
///
/// assert_eq!(classic_tripcode("password"), "!ozOtJW9BFA");
/// assert_eq!(classic_tripcode("  "), "");
/// ```
pub fn classic_tripcode(secret: &str) -> String {
    if trim_blank(secret).is_empty() {
        return String::new();
    }

    let key = encode_shift_jis(secret);
    let salt = derive_salt(&key);

    match pwhash::unix_crypt::hash_with(&salt, &*key) {
        Ok(hash) => {
            let start = hash.len().saturating_sub(CLASSIC_LEN);
            format!("!{}", &hash[start..])
        }
        Err(e) => {
            tracing::debug!(error = %e, "crypt rejected tripcode secret");
            String::new()
        }
    }
}

/// Derive the two-character crypt salt from the second and third bytes of
/// the encoded secret (padded with `H.`).
fn derive_salt(key: &[u8]) -> String {
    let mut padded = Vec::with_capacity(key.len() + 2);
    padded.extend_from_slice(key);
    padded.extend_from_slice(b"H.");

    padded[1..3]
        .iter()
        .map(|&b| {
            let b = if (b'.'..=b'z').contains(&b) { b } else { b'.' };
            SALT_FROM
                .iter()
                .position(|&from| from == b)
                .map_or(b, |idx| SALT_TO[idx])
        })
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_known_tripcodes() {
        assert_eq!(classic_tripcode("password"), "!ozOtJW9BFA");
        assert_eq!(classic_tripcode("faggot"), "!Ep8pui8Vw2");
        assert_eq!(classic_tripcode("abc"), "!GmgU93SCyE");
    }

    #[test]
    fn test_single_character_uses_padding_salt() {
        assert_eq!(derive_salt(b"a"), "H.");
        assert_eq!(classic_tripcode("a"), "!ZnBI2EKkq.");
    }

    #[test]
    fn test_whitespace_secret_is_empty() {
        assert_eq!(classic_tripcode(" "), "");
        assert_eq!(classic_tripcode("\t\r\n"), "");
        assert_eq!(classic_tripcode(""), "");
    }

    #[test]
    fn test_salt_out_of_range_becomes_dot() {
        assert_eq!(derive_salt(b"x!~"), "..");
    }

    #[test]
    fn test_salt_remapping() {
        assert_eq!(derive_salt(b"x:`"), "Af");
        assert_eq!(derive_salt(b"x@["), "Ga");
    }

    #[test]
    fn test_salt_of_shift_jis_bytes() {
        // 0x82 0xA0 are outside the salt range.
        assert_eq!(derive_salt(&encode_shift_jis("あ")), "..");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(classic_tripcode("same"), classic_tripcode("same"));
    }

    proptest! {
        #[test]
        fn prop_classic_shape(secret in "[ -~]{0,16}") {
            let trip = classic_tripcode(&secret);
            if secret.trim().is_empty() {
                prop_assert_eq!(trip, "");
            } else {
                prop_assert!(trip.starts_with('!'));
                prop_assert_eq!(trip.len(), 1 + CLASSIC_LEN);
                prop_assert!(trip[1..].bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'/'));
            }
        }
    }
}
