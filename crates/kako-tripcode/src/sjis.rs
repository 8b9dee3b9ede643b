//! Shift-JIS re-encoding for classic tripcodes.
//!
//! This is the only place that deals with a non-Unicode text encoding.

use std::borrow::Cow;

use encoding_rs::{EncoderResult, SHIFT_JIS};

/// Re-encode a string to Shift-JIS bytes.
///
/// ASCII input is returned borrowed. Characters that Shift-JIS cannot
/// represent become `?`, the substitution legacy converters performed, so
/// that tripcodes of such secrets stay stable.
///
/// # Example
///
/// ```
/// use kako_tripcode::encode_shift_jis;
///
/// assert_eq!(&*encode_shift_jis("abc"), b"abc");
/// assert_eq!(&*encode_shift_jis("あ"), &[0x82, 0xA0]);
/// ```
pub fn encode_shift_jis(s: &str) -> Cow<'_, [u8]> {
    if s.is_ascii() {
        return Cow::Borrowed(s.as_bytes());
    }

    let mut encoder = SHIFT_JIS.new_encoder();
    let mut out = Vec::new();
    let mut rest = s;

    loop {
        if let Some(needed) = encoder.max_buffer_length_from_utf8_without_replacement(rest.len()) {
            out.reserve(needed);
        }
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
        rest = &rest[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }

    Cow::Owned(out)
}
