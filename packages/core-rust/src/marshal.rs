//! Minimal payload helpers for the built-in `ice_*` object operations.
//!
//! Follows the Ice 1.1 encoding for the few types those operations use:
//! sizes below 255 take one byte, larger sizes are `0xFF` followed by a
//! little-endian `i32`; strings are a size followed by UTF-8 bytes; booleans
//! are a single byte. Anything beyond that belongs to generated code.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Errors from encoding or decoding a built-in operation payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    #[error("unexpected end of payload: needed {needed} more bytes")]
    UnexpectedEnd { needed: usize },
    #[error("size {0} cannot be encoded")]
    SizeOverflow(usize),
    #[error("negative size {0}")]
    NegativeSize(i32),
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
}

fn put_size(buf: &mut BytesMut, size: usize) -> Result<(), MarshalError> {
    match u8::try_from(size) {
        Ok(narrow) if narrow < 255 => buf.put_u8(narrow),
        _ => {
            let wide = i32::try_from(size).map_err(|_| MarshalError::SizeOverflow(size))?;
            buf.put_u8(0xFF);
            buf.put_i32_le(wide);
        }
    }
    Ok(())
}

fn put_string(buf: &mut BytesMut, value: &str) -> Result<(), MarshalError> {
    put_size(buf, value.len())?;
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Encodes a single string.
///
/// # Errors
///
/// Returns [`MarshalError::SizeOverflow`] if the string is longer than `i32::MAX` bytes.
pub fn encode_string(value: &str) -> Result<Bytes, MarshalError> {
    let mut buf = BytesMut::with_capacity(value.len() + 5);
    put_string(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Encodes a sequence of strings.
///
/// # Errors
///
/// Returns [`MarshalError::SizeOverflow`] if a size does not fit in an `i32`.
pub fn encode_string_seq<S: AsRef<str>>(values: &[S]) -> Result<Bytes, MarshalError> {
    let mut buf = BytesMut::new();
    put_size(&mut buf, values.len())?;
    for value in values {
        put_string(&mut buf, value.as_ref())?;
    }
    Ok(buf.freeze())
}

#[must_use]
pub fn encode_bool(value: bool) -> Bytes {
    Bytes::from_static(if value { b"\x01" } else { b"\x00" })
}

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), MarshalError> {
    if buf.remaining() < needed {
        return Err(MarshalError::UnexpectedEnd {
            needed: needed - buf.remaining(),
        });
    }
    Ok(())
}

fn get_size(buf: &mut impl Buf) -> Result<usize, MarshalError> {
    ensure(&*buf, 1)?;
    let first = buf.get_u8();
    if first < 255 {
        return Ok(usize::from(first));
    }
    ensure(&*buf, 4)?;
    let wide = buf.get_i32_le();
    usize::try_from(wide).map_err(|_| MarshalError::NegativeSize(wide))
}

fn get_string(buf: &mut impl Buf) -> Result<String, MarshalError> {
    let len = get_size(buf)?;
    ensure(&*buf, len)?;
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec()).map_err(|_| MarshalError::InvalidUtf8)
}

/// Decodes a single string from the start of `payload`.
///
/// # Errors
///
/// Fails on truncated input, a negative size, or invalid UTF-8.
pub fn decode_string(payload: &[u8]) -> Result<String, MarshalError> {
    let mut buf = payload;
    get_string(&mut buf)
}

/// Decodes a sequence of strings from the start of `payload`.
///
/// # Errors
///
/// Fails on truncated input, a negative size, or invalid UTF-8.
pub fn decode_string_seq(payload: &[u8]) -> Result<Vec<String>, MarshalError> {
    let mut buf = payload;
    let count = get_size(&mut buf)?;
    (0..count).map(|_| get_string(&mut buf)).collect()
}

/// Decodes a boolean; any non-zero byte is `true`.
///
/// # Errors
///
/// Fails if `payload` is empty.
pub fn decode_bool(payload: &[u8]) -> Result<bool, MarshalError> {
    let mut buf = payload;
    ensure(&buf, 1)?;
    Ok(buf.get_u8() != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_uses_one_byte_size() {
        let bytes = encode_string("::Ice::Object").unwrap();
        assert_eq!(bytes[0], 13);
        assert_eq!(&bytes[1..], b"::Ice::Object");
    }

    #[test]
    fn long_string_uses_wide_size() {
        let long = "x".repeat(300);
        let bytes = encode_string(&long).unwrap();
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(&bytes[1..5], &300_i32.to_le_bytes());
        assert_eq!(decode_string(&bytes).unwrap(), long);
    }

    #[test]
    fn string_sequence() {
        let bytes = encode_string_seq(&["::A", "::Ice::Object"]).unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(
            decode_string_seq(&bytes).unwrap(),
            vec!["::A".to_string(), "::Ice::Object".to_string()]
        );
    }

    #[test]
    fn truncated_string_is_rejected() {
        assert_eq!(
            decode_string(&[5, b'a', b'b']),
            Err(MarshalError::UnexpectedEnd { needed: 3 })
        );
        assert_eq!(
            decode_string(&[]),
            Err(MarshalError::UnexpectedEnd { needed: 1 })
        );
    }

    #[test]
    fn negative_wide_size_is_rejected() {
        let mut raw = vec![0xFF];
        raw.extend_from_slice(&(-1_i32).to_le_bytes());
        assert_eq!(decode_string(&raw), Err(MarshalError::NegativeSize(-1)));
    }

    #[test]
    fn booleans() {
        assert!(decode_bool(&encode_bool(true)).unwrap());
        assert!(!decode_bool(&encode_bool(false)).unwrap());
        assert!(decode_bool(&[]).is_err());
    }
}
