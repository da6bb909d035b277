//! Fixed-width integer and VarInt wire codecs
//!
//! Integers are unsigned with no sign extension; the caller picks the width
//! (1-8 bytes). VarInt is Bitcoin's compact-size scheme: values below 0xFD
//! encode in one byte, larger values get a tag byte followed by 2, 4 or 8
//! little-endian bytes.

use crate::error::{KeywireError, Result};
use crate::stream::ByteStream;

/// Encode `value` into `width` little-endian bytes. Width above 8 is
/// caller error; excess bytes would always be zero.
pub fn int_to_little_endian(value: u64, width: usize) -> Vec<u8> {
    debug_assert!((1..=8).contains(&width));
    (0..width).map(|i| (value >> (8 * i)) as u8).collect()
}

/// Decode up to 8 little-endian bytes into an unsigned integer.
pub fn little_endian_to_int(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    let mut num: u64 = 0;
    for &b in bytes.iter().rev() {
        num = (num << 8) | b as u64;
    }
    num
}

/// Encode `value` into `width` big-endian bytes.
pub fn int_to_big_endian(value: u64, width: usize) -> Vec<u8> {
    debug_assert!((1..=8).contains(&width));
    (0..width).map(|i| (value >> (8 * (width - i - 1))) as u8).collect()
}

/// Decode up to 8 big-endian bytes into an unsigned integer.
pub fn big_endian_to_int(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    let mut num: u64 = 0;
    for &b in bytes {
        num = (num << 8) | b as u64;
    }
    num
}

/// Serialized length of `value` as a VarInt, without performing I/O.
/// Used to precompute serialized sizes before allocating buffers.
pub fn len_varint(value: u64) -> usize {
    match value {
        0..=0xFC => 1,
        0xFD..=0xFFFF => 3,
        0x1_0000..=0xFFFF_FFFF => 5,
        _ => 9,
    }
}

/// Read a VarInt from the stream.
///
/// Fails with `Range` when the stream ends before the tag or before the
/// extension bytes the tag requires.
pub fn read_varint(s: &mut ByteStream) -> Result<u64> {
    let tag = s
        .read()
        .ok_or_else(|| KeywireError::Range("varint tag past end of stream".to_string()))?;
    let width = match tag {
        0xFD => 2,
        0xFE => 4,
        0xFF => 8,
        _ => return Ok(tag as u64),
    };
    let mut arr = [0u8; 8];
    let got = s.read_bytes(&mut arr[..width]);
    if got != width {
        return Err(KeywireError::Range(format!(
            "varint needs {} extension bytes, stream had {}",
            width, got
        )));
    }
    Ok(little_endian_to_int(&arr[..width]))
}

/// Write `value` as a VarInt, returning the number of bytes written.
pub fn write_varint(value: u64, s: &mut ByteStream) -> Result<usize> {
    s.write(&encode_varint(value))
}

/// VarInt encoding of `value` as an owned buffer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    match value {
        0..=0xFC => vec![value as u8],
        0xFD..=0xFFFF => {
            let mut out = vec![0xFD];
            out.extend_from_slice(&int_to_little_endian(value, 2));
            out
        }
        0x1_0000..=0xFFFF_FFFF => {
            let mut out = vec![0xFE];
            out.extend_from_slice(&int_to_little_endian(value, 4));
            out
        }
        _ => {
            let mut out = vec![0xFF];
            out.extend_from_slice(&int_to_little_endian(value, 8));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_round_trip() {
        assert_eq!(int_to_little_endian(1, 4), vec![1, 0, 0, 0]);
        assert_eq!(int_to_little_endian(0xdeadbeef, 4), vec![0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(little_endian_to_int(&[0xef, 0xbe, 0xad, 0xde]), 0xdeadbeef);
        assert_eq!(
            little_endian_to_int(&int_to_little_endian(u64::MAX, 8)),
            u64::MAX
        );
    }

    #[test]
    fn test_big_endian_round_trip() {
        assert_eq!(int_to_big_endian(0x0102, 2), vec![0x01, 0x02]);
        assert_eq!(big_endian_to_int(&[0x01, 0x02]), 0x0102);
        assert_eq!(big_endian_to_int(&int_to_big_endian(0xcafebabe, 4)), 0xcafebabe);
    }

    #[test]
    fn test_no_sign_extension() {
        assert_eq!(int_to_little_endian(0xFF, 2), vec![0xFF, 0x00]);
        assert_eq!(little_endian_to_int(&[0xFF]), 255);
    }

    #[test]
    fn test_varint_boundaries() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(252), vec![0xFC]);
        assert_eq!(encode_varint(253), vec![0xFD, 0xFD, 0x00]);
        assert_eq!(encode_varint(0xFFFF), vec![0xFD, 0xFF, 0xFF]);
        assert_eq!(encode_varint(0x1_0000), vec![0xFE, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_len_varint_matches_encoding() {
        for value in [0u64, 1, 252, 253, 0xFFFF, 0x1_0000, 0xFFFF_FFFF, u64::MAX] {
            assert_eq!(len_varint(value), encode_varint(value).len());
        }
    }

    #[test]
    fn test_varint_stream_round_trip() {
        for value in [0u64, 252, 253, 70015, 0x1_0000, u64::MAX] {
            let mut s = ByteStream::empty();
            let written = write_varint(value, &mut s).unwrap();
            assert_eq!(written, len_varint(value));
            let mut s = ByteStream::from_vec(s.into_bytes());
            assert_eq!(read_varint(&mut s).unwrap(), value);
            assert_eq!(s.available(), 0);
        }
    }

    #[test]
    fn test_varint_truncated_tag_fails() {
        let mut s = ByteStream::new(&[]);
        assert!(matches!(read_varint(&mut s), Err(KeywireError::Range(_))));
    }

    #[test]
    fn test_varint_truncated_extension_fails() {
        // 0xFD promises two more bytes; only one present
        let mut s = ByteStream::new(&[0xFD, 0x01]);
        assert!(matches!(read_varint(&mut s), Err(KeywireError::Range(_))));

        let mut s = ByteStream::new(&[0xFF, 0x01, 0x02, 0x03]);
        assert!(matches!(read_varint(&mut s), Err(KeywireError::Range(_))));
    }
}
