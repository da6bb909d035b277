//! Hex, Base58 and Base58Check codecs
//!
//! Base58 treats the input as a big-endian integer and repeatedly divides by
//! 58; leading zero bytes map one-to-one to leading '1' characters and are
//! counted separately from the numeric conversion. Base58Check layers a
//! 4-byte double-SHA256 checksum, the only integrity check protecting
//! addresses and serialized keys against transcription errors.
//!
//! Scratch buffers that may carry a private secret are zeroed on every exit
//! path, success or failure.

use crate::constants::{BASE58_ALPHABET, CHECKSUM_LEN};
use crate::error::{KeywireError, Result};
use crate::hash::double_sha256;

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Encode bytes as lowercase hex, two digits per byte.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    out
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decode a hex string. Odd length or a non-hex digit is a `Format` error;
/// no partial output escapes on failure.
pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let chars = hex.as_bytes();
    if chars.len() % 2 != 0 {
        return Err(KeywireError::Format(
            "hex string has odd length".to_string(),
        ));
    }
    let mut out = vec![0u8; chars.len() / 2];
    for i in 0..out.len() {
        match (hex_val(chars[2 * i]), hex_val(chars[2 * i + 1])) {
            (Some(hi), Some(lo)) => out[i] = (hi << 4) | lo,
            _ => {
                out.fill(0);
                return Err(KeywireError::Format(format!(
                    "invalid hex digit at position {}",
                    2 * i
                )));
            }
        }
    }
    Ok(out)
}

/// Standard Bitcoin Base58 big-number encoding.
pub fn to_base58(bytes: &[u8]) -> String {
    let zero_count = bytes.iter().take_while(|&&b| b == 0).count();

    // upper bound on digit count: len * log(256)/log(58), 183/134 rounds up
    let mut buffer = bytes[zero_count..].to_vec();
    let size = buffer.len() * 183 / 134 + 1;
    let mut digits = vec![0u8; size];

    // repeated divmod 58 over the whole buffer, most significant digit
    // computed last, placed first
    for j in 0..size {
        let mut rem: u16 = 0;
        for byte in buffer.iter_mut() {
            let temp = rem * 256 + *byte as u16;
            rem = temp % 58;
            *byte = (temp / 58) as u8;
        }
        digits[size - j - 1] = rem as u8;
    }
    buffer.fill(0);

    // the size estimate overshoots; trim surplus zero digits
    let shift = digits.iter().take_while(|&&d| d == 0).count();
    let mut out = String::with_capacity(zero_count + size - shift);
    for _ in 0..zero_count {
        out.push(BASE58_ALPHABET[0] as char);
    }
    for &d in &digits[shift..] {
        out.push(BASE58_ALPHABET[d as usize] as char);
    }
    out
}

/// Inverse of [`to_base58`]. A character outside the alphabet is a `Format`
/// error; leading '1' characters become leading zero bytes.
pub fn from_base58(encoded: &str) -> Result<Vec<u8>> {
    let chars = encoded.as_bytes();
    let zero_count = chars.iter().take_while(|&&c| c == BASE58_ALPHABET[0]).count();

    // upper bound on byte count: len * log(58)/log(256), 361/493 rounds up
    let size = chars.len() * 361 / 493 + 1;
    let mut buf = vec![0u8; size];

    for &c in chars {
        let val = match BASE58_ALPHABET.iter().position(|&a| a == c) {
            Some(v) => v as u16,
            None => {
                buf.fill(0);
                return Err(KeywireError::Format(format!(
                    "character {:?} is not in the base58 alphabet",
                    c as char
                )));
            }
        };
        // multiply the accumulator by 58 and add the digit
        let mut carry = val;
        for byte in buf.iter_mut().rev() {
            let cur = *byte as u16 * 58 + carry;
            carry = cur >> 8;
            *byte = (cur & 0xFF) as u8;
        }
    }

    let strip = buf.iter().take_while(|&&b| b == 0).count();
    let mut out = vec![0u8; zero_count];
    out.extend_from_slice(&buf[strip..]);
    buf.fill(0);
    Ok(out)
}

/// Base58 with the first 4 bytes of double-SHA256(payload) appended.
pub fn to_base58check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    let checksum = double_sha256(payload);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    let encoded = to_base58(&data);
    data.fill(0); // payload may be a private secret
    encoded
}

/// Inverse of [`to_base58check`]. The checksum is recomputed over the decoded
/// payload; a mismatch is an `Integrity` error and the candidate payload is
/// scrubbed before being discarded.
pub fn from_base58check(encoded: &str) -> Result<Vec<u8>> {
    let mut data = from_base58(encoded)?;
    if data.len() < CHECKSUM_LEN {
        data.fill(0);
        return Err(KeywireError::Format(
            "base58check payload shorter than its checksum".to_string(),
        ));
    }
    let split = data.len() - CHECKSUM_LEN;
    let checksum = double_sha256(&data[..split]);
    if checksum[..CHECKSUM_LEN] != data[split..] {
        data.fill(0);
        return Err(KeywireError::Integrity(
            "base58check checksum does not match payload".to_string(),
        ));
    }
    data.truncate(split);
    Ok(data)
}
