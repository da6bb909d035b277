//! Thin wrappers over the consumed hash engines
//!
//! The crate owns no hashing logic of its own; everything here delegates to
//! the pinned crypto crates and returns fixed-width digests.

use bitcoin_hashes::{sha256d, sha512, Hash as BitcoinHash, HashEngine, Hmac, HmacEngine};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256 digest, used for Base58Check checksums and txids.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).into_inner()
}

/// RIPEMD-160 of SHA-256, used for addresses and fingerprints.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// HMAC-SHA512, used by BIP32 key derivation.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut engine: HmacEngine<sha512::Hash> = HmacEngine::new(key);
    engine.input(data);
    Hmac::from_engine(engine).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basex::to_hex;

    #[test]
    fn test_sha256_empty_vector() {
        assert_eq!(
            to_hex(&sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_double_sha256_is_sha256_of_sha256() {
        let once = sha256(b"keywire");
        assert_eq!(double_sha256(b"keywire"), sha256(&once));
    }

    #[test]
    fn test_hash160_known_vector() {
        // hash160 of the SEC encoding of the generator point G (compressed)
        let sec = crate::basex::from_hex(
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        )
        .unwrap();
        assert_eq!(
            to_hex(&hash160(&sec)),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_hmac_sha512_bitcoin_seed() {
        // left half feeds the master secret; must be deterministic
        let a = hmac_sha512(b"Bitcoin seed", &[0u8; 64]);
        let b = hmac_sha512(b"Bitcoin seed", &[0u8; 64]);
        assert_eq!(a, b);
        let c = hmac_sha512(b"Bitcoin seed", &[1u8; 64]);
        assert_ne!(a[..32], c[..32]);
    }
}
