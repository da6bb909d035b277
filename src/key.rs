//! Key material: signatures, public keys and private keys
//!
//! Elliptic-curve arithmetic is delegated to the secp256k1 engine; this
//! module owns the WIF, SEC and address encodings layered on top of it.
//! Validity is enforced at construction: a secret must be nonzero and below
//! the curve order, a public point must lie on the curve, so no separate
//! is-valid state exists after a constructor succeeds.
//!
//! Keys are plain values mutated nowhere; a `PrivateKey` always carries the
//! public key computed from its secret, never an independently set one.

use secp256k1::{ecdsa, Message, PublicKey as Point, Secp256k1, SecretKey};

use crate::basex;
use crate::constants::CHECKSUM_LEN;
use crate::error::{KeywireError, Result};
use crate::hash;
use crate::types::{Hash32, Network};

/// ECDSA signature as raw big-endian r and s scalars, each below the curve
/// order. Convertible to and from DER and the 64-byte r||s compact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    /// Carries the scalars as given; range checking against the curve order
    /// happens when the signature is converted for DER or verification, where
    /// an out-of-range scalar is a `Secp` error.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Self { r, s }
    }

    /// Split a 64-byte r||s buffer. Range checking is deferred as in
    /// [`Signature::new`].
    pub fn from_compact(bytes: &[u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self { r, s }
    }

    /// 64-byte r||s form.
    pub fn compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Parse a DER-encoded signature.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let sig = ecdsa::Signature::from_der(der)?;
        Ok(Self::from_compact(&sig.serialize_compact()))
    }

    /// Parse a DER-encoded signature from its hex representation.
    pub fn from_der_hex(hex: &str) -> Result<Self> {
        Self::from_der(&basex::from_hex(hex)?)
    }

    /// DER encoding.
    pub fn der(&self) -> Result<Vec<u8>> {
        Ok(self.to_secp()?.serialize_der().to_vec())
    }

    fn to_secp(&self) -> Result<ecdsa::Signature> {
        Ok(ecdsa::Signature::from_compact(&self.compact())?)
    }
}

/// A point on the secp256k1 curve plus its preferred SEC form and network.
///
/// `compressed` selects the 33-byte `02/03||x` SEC encoding over the 65-byte
/// `04||x||y` one; `network` selects the address version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
    pub compressed: bool,
    pub network: Network,
}

impl PublicKey {
    pub fn new(point: Point, compressed: bool, network: Network) -> Self {
        Self {
            point,
            compressed,
            network,
        }
    }

    /// Parse a SEC encoding, dispatching on the prefix byte. For compressed
    /// input the y coordinate is recovered by the curve engine; an invalid x
    /// or unrecognized prefix is a `Format` error.
    pub fn from_sec(sec: &[u8], network: Network) -> Result<Self> {
        let compressed = match sec.first() {
            Some(0x02) | Some(0x03) => true,
            Some(0x04) => false,
            _ => {
                return Err(KeywireError::Format(
                    "unrecognized SEC prefix byte".to_string(),
                ))
            }
        };
        let point = Point::from_slice(sec).map_err(|_| {
            KeywireError::Format("SEC bytes do not describe a curve point".to_string())
        })?;
        Ok(Self::new(point, compressed, network))
    }

    /// Parse a SEC encoding from its hex representation.
    pub fn from_sec_hex(hex: &str, network: Network) -> Result<Self> {
        Self::from_sec(&basex::from_hex(hex)?, network)
    }

    /// SEC encoding: 33 bytes compressed, 65 bytes uncompressed.
    pub fn sec(&self) -> Vec<u8> {
        if self.compressed {
            self.point.serialize().to_vec()
        } else {
            self.point.serialize_uncompressed().to_vec()
        }
    }

    pub fn sec_hex(&self) -> String {
        basex::to_hex(&self.sec())
    }

    /// The underlying curve point.
    pub fn point(&self) -> Point {
        self.point
    }

    /// hash160 of the SEC encoding.
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(&self.sec())
    }

    /// Legacy P2PKH address: network version byte over hash160(SEC),
    /// Base58Check-encoded.
    pub fn address(&self) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.p2pkh_prefix());
        payload.extend_from_slice(&self.hash160());
        basex::to_base58check(&payload)
    }

    /// Nested-segwit address: the v0 witness program for this key wrapped in
    /// a P2SH script, Base58Check-encoded. Native (bech32) segwit addresses
    /// are not provided by this crate.
    pub fn nested_segwit_address(&self) -> String {
        let mut redeem = Vec::with_capacity(22);
        redeem.push(0x00);
        redeem.push(0x14);
        redeem.extend_from_slice(&self.hash160());
        let script_hash = hash::hash160(&redeem);

        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.p2sh_prefix());
        payload.extend_from_slice(&script_hash);
        basex::to_base58check(&payload)
    }

    /// Verify an ECDSA signature over a precomputed 32-byte message hash.
    pub fn verify(&self, sig: &Signature, hash: &Hash32) -> bool {
        let secp = Secp256k1::new();
        let msg = match Message::from_digest_slice(hash) {
            Ok(m) => m,
            Err(_) => return false,
        };
        let sig = match sig.to_secp() {
            Ok(s) => s,
            Err(_) => return false,
        };
        secp.verify_ecdsa(&msg, &sig, &self.point).is_ok()
    }
}

/// A 32-byte secret scalar plus the public key it determines.
///
/// The public key is computed in the constructor and stays consistent with
/// the secret for the life of the value. WIF intermediate buffers are zeroed
/// before release on every path.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    secret: SecretKey,
    pub compressed: bool,
    pub network: Network,
    public_key: PublicKey,
}

impl PrivateKey {
    /// Build from a raw 32-byte big-endian secret. An all-zero secret or one
    /// at or above the curve order is a `Range` error.
    pub fn from_secret_bytes(secret: &[u8; 32], compressed: bool, network: Network) -> Result<Self> {
        let secret = SecretKey::from_slice(secret).map_err(|_| {
            KeywireError::Range("secret must be nonzero and below the curve order".to_string())
        })?;
        Ok(Self::from_secret(secret, compressed, network))
    }

    pub(crate) fn from_secret(secret: SecretKey, compressed: bool, network: Network) -> Self {
        let secp = Secp256k1::new();
        let point = Point::from_secret_key(&secp, &secret);
        Self {
            secret,
            compressed,
            network,
            public_key: PublicKey::new(point, compressed, network),
        }
    }

    /// Decode a WIF string: Base58Check over
    /// `[version][secret][0x01 if compressed]`.
    pub fn from_wif(wif: &str) -> Result<Self> {
        let mut payload = basex::from_base58check(wif)?;
        let parsed = Self::parse_wif_payload(&payload);
        payload.fill(0); // the decoded secret must not linger
        parsed
    }

    fn parse_wif_payload(payload: &[u8]) -> Result<Self> {
        let network = payload
            .first()
            .and_then(|&b| Network::from_wif_prefix(b))
            .ok_or_else(|| {
                KeywireError::Format("unrecognized WIF version byte".to_string())
            })?;
        let (compressed, secret_bytes) = match payload.len() {
            33 => (false, &payload[1..33]),
            34 if payload[33] == 0x01 => (true, &payload[1..33]),
            _ => {
                return Err(KeywireError::Format(
                    "unexpected WIF payload shape".to_string(),
                ))
            }
        };
        let secret = SecretKey::from_slice(secret_bytes).map_err(|_| {
            KeywireError::Range("WIF secret must be nonzero and below the curve order".to_string())
        })?;
        Ok(Self::from_secret(secret, compressed, network))
    }

    /// Wallet Import Format encoding of the secret.
    pub fn wif(&self) -> String {
        let mut payload = Vec::with_capacity(34 + CHECKSUM_LEN);
        payload.push(self.network.wif_prefix());
        payload.extend_from_slice(&self.secret.secret_bytes());
        if self.compressed {
            payload.push(0x01);
        }
        let encoded = basex::to_base58check(&payload);
        payload.fill(0);
        encoded
    }

    /// Sign a precomputed 32-byte message hash.
    pub fn sign(&self, hash: &Hash32) -> Result<Signature> {
        let secp = Secp256k1::new();
        let msg = Message::from_digest_slice(hash)?;
        let sig = secp.sign_ecdsa(&msg, &self.secret);
        Ok(Signature::from_compact(&sig.serialize_compact()))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn secret_key(&self) -> SecretKey {
        self.secret
    }

    /// The raw 32-byte big-endian secret.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// Alias for `public_key().address()`.
    pub fn address(&self) -> String {
        self.public_key.address()
    }

    /// Alias for `public_key().nested_segwit_address()`.
    pub fn nested_segwit_address(&self) -> String {
        self.public_key.nested_segwit_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_one(compressed: bool, network: Network) -> PrivateKey {
        let mut secret = [0u8; 32];
        secret[31] = 0x01;
        PrivateKey::from_secret_bytes(&secret, compressed, network).unwrap()
    }

    #[test]
    fn test_zero_secret_rejected() {
        let err = PrivateKey::from_secret_bytes(&[0u8; 32], true, Network::Mainnet);
        assert!(matches!(err, Err(KeywireError::Range(_))));
    }

    #[test]
    fn test_above_order_rejected() {
        let err = PrivateKey::from_secret_bytes(&[0xFF; 32], true, Network::Mainnet);
        assert!(matches!(err, Err(KeywireError::Range(_))));
    }

    #[test]
    fn test_known_vector_secret_one() {
        let key = key_one(true, Network::Mainnet);
        assert_eq!(
            key.wif(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
        assert_eq!(key.address(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(
            key.public_key().sec_hex(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_uncompressed_wif_vector() {
        let key = key_one(false, Network::Mainnet);
        assert_eq!(
            key.wif(),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
        assert_eq!(key.public_key().sec().len(), 65);
        assert_eq!(key.public_key().sec()[0], 0x04);
    }

    #[test]
    fn test_wif_round_trip() {
        for compressed in [true, false] {
            for network in [Network::Mainnet, Network::Testnet] {
                let key = key_one(compressed, network);
                let decoded = PrivateKey::from_wif(&key.wif()).unwrap();
                assert_eq!(decoded.compressed, compressed);
                assert_eq!(decoded.network, network);
                assert_eq!(decoded.secret_bytes(), key.secret_bytes());
                assert_eq!(decoded.address(), key.address());
            }
        }
    }

    #[test]
    fn test_from_wif_rejects_garbage() {
        assert!(PrivateKey::from_wif("not-a-wif").is_err());
        // valid base58check but wrong version byte
        let bogus = basex::to_base58check(&[0x42; 34]);
        assert!(matches!(
            PrivateKey::from_wif(&bogus),
            Err(KeywireError::Format(_))
        ));
    }

    #[test]
    fn test_sec_round_trip() {
        let key = key_one(true, Network::Mainnet);
        let sec = key.public_key().sec();
        let parsed = PublicKey::from_sec(&sec, Network::Mainnet).unwrap();
        assert!(parsed.compressed);
        assert_eq!(parsed.sec(), sec);

        let uncompressed = key_one(false, Network::Mainnet);
        let sec = uncompressed.public_key().sec();
        let parsed = PublicKey::from_sec(&sec, Network::Mainnet).unwrap();
        assert!(!parsed.compressed);
        assert_eq!(parsed.sec(), sec);
    }

    #[test]
    fn test_from_sec_rejects_bad_prefix() {
        assert!(matches!(
            PublicKey::from_sec(&[0x05; 33], Network::Mainnet),
            Err(KeywireError::Format(_))
        ));
        assert!(matches!(
            PublicKey::from_sec(&[], Network::Mainnet),
            Err(KeywireError::Format(_))
        ));
    }

    #[test]
    fn test_from_sec_rejects_invalid_x() {
        // x = p - 1 has no valid y for prefix 0x02 encoding of a real point;
        // all-0xFF x is certainly off-curve
        let mut sec = [0xFF; 33];
        sec[0] = 0x02;
        assert!(PublicKey::from_sec(&sec, Network::Mainnet).is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let key = key_one(true, Network::Mainnet);
        let hash = crate::hash::double_sha256(b"message to sign");
        let sig = key.sign(&hash).unwrap();
        assert!(key.public_key().verify(&sig, &hash));

        let other_hash = crate::hash::double_sha256(b"different message");
        assert!(!key.public_key().verify(&sig, &other_hash));
    }

    #[test]
    fn test_signature_der_round_trip() {
        let key = key_one(true, Network::Mainnet);
        let hash = crate::hash::double_sha256(b"der round trip");
        let sig = key.sign(&hash).unwrap();
        let der = sig.der().unwrap();
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
        assert_eq!(Signature::from_compact(&sig.compact()), sig);
    }

    #[test]
    fn test_out_of_range_scalars_fail_on_use() {
        // r and s above the curve order pass construction but fail encoding
        // and never verify
        let sig = Signature::new([0xFF; 32], [0xFF; 32]);
        assert!(matches!(sig.der(), Err(KeywireError::Secp(_))));

        let key = key_one(true, Network::Mainnet);
        let hash = crate::hash::double_sha256(b"out of range");
        assert!(!key.public_key().verify(&sig, &hash));
    }

    #[test]
    fn test_testnet_address_prefix() {
        let key = key_one(true, Network::Testnet);
        // testnet P2PKH addresses start with m or n
        let first = key.address().chars().next().unwrap();
        assert!(first == 'm' || first == 'n');
    }

    #[test]
    fn test_nested_segwit_address_prefix() {
        let key = key_one(true, Network::Mainnet);
        assert!(key.nested_segwit_address().starts_with('3'));
        let test_key = key_one(true, Network::Testnet);
        assert!(test_key.nested_segwit_address().starts_with('2'));
    }
}
