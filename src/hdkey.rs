//! Hierarchical-deterministic key tree (BIP32)
//!
//! Each derivation step is pure: a child records only lineage metadata
//! (depth, parent fingerprint, child number), never a pointer back to its
//! parent. Hardened derivation needs the parent secret, so it exists only on
//! `HDPrivateKey`; the defining correctness property is that non-hardened
//! derivation commutes with taking the public key.
//!
//! An out-of-range derived scalar is astronomically unlikely but still a
//! signaled `Range` failure, never silent.

use secp256k1::{PublicKey as Point, Scalar, Secp256k1, SecretKey};

use crate::basex;
use crate::constants::{EXTENDED_KEY_LEN, HARDENED_INDEX_FLAG};
use crate::error::{KeywireError, Result};
use crate::hash;
use crate::key::{PrivateKey, PublicKey};
use crate::types::Network;

/// Extended private key: key material plus chain code and lineage metadata.
#[derive(Debug, Clone)]
pub struct HDPrivateKey {
    pub private_key: PrivateKey,
    pub chain_code: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_number: u32,
}

/// Extended public key: watch-only counterpart of [`HDPrivateKey`].
#[derive(Debug, Clone)]
pub struct HDPublicKey {
    pub public_key: PublicKey,
    pub chain_code: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_number: u32,
}

impl HDPrivateKey {
    /// Master key from a seed: HMAC-SHA512 keyed with "Bitcoin seed", left
    /// half becomes the secret, right half the chain code.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        let mut i = hash::hmac_sha512(b"Bitcoin seed", seed);
        let secret = SecretKey::from_slice(&i[..32]).map_err(|_| {
            KeywireError::Range("seed produced a scalar outside the curve order".to_string())
        });
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        i.fill(0);

        Ok(Self {
            private_key: PrivateKey::from_secret(secret?, true, network),
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Decode an xprv/tprv string.
    pub fn from_xprv(encoded: &str) -> Result<Self> {
        let mut data = basex::from_base58check(encoded)?;
        let parsed = Self::parse_extended(&data);
        data.fill(0); // bytes 46..78 are the raw secret
        parsed
    }

    fn parse_extended(data: &[u8]) -> Result<Self> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(KeywireError::Format(format!(
                "extended key must decode to {} bytes, got {}",
                EXTENDED_KEY_LEN,
                data.len()
            )));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&data[..4]);
        let network = if version == Network::Mainnet.xprv_version() {
            Network::Mainnet
        } else if version == Network::Testnet.xprv_version() {
            Network::Testnet
        } else {
            return Err(KeywireError::Format(
                "unknown extended private key version bytes".to_string(),
            ));
        };
        if data[45] != 0x00 {
            return Err(KeywireError::Format(
                "extended private key data must begin with 0x00".to_string(),
            ));
        }

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut child_bytes = [0u8; 4];
        child_bytes.copy_from_slice(&data[9..13]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        let secret = SecretKey::from_slice(&data[46..78]).map_err(|_| {
            KeywireError::Range("extended key secret outside the curve order".to_string())
        })?;

        Ok(Self {
            private_key: PrivateKey::from_secret(secret, true, network),
            chain_code,
            depth: data[4],
            parent_fingerprint,
            child_number: u32::from_be_bytes(child_bytes),
        })
    }

    /// Normal (non-hardened) child. `index` must be below 2^31.
    pub fn child(&self, index: u32) -> Result<HDPrivateKey> {
        if index >= HARDENED_INDEX_FLAG {
            return Err(KeywireError::Range(
                "normal derivation index must be below 2^31; use hardened_child".to_string(),
            ));
        }
        self.derive(index)
    }

    /// Hardened child: bit 31 of the index is forced on, and the parent
    /// secret (not its public point) feeds the derivation.
    pub fn hardened_child(&self, index: u32) -> Result<HDPrivateKey> {
        self.derive(index | HARDENED_INDEX_FLAG)
    }

    fn derive(&self, child_number: u32) -> Result<HDPrivateKey> {
        let mut data = Vec::with_capacity(37);
        if child_number >= HARDENED_INDEX_FLAG {
            data.push(0x00);
            data.extend_from_slice(&self.private_key.secret_bytes());
        } else {
            data.extend_from_slice(&self.private_key.public_key().point().serialize());
        }
        data.extend_from_slice(&child_number.to_be_bytes());

        let mut i = hash::hmac_sha512(&self.chain_code, &data);
        data.fill(0); // hardened path put the parent secret here

        let result = self.build_child(&i, child_number);
        i.fill(0);
        result
    }

    fn build_child(&self, i: &[u8; 64], child_number: u32) -> Result<HDPrivateKey> {
        let il = SecretKey::from_slice(&i[..32]).map_err(|_| {
            KeywireError::Range("derived scalar outside the curve order; skip this index".to_string())
        })?;
        // child secret = (IL + parent secret) mod n; zero is invalid
        let secret = il
            .add_tweak(&Scalar::from(self.private_key.secret_key()))
            .map_err(|_| {
                KeywireError::Range("derived child secret is zero; skip this index".to_string())
            })?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        Ok(HDPrivateKey {
            private_key: PrivateKey::from_secret(secret, true, self.private_key.network),
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number,
        })
    }

    /// First 4 bytes of hash160 of the compressed public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        let digest = hash::hash160(&self.private_key.public_key().point().serialize());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest[..4]);
        out
    }

    /// Drop the secret, keeping the watch-only half of the key.
    pub fn to_public(&self) -> HDPublicKey {
        HDPublicKey {
            public_key: PublicKey::new(
                self.private_key.public_key().point(),
                true,
                self.private_key.network,
            ),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    /// Base58Check xprv/tprv serialization.
    pub fn xprv(&self) -> String {
        let mut payload = Vec::with_capacity(EXTENDED_KEY_LEN);
        payload.extend_from_slice(&self.private_key.network.xprv_version());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.push(0x00);
        payload.extend_from_slice(&self.private_key.secret_bytes());

        let encoded = basex::to_base58check(&payload);
        payload.fill(0);
        encoded
    }

    /// Base58Check xpub/tpub serialization of the public half.
    pub fn xpub(&self) -> String {
        self.to_public().xpub()
    }
}

impl HDPublicKey {
    /// Decode an xpub/tpub string.
    pub fn from_xpub(encoded: &str) -> Result<Self> {
        let data = basex::from_base58check(encoded)?;
        if data.len() != EXTENDED_KEY_LEN {
            return Err(KeywireError::Format(format!(
                "extended key must decode to {} bytes, got {}",
                EXTENDED_KEY_LEN,
                data.len()
            )));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&data[..4]);
        let network = if version == Network::Mainnet.xpub_version() {
            Network::Mainnet
        } else if version == Network::Testnet.xpub_version() {
            Network::Testnet
        } else {
            return Err(KeywireError::Format(
                "unknown extended public key version bytes".to_string(),
            ));
        };

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut child_bytes = [0u8; 4];
        child_bytes.copy_from_slice(&data[9..13]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        let point = Point::from_slice(&data[45..78]).map_err(|_| {
            KeywireError::Format("extended key data is not a compressed curve point".to_string())
        })?;

        Ok(Self {
            public_key: PublicKey::new(point, true, network),
            chain_code,
            depth: data[4],
            parent_fingerprint,
            child_number: u32::from_be_bytes(child_bytes),
        })
    }

    /// Normal child derivation. A hardened index is a `Range` error: the
    /// public half cannot derive hardened children.
    pub fn child(&self, index: u32) -> Result<HDPublicKey> {
        if index >= HARDENED_INDEX_FLAG {
            return Err(KeywireError::Range(
                "hardened derivation requires the private key".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.public_key.point().serialize());
        data.extend_from_slice(&index.to_be_bytes());
        let i = hash::hmac_sha512(&self.chain_code, &data);

        let il = SecretKey::from_slice(&i[..32]).map_err(|_| {
            KeywireError::Range("derived scalar outside the curve order; skip this index".to_string())
        })?;
        let secp = Secp256k1::new();
        let point = self
            .public_key
            .point()
            .add_exp_tweak(&secp, &Scalar::from(il))
            .map_err(|_| {
                KeywireError::Range("derived child point is the identity; skip this index".to_string())
            })?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        Ok(HDPublicKey {
            public_key: PublicKey::new(point, true, self.public_key.network),
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
        })
    }

    /// First 4 bytes of hash160 of the compressed public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        let digest = hash::hash160(&self.public_key.point().serialize());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest[..4]);
        out
    }

    /// Base58Check xpub/tpub serialization.
    pub fn xpub(&self) -> String {
        let mut payload = Vec::with_capacity(EXTENDED_KEY_LEN);
        payload.extend_from_slice(&self.public_key.network.xpub_version());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.public_key.point().serialize());
        basex::to_base58check(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basex::from_hex;

    // BIP32 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";
    const MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
    const M_0H_XPRV: &str = "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7";
    const M_0H_XPUB: &str = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    const M_0H_1_XPRV: &str = "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs";

    fn master() -> HDPrivateKey {
        let seed = from_hex(SEED).unwrap();
        HDPrivateKey::from_seed(&seed, Network::Mainnet).unwrap()
    }

    #[test]
    fn test_master_from_seed() {
        let m = master();
        assert_eq!(m.depth, 0);
        assert_eq!(m.parent_fingerprint, [0u8; 4]);
        assert_eq!(m.child_number, 0);
        assert_eq!(m.xprv(), MASTER_XPRV);
        assert_eq!(m.xpub(), MASTER_XPUB);
    }

    #[test]
    fn test_hardened_child_vector() {
        let child = master().hardened_child(0).unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.child_number, HARDENED_INDEX_FLAG);
        assert_eq!(child.xprv(), M_0H_XPRV);
        assert_eq!(child.xpub(), M_0H_XPUB);
    }

    #[test]
    fn test_grandchild_vector() {
        let grandchild = master().hardened_child(0).unwrap().child(1).unwrap();
        assert_eq!(grandchild.depth, 2);
        assert_eq!(grandchild.child_number, 1);
        assert_eq!(grandchild.xprv(), M_0H_1_XPRV);
    }

    #[test]
    fn test_public_derivation_commutes() {
        let m = master();
        for index in [0u32, 1, 2, 1000] {
            let via_private = m.child(index).unwrap().to_public();
            let via_public = m.to_public().child(index).unwrap();
            assert_eq!(via_private.public_key.sec(), via_public.public_key.sec());
            assert_eq!(via_private.chain_code, via_public.chain_code);
            assert_eq!(via_private.xpub(), via_public.xpub());
        }
    }

    #[test]
    fn test_hardened_differs_from_normal() {
        let m = master();
        let normal = m.child(7).unwrap();
        let hardened = m.hardened_child(7).unwrap();
        assert_ne!(normal.private_key.secret_bytes(), hardened.private_key.secret_bytes());
        assert_ne!(normal.child_number, hardened.child_number);
    }

    #[test]
    fn test_public_refuses_hardened() {
        let result = master().to_public().child(HARDENED_INDEX_FLAG);
        assert!(matches!(result, Err(KeywireError::Range(_))));
    }

    #[test]
    fn test_private_child_rejects_hardened_index() {
        let result = master().child(HARDENED_INDEX_FLAG | 3);
        assert!(matches!(result, Err(KeywireError::Range(_))));
    }

    #[test]
    fn test_xprv_round_trip() {
        let child = master().hardened_child(0).unwrap().child(1).unwrap();
        let decoded = HDPrivateKey::from_xprv(&child.xprv()).unwrap();
        assert_eq!(decoded.xprv(), child.xprv());
        assert_eq!(decoded.depth, child.depth);
        assert_eq!(decoded.parent_fingerprint, child.parent_fingerprint);
        assert_eq!(decoded.child_number, child.child_number);
    }

    #[test]
    fn test_xpub_round_trip() {
        let decoded = HDPublicKey::from_xpub(M_0H_XPUB).unwrap();
        assert_eq!(decoded.xpub(), M_0H_XPUB);
        assert_eq!(decoded.depth, 1);
    }

    #[test]
    fn test_from_xprv_rejects_xpub() {
        assert!(matches!(
            HDPrivateKey::from_xprv(MASTER_XPUB),
            Err(KeywireError::Format(_))
        ));
        assert!(matches!(
            HDPublicKey::from_xpub(MASTER_XPRV),
            Err(KeywireError::Format(_))
        ));
    }

    #[test]
    fn test_testnet_versions() {
        let seed = from_hex(SEED).unwrap();
        let m = HDPrivateKey::from_seed(&seed, Network::Testnet).unwrap();
        assert!(m.xprv().starts_with("tprv"));
        assert!(m.xpub().starts_with("tpub"));
    }
}
