//! # Keywire
//!
//! Bitcoin key material and legacy transaction wire formats.
//!
//! This crate provides the byte-level plumbing between secp256k1 key material
//! and the encodings Bitcoin puts on the wire and in front of users: SEC
//! public keys, DER signatures, WIF private keys, Base58Check addresses,
//! BIP32 extended keys, and the legacy transaction serialization.
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//! - Byte plumbing: `conversion` (fixed-width integers, VarInt), `stream`
//!   (cursor over a byte buffer), `basex` (hex, Base58, Base58Check)
//! - Key material: `key` (private/public keys, signatures), `hdkey`
//!   (BIP32 hierarchical derivation)
//! - Wire structures: `script`, `transaction`
//!
//! ## Design Principles
//!
//! 1. **Fallible by construction**: every decoder returns `Result`; malformed
//!    input never panics and never yields partial output
//! 2. **Exact Version Pinning**: cryptographic dependencies pinned to exact
//!    versions
//! 3. **Secret hygiene**: scratch buffers that held private key bytes are
//!    zeroed on every exit path
//! 4. **No script execution, no bech32**: scripts are opaque byte strings and
//!    native segwit addresses are reported as unsupported rather than encoded
//!    wrongly
//!
//! ## Usage
//!
//! ```rust
//! use keywire::{Network, PrivateKey};
//!
//! let private_key =
//!     PrivateKey::from_secret_bytes(&[0x01; 32], true, Network::Mainnet).unwrap();
//! let address = private_key.address();
//! assert!(address.starts_with('1'));
//!
//! let wif = private_key.wif();
//! let restored = PrivateKey::from_wif(&wif).unwrap();
//! assert_eq!(restored.address(), address);
//! ```

pub mod types;
pub mod constants;
pub mod conversion;
pub mod stream;
pub mod hash;
pub mod basex;
pub mod key;
pub mod hdkey;
pub mod script;
pub mod transaction;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{KeywireError, Result};
pub use stream::ByteStream;
pub use key::{PrivateKey, PublicKey, Signature};
pub use hdkey::{HDPrivateKey, HDPublicKey};
pub use script::Script;
pub use transaction::{Transaction, TransactionInput, TransactionOutput};
