//! Core shared types for key material and wire structures

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Hash type: 256-bit hash
pub type Hash32 = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Which chain a key or address belongs to.
///
/// The network selects the version byte used in WIF strings, Base58Check
/// addresses and extended-key serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => WIF_MAINNET_PREFIX,
            Network::Testnet => WIF_TESTNET_PREFIX,
        }
    }

    pub fn p2pkh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => P2PKH_MAINNET_PREFIX,
            Network::Testnet => P2PKH_TESTNET_PREFIX,
        }
    }

    pub fn p2sh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => P2SH_MAINNET_PREFIX,
            Network::Testnet => P2SH_TESTNET_PREFIX,
        }
    }

    pub fn xprv_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => XPRV_MAINNET_VERSION,
            Network::Testnet => XPRV_TESTNET_VERSION,
        }
    }

    pub fn xpub_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => XPUB_MAINNET_VERSION,
            Network::Testnet => XPUB_TESTNET_VERSION,
        }
    }

    /// Map a WIF version byte back to its network, if recognized.
    pub fn from_wif_prefix(prefix: u8) -> Option<Network> {
        match prefix {
            WIF_MAINNET_PREFIX => Some(Network::Mainnet),
            WIF_TESTNET_PREFIX => Some(Network::Testnet),
            _ => None,
        }
    }
}
