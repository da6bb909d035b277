//! Version prefixes and structural constants for Bitcoin key serialization

/// WIF version byte, mainnet
pub const WIF_MAINNET_PREFIX: u8 = 0x80;

/// WIF version byte, testnet
pub const WIF_TESTNET_PREFIX: u8 = 0xEF;

/// P2PKH address version byte, mainnet
pub const P2PKH_MAINNET_PREFIX: u8 = 0x00;

/// P2PKH address version byte, testnet
pub const P2PKH_TESTNET_PREFIX: u8 = 0x6F;

/// P2SH address version byte, mainnet
pub const P2SH_MAINNET_PREFIX: u8 = 0x05;

/// P2SH address version byte, testnet
pub const P2SH_TESTNET_PREFIX: u8 = 0xC4;

/// Extended private key version bytes (xprv), mainnet
pub const XPRV_MAINNET_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Extended public key version bytes (xpub), mainnet
pub const XPUB_MAINNET_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// Extended private key version bytes (tprv), testnet
pub const XPRV_TESTNET_VERSION: [u8; 4] = [0x04, 0x35, 0x83, 0x94];

/// Extended public key version bytes (tpub), testnet
pub const XPUB_TESTNET_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

/// Bit 31 of a child number marks hardened derivation
pub const HARDENED_INDEX_FLAG: u32 = 0x8000_0000;

/// Decoded length of a serialized extended key (version through key data)
pub const EXTENDED_KEY_LEN: usize = 78;

/// Base58Check checksum length
pub const CHECKSUM_LEN: usize = 4;

/// Base58 alphabet: 58 symbols, excludes 0, O, I and l
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Sequence number for a final transaction input
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Satoshis per BTC
pub const SATOSHIS_PER_BTC: u64 = 100_000_000;
