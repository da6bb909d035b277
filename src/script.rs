//! Opaque script wire type
//!
//! A script is a length-prefixed byte sequence on the wire; this crate does
//! not execute scripts, it only carries them through transaction
//! serialization and recognizes the standard templates well enough to answer
//! an address query.

use serde::{Deserialize, Serialize};

use crate::basex;
use crate::conversion::{len_varint, read_varint, write_varint};
use crate::error::{KeywireError, Result};
use crate::stream::ByteStream;
use crate::types::{ByteString, Network};

const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xa9;
const OP_CHECKSIG: u8 = 0xac;

/// Script bytes, excluding the VarInt length prefix used on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    data: ByteString,
}

impl Script {
    pub fn new(data: ByteString) -> Self {
        Self { data }
    }

    /// Standard P2PKH locking script for a 20-byte public key hash.
    pub fn p2pkh(hash: &[u8; 20]) -> Self {
        let mut data = Vec::with_capacity(25);
        data.extend_from_slice(&[OP_DUP, OP_HASH160, 0x14]);
        data.extend_from_slice(hash);
        data.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self { data }
    }

    /// Standard P2SH locking script for a 20-byte script hash.
    pub fn p2sh(hash: &[u8; 20]) -> Self {
        let mut data = Vec::with_capacity(23);
        data.extend_from_slice(&[OP_HASH160, 0x14]);
        data.extend_from_slice(hash);
        data.push(OP_EQUAL);
        Self { data }
    }

    /// Read a script off the stream: VarInt length, then exactly that many
    /// bytes. The untrusted length is checked against the remaining stream
    /// before any allocation, so a short body fails the parse cleanly.
    pub fn parse(s: &mut ByteStream) -> Result<Self> {
        let len = read_varint(s)? as usize;
        if len > s.available() {
            return Err(KeywireError::ProtocolMismatch(format!(
                "script body promised {} bytes, stream had {}",
                len,
                s.available()
            )));
        }
        let mut data = vec![0u8; len];
        s.read_bytes(&mut data);
        Ok(Self { data })
    }

    /// Write the VarInt length prefix and body; returns bytes written.
    pub fn serialize(&self, s: &mut ByteStream) -> Result<usize> {
        let mut written = write_varint(self.data.len() as u64, s)?;
        written += s.write(&self.data)?;
        Ok(written)
    }

    /// Serialized size including the VarInt prefix, without performing I/O.
    pub fn length(&self) -> usize {
        len_varint(self.data.len() as u64) + self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        self.data.len() == 25
            && self.data[0] == OP_DUP
            && self.data[1] == OP_HASH160
            && self.data[2] == 0x14
            && self.data[23] == OP_EQUALVERIFY
            && self.data[24] == OP_CHECKSIG
    }

    /// OP_HASH160 <20> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        self.data.len() == 23
            && self.data[0] == OP_HASH160
            && self.data[1] == 0x14
            && self.data[22] == OP_EQUAL
    }

    /// OP_0 <20>, a native v0 witness program
    pub fn is_p2wpkh(&self) -> bool {
        self.data.len() == 22 && self.data[0] == 0x00 && self.data[1] == 0x14
    }

    /// Render the address this locking script pays to.
    ///
    /// P2PKH and P2SH templates produce Base58Check addresses. Native segwit
    /// programs would need bech32, which this crate does not provide, so they
    /// are reported as a `Format` error rather than encoded wrongly;
    /// nonstandard scripts likewise have no address form.
    pub fn address(&self, network: Network) -> Result<String> {
        if self.is_p2pkh() {
            let mut payload = Vec::with_capacity(21);
            payload.push(network.p2pkh_prefix());
            payload.extend_from_slice(&self.data[3..23]);
            return Ok(basex::to_base58check(&payload));
        }
        if self.is_p2sh() {
            let mut payload = Vec::with_capacity(21);
            payload.push(network.p2sh_prefix());
            payload.extend_from_slice(&self.data[2..22]);
            return Ok(basex::to_base58check(&payload));
        }
        if self.is_p2wpkh() {
            return Err(KeywireError::Format(
                "native segwit addresses require bech32, which is not provided".to_string(),
            ));
        }
        Err(KeywireError::Format(
            "nonstandard script has no address form".to_string(),
        ))
    }
}
