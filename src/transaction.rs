//! Legacy transaction wire format: parse, serialize, construct
//!
//! Parsing is a strict left-to-right pass over a `ByteStream`; every stage
//! consumes a fixed or length-prefixed span and any under-read fails the
//! whole parse. The total consumed length must reconcile exactly with the
//! sum of component lengths. Segwit witness serialization is out of scope.

use serde::{Deserialize, Serialize};

use crate::constants::SEQUENCE_FINAL;
use crate::conversion::{int_to_little_endian, len_varint, little_endian_to_int, read_varint, write_varint};
use crate::error::{KeywireError, Result};
use crate::hash::double_sha256;
use crate::script::Script;
use crate::stream::ByteStream;
use crate::types::{Hash32, Network};

/// Cap on speculative preallocation from untrusted VarInt counts.
const PREALLOC_LIMIT: usize = 1024;

fn read_exact(s: &mut ByteStream, out: &mut [u8], what: &str) -> Result<()> {
    let got = s.read_bytes(out);
    if got != out.len() {
        return Err(KeywireError::ProtocolMismatch(format!(
            "{} needs {} bytes, stream had {}",
            what,
            out.len(),
            got
        )));
    }
    Ok(())
}

fn read_u32_le(s: &mut ByteStream, what: &str) -> Result<u32> {
    let mut arr = [0u8; 4];
    read_exact(s, &mut arr, what)?;
    Ok(little_endian_to_int(&arr) as u32)
}

fn read_u64_le(s: &mut ByteStream, what: &str) -> Result<u64> {
    let mut arr = [0u8; 8];
    read_exact(s, &mut arr, what)?;
    Ok(little_endian_to_int(&arr))
}

/// One spend of a previous output.
///
/// `prev_hash` is stored in the byte order it travels on the wire (internal
/// order), not the reversed order block explorers display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prev_hash: Hash32,
    pub prev_index: u32,
    pub script_sig: Script,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(prev_hash: Hash32, prev_index: u32, script_sig: Script, sequence: u32) -> Self {
        Self {
            prev_hash,
            prev_index,
            script_sig,
            sequence,
        }
    }

    /// Spend with an empty unlocking script and final sequence, to be filled
    /// in before serialization.
    pub fn outpoint(prev_hash: Hash32, prev_index: u32) -> Self {
        Self::new(prev_hash, prev_index, Script::default(), SEQUENCE_FINAL)
    }

    /// Parse one input. A script-less input is rejected: this model's strict
    /// mode does not consider it a well-formed transaction.
    pub fn parse(s: &mut ByteStream) -> Result<Self> {
        let mut prev_hash = [0u8; 32];
        read_exact(s, &mut prev_hash, "input previous-output hash")?;
        let prev_index = read_u32_le(s, "input previous-output index")?;
        let script_sig = Script::parse(s)?;
        if script_sig.is_empty() {
            return Err(KeywireError::Format(
                "input carries an empty unlocking script".to_string(),
            ));
        }
        let sequence = read_u32_le(s, "input sequence")?;
        Ok(Self {
            prev_hash,
            prev_index,
            script_sig,
            sequence,
        })
    }

    /// Serialize onto the stream; returns bytes written.
    pub fn serialize(&self, s: &mut ByteStream) -> Result<usize> {
        let mut len = s.write(&self.prev_hash)?;
        len += s.write(&int_to_little_endian(self.prev_index as u64, 4))?;
        len += self.script_sig.serialize(s)?;
        len += s.write(&int_to_little_endian(self.sequence as u64, 4))?;
        Ok(len)
    }

    /// Serialized size without performing I/O.
    pub fn length(&self) -> usize {
        32 + 4 + self.script_sig.length() + 4
    }
}

/// One output: an amount in satoshis locked by a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub amount: u64,
    pub script_pubkey: Script,
}

impl TransactionOutput {
    pub fn new(amount: u64, script_pubkey: Script) -> Self {
        Self {
            amount,
            script_pubkey,
        }
    }

    pub fn parse(s: &mut ByteStream) -> Result<Self> {
        let amount = read_u64_le(s, "output amount")?;
        let script_pubkey = Script::parse(s)?;
        if script_pubkey.is_empty() {
            return Err(KeywireError::Format(
                "output carries an empty locking script".to_string(),
            ));
        }
        Ok(Self {
            amount,
            script_pubkey,
        })
    }

    pub fn serialize(&self, s: &mut ByteStream) -> Result<usize> {
        let mut len = s.write(&int_to_little_endian(self.amount, 8))?;
        len += self.script_pubkey.serialize(s)?;
        Ok(len)
    }

    pub fn length(&self) -> usize {
        8 + self.script_pubkey.length()
    }

    /// Address the locking script pays to, if it is a standard template.
    pub fn address(&self, network: Network) -> Result<String> {
        self.script_pubkey.address(network)
    }
}

/// A legacy (non-witness) transaction.
///
/// Constructed empty and populated either by [`Transaction::parse`]
/// (replacing prior contents) or by repeated [`Transaction::add_input`] /
/// [`Transaction::add_output`]. Mutated in place with no internal locking;
/// callers must not share one across execution contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub locktime: u32,
}

impl Transaction {
    /// Empty transaction with the given version and zero locktime.
    pub fn new(version: u32) -> Self {
        Self {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }

    /// Parse a complete raw transaction. Trailing bytes after the locktime
    /// are a `ProtocolMismatch`: the buffer must hold exactly one
    /// transaction.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut s = ByteStream::new(raw);
        let tx = Self::parse_stream(&mut s)?;
        if s.available() != 0 {
            return Err(KeywireError::ProtocolMismatch(format!(
                "{} trailing bytes after transaction",
                s.available()
            )));
        }
        Ok(tx)
    }

    /// Parse one transaction off the stream, leaving the cursor just past
    /// its locktime.
    pub fn parse_stream(s: &mut ByteStream) -> Result<Self> {
        let before = s.available();

        let version = read_u32_le(s, "transaction version")?;

        let input_count = read_varint(s)?;
        let mut inputs = Vec::with_capacity((input_count as usize).min(PREALLOC_LIMIT));
        for _ in 0..input_count {
            inputs.push(TransactionInput::parse(s)?);
        }

        let output_count = read_varint(s)?;
        let mut outputs = Vec::with_capacity((output_count as usize).min(PREALLOC_LIMIT));
        for _ in 0..output_count {
            outputs.push(TransactionOutput::parse(s)?);
        }

        let locktime = read_u32_le(s, "transaction locktime")?;

        let tx = Self {
            version,
            inputs,
            outputs,
            locktime,
        };

        // consumed length must reconcile with the sum of component lengths
        let consumed = before - s.available();
        if consumed != tx.length() {
            return Err(KeywireError::ProtocolMismatch(format!(
                "consumed {} bytes but components sum to {}",
                consumed,
                tx.length()
            )));
        }
        Ok(tx)
    }

    /// Serialize to an owned buffer, the exact structural inverse of
    /// [`Transaction::parse`].
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut s = ByteStream::empty();
        self.serialize_stream(&mut s)?;
        Ok(s.into_bytes())
    }

    /// Serialize onto the stream; returns bytes written.
    pub fn serialize_stream(&self, s: &mut ByteStream) -> Result<usize> {
        let mut len = s.write(&int_to_little_endian(self.version as u64, 4))?;
        len += write_varint(self.inputs.len() as u64, s)?;
        for input in &self.inputs {
            len += input.serialize(s)?;
        }
        len += write_varint(self.outputs.len() as u64, s)?;
        for output in &self.outputs {
            len += output.serialize(s)?;
        }
        len += s.write(&int_to_little_endian(self.locktime as u64, 4))?;
        Ok(len)
    }

    /// Serialized size without performing I/O; use to size destination
    /// buffers before [`Transaction::serialize_stream`].
    pub fn length(&self) -> usize {
        let mut len = 8 // version + locktime
            + len_varint(self.inputs.len() as u64)
            + len_varint(self.outputs.len() as u64);
        for input in &self.inputs {
            len += input.length();
        }
        for output in &self.outputs {
            len += output.length();
        }
        len
    }

    /// Append an input, returning the new input count.
    pub fn add_input(&mut self, input: TransactionInput) -> usize {
        self.inputs.push(input);
        self.inputs.len()
    }

    /// Append an output, returning the new output count.
    pub fn add_output(&mut self, output: TransactionOutput) -> usize {
        self.outputs.push(output);
        self.outputs.len()
    }

    /// Transaction id: double-SHA256 of the legacy serialization, in
    /// internal byte order.
    pub fn txid(&self) -> Result<Hash32> {
        Ok(double_sha256(&self.serialize()?))
    }

    /// Transaction id in the reversed hex order explorers display.
    pub fn txid_hex(&self) -> Result<String> {
        let mut id = self.txid()?;
        id.reverse();
        Ok(crate::basex::to_hex(&id))
    }

    /// Amount of output `index` in satoshis, if it exists.
    pub fn output_value(&self, index: usize) -> Option<u64> {
        self.outputs.get(index).map(|o| o.amount)
    }

    /// Address of output `index`, if it exists and is a standard template.
    pub fn output_address(&self, index: usize, network: Network) -> Result<String> {
        let output = self.outputs.get(index).ok_or_else(|| {
            KeywireError::Range(format!("output index {} out of range", index))
        })?;
        output.address(network)
    }

    /// A coinbase spends the distinguished null outpoint and nothing else.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prev_hash == [0u8; 32]
            && self.inputs[0].prev_index == 0xffffffff
    }
}
