//! Spreading key: the side-channel parameters handed from embed to extract.
//!
//! Stored as JSON with the fields `pn_bits`, `samples_per_chip` and `bits`.
//! The PN sequence is random per embed and cannot be regenerated, so losing
//! this file means losing the message.

use crate::error::{Result, StegoError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// PN sequence plus the geometry needed to despread it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadingKey {
    /// Chip values, each +1 or -1
    pub pn_bits: Vec<i8>,
    /// Audio samples per chip
    pub samples_per_chip: usize,
    /// Number of embedded message bits
    pub bits: usize,
}

/// On-disk shape, every field optional so missing ones can be named
#[derive(Deserialize)]
struct RawKey {
    pn_bits: Option<Vec<i8>>,
    samples_per_chip: Option<usize>,
    bits: Option<usize>,
}

impl SpreadingKey {
    pub fn new(pn_bits: Vec<i8>, samples_per_chip: usize, bits: usize) -> Self {
        Self {
            pn_bits,
            samples_per_chip,
            bits,
        }
    }

    /// Check that every chip is bipolar
    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.pn_bits.iter().position(|&c| c != 1 && c != -1) {
            return Err(StegoError::InvalidParameters(format!(
                "pn_bits[{}] = {} is not +1 or -1",
                pos, self.pn_bits[pos]
            )));
        }
        Ok(())
    }

    /// SHA-256 of the chip sequence, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for &chip in &self.pn_bits {
            hasher.update([chip as u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Serialize key to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize key from JSON bytes, naming the first missing field
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let raw: RawKey = serde_json::from_slice(data)?;
        let key = Self {
            pn_bits: raw
                .pn_bits
                .ok_or(StegoError::MissingParameterField("pn_bits"))?,
            samples_per_chip: raw
                .samples_per_chip
                .ok_or(StegoError::MissingParameterField("samples_per_chip"))?,
            bits: raw.bits.ok_or(StegoError::MissingParameterField("bits"))?,
        };
        key.validate()?;
        Ok(key)
    }
}

/// Write a key to disk
pub fn write_key(path: &Path, key: &SpreadingKey) -> Result<()> {
    std::fs::write(path, key.to_bytes()?)?;
    Ok(())
}

/// Read a key from disk
pub fn read_key(path: &Path) -> Result<SpreadingKey> {
    let data = std::fs::read(path).map_err(|e| {
        StegoError::MissingParameters(format!("cannot read '{}': {}", path.display(), e))
    })?;
    SpreadingKey::from_bytes(&data)
}
