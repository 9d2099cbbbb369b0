use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Human-readable summary of an embed. Informational only; extraction
/// never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StegoReport {
    pub output_file: String,
    pub sample_rate: u32,
    pub num_samples: usize,
    pub duration_seconds: f64,
    pub message_length_bits: usize,
    /// `null` in JSON when the stego signal equals the carrier
    pub snr_db: Option<f64>,
    pub scaling_factor: f64,
    /// Perturbation amplitude after the final normalization
    pub effective_gain: f64,
    pub chips_per_bit: usize,
    pub samples_per_chip: usize,
    /// SHA-256 of the PN sequence
    pub key_fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_file: Option<String>,
}

impl StegoReport {
    /// Pretty JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

pub fn write_report(path: &Path, report: &StegoReport) -> Result<()> {
    std::fs::write(path, report.to_bytes()?)?;
    Ok(())
}
