//! In-memory embed and extract over already-loaded audio.
//!
//! ```text
//! embed:   message → bits → spread (PN + geometry) → combine → stego + key
//! extract: stego + key → despread → bits → message
//! ```

use crate::audio::Audio;
use crate::bits::{self, DecodeWarning};
use crate::error::{Result, StegoError};
use crate::geometry::{Geometry, NominalRates};
use crate::key::SpreadingKey;
use crate::pipeline::{check_capacity, combine, despread, spread};
use rand::Rng;
use tracing::{debug, info};

/// Everything an embed produces
#[derive(Debug, Clone)]
pub struct Embedded {
    pub stego: Audio,
    pub key: SpreadingKey,
    pub geometry: Geometry,
    pub bits: Vec<bool>,
    pub snr_db: f64,
    /// Perturbation amplitude after the final normalization
    pub gain: f64,
}

/// Everything an extract produces
#[derive(Debug, Clone)]
pub struct Extracted {
    pub message: String,
    pub bits: Vec<bool>,
    /// Bit count recorded in the key
    pub expected_bits: usize,
    pub warnings: Vec<DecodeWarning>,
}

impl Extracted {
    pub fn is_complete(&self) -> bool {
        self.bits.len() == self.expected_bits && self.warnings.is_empty()
    }
}

/// Hide `message` in `carrier`, drawing a fresh PN sequence from `rng`.
///
/// The carrier is not modified. Fails before any spreading if the carrier
/// is too short for the whole message.
pub fn embed_message<R: Rng + ?Sized>(
    carrier: &Audio,
    message: &str,
    scaling_factor: f64,
    rates: NominalRates,
    rng: &mut R,
) -> Result<Embedded> {
    if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
        return Err(StegoError::InvalidScalingFactor(scaling_factor));
    }
    if carrier.is_empty() {
        return Err(StegoError::EmptyInput("carrier"));
    }

    let bits = bits::encode(message)?;
    let geometry = Geometry::compute(carrier.sample_rate, rates)?;
    check_capacity(carrier.len(), bits.len(), &geometry)?;
    debug!(
        "embedding {} bits: {} chips/bit, {} samples/chip, {} of {} samples used",
        bits.len(),
        geometry.chips_per_bit,
        geometry.samples_per_chip,
        geometry.required_samples(bits.len()),
        carrier.len()
    );

    let spread = spread(&bits, &geometry, rng);
    let combined = combine(&carrier.samples, &spread.perturbation, scaling_factor)?;
    info!(
        "embedded {} bits, SNR {:.2} dB, effective gain {:.5}",
        bits.len(),
        combined.snr_db,
        combined.gain
    );

    Ok(Embedded {
        stego: Audio {
            sample_rate: carrier.sample_rate,
            samples: combined.stego,
        },
        key: SpreadingKey::new(spread.pn, geometry.samples_per_chip, bits.len()),
        geometry,
        bits,
        snr_db: combined.snr_db,
        gain: combined.gain,
    })
}

/// Recover the message hidden in `stego` with the key written at embed time
pub fn extract_message(stego: &Audio, key: &SpreadingKey) -> Result<Extracted> {
    key.validate()?;
    let geometry = Geometry::from_key(key)?;
    let despread = despread(&stego.samples, &key.pn_bits, &geometry, key.bits)?;
    let decoded = bits::decode(&despread.bits);
    info!(
        "extracted {} of {} bits, {} character(s)",
        despread.bits.len(),
        key.bits,
        decoded.text.len()
    );

    Ok(Extracted {
        message: decoded.text,
        bits: despread.bits,
        expected_bits: key.bits,
        warnings: decoded.warnings,
    })
}
