use crate::bits::BITS_PER_CHAR;
use crate::error::{Result, StegoError};
use crate::key::SpreadingKey;
use serde::{Deserialize, Serialize};

/// Reference nominal bit rate (bits/s)
pub const DEFAULT_BIT_RATE: f64 = 1_000_000.0;
/// Reference nominal chip rate (chips/s)
pub const DEFAULT_CHIP_RATE: f64 = 11_000_000.0;

/// Nominal DSSS rates the geometry is derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalRates {
    pub bit_rate: f64,
    pub chip_rate: f64,
}

impl Default for NominalRates {
    fn default() -> Self {
        Self {
            bit_rate: DEFAULT_BIT_RATE,
            chip_rate: DEFAULT_CHIP_RATE,
        }
    }
}

impl NominalRates {
    /// Validate both rates and return the chips carried by one bit
    pub fn chips_per_bit(&self) -> Result<usize> {
        let invalid = || StegoError::InvalidRate {
            bit_rate: self.bit_rate,
            chip_rate: self.chip_rate,
        };
        if !(self.bit_rate.is_finite() && self.chip_rate.is_finite()) {
            return Err(invalid());
        }
        if self.bit_rate <= 0.0 || self.chip_rate <= 0.0 {
            return Err(invalid());
        }
        // `as usize` saturates, so an unrepresentable ratio must be caught first
        let ratio = (self.chip_rate / self.bit_rate).floor();
        if !ratio.is_finite() || ratio >= usize::MAX as f64 {
            return Err(invalid());
        }
        let chips = ratio as usize;
        if chips == 0 {
            return Err(invalid());
        }
        Ok(chips)
    }
}

/// How one message bit is laid out in the carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub chips_per_bit: usize,
    pub samples_per_chip: usize,
}

impl Geometry {
    /// Derive the geometry for a carrier sample rate.
    ///
    /// `samples_per_chip` is floored and clamped to at least 1, so with the
    /// reference rates every audio sample rate collapses to 11 samples per bit.
    pub fn compute(sample_rate: u32, rates: NominalRates) -> Result<Self> {
        let chips_per_bit = rates.chips_per_bit()?;
        let samples_per_chip = ((sample_rate as f64 / rates.chip_rate).floor() as usize).max(1);
        if chips_per_bit.checked_mul(samples_per_chip).is_none() {
            return Err(StegoError::InvalidRate {
                bit_rate: rates.bit_rate,
                chip_rate: rates.chip_rate,
            });
        }
        Ok(Self {
            chips_per_bit,
            samples_per_chip,
        })
    }

    /// Rebuild the geometry recorded by a spreading key
    pub fn from_key(key: &SpreadingKey) -> Result<Self> {
        if key.bits == 0 {
            return Err(StegoError::MissingParameters("bit count is zero".into()));
        }
        if key.samples_per_chip == 0 {
            return Err(StegoError::InvalidParameters(
                "samples_per_chip must be at least 1".into(),
            ));
        }
        let pn_len = key.pn_bits.len();
        if pn_len == 0 {
            return Err(StegoError::MissingParameters("PN sequence is empty".into()));
        }
        if pn_len % key.bits != 0 {
            return Err(StegoError::InvalidParameters(format!(
                "PN length {} is not a multiple of bit count {}",
                pn_len, key.bits
            )));
        }
        let chips_per_bit = pn_len / key.bits;
        let span = chips_per_bit
            .checked_mul(key.samples_per_chip)
            .and_then(|spb| spb.checked_mul(key.bits));
        if span.is_none() {
            return Err(StegoError::InvalidParameters(format!(
                "{} bits of {} chips at {} samples per chip overflow the sample count",
                key.bits, chips_per_bit, key.samples_per_chip
            )));
        }
        Ok(Self {
            chips_per_bit,
            samples_per_chip: key.samples_per_chip,
        })
    }

    /// Saturates at `usize::MAX`, which no carrier can reach
    pub fn samples_per_bit(&self) -> usize {
        self.chips_per_bit.saturating_mul(self.samples_per_chip)
    }

    /// Carrier samples needed to hold `bit_count` bits, saturating like
    /// [`Geometry::samples_per_bit`]
    pub fn required_samples(&self, bit_count: usize) -> usize {
        bit_count.saturating_mul(self.samples_per_bit())
    }

    /// Number of whole bits a carrier of `sample_count` samples can hold
    pub fn capacity_bits(&self, sample_count: usize) -> usize {
        sample_count / self.samples_per_bit()
    }

    /// Number of whole characters a carrier of `sample_count` samples can hold
    pub fn capacity_chars(&self, sample_count: usize) -> usize {
        self.capacity_bits(sample_count) / BITS_PER_CHAR
    }
}
