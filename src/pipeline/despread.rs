use crate::error::{Result, StegoError};
use crate::geometry::Geometry;
use tracing::warn;

/// Bits recovered by [`despread`]
#[derive(Debug, Clone)]
pub struct Despread {
    pub bits: Vec<bool>,
    /// Bit count the key asked for
    pub expected: usize,
}

impl Despread {
    /// True when the audio ran out before every bit was read
    pub fn is_truncated(&self) -> bool {
        self.bits.len() != self.expected
    }
}

/// Correlate one bit's worth of samples against its PN chips.
///
/// Each chip's sample-and-hold group is averaged back to a single value
/// before the product sum.
pub fn correlate_bit(segment: &[f64], chips: &[i8], samples_per_chip: usize) -> f64 {
    if samples_per_chip == 0 {
        return 0.0;
    }
    segment
        .chunks_exact(samples_per_chip)
        .zip(chips)
        .map(|(group, &chip)| {
            let mean = group.iter().sum::<f64>() / samples_per_chip as f64;
            mean * chip as f64
        })
        .sum()
}

/// Decision rule: strictly positive correlation is a 1, anything else a 0
#[inline]
pub fn decide(correlation: f64) -> bool {
    correlation > 0.0
}

/// Recover `bit_count` bits from stego samples using the embed-time PN sequence.
///
/// Running out of audio is not fatal: the bits read so far are returned and
/// the shortfall is logged.
pub fn despread(
    stego: &[f64],
    pn: &[i8],
    geometry: &Geometry,
    bit_count: usize,
) -> Result<Despread> {
    if pn.is_empty() {
        return Err(StegoError::MissingParameters("PN sequence is empty".into()));
    }
    if bit_count == 0 {
        return Err(StegoError::MissingParameters("bit count is zero".into()));
    }
    let cpb = geometry.chips_per_bit;
    let spc = geometry.samples_per_chip;
    if cpb == 0 || spc == 0 {
        return Err(StegoError::MissingParameters(format!(
            "degenerate geometry: {} chips per bit, {} samples per chip",
            cpb, spc
        )));
    }
    let needed = cpb.saturating_mul(bit_count);
    if pn.len() < needed {
        return Err(StegoError::MissingParameters(format!(
            "PN sequence has {} chips, {} bits need {}",
            pn.len(),
            bit_count,
            needed
        )));
    }

    let spb = geometry.samples_per_bit();
    let mut bits = Vec::with_capacity(bit_count.min(stego.len() / spb));
    for (i, chips) in pn.chunks_exact(cpb).take(bit_count).enumerate() {
        // Every earlier bit fit, so `start` is within the audio
        let start = i * spb;
        let end = start.saturating_add(spb);
        if end > stego.len() {
            warn!(
                "audio too short: extracted {} of {} bits ({} samples, need {})",
                i,
                bit_count,
                stego.len(),
                geometry.required_samples(bit_count)
            );
            break;
        }
        bits.push(decide(correlate_bit(&stego[start..end], chips, spc)));
    }

    Ok(Despread {
        bits,
        expected: bit_count,
    })
}
