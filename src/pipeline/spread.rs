use crate::error::{Result, StegoError};
use crate::geometry::Geometry;
use crate::pipeline::pn::generate_pn;
use rand::Rng;

/// Spread signal plus the PN sequence that produced it
#[derive(Debug, Clone)]
pub struct Spread {
    /// One real sample per carrier sample, `bits * samples_per_bit` long
    pub perturbation: Vec<f64>,
    /// Chips used, `bits * chips_per_bit` long
    pub pn: Vec<i8>,
}

/// Fail unless a carrier of `available` samples can hold `bit_count` bits
pub fn check_capacity(available: usize, bit_count: usize, geometry: &Geometry) -> Result<()> {
    let required = geometry.required_samples(bit_count);
    if required > available {
        return Err(StegoError::InsufficientCarrierLength {
            required,
            available,
        });
    }
    Ok(())
}

/// Bipolar symbol for a bit: 1 -> +1, 0 -> -1
#[inline]
pub fn bipolar(bit: bool) -> i8 {
    if bit {
        1
    } else {
        -1
    }
}

/// Spread each bit over its own PN chip slice, holding every chip for
/// `samples_per_chip` samples.
pub fn spread<R: Rng + ?Sized>(bits: &[bool], geometry: &Geometry, rng: &mut R) -> Spread {
    let cpb = geometry.chips_per_bit;
    let pn = generate_pn(cpb * bits.len(), rng);
    let perturbation = modulate(bits, &pn, geometry);
    Spread { perturbation, pn }
}

/// Deterministic half of [`spread`]: modulate bits with a given PN sequence
pub fn modulate(bits: &[bool], pn: &[i8], geometry: &Geometry) -> Vec<f64> {
    let cpb = geometry.chips_per_bit;
    if cpb == 0 {
        return Vec::new();
    }
    let symbols = bits.len().min(pn.len() / cpb);
    let mut perturbation = Vec::with_capacity(geometry.required_samples(symbols));

    for (bit, chips) in bits.iter().zip(pn.chunks_exact(cpb)) {
        let symbol = bipolar(*bit);
        for &chip in chips {
            let value = (symbol * chip) as f64;
            perturbation.extend(std::iter::repeat(value).take(geometry.samples_per_chip));
        }
    }

    perturbation
}
