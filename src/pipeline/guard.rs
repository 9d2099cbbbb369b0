//! Amplitude guard.
//!
//! The perturbation is added to the carrier and the sum is rescaled so its
//! peak is exactly 1.0. That rescale also attenuates the embedded signal, so
//! the effective strength is `scaling_factor / peak`, exposed here as
//! [`embedding_gain`].

use crate::error::{Result, StegoError};

/// Output of [`combine`]
#[derive(Debug, Clone)]
pub struct Combined {
    /// Stego samples, peak-normalized to 1.0
    pub stego: Vec<f64>,
    /// Perturbation amplitude left after the final normalization
    pub gain: f64,
    /// SNR of the stego signal against the carrier, in dB
    pub snr_db: f64,
}

/// Largest absolute sample value
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

/// Scale samples so the peak absolute value is 1.0
pub fn normalize(samples: &[f64], what: &'static str) -> Result<Vec<f64>> {
    let max = peak(samples);
    if max == 0.0 || !max.is_finite() {
        return Err(StegoError::SilentSignal(what));
    }
    Ok(samples.iter().map(|s| s / max).collect())
}

/// Carrier plus scaled perturbation, before normalization.
/// Samples past the perturbation are copied unchanged.
fn superpose(carrier: &[f64], perturbation: &[f64], scaling_factor: f64) -> Vec<f64> {
    let mut mixed = carrier.to_vec();
    for (sample, p) in mixed.iter_mut().zip(perturbation) {
        *sample += scaling_factor * p;
    }
    mixed
}

/// Effective perturbation amplitude once the combined signal is renormalized
pub fn embedding_gain(carrier: &[f64], perturbation: &[f64], scaling_factor: f64) -> Result<f64> {
    let max = peak(&superpose(carrier, perturbation, scaling_factor));
    if max == 0.0 {
        return Err(StegoError::SilentSignal("stego signal"));
    }
    Ok(scaling_factor / max)
}

/// Add `scaling_factor * perturbation` to the carrier and renormalize the result
pub fn combine(carrier: &[f64], perturbation: &[f64], scaling_factor: f64) -> Result<Combined> {
    if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
        return Err(StegoError::InvalidScalingFactor(scaling_factor));
    }

    let mixed = superpose(carrier, perturbation, scaling_factor);
    let max = peak(&mixed);
    let stego = normalize(&mixed, "stego signal")?;
    let snr_db = calculate_snr(carrier, &stego);

    Ok(Combined {
        stego,
        gain: scaling_factor / max,
        snr_db,
    })
}

/// `10 * log10(mean(original^2) / mean((original - modified)^2))`,
/// `+inf` when the two are identical
pub fn calculate_snr(original: &[f64], modified: &[f64]) -> f64 {
    let n = original.len().min(modified.len());
    if n == 0 {
        return f64::INFINITY;
    }
    let signal_power = original[..n].iter().map(|x| x * x).sum::<f64>() / n as f64;
    let noise_power = original[..n]
        .iter()
        .zip(&modified[..n])
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        / n as f64;
    if noise_power == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (signal_power / noise_power).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|i| amplitude * (i as f64 * 0.05).sin())
            .collect()
    }

    fn alternating(len: usize) -> Vec<f64> {
        (0..len).map(|i| if i % 3 == 0 { 1.0 } else { -1.0 }).collect()
    }

    #[test]
    fn test_combine_peak_is_one() {
        let carrier = normalize(&sine(500, 0.3), "carrier").unwrap();
        let perturbation = alternating(220);
        for scaling in [0.01, 0.05, 0.5, 3.0] {
            let combined = combine(&carrier, &perturbation, scaling).unwrap();
            assert_eq!(combined.stego.len(), carrier.len());
            assert!((peak(&combined.stego) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_combine_copies_tail() {
        let carrier = vec![0.5, -0.5, 0.25, 1.0];
        let combined = combine(&carrier, &[1.0], 0.5).unwrap();
        // 0.5 + 0.5 = 1.0 is the peak, so nothing is rescaled
        assert_eq!(combined.stego, vec![1.0, -0.5, 0.25, 1.0]);
        assert_eq!(combined.gain, 0.5);
    }

    #[test]
    fn test_gain_matches_combine() {
        let carrier = normalize(&sine(300, 1.0), "carrier").unwrap();
        let perturbation = alternating(300);
        let gain = embedding_gain(&carrier, &perturbation, 0.2).unwrap();
        let combined = combine(&carrier, &perturbation, 0.2).unwrap();
        assert!((gain - combined.gain).abs() < 1e-15);
        assert!(gain < 0.2);
    }

    #[test]
    fn test_does_not_mutate_carrier() {
        let carrier = vec![0.1, -1.0, 0.3];
        let before = carrier.clone();
        let _ = combine(&carrier, &[1.0, 1.0, 1.0], 0.1).unwrap();
        assert_eq!(carrier, before);
    }

    #[test]
    fn test_invalid_scaling_factor() {
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                combine(&[1.0], &[1.0], bad),
                Err(StegoError::InvalidScalingFactor(_))
            ));
        }
    }

    #[test]
    fn test_cancelled_signal() {
        let err = combine(&[0.5, -0.5], &[-1.0, 1.0], 0.5).unwrap_err();
        assert!(matches!(err, StegoError::SilentSignal(_)));
    }

    #[test]
    fn test_normalize_silence() {
        assert!(matches!(
            normalize(&[0.0, 0.0], "carrier"),
            Err(StegoError::SilentSignal("carrier"))
        ));
        assert_eq!(normalize(&[0.5, -2.0], "carrier").unwrap(), vec![0.25, -1.0]);
    }

    #[test]
    fn test_snr_identical_is_infinite() {
        let x = sine(100, 0.7);
        assert_eq!(calculate_snr(&x, &x), f64::INFINITY);
    }

    #[test]
    fn test_snr_known_value() {
        // Signal power 1, noise power 0.01 -> 20 dB
        let original = vec![1.0, -1.0, 1.0, -1.0];
        let modified: Vec<f64> = original.iter().map(|x| x + 0.1).collect();
        assert!((calculate_snr(&original, &modified) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_snr_decreases_with_perturbation() {
        let carrier = sine(400, 1.0);
        let perturbation = alternating(400);
        let mut last = f64::INFINITY;
        for step in 1..=10 {
            let e = step as f64 * 0.02;
            let modified: Vec<f64> = carrier
                .iter()
                .zip(&perturbation)
                .map(|(c, p)| c + e * p)
                .collect();
            let snr = calculate_snr(&carrier, &modified);
            assert!(snr < last, "SNR {} not below {} at e={}", snr, last, e);
            last = snr;
        }
    }
}
