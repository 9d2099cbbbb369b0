use crate::audio::read_audio;
use crate::error::Result;
use crate::geometry::{Geometry, NominalRates};
use crate::key::read_key;
use std::fs;
use std::path::Path;

/// Describe a WAV carrier's embedding capacity and, optionally, a spreading key
pub fn show_info(path: &Path, params_path: Option<&Path>, rates: NominalRates) -> Result<String> {
    let audio = read_audio(path)?;
    let file_size = fs::metadata(path)?.len();
    let geometry = Geometry::compute(audio.sample_rate, rates)?;

    let mut output = String::new();

    output.push_str("DSSS Carrier Information\n");
    output.push_str("========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Actual size: {}\n", format_size(file_size)));
    output.push_str(&format!("Sample rate: {} Hz\n", audio.sample_rate));
    output.push_str(&format!("Samples (mono): {}\n", audio.len()));
    output.push_str(&format!("Duration: {:.3} s\n", audio.duration_seconds()));
    output.push('\n');

    output.push_str("Geometry:\n");
    output.push_str(&format!(
        "  Nominal rates: {} bit/s, {} chip/s\n",
        rates.bit_rate, rates.chip_rate
    ));
    output.push_str(&format!("  Chips per bit: {}\n", geometry.chips_per_bit));
    output.push_str(&format!("  Samples per chip: {}\n", geometry.samples_per_chip));
    output.push_str(&format!("  Samples per bit: {}\n", geometry.samples_per_bit()));
    output.push('\n');

    output.push_str("Capacity:\n");
    output.push_str(&format!(
        "  Message bits: {}\n",
        geometry.capacity_bits(audio.len())
    ));
    output.push_str(&format!(
        "  Message characters: {}\n",
        geometry.capacity_chars(audio.len())
    ));

    if let Some(params_path) = params_path {
        let key = read_key(params_path)?;
        let key_geometry = Geometry::from_key(&key)?;
        let required = key_geometry.required_samples(key.bits);

        output.push('\n');
        output.push_str("Spreading Key:\n");
        output.push_str(&format!("  File: {}\n", params_path.display()));
        output.push_str(&format!("  Embedded bits: {}\n", key.bits));
        output.push_str(&format!("  PN chips: {}\n", key.pn_bits.len()));
        output.push_str(&format!("  Chips per bit: {}\n", key_geometry.chips_per_bit));
        output.push_str(&format!("  Samples per chip: {}\n", key_geometry.samples_per_chip));
        output.push_str(&format!("  Fingerprint: {}\n", key.fingerprint()));
        if required > audio.len() {
            output.push_str(&format!(
                "  Warning: key spans {} samples but the audio has {}\n",
                required,
                audio.len()
            ));
        } else {
            output.push_str(&format!("  Samples spanned: {} / {}\n", required, audio.len()));
        }
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::write_audio;
    use crate::key::{write_key, SpreadingKey};
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.wav");
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.02).sin()).collect();
        write_audio(&path, 48_000, &samples).unwrap();

        let info = show_info(&path, None, NominalRates::default()).unwrap();
        assert!(info.contains("Sample rate: 48000 Hz"));
        assert!(info.contains("Samples (mono): 1000"));
        assert!(info.contains("Chips per bit: 11"));
        assert!(info.contains("Message bits: 90"));
        assert!(info.contains("Message characters: 11"));
        assert!(!info.contains("Spreading Key"));
    }

    #[test]
    fn test_show_info_with_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stego.wav");
        let params = dir.path().join("embed_params.json");
        write_audio(&path, 8_000, &[0.25; 100]).unwrap();
        let key = SpreadingKey::new(vec![1; 11 * 16], 1, 16);
        write_key(&params, &key).unwrap();

        let info = show_info(&path, Some(params.as_path()), NominalRates::default()).unwrap();
        assert!(info.contains("Embedded bits: 16"));
        assert!(info.contains(&key.fingerprint()));
        assert!(info.contains("Warning: key spans 176 samples but the audio has 100"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
