use crate::error::{Result, StegoError};
use crate::pipeline::guard::normalize;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// Mono, peak-normalized audio and its sample rate
#[derive(Debug, Clone)]
pub struct Audio {
    pub sample_rate: u32,
    pub samples: Vec<f64>,
}

impl Audio {
    /// Mix interleaved frames down to mono and normalize the peak to 1.0
    pub fn from_interleaved(sample_rate: u32, channels: usize, interleaved: &[f64]) -> Result<Self> {
        if interleaved.is_empty() || channels == 0 {
            return Err(StegoError::EmptyInput("carrier"));
        }
        let mono: Vec<f64> = if channels == 1 {
            interleaved.to_vec()
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f64>() / channels as f64)
                .collect()
        };
        if mono.is_empty() {
            return Err(StegoError::EmptyInput("carrier"));
        }
        Ok(Self {
            sample_rate,
            samples: normalize(&mono, "carrier")?,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a WAV file as normalized mono audio.
///
/// Integer PCM of any depth up to 32 bits and 32-bit float are accepted.
pub fn read_audio(path: &Path) -> Result<Audio> {
    let mut reader = WavReader::open(path)
        .map_err(|e| StegoError::CarrierDecode(format!("{}: {}", path.display(), e)))?;
    let spec = reader.spec();
    debug!(
        "reading {}: {} Hz, {} channel(s), {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let decode_err = |e: hound::Error| StegoError::CarrierDecode(format!("{}: {}", path.display(), e));
    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ 1..=32) => {
            let full_scale = (1u64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_err)?
        }
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<std::result::Result<_, _>>()
            .map_err(decode_err)?,
        (format, bits) => {
            return Err(StegoError::CarrierDecode(format!(
                "{}: unsupported WAV format {:?} with {} bits per sample",
                path.display(),
                format,
                bits
            )))
        }
    };

    Audio::from_interleaved(spec.sample_rate, spec.channels as usize, &interleaved)
}

/// Write mono samples as a 32-bit float WAV
pub fn write_audio(path: &Path, sample_rate: u32, samples: &[f64]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let encode_err = |e: hound::Error| StegoError::AudioEncode(format!("{}: {}", path.display(), e));

    let mut writer = WavWriter::create(path, spec).map_err(encode_err)?;
    for &sample in samples {
        writer.write_sample(sample as f32).map_err(encode_err)?;
    }
    writer.finalize().map_err(encode_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_i16_stereo(path: &Path, frames: &[(i16, i16)]) {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &(l, r) in frames {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_stereo_is_averaged_and_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_i16_stereo(&path, &[(1000, 3000), (-4000, 0), (500, 500)]);

        let audio = read_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 8_000);
        assert_eq!(audio.len(), 3);
        // Means are 2000, -2000, 500
        assert_eq!(audio.samples, vec![1.0, -1.0, 0.25]);
    }

    #[test]
    fn test_float_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let samples = vec![0.5, -1.0, 0.25, 0.0];
        write_audio(&path, 44_100, &samples).unwrap();

        let audio = read_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 44_100);
        assert_eq!(audio.samples, samples);
        assert!((audio.duration_seconds() - 4.0 / 44_100.0).abs() < 1e-12);
    }

    #[test]
    fn test_silent_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silent.wav");
        write_audio(&path, 8_000, &[0.0; 16]).unwrap();
        assert!(matches!(
            read_audio(&path),
            Err(StegoError::SilentSignal("carrier"))
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_audio(&path, 8_000, &[]).unwrap();
        assert!(matches!(
            read_audio(&path),
            Err(StegoError::EmptyInput("carrier"))
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_audio.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();
        assert!(matches!(
            read_audio(&path),
            Err(StegoError::CarrierDecode(_))
        ));
        assert!(matches!(
            read_audio(&dir.path().join("missing.wav")),
            Err(StegoError::CarrierDecode(_))
        ));
    }
}
