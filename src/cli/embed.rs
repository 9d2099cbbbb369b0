use crate::audio::{read_audio, write_audio};
use crate::bits::to_bit_string;
use crate::error::Result;
use crate::geometry::NominalRates;
use crate::key::write_key;
use crate::report::{write_report, StegoReport};
use crate::stego::embed_message;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the message to hide comes from
#[derive(Debug, Clone)]
pub enum MessageSource {
    /// Literal text
    Text(String),
    /// Text file, trimmed of surrounding whitespace
    File(PathBuf),
}

impl MessageSource {
    pub fn load(&self) -> Result<String> {
        match self {
            MessageSource::Text(text) => Ok(text.clone()),
            MessageSource::File(path) => Ok(fs::read_to_string(path)?.trim().to_string()),
        }
    }

    fn file(&self) -> Option<&Path> {
        match self {
            MessageSource::Text(_) => None,
            MessageSource::File(path) => Some(path.as_path()),
        }
    }
}

/// Options for the embed command
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    pub scaling_factor: f64,
    pub rates: NominalRates,
    /// Spreading key output
    pub params_path: PathBuf,
    /// Metadata report output
    pub report_path: Option<PathBuf>,
    /// Optional dump of the message bit string
    pub bits_path: Option<PathBuf>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            scaling_factor: 0.05,
            rates: NominalRates::default(),
            params_path: PathBuf::from("embed_params.json"),
            report_path: Some(PathBuf::from("stego_info.json")),
            bits_path: None,
        }
    }
}

/// Output files written beside their targets, renamed into place together.
///
/// Anything not committed is removed on drop.
#[derive(Default)]
struct Staging {
    files: Vec<(PathBuf, PathBuf)>,
}

impl Staging {
    fn stage<F>(&mut self, target: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let partial = partial_path(target);
        self.files.push((partial.clone(), target.to_path_buf()));
        write(&partial)
    }

    fn commit(mut self) -> Result<()> {
        for i in 0..self.files.len() {
            let (partial, target) = &self.files[i];
            if let Err(e) = fs::rename(partial, target) {
                for (_, done) in &self.files[..i] {
                    let _ = fs::remove_file(done);
                }
                return Err(e.into());
            }
        }
        self.files.clear();
        Ok(())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        for (partial, _) in &self.files {
            let _ = fs::remove_file(partial);
        }
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.partial", name))
}

/// Hide a message in a WAV carrier.
/// Writes the stego WAV, the spreading key and (optionally) the report and
/// bit dump. Either every output lands or none does.
pub fn embed_into_wav(
    carrier_path: &Path,
    source: &MessageSource,
    output_path: &Path,
    options: &EmbedOptions,
) -> Result<StegoReport> {
    let message = source.load()?;
    let carrier = read_audio(carrier_path)?;

    let embedded = embed_message(
        &carrier,
        &message,
        options.scaling_factor,
        options.rates,
        &mut rand::thread_rng(),
    )?;

    let report = StegoReport {
        output_file: output_path.display().to_string(),
        sample_rate: carrier.sample_rate,
        num_samples: carrier.len(),
        duration_seconds: carrier.duration_seconds(),
        message_length_bits: embedded.bits.len(),
        snr_db: Some(embedded.snr_db).filter(|s| s.is_finite()),
        scaling_factor: options.scaling_factor,
        effective_gain: embedded.gain,
        chips_per_bit: embedded.geometry.chips_per_bit,
        samples_per_chip: embedded.geometry.samples_per_chip,
        key_fingerprint: embedded.key.fingerprint(),
        message_file: source.file().map(|p| p.display().to_string()),
    };

    let mut staging = Staging::default();
    staging.stage(output_path, |p| {
        write_audio(p, embedded.stego.sample_rate, &embedded.stego.samples)
    })?;
    staging.stage(&options.params_path, |p| write_key(p, &embedded.key))?;
    if let Some(path) = &options.report_path {
        staging.stage(path, |p| write_report(p, &report))?;
    }
    if let Some(path) = &options.bits_path {
        staging.stage(path, |p| Ok(fs::write(p, to_bit_string(&embedded.bits))?))?;
    }
    staging.commit()?;

    Ok(report)
}
