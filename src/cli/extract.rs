use crate::audio::read_audio;
use crate::error::Result;
use crate::key::read_key;
use crate::stego::{extract_message, Extracted};
use std::path::{Path, PathBuf};

/// Options for the extract command
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Where to save the recovered message, if anywhere
    pub output_path: Option<PathBuf>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_path: Some(PathBuf::from("extracted_message.txt")),
        }
    }
}

/// Recover a message from a stego WAV using the spreading key in `params_path`
pub fn extract_from_wav(
    stego_path: &Path,
    params_path: &Path,
    options: &ExtractOptions,
) -> Result<Extracted> {
    let key = read_key(params_path)?;
    let stego = read_audio(stego_path)?;
    let extracted = extract_message(&stego, &key)?;

    if let Some(path) = &options.output_path {
        std::fs::write(path, &extracted.message)?;
    }

    Ok(extracted)
}
