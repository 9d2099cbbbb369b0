use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty input: {0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Non-ASCII character {character:?} at position {index}. Only 7-bit ASCII messages can be embedded")]
    NonAsciiMessage { index: usize, character: char },

    #[error("Invalid nominal rates: bit rate {bit_rate}, chip rate {chip_rate}. Both must be positive and chip rate >= bit rate")]
    InvalidRate { bit_rate: f64, chip_rate: f64 },

    #[error("Invalid scaling factor: {0}. Must be finite and positive")]
    InvalidScalingFactor(f64),

    #[error("Carrier too short: message needs {required} samples, carrier has {available}")]
    InsufficientCarrierLength { required: usize, available: usize },

    #[error("Missing embedding parameters: {0}")]
    MissingParameters(String),

    #[error("Parameter store is missing field '{0}'")]
    MissingParameterField(&'static str),

    #[error("Invalid embedding parameters: {0}")]
    InvalidParameters(String),

    #[error("Carrier decode error: {0}")]
    CarrierDecode(String),

    #[error("Audio encode error: {0}")]
    AudioEncode(String),

    #[error("Silent signal: {0} has no non-zero samples and cannot be normalized")]
    SilentSignal(&'static str),
}

pub type Result<T> = std::result::Result<T, StegoError>;
