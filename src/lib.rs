//! dsss-stego - Direct-Sequence Spread-Spectrum audio steganography
//!
//! Hides a short ASCII message in an audio carrier by adding a low-amplitude
//! spread signal, and recovers it with a correlation detector. Recovery needs
//! the exact pseudo-noise (PN) sequence drawn at embed time, which is written
//! next to the stego audio as a JSON spreading key.
//!
//! ## Pipeline
//!
//! ```text
//! Embed:   message → bits → spread (PN × bit, sample-and-hold) → carrier + s·spread → normalize
//! Extract: stego → per-bit chip averaging → correlate with PN → sign decision → bits → message
//! ```
//!
//! - **Bits**: 8 bits per ASCII character, MSB first
//! - **Geometry**: chips per bit and samples per chip from nominal bit/chip rates
//! - **Spread**: each bit multiplies its own slice of a fresh random ±1 PN sequence
//! - **Guard**: the sum is renormalized to a peak of 1.0, which also attenuates the spread signal
//! - **Despread**: correlation strictly above zero decodes as 1
//!
//! ## Example
//!
//! ```no_run
//! use dsss_stego::cli::{embed_into_wav, extract_from_wav, EmbedOptions, ExtractOptions, MessageSource};
//! use std::path::Path;
//!
//! let embed_opts = EmbedOptions::default();
//! embed_into_wav(
//!     Path::new("cover.wav"),
//!     &MessageSource::Text("Hi".into()),
//!     Path::new("stego.wav"),
//!     &embed_opts,
//! ).unwrap();
//!
//! let extracted = extract_from_wav(
//!     Path::new("stego.wav"),
//!     &embed_opts.params_path,
//!     &ExtractOptions::default(),
//! ).unwrap();
//! assert_eq!(extracted.message, "Hi");
//! ```

pub mod audio;
pub mod bits;
pub mod cli;
pub mod error;
pub mod geometry;
pub mod key;
pub mod pipeline;
pub mod report;
pub mod stego;

pub use error::{Result, StegoError};
pub use geometry::{Geometry, NominalRates};
pub use key::{read_key, write_key, SpreadingKey};
pub use stego::{embed_message, extract_message, Embedded, Extracted};
