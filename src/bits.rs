//! Text <-> bit codec.
//!
//! Every character becomes exactly 8 bits, most-significant bit first.
//! Decoding is best-effort: malformed groups are skipped and reported as
//! [`DecodeWarning`]s instead of failing the whole extraction.

use crate::error::{Result, StegoError};
use std::fmt;
use tracing::warn;

/// Bits per encoded character
pub const BITS_PER_CHAR: usize = 8;

/// Printable ASCII range kept by the decoder
const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

/// Non-fatal anomaly found while decoding a bit sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// Trailing group shorter than 8 bits was discarded
    TrailingBits { bits: String },
    /// A full group decoded to a byte outside printable ASCII and was dropped
    NonPrintable { group: usize, bits: String, value: u8 },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::TrailingBits { bits } => {
                write!(f, "discarded trailing bit group '{}' (fewer than 8 bits)", bits)
            }
            DecodeWarning::NonPrintable { group, bits, value } => write!(
                f,
                "dropped non-printable byte {} from bit group {} ('{}')",
                value, group, bits
            ),
        }
    }
}

/// Result of a best-effort decode
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub text: String,
    pub warnings: Vec<DecodeWarning>,
}

/// Encode text as bits, 8 per character, MSB first.
///
/// Empty text is rejected, as is any character outside 7-bit ASCII.
pub fn encode(text: &str) -> Result<Vec<bool>> {
    if text.is_empty() {
        return Err(StegoError::EmptyInput("message"));
    }

    let mut bits = Vec::with_capacity(text.len() * BITS_PER_CHAR);
    for (index, character) in text.chars().enumerate() {
        if !character.is_ascii() {
            return Err(StegoError::NonAsciiMessage { index, character });
        }
        let byte = character as u8;
        for shift in (0..BITS_PER_CHAR).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    Ok(bits)
}

/// Decode bits back to text, skipping anything that cannot be a printable character
pub fn decode(bits: &[bool]) -> Decoded {
    let mut decoded = Decoded::default();

    for (group, chunk) in bits.chunks(BITS_PER_CHAR).enumerate() {
        if chunk.len() < BITS_PER_CHAR {
            let warning = DecodeWarning::TrailingBits {
                bits: to_bit_string(chunk),
            };
            warn!("{}", warning);
            decoded.warnings.push(warning);
            continue;
        }

        let value = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8);
        if PRINTABLE.contains(&value) {
            decoded.text.push(value as char);
        } else {
            let warning = DecodeWarning::NonPrintable {
                group,
                bits: to_bit_string(chunk),
                value,
            };
            warn!("{}", warning);
            decoded.warnings.push(warning);
        }
    }

    decoded
}

/// Render bits as a `'0'`/`'1'` string
pub fn to_bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parse a `'0'`/`'1'` string, ignoring surrounding whitespace
pub fn parse_bit_string(s: &str) -> Result<Vec<bool>> {
    s.trim()
        .chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(StegoError::InvalidParameters(format!(
                "bit string contains '{}'",
                other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_hi() {
        let bits = encode("Hi").unwrap();
        assert_eq!(bits.len(), 16);
        assert_eq!(to_bit_string(&bits), "0100100001101001");
    }

    #[test]
    fn test_encode_empty() {
        assert!(matches!(encode(""), Err(StegoError::EmptyInput("message"))));
    }

    #[test]
    fn test_encode_rejects_non_ascii() {
        match encode("caf\u{e9}") {
            Err(StegoError::NonAsciiMessage { index, character }) => {
                assert_eq!(index, 3);
                assert_eq!(character, '\u{e9}');
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_discards_trailing_group() {
        // "Hh"
        let bits = parse_bit_string("0100100001101000").unwrap();
        let mut with_tail = bits.clone();
        with_tail.extend(parse_bit_string("01000").unwrap());
        assert_eq!(with_tail.len(), 21);

        let decoded = decode(&with_tail);
        assert_eq!(decoded.text, "Hh");
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::TrailingBits {
                bits: "01000".into()
            }]
        );
    }

    #[test]
    fn test_decode_23_bits() {
        // Two full groups plus a 7-bit tail
        let bits = parse_bit_string("01001000011010010100000").unwrap();
        assert_eq!(bits.len(), 23);
        let decoded = decode(&bits);
        assert_eq!(decoded.text, "Hi");
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn test_decode_drops_non_printable() {
        // 'A', newline, 'B'
        let bits = parse_bit_string("010000010000101001000010").unwrap();
        let decoded = decode(&bits);
        assert_eq!(decoded.text, "AB");
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::NonPrintable {
                group: 1,
                bits: "00001010".into(),
                value: 10,
            }]
        );
    }

    #[test]
    fn test_decode_empty() {
        let decoded = decode(&[]);
        assert!(decoded.text.is_empty());
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_parse_bit_string_rejects_garbage() {
        assert!(parse_bit_string("0102").is_err());
        assert_eq!(parse_bit_string(" 01\n").unwrap(), vec![false, true]);
    }

    proptest! {
        #[test]
        fn prop_printable_roundtrip(text in "[ -~]{1,64}") {
            let bits = encode(&text).unwrap();
            prop_assert_eq!(bits.len(), text.len() * BITS_PER_CHAR);
            let decoded = decode(&bits);
            prop_assert_eq!(decoded.text, text);
            prop_assert!(decoded.warnings.is_empty());
        }
    }
}
