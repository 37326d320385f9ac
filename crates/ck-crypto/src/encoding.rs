//! String encoders for [`WordArray`].
//!
//! Each encoder converts the significant bytes of a word array to text and
//! back. Hex output is lowercase; Base64 uses the standard alphabet with `=`
//! padding, while Base64url omits padding.

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Two lowercase hex digits per byte.
    Hex,
    /// One character per byte (code points 0-255).
    Latin1,
    /// UTF-8 text.
    Utf8,
    /// UTF-16 code units, big-endian.
    Utf16Be,
    /// UTF-16 code units, little-endian.
    Utf16Le,
    /// Standard Base64 with padding.
    Base64,
    /// URL-safe Base64 without padding.
    Base64Url,
}

impl Encoding {
    /// Get the canonical name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Latin1 => "latin1",
            Self::Utf8 => "utf8",
            Self::Utf16Be => "utf16be",
            Self::Utf16Le => "utf16le",
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
        }
    }

    /// Renders the significant bytes of `data` as text.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedInput` when the bytes are not valid for a
    /// text encoding (invalid UTF-8, unpaired UTF-16 surrogates).
    pub fn stringify(self, data: &WordArray) -> Result<String> {
        let bytes = data.to_bytes();
        match self {
            Self::Hex => Ok(data.to_hex()),
            Self::Latin1 => Ok(bytes.iter().map(|b| char::from(*b)).collect()),
            Self::Utf8 => String::from_utf8(bytes)
                .map_err(|e| CryptoError::MalformedInput(format!("invalid UTF-8 data: {}", e))),
            Self::Utf16Be | Self::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks(2)
                    .map(|pair| {
                        let unit = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]);
                        if self == Self::Utf16Le {
                            unit.swap_bytes()
                        } else {
                            unit
                        }
                    })
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| CryptoError::MalformedInput(format!("invalid UTF-16 data: {}", e)))
            }
            Self::Base64 => Ok(BASE64.encode(&bytes)),
            Self::Base64Url => Ok(BASE64_URL.encode(&bytes)),
        }
    }

    /// Parses text into a word array.
    ///
    /// Base64 input may contain ASCII whitespace (line-wrapped output from
    /// other tools); it is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedInput` if the text is not valid for the encoding.
    pub fn parse(self, input: &str) -> Result<WordArray> {
        match self {
            Self::Hex => parse_hex(input),
            Self::Latin1 => {
                let bytes = input
                    .chars()
                    .map(|c| {
                        u8::try_from(u32::from(c)).map_err(|_| {
                            CryptoError::MalformedInput(format!(
                                "character {:?} is outside Latin-1",
                                c
                            ))
                        })
                    })
                    .collect::<Result<Vec<u8>>>()?;
                Ok(WordArray::from_bytes(&bytes))
            }
            Self::Utf8 => Ok(WordArray::from(input)),
            Self::Utf16Be | Self::Utf16Le => {
                let bytes: Vec<u8> = input
                    .encode_utf16()
                    .flat_map(|unit| {
                        if self == Self::Utf16Le {
                            unit.to_le_bytes()
                        } else {
                            unit.to_be_bytes()
                        }
                    })
                    .collect();
                Ok(WordArray::from_bytes(&bytes))
            }
            Self::Base64 | Self::Base64Url => {
                let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                let engine = if self == Self::Base64 { &BASE64 } else { &BASE64_URL };
                let bytes = engine
                    .decode(compact.as_bytes())
                    .map_err(|e| CryptoError::MalformedInput(format!("invalid {}: {}", self, e)))?;
                Ok(WordArray::from_bytes(&bytes))
            }
        }
    }
}

fn parse_hex(input: &str) -> Result<WordArray> {
    if input.len() % 2 != 0 {
        return Err(CryptoError::MalformedInput(
            "hex input has an odd number of digits".to_string(),
        ));
    }
    let digits = input.as_bytes();
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = hex_value(pair[0])?;
        let lo = hex_value(pair[1])?;
        bytes.push((hi << 4) | lo);
    }
    Ok(WordArray::from_bytes(&bytes))
}

fn hex_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(CryptoError::MalformedInput(format!(
            "invalid hex digit {:?}",
            char::from(digit)
        ))),
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "latin1" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf16" | "utf16be" | "utf-16" => Ok(Self::Utf16Be),
            "utf16le" => Ok(Self::Utf16Le),
            "base64" => Ok(Self::Base64),
            "base64url" => Ok(Self::Base64Url),
            _ => Err(CryptoError::UnknownAlgorithm {
                kind: "encoding",
                name: s.to_string(),
            }),
        }
    }
}
