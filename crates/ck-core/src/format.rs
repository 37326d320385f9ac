//! Ciphertext envelope formats.
//!
//! This module provides formatters and parsers for serialized cipher params:
//! - OpenSSL (`Base64("Salted__" ++ salt ++ ciphertext)`, salt optional)
//! - JSON (`{"ct": base64, "iv": hex, "s": hex}`)

use std::fmt;
use std::str::FromStr;

use ck_crypto::encoding::Encoding;
use ck_crypto::word_array::WordArray;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::params::CipherParams;

/// The words spelling `Salted__`.
const SALTED_MAGIC: [u32; 2] = [0x5361_6c74, 0x6564_5f5f];

/// OpenSSL always uses an 8-byte salt.
const OPENSSL_SALT_WORDS: usize = 2;

/// Supported envelope formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// OpenSSL-compatible Base64 (default)
    #[default]
    OpenSsl,
    /// JSON object with Base64 ciphertext and hex IV and salt
    Json,
}

impl Format {
    /// Every format.
    pub const ALL: [Format; 2] = [Self::OpenSsl, Self::Json];

    /// Canonical name of this format.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenSsl => "openssl",
            Self::Json => "json",
        }
    }

    /// Serializes cipher params.
    ///
    /// The OpenSSL format carries only the ciphertext and salt. The JSON
    /// format also carries the IV.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFormat` when an OpenSSL envelope is given a
    /// non-empty salt that is not 8 bytes long. An empty salt is written as
    /// an unsalted envelope.
    pub fn stringify(self, params: &CipherParams) -> Result<String> {
        match self {
            Self::OpenSsl => stringify_openssl(params),
            Self::Json => stringify_json(params),
        }
    }

    /// Parses a serialized envelope back into cipher params.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFormat` for truncated OpenSSL input,
    /// `CoreError::SerializationError` for malformed JSON, and
    /// `CoreError::CryptoError` for bad Base64 or hex.
    pub fn parse(self, input: &str) -> Result<CipherParams> {
        let mut params = match self {
            Self::OpenSsl => parse_openssl(input)?,
            Self::Json => parse_json(input)?,
        };
        params.format = Some(self);
        Ok(params)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openssl" => Ok(Self::OpenSsl),
            "json" => Ok(Self::Json),
            _ => Err(CoreError::UnknownName {
                kind: "format",
                name: s.to_string(),
            }),
        }
    }
}

fn stringify_openssl(params: &CipherParams) -> Result<String> {
    let data = match &params.salt {
        Some(salt) if !salt.is_empty() => {
            if salt.sig_bytes() != OPENSSL_SALT_WORDS * 4 {
                return Err(CoreError::InvalidFormat {
                    format: Format::OpenSsl.name().to_string(),
                    reason: format!(
                        "salt must be {} bytes, got {}",
                        OPENSSL_SALT_WORDS * 4,
                        salt.sig_bytes()
                    ),
                });
            }
            let mut data = WordArray::from(SALTED_MAGIC.to_vec());
            data.concat(salt).concat(&params.ciphertext);
            data
        }
        _ => params.ciphertext.clone(),
    };
    Ok(Encoding::Base64.stringify(&data)?)
}

fn parse_openssl(input: &str) -> Result<CipherParams> {
    let data = Encoding::Base64.parse(input)?;
    let words = data.words();

    if data.sig_bytes() >= 8 && words[..2] == SALTED_MAGIC {
        let header_bytes = (2 + OPENSSL_SALT_WORDS) * 4;
        if data.sig_bytes() < header_bytes {
            return Err(CoreError::InvalidFormat {
                format: Format::OpenSsl.name().to_string(),
                reason: format!(
                    "salted header needs {} bytes, got {}",
                    header_bytes,
                    data.sig_bytes()
                ),
            });
        }
        debug!("detected salted OpenSSL envelope");
        let bytes = data.to_bytes();
        return Ok(CipherParams {
            ciphertext: WordArray::from_bytes(&bytes[header_bytes..]),
            salt: Some(data.slice_words(2, OPENSSL_SALT_WORDS)),
            ..CipherParams::default()
        });
    }

    Ok(CipherParams::new(data))
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonEnvelope {
    ct: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<String>,
}

fn stringify_json(params: &CipherParams) -> Result<String> {
    let envelope = JsonEnvelope {
        ct: Encoding::Base64.stringify(&params.ciphertext)?,
        iv: params.iv.as_ref().map(WordArray::to_hex),
        s: params.salt.as_ref().map(WordArray::to_hex),
    };
    Ok(serde_json::to_string(&envelope)?)
}

fn parse_json(input: &str) -> Result<CipherParams> {
    let envelope: JsonEnvelope = serde_json::from_str(input)?;
    let hex = |field: Option<String>| -> Result<Option<WordArray>> {
        Ok(match field {
            Some(text) => Some(Encoding::Hex.parse(&text)?),
            None => None,
        })
    };

    Ok(CipherParams {
        ciphertext: Encoding::Base64.parse(&envelope.ct)?,
        iv: hex(envelope.iv)?,
        salt: hex(envelope.s)?,
        ..CipherParams::default()
    })
}
