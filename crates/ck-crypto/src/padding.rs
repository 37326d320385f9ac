//! Block padding schemes.
//!
//! Unpadding never rejects ambiguous padding: bytes that merely look wrong
//! are stripped according to the scheme's rule. An error is only raised when
//! the padding cannot be removed at all, for example a PKCS#7 count larger
//! than the data.

use std::fmt;
use std::str::FromStr;

use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

/// Padding applied to the last block of a block-cipher message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Padding {
    /// PKCS#5/PKCS#7: every pad byte holds the pad length.
    #[default]
    Pkcs7,
    /// ANSI X9.23: zero fill, last byte holds the pad length.
    AnsiX923,
    /// ISO 10126: random fill, last byte holds the pad length.
    Iso10126,
    /// ISO/IEC 9797-1 method 2: a `0x80` marker followed by zero fill.
    Iso97971,
    /// Zero fill up to the block boundary; nothing is added to aligned data.
    ZeroPadding,
    /// No padding; the caller guarantees block-aligned input.
    NoPadding,
}

impl Padding {
    /// Every padding scheme.
    pub const ALL: [Padding; 6] = [
        Self::Pkcs7,
        Self::AnsiX923,
        Self::Iso10126,
        Self::Iso97971,
        Self::ZeroPadding,
        Self::NoPadding,
    ];

    /// Kebab-case name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pkcs7 => "pkcs7",
            Self::AnsiX923 => "ansi-x923",
            Self::Iso10126 => "iso10126",
            Self::Iso97971 => "iso97971",
            Self::ZeroPadding => "zero",
            Self::NoPadding => "none",
        }
    }

    /// Pads `data` to a multiple of `block_size_words` words.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::CsprngUnavailable` if ISO 10126 cannot draw its
    /// random fill.
    pub fn pad(self, data: &mut WordArray, block_size_words: usize) -> Result<()> {
        let block_bytes = block_size_words * 4;
        let count = block_bytes - data.sig_bytes() % block_bytes;

        match self {
            Self::Pkcs7 => {
                data.concat(&WordArray::from_bytes(&vec![count as u8; count]));
            }
            Self::AnsiX923 => {
                let mut fill = vec![0u8; count];
                fill[count - 1] = count as u8;
                data.concat(&WordArray::from_bytes(&fill));
            }
            Self::Iso10126 => {
                data.concat(&WordArray::random(count - 1)?);
                data.concat(&WordArray::from_bytes(&[count as u8]));
            }
            Self::Iso97971 => {
                data.concat(&WordArray::from_bytes(&[0x80]));
                Self::ZeroPadding.pad(data, block_size_words)?;
            }
            Self::ZeroPadding => {
                let len = data.sig_bytes();
                let rem = len % block_bytes;
                data.clamp();
                if rem != 0 {
                    data.set_sig_bytes(len + block_bytes - rem);
                }
            }
            Self::NoPadding => {}
        }
        Ok(())
    }

    /// Strips padding added by [`pad`](Padding::pad).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::UnpaddingAmbiguity` when the padding is
    /// structurally impossible to remove.
    pub fn unpad(self, data: &mut WordArray) -> Result<()> {
        match self {
            Self::Pkcs7 | Self::AnsiX923 | Self::Iso10126 => {
                let len = data.sig_bytes();
                if len == 0 {
                    return Err(CryptoError::UnpaddingAmbiguity {
                        scheme: self.name(),
                        reason: "no data to unpad".to_string(),
                    });
                }
                let count = usize::from(data.byte(len - 1));
                if count > len {
                    return Err(CryptoError::UnpaddingAmbiguity {
                        scheme: self.name(),
                        reason: format!("pad length {count} exceeds data length {len}"),
                    });
                }
                data.truncate(len - count);
            }
            Self::Iso97971 => {
                Self::ZeroPadding.unpad(data)?;
                let len = data.sig_bytes();
                if len == 0 || data.byte(len - 1) != 0x80 {
                    return Err(CryptoError::UnpaddingAmbiguity {
                        scheme: self.name(),
                        reason: "0x80 marker not found".to_string(),
                    });
                }
                data.truncate(len - 1);
            }
            Self::ZeroPadding => {
                let mut len = data.sig_bytes();
                while len > 0 && data.byte(len - 1) == 0 {
                    len -= 1;
                }
                data.truncate(len);
            }
            Self::NoPadding => {}
        }
        Ok(())
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Padding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "pkcs7" | "pkcs5" => Ok(Self::Pkcs7),
            "ansi-x923" | "ansix923" => Ok(Self::AnsiX923),
            "iso10126" | "iso-10126" => Ok(Self::Iso10126),
            "iso97971" | "iso-97971" | "iso9797-1" => Ok(Self::Iso97971),
            "zero" | "zero-padding" => Ok(Self::ZeroPadding),
            "none" | "no-padding" => Ok(Self::NoPadding),
            _ => Err(CryptoError::UnknownAlgorithm {
                kind: "padding",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(padding: Padding, data: &[u8]) -> Vec<u8> {
        let mut wa = WordArray::from_bytes(data);
        padding.pad(&mut wa, 4).unwrap();
        wa.to_bytes()
    }

    #[test]
    fn test_pkcs7_layout() {
        assert_eq!(padded(Padding::Pkcs7, b"YELLOW SUBMARINE")[16..], [16u8; 16]);
        let out = padded(Padding::Pkcs7, b"abc");
        assert_eq!(out.len(), 16);
        assert_eq!(out[3..], [13u8; 13]);
    }

    #[test]
    fn test_ansi_x923_layout() {
        let out = padded(Padding::AnsiX923, b"abcde");
        assert_eq!(out[5..15], [0u8; 10]);
        assert_eq!(out[15], 11);
    }

    #[test]
    fn test_iso10126_layout() {
        let out = padded(Padding::Iso10126, b"abcde");
        assert_eq!(out.len(), 16);
        assert_eq!(out[15], 11);
    }

    #[test]
    fn test_iso97971_layout() {
        let out = padded(Padding::Iso97971, b"abc");
        assert_eq!(out[3], 0x80);
        assert_eq!(out[4..], [0u8; 12]);
        assert_eq!(padded(Padding::Iso97971, &[1u8; 16]).len(), 32);
    }

    #[test]
    fn test_zero_padding_aligned_adds_nothing() {
        assert_eq!(padded(Padding::ZeroPadding, &[7u8; 16]), vec![7u8; 16]);
        assert_eq!(padded(Padding::ZeroPadding, b"abc").len(), 16);
    }

    #[test]
    fn test_zero_padding_loses_trailing_zeros() {
        let message = [0x41, 0x42, 0x00, 0x00];
        let mut wa = WordArray::from_bytes(&message);
        Padding::ZeroPadding.pad(&mut wa, 4).unwrap();
        Padding::ZeroPadding.unpad(&mut wa).unwrap();
        assert_eq!(wa.to_bytes(), vec![0x41, 0x42]);

        // The marker scheme keeps them
        let mut wa = WordArray::from_bytes(&message);
        Padding::Iso97971.pad(&mut wa, 4).unwrap();
        Padding::Iso97971.unpad(&mut wa).unwrap();
        assert_eq!(wa.to_bytes(), message.to_vec());
    }

    #[test]
    fn test_round_trip_all_schemes() {
        for padding in Padding::ALL {
            for len in [0usize, 1, 15, 16, 17, 31] {
                if padding == Padding::NoPadding && len % 16 != 0 {
                    continue;
                }
                let message: Vec<u8> = (1..=len as u8).collect();
                let mut wa = WordArray::from_bytes(&message);
                padding.pad(&mut wa, 4).unwrap();
                assert_eq!(wa.sig_bytes() % 16, 0, "{padding} len {len}");
                padding.unpad(&mut wa).unwrap();
                assert_eq!(wa.to_bytes(), message, "{padding} len {len}");
            }
        }
    }

    #[test]
    fn test_pkcs7_oversized_count_rejected() {
        let mut wa = WordArray::from_bytes(&[1, 2, 0x20]);
        assert!(matches!(
            Padding::Pkcs7.unpad(&mut wa),
            Err(CryptoError::UnpaddingAmbiguity { scheme: "pkcs7", .. })
        ));
    }

    #[test]
    fn test_pkcs7_inconsistent_bytes_degrade() {
        // Pad bytes are not all equal; only the count is honoured
        let mut wa = WordArray::from_bytes(&[b'a', b'b', 9, 3]);
        Padding::Pkcs7.unpad(&mut wa).unwrap();
        assert_eq!(wa.to_bytes(), b"a");
    }

    #[test]
    fn test_iso97971_missing_marker_rejected() {
        let mut wa = WordArray::from_bytes(&[1, 2, 0, 0]);
        assert!(Padding::Iso97971.unpad(&mut wa).is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for padding in Padding::ALL {
            assert_eq!(padding.name().parse::<Padding>().unwrap(), padding);
        }
        assert_eq!("Pkcs5".parse::<Padding>().unwrap(), Padding::Pkcs7);
    }
}
