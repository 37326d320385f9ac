//! Cipher parameters: ciphertext bundled with what is needed to decrypt it.

use ck_crypto::cipher::CipherAlgorithm;
use ck_crypto::mode::Mode;
use ck_crypto::padding::Padding;
use ck_crypto::word_array::WordArray;

use crate::error::Result;
use crate::format::Format;

/// Ciphertext plus the optional metadata that travels with it.
///
/// Produced by the serializable and password-based ciphers and consumed by
/// their `decrypt` functions and by [`Format::stringify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherParams {
    /// The raw ciphertext.
    pub ciphertext: WordArray,
    /// Key used to encrypt.
    pub key: Option<WordArray>,
    /// IV used to encrypt.
    pub iv: Option<WordArray>,
    /// KDF salt, present for password-based encryption.
    pub salt: Option<WordArray>,
    /// Cipher that produced the ciphertext.
    pub algorithm: Option<CipherAlgorithm>,
    /// Chaining mode.
    pub mode: Option<Mode>,
    /// Padding scheme.
    pub padding: Option<Padding>,
    /// Cipher block size in words.
    pub block_size_words: Option<usize>,
    /// Preferred serialization format.
    pub format: Option<Format>,
}

impl CipherParams {
    /// Parameters holding only `ciphertext`.
    pub fn new(ciphertext: WordArray) -> Self {
        Self {
            ciphertext,
            ..Self::default()
        }
    }

    /// Copies every field that is set in `other` over this one.
    ///
    /// An empty ciphertext in `other` leaves the current ciphertext alone.
    pub fn mix_in(&mut self, other: CipherParams) -> &mut Self {
        if !other.ciphertext.is_empty() {
            self.ciphertext = other.ciphertext;
        }
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(key, iv, salt, algorithm, mode, padding, block_size_words, format);
        self
    }

    /// Serializes with `format`, falling back to the stored format and then
    /// to OpenSSL.
    pub fn stringify(&self, format: Option<Format>) -> Result<String> {
        format.or(self.format).unwrap_or_default().stringify(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_in_overrides_set_fields() {
        let mut params = CipherParams {
            ciphertext: WordArray::from("ct"),
            iv: Some(WordArray::from("old iv")),
            mode: Some(Mode::Cbc),
            ..CipherParams::default()
        };
        params.mix_in(CipherParams {
            iv: Some(WordArray::from("new iv")),
            salt: Some(WordArray::from("salt")),
            ..CipherParams::default()
        });

        assert_eq!(params.ciphertext, WordArray::from("ct"));
        assert_eq!(params.iv, Some(WordArray::from("new iv")));
        assert_eq!(params.salt, Some(WordArray::from("salt")));
        assert_eq!(params.mode, Some(Mode::Cbc));
    }

    #[test]
    fn test_mix_in_replaces_ciphertext() {
        let mut params = CipherParams::new(WordArray::from("a"));
        params.mix_in(CipherParams::new(WordArray::from("b")));
        assert_eq!(params.ciphertext, WordArray::from("b"));
    }

    #[test]
    fn test_stringify_defaults_to_openssl() {
        let params = CipherParams::new(WordArray::from_bytes(&[0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(params.stringify(None).unwrap(), "3q2+7w==");
    }
}
