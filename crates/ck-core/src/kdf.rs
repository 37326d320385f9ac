//! Key and IV derivation for password-based encryption.

use std::fmt;
use std::str::FromStr;

use ck_crypto::hash::HashAlgorithm;
use ck_crypto::kdf::{evp_kdf, pbkdf2, EvpKdfConfig, Pbkdf2Config};
use ck_crypto::word_array::WordArray;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::params::CipherParams;

/// Salt length generated when none is supplied.
pub const SALT_BYTES: usize = 8;

/// Iteration count used by `openssl enc -pbkdf2` when `-iter` is omitted.
pub const OPENSSL_PBKDF2_ITERATIONS: u32 = 10_000;

/// How a password becomes key and IV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kdf {
    /// `EVP_BytesToKey` with one iteration, as in `openssl enc`.
    #[default]
    OpenSsl,
    /// PBKDF2-HMAC, as in `openssl enc -pbkdf2`.
    Pbkdf2 {
        /// Iteration count.
        iterations: u32,
        /// HMAC digest.
        hasher: HashAlgorithm,
    },
}

/// Key material produced by [`Kdf::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedParams {
    /// Cipher key.
    pub key: WordArray,
    /// Initialization vector. Empty for ciphers without one.
    pub iv: WordArray,
    /// Salt used for the derivation.
    pub salt: WordArray,
}

impl From<DerivedParams> for CipherParams {
    fn from(derived: DerivedParams) -> Self {
        Self {
            key: Some(derived.key),
            iv: (!derived.iv.is_empty()).then_some(derived.iv),
            salt: Some(derived.salt),
            ..Self::default()
        }
    }
}

impl Kdf {
    /// PBKDF2 with the `openssl enc -pbkdf2` defaults (SHA-256, 10 000 iterations).
    pub fn pbkdf2() -> Self {
        Self::Pbkdf2 {
            iterations: OPENSSL_PBKDF2_ITERATIONS,
            hasher: HashAlgorithm::Sha256,
        }
    }

    /// Canonical name of this KDF.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenSsl => "openssl",
            Self::Pbkdf2 { .. } => "pbkdf2",
        }
    }

    /// Derives a key and IV from `password`.
    ///
    /// One derivation of `key_size_words + iv_size_words` words is made; the
    /// key is its head and the IV the words that follow.
    ///
    /// # Arguments
    ///
    /// * `password` - The password
    /// * `key_size_words` - Key length in words
    /// * `iv_size_words` - IV length in words (0 for stream ciphers)
    /// * `salt` - The salt; a random 8-byte salt is generated when `None`
    /// * `hasher` - Digest override for the OpenSSL KDF (default MD5)
    ///
    /// # Returns
    ///
    /// The derived key, IV and the salt that was used
    ///
    /// # Examples
    ///
    /// ```
    /// use ck_core::kdf::Kdf;
    /// use ck_crypto::word_array::WordArray;
    ///
    /// let salt = WordArray::from_bytes(&[0u8; 8]);
    /// let derived = Kdf::OpenSsl.execute("pw", 8, 4, Some(salt), None).unwrap();
    /// assert_eq!(derived.key.sig_bytes(), 32);
    /// assert_eq!(derived.iv.sig_bytes(), 16);
    /// ```
    pub fn execute<P: Into<WordArray>>(
        &self,
        password: P,
        key_size_words: usize,
        iv_size_words: usize,
        salt: Option<WordArray>,
        hasher: Option<HashAlgorithm>,
    ) -> Result<DerivedParams> {
        let salt = match salt {
            Some(salt) => salt,
            None => WordArray::random(SALT_BYTES)?,
        };
        let total_words = key_size_words + iv_size_words;
        debug!(
            "deriving {} key words and {} IV words with {} KDF",
            key_size_words,
            iv_size_words,
            self.name()
        );

        let material = match *self {
            Self::OpenSsl => {
                let config = EvpKdfConfig {
                    key_size_words: total_words,
                    hasher: hasher.unwrap_or(HashAlgorithm::Md5),
                    ..EvpKdfConfig::default()
                };
                evp_kdf(password, &salt, &config)?
            }
            Self::Pbkdf2 { iterations, hasher } => {
                let config = Pbkdf2Config {
                    key_size_words: total_words,
                    iterations,
                    hasher,
                };
                pbkdf2(password, &salt, &config)?
            }
        };

        Ok(DerivedParams {
            key: material.slice_words(0, key_size_words),
            iv: material.slice_words(key_size_words, iv_size_words),
            salt,
        })
    }
}

impl fmt::Display for Kdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kdf {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openssl" | "evp" | "evpkdf" => Ok(Self::OpenSsl),
            "pbkdf2" => Ok(Self::pbkdf2()),
            _ => Err(CoreError::UnknownName {
                kind: "kdf",
                name: s.to_string(),
            }),
        }
    }
}
