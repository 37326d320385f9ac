//! Password-based key derivation.
//!
//! Two derivations are provided: PBKDF2 (RFC 8018) over any HMAC digest, and
//! the OpenSSL `EVP_BytesToKey` construction used by `openssl enc` without
//! `-pbkdf2`. Both are pure functions of password, salt and configuration.

use tracing::debug;
use zeroize::Zeroize;

use crate::error::Result;
use crate::hash::{HashAlgorithm, Hasher};
use crate::hmac::Hmac;
use crate::word_array::WordArray;

/// Default PBKDF2 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 250_000;

/// PBKDF2 options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Config {
    /// Output length in 32-bit words (default 4, i.e. 128 bits).
    pub key_size_words: usize,
    /// Iteration count (default 250 000). Zero is treated as one.
    pub iterations: u32,
    /// HMAC digest (default SHA-256).
    pub hasher: HashAlgorithm,
}

impl Default for Pbkdf2Config {
    fn default() -> Self {
        Self {
            key_size_words: 4,
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            hasher: HashAlgorithm::Sha256,
        }
    }
}

/// `EVP_BytesToKey` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvpKdfConfig {
    /// Output length in 32-bit words (default 4).
    pub key_size_words: usize,
    /// Hash rounds per output block (default 1). Zero is treated as one.
    pub iterations: u32,
    /// Digest (default MD5, as used by OpenSSL).
    pub hasher: HashAlgorithm,
}

impl Default for EvpKdfConfig {
    fn default() -> Self {
        Self {
            key_size_words: 4,
            iterations: 1,
            hasher: HashAlgorithm::Md5,
        }
    }
}

/// Derives a key with PBKDF2-HMAC.
///
/// # Arguments
///
/// * `password` - The password; strings are taken as UTF-8
/// * `salt` - The salt
/// * `config` - Output size, iteration count and digest
///
/// # Returns
///
/// Exactly `config.key_size_words * 4` bytes of key material
///
/// # Examples
///
/// ```
/// use ck_crypto::hash::HashAlgorithm;
/// use ck_crypto::kdf::{pbkdf2, Pbkdf2Config};
///
/// let config = Pbkdf2Config { key_size_words: 5, iterations: 2, hasher: HashAlgorithm::Sha1 };
/// let key = pbkdf2("password", "salt", &config).unwrap();
/// assert_eq!(key.to_hex(), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
/// ```
pub fn pbkdf2<P, S>(password: P, salt: S, config: &Pbkdf2Config) -> Result<WordArray>
where
    P: Into<WordArray>,
    S: Into<WordArray>,
{
    config.hasher.ensure_ready()?;
    debug!(
        "deriving {} words with PBKDF2-{} ({} iterations)",
        config.key_size_words, config.hasher, config.iterations
    );

    let mut password = password.into();
    let mut mac = Hmac::unchecked(config.hasher, &password);
    password.zeroize();
    let salt = salt.into();

    let mut derived = WordArray::new();
    let mut block_index: u32 = 1;
    while derived.words().len() < config.key_size_words {
        let mut first = salt.clone();
        first.concat(&WordArray::from(vec![block_index]));

        let mut block = mac.compute(&first);
        let mut intermediate = block.clone();
        for _ in 1..config.iterations {
            intermediate = mac.compute(&intermediate);
            for (word, other) in block.words_mut().iter_mut().zip(intermediate.words()) {
                *word ^= other;
            }
        }

        derived.concat(&block);
        block_index = block_index.wrapping_add(1);
    }

    derived.set_sig_bytes(config.key_size_words * 4);
    derived.clamp();
    Ok(derived)
}

/// Derives key material with OpenSSL's `EVP_BytesToKey`.
///
/// Each output block is `H(previous block ++ password ++ salt)` rehashed
/// `iterations - 1` more times.
///
/// # Examples
///
/// ```
/// use ck_crypto::kdf::{evp_kdf, EvpKdfConfig};
///
/// let key = evp_kdf("password", "saltsalt", &EvpKdfConfig::default()).unwrap();
/// assert_eq!(key.sig_bytes(), 16);
/// ```
pub fn evp_kdf<P, S>(password: P, salt: S, config: &EvpKdfConfig) -> Result<WordArray>
where
    P: Into<WordArray>,
    S: Into<WordArray>,
{
    config.hasher.ensure_ready()?;
    debug!(
        "deriving {} words with EvpKDF-{} ({} iterations)",
        config.key_size_words, config.hasher, config.iterations
    );

    let mut password = password.into();
    let salt = salt.into();
    let mut hasher = Hasher::unchecked(config.hasher);

    let mut derived = WordArray::new();
    let mut block: Option<WordArray> = None;
    while derived.words().len() < config.key_size_words {
        if let Some(previous) = &block {
            hasher.absorb(previous);
        }
        hasher.absorb(&password);
        hasher.absorb(&salt);
        let mut current = hasher.finish();
        hasher.reset();

        for _ in 1..config.iterations {
            hasher.absorb(&current);
            current = hasher.finish();
            hasher.reset();
        }

        derived.concat(&current);
        block = Some(current);
    }
    password.zeroize();

    derived.set_sig_bytes(config.key_size_words * 4);
    derived.clamp();
    Ok(derived)
}
