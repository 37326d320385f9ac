//! Cipher wrapper that returns ciphertext as serializable params.

use ck_crypto::cipher::{self, CipherAlgorithm, CipherConfig};
use ck_crypto::word_array::WordArray;
use tracing::debug;

use crate::error::Result;
use crate::format::Format;
use crate::params::CipherParams;

/// Options for the serializable cipher.
#[derive(Debug, Clone, Default)]
pub struct SerializableConfig {
    /// Options passed to the underlying cipher.
    pub cipher: CipherConfig,
    /// Envelope format used when decrypting from text and recorded on the
    /// returned params.
    pub format: Format,
}

/// Encrypts `message` with a raw key.
///
/// # Arguments
///
/// * `algorithm` - The cipher
/// * `message` - Plaintext
/// * `key` - Cipher key
/// * `config` - Cipher options and envelope format
///
/// # Returns
///
/// Cipher params holding the ciphertext, key, IV and cipher settings
///
/// # Examples
///
/// ```
/// use ck_core::serializable::{encrypt, SerializableConfig};
/// use ck_crypto::cipher::{CipherAlgorithm, CipherConfig};
/// use ck_crypto::word_array::WordArray;
///
/// let key = WordArray::from_bytes(&[1u8; 32]);
/// let config = SerializableConfig {
///     cipher: CipherConfig::with_iv(WordArray::from_bytes(&[2u8; 16])),
///     ..SerializableConfig::default()
/// };
/// let params = encrypt(CipherAlgorithm::Aes, "hi", &key, &config).unwrap();
/// assert_eq!(params.ciphertext.sig_bytes(), 16);
/// ```
pub fn encrypt<M: Into<WordArray>>(
    algorithm: CipherAlgorithm,
    message: M,
    key: &WordArray,
    config: &SerializableConfig,
) -> Result<CipherParams> {
    let ciphertext = cipher::encrypt(algorithm, message, key, config.cipher.clone())?;
    debug!(
        "encrypted {} bytes with {}",
        ciphertext.sig_bytes(),
        algorithm
    );

    Ok(CipherParams {
        ciphertext,
        key: Some(key.clone()),
        iv: config.cipher.iv.clone(),
        salt: None,
        algorithm: Some(algorithm),
        mode: Some(config.cipher.mode),
        padding: Some(config.cipher.padding),
        block_size_words: Some(algorithm.block_size_words()),
        format: Some(config.format),
    })
}

/// Decrypts cipher params with a raw key.
///
/// Only `params.ciphertext` is read; IV, mode and padding come from `config`.
///
/// # Errors
///
/// Any error from the underlying cipher, e.g. a wrong key length or
/// unremovable padding.
pub fn decrypt(
    algorithm: CipherAlgorithm,
    params: &CipherParams,
    key: &WordArray,
    config: &SerializableConfig,
) -> Result<WordArray> {
    Ok(cipher::decrypt(
        algorithm,
        &params.ciphertext,
        key,
        config.cipher.clone(),
    )?)
}

/// Parses `input` with `config.format` and decrypts it.
///
/// # Errors
///
/// Format errors from [`Format::parse`] and cipher errors from [`decrypt`].
pub fn decrypt_str(
    algorithm: CipherAlgorithm,
    input: &str,
    key: &WordArray,
    config: &SerializableConfig,
) -> Result<WordArray> {
    let params = config.format.parse(input)?;
    decrypt(algorithm, &params, key, config)
}
