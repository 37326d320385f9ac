//! Password-based encryption compatible with `openssl enc`.
//!
//! A key and IV are derived from the password and a salt, the message is
//! encrypted with the serializable cipher, and the salt travels with the
//! ciphertext so the recipient can repeat the derivation.

use ck_crypto::cipher::{CipherAlgorithm, CipherConfig};
use ck_crypto::hash::HashAlgorithm;
use ck_crypto::word_array::WordArray;
use tracing::debug;

use crate::error::Result;
use crate::format::Format;
use crate::kdf::{DerivedParams, Kdf};
use crate::params::CipherParams;
use crate::serializable::{self, SerializableConfig};

/// Options for the password-based cipher.
///
/// `cipher.iv` is ignored; the IV always comes from the KDF.
#[derive(Debug, Clone, Default)]
pub struct PasswordConfig {
    /// Mode, padding and RC4 drop options.
    pub cipher: CipherConfig,
    /// Envelope format (default OpenSSL).
    pub format: Format,
    /// Key derivation (default `EVP_BytesToKey` with MD5).
    pub kdf: Kdf,
    /// Fixed salt for encryption. A random one is used when `None`.
    pub salt: Option<WordArray>,
    /// Digest override for the OpenSSL KDF.
    pub hasher: Option<HashAlgorithm>,
}

impl PasswordConfig {
    fn derive<P: Into<WordArray>>(
        &self,
        algorithm: CipherAlgorithm,
        password: P,
        salt: Option<WordArray>,
    ) -> Result<(DerivedParams, SerializableConfig)> {
        let derived = self.kdf.execute(
            password,
            algorithm.key_size_words(),
            algorithm.iv_size_words(),
            salt,
            self.hasher,
        )?;

        let mut cipher = self.cipher.clone();
        cipher.iv = (!derived.iv.is_empty()).then(|| derived.iv.clone());
        let config = SerializableConfig {
            cipher,
            format: self.format,
        };
        Ok((derived, config))
    }
}

/// Encrypts `message` under a key derived from `password`.
///
/// # Arguments
///
/// * `algorithm` - The cipher; its default key size is used
/// * `message` - Plaintext
/// * `password` - The password
/// * `config` - KDF, salt, format and cipher options
///
/// # Returns
///
/// Cipher params carrying ciphertext, derived key and IV, and the salt
///
/// # Examples
///
/// ```
/// use ck_core::password::{decrypt_str, encrypt, PasswordConfig};
/// use ck_crypto::cipher::CipherAlgorithm;
///
/// let config = PasswordConfig::default();
/// let params = encrypt(CipherAlgorithm::Aes, "Message", "Secret Passphrase", &config).unwrap();
/// let text = params.stringify(None).unwrap();
/// assert!(text.starts_with("U2FsdGVkX1"));
///
/// let plain = decrypt_str(CipherAlgorithm::Aes, &text, "Secret Passphrase", &config).unwrap();
/// assert_eq!(plain.to_bytes(), b"Message");
/// ```
pub fn encrypt<M, P>(
    algorithm: CipherAlgorithm,
    message: M,
    password: P,
    config: &PasswordConfig,
) -> Result<CipherParams>
where
    M: Into<WordArray>,
    P: Into<WordArray>,
{
    let (derived, cipher_config) = config.derive(algorithm, password, config.salt.clone())?;
    let mut params = serializable::encrypt(algorithm, message, &derived.key, &cipher_config)?;
    params.mix_in(derived.into());
    debug!("password-encrypted message with {} ({} KDF)", algorithm, config.kdf);
    Ok(params)
}

/// Decrypts params produced by [`encrypt`].
///
/// The salt is taken from `params`; when it has none an empty salt is used,
/// matching `openssl enc -nosalt`.
///
/// # Errors
///
/// Cipher errors such as unremovable padding, which usually means the
/// password is wrong.
pub fn decrypt<P: Into<WordArray>>(
    algorithm: CipherAlgorithm,
    params: &CipherParams,
    password: P,
    config: &PasswordConfig,
) -> Result<WordArray> {
    let salt = params.salt.clone().unwrap_or_default();
    let (derived, cipher_config) = config.derive(algorithm, password, Some(salt))?;
    serializable::decrypt(algorithm, params, &derived.key, &cipher_config)
}

/// Parses `input` with `config.format` and decrypts it.
///
/// # Errors
///
/// Format errors from [`Format::parse`] and cipher errors from [`decrypt`].
pub fn decrypt_str<P: Into<WordArray>>(
    algorithm: CipherAlgorithm,
    input: &str,
    password: P,
    config: &PasswordConfig,
) -> Result<WordArray> {
    let params = config.format.parse(input)?;
    decrypt(algorithm, &params, password, config)
}
