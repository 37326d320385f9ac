//! Command implementations behind the `ck` binary.
//!
//! Each command takes already-resolved options and returns its output, so
//! the binary only deals with argument parsing and I/O.

use crate::project_config::{ProjectConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use ck_core::format::Format;
use ck_core::kdf::Kdf;
use ck_core::password::{self, PasswordConfig};
use ck_core::serializable::{self, SerializableConfig};
use ck_crypto::cipher::{CipherAlgorithm, CipherConfig};
use ck_crypto::encoding::Encoding;
use ck_crypto::hash::{self, HashAlgorithm};
use ck_crypto::hmac;
use ck_crypto::kdf::{pbkdf2, Pbkdf2Config};
use ck_crypto::word_array::WordArray;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reads command input from inline text, a file, or stdin, in that order.
pub fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(text) = text {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(path) = file {
        return fs::read(path).with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

/// Digests `data` and renders the digest with `encoding`.
pub fn hash_command(algorithm: HashAlgorithm, data: &[u8], encoding: Encoding) -> Result<String> {
    let digest = hash::hash(algorithm, data).context("Failed to hash input")?;
    Ok(encoding.stringify(&digest)?)
}

/// Computes an HMAC tag of `data` and renders it with `encoding`.
pub fn hmac_command(
    algorithm: HashAlgorithm,
    key: &[u8],
    data: &[u8],
    encoding: Encoding,
) -> Result<String> {
    let tag = hmac::hmac(algorithm, key, data).context("Failed to compute HMAC")?;
    Ok(encoding.stringify(&tag)?)
}

/// Derives a PBKDF2 key and renders it as hex.
pub fn pbkdf2_command(password: &str, salt: &WordArray, config: &Pbkdf2Config) -> Result<String> {
    let key = pbkdf2(password, salt, config).context("Failed to derive key")?;
    Ok(key.to_hex())
}

/// Writes a sample `.ck.yaml` into `dir` and returns its path.
///
/// An existing file is only replaced when `force` is set.
pub fn init_command(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to replace it)", path.display());
    }
    ProjectConfig::sample().save_to_file(&path)?;
    Ok(path)
}

/// Bytes in a password-mode salt, as written after the `Salted__` header.
pub const SALT_BYTES: usize = 8;

/// Parses a hex `--salt` for password-mode encryption.
///
/// Only 8-byte salts fit the OpenSSL envelope, so anything else is refused
/// here instead of producing output that cannot be decrypted.
pub fn parse_salt(text: &str) -> Result<WordArray> {
    let salt = Encoding::Hex.parse(text).context("Salt is not valid hex")?;
    if salt.sig_bytes() != SALT_BYTES {
        anyhow::bail!("Salt must be {} bytes, got {}", SALT_BYTES, salt.sig_bytes());
    }
    Ok(salt)
}

/// How the cipher key is obtained.
#[derive(Debug, Clone)]
pub enum Secret {
    /// Derive key and IV from a password.
    Password(String),
    /// Use a raw key and optional IV.
    Key {
        /// Cipher key.
        key: WordArray,
        /// Initialization vector.
        iv: Option<WordArray>,
    },
}

/// Resolved options for `encrypt` and `decrypt`.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeOptions {
    /// The cipher.
    pub algorithm: CipherAlgorithm,
    /// Mode, padding and RC4 drop.
    pub cipher: CipherConfig,
    /// Envelope format.
    pub format: Format,
    /// Password KDF.
    pub kdf: Kdf,
    /// Fixed salt for password encryption.
    pub salt: Option<WordArray>,
    /// Digest override for the OpenSSL KDF.
    pub hasher: Option<HashAlgorithm>,
}

impl EnvelopeOptions {
    fn password_config(&self) -> PasswordConfig {
        PasswordConfig {
            cipher: self.cipher.clone(),
            format: self.format,
            kdf: self.kdf,
            salt: self.salt.clone(),
            hasher: self.hasher,
        }
    }

    fn serializable_config(&self, iv: &Option<WordArray>) -> SerializableConfig {
        SerializableConfig {
            cipher: CipherConfig {
                iv: iv.clone(),
                ..self.cipher.clone()
            },
            format: self.format,
        }
    }
}

/// Encrypts `data` and returns the serialized envelope.
pub fn encrypt_command(data: &[u8], secret: &Secret, options: &EnvelopeOptions) -> Result<String> {
    let params = match secret {
        Secret::Password(passphrase) => password::encrypt(
            options.algorithm,
            data,
            passphrase.as_str(),
            &options.password_config(),
        ),
        Secret::Key { key, iv } => serializable::encrypt(
            options.algorithm,
            data,
            key,
            &options.serializable_config(iv),
        ),
    }
    .context("Failed to encrypt")?;

    Ok(params.stringify(Some(options.format))?)
}

/// Parses and decrypts a serialized envelope.
pub fn decrypt_command(envelope: &str, secret: &Secret, options: &EnvelopeOptions) -> Result<Vec<u8>> {
    let envelope = envelope.trim();
    let plaintext = match secret {
        Secret::Password(passphrase) => password::decrypt_str(
            options.algorithm,
            envelope,
            passphrase.as_str(),
            &options.password_config(),
        ),
        Secret::Key { key, iv } => serializable::decrypt_str(
            options.algorithm,
            envelope,
            key,
            &options.serializable_config(iv),
        ),
    }
    .context("Failed to decrypt")?;

    Ok(plaintext.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_crypto::mode::Mode;

    #[test]
    fn test_hash_command() {
        let out = hash_command(HashAlgorithm::Md5, b"abc", Encoding::Hex).unwrap();
        assert_eq!(out, "900150983cd24fb0d6963f7d28e17f72");

        let out = hash_command(HashAlgorithm::Sha1, b"", Encoding::Base64).unwrap();
        assert_eq!(out, "2jmj7l5rSw0yVb/vlWAYkK/YBwk=");
    }

    #[test]
    fn test_hmac_command() {
        let out = hmac_command(
            HashAlgorithm::Md5,
            b"Jefe",
            b"what do ya want for nothing?",
            Encoding::Hex,
        )
        .unwrap();
        assert_eq!(out, "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn test_pbkdf2_command() {
        let config = Pbkdf2Config {
            key_size_words: 5,
            iterations: 2,
            hasher: HashAlgorithm::Sha1,
        };
        let out = pbkdf2_command("password", &WordArray::from("salt"), &config).unwrap();
        assert_eq!(out, "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    }

    #[test]
    fn test_password_round_trip() {
        let secret = Secret::Password("hunter2".to_string());
        for format in Format::ALL {
            let options = EnvelopeOptions {
                format,
                ..EnvelopeOptions::default()
            };
            let envelope = encrypt_command(b"payload", &secret, &options).unwrap();
            let plain = decrypt_command(&format!("{}\n", envelope), &secret, &options).unwrap();
            assert_eq!(plain, b"payload");
        }
    }

    #[test]
    fn test_raw_key_round_trip() {
        let secret = Secret::Key {
            key: WordArray::from_bytes(&[5u8; 16]),
            iv: Some(WordArray::from_bytes(&[6u8; 16])),
        };
        let options = EnvelopeOptions {
            cipher: CipherConfig {
                mode: Mode::Ctr,
                ..CipherConfig::default()
            },
            ..EnvelopeOptions::default()
        };
        let envelope = encrypt_command(b"raw key", &secret, &options).unwrap();
        assert_eq!(decrypt_command(&envelope, &secret, &options).unwrap(), b"raw key");
    }

    #[test]
    fn test_raw_key_without_iv_fails() {
        let secret = Secret::Key {
            key: WordArray::from_bytes(&[5u8; 16]),
            iv: None,
        };
        let err = encrypt_command(b"x", &secret, &EnvelopeOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("initialization vector"));
    }

    #[test]
    fn test_parse_salt_requires_8_bytes() {
        let salt = parse_salt("0011223344556677").unwrap();
        assert_eq!(salt.sig_bytes(), SALT_BYTES);

        for bad in ["", "00112233", "00112233445566778899aabbccddeeff"] {
            let err = parse_salt(bad).unwrap_err();
            assert!(format!("{:#}", err).contains("8 bytes"), "{bad:?}");
        }
        assert!(parse_salt("zz").is_err());
    }

    #[test]
    fn test_init_command_writes_sample() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = init_command(dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));

        let loaded = ProjectConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, ProjectConfig::sample());
        assert!(!loaded.is_empty());
    }

    #[test]
    fn test_init_command_keeps_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "cipher: des\n").unwrap();

        let err = init_command(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "cipher: des\n");

        init_command(dir.path(), true).unwrap();
        assert_eq!(ProjectConfig::load_from_file(&path).unwrap(), ProjectConfig::sample());
    }

    #[test]
    fn test_read_input_prefers_text() {
        let data = read_input(Some("inline"), None).unwrap();
        assert_eq!(data, b"inline");
    }
}
