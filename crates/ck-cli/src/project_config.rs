//! Project defaults from `.ck.yaml` files.
//!
//! A `.ck.yaml` file in the working directory or any parent sets default
//! algorithm names for the `ck` commands. Command-line flags win over the file.

use anyhow::{Context, Result};
use ck_core::format::Format;
use ck_core::kdf::Kdf;
use ck_crypto::cipher::CipherAlgorithm;
use ck_crypto::hash::HashAlgorithm;
use ck_crypto::mode::Mode;
use ck_crypto::padding::Padding;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// File name searched for by [`ProjectConfig::discover`].
pub const CONFIG_FILE_NAME: &str = ".ck.yaml";

/// Project configuration from a `.ck.yaml` file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Default cipher (aes, des, triple-des, rc4, rc4-drop)
    pub cipher: Option<String>,
    /// Default chaining mode (cbc, cfb, ofb, ctr, ctr-gladman, ecb)
    pub mode: Option<String>,
    /// Default padding (pkcs7, ansi-x923, iso10126, iso97971, zero, none)
    pub padding: Option<String>,
    /// Default envelope format (openssl, json)
    pub format: Option<String>,
    /// Default password KDF (openssl, pbkdf2)
    pub kdf: Option<String>,
    /// Default digest for hash, hmac and pbkdf2
    pub hasher: Option<String>,
    /// Default PBKDF2 iteration count
    pub iterations: Option<u32>,
}

impl ProjectConfig {
    /// Discovers and loads configuration by walking up from the current
    /// working directory.
    ///
    /// # Returns
    ///
    /// The nearest `.ck.yaml`, or an empty configuration if there is none.
    pub fn discover() -> Result<Self> {
        let current_dir = env::current_dir().context("Failed to get current working directory")?;

        Self::discover_from_path(&current_dir)
    }

    /// Discovers and loads configuration starting from `start_path`.
    ///
    /// # Arguments
    ///
    /// * `start_path` - The directory to start searching from
    pub fn discover_from_path(start_path: &Path) -> Result<Self> {
        let mut current_path = start_path.to_path_buf();

        loop {
            let config_path = current_path.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                tracing::debug!("Found {} at: {}", CONFIG_FILE_NAME, config_path.display());
                return Self::load_from_file(&config_path);
            }

            if let Some(parent) = current_path.parent() {
                current_path = parent.to_path_buf();
            } else {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(Self::default());
            }
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or names an
    /// unknown algorithm.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ProjectConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::info!("Loaded project config from: {}", path.display());
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved project config to: {}", path.display());
        Ok(())
    }

    /// Checks that every configured name parses.
    pub fn validate(&self) -> Result<()> {
        self.cipher()?;
        self.mode()?;
        self.padding()?;
        self.format()?;
        self.kdf()?;
        self.hasher()?;
        if self.iterations == Some(0) {
            anyhow::bail!("Iteration count must be at least 1");
        }
        Ok(())
    }

    /// Returns `overrides` layered on top of this configuration.
    ///
    /// Values set in `overrides` take precedence.
    pub fn with_overrides(&self, overrides: &ProjectConfig) -> Self {
        fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }
        Self {
            cipher: pick(&overrides.cipher, &self.cipher),
            mode: pick(&overrides.mode, &self.mode),
            padding: pick(&overrides.padding, &self.padding),
            format: pick(&overrides.format, &self.format),
            kdf: pick(&overrides.kdf, &self.kdf),
            hasher: pick(&overrides.hasher, &self.hasher),
            iterations: pick(&overrides.iterations, &self.iterations),
        }
    }

    /// Configured cipher, AES by default.
    pub fn cipher(&self) -> Result<CipherAlgorithm> {
        parse_or_default(&self.cipher)
    }

    /// Configured chaining mode, CBC by default.
    pub fn mode(&self) -> Result<Mode> {
        parse_or_default(&self.mode)
    }

    /// Configured padding, PKCS#7 by default.
    pub fn padding(&self) -> Result<Padding> {
        parse_or_default(&self.padding)
    }

    /// Configured envelope format, OpenSSL by default.
    pub fn format(&self) -> Result<Format> {
        parse_or_default(&self.format)
    }

    /// Configured digest, SHA-256 by default.
    pub fn hasher(&self) -> Result<HashAlgorithm> {
        parse_or_default(&self.hasher)
    }

    /// Configured password KDF.
    ///
    /// `pbkdf2` picks up `hasher` and `iterations` when they are set.
    pub fn kdf(&self) -> Result<Kdf> {
        let kdf: Kdf = parse_or_default(&self.kdf)?;
        Ok(match kdf {
            Kdf::OpenSsl => Kdf::OpenSsl,
            Kdf::Pbkdf2 { iterations, hasher } => Kdf::Pbkdf2 {
                iterations: self.iterations.unwrap_or(iterations),
                hasher: match &self.hasher {
                    Some(_) => self.hasher()?,
                    None => hasher,
                },
            },
        })
    }

    /// Checks if no values are set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A sample configuration for documentation purposes.
    pub fn sample() -> Self {
        Self {
            cipher: Some("aes".to_string()),
            mode: Some("cbc".to_string()),
            padding: Some("pkcs7".to_string()),
            format: Some("openssl".to_string()),
            kdf: Some("pbkdf2".to_string()),
            hasher: Some("sha256".to_string()),
            iterations: Some(10_000),
        }
    }
}

fn parse_or_default<T>(value: &Option<String>) -> Result<T>
where
    T: std::str::FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(name) => Ok(name.parse()?),
        None => Ok(T::default()),
    }
}
