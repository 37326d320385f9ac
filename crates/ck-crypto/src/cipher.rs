//! Streaming symmetric encryption and decryption.
//!
//! A [`Cipher`] couples a keyed numeric core with the shared
//! [`BlockProcessor`]. Block ciphers run every released block through a
//! chaining [`Mode`]; stream ciphers XOR keystream directly. Padding is added
//! by the encryptor and stripped by the decryptor at `finalize`, which is why
//! block-cipher decryptors always hold one complete block back until then.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::buffered::BlockProcessor;
use crate::core::aes::AesCore;
use crate::core::des::{DesCore, TripleDesCore};
use crate::core::rc4::Rc4Core;
use crate::core::{BlockCipherCore, StreamCipherCore};
use crate::error::{CryptoError, Result};
use crate::mode::{BlockMode, Mode};
use crate::padding::Padding;
use crate::ready::{ensure_ready, CoreFamily};
use crate::word_array::WordArray;

/// Default number of keystream words RC4-Drop discards (768 bytes).
pub const DEFAULT_RC4_DROP_WORDS: usize = 192;

/// Whether a cipher instance encrypts or decrypts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Plaintext in, ciphertext out.
    Encrypt,
    /// Ciphertext in, plaintext out.
    Decrypt,
}

/// Supported symmetric ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherAlgorithm {
    /// AES-128/192/256, chosen by key length.
    #[default]
    Aes,
    /// Single DES.
    Des,
    /// Triple DES (EDE).
    TripleDes,
    /// RC4 stream cipher.
    Rc4,
    /// RC4 with an initial keystream drop.
    Rc4Drop,
}

impl CipherAlgorithm {
    /// Every supported cipher.
    pub const ALL: [CipherAlgorithm; 5] = [
        Self::Aes,
        Self::Des,
        Self::TripleDes,
        Self::Rc4,
        Self::Rc4Drop,
    ];

    /// Kebab-case name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aes => "aes",
            Self::Des => "des",
            Self::TripleDes => "triple-des",
            Self::Rc4 => "rc4",
            Self::Rc4Drop => "rc4-drop",
        }
    }

    /// Default key size in words, used when deriving keys from passwords.
    pub fn key_size_words(self) -> usize {
        match self {
            Self::Aes | Self::Rc4 | Self::Rc4Drop => 8,
            Self::Des => 2,
            Self::TripleDes => 6,
        }
    }

    /// IV size in words; zero for stream ciphers.
    pub fn iv_size_words(self) -> usize {
        match self {
            Self::Aes => 4,
            Self::Des | Self::TripleDes => 2,
            Self::Rc4 | Self::Rc4Drop => 0,
        }
    }

    /// Processing block size in words.
    pub fn block_size_words(self) -> usize {
        match self {
            Self::Aes => 4,
            Self::Des | Self::TripleDes => 2,
            Self::Rc4 | Self::Rc4Drop => 1,
        }
    }

    /// True for stream ciphers, which use neither modes nor padding.
    pub fn is_stream(self) -> bool {
        matches!(self, Self::Rc4 | Self::Rc4Drop)
    }

    /// The numeric core family backing this cipher.
    pub fn family(self) -> CoreFamily {
        match self {
            Self::Aes => CoreFamily::Aes,
            Self::Des | Self::TripleDes => CoreFamily::Des,
            Self::Rc4 | Self::Rc4Drop => CoreFamily::Rc4,
        }
    }

    /// Runs the backing core's self-test if it has not run yet.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::CoreNotReady` if the core failed its self-test.
    pub fn ensure_ready(self) -> Result<()> {
        ensure_ready(self.family())
    }

    fn block_core(self, key: &WordArray) -> Result<Arc<dyn BlockCipherCore>> {
        let core: Arc<dyn BlockCipherCore> = match self {
            Self::Aes => Arc::new(AesCore::new(key)?),
            Self::Des => Arc::new(DesCore::new(key)?),
            Self::TripleDes => Arc::new(TripleDesCore::new(key)?),
            Self::Rc4 | Self::Rc4Drop => {
                return Err(CryptoError::UnknownAlgorithm {
                    kind: "block cipher",
                    name: self.name().to_string(),
                })
            }
        };
        Ok(core)
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "aes" => Ok(Self::Aes),
            "des" => Ok(Self::Des),
            "triple-des" | "tripledes" | "3des" | "des-ede3" => Ok(Self::TripleDes),
            "rc4" => Ok(Self::Rc4),
            "rc4-drop" | "rc4drop" => Ok(Self::Rc4Drop),
            _ => Err(CryptoError::UnknownAlgorithm {
                kind: "cipher",
                name: s.to_string(),
            }),
        }
    }
}

/// Cipher options.
///
/// Stream ciphers ignore `iv`, `mode` and `padding`; block ciphers ignore
/// `drop_words`.
#[derive(Clone, Debug)]
pub struct CipherConfig {
    /// Initialization vector, one block long. Required by every mode but ECB.
    pub iv: Option<WordArray>,
    /// Chaining mode (default CBC).
    pub mode: Mode,
    /// Padding scheme (default PKCS#7).
    pub padding: Padding,
    /// Keystream words discarded by RC4-Drop (default 192).
    pub drop_words: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            iv: None,
            mode: Mode::default(),
            padding: Padding::default(),
            drop_words: DEFAULT_RC4_DROP_WORDS,
        }
    }
}

impl CipherConfig {
    /// Default options with the given IV.
    pub fn with_iv(iv: WordArray) -> Self {
        Self {
            iv: Some(iv),
            ..Self::default()
        }
    }
}

enum Transform {
    Block {
        core: Arc<dyn BlockCipherCore>,
        chain: Box<dyn BlockMode>,
    },
    Stream(Box<dyn StreamCipherCore>),
}

impl Transform {
    fn release(&mut self, buffer: &mut BlockProcessor, flush: bool) -> WordArray {
        match self {
            Self::Block { core, chain } => buffer
                .release_ready_blocks(flush, |block| chain.process_block(core.as_ref(), block)),
            Self::Stream(core) => {
                buffer.release_ready_blocks(flush, |block| core.apply_keystream(block))
            }
        }
    }
}

impl Clone for Transform {
    fn clone(&self) -> Self {
        match self {
            Self::Block { core, chain } => Self::Block {
                core: Arc::clone(core),
                chain: chain.box_clone(),
            },
            Self::Stream(core) => Self::Stream(core.box_clone()),
        }
    }
}

/// A streaming encryptor or decryptor.
///
/// # Examples
///
/// ```
/// use ck_crypto::cipher::{Cipher, CipherAlgorithm, CipherConfig};
/// use ck_crypto::word_array::WordArray;
///
/// let key = WordArray::from("YELLOW SUBMARINE");
/// let config = CipherConfig::with_iv(WordArray::from_bytes(&[0u8; 16]));
///
/// let mut enc = Cipher::encryptor(CipherAlgorithm::Aes, &key, config.clone()).unwrap();
/// let ciphertext = enc.finalize_with("attack at dawn").unwrap();
///
/// let mut dec = Cipher::decryptor(CipherAlgorithm::Aes, &key, config).unwrap();
/// let plaintext = dec.finalize_with(&ciphertext).unwrap();
/// assert_eq!(plaintext.to_bytes(), b"attack at dawn");
/// ```
pub struct Cipher {
    algorithm: CipherAlgorithm,
    direction: Direction,
    config: CipherConfig,
    key: Arc<WordArray>,
    iv_words: Vec<u32>,
    transform: Transform,
    buffer: BlockProcessor,
    finalized: bool,
}

impl Cipher {
    /// Creates a cipher instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The cipher to run
    /// * `direction` - Encrypt or decrypt
    /// * `key` - Key material; the expanded schedule is cached against this `Arc`
    /// * `config` - IV, mode, padding and drop options
    ///
    /// # Returns
    ///
    /// The cipher, or an error if the core is not ready, the key length is
    /// wrong, or the IV is missing or has the wrong length
    pub fn new(
        algorithm: CipherAlgorithm,
        direction: Direction,
        key: Arc<WordArray>,
        config: CipherConfig,
    ) -> Result<Self> {
        algorithm.ensure_ready()?;

        let block_size_words = algorithm.block_size_words();
        let iv_words = if algorithm.is_stream() || !config.mode.requires_iv() {
            Vec::new()
        } else {
            let iv = config.iv.as_ref().ok_or(CryptoError::MissingIv {
                mode: config.mode.name(),
            })?;
            if iv.sig_bytes() != block_size_words * 4 {
                return Err(CryptoError::InvalidIvLength {
                    expected: block_size_words * 4,
                    actual: iv.sig_bytes(),
                });
            }
            iv.slice_words(0, block_size_words).words().to_vec()
        };

        let transform = Self::schedule(algorithm, direction, &key, &config, &iv_words)?;
        let min_buffer = match (algorithm.is_stream(), direction) {
            (false, Direction::Decrypt) => 1,
            _ => 0,
        };

        Ok(Self {
            algorithm,
            direction,
            config,
            key,
            iv_words,
            transform,
            buffer: BlockProcessor::with_min_buffer(block_size_words, min_buffer),
            finalized: false,
        })
    }

    /// Creates an encryptor with a private copy of `key`.
    pub fn encryptor(
        algorithm: CipherAlgorithm,
        key: &WordArray,
        config: CipherConfig,
    ) -> Result<Self> {
        Self::new(algorithm, Direction::Encrypt, Arc::new(key.clone()), config)
    }

    /// Creates a decryptor with a private copy of `key`.
    pub fn decryptor(
        algorithm: CipherAlgorithm,
        key: &WordArray,
        config: CipherConfig,
    ) -> Result<Self> {
        Self::new(algorithm, Direction::Decrypt, Arc::new(key.clone()), config)
    }

    fn schedule(
        algorithm: CipherAlgorithm,
        direction: Direction,
        key: &WordArray,
        config: &CipherConfig,
        iv_words: &[u32],
    ) -> Result<Transform> {
        debug!("expanding {} key schedule", algorithm);
        let transform = match algorithm {
            CipherAlgorithm::Rc4 => Transform::Stream(Box::new(Rc4Core::new(key, 0)?)),
            CipherAlgorithm::Rc4Drop => {
                Transform::Stream(Box::new(Rc4Core::new(key, config.drop_words)?))
            }
            _ => Transform::Block {
                core: algorithm.block_core(key)?,
                chain: config.mode.build(direction, iv_words),
            },
        };
        Ok(transform)
    }

    /// The cipher this instance runs.
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Encrypt or decrypt.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The options this instance was created with.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// The key the cached schedule was expanded from.
    pub fn key(&self) -> &Arc<WordArray> {
        &self.key
    }

    /// Discards buffered data and restarts the chaining state from the IV.
    ///
    /// The key schedule is kept.
    pub fn reset(&mut self) {
        self.buffer.reset();
        match &mut self.transform {
            Transform::Block { chain, .. } => {
                *chain = self.config.mode.build(self.direction, &self.iv_words);
            }
            Transform::Stream(core) => core.reset(),
        }
        self.finalized = false;
    }

    /// Resets the instance and switches it to `key`.
    ///
    /// The key schedule is only expanded again when `key` is a different
    /// allocation from the current key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` if the new key does not fit the
    /// algorithm; the instance keeps its previous key in that case.
    pub fn rekey(&mut self, key: Arc<WordArray>) -> Result<()> {
        if !Arc::ptr_eq(&self.key, &key) {
            self.transform = Self::schedule(
                self.algorithm,
                self.direction,
                &key,
                &self.config,
                &self.iv_words,
            )?;
            self.key = key;
        }
        self.reset();
        Ok(())
    }

    /// Feeds data and returns whatever output is ready.
    ///
    /// Block-cipher decryptors keep the last complete block buffered until
    /// `finalize`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if the instance was finalized and not reset.
    pub fn process<D: Into<WordArray>>(&mut self, data: D) -> Result<WordArray> {
        self.check_live()?;
        self.buffer.append(&data.into());
        Ok(self.transform.release(&mut self.buffer, false))
    }

    /// Pads or unpads, flushes all buffered data and returns the final output.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` on a second call without reset, and
    /// `CryptoError::UnpaddingAmbiguity` if a decryptor cannot strip padding.
    pub fn finalize(&mut self) -> Result<WordArray> {
        self.check_live()?;
        self.finalized = true;
        trace!(
            "{} {:?} finalized after {} bytes",
            self.algorithm,
            self.direction,
            self.buffer.total_bytes_in()
        );

        if self.algorithm.is_stream() {
            return Ok(self.transform.release(&mut self.buffer, true));
        }

        match self.direction {
            Direction::Encrypt => {
                self.config
                    .padding
                    .pad(self.buffer.data_mut(), self.algorithm.block_size_words())?;
                Ok(self.transform.release(&mut self.buffer, true))
            }
            Direction::Decrypt => {
                let mut out = self.transform.release(&mut self.buffer, true);
                self.config.padding.unpad(&mut out)?;
                Ok(out)
            }
        }
    }

    /// Feeds `data` and finalizes in one call.
    ///
    /// # Errors
    ///
    /// Same as [`finalize`](Cipher::finalize).
    pub fn finalize_with<D: Into<WordArray>>(&mut self, data: D) -> Result<WordArray> {
        self.check_live()?;
        self.buffer.append(&data.into());
        self.finalize()
    }

    fn check_live(&self) -> Result<()> {
        if self.finalized {
            Err(CryptoError::Finalized("cipher"))
        } else {
            Ok(())
        }
    }
}

impl Clone for Cipher {
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            direction: self.direction,
            config: self.config.clone(),
            key: Arc::clone(&self.key),
            iv_words: self.iv_words.clone(),
            transform: self.transform.clone(),
            buffer: self.buffer.clone(),
            finalized: self.finalized,
        }
    }
}

impl Drop for Cipher {
    fn drop(&mut self) {
        if let Some(key) = Arc::get_mut(&mut self.key) {
            key.zeroize();
        }
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("algorithm", &self.algorithm)
            .field("direction", &self.direction)
            .field("mode", &self.config.mode)
            .field("padding", &self.config.padding)
            .field("buffered_bytes", &self.buffer.buffered_bytes())
            .field("finalized", &self.finalized)
            .finish()
    }
}

/// Encrypts `message` in one call.
///
/// # Examples
///
/// ```
/// use ck_crypto::cipher::{encrypt, CipherAlgorithm, CipherConfig};
/// use ck_crypto::mode::Mode;
/// use ck_crypto::word_array::WordArray;
///
/// let key = WordArray::from_bytes(&[7u8; 16]);
/// let config = CipherConfig { mode: Mode::Ecb, ..CipherConfig::default() };
/// let ct = encrypt(CipherAlgorithm::Aes, "hi", &key, config).unwrap();
/// assert_eq!(ct.sig_bytes(), 16);
/// ```
pub fn encrypt<D: Into<WordArray>>(
    algorithm: CipherAlgorithm,
    message: D,
    key: &WordArray,
    config: CipherConfig,
) -> Result<WordArray> {
    Cipher::encryptor(algorithm, key, config)?.finalize_with(message)
}

/// Decrypts `ciphertext` in one call.
///
/// # Errors
///
/// Any error from [`Cipher::new`] or [`Cipher::finalize`].
pub fn decrypt<D: Into<WordArray>>(
    algorithm: CipherAlgorithm,
    ciphertext: D,
    key: &WordArray,
    config: CipherConfig,
) -> Result<WordArray> {
    Cipher::decryptor(algorithm, key, config)?.finalize_with(ciphertext)
}
