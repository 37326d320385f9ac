//! Streaming message digests.
//!
//! [`Hasher`] drives a hash core through the shared [`BlockProcessor`]: every
//! `update` absorbs whole blocks, and `finalize` appends the Merkle-Damgård
//! length padding before flushing the last block(s) and reading out the
//! digest.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::buffered::BlockProcessor;
use crate::core::md5::Md5Core;
use crate::core::sha1::Sha1Core;
use crate::core::sha2::{Sha256Core, Sha512Core};
use crate::core::{HashCore, LengthEncoding};
use crate::error::{CryptoError, Result};
use crate::ready::{ensure_ready, is_ready, CoreFamily};
use crate::word_array::WordArray;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// MD5 (128-bit output).
    Md5,
    /// SHA-1 (160-bit output).
    Sha1,
    /// SHA-224 (224-bit output).
    Sha224,
    /// SHA-256 (256-bit output).
    #[default]
    Sha256,
    /// SHA-384 (384-bit output).
    Sha384,
    /// SHA-512 (512-bit output).
    Sha512,
}

impl HashAlgorithm {
    /// Every supported digest.
    pub const ALL: [HashAlgorithm; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Canonical lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Compression block size in 32-bit words.
    pub fn block_size_words(self) -> usize {
        match self {
            Self::Sha384 | Self::Sha512 => 32,
            _ => 16,
        }
    }

    /// The numeric core family backing this digest.
    pub fn family(self) -> CoreFamily {
        match self {
            Self::Md5 => CoreFamily::Md5,
            Self::Sha1 => CoreFamily::Sha1,
            Self::Sha224 | Self::Sha256 => CoreFamily::Sha256,
            Self::Sha384 | Self::Sha512 => CoreFamily::Sha512,
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

    /// Returns true if the backing core has passed its self-test.
    pub fn is_ready(self) -> bool {
        is_ready(self.family())
    }

    fn core(self) -> Box<dyn HashCore> {
        match self {
            Self::Md5 => Box::new(Md5Core::new()),
            Self::Sha1 => Box::new(Sha1Core::new()),
            Self::Sha224 => Box::new(Sha256Core::sha224()),
            Self::Sha256 => Box::new(Sha256Core::sha256()),
            Self::Sha384 => Box::new(Sha512Core::sha384()),
            Self::Sha512 => Box::new(Sha512Core::sha512()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha224" | "sha-224" => Ok(Self::Sha224),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha384" | "sha-384" => Ok(Self::Sha384),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnknownAlgorithm {
                kind: "hash algorithm",
                name: s.to_string(),
            }),
        }
    }
}

/// Appends Merkle-Damgård padding to the unprocessed tail of a message.
///
/// Writes a single `0x80` marker after the data, zero-fills, and stores
/// `total_bits` in the last words of the final block using `encoding`.
/// Afterwards `data` is a whole number of blocks.
pub(crate) fn append_length_padding(
    data: &mut WordArray,
    block_size_words: usize,
    encoding: LengthEncoding,
    total_bits: u64,
) {
    data.clamp();
    let bits_left = data.sig_bytes() * 8;
    let block_bits = block_size_words * 32;
    let total_words = ((bits_left + encoding.reserved_bits()) / block_bits + 1) * block_size_words;

    let words = data.words_vec_mut();
    words.resize(total_words, 0);
    words[bits_left >> 5] |= 0x80 << (24 - bits_left % 32);

    let hi = (total_bits >> 32) as u32;
    let lo = total_bits as u32;
    match encoding {
        LengthEncoding::BigEndian64 | LengthEncoding::BigEndian128 => {
            words[total_words - 2] = hi;
            words[total_words - 1] = lo;
        }
        LengthEncoding::LittleEndian64 => {
            words[total_words - 2] = lo.swap_bytes();
            words[total_words - 1] = hi.swap_bytes();
        }
    }
    data.set_sig_bytes(total_words * 4);
}

/// An incremental hasher.
///
/// After [`finalize`](Hasher::finalize) the hasher refuses further input
/// until [`reset`](Hasher::reset) is called.
///
/// # Examples
///
/// ```
/// use ck_crypto::hash::{HashAlgorithm, Hasher};
///
/// let mut hasher = Hasher::new(HashAlgorithm::Sha256).unwrap();
/// hasher.update("ab").unwrap();
/// hasher.update("c").unwrap();
/// let digest = hasher.finalize().unwrap();
/// assert_eq!(
///     digest.to_hex(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub struct Hasher {
    algorithm: HashAlgorithm,
    core: Box<dyn HashCore>,
    buffer: BlockProcessor,
    finalized: bool,
}

impl Hasher {
    /// Creates a hasher for `algorithm`.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The digest to compute
    ///
    /// # Returns
    ///
    /// A fresh hasher, or `CryptoError::CoreNotReady` if the backing core
    /// failed its self-test
    pub fn new(algorithm: HashAlgorithm) -> Result<Self> {
        algorithm.ensure_ready()?;
        Ok(Self::unchecked(algorithm))
    }

    /// Creates a hasher without consulting the readiness gate. Callers must
    /// have passed `ensure_ready` for the algorithm already.
    pub(crate) fn unchecked(algorithm: HashAlgorithm) -> Self {
        let core = algorithm.core();
        let buffer = BlockProcessor::new(core.block_size_words());
        Self {
            algorithm,
            core,
            buffer,
            finalized: false,
        }
    }

    /// The digest this hasher computes.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Absorbs `data` without the finalized check.
    pub(crate) fn absorb(&mut self, data: &WordArray) {
        self.buffer.append(data);
        let core = &mut self.core;
        self.buffer
            .release_ready_blocks(false, |block| core.process_block(block));
    }

    /// Feeds more message data. Strings are taken as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if the hasher was finalized and not reset.
    pub fn update<D: Into<WordArray>>(&mut self, data: D) -> Result<&mut Self> {
        self.check_live()?;
        self.absorb(&data.into());
        Ok(self)
    }

    /// Pads, processes the remaining data and returns the digest.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if called twice without a reset.
    pub fn finalize(&mut self) -> Result<WordArray> {
        self.check_live()?;
        Ok(self.finish())
    }

    /// Feeds `data` and finalizes in one call.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Finalized` if the hasher was already finalized.
    pub fn finalize_with<D: Into<WordArray>>(&mut self, data: D) -> Result<WordArray> {
        self.check_live()?;
        self.absorb(&data.into());
        Ok(self.finish())
    }

    /// Restores the initial state so the hasher can be reused.
    pub fn reset(&mut self) {
        self.core.reset();
        self.buffer.reset();
        self.finalized = false;
    }

    /// Finalizes without the finalized check and leaves the hasher terminal.
    pub(crate) fn finish(&mut self) -> WordArray {
        let total_bits = self.buffer.total_bytes_in() * 8;
        append_length_padding(
            self.buffer.data_mut(),
            self.core.block_size_words(),
            self.core.length_encoding(),
            total_bits,
        );
        let core = &mut self.core;
        self.buffer
            .release_ready_blocks(true, |block| core.process_block(block));
        self.finalized = true;
        trace!("{} finalized after {} bytes", self.algorithm, total_bits / 8);
        self.core.output()
    }

    fn check_live(&self) -> Result<()> {
        if self.finalized {
            Err(CryptoError::Finalized("hasher"))
        } else {
            Ok(())
        }
    }
}

impl Clone for Hasher {
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            core: self.core.box_clone(),
            buffer: self.buffer.clone(),
            finalized: self.finalized,
        }
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &self.algorithm)
            .field("buffered_bytes", &self.buffer.buffered_bytes())
            .field("finalized", &self.finalized)
            .finish()
    }
}

/// Computes the digest of `data` in one call.
///
/// # Examples
///
/// ```
/// use ck_crypto::hash::{hash, HashAlgorithm};
///
/// let digest = hash(HashAlgorithm::Md5, "abc").unwrap();
/// assert_eq!(digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
/// ```
pub fn hash<D: Into<WordArray>>(algorithm: HashAlgorithm, data: D) -> Result<WordArray> {
    Hasher::new(algorithm)?.finalize_with(data)
}
