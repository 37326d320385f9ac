//! AES block cipher core, backed by the `aes` crate.
//!
//! The key length picks the variant: 16, 24 or 32 bytes for AES-128, AES-192
//! and AES-256.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use super::{bytes_to_words, words_to_bytes, BlockCipherCore};
use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

/// AES block size in words.
pub const BLOCK_SIZE_WORDS: usize = 4;

/// An expanded AES key schedule.
#[derive(Clone)]
pub enum AesCore {
    /// 128-bit key.
    Aes128(Box<Aes128>),
    /// 192-bit key.
    Aes192(Box<Aes192>),
    /// 256-bit key.
    Aes256(Box<Aes256>),
}

impl AesCore {
    /// Expands the key schedule for `key`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless the key is 16, 24 or 32 bytes.
    pub fn new(key: &WordArray) -> Result<Self> {
        let bytes = key.to_bytes();
        let invalid = || CryptoError::InvalidKeyLength {
            algorithm: "AES",
            expected: "16, 24 or 32",
            actual: bytes.len(),
        };
        let core = match bytes.len() {
            16 => Self::Aes128(Box::new(Aes128::new_from_slice(&bytes).map_err(|_| invalid())?)),
            24 => Self::Aes192(Box::new(Aes192::new_from_slice(&bytes).map_err(|_| invalid())?)),
            32 => Self::Aes256(Box::new(Aes256::new_from_slice(&bytes).map_err(|_| invalid())?)),
            _ => return Err(invalid()),
        };
        Ok(core)
    }

    /// Key size in bits.
    pub fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }

    fn apply(&self, block: &mut [u32], encrypt: bool) {
        let mut bytes = [0u8; 16];
        words_to_bytes(&block[..BLOCK_SIZE_WORDS], &mut bytes);
        let buf = GenericArray::from_mut_slice(&mut bytes);
        match (self, encrypt) {
            (Self::Aes128(c), true) => c.encrypt_block(buf),
            (Self::Aes128(c), false) => c.decrypt_block(buf),
            (Self::Aes192(c), true) => c.encrypt_block(buf),
            (Self::Aes192(c), false) => c.decrypt_block(buf),
            (Self::Aes256(c), true) => c.encrypt_block(buf),
            (Self::Aes256(c), false) => c.decrypt_block(buf),
        }
        bytes_to_words(&bytes, &mut block[..BLOCK_SIZE_WORDS]);
    }
}

impl std::fmt::Debug for AesCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesCore(AES-{})", self.key_bits())
    }
}

impl BlockCipherCore for AesCore {
    fn block_size_words(&self) -> usize {
        BLOCK_SIZE_WORDS
    }

    fn encrypt_block(&self, block: &mut [u32]) {
        self.apply(block, true);
    }

    fn decrypt_block(&self, block: &mut [u32]) {
        self.apply(block, false);
    }
}
