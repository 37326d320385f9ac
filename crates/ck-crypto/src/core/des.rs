//! DES and Triple-DES (EDE) cores, backed by the `des` crate.

use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use des::{Des, TdesEde3};

use super::{bytes_to_words, words_to_bytes, BlockCipherCore};
use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

/// DES block size in words.
pub const BLOCK_SIZE_WORDS: usize = 2;

fn run<C: BlockEncrypt + BlockDecrypt>(cipher: &C, block: &mut [u32], encrypt: bool) {
    let mut bytes = [0u8; 8];
    words_to_bytes(&block[..BLOCK_SIZE_WORDS], &mut bytes);
    let buf = GenericArray::from_mut_slice(&mut bytes);
    if encrypt {
        cipher.encrypt_block(buf);
    } else {
        cipher.decrypt_block(buf);
    }
    bytes_to_words(&bytes, &mut block[..BLOCK_SIZE_WORDS]);
}

/// Single DES with the first 8 key bytes.
#[derive(Clone)]
pub struct DesCore {
    cipher: Des,
}

impl DesCore {
    /// Expands the key schedule. Bytes past the eighth are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` for keys shorter than 8 bytes.
    pub fn new(key: &WordArray) -> Result<Self> {
        let bytes = key.to_bytes();
        if bytes.len() < 8 {
            return Err(CryptoError::InvalidKeyLength {
                algorithm: "DES",
                expected: "at least 8",
                actual: bytes.len(),
            });
        }
        let cipher = Des::new_from_slice(&bytes[..8]).map_err(|_| CryptoError::InvalidKeyLength {
            algorithm: "DES",
            expected: "at least 8",
            actual: bytes.len(),
        })?;
        Ok(Self { cipher })
    }
}

impl std::fmt::Debug for DesCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DesCore")
    }
}

impl BlockCipherCore for DesCore {
    fn block_size_words(&self) -> usize {
        BLOCK_SIZE_WORDS
    }

    fn encrypt_block(&self, block: &mut [u32]) {
        run(&self.cipher, block, true);
    }

    fn decrypt_block(&self, block: &mut [u32]) {
        run(&self.cipher, block, false);
    }
}

/// Triple DES in encrypt-decrypt-encrypt form.
///
/// An 8-byte key is used as K1 = K2 = K3, a 16-byte key as K1 K2 K1, and 24
/// or more bytes as K1 K2 K3.
#[derive(Clone)]
pub struct TripleDesCore {
    cipher: TdesEde3,
}

impl TripleDesCore {
    /// Expands the three key schedules.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless the key is 8, 16 or at
    /// least 24 bytes.
    pub fn new(key: &WordArray) -> Result<Self> {
        let bytes = key.to_bytes();
        let invalid = || CryptoError::InvalidKeyLength {
            algorithm: "TripleDES",
            expected: "8, 16 or at least 24",
            actual: bytes.len(),
        };

        let k1 = bytes.get(..8).ok_or_else(invalid)?;
        let (k2, k3) = match bytes.len() {
            8 => (k1, k1),
            16 => (&bytes[8..16], k1),
            n if n >= 24 => (&bytes[8..16], &bytes[16..24]),
            _ => return Err(invalid()),
        };

        let mut full = [0u8; 24];
        full[..8].copy_from_slice(k1);
        full[8..16].copy_from_slice(k2);
        full[16..].copy_from_slice(k3);
        let cipher = TdesEde3::new_from_slice(&full).map_err(|_| invalid())?;
        Ok(Self { cipher })
    }
}

impl std::fmt::Debug for TripleDesCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TripleDesCore")
    }
}

impl BlockCipherCore for TripleDesCore {
    fn block_size_words(&self) -> usize {
        BLOCK_SIZE_WORDS
    }

    fn encrypt_block(&self, block: &mut [u32]) {
        run(&self.cipher, block, true);
    }

    fn decrypt_block(&self, block: &mut [u32]) {
        run(&self.cipher, block, false);
    }
}
