//! Numeric cores: the compression functions and cipher primitives driven by
//! the hashing and cipher engines.
//!
//! Engines only see the traits in this module. Each core works on plain word
//! slices; the engines own all buffering, chaining and padding.

pub mod aes;
pub mod des;
pub mod md5;
pub mod rc4;
pub mod sha1;
pub mod sha2;

use crate::word_array::WordArray;

/// Where a hash stores the message bit length in its final block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthEncoding {
    /// 64-bit big-endian length in the last two words of a block (SHA-1, SHA-256).
    BigEndian64,
    /// 64-bit length with each word byte-swapped (MD5).
    LittleEndian64,
    /// 128-bit big-endian length field; only the low 64 bits are written (SHA-512).
    BigEndian128,
}

impl LengthEncoding {
    /// Bits reserved at the end of the final block for the length field.
    pub fn reserved_bits(self) -> usize {
        match self {
            Self::BigEndian64 | Self::LittleEndian64 => 64,
            Self::BigEndian128 => 128,
        }
    }
}

/// A hash compression function with its chaining state.
pub trait HashCore: Send + Sync {
    /// Block size in 32-bit words.
    fn block_size_words(&self) -> usize;

    /// How the message length is encoded during final padding.
    fn length_encoding(&self) -> LengthEncoding;

    /// Restores the initial chaining value.
    fn reset(&mut self);

    /// Absorbs one block of `block_size_words()` words.
    fn process_block(&mut self, block: &[u32]);

    /// Reads the digest out of the chaining state.
    fn output(&self) -> WordArray;

    /// Deep copy behind a trait object.
    fn box_clone(&self) -> Box<dyn HashCore>;
}

/// A keyed block cipher with an expanded key schedule.
pub trait BlockCipherCore: Send + Sync {
    /// Block size in 32-bit words.
    fn block_size_words(&self) -> usize;

    /// Encrypts one block in place.
    fn encrypt_block(&self, block: &mut [u32]);

    /// Decrypts one block in place.
    fn decrypt_block(&self, block: &mut [u32]);
}

/// A keyed stream cipher that XORs keystream words into data.
pub trait StreamCipherCore: Send + Sync {
    /// Rewinds the keystream to its post-key-schedule position.
    fn reset(&mut self);

    /// XORs keystream into every word of `block`.
    fn apply_keystream(&mut self, block: &mut [u32]);

    /// Deep copy behind a trait object.
    fn box_clone(&self) -> Box<dyn StreamCipherCore>;
}

/// Serializes big-endian words into `out`.
pub(crate) fn words_to_bytes(words: &[u32], out: &mut [u8]) {
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

/// Loads big-endian words from `bytes`.
pub(crate) fn bytes_to_words(bytes: &[u8], out: &mut [u32]) {
    for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}
