//! Byte sequences stored as big-endian 32-bit words.
//!
//! Every hash core and block cipher in this crate consumes and produces
//! [`WordArray`] values. Byte `i` lives in `words[i >> 2]` at bit offset
//! `24 - 8 * (i % 4)`, and `sig_bytes` records how many of those bytes are
//! meaningful. Bits past `sig_bytes` may hold leftovers until [`WordArray::clamp`]
//! is called.

use std::fmt;

use zeroize::Zeroize;

use crate::encoding::Encoding;
use crate::error::Result;
use crate::random::random_bytes;

/// A byte sequence packed into big-endian 32-bit words.
#[derive(Clone, Default, Zeroize)]
pub struct WordArray {
    words: Vec<u32>,
    sig_bytes: usize,
}

impl WordArray {
    /// Creates an empty word array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a word array from raw words with an explicit significant byte count.
    ///
    /// If `sig_bytes` reaches past the supplied words, the word vector is
    /// zero-extended so that every significant byte is backed by storage.
    pub fn from_words(mut words: Vec<u32>, sig_bytes: usize) -> Self {
        let needed = sig_bytes.div_ceil(4);
        if words.len() < needed {
            words.resize(needed, 0);
        }
        Self { words, sig_bytes }
    }

    /// Creates a word array from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = vec![0u32; bytes.len().div_ceil(4)];
        for (i, byte) in bytes.iter().enumerate() {
            words[i >> 2] |= u32::from(*byte) << (24 - (i % 4) * 8);
        }
        Self {
            words,
            sig_bytes: bytes.len(),
        }
    }

    /// Creates a word array holding `len` bytes from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::CsprngUnavailable` if no secure source is reachable.
    pub fn random(len: usize) -> Result<Self> {
        Ok(Self::from_bytes(&random_bytes(len)?))
    }

    /// Parses `input` with the given encoding.
    pub fn parse(input: &str, encoding: Encoding) -> Result<Self> {
        encoding.parse(input)
    }

    /// Renders the significant bytes with the given encoding.
    pub fn stringify(&self, encoding: Encoding) -> Result<String> {
        encoding.stringify(self)
    }

    /// Lowercase hex rendering of the significant bytes.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.sig_bytes * 2);
        for i in 0..self.sig_bytes {
            out.push_str(&format!("{:02x}", self.byte(i)));
        }
        out
    }

    /// The backing words, possibly including bits past `sig_bytes`.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Mutable access to the backing words.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    /// Number of significant bytes.
    pub fn sig_bytes(&self) -> usize {
        self.sig_bytes
    }

    /// Number of significant bytes.
    pub fn len(&self) -> usize {
        self.sig_bytes
    }

    /// Returns true when there are no significant bytes.
    pub fn is_empty(&self) -> bool {
        self.sig_bytes == 0
    }

    /// Returns the byte at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not backed by a word.
    pub fn byte(&self, index: usize) -> u8 {
        ((self.words[index >> 2] >> (24 - (index % 4) * 8)) & 0xff) as u8
    }

    /// Copies the significant bytes out.
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..self.sig_bytes).map(|i| self.byte(i)).collect()
    }

    /// Appends the significant bytes of `other`.
    ///
    /// `self` is clamped first so stale bits past its end never leak into the
    /// joined value.
    pub fn concat(&mut self, other: &WordArray) -> &mut Self {
        self.clamp();
        let this_sig = self.sig_bytes;
        let that_sig = other.sig_bytes;

        if this_sig % 4 != 0 {
            // Unaligned join: copy one byte at a time
            self.words.resize((this_sig + that_sig).div_ceil(4), 0);
            for i in 0..that_sig {
                let pos = this_sig + i;
                self.words[pos >> 2] |= u32::from(other.byte(i)) << (24 - (pos % 4) * 8);
            }
        } else {
            let count = that_sig.div_ceil(4);
            self.words.extend_from_slice(&other.words[..count]);
        }
        self.sig_bytes += that_sig;
        self
    }

    /// Zeroes bits past `sig_bytes` and drops words that hold no significant byte.
    pub fn clamp(&mut self) -> &mut Self {
        let rem = self.sig_bytes % 4;
        if rem != 0 {
            self.words[self.sig_bytes >> 2] &= u32::MAX << (32 - rem * 8);
        }
        self.words.truncate(self.sig_bytes.div_ceil(4));
        self
    }

    /// Shortens the significant length to `len` bytes. Longer values are ignored.
    pub fn truncate(&mut self, len: usize) -> &mut Self {
        if len < self.sig_bytes {
            self.sig_bytes = len;
        }
        self
    }

    /// Sets the significant length, zero-extending the storage when it grows.
    ///
    /// Bytes exposed by growing are only guaranteed zero if the array was
    /// clamped beforehand.
    pub fn set_sig_bytes(&mut self, len: usize) -> &mut Self {
        let needed = len.div_ceil(4);
        if self.words.len() < needed {
            self.words.resize(needed, 0);
        }
        self.sig_bytes = len;
        self
    }

    /// Copies `count` words starting at word `start` into a new array.
    ///
    /// Words past the end of the storage read as zero.
    pub fn slice_words(&self, start: usize, count: usize) -> WordArray {
        let words = (start..start + count)
            .map(|i| self.words.get(i).copied().unwrap_or(0))
            .collect();
        WordArray::from_words(words, count * 4)
    }

    pub(crate) fn words_vec_mut(&mut self) -> &mut Vec<u32> {
        &mut self.words
    }

    /// Removes `word_count` words from the front, shrinking `sig_bytes` by `byte_count`.
    pub(crate) fn drain_front(&mut self, word_count: usize, byte_count: usize) -> Vec<u32> {
        let drained = self.words.drain(..word_count).collect();
        self.sig_bytes -= byte_count;
        drained
    }
}

impl PartialEq for WordArray {
    fn eq(&self, other: &Self) -> bool {
        self.sig_bytes == other.sig_bytes
            && (0..self.sig_bytes).all(|i| self.byte(i) == other.byte(i))
    }
}

impl Eq for WordArray {}

impl fmt::Debug for WordArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordArray")
            .field("hex", &self.to_hex())
            .field("sig_bytes", &self.sig_bytes)
            .finish()
    }
}

impl fmt::Display for WordArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Vec<u32>> for WordArray {
    fn from(words: Vec<u32>) -> Self {
        let sig_bytes = words.len() * 4;
        Self { words, sig_bytes }
    }
}

impl From<&[u8]> for WordArray {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for WordArray {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for WordArray {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(&bytes)
    }
}

impl From<&Vec<u8>> for WordArray {
    fn from(bytes: &Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Strings are taken as UTF-8.
impl From<&str> for WordArray {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<&String> for WordArray {
    fn from(text: &String) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<String> for WordArray {
    fn from(text: String) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl From<&WordArray> for WordArray {
    fn from(other: &WordArray) -> Self {
        other.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_packs_big_endian() {
        let wa = WordArray::from_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(wa.words(), &[0x0102_0304, 0x0500_0000]);
        assert_eq!(wa.sig_bytes(), 5);
    }

    #[test]
    fn test_clamp_masks_and_truncates() {
        let mut wa = WordArray::from_words(vec![0x1122_3344, 0x5566_7788, 0x99aa_bbcc], 5);
        wa.clamp();
        assert_eq!(wa.words(), &[0x1122_3344, 0x5500_0000]);
    }

    #[test]
    fn test_concat_aligned() {
        let mut a = WordArray::from_bytes(b"abcd");
        a.concat(&WordArray::from_bytes(b"efg"));
        assert_eq!(a.to_bytes(), b"abcdefg");
        assert_eq!(a.sig_bytes(), 7);
    }

    #[test]
    fn test_concat_unaligned_clamps_stale_bits() {
        // Garbage in the low bytes of the last word must not survive the join
        let mut a = WordArray::from_words(vec![0x6162_ffff], 2);
        a.concat(&WordArray::from_bytes(b"cdef"));
        assert_eq!(a.to_bytes(), b"abcdef");
        assert_eq!(a.words(), &[0x6162_6364, 0x6566_0000]);
    }

    #[test]
    fn test_concat_empty() {
        let mut a = WordArray::from_bytes(b"xyz");
        a.concat(&WordArray::new());
        assert_eq!(a.to_bytes(), b"xyz");

        let mut empty = WordArray::new();
        empty.concat(&a);
        assert_eq!(empty, a);
    }

    #[test]
    fn test_equality_ignores_stale_bits() {
        let a = WordArray::from_words(vec![0xaabb_ccdd], 2);
        let b = WordArray::from_words(vec![0xaabb_0000], 2);
        assert_eq!(a, b);
        assert_ne!(a, WordArray::from_words(vec![0xaabb_0000], 3));
    }

    #[test]
    fn test_from_words_extends_storage() {
        let wa = WordArray::from_words(vec![0x0102_0304], 8);
        assert_eq!(wa.words().len(), 2);
        assert_eq!(wa.to_bytes(), vec![1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn test_slice_words() {
        let wa = WordArray::from(vec![1u32, 2, 3, 4]);
        let slice = wa.slice_words(2, 3);
        assert_eq!(slice.words(), &[3, 4, 0]);
        assert_eq!(slice.sig_bytes(), 12);
    }

    #[test]
    fn test_random_length_and_variation() {
        let a = WordArray::random(16).unwrap();
        let b = WordArray::random(16).unwrap();
        assert_eq!(a.sig_bytes(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_string_conversion_is_utf8() {
        let wa = WordArray::from("é");
        assert_eq!(wa.to_bytes(), vec![0xc3, 0xa9]);
    }

    #[test]
    fn test_display_is_hex() {
        let wa = WordArray::from_bytes(&[0xde, 0xad, 0xbe, 0xef, 0x01]);
        assert_eq!(wa.to_string(), "deadbeef01");
    }
}
