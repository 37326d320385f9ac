//! RC4 keystream generator, with an optional initial keystream drop.

use zeroize::Zeroize;

use super::StreamCipherCore;
use crate::error::{CryptoError, Result};
use crate::word_array::WordArray;

#[derive(Clone, Zeroize)]
struct State {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl State {
    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let idx = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[idx as usize]
    }

    fn next_word(&mut self) -> u32 {
        (0..4).fold(0u32, |word, n| word | u32::from(self.next_byte()) << (24 - 8 * n))
    }
}

/// RC4 with its key schedule cached so `reset` can rewind the keystream.
#[derive(Clone)]
pub struct Rc4Core {
    scheduled: State,
    current: State,
}

impl Rc4Core {
    /// Runs the key schedule for `key` and discards `drop_words` keystream words.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless the key is 1 to 256 bytes.
    pub fn new(key: &WordArray, drop_words: usize) -> Result<Self> {
        let mut key = key.to_bytes();
        if key.is_empty() || key.len() > 256 {
            let actual = key.len();
            key.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                algorithm: "RC4",
                expected: "1 to 256",
                actual,
            });
        }

        let mut state = State {
            s: [0u8; 256],
            i: 0,
            j: 0,
        };
        for (n, slot) in state.s.iter_mut().enumerate() {
            *slot = n as u8;
        }
        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state.s[i]).wrapping_add(key[i % key.len()]);
            state.s.swap(i, j as usize);
        }
        key.zeroize();

        for _ in 0..drop_words {
            state.next_word();
        }

        Ok(Self {
            current: state.clone(),
            scheduled: state,
        })
    }
}

impl Drop for Rc4Core {
    fn drop(&mut self) {
        self.scheduled.zeroize();
        self.current.zeroize();
    }
}

impl std::fmt::Debug for Rc4Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Rc4Core")
    }
}

impl StreamCipherCore for Rc4Core {
    fn reset(&mut self) {
        self.current = self.scheduled.clone();
    }

    fn apply_keystream(&mut self, block: &mut [u32]) {
        for word in block.iter_mut() {
            *word ^= self.current.next_word();
        }
    }

    fn box_clone(&self) -> Box<dyn StreamCipherCore> {
        Box::new(self.clone())
    }
}
