//! Counter mode with Brian Gladman's counter arithmetic.
//!
//! The counter is incremented before each block is encrypted. Inside a word
//! the most significant byte is the lowest-order digit: it is bumped first,
//! and an overflow carries into the next byte down. When the first word
//! wraps to zero the second word is incremented the same way. A carry out of
//! the lowest byte of a word is dropped.

use super::{xor_into, BlockMode};
use crate::core::BlockCipherCore;

/// CTR-Gladman counter block, seeded with the IV.
#[derive(Clone, Debug)]
pub struct CtrGladman {
    counter: Vec<u32>,
}

impl CtrGladman {
    /// Creates a chain whose counter starts at `iv` (incremented before first use).
    pub fn new(iv: &[u32]) -> Self {
        Self {
            counter: iv.to_vec(),
        }
    }
}

fn inc_word(word: u32) -> u32 {
    if (word >> 24) & 0xff != 0xff {
        return word + (1 << 24);
    }

    let mut b1 = (word >> 16) & 0xff;
    let mut b2 = (word >> 8) & 0xff;
    let mut b3 = word & 0xff;

    if b1 == 0xff {
        b1 = 0;
        if b2 == 0xff {
            b2 = 0;
            if b3 == 0xff {
                b3 = 0;
            } else {
                b3 += 1;
            }
        } else {
            b2 += 1;
        }
    } else {
        b1 += 1;
    }

    (b1 << 16) | (b2 << 8) | b3
}

fn inc_counter(counter: &mut [u32]) {
    if let Some(first) = counter.first_mut() {
        *first = inc_word(*first);
        if *first == 0 {
            if let Some(second) = counter.get_mut(1) {
                *second = inc_word(*second);
            }
        }
    }
}

impl BlockMode for CtrGladman {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        inc_counter(&mut self.counter);
        let mut keystream = self.counter.clone();
        cipher.encrypt_block(&mut keystream);
        xor_into(block, &keystream);
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}
