//! Counter mode.

use super::{xor_into, BlockMode};
use crate::core::BlockCipherCore;

/// CTR counter block, seeded with the IV.
///
/// Only the last word of the counter is incremented, and it wraps without
/// carrying into the word before it.
#[derive(Clone, Debug)]
pub struct Ctr {
    counter: Vec<u32>,
}

impl Ctr {
    /// Creates a CTR chain whose first counter value is `iv`.
    pub fn new(iv: &[u32]) -> Self {
        Self {
            counter: iv.to_vec(),
        }
    }
}

impl BlockMode for Ctr {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        let mut keystream = self.counter.clone();
        cipher.encrypt_block(&mut keystream);

        if let Some(last) = self.counter.last_mut() {
            *last = last.wrapping_add(1);
        }
        xor_into(block, &keystream);
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl BlockCipherCore for Identity {
        fn block_size_words(&self) -> usize {
            2
        }
        fn encrypt_block(&self, _block: &mut [u32]) {}
        fn decrypt_block(&self, _block: &mut [u32]) {}
    }

    #[test]
    fn test_last_word_wraps_without_carry() {
        let mut ctr = Ctr::new(&[7, 0xffff_ffff]);
        let mut first = [0u32; 2];
        let mut second = [0u32; 2];
        ctr.process_block(&Identity, &mut first);
        ctr.process_block(&Identity, &mut second);

        assert_eq!(first, [7, 0xffff_ffff]);
        assert_eq!(second, [7, 0]);
    }
}
