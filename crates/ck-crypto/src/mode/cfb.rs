//! Cipher feedback, full-block segments.

use super::{xor_into, BlockMode};
use crate::cipher::Direction;
use crate::core::BlockCipherCore;

/// CFB chaining state: the previous ciphertext block, seeded with the IV.
///
/// Both directions run the block cipher forwards.
#[derive(Clone, Debug)]
pub struct Cfb {
    direction: Direction,
    prev: Vec<u32>,
}

impl Cfb {
    /// Creates a CFB chain seeded with `iv`.
    pub fn new(direction: Direction, iv: &[u32]) -> Self {
        Self {
            direction,
            prev: iv.to_vec(),
        }
    }
}

impl BlockMode for Cfb {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        let mut keystream = self.prev.clone();
        cipher.encrypt_block(&mut keystream);

        match self.direction {
            Direction::Encrypt => {
                xor_into(block, &keystream);
                self.prev.copy_from_slice(block);
            }
            Direction::Decrypt => {
                self.prev.copy_from_slice(block);
                xor_into(block, &keystream);
            }
        }
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}
