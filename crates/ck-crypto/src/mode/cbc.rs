//! Cipher block chaining.

use super::{xor_into, BlockMode};
use crate::cipher::Direction;
use crate::core::BlockCipherCore;

/// CBC chaining state: the previous ciphertext block, seeded with the IV.
#[derive(Clone, Debug)]
pub struct Cbc {
    direction: Direction,
    prev: Vec<u32>,
}

impl Cbc {
    /// Creates a CBC chain seeded with `iv`.
    pub fn new(direction: Direction, iv: &[u32]) -> Self {
        Self {
            direction,
            prev: iv.to_vec(),
        }
    }
}

impl BlockMode for Cbc {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        match self.direction {
            Direction::Encrypt => {
                xor_into(block, &self.prev);
                cipher.encrypt_block(block);
                self.prev.copy_from_slice(block);
            }
            Direction::Decrypt => {
                let input = block.to_vec();
                cipher.decrypt_block(block);
                xor_into(block, &self.prev);
                self.prev = input;
            }
        }
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}
