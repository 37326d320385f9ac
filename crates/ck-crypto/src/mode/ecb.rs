//! Electronic codebook: every block is processed independently.

use super::BlockMode;
use crate::cipher::Direction;
use crate::core::BlockCipherCore;

/// ECB has no chaining state beyond its direction.
#[derive(Clone, Debug)]
pub struct Ecb {
    direction: Direction,
}

impl Ecb {
    /// Creates an ECB chain.
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

impl BlockMode for Ecb {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        match self.direction {
            Direction::Encrypt => cipher.encrypt_block(block),
            Direction::Decrypt => cipher.decrypt_block(block),
        }
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}
