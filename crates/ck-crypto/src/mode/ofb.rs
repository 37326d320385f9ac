//! Output feedback. Encryption and decryption are the same operation.

use super::{xor_into, BlockMode};
use crate::core::BlockCipherCore;

/// OFB keystream register, seeded with the IV.
#[derive(Clone, Debug)]
pub struct Ofb {
    keystream: Vec<u32>,
}

impl Ofb {
    /// Creates an OFB chain seeded with `iv`.
    pub fn new(iv: &[u32]) -> Self {
        Self {
            keystream: iv.to_vec(),
        }
    }
}

impl BlockMode for Ofb {
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]) {
        cipher.encrypt_block(&mut self.keystream);
        xor_into(block, &self.keystream);
    }

    fn box_clone(&self) -> Box<dyn BlockMode> {
        Box::new(self.clone())
    }
}
