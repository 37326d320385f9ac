//! Block-cipher chaining modes.
//!
//! A [`Mode`] is the user-facing choice; [`Mode::build`] turns it into a
//! [`BlockMode`] strategy carrying the per-message chaining state. The cipher
//! engine hands each released block to the strategy together with the keyed
//! block cipher.

mod cbc;
mod cfb;
mod ctr;
mod ctr_gladman;
mod ecb;
mod ofb;

pub use cbc::Cbc;
pub use cfb::Cfb;
pub use ctr::Ctr;
pub use ctr_gladman::CtrGladman;
pub use ecb::Ecb;
pub use ofb::Ofb;

use std::fmt;
use std::str::FromStr;

use crate::cipher::Direction;
use crate::core::BlockCipherCore;
use crate::error::{CryptoError, Result};

/// Per-message chaining state for one direction of a block cipher.
pub trait BlockMode: Send + Sync {
    /// Transforms one block in place, updating the chaining state.
    fn process_block(&mut self, cipher: &dyn BlockCipherCore, block: &mut [u32]);

    /// Deep copy behind a trait object.
    fn box_clone(&self) -> Box<dyn BlockMode>;
}

/// Block-cipher chaining mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Cipher block chaining.
    #[default]
    Cbc,
    /// Cipher feedback.
    Cfb,
    /// Output feedback.
    Ofb,
    /// Counter mode; the last counter word wraps without carry.
    Ctr,
    /// Counter mode with Gladman's byte-wise counter increment.
    CtrGladman,
    /// Electronic codebook.
    Ecb,
}

impl Mode {
    /// Every chaining mode.
    pub const ALL: [Mode; 6] = [
        Self::Cbc,
        Self::Cfb,
        Self::Ofb,
        Self::Ctr,
        Self::CtrGladman,
        Self::Ecb,
    ];

    /// Kebab-case name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cbc => "cbc",
            Self::Cfb => "cfb",
            Self::Ofb => "ofb",
            Self::Ctr => "ctr",
            Self::CtrGladman => "ctr-gladman",
            Self::Ecb => "ecb",
        }
    }

    /// Whether the mode needs an initialization vector.
    pub fn requires_iv(self) -> bool {
        !matches!(self, Self::Ecb)
    }

    /// Creates fresh chaining state for `direction`, seeded with `iv`.
    ///
    /// `iv` must already hold exactly one block of words for every mode
    /// except ECB, which ignores it.
    pub fn build(self, direction: Direction, iv: &[u32]) -> Box<dyn BlockMode> {
        match self {
            Self::Cbc => Box::new(Cbc::new(direction, iv)),
            Self::Cfb => Box::new(Cfb::new(direction, iv)),
            Self::Ofb => Box::new(Ofb::new(iv)),
            Self::Ctr => Box::new(Ctr::new(iv)),
            Self::CtrGladman => Box::new(CtrGladman::new(iv)),
            Self::Ecb => Box::new(Ecb::new(direction)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "cbc" => Ok(Self::Cbc),
            "cfb" => Ok(Self::Cfb),
            "ofb" => Ok(Self::Ofb),
            "ctr" => Ok(Self::Ctr),
            "ctr-gladman" | "ctrgladman" => Ok(Self::CtrGladman),
            "ecb" => Ok(Self::Ecb),
            _ => Err(CryptoError::UnknownAlgorithm {
                kind: "mode",
                name: s.to_string(),
            }),
        }
    }
}

fn xor_into(block: &mut [u32], keystream: &[u32]) {
    for (word, key) in block.iter_mut().zip(keystream) {
        *word ^= key;
    }
}
