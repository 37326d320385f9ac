//! SHA-2 family cores backed by the `sha2` crate's compression functions.
//!
//! SHA-224 and SHA-384 share the compression of SHA-256 and SHA-512 and only
//! differ in initial value and output truncation.

use sha2::digest::consts::{U128, U64};
use sha2::digest::generic_array::GenericArray;
use sha2::{compress256, compress512};

use super::{words_to_bytes, HashCore, LengthEncoding};
use crate::word_array::WordArray;

const SHA224_INIT: [u32; 8] = [
    0xc105_9ed8, 0x367c_d507, 0x3070_dd17, 0xf70e_5939, 0xffc0_0b31, 0x6858_1511, 0x64f9_8fa7,
    0xbefa_4fa4,
];

const SHA256_INIT: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a, 0x510e_527f, 0x9b05_688c, 0x1f83_d9ab,
    0x5be0_cd19,
];

const SHA384_INIT: [u64; 8] = [
    0xcbbb_9d5d_c105_9ed8,
    0x629a_292a_367c_d507,
    0x9159_015a_3070_dd17,
    0x152f_ecd8_f70e_5939,
    0x6733_2667_ffc0_0b31,
    0x8eb4_4a87_6858_1511,
    0xdb0c_2e0d_64f9_8fa7,
    0x47b5_481d_befa_4fa4,
];

const SHA512_INIT: [u64; 8] = [
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
    0x3c6e_f372_fe94_f82b,
    0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1,
    0x9b05_688c_2b3e_6c1f,
    0x1f83_d9ab_fb41_bd6b,
    0x5be0_cd19_137e_2179,
];

/// SHA-224 / SHA-256 chaining state.
#[derive(Clone, Debug)]
pub struct Sha256Core {
    init: [u32; 8],
    state: [u32; 8],
    output_bytes: usize,
}

impl Sha256Core {
    /// SHA-256 core.
    pub fn sha256() -> Self {
        Self {
            init: SHA256_INIT,
            state: SHA256_INIT,
            output_bytes: 32,
        }
    }

    /// SHA-224 core.
    pub fn sha224() -> Self {
        Self {
            init: SHA224_INIT,
            state: SHA224_INIT,
            output_bytes: 28,
        }
    }
}

impl HashCore for Sha256Core {
    fn block_size_words(&self) -> usize {
        16
    }

    fn length_encoding(&self) -> LengthEncoding {
        LengthEncoding::BigEndian64
    }

    fn reset(&mut self) {
        self.state = self.init;
    }

    fn process_block(&mut self, block: &[u32]) {
        let mut bytes = [0u8; 64];
        words_to_bytes(block, &mut bytes);
        let block: GenericArray<u8, U64> = GenericArray::clone_from_slice(&bytes);
        compress256(&mut self.state, &[block]);
    }

    fn output(&self) -> WordArray {
        WordArray::from_words(self.state.to_vec(), self.output_bytes)
    }

    fn box_clone(&self) -> Box<dyn HashCore> {
        Box::new(self.clone())
    }
}

/// SHA-384 / SHA-512 chaining state.
#[derive(Clone, Debug)]
pub struct Sha512Core {
    init: [u64; 8],
    state: [u64; 8],
    output_bytes: usize,
}

impl Sha512Core {
    /// SHA-512 core.
    pub fn sha512() -> Self {
        Self {
            init: SHA512_INIT,
            state: SHA512_INIT,
            output_bytes: 64,
        }
    }

    /// SHA-384 core.
    pub fn sha384() -> Self {
        Self {
            init: SHA384_INIT,
            state: SHA384_INIT,
            output_bytes: 48,
        }
    }
}

impl HashCore for Sha512Core {
    fn block_size_words(&self) -> usize {
        32
    }

    fn length_encoding(&self) -> LengthEncoding {
        LengthEncoding::BigEndian128
    }

    fn reset(&mut self) {
        self.state = self.init;
    }

    fn process_block(&mut self, block: &[u32]) {
        let mut bytes = [0u8; 128];
        words_to_bytes(block, &mut bytes);
        let block: GenericArray<u8, U128> = GenericArray::clone_from_slice(&bytes);
        compress512(&mut self.state, &[block]);
    }

    fn output(&self) -> WordArray {
        let words = self
            .state
            .iter()
            .flat_map(|w| [(w >> 32) as u32, *w as u32])
            .collect();
        WordArray::from_words(words, self.output_bytes)
    }

    fn box_clone(&self) -> Box<dyn HashCore> {
        Box::new(self.clone())
    }
}
