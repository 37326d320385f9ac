//! SHA-1 compression function (FIPS 180-4).

use super::{HashCore, LengthEncoding};
use crate::word_array::WordArray;

const INIT: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

/// SHA-1 chaining state.
#[derive(Clone, Debug)]
pub struct Sha1Core {
    state: [u32; 5],
}

impl Sha1Core {
    /// Creates a core holding the SHA-1 initial value.
    pub fn new() -> Self {
        Self { state: INIT }
    }
}

impl Default for Sha1Core {
    fn default() -> Self {
        Self::new()
    }
}

impl HashCore for Sha1Core {
    fn block_size_words(&self) -> usize {
        16
    }

    fn length_encoding(&self) -> LengthEncoding {
        LengthEncoding::BigEndian64
    }

    fn reset(&mut self) {
        self.state = INIT;
    }

    fn process_block(&mut self, block: &[u32]) {
        let mut w = [0u32; 80];
        w[..16].copy_from_slice(&block[..16]);
        for t in 16..80 {
            w[t] = (w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16]).rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.state;
        for (t, word) in w.iter().enumerate() {
            let (f, k) = match t {
                0..=19 => ((b & c) | (!b & d), 0x5a82_7999),
                20..=39 => (b ^ c ^ d, 0x6ed9_eba1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8f1b_bcdc),
                _ => (b ^ c ^ d, 0xca62_c1d6),
            };
            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(*word);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        for (s, v) in self.state.iter_mut().zip([a, b, c, d, e]) {
            *s = s.wrapping_add(v);
        }
    }

    fn output(&self) -> WordArray {
        WordArray::from(self.state.to_vec())
    }

    fn box_clone(&self) -> Box<dyn HashCore> {
        Box::new(self.clone())
    }
}
