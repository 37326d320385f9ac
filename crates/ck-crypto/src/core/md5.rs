//! MD5 compression function (RFC 1321).
//!
//! Message words arrive big-endian packed like every other buffer in the
//! crate; MD5 is little-endian, so words are byte-swapped on the way in and on
//! the way out.

use super::{HashCore, LengthEncoding};
use crate::word_array::WordArray;

const INIT: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

const SHIFTS: [u32; 16] = [7, 12, 17, 22, 5, 9, 14, 20, 4, 11, 16, 23, 6, 10, 15, 21];

/// MD5 chaining state.
#[derive(Clone, Debug)]
pub struct Md5Core {
    state: [u32; 4],
}

impl Md5Core {
    /// Creates a core holding the MD5 initial value.
    pub fn new() -> Self {
        Self { state: INIT }
    }
}

impl Default for Md5Core {
    fn default() -> Self {
        Self::new()
    }
}

impl HashCore for Md5Core {
    fn block_size_words(&self) -> usize {
        16
    }

    fn length_encoding(&self) -> LengthEncoding {
        LengthEncoding::LittleEndian64
    }

    fn reset(&mut self) {
        self.state = INIT;
    }

    fn process_block(&mut self, block: &[u32]) {
        let mut m = [0u32; 16];
        for (dst, src) in m.iter_mut().zip(block) {
            *dst = src.swap_bytes();
        }

        let [mut a, mut b, mut c, mut d] = self.state;
        for i in 0..64 {
            let (f, g) = match i / 16 {
                0 => ((b & c) | (!b & d), i),
                1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                2 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let shift = SHIFTS[(i / 16) * 4 + i % 4];
            let rotated = a
                .wrapping_add(f)
                .wrapping_add(K[i])
                .wrapping_add(m[g])
                .rotate_left(shift);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(rotated);
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }

    fn output(&self) -> WordArray {
        WordArray::from(self.state.iter().map(|w| w.swap_bytes()).collect::<Vec<u32>>())
    }

    fn box_clone(&self) -> Box<dyn HashCore> {
        Box::new(self.clone())
    }
}
