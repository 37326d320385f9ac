//! Incremental block buffering shared by every hasher and cipher.
//!
//! Callers append arbitrary amounts of data; the processor hands complete
//! blocks to a per-block transform and keeps the remainder buffered. A
//! processor can be told to hold back a number of complete blocks even when
//! they are ready, which is how block-cipher decryptors keep the
//! padding-bearing final block until `finalize`.

use crate::word_array::WordArray;

/// Buffers appended data and releases it in whole blocks.
#[derive(Clone, Debug)]
pub struct BlockProcessor {
    data: WordArray,
    total_bytes_in: u64,
    block_size_words: usize,
    min_buffer_blocks: usize,
}

impl BlockProcessor {
    /// Creates a processor for blocks of `block_size_words` words that releases
    /// every complete block.
    pub fn new(block_size_words: usize) -> Self {
        Self::with_min_buffer(block_size_words, 0)
    }

    /// Creates a processor that always keeps `min_buffer_blocks` complete
    /// blocks buffered until a flush.
    pub fn with_min_buffer(block_size_words: usize, min_buffer_blocks: usize) -> Self {
        assert!(block_size_words > 0, "block size must be at least one word");
        Self {
            data: WordArray::new(),
            total_bytes_in: 0,
            block_size_words,
            min_buffer_blocks,
        }
    }

    /// Block size in words.
    pub fn block_size_words(&self) -> usize {
        self.block_size_words
    }

    /// Block size in bytes.
    pub fn block_size_bytes(&self) -> usize {
        self.block_size_words * 4
    }

    /// Number of complete blocks held back on non-flush releases.
    pub fn min_buffer_blocks(&self) -> usize {
        self.min_buffer_blocks
    }

    /// Bytes currently buffered and not yet released.
    pub fn buffered_bytes(&self) -> usize {
        self.data.sig_bytes()
    }

    /// Total bytes appended since the last reset.
    pub fn total_bytes_in(&self) -> u64 {
        self.total_bytes_in
    }

    /// The unreleased tail.
    pub fn data(&self) -> &WordArray {
        &self.data
    }

    /// Mutable access to the unreleased tail, used for final padding.
    pub fn data_mut(&mut self) -> &mut WordArray {
        &mut self.data
    }

    /// Drops all buffered data and the byte counter.
    pub fn reset(&mut self) {
        self.data = WordArray::new();
        self.total_bytes_in = 0;
    }

    /// Appends `data` to the buffer.
    pub fn append(&mut self, data: &WordArray) {
        self.data.concat(data);
        self.total_bytes_in += data.sig_bytes() as u64;
    }

    /// Runs `transform` over every ready block and removes those blocks from
    /// the buffer, returning them.
    ///
    /// Without `flush`, only complete blocks beyond the held-back minimum are
    /// released. With `flush`, everything is released; a ragged final block is
    /// zero-extended for the transform and returned with its exact byte length.
    pub fn release_ready_blocks<F>(&mut self, flush: bool, mut transform: F) -> WordArray
    where
        F: FnMut(&mut [u32]),
    {
        let block_bytes = self.block_size_bytes();
        let sig_bytes = self.data.sig_bytes();

        let blocks_ready = if flush {
            sig_bytes.div_ceil(block_bytes)
        } else {
            (sig_bytes / block_bytes).saturating_sub(self.min_buffer_blocks)
        };
        let words_ready = blocks_ready * self.block_size_words;
        let bytes_ready = (words_ready * 4).min(sig_bytes);

        if words_ready == 0 {
            return WordArray::new();
        }

        if flush {
            self.data.clamp();
        }
        let words = self.data.words_vec_mut();
        if words.len() < words_ready {
            words.resize(words_ready, 0);
        }
        for block in words[..words_ready].chunks_exact_mut(self.block_size_words) {
            transform(block);
        }

        let released = self.data.drain_front(words_ready, bytes_ready);
        WordArray::from_words(released, bytes_ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_blocks(processor: &mut BlockProcessor, flush: bool) -> (usize, WordArray) {
        let mut seen = 0;
        let out = processor.release_ready_blocks(flush, |_| seen += 1);
        (seen, out)
    }

    #[test]
    fn test_releases_only_complete_blocks() {
        let mut processor = BlockProcessor::new(4);
        processor.append(&WordArray::from_bytes(&[7u8; 37]));

        let (seen, out) = count_blocks(&mut processor, false);
        assert_eq!(seen, 2);
        assert_eq!(out.sig_bytes(), 32);
        assert_eq!(processor.buffered_bytes(), 5);
        assert_eq!(processor.total_bytes_in(), 37);
    }

    #[test]
    fn test_holds_back_minimum_blocks() {
        let mut processor = BlockProcessor::with_min_buffer(4, 1);
        processor.append(&WordArray::from_bytes(&[1u8; 16]));

        let (seen, out) = count_blocks(&mut processor, false);
        assert_eq!(seen, 0);
        assert!(out.is_empty());
        assert_eq!(processor.buffered_bytes(), 16);

        processor.append(&WordArray::from_bytes(&[2u8; 20]));
        let (seen, out) = count_blocks(&mut processor, false);
        assert_eq!(seen, 1);
        assert_eq!(out.to_bytes(), vec![1u8; 16]);
        assert_eq!(processor.buffered_bytes(), 20);
    }

    #[test]
    fn test_flush_releases_ragged_tail() {
        let mut processor = BlockProcessor::with_min_buffer(4, 1);
        processor.append(&WordArray::from_bytes(&[9u8; 21]));

        let mut blocks = Vec::new();
        let out = processor.release_ready_blocks(true, |block| blocks.push(block.to_vec()));
        assert_eq!(blocks.len(), 2);
        // Zero-extended second block
        assert_eq!(blocks[1], vec![0x0909_0909, 0x0900_0000, 0, 0]);
        assert_eq!(out.sig_bytes(), 21);
        assert_eq!(processor.buffered_bytes(), 0);
    }

    #[test]
    fn test_transform_output_is_returned() {
        let mut processor = BlockProcessor::new(1);
        processor.append(&WordArray::from_bytes(&[0u8; 8]));
        let out = processor.release_ready_blocks(false, |block| block[0] = 0xffff_ffff);
        assert_eq!(out.to_bytes(), vec![0xff; 8]);
    }

    #[test]
    fn test_flush_empty_buffer() {
        let mut processor = BlockProcessor::new(16);
        let (seen, out) = count_blocks(&mut processor, true);
        assert_eq!(seen, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_reset_clears_counter() {
        let mut processor = BlockProcessor::new(16);
        processor.append(&WordArray::from("abc"));
        processor.reset();
        assert_eq!(processor.buffered_bytes(), 0);
        assert_eq!(processor.total_bytes_in(), 0);
    }
}
