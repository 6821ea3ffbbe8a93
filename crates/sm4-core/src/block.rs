//! Block representation helpers.

/// SM4 block of 16 bytes.
pub type Block = [u8; 16];

/// Size of one SM4 block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Reads a block as four big-endian words.
#[inline]
pub fn load_words(block: &Block) -> [u32; 4] {
    core::array::from_fn(|i| {
        let offset = i * 4;
        u32::from_be_bytes([
            block[offset],
            block[offset + 1],
            block[offset + 2],
            block[offset + 3],
        ])
    })
}

/// Writes four words back into a block, big-endian.
#[inline]
pub fn store_words(words: &[u32; 4]) -> Block {
    let mut block = [0u8; 16];
    for (chunk, word) in block.chunks_exact_mut(4).zip(words.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_big_endian() {
        let block: Block = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ];
        let words = load_words(&block);
        assert_eq!(words, [0x01234567, 0x89abcdef, 0xfedcba98, 0x76543210]);
        assert_eq!(store_words(&words), block);
    }
}
