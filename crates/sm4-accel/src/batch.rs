//! Splits a buffer into four-block lane batches plus a scalar tail.

use sm4_core::{crypt_block_with, Block, Substitution, BLOCK_SIZE};

/// Blocks processed together by one lane-parallel pass.
pub const LANES: usize = 4;

/// A substitution strategy with a four-block lane kernel.
///
/// `crypt4` runs the 32 rounds on four blocks at once and must give the same result
/// as four calls to [`sm4_core::crypt_block_with`] with the same strategy and keys.
/// Passing a reversed schedule decrypts.
pub trait LaneBatch: Substitution {
    /// Runs all rounds over four blocks in place.
    fn crypt4(&self, round_keys: &[u32; 32], blocks: &mut [Block; LANES]);
}

/// Runs every block of `data` through the rounds, four at a time where possible.
///
/// `data.len()` must already be a multiple of the block size.
#[cfg_attr(not(target_arch = "x86_64"), allow(dead_code))]
pub(crate) fn crypt_batched<B: LaneBatch>(batch: &B, round_keys: &[u32; 32], data: &mut [u8]) {
    debug_assert_eq!(data.len() % BLOCK_SIZE, 0);
    let (blocks, _) = data.as_chunks_mut::<BLOCK_SIZE>();
    let (groups, tail) = blocks.as_chunks_mut::<LANES>();
    for group in groups {
        batch.crypt4(round_keys, group);
    }
    crypt_scalar(batch, round_keys, tail);
}

/// Runs blocks one at a time.
pub(crate) fn crypt_scalar<S: Substitution>(sub: &S, round_keys: &[u32; 32], blocks: &mut [Block]) {
    for block in blocks {
        *block = crypt_block_with(sub, block, round_keys.iter().copied());
    }
}
