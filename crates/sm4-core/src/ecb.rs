//! Electronic-codebook processing of whole buffers with the reference backend.

use crate::block::{Block, BLOCK_SIZE};
use crate::cipher::{decrypt_block, encrypt_block, expand_key};
use crate::error::{Error, Result};
use crate::key::{RoundKeys, Sm4Key};

/// Fails with [`Error::BlockAlignment`] unless `len` is a whole number of blocks.
#[inline]
pub fn check_alignment(len: usize) -> Result<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(Error::BlockAlignment { len });
    }
    Ok(())
}

/// Encrypts every 16-byte block of `plaintext` independently.
///
/// An empty input yields an empty output.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let round_keys = expand_key(&Sm4Key::try_from(key)?);
    let mut data = plaintext.to_vec();
    apply_in_place(&mut data, &round_keys, encrypt_block)?;
    Ok(data)
}

/// Decrypts every 16-byte block of `ciphertext` independently.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let round_keys = expand_key(&Sm4Key::try_from(key)?);
    let mut data = ciphertext.to_vec();
    apply_in_place(&mut data, &round_keys, decrypt_block)?;
    Ok(data)
}

/// Encrypts a buffer in place with pre-expanded round keys.
pub fn encrypt_in_place(data: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
    apply_in_place(data, round_keys, encrypt_block)
}

/// Decrypts a buffer in place with pre-expanded (encryption-order) round keys.
pub fn decrypt_in_place(data: &mut [u8], round_keys: &RoundKeys) -> Result<()> {
    apply_in_place(data, round_keys, decrypt_block)
}

fn apply_in_place(
    data: &mut [u8],
    round_keys: &RoundKeys,
    op: fn(&Block, &RoundKeys) -> Block,
) -> Result<()> {
    check_alignment(data.len())?;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        chunk.copy_from_slice(&op(&block, round_keys));
    }
    Ok(())
}
