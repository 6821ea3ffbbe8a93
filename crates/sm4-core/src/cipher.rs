//! SM4 key schedule and single-block encryption/decryption.

use crate::block::{load_words, store_words, Block};
use crate::key::{RoundKeys, Sm4Key, ROUNDS};
use crate::round::{round, t_key};
use crate::sbox::{Substitution, TableLookup};

/// System parameter `FK` mixed into the master key.
pub const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

/// Fixed round constants `CK`; byte `j` of `CK[i]` is `(4i + j) * 7 mod 256`.
pub const CK: [u32; ROUNDS] = [
    0x00070e15, 0x1c232a31, 0x383f464d, 0x545b6269, 0x70777e85, 0x8c939aa1, 0xa8afb6bd, 0xc4cbd2d9,
    0xe0e7eef5, 0xfc030a11, 0x181f262d, 0x343b4249, 0x50575e65, 0x6c737a81, 0x888f969d, 0xa4abb2b9,
    0xc0c7ced5, 0xdce3eaf1, 0xf8ff060d, 0x141b2229, 0x30373e45, 0x4c535a61, 0x686f767d, 0x848b9299,
    0xa0a7aeb5, 0xbcc3cad1, 0xd8dfe6ed, 0xf4fb0209, 0x10171e25, 0x2c333a41, 0x484f565d, 0x646b7279,
];

/// Expands a master key into 32 round keys with the table-lookup S-box.
pub fn expand_key(key: &Sm4Key) -> RoundKeys {
    expand_key_with(&TableLookup, key)
}

/// Expands a master key using the given substitution strategy.
pub fn expand_key_with<S: Substitution>(sub: &S, key: &Sm4Key) -> RoundKeys {
    let mk = key.words();
    let mut k = [mk[0] ^ FK[0], mk[1] ^ FK[1], mk[2] ^ FK[2], mk[3] ^ FK[3]];
    let mut round_keys = [0u32; ROUNDS];
    for (rk, ck) in round_keys.iter_mut().zip(CK.iter()) {
        let next = k[0] ^ t_key(sub, k[1] ^ k[2] ^ k[3] ^ ck);
        k = [k[1], k[2], k[3], next];
        *rk = next;
    }
    RoundKeys(round_keys)
}

/// Runs the 32-round recurrence with round keys taken in iterator order.
///
/// The output is the final four words in reverse order, `X35 X34 X33 X32`.
#[inline]
pub fn crypt_block_with<S, I>(sub: &S, block: &Block, round_keys: I) -> Block
where
    S: Substitution,
    I: IntoIterator<Item = u32>,
{
    let mut x = load_words(block);
    for rk in round_keys {
        let next = round(sub, &x, rk);
        x = [x[1], x[2], x[3], next];
    }
    store_words(&[x[3], x[2], x[1], x[0]])
}

/// Encrypts one block with the given strategy.
#[inline]
pub fn encrypt_block_with<S: Substitution>(sub: &S, block: &Block, round_keys: &RoundKeys) -> Block {
    crypt_block_with(sub, block, round_keys.as_words().iter().copied())
}

/// Decrypts one block with the given strategy: the encryption rounds with the keys reversed.
#[inline]
pub fn decrypt_block_with<S: Substitution>(sub: &S, block: &Block, round_keys: &RoundKeys) -> Block {
    crypt_block_with(sub, block, round_keys.as_words().iter().rev().copied())
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    encrypt_block_with(&TableLookup, block, round_keys)
}

/// Decrypts a single 16-byte block with pre-expanded (encryption-order) round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    decrypt_block_with(&TableLookup, block, round_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    // GB/T 32907-2016, appendix A, example 1.
    const STD_KEY: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];
    const STD_PLAIN: [u8; 16] = STD_KEY;
    const STD_CIPHER: [u8; 16] = [
        0x68, 0x1e, 0xdf, 0x34, 0xd2, 0x06, 0x96, 0x5e, 0x86, 0xb3, 0xe9, 0x4f, 0x53, 0x6e, 0x42,
        0x46,
    ];
    // Example 2: the same block encrypted 1,000,000 times.
    const STD_CIPHER_1M: [u8; 16] = [
        0x59, 0x52, 0x98, 0xc7, 0xc6, 0xfd, 0x27, 0x1f, 0x04, 0x02, 0xf8, 0x04, 0xc3, 0x3d, 0x3f,
        0x66,
    ];

    #[test]
    fn ck_follows_its_generating_rule() {
        for (i, ck) in CK.iter().enumerate() {
            let bytes: [u8; 4] = core::array::from_fn(|j| ((4 * i + j) * 7 % 256) as u8);
            assert_eq!(*ck, u32::from_be_bytes(bytes), "CK[{i}]");
        }
    }

    #[test]
    fn round_keys_match_standard() {
        let rks = expand_key(&Sm4Key::from(STD_KEY));
        assert_eq!(rks.get(0), 0xf12186f9);
        assert_eq!(rks.get(1), 0x41662b61);
        assert_eq!(rks.get(31), 0x9124a012);
    }

    #[test]
    fn encrypt_matches_standard_vector() {
        let rks = expand_key(&Sm4Key::from(STD_KEY));
        assert_eq!(encrypt_block(&STD_PLAIN, &rks), STD_CIPHER);
    }

    #[test]
    fn decrypt_matches_standard_vector() {
        let rks = expand_key(&Sm4Key::from(STD_KEY));
        assert_eq!(decrypt_block(&STD_CIPHER, &rks), STD_PLAIN);
    }

    #[test]
    fn decrypt_is_encrypt_with_reversed_keys() {
        let rks = expand_key(&Sm4Key::from(STD_KEY));
        assert_eq!(encrypt_block(&STD_CIPHER, &rks.reversed()), STD_PLAIN);
    }

    #[test]
    fn million_iterations_match_standard() {
        let rks = expand_key(&Sm4Key::from(STD_KEY));
        let mut block = STD_PLAIN;
        for _ in 0..1_000_000 {
            block = encrypt_block(&block, &rks);
        }
        assert_eq!(block, STD_CIPHER_1M);
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for _ in 0..100 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);
            let rks = expand_key(&Sm4Key::from(key_bytes));
            let ct = encrypt_block(&block, &rks);
            assert_ne!(ct, block);
            assert_eq!(decrypt_block(&ct, &rks), block);
        }
    }
}
