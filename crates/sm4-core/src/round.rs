//! SM4 linear transforms and the Feistel round function.

use crate::sbox::Substitution;

/// Encryption linear transform `L(x) = x ^ (x <<< 2) ^ (x <<< 10) ^ (x <<< 18) ^ (x <<< 24)`.
#[inline]
pub fn linear(x: u32) -> u32 {
    x ^ x.rotate_left(2) ^ x.rotate_left(10) ^ x.rotate_left(18) ^ x.rotate_left(24)
}

/// Key-schedule linear transform `L'(x) = x ^ (x <<< 13) ^ (x <<< 23)`.
#[inline]
pub fn linear_key(x: u32) -> u32 {
    x ^ x.rotate_left(13) ^ x.rotate_left(23)
}

/// Mixed-substitution transform `T = L ∘ tau` used by the cipher rounds.
#[inline]
pub fn t<S: Substitution>(sub: &S, x: u32) -> u32 {
    linear(sub.tau(x))
}

/// Mixed-substitution transform `T' = L' ∘ tau` used by the key schedule.
#[inline]
pub fn t_key<S: Substitution>(sub: &S, x: u32) -> u32 {
    linear_key(sub.tau(x))
}

/// One Feistel round: returns `x0 ^ T(x1 ^ x2 ^ x3 ^ rk)`.
#[inline]
pub fn round<S: Substitution>(sub: &S, state: &[u32; 4], rk: u32) -> u32 {
    state[0] ^ t(sub, state[1] ^ state[2] ^ state[3] ^ rk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbox::TableLookup;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn linear_of_single_bit() {
        assert_eq!(linear(1), 1 | 1 << 2 | 1 << 10 | 1 << 18 | 1 << 24);
        assert_eq!(linear_key(1), 1 | 1 << 13 | 1 << 23);
        assert_eq!(linear(0x8000_0000), 0x8000_0000 | 1 << 1 | 1 << 9 | 1 << 17 | 1 << 23);
    }

    #[test]
    fn transforms_are_gf2_linear() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for _ in 0..256 {
            let a = rng.next_u32();
            let b = rng.next_u32();
            assert_eq!(linear(a ^ b), linear(a) ^ linear(b));
            assert_eq!(linear_key(a ^ b), linear_key(a) ^ linear_key(b));
        }
    }

    #[test]
    fn round_mixes_key_before_substitution() {
        let state = [0x0123_4567, 0x89ab_cdef, 0xfedc_ba98, 0x7654_3210];
        let rk = 0xf121_86f9;
        let expected = state[0] ^ linear(TableLookup.tau(state[1] ^ state[2] ^ state[3] ^ rk));
        assert_eq!(round(&TableLookup, &state, rk), expected);
    }
}
