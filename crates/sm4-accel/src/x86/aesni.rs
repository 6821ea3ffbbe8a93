//! SM4 S-box through the AES-NI `aesenclast` inversion.

use core::arch::x86_64::*;

use sm4_core::{Block, Substitution};
use sm4_field::iso::{AESNI_POST, AESNI_PRE, AESNI_ROUND_KEY, INV_SHIFT_ROWS};

use super::lanes::{self, load_bytes, LaneSbox};
use crate::batch::{LaneBatch, LANES};

/// AES-NI substitution strategy.
///
/// Only [`AesNiSbox::detect`] constructs it, so a value proves the CPU has AES-NI and SSSE3.
#[derive(Clone, Copy, Debug)]
pub struct AesNiSbox {
    _detected: (),
}

impl AesNiSbox {
    /// Returns the strategy if the running CPU supports it.
    pub fn detect() -> Option<Self> {
        let present = is_x86_feature_detected!("aes") && is_x86_feature_detected!("ssse3");
        present.then_some(Self { _detected: () })
    }
}

impl LaneSbox for AesNiSbox {
    #[inline(always)]
    unsafe fn sbox_lanes(x: __m128i) -> __m128i {
        let c0f = _mm_set1_epi8(0x0f);

        // Pre-map into the AES field representation, one nibble table per half.
        let lo = _mm_shuffle_epi8(load_bytes(&AESNI_PRE.lo), _mm_and_si128(x, c0f));
        let hi = _mm_and_si128(_mm_srli_epi64::<4>(x), c0f);
        let x = _mm_xor_si128(_mm_shuffle_epi8(load_bytes(&AESNI_PRE.hi), hi), lo);

        // aesenclast = ShiftRows, SubBytes, xor key; pre-shuffle cancels ShiftRows.
        let x = _mm_shuffle_epi8(x, load_bytes(&INV_SHIFT_ROWS));
        let x = _mm_aesenclast_si128(x, _mm_set1_epi8(AESNI_ROUND_KEY as i8));

        // Post-map; the low table is indexed by the complemented nibble.
        let lo = _mm_shuffle_epi8(load_bytes(&AESNI_POST.lo), _mm_andnot_si128(x, c0f));
        let hi = _mm_and_si128(_mm_srli_epi64::<4>(x), c0f);
        _mm_xor_si128(_mm_shuffle_epi8(load_bytes(&AESNI_POST.hi), hi), lo)
    }
}

#[target_feature(enable = "aes,ssse3")]
unsafe fn tau_aesni(word: u32) -> u32 {
    lanes::tau_word::<AesNiSbox>(word)
}

#[target_feature(enable = "aes,ssse3")]
unsafe fn crypt4_aesni(round_keys: &[u32; 32], blocks: &mut [Block; LANES]) {
    lanes::crypt4::<AesNiSbox>(round_keys, blocks)
}

impl Substitution for AesNiSbox {
    #[inline]
    fn tau(&self, word: u32) -> u32 {
        // SAFETY: `self` exists only if AES-NI and SSSE3 were detected.
        unsafe { tau_aesni(word) }
    }
}

impl LaneBatch for AesNiSbox {
    #[inline]
    fn crypt4(&self, round_keys: &[u32; 32], blocks: &mut [Block; LANES]) {
        // SAFETY: `self` exists only if AES-NI and SSSE3 were detected.
        unsafe { crypt4_aesni(round_keys, blocks) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm4_core::{encrypt_block_with, expand_key, Sm4Key, TableLookup, SBOX};

    #[test]
    fn substitutes_every_byte_in_every_lane() {
        let Some(sbox) = AesNiSbox::detect() else {
            eprintln!("AES-NI not available, skipping");
            return;
        };
        for b in 0..=255u8 {
            let word = u32::from_be_bytes([b, b.wrapping_add(1), b.wrapping_add(2), b.wrapping_add(3)]);
            assert_eq!(sbox.tau(word), TableLookup.tau(word), "byte {b:#04x}");
        }
        assert_eq!(sbox.tau(0) >> 24, u32::from(SBOX[0]));
    }

    #[test]
    fn batch_matches_scalar_rounds() {
        let Some(sbox) = AesNiSbox::detect() else {
            eprintln!("AES-NI not available, skipping");
            return;
        };
        let rks = expand_key(&Sm4Key::from([0x5a; 16]));
        let mut blocks: [Block; LANES] = core::array::from_fn(|i| [i as u8 * 17; 16]);
        let expected = blocks.map(|b| encrypt_block_with(&TableLookup, &b, &rks));
        sbox.crypt4(rks.as_words(), &mut blocks);
        assert_eq!(blocks, expected);
    }
}
