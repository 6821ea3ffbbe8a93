//! SM4 S-box through the GFNI affine instructions.

use core::arch::x86_64::*;

use sm4_core::{Block, Substitution};
use sm4_field::iso::{GFNI_POST_CONST, GFNI_POST_MATRIX, GFNI_PRE_CONST, GFNI_PRE_MATRIX};

use super::lanes::{self, LaneSbox};
use crate::batch::{LaneBatch, LANES};

/// GFNI substitution strategy.
///
/// Only [`GfniSbox::detect`] constructs it, so a value proves the CPU has GFNI and SSSE3.
#[derive(Clone, Copy, Debug)]
pub struct GfniSbox {
    _detected: (),
}

impl GfniSbox {
    /// Returns the strategy if the running CPU supports it.
    pub fn detect() -> Option<Self> {
        let present = is_x86_feature_detected!("gfni") && is_x86_feature_detected!("ssse3");
        present.then_some(Self { _detected: () })
    }
}

impl LaneSbox for GfniSbox {
    #[inline(always)]
    unsafe fn sbox_lanes(x: __m128i) -> __m128i {
        let pre = _mm_set1_epi64x(GFNI_PRE_MATRIX as i64);
        let post = _mm_set1_epi64x(GFNI_POST_MATRIX as i64);
        let x = _mm_gf2p8affine_epi64_epi8::<{ GFNI_PRE_CONST as i32 }>(x, pre);
        _mm_gf2p8affineinv_epi64_epi8::<{ GFNI_POST_CONST as i32 }>(x, post)
    }
}

#[target_feature(enable = "gfni,ssse3")]
unsafe fn tau_gfni(word: u32) -> u32 {
    lanes::tau_word::<GfniSbox>(word)
}

#[target_feature(enable = "gfni,ssse3")]
unsafe fn crypt4_gfni(round_keys: &[u32; 32], blocks: &mut [Block; LANES]) {
    lanes::crypt4::<GfniSbox>(round_keys, blocks)
}

impl Substitution for GfniSbox {
    #[inline]
    fn tau(&self, word: u32) -> u32 {
        // SAFETY: `self` exists only if GFNI and SSSE3 were detected.
        unsafe { tau_gfni(word) }
    }
}

impl LaneBatch for GfniSbox {
    #[inline]
    fn crypt4(&self, round_keys: &[u32; 32], blocks: &mut [Block; LANES]) {
        // SAFETY: `self` exists only if GFNI and SSSE3 were detected.
        unsafe { crypt4_gfni(round_keys, blocks) }
    }
}
