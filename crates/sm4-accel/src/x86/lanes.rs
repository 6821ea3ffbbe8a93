//! Lane-parallel SM4 rounds over four blocks held in 128-bit registers.

use core::arch::x86_64::*;

use sm4_core::Block;

use crate::batch::LANES;

/// Per-word byte swap between memory order and lane word order.
const BSWAP32: [u8; 16] = [3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12];
/// Rotate each 32-bit lane left by 8, 16 and 24 bits.
const ROL8: [u8; 16] = [3, 0, 1, 2, 7, 4, 5, 6, 11, 8, 9, 10, 15, 12, 13, 14];
const ROL16: [u8; 16] = [2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13];
const ROL24: [u8; 16] = [1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12];

/// S-box over all 16 bytes of a register.
pub(crate) trait LaneSbox {
    /// # Safety
    /// The CPU must support the implementor's target features.
    unsafe fn sbox_lanes(x: __m128i) -> __m128i;
}

#[inline(always)]
pub(crate) unsafe fn load_bytes(bytes: &[u8; 16]) -> __m128i {
    _mm_loadu_si128(bytes.as_ptr().cast())
}

/// Transposes a 4×4 matrix of 32-bit words; its own inverse.
#[inline(always)]
unsafe fn transpose(x0: __m128i, x1: __m128i, x2: __m128i, x3: __m128i) -> [__m128i; 4] {
    let t0 = _mm_unpacklo_epi32(x0, x1);
    let t1 = _mm_unpackhi_epi32(x0, x1);
    let t2 = _mm_unpacklo_epi32(x2, x3);
    let t3 = _mm_unpackhi_epi32(x2, x3);
    [
        _mm_unpacklo_epi64(t0, t2),
        _mm_unpackhi_epi64(t0, t2),
        _mm_unpacklo_epi64(t1, t3),
        _mm_unpackhi_epi64(t1, t3),
    ]
}

/// `L` on four words: `x ^ rol2(x ^ rol8(x) ^ rol16(x)) ^ rol24(x)`.
#[inline(always)]
unsafe fn linear_lanes(x: __m128i) -> __m128i {
    let r8 = _mm_shuffle_epi8(x, load_bytes(&ROL8));
    let r16 = _mm_shuffle_epi8(x, load_bytes(&ROL16));
    let r24 = _mm_shuffle_epi8(x, load_bytes(&ROL24));
    let y = _mm_xor_si128(_mm_xor_si128(x, r8), r16);
    let y = _mm_xor_si128(_mm_slli_epi32::<2>(y), _mm_srli_epi32::<30>(y));
    _mm_xor_si128(_mm_xor_si128(x, y), r24)
}

/// Runs the 32 rounds over four blocks in place.
///
/// After the byte swap and transpose, register `k` holds word `k` of every block,
/// so each round is one XOR-sum, one S-box pass and one `L` for all four blocks.
///
/// # Safety
/// The CPU must support SSSE3 and whatever `S` requires.
#[inline(always)]
pub(crate) unsafe fn crypt4<S: LaneSbox>(round_keys: &[u32; 32], blocks: &mut [Block; LANES]) {
    let bswap = load_bytes(&BSWAP32);
    let ptr = blocks.as_mut_ptr().cast::<u8>();

    let x0 = _mm_shuffle_epi8(_mm_loadu_si128(ptr.cast()), bswap);
    let x1 = _mm_shuffle_epi8(_mm_loadu_si128(ptr.add(16).cast()), bswap);
    let x2 = _mm_shuffle_epi8(_mm_loadu_si128(ptr.add(32).cast()), bswap);
    let x3 = _mm_shuffle_epi8(_mm_loadu_si128(ptr.add(48).cast()), bswap);
    let [mut t0, mut t1, mut t2, mut t3] = transpose(x0, x1, x2, x3);

    for &rk in round_keys {
        let x = _mm_xor_si128(_mm_xor_si128(t1, t2), _mm_xor_si128(t3, _mm_set1_epi32(rk as i32)));
        let x = linear_lanes(S::sbox_lanes(x));
        let next = _mm_xor_si128(t0, x);
        t0 = t1;
        t1 = t2;
        t2 = t3;
        t3 = next;
    }

    // Output order is X35 X34 X33 X32.
    let [y0, y1, y2, y3] = transpose(t3, t2, t1, t0);
    _mm_storeu_si128(ptr.cast(), _mm_shuffle_epi8(y0, bswap));
    _mm_storeu_si128(ptr.add(16).cast(), _mm_shuffle_epi8(y1, bswap));
    _mm_storeu_si128(ptr.add(32).cast(), _mm_shuffle_epi8(y2, bswap));
    _mm_storeu_si128(ptr.add(48).cast(), _mm_shuffle_epi8(y3, bswap));
}

/// Substitutes the four bytes of one word using the low lane of a register.
///
/// # Safety
/// Same as [`LaneSbox::sbox_lanes`].
#[inline(always)]
pub(crate) unsafe fn tau_word<S: LaneSbox>(word: u32) -> u32 {
    let x = _mm_cvtsi32_si128(word as i32);
    _mm_cvtsi128_si32(S::sbox_lanes(x)) as u32
}
