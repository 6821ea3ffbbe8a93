//! Field-isomorphism constants for the hardware SM4 S-boxes, and software models of
//! the exact data paths the hardware backends evaluate.
//!
//! SM4's S-box is an affine map, a field inversion and a second affine map, with the
//! inversion taken in a different representation of GF(2^8) than AES uses. Moving
//! into the AES representation before the inversion and back afterwards folds the
//! basis change into the two affine maps, so AES hardware can do the inversion:
//!
//! - GFNI: `gf2p8affineqb(x, PRE, 0x65)` then `gf2p8affineinvqb(., POST, 0xd3)`.
//! - AES-NI: a nibble-table pre-map, `aesenclast` with round key `0x0f` (whose
//!   ShiftRows is cancelled by shuffling with [`INV_SHIFT_ROWS`] first), and a
//!   nibble-table post-map whose low nibble is read complemented.
//!
//! The sm4-accel kernels load these constants directly; the tests here prove they
//! reproduce [`sm4_core::SBOX`] on every input without needing the instructions.

use sm4_core::SBOX;

use crate::affine::{Affine8, NibbleTables};
use crate::gf256::{aes_sbox, inv, AES_AFFINE};

/// `gf2p8affineqb` matrix operand taking SM4's field representation into AES's.
pub const GFNI_PRE_MATRIX: u64 = 0x34ac_259e_022d_bc52;
/// Immediate constant for the pre-map.
pub const GFNI_PRE_CONST: u8 = 0x65;
/// `gf2p8affineinvqb` matrix operand taking the inverted value back to SM4's output.
pub const GFNI_POST_MATRIX: u64 = 0xd72d_8e51_1e6c_8b19;
/// Immediate constant for the post-map.
pub const GFNI_POST_CONST: u8 = 0xd3;

/// AES-NI pre-map as `pshufb` tables.
pub const AESNI_PRE: NibbleTables = NibbleTables {
    lo: [
        0x01, 0x07, 0x72, 0x74, 0xe4, 0xe2, 0x97, 0x91, 0x57, 0x51, 0x24, 0x22, 0xb2, 0xb4, 0xc1,
        0xc7,
    ],
    hi: [
        0x00, 0xa2, 0x49, 0xeb, 0x09, 0xab, 0x40, 0xe2, 0x12, 0xb0, 0x5b, 0xf9, 0x1b, 0xb9, 0x52,
        0xf0,
    ],
};

/// AES-NI post-map as `pshufb` tables; `lo` is indexed by the complemented low nibble.
pub const AESNI_POST: NibbleTables = NibbleTables {
    lo: [
        0x34, 0x08, 0x9d, 0xa1, 0xce, 0xf2, 0x67, 0x5b, 0x82, 0xbe, 0x2b, 0x17, 0x78, 0x44, 0xd1,
        0xed,
    ],
    hi: [
        0x00, 0xdc, 0xaf, 0x73, 0xdd, 0x01, 0x72, 0xae, 0xbf, 0x63, 0x10, 0xcc, 0x62, 0xbe, 0xcd,
        0x11,
    ],
};

/// Round key byte broadcast into `aesenclast`.
pub const AESNI_ROUND_KEY: u8 = 0x0f;

/// Byte shuffle that undoes the ShiftRows step of `aesenclast`.
pub const INV_SHIFT_ROWS: [u8; 16] = [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3];

/// Software model of one byte lane of `gf2p8affineqb`.
pub fn gf2p8affine(x: u8, matrix: u64, imm: u8) -> u8 {
    Affine8::from_gfni(matrix, imm).apply(x)
}

/// Software model of one byte lane of `gf2p8affineinvqb`: the affine map after inversion.
pub fn gf2p8affineinv(x: u8, matrix: u64, imm: u8) -> u8 {
    gf2p8affine(inv(x), matrix, imm)
}

/// The GFNI backend's S-box, evaluated in software.
pub fn gfni_sbox(x: u8) -> u8 {
    let y = gf2p8affine(x, GFNI_PRE_MATRIX, GFNI_PRE_CONST);
    gf2p8affineinv(y, GFNI_POST_MATRIX, GFNI_POST_CONST)
}

fn aesni_post(z: u8) -> u8 {
    AESNI_POST.lo[(!z & 0x0f) as usize] ^ AESNI_POST.hi[(z >> 4) as usize]
}

/// The AES-NI backend's S-box on one byte lane, evaluated in software.
pub fn aesni_sbox(x: u8) -> u8 {
    let y = AESNI_PRE.apply(x);
    aesni_post(aes_sbox(y) ^ AESNI_ROUND_KEY)
}

fn shift_rows(state: &[u8; 16]) -> [u8; 16] {
    core::array::from_fn(|i| state[(i + 4 * (i % 4)) % 16])
}

/// The AES-NI backend's S-box on a full 16-byte register, shuffles included.
pub fn aesni_sbox_state(state: &[u8; 16]) -> [u8; 16] {
    let pre: [u8; 16] = core::array::from_fn(|i| AESNI_PRE.apply(state[i]));
    let unshifted: [u8; 16] = core::array::from_fn(|i| pre[INV_SHIFT_ROWS[i] as usize]);
    let rounded = shift_rows(&unshifted).map(|b| aes_sbox(b) ^ AESNI_ROUND_KEY);
    rounded.map(aesni_post)
}

/// First input on which a candidate S-box disagrees with SM4's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("S-box mismatch at {input:#04x}: expected {expected:#04x}, got {actual:#04x}")]
pub struct SboxMismatch {
    /// Input byte.
    pub input: u8,
    /// SM4 table value.
    pub expected: u8,
    /// Candidate value.
    pub actual: u8,
}

/// Checks a candidate S-box against the SM4 table on all 256 inputs.
pub fn verify_sbox(candidate: impl Fn(u8) -> u8) -> Result<(), SboxMismatch> {
    for input in 0..=255u8 {
        let expected = SBOX[input as usize];
        let actual = candidate(input);
        if actual != expected {
            return Err(SboxMismatch {
                input,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

/// An S-box written as `post(inv(pre(x)))` in the AES field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Isomorphism {
    /// Map applied before the field inversion.
    pub pre: Affine8,
    /// Map applied after the field inversion.
    pub post: Affine8,
}

impl Isomorphism {
    /// The pair of maps encoded in the GFNI operands.
    pub const fn gfni() -> Self {
        Self {
            pre: Affine8::from_gfni(GFNI_PRE_MATRIX, GFNI_PRE_CONST),
            post: Affine8::from_gfni(GFNI_POST_MATRIX, GFNI_POST_CONST),
        }
    }

    /// The pair of maps the AES-NI path realizes, with the AES affine output map,
    /// the round key and the complemented nibble folded into `post`.
    ///
    /// Returns `None` if the tables do not describe affine maps.
    pub fn aesni() -> Option<Self> {
        let pre = AESNI_PRE.to_affine()?;
        let post = Affine8::from_fn(|y| aesni_post(AES_AFFINE.apply(y) ^ AESNI_ROUND_KEY))?;
        Some(Self { pre, post })
    }

    /// Evaluates the S-box on one byte.
    pub fn sbox(&self, x: u8) -> u8 {
        self.post.apply(inv(self.pre.apply(x)))
    }

    /// Checks the maps against the SM4 S-box.
    pub fn verify(&self) -> Result<(), SboxMismatch> {
        verify_sbox(|x| self.sbox(x))
    }
}
