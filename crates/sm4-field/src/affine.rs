//! Affine maps over GF(2)^8 and their nibble-table split.

use crate::matrix::Matrix8;

/// 8-bit affine map `x -> lin * x ⊕ bias`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine8 {
    /// Linear component.
    pub lin: Matrix8,
    /// Additive bias.
    pub bias: u8,
}

impl Affine8 {
    /// Constructs a new affine map from components.
    pub const fn new(lin: Matrix8, bias: u8) -> Self {
        Self { lin, bias }
    }

    /// The map evaluated by `gf2p8affineqb` for a matrix operand and immediate.
    pub const fn from_gfni(qword: u64, imm: u8) -> Self {
        Self::new(Matrix8::from_gfni_qword(qword), imm)
    }

    /// Recovers an affine map from an arbitrary byte function.
    ///
    /// Returns `None` if `f` is not affine on the full input range.
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Option<Self> {
        let bias = f(0);
        let lin = Matrix8::from_linear_fn(|x| f(x) ^ bias);
        let candidate = Self::new(lin, bias);
        (0..=255u8)
            .all(|x| candidate.apply(x) == f(x))
            .then_some(candidate)
    }

    /// Applies the affine map.
    pub fn apply(&self, value: u8) -> u8 {
        self.lin.apply(value) ^ self.bias
    }

    /// Applies the inverse map, if the linear part is invertible.
    pub fn invert(&self) -> Option<Self> {
        let lin_inv = self.lin.invert()?;
        let bias = lin_inv.apply(self.bias);
        Some(Self::new(lin_inv, bias))
    }

    /// Composes `self` after `other` (i.e., `self ∘ other`).
    pub fn compose(&self, other: &Self) -> Self {
        let lin = self.lin.mul(&other.lin);
        let bias = self.lin.apply(other.bias) ^ self.bias;
        Self::new(lin, bias)
    }

    /// Splits the map into two 16-entry tables indexed by the low and high nibble.
    ///
    /// This is the form a byte shuffle (`pshufb`) can evaluate 16 lanes at a time.
    pub fn nibble_tables(&self) -> NibbleTables {
        NibbleTables {
            lo: core::array::from_fn(|n| self.apply(n as u8)),
            hi: core::array::from_fn(|n| self.lin.apply((n as u8) << 4)),
        }
    }
}

/// An affine byte map evaluated as `lo[x & 0x0f] ^ hi[x >> 4]`; the bias lives in `lo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NibbleTables {
    /// Images of the low nibble, bias included.
    pub lo: [u8; 16],
    /// Images of the high nibble.
    pub hi: [u8; 16],
}

impl NibbleTables {
    /// Evaluates the tables on one byte.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.lo[(value & 0x0f) as usize] ^ self.hi[(value >> 4) as usize]
    }

    /// Converts the tables back into an affine map, if they describe one.
    pub fn to_affine(&self) -> Option<Affine8> {
        Affine8::from_fn(|x| self.apply(x))
    }
}
