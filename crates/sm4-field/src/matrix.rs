//! 8×8 matrices over GF(2).

/// 8×8 binary matrix over GF(2), stored row-major with each row packed into a `u8`.
///
/// Bit `j` of row `i` is the coefficient of input bit `j` in output bit `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Matrix8 {
    rows: [u8; 8],
}

impl Matrix8 {
    /// Returns the zero matrix.
    pub const fn zero() -> Self {
        Self { rows: [0u8; 8] }
    }

    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::from_rows([0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80])
    }

    /// Builds a matrix from packed rows.
    pub const fn from_rows(rows: [u8; 8]) -> Self {
        Self { rows }
    }

    /// Unpacks the 64-bit matrix operand of `gf2p8affineqb`.
    ///
    /// The instruction computes output bit `i` from byte `7 - i` of the operand.
    pub const fn from_gfni_qword(qword: u64) -> Self {
        let mut rows = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            rows[i] = (qword >> (8 * (7 - i))) as u8;
            i += 1;
        }
        Self { rows }
    }

    /// Packs the matrix into the 64-bit operand layout of `gf2p8affineqb`.
    pub fn to_gfni_qword(&self) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &row)| acc | (u64::from(row) << (8 * (7 - i))))
    }

    /// Recovers the matrix of a GF(2)-linear byte map from its images of the basis vectors.
    ///
    /// The result is only meaningful when `f` is linear; callers check that separately.
    pub fn from_linear_fn(f: impl Fn(u8) -> u8) -> Self {
        let mut rows = [0u8; 8];
        for col in 0..8 {
            let image = f(1u8 << col);
            for (row_idx, row) in rows.iter_mut().enumerate() {
                if (image >> row_idx) & 1 == 1 {
                    *row |= 1u8 << col;
                }
            }
        }
        Self { rows }
    }

    /// Applies the matrix to an 8-bit value, treating bits as a column vector.
    pub fn apply(&self, value: u8) -> u8 {
        let mut out = 0u8;
        for (row_idx, row) in self.rows.iter().enumerate() {
            let parity = (row & value).count_ones() as u8 & 1;
            out |= parity << row_idx;
        }
        out
    }

    /// Multiplies two matrices (`self * rhs`).
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut result = Self::zero();
        for (row_idx, row_bits) in self.rows.iter().enumerate() {
            let mut acc = 0u8;
            let mut bits = *row_bits;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                acc ^= rhs.rows[bit];
                bits &= bits - 1;
            }
            result.rows[row_idx] = acc;
        }
        result
    }

    /// Attempts to invert the matrix via Gaussian elimination.
    pub fn invert(&self) -> Option<Self> {
        let mut left = self.rows;
        let mut right = Self::identity().rows;

        for col in 0..8 {
            let pivot = (col..8).find(|&row| (left[row] >> col) & 1 == 1)?;
            if pivot != col {
                left.swap(pivot, col);
                right.swap(pivot, col);
            }
            for row in 0..8 {
                if row != col && ((left[row] >> col) & 1 == 1) {
                    left[row] ^= left[col];
                    right[row] ^= right[col];
                }
            }
        }

        Some(Self { rows: right })
    }

    /// Returns true if the matrix is invertible.
    pub fn is_invertible(&self) -> bool {
        self.invert().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn random_matrix(rng: &mut impl RngCore) -> Matrix8 {
        let mut rows = [0u8; 8];
        rng.fill_bytes(&mut rows);
        Matrix8::from_rows(rows)
    }

    #[test]
    fn identity_is_neutral() {
        let id = Matrix8::identity();
        for x in 0..=255u8 {
            assert_eq!(id.apply(x), x);
        }
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let m = random_matrix(&mut rng);
        assert_eq!(m.mul(&id), m);
        assert_eq!(id.mul(&m), m);
    }

    #[test]
    fn invert_roundtrip() {
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let mut checked = 0;
        while checked < 32 {
            let m = random_matrix(&mut rng);
            let Some(inv) = m.invert() else { continue };
            assert_eq!(m.mul(&inv), Matrix8::identity());
            let value = rng.next_u32() as u8;
            assert_eq!(inv.apply(m.apply(value)), value);
            checked += 1;
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Matrix8::from_rows([0x01, 0x01, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]);
        assert!(!m.is_invertible());
        assert!(!Matrix8::zero().is_invertible());
    }

    #[test]
    fn multiplication_is_composition() {
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let a = random_matrix(&mut rng);
        let b = random_matrix(&mut rng);
        let ab = a.mul(&b);
        for x in 0..=255u8 {
            assert_eq!(ab.apply(x), a.apply(b.apply(x)));
        }
    }

    #[test]
    fn gfni_identity_operand() {
        // The architectural identity operand: byte 7 - i holds bit i.
        let id = Matrix8::from_gfni_qword(0x0102_0408_1020_4080);
        assert_eq!(id, Matrix8::identity());
        assert_eq!(id.to_gfni_qword(), 0x0102_0408_1020_4080);
    }

    #[test]
    fn gfni_operand_roundtrip() {
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        for _ in 0..32 {
            let qword = rng.next_u64();
            assert_eq!(Matrix8::from_gfni_qword(qword).to_gfni_qword(), qword);
        }
    }

    #[test]
    fn linear_fn_recovers_matrix() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let m = random_matrix(&mut rng);
        assert_eq!(Matrix8::from_linear_fn(|x| m.apply(x)), m);
    }
}
