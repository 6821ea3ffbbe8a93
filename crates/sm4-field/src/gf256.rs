//! Arithmetic in the AES representation of GF(2^8), modulo `x^8 + x^4 + x^3 + x + 1`.

use crate::affine::Affine8;
use crate::matrix::Matrix8;

/// Affine output map of the AES S-box: `b ^ (b <<< 1) ^ (b <<< 2) ^ (b <<< 3) ^ (b <<< 4) ^ 0x63`.
pub const AES_AFFINE: Affine8 = Affine8::new(
    Matrix8::from_rows([0xf1, 0xe3, 0xc7, 0x8f, 0x1f, 0x3e, 0x7c, 0xf8]),
    0x63,
);

/// Multiplies two field elements.
pub fn mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        if b & 1 != 0 {
            product ^= a;
        }
        let hi_bit_set = a & 0x80;
        a <<= 1;
        if hi_bit_set != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    product
}

/// Multiplicative inverse, with `inv(0) = 0` as the AES S-box and `gf2p8affineinvqb` define it.
pub fn inv(a: u8) -> u8 {
    // a^254 = a^-1 for a != 0, and 0^254 = 0.
    let mut result = 1u8;
    let mut base = a;
    let mut exp = 254u8;
    while exp != 0 {
        if exp & 1 != 0 {
            result = mul(result, base);
        }
        base = mul(base, base);
        exp >>= 1;
    }
    result
}

/// The AES S-box, as applied by `aesenclast`.
pub fn aes_sbox(x: u8) -> u8 {
    AES_AFFINE.apply(inv(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_correct_for_all_nonzero() {
        assert_eq!(inv(0), 0);
        for a in 1..=255u8 {
            assert_eq!(mul(a, inv(a)), 1, "a = {a:#04x}");
        }
    }

    #[test]
    fn multiplication_matches_fips197_example() {
        assert_eq!(mul(0x57, 0x83), 0xc1);
        assert_eq!(mul(0x57, 0x13), 0xfe);
    }

    #[test]
    fn aes_sbox_known_entries() {
        assert_eq!(aes_sbox(0x00), 0x63);
        assert_eq!(aes_sbox(0x01), 0x7c);
        assert_eq!(aes_sbox(0x53), 0xed);
        assert_eq!(aes_sbox(0xff), 0x16);
    }
}
