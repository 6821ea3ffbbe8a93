//! The hardware kernels and the software models in `sm4-field` must agree.

#![cfg(target_arch = "x86_64")]

use sm4_accel::x86::{AesNiSbox, GfniSbox};
use sm4_accel::LaneBatch;
use sm4_core::{expand_key, Substitution, Sm4Key};
use sm4_field::iso::{aesni_sbox, gfni_sbox};

fn splat(b: u8) -> u32 {
    u32::from_ne_bytes([b; 4])
}

#[test]
fn gfni_matches_software_model() {
    let Some(sbox) = GfniSbox::detect() else {
        eprintln!("GFNI not available, skipping");
        return;
    };
    for b in 0..=255u8 {
        assert_eq!(sbox.tau(splat(b)), splat(gfni_sbox(b)), "byte {b:#04x}");
    }
}

#[test]
fn aesni_matches_software_model() {
    let Some(sbox) = AesNiSbox::detect() else {
        eprintln!("AES-NI not available, skipping");
        return;
    };
    for b in 0..=255u8 {
        assert_eq!(sbox.tau(splat(b)), splat(aesni_sbox(b)), "byte {b:#04x}");
    }
}

#[test]
fn lane_kernels_agree_with_each_other() {
    let (Some(aes), Some(gfni)) = (AesNiSbox::detect(), GfniSbox::detect()) else {
        eprintln!("need both AES-NI and GFNI, skipping");
        return;
    };
    let rks = expand_key(&Sm4Key::from([0xa5; 16]));
    let blocks: [[u8; 16]; 4] = core::array::from_fn(|i| core::array::from_fn(|j| (i * 16 + j) as u8));
    let (mut x, mut y) = (blocks, blocks);
    aes.crypt4(rks.as_words(), &mut x);
    gfni.crypt4(rks.as_words(), &mut y);
    assert_eq!(x, y);
    aes.crypt4(rks.reversed().as_words(), &mut x);
    assert_eq!(x, blocks);
}
