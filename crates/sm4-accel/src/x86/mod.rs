//! x86-64 hardware S-box strategies.
//!
//! Each strategy is a zero-sized token that can only be obtained through its
//! `detect` constructor, after the CPU has reported the instruction-set
//! extensions it needs. Holding a token is what makes calling its
//! `#[target_feature]` kernels sound.

mod aesni;
mod gfni;
mod lanes;

pub use aesni::AesNiSbox;
pub use gfni::GfniSbox;
