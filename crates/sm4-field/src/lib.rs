//! GF(2) linear algebra and the field-isomorphism constants behind the hardware
//! SM4 S-boxes.
//!
//! This crate provides 8×8 GF(2) matrices, affine maps and their nibble-table split,
//! AES-field arithmetic, and bit-exact software models of the AES-NI and GFNI S-box
//! data paths. The accelerated backends take their constants from [`iso`], where
//! they are verified against the SM4 S-box on every input.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod affine;
pub mod gf256;
pub mod iso;
mod matrix;

pub use affine::{Affine8, NibbleTables};
pub use iso::{verify_sbox, Isomorphism, SboxMismatch};
pub use matrix::Matrix8;
