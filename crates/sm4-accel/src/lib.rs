//! Hardware-accelerated SM4.
//!
//! Three interchangeable S-box strategies sit behind one [`Sm4`] type:
//! - [`Backend::Reference`]: the portable table lookup from `sm4-core`.
//! - [`Backend::AesNi`]: the SM4 S-box computed with `aesenclast` through a field isomorphism.
//! - [`Backend::Gfni`]: the same isomorphism folded into two GFNI affine instructions.
//!
//! Hardware backends also encrypt four blocks per pass with the lanes of one
//! 128-bit register. Every backend yields bit-identical output.
//!
//! ```
//! use sm4_accel::{best_backend, Sm4};
//!
//! let key = [0x42u8; 16];
//! let sm4 = Sm4::new(&key, best_backend())?;
//! let ct = sm4.encrypt(&[0u8; 64])?;
//! assert_eq!(sm4.decrypt(&ct)?, vec![0u8; 64]);
//! # Ok::<(), sm4_accel::Error>(())
//! ```

#![deny(missing_docs)]

mod batch;
mod cipher;
mod detect;
#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use crate::batch::{LaneBatch, LANES};
pub use crate::cipher::{Sm4, Sm4Config};
pub use crate::detect::{best_backend, is_supported, supported_backends};
pub use sm4_core::{Backend, Block, Error, Result, BLOCK_SIZE};
