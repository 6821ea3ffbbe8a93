//! Error type shared by the SM4 crates.

use crate::backend::Backend;

/// Errors reported by key setup and by the multi-block entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The master key was not exactly 16 bytes.
    #[error("SM4 key must be 16 bytes, got {len}")]
    KeyLength {
        /// Length that was supplied.
        len: usize,
    },
    /// The data length was not a multiple of the 16-byte block size.
    #[error("input length {len} is not a multiple of the 16-byte block size")]
    BlockAlignment {
        /// Length that was supplied.
        len: usize,
    },
    /// The requested backend needs an instruction-set extension this CPU lacks.
    #[error("backend `{0}` is not supported on this CPU")]
    UnsupportedBackend(Backend),
}

/// Result alias for SM4 operations.
pub type Result<T> = core::result::Result<T, Error>;
