//! Reference SM4 implementation shared by the accelerated backends and the CLI.
//!
//! This crate follows GB/T 32907-2016 and provides:
//! - The constants `FK`, `CK` and the S-box.
//! - The key schedule and single-block encryption/decryption, generic over a
//!   [`Substitution`] strategy so that hardware S-boxes reuse the same rounds.
//! - ECB processing of whole buffers and the shared [`Error`] type.
//!
//! The table-lookup S-box is not constant time; it should not be treated as
//! side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backend;
mod block;
mod cipher;
pub mod ecb;
mod error;
mod key;
pub mod round;
mod sbox;

pub use crate::backend::{Backend, ParseBackendError};
pub use crate::block::{load_words, store_words, Block, BLOCK_SIZE};
pub use crate::cipher::{
    crypt_block_with, decrypt_block, decrypt_block_with, encrypt_block, encrypt_block_with,
    expand_key, expand_key_with, CK, FK,
};
pub use crate::error::{Error, Result};
pub use crate::key::{RoundKeys, Sm4Key, KEY_SIZE, ROUNDS};
pub use crate::sbox::{sbox, Substitution, TableLookup, SBOX};
