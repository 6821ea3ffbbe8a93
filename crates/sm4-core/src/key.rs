//! Key types for SM4.

use crate::error::Error;

/// Size of an SM4 master key in bytes.
pub const KEY_SIZE: usize = 16;

/// Number of rounds, and of round keys.
pub const ROUNDS: usize = 32;

/// SM4 128-bit master key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sm4Key(pub [u8; KEY_SIZE]);

impl Sm4Key {
    /// Returns the key as four big-endian words `MK0..MK3`.
    pub fn words(&self) -> [u32; 4] {
        crate::block::load_words(&self.0)
    }
}

impl From<[u8; KEY_SIZE]> for Sm4Key {
    fn from(value: [u8; KEY_SIZE]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Sm4Key {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; KEY_SIZE] = value
            .try_into()
            .map_err(|_| Error::KeyLength { len: value.len() })?;
        Ok(Self(bytes))
    }
}

// Key material stays out of debug output.
impl core::fmt::Debug for Sm4Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Sm4Key(..)")
    }
}

/// The 32 round keys derived from a master key, in encryption order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RoundKeys(pub [u32; ROUNDS]);

impl RoundKeys {
    /// Returns the round key for `round` (0..32).
    #[inline]
    pub fn get(&self, round: usize) -> u32 {
        self.0[round]
    }

    /// Returns the schedule reversed end to end, which turns encryption into decryption.
    pub fn reversed(&self) -> Self {
        let mut keys = self.0;
        keys.reverse();
        Self(keys)
    }

    /// Borrows the raw words.
    #[inline]
    pub fn as_words(&self) -> &[u32; ROUNDS] {
        &self.0
    }
}

impl core::fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RoundKeys(..)")
    }
}
