//! Hex text at the command-line boundary.

/// Rejected hex input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputFormatError {
    /// Hex text must have two digits per byte.
    #[error("hex input has odd length {len}")]
    OddLength { len: usize },
    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {ch:?} at index {index}")]
    InvalidDigit { ch: char, index: usize },
}

/// Decodes hex text, ignoring surrounding whitespace. Both cases are accepted.
pub fn decode(text: &str) -> Result<Vec<u8>, InputFormatError> {
    let text = text.trim();
    hex::decode(text).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            InputFormatError::InvalidDigit { ch: c, index }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            InputFormatError::OddLength { len: text.len() }
        }
    })
}

/// Lowercase hex, two characters per byte.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
