//! Substitution backend selection.

use core::fmt;
use core::str::FromStr;

/// Which substitution strategy a cipher instance uses.
///
/// The choice never changes the output, only the throughput.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable table lookup.
    #[default]
    Reference,
    /// S-box through the AES field isomorphism and `aesenclast` (AES-NI + SSSE3).
    AesNi,
    /// S-box through Galois-field affine instructions (GFNI + SSSE3).
    Gfni,
}

impl Backend {
    /// All backends, slowest first.
    pub const ALL: [Backend; 3] = [Backend::Reference, Backend::AesNi, Backend::Gfni];

    /// Returns the lowercase name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::AesNi => "aesni",
            Backend::Gfni => "gfni",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend `{0}` (expected reference, aesni or gfni)")]
pub struct ParseBackendError(pub String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "ref" | "table" => Ok(Backend::Reference),
            "aesni" | "aes-ni" => Ok(Backend::AesNi),
            "gfni" => Ok(Backend::Gfni),
            other => Err(ParseBackendError(other.to_string())),
        }
    }
}
