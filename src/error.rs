use std::fmt;

/// Errors reported by alphabet construction and the codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The alphabet is malformed (empty, duplicate or non-ASCII symbols,
    /// colliding padding/shortcut characters, radix unfit for the mode).
    InvalidAlphabet(String),
    /// The input contains a character that is not part of the alphabet.
    InvalidCharacter { character: char, index: usize },
    /// The input's structure is invalid for the encoding: a symbol count
    /// the radix cannot accept, or a digit group outside the value range.
    InvalidLength { length: usize, expected: &'static str },
    /// The caller-supplied output buffer is too small. Recoverable: retry
    /// with a buffer of at least `needed` units.
    InsufficientBuffer { needed: usize, available: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAlphabet(reason) => write!(f, "invalid alphabet: {}", reason),
            Error::InvalidCharacter { character, index } => {
                write!(f, "invalid character '{}' at index {}", character, index)
            }
            Error::InvalidLength { length, expected } => {
                write!(f, "invalid input length {}: expected {}", length, expected)
            }
            Error::InsufficientBuffer { needed, available } => {
                write!(
                    f,
                    "output buffer too small: {} units needed, {} available",
                    needed, available
                )
            }
        }
    }
}

impl std::error::Error for Error {}
