//! base-n: binary-to-text encoding over pluggable alphabets.
//!
//! One `encode`/`decode` surface covers three algorithm families, selected
//! by the alphabet's radix:
//!
//! * power-of-two radixes (base16, base32) run through a fixed-width
//!   bit-packing codec with optional RFC 4648 padding,
//! * radix 85 runs through the 4-byte-block codec (Ascii85, Z85),
//! * everything else (base58 and friends) runs through big-integer
//!   conversion with leading-zero preservation.
//!
//! ```
//! use base_n::Alphabet;
//!
//! let text = base_n::encode(b"foobar", Alphabet::base32_rfc4648());
//! assert_eq!(text, "MZXW6YTBOI======");
//! assert_eq!(
//!     base_n::decode(&text, Alphabet::base32_rfc4648()).unwrap(),
//!     b"foobar"
//! );
//!
//! let addr = base_n::encode(&[0x00, 0xFF], Alphabet::base58_bitcoin());
//! assert_eq!(addr, "15Q");
//! ```
//!
//! Besides the built-in alphabets, custom ones come from
//! [`Alphabet::new`] or from the TOML registry ([`AlphabetsConfig`]).
//! The [`StreamingEncoder`] / [`StreamingDecoder`] pair handles inputs too
//! large to buffer, and the `async` feature adds tokio-based drivers.

mod alphabet;
mod bigint;
mod bits;
mod block;
mod config;
mod error;
mod streaming;

pub use alphabet::Alphabet;
pub use config::{AlphabetConfig, AlphabetsConfig, EncodingMode};
pub use error::Error;
pub use streaming::{ChunkDecoder, ChunkEncoder, StreamingDecoder, StreamingEncoder};

#[cfg(feature = "async")]
pub use streaming::{decode_async, encode_async};

/// Encodes `data` with the given alphabet. Bit-packing alphabets that carry
/// a padding character emit padded output; use
/// [`Alphabet::without_padding`] to suppress it.
pub fn encode(data: &[u8], alphabet: &Alphabet) -> String {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::encode(data, alphabet, true),
        EncodingMode::BigInteger => bigint::encode(data, alphabet),
        EncodingMode::Block => block::encode(data, alphabet),
    }
}

/// Decodes `text` with the given alphabet.
///
/// # Errors
///
/// [`Error::InvalidCharacter`] for input outside the alphabet,
/// [`Error::InvalidLength`] for lengths the radix cannot accept.
pub fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, Error> {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::decode(text, alphabet),
        EncodingMode::BigInteger => bigint::decode(text, alphabet),
        EncodingMode::Block => block::decode(text, alphabet),
    }
}

/// A buffer size guaranteed to hold the encoding of `byte_len` input bytes.
/// Exact for the bit-packing family, a small overestimate for the others.
pub fn safe_encoded_len(byte_len: usize, alphabet: &Alphabet) -> usize {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::encoded_len(byte_len, alphabet, true),
        EncodingMode::BigInteger => bigint::encoded_len(byte_len, alphabet),
        EncodingMode::Block => block::encoded_len(byte_len),
    }
}

/// A buffer size guaranteed to hold the decoding of `text`. Exact for the
/// bit-packing family (0 for odd-length base16), an overestimate for the
/// others.
pub fn safe_decoded_len(text: &str, alphabet: &Alphabet) -> usize {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::decoded_len(text, alphabet),
        EncodingMode::BigInteger => bigint::decoded_len(text.chars().count(), alphabet),
        EncodingMode::Block => block::decoded_len(text, alphabet),
    }
}

/// Encodes into a caller-supplied buffer without allocating, returning the
/// number of bytes written. Size the buffer with [`safe_encoded_len`].
///
/// # Errors
///
/// [`Error::InsufficientBuffer`] when `output` cannot hold the result.
pub fn try_encode(data: &[u8], alphabet: &Alphabet, output: &mut [u8]) -> Result<usize, Error> {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::encode_into(data, alphabet, true, output),
        EncodingMode::BigInteger => bigint::encode_into(data, alphabet, output),
        EncodingMode::Block => block::encode_into(data, alphabet, output),
    }
}

/// Decodes into a caller-supplied buffer without allocating, returning the
/// number of bytes written. Size the buffer with [`safe_decoded_len`].
pub fn try_decode(text: &str, alphabet: &Alphabet, output: &mut [u8]) -> Result<usize, Error> {
    match alphabet.mode() {
        EncodingMode::BitPacking => bits::decode_into(text, alphabet, output),
        EncodingMode::BigInteger => bigint::decode_into(text, alphabet, output),
        EncodingMode::Block => block::decode_into(text, alphabet, output),
    }
}
