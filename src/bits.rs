//! Fixed-width bit-packing codec for power-of-two radixes (base16, base32).
//!
//! The byte buffer is treated as a bit stream, most-significant-bit first,
//! consumed in groups of `log2(radix)` bits. When the group width does not
//! divide 8 (base32), a bit cursor carries the remainder across byte
//! boundaries.

use crate::alphabet::Alphabet;
use crate::error::Error;

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Input block size in bytes that maps to a whole number of symbols.
pub(crate) fn block_bytes(bits: u32) -> usize {
    let bits = bits as usize;
    bits / gcd(bits, 8)
}

/// Symbol group size that maps to a whole number of bytes. This is also the
/// RFC 4648 padding alignment (8 symbols for base32, 2 for base16).
pub(crate) fn block_symbols(bits: u32) -> usize {
    8 / gcd(bits as usize, 8)
}

/// Exact output size in symbols for `byte_len` input bytes.
pub(crate) fn encoded_len(byte_len: usize, alphabet: &Alphabet, padding: bool) -> usize {
    if byte_len == 0 {
        return 0;
    }
    let bits = alphabet.bits_per_symbol();
    let symbols = (byte_len * 8).div_ceil(bits as usize);
    if padding && alphabet.padding().is_some() {
        let group = block_symbols(bits);
        symbols.div_ceil(group) * group
    } else {
        symbols
    }
}

/// Exact decoded size in bytes, after stripping trailing padding and
/// whitespace. Returns 0 for inputs the radix cannot accept (odd-length
/// base16) so that the decode itself reports the length error.
pub(crate) fn decoded_len(text: &str, alphabet: &Alphabet) -> usize {
    let stripped = strip_trailing(text, alphabet);
    let bits = alphabet.bits_per_symbol();
    let len = stripped.chars().count();
    if bits == 4 && len % 2 != 0 {
        return 0;
    }
    len * bits as usize / 8
}

fn strip_trailing<'a>(text: &'a str, alphabet: &Alphabet) -> &'a str {
    text.trim_end_matches(|c: char| c.is_whitespace() || alphabet.padding() == Some(c))
}

/// Encodes into a caller-supplied buffer, returning the number of symbols
/// written. On success the buffer prefix is the complete output; on
/// [`Error::InsufficientBuffer`] nothing has been written.
pub(crate) fn encode_into(
    data: &[u8],
    alphabet: &Alphabet,
    padding: bool,
    output: &mut [u8],
) -> Result<usize, Error> {
    let bits = alphabet.bits_per_symbol();
    let needed = encoded_len(data.len(), alphabet, padding);
    if output.len() < needed {
        return Err(Error::InsufficientBuffer {
            needed,
            available: output.len(),
        });
    }

    let mask = (1u32 << bits) - 1;
    let mut accumulator = 0u32;
    let mut accumulated_bits = 0u32;
    let mut written = 0usize;

    for &byte in data {
        accumulator = (accumulator << 8) | u32::from(byte);
        accumulated_bits += 8;
        while accumulated_bits >= bits {
            accumulated_bits -= bits;
            output[written] = alphabet.symbol(((accumulator >> accumulated_bits) & mask) as usize);
            written += 1;
        }
    }

    // Trailing bits that do not fill a group are left-aligned into one
    // final symbol, mirroring the decode-side discard.
    if accumulated_bits > 0 {
        let group = (accumulator << (bits - accumulated_bits)) & mask;
        output[written] = alphabet.symbol(group as usize);
        written += 1;
    }

    if padding {
        if let Some(pad) = alphabet.padding() {
            while written < needed {
                output[written] = pad as u8;
                written += 1;
            }
        }
    }

    Ok(written)
}

/// Decodes into a caller-supplied buffer, returning the number of bytes
/// written. On success the buffer prefix is the complete output; on error
/// the prefix written so far is valid but truncated.
pub(crate) fn decode_into(
    text: &str,
    alphabet: &Alphabet,
    output: &mut [u8],
) -> Result<usize, Error> {
    let text = strip_trailing(text, alphabet);
    let bits = alphabet.bits_per_symbol();
    let len = text.chars().count();

    if bits == 4 && len % 2 != 0 {
        return Err(Error::InvalidLength {
            length: len,
            expected: "an even number of symbols",
        });
    }

    let needed = len * bits as usize / 8;
    if output.len() < needed {
        return Err(Error::InsufficientBuffer {
            needed,
            available: output.len(),
        });
    }

    let mut accumulator = 0u32;
    let mut accumulated_bits = 0u32;
    let mut written = 0usize;

    for (index, character) in text.chars().enumerate() {
        let digit = alphabet
            .decode_symbol(character)
            .ok_or(Error::InvalidCharacter { character, index })?;
        accumulator = (accumulator << bits) | u32::from(digit);
        accumulated_bits += bits;
        if accumulated_bits >= 8 {
            accumulated_bits -= 8;
            output[written] = ((accumulator >> accumulated_bits) & 0xFF) as u8;
            written += 1;
        }
    }

    // Leftover bits below a full byte are the encode-side alignment
    // artifact; they are discarded, not an error.
    Ok(written)
}

pub(crate) fn encode(data: &[u8], alphabet: &Alphabet, padding: bool) -> String {
    let mut output = vec![0u8; encoded_len(data.len(), alphabet, padding)];
    let written = encode_into(data, alphabet, padding, &mut output)
        .expect("output sized to encoded_len");
    output.truncate(written);
    String::from_utf8(output).expect("alphabet symbols are ASCII")
}

pub(crate) fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, Error> {
    let mut output = vec![0u8; decoded_len(text, alphabet)];
    let written = decode_into(text, alphabet, &mut output)?;
    output.truncate(written);
    Ok(output)
}
