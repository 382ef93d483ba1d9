//! Arbitrary-precision codec for non-power-of-two radixes (base58 family).
//!
//! The whole buffer is one big-endian unsigned integer re-expressed in the
//! target radix. Leading zero bytes carry no numeric weight, so they are
//! counted separately and mapped 1:1 onto leading zero-symbols.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::alphabet::Alphabet;
use crate::error::Error;

/// Upper bound on the encoded symbol count for `byte_len` input bytes.
pub(crate) fn encoded_len(byte_len: usize, alphabet: &Alphabet) -> usize {
    if byte_len == 0 {
        return 0;
    }
    ((byte_len * 8) as f64 / (alphabet.radix() as f64).log2()).ceil() as usize + 1
}

/// Upper bound on the decoded byte count for `char_len` input symbols.
pub(crate) fn decoded_len(char_len: usize, alphabet: &Alphabet) -> usize {
    if char_len == 0 {
        return 0;
    }
    (char_len as f64 * (alphabet.radix() as f64).log2() / 8.0).ceil() as usize + 1
}

pub(crate) fn encode(data: &[u8], alphabet: &Alphabet) -> String {
    if data.is_empty() {
        return String::new();
    }

    let zeros = data.iter().take_while(|&&b| b == 0).count();
    if zeros == data.len() {
        let symbols = vec![alphabet.symbol(0); zeros];
        return String::from_utf8(symbols).expect("alphabet symbols are ASCII");
    }

    let radix = BigUint::from(alphabet.radix());
    let mut num = BigUint::from_bytes_be(&data[zeros..]);
    let mut symbols = Vec::with_capacity(encoded_len(data.len(), alphabet));

    while !num.is_zero() {
        let remainder = &num % &radix;
        let digit = remainder.to_u64_digits().first().copied().unwrap_or(0) as usize;
        symbols.push(alphabet.symbol(digit));
        num /= &radix;
    }

    symbols.extend(std::iter::repeat_n(alphabet.symbol(0), zeros));
    symbols.reverse();
    String::from_utf8(symbols).expect("alphabet symbols are ASCII")
}

pub(crate) fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, Error> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let radix = BigUint::from(alphabet.radix());
    let mut num = BigUint::zero();
    let mut zeros = 0usize;

    for (index, character) in text.chars().enumerate() {
        let digit = alphabet
            .decode_symbol(character)
            .ok_or(Error::InvalidCharacter { character, index })?;
        if num.is_zero() && digit == 0 {
            zeros += 1;
        } else {
            num = num * &radix + BigUint::from(digit);
        }
    }

    let mut output = vec![0u8; zeros];
    if !num.is_zero() {
        output.extend_from_slice(&num.to_bytes_be());
    }
    Ok(output)
}

/// Allocation-free encode: repeated division carried byte by byte through
/// the caller's buffer. Buffer contents are unspecified (but in bounds)
/// after a failure.
pub(crate) fn encode_into(
    data: &[u8],
    alphabet: &Alphabet,
    output: &mut [u8],
) -> Result<usize, Error> {
    let radix = alphabet.radix();
    let needed = encoded_len(data.len(), alphabet);
    let overflow = |available: usize| Error::InsufficientBuffer {
        needed,
        available,
    };

    let mut length = 0usize;
    for &byte in data {
        let mut carry = byte as usize;
        for digit in output[..length].iter_mut() {
            carry += (*digit as usize) << 8;
            *digit = (carry % radix) as u8;
            carry /= radix;
        }
        while carry > 0 {
            let slot = output.get_mut(length).ok_or_else(|| overflow(length))?;
            *slot = (carry % radix) as u8;
            length += 1;
            carry /= radix;
        }
    }

    for _ in data.iter().take_while(|&&byte| byte == 0) {
        let slot = output.get_mut(length).ok_or_else(|| overflow(length))?;
        *slot = 0;
        length += 1;
    }

    for digit in output[..length].iter_mut() {
        *digit = alphabet.symbol(*digit as usize);
    }
    output[..length].reverse();
    Ok(length)
}

/// Allocation-free decode, the inverse carry loop. Buffer contents are
/// unspecified (but in bounds) after a failure.
pub(crate) fn decode_into(
    text: &str,
    alphabet: &Alphabet,
    output: &mut [u8],
) -> Result<usize, Error> {
    let radix = alphabet.radix();
    let needed = decoded_len(text.chars().count(), alphabet);
    let overflow = |available: usize| Error::InsufficientBuffer {
        needed,
        available,
    };

    let mut length = 0usize;
    for (index, character) in text.chars().enumerate() {
        let digit = alphabet
            .decode_symbol(character)
            .ok_or(Error::InvalidCharacter { character, index })?;
        let mut carry = digit as usize;
        for byte in output[..length].iter_mut() {
            carry += (*byte as usize) * radix;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            let slot = output.get_mut(length).ok_or_else(|| overflow(length))?;
            *slot = (carry & 0xFF) as u8;
            length += 1;
            carry >>= 8;
        }
    }

    for _ in text
        .chars()
        .take_while(|&c| alphabet.decode_symbol(c) == Some(0))
    {
        let slot = output.get_mut(length).ok_or_else(|| overflow(length))?;
        *slot = 0;
        length += 1;
    }

    output[..length].reverse();
    Ok(length)
}
