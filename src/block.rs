//! Blockwise base85 codec (Ascii85/Z85 family).
//!
//! Each 4-byte block is a 32-bit big-endian value re-expressed as 5 base-85
//! digits, most-significant first. A final partial block of n bytes is
//! zero-padded for the arithmetic and emits only its first n+1 characters;
//! decoding pads the digits with the maximum digit (84) and truncates
//! symmetrically. Alphabets may define single-character shortcuts for full
//! all-zero and all-space blocks.

use crate::alphabet::Alphabet;
use crate::error::Error;

pub(crate) const BYTES_PER_BLOCK: usize = 4;
const DIGITS_PER_BLOCK: usize = 5;
const ALL_SPACES: u32 = 0x2020_2020;

// 85^4, 85^3, 85^2, 85, 1: divisors for most-significant-first digits.
const POWERS: [u32; DIGITS_PER_BLOCK] = [52_200_625, 614_125, 7_225, 85, 1];

/// Upper bound on the encoded character count; exact when the alphabet has
/// no shortcut characters.
pub(crate) fn encoded_len(byte_len: usize) -> usize {
    let remainder = byte_len % BYTES_PER_BLOCK;
    let full = byte_len / BYTES_PER_BLOCK * DIGITS_PER_BLOCK;
    if remainder > 0 { full + remainder + 1 } else { full }
}

/// Upper bound on the decoded byte count. With shortcuts every character
/// can expand to a full block, so the bound is proportionally larger.
pub(crate) fn decoded_len(text: &str, alphabet: &Alphabet) -> usize {
    let len = text.chars().filter(|c| !c.is_whitespace()).count();
    if alphabet.zero_shortcut().is_some() || alphabet.space_shortcut().is_some() {
        len * BYTES_PER_BLOCK
    } else {
        let remainder = len % DIGITS_PER_BLOCK;
        len / DIGITS_PER_BLOCK * BYTES_PER_BLOCK + remainder.saturating_sub(1)
    }
}

/// Encodes into a caller-supplied buffer, returning the number of
/// characters written. On success the buffer prefix is the complete output;
/// on [`Error::InsufficientBuffer`] the prefix holds the blocks encoded so
/// far, a valid but truncated output.
pub(crate) fn encode_into(
    data: &[u8],
    alphabet: &Alphabet,
    output: &mut [u8],
) -> Result<usize, Error> {
    let needed = encoded_len(data.len());
    let mut written = 0usize;

    let ensure = |written: usize, units: usize, available: usize| {
        if available - written < units {
            Err(Error::InsufficientBuffer { needed, available })
        } else {
            Ok(())
        }
    };

    let chunks = data.chunks_exact(BYTES_PER_BLOCK);
    let tail = chunks.remainder();

    for chunk in chunks {
        let value = u32::from_be_bytes(chunk.try_into().expect("4-byte block"));
        if let (0, Some(shortcut)) = (value, alphabet.zero_shortcut()) {
            ensure(written, 1, output.len())?;
            output[written] = shortcut as u8;
            written += 1;
        } else if let (ALL_SPACES, Some(shortcut)) = (value, alphabet.space_shortcut()) {
            ensure(written, 1, output.len())?;
            output[written] = shortcut as u8;
            written += 1;
        } else {
            ensure(written, DIGITS_PER_BLOCK, output.len())?;
            for power in POWERS {
                output[written] = alphabet.symbol((value / power % 85) as usize);
                written += 1;
            }
        }
    }

    if !tail.is_empty() {
        let mut block = [0u8; BYTES_PER_BLOCK];
        block[..tail.len()].copy_from_slice(tail);
        let value = u32::from_be_bytes(block);
        // Shortcuts never apply to the final partial block.
        let digits = tail.len() + 1;
        ensure(written, digits, output.len())?;
        for power in &POWERS[..digits] {
            output[written] = alphabet.symbol((value / power % 85) as usize);
            written += 1;
        }
    }

    Ok(written)
}

/// Decodes into a caller-supplied buffer, returning the number of bytes
/// written. Whitespace is skipped anywhere in the input. On success the
/// buffer prefix is the complete output; on error it holds the blocks
/// decoded so far.
pub(crate) fn decode_into(
    text: &str,
    alphabet: &Alphabet,
    output: &mut [u8],
) -> Result<usize, Error> {
    let needed = decoded_len(text, alphabet);
    let mut written = 0usize;
    let mut digits = [0u8; DIGITS_PER_BLOCK];
    let mut group_len = 0usize;

    for (index, character) in text.chars().enumerate() {
        if character.is_whitespace() {
            continue;
        }

        let shortcut_fill = if Some(character) == alphabet.zero_shortcut() {
            Some(0x00u8)
        } else if Some(character) == alphabet.space_shortcut() {
            Some(0x20u8)
        } else {
            None
        };

        if let Some(fill) = shortcut_fill {
            // A shortcut stands for a whole block; inside a group it is
            // just an invalid character.
            if group_len != 0 {
                return Err(Error::InvalidCharacter { character, index });
            }
            if output.len() - written < BYTES_PER_BLOCK {
                return Err(Error::InsufficientBuffer {
                    needed,
                    available: output.len(),
                });
            }
            output[written..written + BYTES_PER_BLOCK].fill(fill);
            written += BYTES_PER_BLOCK;
            continue;
        }

        let digit = alphabet
            .decode_symbol(character)
            .ok_or(Error::InvalidCharacter { character, index })?;
        digits[group_len] = digit;
        group_len += 1;

        if group_len == DIGITS_PER_BLOCK {
            write_group(&digits, BYTES_PER_BLOCK, output, &mut written, needed)?;
            group_len = 0;
        }
    }

    match group_len {
        0 => {}
        1 => {
            return Err(Error::InvalidLength {
                length: 1,
                expected: "at least 2 characters in the final base-85 group",
            });
        }
        _ => {
            // Pad the missing digits with the maximum digit so the padded
            // value truncates back to the original bytes.
            for digit in digits[group_len..].iter_mut() {
                *digit = 84;
            }
            write_group(&digits, group_len - 1, output, &mut written, needed)?;
        }
    }

    Ok(written)
}

fn write_group(
    digits: &[u8; DIGITS_PER_BLOCK],
    byte_count: usize,
    output: &mut [u8],
    written: &mut usize,
    needed: usize,
) -> Result<(), Error> {
    // Horner reduction. A group above u32::MAX has no 4-byte value, so it
    // is structurally invalid.
    let mut value = 0u32;
    for &digit in digits {
        value = value
            .checked_mul(85)
            .and_then(|v| v.checked_add(u32::from(digit)))
            .ok_or(Error::InvalidLength {
                length: DIGITS_PER_BLOCK,
                expected: "a base-85 group value within 32 bits",
            })?;
    }

    if output.len() - *written < byte_count {
        return Err(Error::InsufficientBuffer {
            needed,
            available: output.len(),
        });
    }
    output[*written..*written + byte_count].copy_from_slice(&value.to_be_bytes()[..byte_count]);
    *written += byte_count;
    Ok(())
}

pub(crate) fn encode(data: &[u8], alphabet: &Alphabet) -> String {
    let mut output = vec![0u8; encoded_len(data.len())];
    let written =
        encode_into(data, alphabet, &mut output).expect("output sized to encoded_len");
    output.truncate(written);
    String::from_utf8(output).expect("alphabet symbols are ASCII")
}

pub(crate) fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, Error> {
    let mut output = vec![0u8; decoded_len(text, alphabet)];
    let written = decode_into(text, alphabet, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Length of the prefix of `text` (ASCII, whitespace already removed) that
/// ends on a group boundary. Used by the streaming decoder to carry an open
/// group across chunk boundaries.
pub(crate) fn aligned_prefix(text: &[u8], alphabet: &Alphabet) -> usize {
    let zero = alphabet.zero_shortcut().map(|c| c as u8);
    let space = alphabet.space_shortcut().map(|c| c as u8);
    let mut index = 0;
    while index < text.len() {
        let byte = text[index];
        if Some(byte) == zero || Some(byte) == space {
            index += 1;
            continue;
        }
        if text.len() - index < DIGITS_PER_BLOCK {
            break;
        }
        index += DIGITS_PER_BLOCK;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z85() -> &'static Alphabet {
        Alphabet::base85_z85()
    }

    fn ascii85() -> &'static Alphabet {
        Alphabet::base85_ascii()
    }

    #[test]
    fn z85_reference_vector() {
        // The ZeroMQ Z85 specification test frame.
        let data = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];
        assert_eq!(encode(&data, z85()), "HelloWorld");
        assert_eq!(decode("HelloWorld", z85()).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        assert_eq!(encode(b"", z85()), "");
        assert_eq!(decode("", z85()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn partial_block_emits_n_plus_one_characters() {
        for n in 1..4usize {
            let data = vec![0xC3u8; n];
            let text = encode(&data, z85());
            assert_eq!(text.len(), n + 1);
            assert_eq!(decode(&text, z85()).unwrap(), data);
        }
    }

    #[test]
    fn zero_shortcut_replaces_full_block() {
        assert_eq!(encode(&[0u8; 4], ascii85()), "z");
        assert_eq!(decode("z", ascii85()).unwrap(), vec![0u8; 4]);
        assert_eq!(encode(&[0u8; 8], ascii85()), "zz");
    }

    #[test]
    fn space_shortcut_replaces_full_block() {
        assert_eq!(encode(b"    ", ascii85()), "y");
        assert_eq!(decode("y", ascii85()).unwrap(), b"    ".to_vec());
    }

    #[test]
    fn shortcut_never_applies_to_partial_block() {
        // Three zero bytes are a partial block: digits, not the shortcut.
        let text = encode(&[0u8; 3], ascii85());
        assert_eq!(text.len(), 4);
        assert_ne!(text, "z");
        assert_eq!(decode(&text, ascii85()).unwrap(), vec![0u8; 3]);
    }

    #[test]
    fn shortcut_without_shortcut_alphabet_encodes_digits() {
        // Z85 defines no shortcuts; a zero block is five '0' digits.
        assert_eq!(encode(&[0u8; 4], z85()), "00000");
    }

    #[test]
    fn dangling_single_character_fails() {
        assert_eq!(
            decode("Hello!", z85()),
            Err(Error::InvalidLength {
                length: 1,
                expected: "at least 2 characters in the final base-85 group",
            })
        );
    }

    #[test]
    fn overflowing_group_is_rejected() {
        // Five max digits reduce to 85^5 - 1, past the 32-bit range.
        assert_eq!(
            decode("#####", z85()),
            Err(Error::InvalidLength {
                length: 5,
                expected: "a base-85 group value within 32 bits",
            })
        );
        // The largest valid group is exactly u32::MAX.
        assert_eq!(decode("%nSc0", z85()).unwrap(), vec![0xFF; 4]);
        assert_eq!(encode(&[0xFF; 4], z85()), "%nSc0");
    }

    #[test]
    fn overflowing_partial_group_is_rejected() {
        // Padding "##" with max digits overflows; no byte tail encodes
        // to it, so it is malformed rather than truncatable.
        assert!(matches!(
            decode("##", z85()),
            Err(Error::InvalidLength { .. })
        ));
        // Real partial tails stay decodable after padding.
        let tail = encode(&[0xFF], z85());
        assert_eq!(decode(&tail, z85()).unwrap(), vec![0xFF]);
    }

    #[test]
    fn shortcut_inside_group_fails() {
        assert_eq!(
            decode("ABz", ascii85()),
            Err(Error::InvalidCharacter {
                character: 'z',
                index: 2,
            })
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        let data = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];
        assert_eq!(decode("Hello World", z85()).unwrap(), data);
        assert_eq!(decode("Hello\nWorld\n", z85()).unwrap(), data);
    }

    #[test]
    fn ascii85_known_text() {
        // "Man " from the classic Ascii85 example.
        assert_eq!(encode(b"Man ", ascii85()), "9jqo^");
        assert_eq!(decode("9jqo^", ascii85()).unwrap(), b"Man ".to_vec());
    }

    #[test]
    fn aligned_prefix_respects_shortcuts() {
        let alphabet = ascii85();
        assert_eq!(aligned_prefix(b"zzABCDE", alphabet), 7);
        assert_eq!(aligned_prefix(b"ABCDEFG", alphabet), 5);
        assert_eq!(aligned_prefix(b"ABC", alphabet), 0);
        assert_eq!(aligned_prefix(b"zABC", alphabet), 1);
    }
}
