use std::sync::LazyLock;

use crate::config::EncodingMode;
use crate::error::Error;

/// An encoding alphabet: an ordered set of unique ASCII symbols plus the
/// reverse (character to digit) lookup table built once at construction.
///
/// The alphabet also carries the configuration the codecs need: the
/// algorithm family (`EncodingMode`), an optional padding character for the
/// bit-packing family, and optional all-zero / all-space shortcut characters
/// for the base-85 block family. An `Alphabet` is never mutated after
/// construction; the builder methods return new values.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Box<[u8]>,
    // Digit value per ASCII character, -1 when the character is absent.
    // Keeps "maps to digit 0" distinguishable from "not in the alphabet".
    reverse: [i16; 128],
    mode: EncodingMode,
    padding: Option<char>,
    zero_shortcut: Option<char>,
    space_shortcut: Option<char>,
}

impl Alphabet {
    /// Creates an alphabet, inferring the encoding mode from the radix:
    /// power-of-two radixes use bit packing, radix 85 uses 4-byte blocks,
    /// everything else uses big-integer conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] when the symbol set is empty,
    /// contains duplicate or non-ASCII characters, or does not fit the mode.
    pub fn new(symbols: &str) -> Result<Self, Error> {
        let mode = EncodingMode::for_radix(symbols.chars().count());
        Self::with_mode(symbols, mode, None)
    }

    /// Creates an alphabet with an explicit mode and optional padding
    /// character.
    pub fn with_mode(
        symbols: &str,
        mode: EncodingMode,
        padding: Option<char>,
    ) -> Result<Self, Error> {
        if symbols.is_empty() {
            return Err(Error::InvalidAlphabet("alphabet cannot be empty".into()));
        }

        let mut table = [0u8; 128];
        let mut count = 0usize;
        let mut reverse = [-1i16; 128];
        for c in symbols.chars() {
            if !c.is_ascii() {
                return Err(Error::InvalidAlphabet(format!("non-ASCII symbol '{}'", c)));
            }
            let b = c as u8;
            if reverse[b as usize] >= 0 {
                return Err(Error::InvalidAlphabet(format!("duplicate symbol '{}'", c)));
            }
            reverse[b as usize] = count as i16;
            table[count] = b;
            count += 1;
        }
        let symbols: Box<[u8]> = table[..count].into();

        match mode {
            EncodingMode::BitPacking => {
                if !count.is_power_of_two() || count < 2 {
                    return Err(Error::InvalidAlphabet(format!(
                        "bit packing requires a power-of-two radix, got {}",
                        count
                    )));
                }
            }
            EncodingMode::Block => {
                if count != 85 {
                    return Err(Error::InvalidAlphabet(format!(
                        "block mode requires radix 85, got {}",
                        count
                    )));
                }
            }
            EncodingMode::BigInteger => {
                if count < 2 {
                    return Err(Error::InvalidAlphabet(
                        "big-integer conversion requires at least 2 symbols".into(),
                    ));
                }
            }
        }

        if let Some(pad) = padding {
            if !pad.is_ascii() {
                return Err(Error::InvalidAlphabet(format!(
                    "non-ASCII padding character '{}'",
                    pad
                )));
            }
            if reverse[pad as usize] >= 0 {
                return Err(Error::InvalidAlphabet(format!(
                    "padding character '{}' is also a symbol",
                    pad
                )));
            }
        }

        Ok(Alphabet {
            symbols,
            reverse,
            mode,
            padding,
            zero_shortcut: None,
            space_shortcut: None,
        })
    }

    /// Makes decoding accept both letter cases. Encoding still emits the
    /// case of the symbol table.
    ///
    /// # Errors
    ///
    /// Fails when folding would be ambiguous, i.e. the alphabet already
    /// contains both cases of a letter at different digit values.
    pub fn case_insensitive(mut self) -> Result<Self, Error> {
        for (digit, &b) in self.symbols.iter().enumerate() {
            if !b.is_ascii_alphabetic() {
                continue;
            }
            let folded = b ^ 0x20;
            let existing = self.reverse[folded as usize];
            if existing >= 0 && existing != digit as i16 {
                return Err(Error::InvalidAlphabet(format!(
                    "case-insensitive alphabet maps '{}' ambiguously",
                    folded as char
                )));
            }
            self.reverse[folded as usize] = digit as i16;
        }
        Ok(self)
    }

    /// Attaches shortcut characters that substitute for an entire 4-byte
    /// all-zero or all-space block (base-85 family only).
    pub fn with_shortcuts(
        mut self,
        zero: Option<char>,
        space: Option<char>,
    ) -> Result<Self, Error> {
        for shortcut in [zero, space].into_iter().flatten() {
            if !shortcut.is_ascii() {
                return Err(Error::InvalidAlphabet(format!(
                    "non-ASCII shortcut character '{}'",
                    shortcut
                )));
            }
            if self.reverse[shortcut as usize] >= 0 {
                return Err(Error::InvalidAlphabet(format!(
                    "shortcut character '{}' is also a symbol",
                    shortcut
                )));
            }
        }
        if zero.is_some() && zero == space {
            return Err(Error::InvalidAlphabet(
                "zero and space shortcuts must differ".into(),
            ));
        }
        self.zero_shortcut = zero;
        self.space_shortcut = space;
        Ok(self)
    }

    /// Returns a copy of this alphabet that never emits padding.
    pub fn without_padding(&self) -> Alphabet {
        let mut alphabet = self.clone();
        alphabet.padding = None;
        alphabet
    }

    /// Number of symbols in the alphabet.
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn padding(&self) -> Option<char> {
        self.padding
    }

    pub fn zero_shortcut(&self) -> Option<char> {
        self.zero_shortcut
    }

    pub fn space_shortcut(&self) -> Option<char> {
        self.space_shortcut
    }

    /// Bits consumed per symbol in bit-packing mode.
    pub(crate) fn bits_per_symbol(&self) -> u32 {
        self.symbols.len().trailing_zeros()
    }

    /// The symbol for a digit value. Callers guarantee `digit < radix`.
    pub(crate) fn symbol(&self, digit: usize) -> u8 {
        self.symbols[digit]
    }

    /// Decodes a character back to its digit value, `None` when the
    /// character is not in the alphabet.
    pub fn decode_symbol(&self, character: char) -> Option<u8> {
        if !character.is_ascii() {
            return None;
        }
        let value = self.reverse[character as usize];
        if value < 0 { None } else { Some(value as u8) }
    }
}

fn built_in(symbols: &str) -> Alphabet {
    Alphabet::new(symbols).expect("built-in alphabet is well formed")
}

fn built_in_folded(symbols: &str, padding: Option<char>) -> Alphabet {
    let mode = EncodingMode::for_radix(symbols.len());
    Alphabet::with_mode(symbols, mode, padding)
        .and_then(Alphabet::case_insensitive)
        .expect("built-in alphabet is well formed")
}

static BASE16_UPPER: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("0123456789ABCDEF", None));
static BASE16_LOWER: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("0123456789abcdef", None));
static BASE16_MODHEX: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("cbdefghijklnrtuv", None));

static BASE32_RFC4648: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("ABCDEFGHIJKLMNOPQRSTUVWXYZ234567", Some('=')));
static BASE32_EXTENDED_HEX: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("0123456789ABCDEFGHIJKLMNOPQRSTUV", Some('=')));
static BASE32_CROCKFORD: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("0123456789ABCDEFGHJKMNPQRSTVWXYZ", None));
static BASE32_Z: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("ybndrfg8ejkmcpqxot1uwisza345h769", None));
static BASE32_GEOHASH: LazyLock<Alphabet> =
    LazyLock::new(|| built_in_folded("0123456789bcdefghjkmnpqrstuvwxyz", None));

static BASE58_BITCOIN: LazyLock<Alphabet> = LazyLock::new(|| {
    built_in("123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz")
});
static BASE58_RIPPLE: LazyLock<Alphabet> = LazyLock::new(|| {
    built_in("rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz")
});
static BASE58_FLICKR: LazyLock<Alphabet> = LazyLock::new(|| {
    built_in("123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ")
});

static BASE85_Z85: LazyLock<Alphabet> = LazyLock::new(|| {
    built_in("0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#")
});
static BASE85_ASCII: LazyLock<Alphabet> = LazyLock::new(|| {
    built_in("!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstu")
        .with_shortcuts(Some('z'), Some('y'))
        .expect("built-in alphabet is well formed")
});

impl Alphabet {
    /// Uppercase hexadecimal. Decoding is case-insensitive.
    pub fn base16_upper() -> &'static Alphabet {
        &BASE16_UPPER
    }

    /// Lowercase hexadecimal. Decoding is case-insensitive.
    pub fn base16_lower() -> &'static Alphabet {
        &BASE16_LOWER
    }

    /// Yubico ModHex. Decoding is case-insensitive.
    pub fn base16_modhex() -> &'static Alphabet {
        &BASE16_MODHEX
    }

    /// RFC 4648 base32, padded with `=`.
    pub fn base32_rfc4648() -> &'static Alphabet {
        &BASE32_RFC4648
    }

    /// RFC 4648 base32hex, padded with `=`.
    pub fn base32_extended_hex() -> &'static Alphabet {
        &BASE32_EXTENDED_HEX
    }

    /// Douglas Crockford's base32 (no padding).
    pub fn base32_crockford() -> &'static Alphabet {
        &BASE32_CROCKFORD
    }

    /// z-base-32 as used by Mnet, ZRTP and Tahoe-LAFS (no padding).
    pub fn base32_z() -> &'static Alphabet {
        &BASE32_Z
    }

    /// Geohash base32 (no padding).
    pub fn base32_geohash() -> &'static Alphabet {
        &BASE32_GEOHASH
    }

    /// Bitcoin base58.
    pub fn base58_bitcoin() -> &'static Alphabet {
        &BASE58_BITCOIN
    }

    /// Ripple base58.
    pub fn base58_ripple() -> &'static Alphabet {
        &BASE58_RIPPLE
    }

    /// Flickr base58.
    pub fn base58_flickr() -> &'static Alphabet {
        &BASE58_FLICKR
    }

    /// ZeroMQ Z85.
    pub fn base85_z85() -> &'static Alphabet {
        &BASE85_Z85
    }

    /// Adobe Ascii85 with the `z` all-zero and `y` all-space shortcuts.
    pub fn base85_ascii() -> &'static Alphabet {
        &BASE85_ASCII
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_alphabet() {
        assert!(matches!(Alphabet::new(""), Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        assert!(matches!(
            Alphabet::new("ABCA"),
            Err(Error::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn rejects_non_ascii_symbols() {
        assert!(matches!(
            Alphabet::new("abcé"),
            Err(Error::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn rejects_padding_collision() {
        let result = Alphabet::with_mode("ABCD", EncodingMode::BitPacking, Some('A'));
        assert!(matches!(result, Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn absent_character_is_distinguished_from_digit_zero() {
        let alphabet = Alphabet::base16_upper();
        assert_eq!(alphabet.decode_symbol('0'), Some(0));
        assert_eq!(alphabet.decode_symbol('G'), None);
        assert_eq!(alphabet.decode_symbol('é'), None);
    }

    #[test]
    fn case_insensitive_lookup() {
        let alphabet = Alphabet::base16_upper();
        assert_eq!(alphabet.decode_symbol('a'), Some(10));
        assert_eq!(alphabet.decode_symbol('A'), Some(10));
        assert_eq!(alphabet.symbol(10), b'A');
    }

    #[test]
    fn case_insensitive_rejects_ambiguity() {
        let result = Alphabet::new("aA").and_then(Alphabet::case_insensitive);
        assert!(matches!(result, Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn shortcut_must_not_collide_with_symbols() {
        let result = Alphabet::base85_z85()
            .clone()
            .with_shortcuts(Some('0'), None);
        assert!(matches!(result, Err(Error::InvalidAlphabet(_))));
    }

    #[test]
    fn mode_is_inferred_from_radix() {
        assert_eq!(
            Alphabet::base16_upper().mode(),
            EncodingMode::BitPacking
        );
        assert_eq!(
            Alphabet::base58_bitcoin().mode(),
            EncodingMode::BigInteger
        );
        assert_eq!(Alphabet::base85_z85().mode(), EncodingMode::Block);
    }

    #[test]
    fn named_alphabets_are_singletons() {
        let a = Alphabet::base58_bitcoin() as *const Alphabet;
        let b = Alphabet::base58_bitcoin() as *const Alphabet;
        assert_eq!(a, b);
    }
}
