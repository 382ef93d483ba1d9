use serde::Deserialize;
use std::collections::HashMap;

use crate::alphabet::Alphabet;
use crate::error::Error;

/// Algorithm family used by an alphabet.
///
/// The radix fully determines which family applies, so the mode is normally
/// inferred at construction time; the registry may override it for unusual
/// combinations (e.g. running a power-of-two radix through the big-integer
/// converter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Fixed-width bit groups, power-of-two radix (base16, base32).
    BitPacking,
    /// Whole buffer as one big-endian integer (base58 and friends).
    BigInteger,
    /// Fixed 4-byte/5-character blocks (base85 family).
    Block,
}

impl EncodingMode {
    /// Default mode for a given radix.
    pub fn for_radix(radix: usize) -> EncodingMode {
        if radix.is_power_of_two() {
            EncodingMode::BitPacking
        } else if radix == 85 {
            EncodingMode::Block
        } else {
            EncodingMode::BigInteger
        }
    }
}

/// A single alphabet definition as it appears in `alphabets.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AlphabetConfig {
    pub symbols: String,
    #[serde(default)]
    pub mode: Option<EncodingMode>,
    #[serde(default)]
    pub padding: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub zero_shortcut: Option<String>,
    #[serde(default)]
    pub space_shortcut: Option<String>,
}

impl AlphabetConfig {
    /// Builds the runtime alphabet this configuration describes.
    pub fn to_alphabet(&self) -> Result<Alphabet, Error> {
        let mode = self
            .mode
            .unwrap_or_else(|| EncodingMode::for_radix(self.symbols.chars().count()));
        let padding = self.padding.as_ref().and_then(|s| s.chars().next());
        let mut alphabet = Alphabet::with_mode(&self.symbols, mode, padding)?;
        if self.case_insensitive {
            alphabet = alphabet.case_insensitive()?;
        }
        let zero = self.zero_shortcut.as_ref().and_then(|s| s.chars().next());
        let space = self.space_shortcut.as_ref().and_then(|s| s.chars().next());
        if zero.is_some() || space.is_some() {
            alphabet = alphabet.with_shortcuts(zero, space)?;
        }
        Ok(alphabet)
    }
}

/// Named alphabet registry, deserialized from TOML.
#[derive(Debug, Deserialize)]
pub struct AlphabetsConfig {
    pub alphabets: HashMap<String, AlphabetConfig>,
}

impl AlphabetsConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the built-in alphabet table embedded at compile time.
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../alphabets.toml");
        Ok(Self::from_toml(content)?)
    }

    /// Loads a registry from a custom file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Loads the built-in registry, then overrides with
    /// `~/.config/base-n/alphabets.toml` and `./alphabets.toml` when present.
    pub fn load_with_overrides() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("base-n").join("alphabets.toml");
            if user_config_path.exists() {
                match Self::load_from_file(&user_config_path) {
                    Ok(user_config) => config.merge(user_config),
                    Err(e) => {
                        eprintln!(
                            "Warning: Failed to load user config from {:?}: {}",
                            user_config_path, e
                        );
                    }
                }
            }
        }

        let local_config_path = std::path::Path::new("alphabets.toml");
        if local_config_path.exists() {
            match Self::load_from_file(local_config_path) {
                Ok(local_config) => config.merge(local_config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to load local config from {:?}: {}",
                        local_config_path, e
                    );
                }
            }
        }

        Ok(config)
    }

    /// Merges another registry into this one, overriding existing entries.
    pub fn merge(&mut self, other: AlphabetsConfig) {
        for (name, alphabet) in other.alphabets {
            self.alphabets.insert(name, alphabet);
        }
    }

    pub fn get_alphabet(&self, name: &str) -> Option<&AlphabetConfig> {
        self.alphabets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AlphabetsConfig::load_default().unwrap();
        assert!(config.alphabets.contains_key("base32"));
        assert!(config.alphabets.contains_key("base58"));
    }

    #[test]
    fn test_base32_padded_bit_packing() {
        let config = AlphabetsConfig::load_default().unwrap();
        let base32 = config.get_alphabet("base32").unwrap();
        assert_eq!(base32.padding, Some("=".to_string()));
        let alphabet = base32.to_alphabet().unwrap();
        assert_eq!(alphabet.mode(), EncodingMode::BitPacking);
        assert_eq!(alphabet.radix(), 32);
    }

    #[test]
    fn test_base85_shortcuts_from_config() {
        let config = AlphabetsConfig::load_default().unwrap();
        let ascii85 = config.get_alphabet("base85_ascii").unwrap();
        let alphabet = ascii85.to_alphabet().unwrap();
        assert_eq!(alphabet.mode(), EncodingMode::Block);
        assert_eq!(alphabet.zero_shortcut(), Some('z'));
        assert_eq!(alphabet.space_shortcut(), Some('y'));
    }

    #[test]
    fn test_mode_inference() {
        assert_eq!(EncodingMode::for_radix(16), EncodingMode::BitPacking);
        assert_eq!(EncodingMode::for_radix(32), EncodingMode::BitPacking);
        assert_eq!(EncodingMode::for_radix(58), EncodingMode::BigInteger);
        assert_eq!(EncodingMode::for_radix(85), EncodingMode::Block);
        assert_eq!(EncodingMode::for_radix(62), EncodingMode::BigInteger);
    }

    #[test]
    fn test_merge_configs() {
        let mut config1 = AlphabetsConfig {
            alphabets: HashMap::new(),
        };
        config1.alphabets.insert(
            "test1".to_string(),
            AlphabetConfig {
                symbols: "ABC".to_string(),
                mode: None,
                padding: None,
                case_insensitive: false,
                zero_shortcut: None,
                space_shortcut: None,
            },
        );

        let mut config2 = AlphabetsConfig {
            alphabets: HashMap::new(),
        };
        config2.alphabets.insert(
            "test1".to_string(),
            AlphabetConfig {
                symbols: "DEF".to_string(),
                mode: None,
                padding: None,
                case_insensitive: false,
                zero_shortcut: None,
                space_shortcut: None,
            },
        );

        config1.merge(config2);
        assert_eq!(config1.get_alphabet("test1").unwrap().symbols, "DEF");
    }

    #[test]
    fn test_load_from_toml_string() {
        let toml_content = r#"
[alphabets.custom]
symbols = "0123456789"
mode = "big_integer"
"#;
        let config = AlphabetsConfig::from_toml(toml_content).unwrap();
        let custom = config.get_alphabet("custom").unwrap();
        assert_eq!(custom.symbols, "0123456789");
        assert_eq!(custom.mode, Some(EncodingMode::BigInteger));
    }
}
