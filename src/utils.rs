use std::{fmt, str::FromStr};

use ethers::{
    abi::ethereum_types::FromDecStrErr,
    types::{Address, U256},
};
use serde::{
    de::{Error, Unexpected, Visitor},
    Deserializer,
};

/// Strip a leading `0x` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Prepend `0x` unless it is already there.
pub fn add_hex_prefix(s: &str) -> String {
    if s.starts_with("0x") {
        s.to_owned()
    } else {
        format!("0x{}", s)
    }
}

/// Decode a hex string, with or without `0x`.
///
/// # Errors
///
/// Odd length or a non-hex character.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(s))
}

/// Lowercase hex, no prefix
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Big-endian 32-byte word
pub fn u256_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Address left-padded with 12 zero bytes
pub fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Read an address out of a 32-byte word. `None` if the word is not 32
/// bytes or any of the 12 padding bytes is set.
pub fn word_to_address(word: &[u8]) -> Option<Address> {
    if word.len() != 32 || word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some(Address::from_slice(&word[12..]))
}

/// Hex of `value`, left-padded with zeros to `width` characters.
pub fn padded_hex(value: U256, width: usize) -> String {
    format!("{:0>width$}", format!("{:x}", value), width = width)
}

/// True if `data` starts with the 4-byte `selector`. Either side may carry
/// a `0x` prefix.
pub fn is_solidity_method(data: &str, selector: &str) -> bool {
    let selector = strip_hex_prefix(selector);
    strip_hex_prefix(data)
        .get(..selector.len())
        .map(|head| head.eq_ignore_ascii_case(selector))
        .unwrap_or(false)
}

/// Drop `0x` and the selector from `data`. Returns `data` without its
/// prefix if the selector does not match.
pub fn remove_solidity_method_prefix<'a>(data: &'a str, selector: &str) -> &'a str {
    let data = strip_hex_prefix(data);
    if is_solidity_method(data, selector) {
        &data[strip_hex_prefix(selector).len()..]
    } else {
        data
    }
}

/// A U256 wrapper that ensures decimal string encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalU256(pub U256);

impl std::ops::Deref for DecimalU256 {
    type Target = U256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<U256> for DecimalU256 {
    fn from(i: U256) -> Self {
        Self(i)
    }
}

impl From<DecimalU256> for U256 {
    fn from(i: DecimalU256) -> Self {
        i.0
    }
}

impl FromStr for DecimalU256 {
    type Err = FromDecStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(U256::from_dec_str(s)?.into())
    }
}

impl serde::Serialize for DecimalU256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DecimalU256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

// the gateway is inconsistent: most amounts are strings, nonces are numbers
struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = DecimalU256;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a decimal integer or its string representation")
    }

    fn visit_u64<E>(self, value: u64) -> Result<DecimalU256, E>
    where
        E: Error,
    {
        Ok(U256::from(value).into())
    }

    fn visit_str<E>(self, value: &str) -> Result<DecimalU256, E>
    where
        E: Error,
    {
        value.parse::<DecimalU256>().map_err(|_err| {
            E::invalid_value(Unexpected::Str(value), &"a decimal string representation of a u256")
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_handles_prefixes() {
        assert_eq!(add_hex_prefix("0abced"), "0x0abced");
        assert_eq!(add_hex_prefix("0x0abced"), "0x0abced");
        assert_eq!(strip_hex_prefix("0x0abced"), "0abced");
        assert_eq!(strip_hex_prefix("xblablainvalidhex"), "xblablainvalidhex");
    }

    #[test]
    fn it_rejects_bad_hex() {
        assert!(hex_to_bytes("0aa").is_err());
        assert!(hex_to_bytes("0aat").is_err());
        assert_eq!(hex_to_bytes("0x0aac").unwrap(), vec![0x0a, 0xac]);
        assert_eq!(hex_to_bytes("0aac").unwrap(), vec![0x0a, 0xac]);
        assert_eq!(to_hex([0x0f, 0x10]), "0f10");
    }

    #[test]
    fn it_pads_words() {
        let word = u256_word(U256::from(0xaa13u64));
        assert_eq!(word[30..], [0xaa, 0x13]);
        assert!(word[..30].iter().all(|b| *b == 0));

        let addr: Address = "0x000000000000000000000000000000000000abcd".parse().unwrap();
        let word = address_word(addr);
        assert_eq!(word_to_address(&word), Some(addr));

        let mut dirty = word;
        dirty[0] = 1;
        assert_eq!(word_to_address(&dirty), None);
        assert_eq!(word_to_address(&word[1..]), None);

        assert_eq!(padded_hex(U256::from(0xabu64), 8), "000000ab");
    }

    #[test]
    fn it_matches_selectors() {
        assert!(is_solidity_method("0x313ce567somerandomdata", "313ce567"));
        assert!(is_solidity_method("313ce567somerandomdata", "0x313ce567"));
        assert!(!is_solidity_method("0x313cf567somerandomdata", "313ce567"));
        assert!(!is_solidity_method("0x31", "313ce567"));
        assert_eq!(
            remove_solidity_method_prefix("0x313ce567somerandomdata", "0x313ce567"),
            "somerandomdata"
        );
    }

    #[test]
    fn it_deserializes_decimals() {
        let from_str: DecimalU256 = serde_json::from_str("\"1000000000000000000\"").unwrap();
        assert_eq!(*from_str, U256::exp10(18));
        let from_num: DecimalU256 = serde_json::from_str("42").unwrap();
        assert_eq!(*from_num, U256::from(42));
        assert!(serde_json::from_str::<DecimalU256>("\"0x10\"").is_err());
    }

    #[test]
    fn it_serializes_decimals() {
        let max = DecimalU256(U256::MAX);
        let json = serde_json::to_string(&max).unwrap();
        assert_eq!(json, format!("\"{}\"", U256::MAX));
        assert_eq!(serde_json::from_str::<DecimalU256>(&json).unwrap(), max);
        assert_eq!(serde_json::to_string(&DecimalU256(42.into())).unwrap(), "\"42\"");
    }
}
