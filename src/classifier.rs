//! Keystroke classification.
//!
//! A key is countable when it is a single Unicode letter, a comma, a semicolon
//! or one of the digits `1`-`9`. The space key closes a word, but only when
//! something countable was typed since the previous space.

use std::sync::LazyLock;

use regex::Regex;

/// Average word length used by normalized word counting.
pub const AVERAGE_WORD_LENGTH: f64 = 5.0;

/// How a completed word is converted into a word increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCounting {
    /// `(chars_since_space + 1) / 5`; the `+ 1` is the delimiter itself.
    Normalized,
    /// Every word counts as one.
    Simple,
}

impl WordCounting {
    pub fn from_monkeytype(enabled: bool) -> Self {
        if enabled {
            WordCounting::Normalized
        } else {
            WordCounting::Simple
        }
    }

    pub fn increment(self, chars_since_space: u32) -> f64 {
        match self {
            WordCounting::Normalized => (chars_since_space as f64 + 1.0) / AVERAGE_WORD_LENGTH,
            WordCounting::Simple => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Countable,
    Space,
    Ignored,
}

/// One letter (general category L), comma, semicolon or digit 1-9.
static COUNTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L},;1-9]$").expect("countable pattern is valid"));

pub fn classify(c: char) -> KeyClass {
    let mut buf = [0u8; 4];
    classify_key(c.encode_utf8(&mut buf))
}

/// Classify a host key identifier. Anything that is not exactly one
/// character (`"Shift"`, `"Enter"`, `""`) is ignored.
pub fn classify_key(key: &str) -> KeyClass {
    if key == " " {
        KeyClass::Space
    } else if COUNTABLE.is_match(key) {
        KeyClass::Countable
    } else {
        KeyClass::Ignored
    }
}
