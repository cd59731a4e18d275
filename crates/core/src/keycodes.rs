//! Keycode table for the keypad firmware.
//!
//! The base range follows the USB HID keyboard usage table. Uppercase letters
//! and shifted symbols use a proprietary extended range so a string macro can
//! type them without a separate modifier byte per character.

use crate::error::{Error, Result};

/// Named keys and unshifted characters in the standard HID range.
const BASE_KEYS: &[(&str, u8)] = &[
    ("a", 0x04),
    ("b", 0x05),
    ("c", 0x06),
    ("d", 0x07),
    ("e", 0x08),
    ("f", 0x09),
    ("g", 0x0A),
    ("h", 0x0B),
    ("i", 0x0C),
    ("j", 0x0D),
    ("k", 0x0E),
    ("l", 0x0F),
    ("m", 0x10),
    ("n", 0x11),
    ("o", 0x12),
    ("p", 0x13),
    ("q", 0x14),
    ("r", 0x15),
    ("s", 0x16),
    ("t", 0x17),
    ("u", 0x18),
    ("v", 0x19),
    ("w", 0x1A),
    ("x", 0x1B),
    ("y", 0x1C),
    ("z", 0x1D),
    ("1", 0x1E),
    ("2", 0x1F),
    ("3", 0x20),
    ("4", 0x21),
    ("5", 0x22),
    ("6", 0x23),
    ("7", 0x24),
    ("8", 0x25),
    ("9", 0x26),
    ("0", 0x27),
    ("enter", 0x28),
    ("esc", 0x29),
    ("backspace", 0x2A),
    ("tab", 0x2B),
    ("space", 0x2C),
    (" ", 0x2C),
    ("-", 0x2D),
    ("=", 0x2E),
    ("[", 0x2F),
    ("]", 0x30),
    ("\\", 0x31),
    (";", 0x33),
    ("'", 0x34),
    ("`", 0x35),
    (",", 0x36),
    (".", 0x37),
    ("/", 0x38),
    ("f1", 0x3A),
    ("f2", 0x3B),
    ("f3", 0x3C),
    ("f4", 0x3D),
    ("f5", 0x3E),
    ("f6", 0x3F),
    ("f7", 0x40),
    ("f8", 0x41),
    ("f9", 0x42),
    ("f10", 0x43),
    ("f11", 0x44),
    ("f12", 0x45),
];

/// Shifted symbols. Not contiguous: 0xA0 has no symbol.
const SHIFTED_KEYS: &[(char, u8)] = &[
    ('~', 0x95),
    ('!', 0x96),
    ('@', 0x97),
    ('#', 0x98),
    ('$', 0x99),
    ('%', 0x9A),
    ('^', 0x9B),
    ('&', 0x9C),
    ('*', 0x9D),
    ('(', 0x9E),
    (')', 0x9F),
    ('_', 0xA1),
    ('+', 0xA2),
    ('{', 0xA3),
    ('}', 0xA4),
    ('|', 0xA5),
    (':', 0xA6),
    ('"', 0xA7),
    ('<', 0xA8),
    ('>', 0xA9),
    ('?', 0xAA),
];

/// First code of the uppercase range (`A`). `Z` is `UPPERCASE_BASE + 25`.
pub const UPPERCASE_BASE: u8 = 0xAB;

/// Standard HID modifier bits used by combo mode.
pub mod modifiers {
    pub const LCTRL: u8 = 0x01;
    pub const LSHIFT: u8 = 0x02;
    pub const LALT: u8 = 0x04;
    pub const LGUI: u8 = 0x08;
    pub const RCTRL: u8 = 0x10;
    pub const RSHIFT: u8 = 0x20;
    pub const RALT: u8 = 0x40;
    pub const RGUI: u8 = 0x80;
}

/// Resolve a key name or single character to a keycode.
///
/// Lookup order: base table (exact match), uppercase letters, shifted symbols.
pub fn lookup(token: &str) -> Option<u8> {
    if let Some(code) = lookup_base(token) {
        return Some(code);
    }

    let mut chars = token.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return None,
    };

    if c.is_ascii_uppercase() {
        return Some(UPPERCASE_BASE + (c as u8 - b'A'));
    }

    SHIFTED_KEYS
        .iter()
        .find(|(sym, _)| *sym == c)
        .map(|&(_, code)| code)
}

/// Resolve a name from the base table only (no extended macro range).
pub fn lookup_base(name: &str) -> Option<u8> {
    BASE_KEYS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Resolve a single character, as typed in a string macro.
pub fn lookup_char(c: char) -> Option<u8> {
    let mut buf = [0u8; 4];
    lookup(c.encode_utf8(&mut buf))
}

/// Names accepted by [`lookup`] from the base table, for help output.
pub fn base_key_names() -> impl Iterator<Item = &'static str> {
    BASE_KEYS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| *name != " ")
}

fn modifier_from_name(name: &str) -> Option<u8> {
    match name {
        "ctrl" | "lctrl" | "control" => Some(modifiers::LCTRL),
        "shift" | "lshift" => Some(modifiers::LSHIFT),
        "alt" | "lalt" => Some(modifiers::LALT),
        "gui" | "lgui" | "win" | "meta" | "cmd" => Some(modifiers::LGUI),
        "rctrl" => Some(modifiers::RCTRL),
        "rshift" => Some(modifiers::RSHIFT),
        "ralt" => Some(modifiers::RALT),
        "rgui" => Some(modifiers::RGUI),
        _ => None,
    }
}

/// Parse a combo such as `a`, `enter`, `ctrl+shift+t` or `0x2c`.
///
/// Returns `(modifier, keycode)`. Parsing is case-insensitive. The final
/// `+`-separated part is the key: a base-table name first, otherwise a hex
/// keycode with optional `0x` prefix. Uppercase letters and shifted symbols
/// belong to the macro range and are not accepted here; `+` itself is not a
/// key, write it as `shift+=`.
pub fn parse_combo(text: &str) -> Result<(u8, u8)> {
    let lower = text.trim().to_lowercase();

    let mut parts: Vec<&str> = lower.split('+').collect();
    let key = parts
        .pop()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::UnknownKeyToken(text.to_string()))?;

    let mut modifier = 0u8;
    for part in parts {
        modifier |= modifier_from_name(part.trim())
            .ok_or_else(|| Error::UnknownKeyToken(part.to_string()))?;
    }

    let keycode = match lookup_base(key) {
        Some(code) => code,
        None => {
            let hex = key.strip_prefix("0x").unwrap_or(key);
            u8::from_str_radix(hex, 16).map_err(|_| Error::UnknownKeyToken(key.to_string()))?
        }
    };

    Ok((modifier, keycode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_base_range() {
        assert_eq!(lookup("a"), Some(0x04));
        assert_eq!(lookup("z"), Some(0x1D));
        assert_eq!(lookup("1"), Some(0x1E));
        assert_eq!(lookup("0"), Some(0x27));
        assert_eq!(lookup("enter"), Some(0x28));
        assert_eq!(lookup("space"), Some(0x2C));
        assert_eq!(lookup(" "), Some(0x2C));
        assert_eq!(lookup("/"), Some(0x38));
    }

    #[test]
    fn lookup_function_keys() {
        assert_eq!(lookup("f1"), Some(0x3A));
        assert_eq!(lookup("f12"), Some(0x45));
    }

    #[test]
    fn lookup_uppercase_extended_range() {
        assert_eq!(lookup("A"), Some(0xAB));
        assert_eq!(lookup("M"), Some(0xB7));
        assert_eq!(lookup("Z"), Some(0xC4));
    }

    #[test]
    fn lookup_shifted_symbols() {
        assert_eq!(lookup("!"), Some(0x96));
        assert_eq!(lookup("~"), Some(0x95));
        assert_eq!(lookup(")"), Some(0x9F));
        assert_eq!(lookup("_"), Some(0xA1));
        assert_eq!(lookup("?"), Some(0xAA));
        assert_eq!(lookup("\""), Some(0xA7));
    }

    #[test]
    fn extended_range_skips_a0() {
        assert!(SHIFTED_KEYS.iter().all(|&(_, code)| code != 0xA0));
    }

    #[test]
    fn lookup_unknown_tokens() {
        assert_eq!(lookup("Enter"), None);
        assert_eq!(lookup("f13"), None);
        assert_eq!(lookup("é"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn lookup_char_matches_lookup() {
        assert_eq!(lookup_char('a'), Some(0x04));
        assert_eq!(lookup_char('A'), Some(0xAB));
        assert_eq!(lookup_char(' '), Some(0x2C));
        assert_eq!(lookup_char('\n'), None);
    }

    #[test]
    fn base_key_names_excludes_space_alias() {
        let names: Vec<_> = base_key_names().collect();
        assert!(names.contains(&"enter"));
        assert!(names.contains(&"space"));
        assert!(!names.contains(&" "));
    }

    #[test]
    fn parse_combo_plain_key() {
        assert_eq!(parse_combo("a").unwrap(), (0, 0x04));
        assert_eq!(parse_combo("Enter").unwrap(), (0, 0x28));
        assert_eq!(parse_combo("A").unwrap(), (0, 0x04));
    }

    #[test]
    fn lookup_base_excludes_macro_range() {
        assert_eq!(lookup_base("a"), Some(0x04));
        assert_eq!(lookup_base("f12"), Some(0x45));
        assert_eq!(lookup_base("A"), None);
        assert_eq!(lookup_base("!"), None);
        assert_eq!(lookup_base("+"), None);
    }

    #[test]
    fn parse_combo_rejects_shifted_symbols() {
        assert!(matches!(parse_combo("!"), Err(Error::UnknownKeyToken(_))));
        assert!(matches!(parse_combo("+"), Err(Error::UnknownKeyToken(_))));
        assert!(matches!(parse_combo("ctrl+?"), Err(Error::UnknownKeyToken(_))));
    }

    #[test]
    fn plus_key_is_written_as_shift_equals() {
        assert!(matches!(parse_combo("ctrl++"), Err(Error::UnknownKeyToken(_))));
        assert_eq!(
            parse_combo("ctrl+shift+=").unwrap(),
            (modifiers::LCTRL | modifiers::LSHIFT, 0x2E)
        );
    }

    #[test]
    fn parse_combo_with_modifiers() {
        assert_eq!(
            parse_combo("ctrl+c").unwrap(),
            (modifiers::LCTRL, 0x06)
        );
        assert_eq!(
            parse_combo("Ctrl+Shift+T").unwrap(),
            (modifiers::LCTRL | modifiers::LSHIFT, 0x17)
        );
        assert_eq!(parse_combo("win+f4").unwrap(), (modifiers::LGUI, 0x3D));
    }

    #[test]
    fn parse_combo_hex_fallback() {
        assert_eq!(parse_combo("0x4c").unwrap(), (0, 0x4C));
        assert_eq!(parse_combo("e8").unwrap(), (0, 0xE8));
        assert_eq!(parse_combo("alt+0x2b").unwrap(), (modifiers::LALT, 0x2B));
    }

    #[test]
    fn parse_combo_rejects_unknown() {
        assert!(matches!(
            parse_combo("hyper+a"),
            Err(Error::UnknownKeyToken(_))
        ));
        assert!(matches!(parse_combo("ctrl+"), Err(Error::UnknownKeyToken(_))));
        assert!(matches!(parse_combo("zzz"), Err(Error::UnknownKeyToken(_))));
    }
}
