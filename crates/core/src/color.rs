//! RGB color values and parsing of user color text.

use crate::error::{Error, Result};

/// An RGB color in logical order. The wire order is decided by the command
/// encoder, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("white", Rgb::new(255, 255, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("purple", Rgb::new(128, 0, 128)),
    ("orange", Rgb::new(255, 165, 0)),
    ("pink", Rgb::new(255, 192, 203)),
    ("off", Rgb::new(0, 0, 0)),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Names accepted by [`Rgb::parse`].
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMED_COLORS.iter().map(|(name, _)| *name)
    }

    /// Parse a color name, `#RRGGBB`, `RRGGBB`, or `r,g,b`.
    pub fn parse(text: &str) -> Result<Self> {
        let lower = text.trim().to_lowercase();

        if let Some(&(_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Ok(rgb);
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(Self::new(r, g, b));
            }
        }

        let parts: Vec<&str> = lower.split(',').map(str::trim).collect();
        if let [r, g, b] = parts.as_slice() {
            if let (Ok(r), Ok(g), Ok(b)) = (r.parse(), g.parse(), b.parse()) {
                return Ok(Self::new(r, g, b));
            }
        }

        Err(Error::InvalidColor(text.to_string()))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named() {
        assert_eq!(Rgb::parse("red").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::parse("  Orange ").unwrap(), Rgb::new(255, 165, 0));
        assert_eq!(Rgb::parse("off").unwrap(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn parse_hex() {
        assert_eq!(Rgb::parse("#00FF00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::parse("ff8000").unwrap(), Rgb::new(255, 128, 0));
    }

    #[test]
    fn parse_triple() {
        assert_eq!(Rgb::parse("255,128,0").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::parse("1, 2, 3").unwrap(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Rgb::parse("chartreuse").is_err());
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#GGGGGG").is_err());
        assert!(Rgb::parse("256,0,0").is_err());
        assert!(Rgb::parse("1,2").is_err());
        assert!(Rgb::parse("").is_err());
    }

    #[test]
    fn display_as_hex() {
        assert_eq!(Rgb::new(255, 128, 0).to_string(), "#FF8000");
    }
}
