//! Command bodies for the vendor interface.
//!
//! Opcodes:
//!   - `0x57 mode`        select lighting mode
//!   - `0x70 G R B`       set custom color (green first on the wire)
//!   - `0x55`             request configuration read-back (6 responses)
//!   - `key tag ...`      program key `key` (1 or 2) with a [`KeyMode`] tag
//!
//! Bodies are framed by [`crate::frame::frame`] before they reach the device.

use crate::color::Rgb;
use crate::error::Result;
use crate::frame::{self, FramedReport};
use crate::keycodes;
use crate::safety;
use serde::Serialize;
use tracing::{debug, warn};

/// Select lighting mode.
pub const OP_MODE_SELECT: u8 = 0x57;
/// Set custom color.
pub const OP_CUSTOM_COLOR: u8 = 0x70;
/// Request configuration read-back.
pub const OP_READ_CONFIG: u8 = 0x55;

/// Built-in lighting modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightingMode {
    Off = 0,
    /// Whether this is the same as the custom-color path is unconfirmed.
    Static = 1,
    Breathing = 2,
    Rainbow = 3,
    Wave = 4,
    Reactive = 5,
    Custom = 6,
}

impl LightingMode {
    /// All modes, in index order.
    pub const ALL: &'static [LightingMode] = &[
        LightingMode::Off,
        LightingMode::Static,
        LightingMode::Breathing,
        LightingMode::Rainbow,
        LightingMode::Wave,
        LightingMode::Reactive,
        LightingMode::Custom,
    ];

    /// Mode index sent after [`OP_MODE_SELECT`].
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Static => "static",
            Self::Breathing => "breathing",
            Self::Rainbow => "rainbow",
            Self::Wave => "wave",
            Self::Reactive => "reactive",
            Self::Custom => "custom",
        }
    }

    /// Parse a mode name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|m| m.name() == lower)
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl std::fmt::Display for LightingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.index())
    }
}

/// Key-program mode tag (second byte of a key-program body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum KeyMode {
    /// One keycode plus optional modifier.
    Combo = 0x01,
    Mouse = 0x02,
    Media = 0x03,
    /// Sequence of keycodes typed on a single press.
    StringMacro = 0x04,
}

impl KeyMode {
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Combo),
            0x02 => Some(Self::Mouse),
            0x03 => Some(Self::Media),
            0x04 => Some(Self::StringMacro),
            _ => None,
        }
    }
}

/// Configuration of one physical key.
///
/// When built by this crate, `payload` is `[modifier, keycode]` for combo mode
/// and `[0x00, keycode...]` for string macros. When decoded from a read-back
/// slot, `payload` is the uninterpreted remainder of the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyProgramEntry {
    pub key_index: u8,
    pub mode: KeyMode,
    pub payload: Vec<u8>,
}

/// A logical command before framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ModeSelect(u8),
    CustomColor(Rgb),
    KeyProgram(KeyProgramEntry),
    ReadConfig,
}

impl Command {
    /// Command body bytes, without length prefix or padding.
    pub fn body(&self) -> Vec<u8> {
        match self {
            Self::ModeSelect(index) => vec![OP_MODE_SELECT, *index],
            Self::CustomColor(rgb) => vec![OP_CUSTOM_COLOR, rgb.g, rgb.r, rgb.b],
            Self::KeyProgram(entry) => {
                let mut body = Vec::with_capacity(2 + entry.payload.len());
                body.push(entry.key_index);
                body.push(entry.mode.tag());
                body.extend_from_slice(&entry.payload);
                body
            }
            Self::ReadConfig => vec![OP_READ_CONFIG],
        }
    }

    /// The 64-byte report carrying this command.
    pub fn frame(&self) -> FramedReport {
        frame::frame(&self.body())
    }
}

/// Build a lighting mode selection. Any index is passed through verbatim.
pub fn mode_select(index: u8) -> Command {
    Command::ModeSelect(index)
}

/// Build a custom color command.
pub fn custom_color(rgb: Rgb) -> Command {
    Command::CustomColor(rgb)
}

/// Build a combo key program: `keycode` with optional `modifier` bits.
pub fn key_program_combo(key_index: u8, keycode: u8, modifier: u8) -> Result<Command> {
    safety::validate_key_index(key_index)?;
    Ok(Command::KeyProgram(KeyProgramEntry {
        key_index,
        mode: KeyMode::Combo,
        payload: vec![modifier, keycode],
    }))
}

/// A string macro command plus the characters that had no keycode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMacro {
    pub command: Command,
    pub skipped: Vec<char>,
}

/// Build a string macro key program.
///
/// Characters without a keycode are skipped and reported in
/// [`EncodedMacro::skipped`]. Fails with `EmptyMacro` when nothing resolves
/// and `MacroTooLong` when more than 50 keycodes resolve.
pub fn key_program_string(key_index: u8, text: &str) -> Result<EncodedMacro> {
    safety::validate_key_index(key_index)?;

    let mut codes = Vec::with_capacity(text.len());
    let mut skipped = Vec::new();
    for c in text.chars() {
        match keycodes::lookup_char(c) {
            Some(code) => codes.push(code),
            None => {
                warn!(character = ?c, "Unknown character in macro, skipping");
                skipped.push(c);
            }
        }
    }

    safety::validate_macro_len(codes.len())?;
    debug!(
        key_index,
        keycodes = codes.len(),
        skipped = skipped.len(),
        "Encoded string macro"
    );

    let mut payload = Vec::with_capacity(1 + codes.len());
    payload.push(0x00);
    payload.extend(codes);

    Ok(EncodedMacro {
        command: Command::KeyProgram(KeyProgramEntry {
            key_index,
            mode: KeyMode::StringMacro,
            payload,
        }),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frame::REPORT_LEN;

    #[test]
    fn mode_select_body() {
        assert_eq!(mode_select(3).body(), vec![0x57, 3]);
    }

    #[test]
    fn rainbow_is_index_three() {
        assert_eq!(LightingMode::from_name("rainbow"), Some(LightingMode::Rainbow));
        assert_eq!(LightingMode::Rainbow.index(), 3);
    }

    #[test]
    fn lighting_mode_name_roundtrip() {
        for mode in LightingMode::ALL {
            assert_eq!(LightingMode::from_name(mode.name()), Some(*mode));
            assert_eq!(LightingMode::from_index(mode.index()), Some(*mode));
        }
        assert_eq!(LightingMode::from_name("Custom"), Some(LightingMode::Custom));
        assert_eq!(LightingMode::from_name("disco"), None);
        assert_eq!(LightingMode::from_index(7), None);
    }

    #[test]
    fn static_and_custom_are_distinct() {
        assert_ne!(LightingMode::Static.index(), LightingMode::Custom.index());
        assert_ne!(
            mode_select(LightingMode::Static.index()).body(),
            mode_select(LightingMode::Custom.index()).body()
        );
    }

    #[test]
    fn custom_color_is_grb_on_the_wire() {
        let body = custom_color(Rgb::new(10, 20, 30)).body();
        assert_eq!(body, vec![0x70, 20, 10, 30]);
        assert_ne!(body, vec![0x70, 10, 20, 30]);
    }

    #[test]
    fn combo_body_layout() {
        let cmd = key_program_combo(2, 0x04, 0x01).unwrap();
        assert_eq!(cmd.body(), vec![2, 0x01, 0x01, 0x04]);
    }

    #[test]
    fn combo_default_modifier_is_zero() {
        let cmd = key_program_combo(1, 0x28, 0).unwrap();
        assert_eq!(cmd.body(), vec![1, 0x01, 0x00, 0x28]);
    }

    #[test]
    fn combo_rejects_bad_key_index() {
        assert!(matches!(
            key_program_combo(0, 0x04, 0),
            Err(Error::OutOfRange { field: "key_index", .. })
        ));
        assert!(key_program_combo(3, 0x04, 0).is_err());
    }

    #[test]
    fn string_macro_body_layout() {
        let encoded = key_program_string(1, "Hi!").unwrap();
        assert!(encoded.skipped.is_empty());
        assert_eq!(
            encoded.command.body(),
            vec![1, 0x04, 0x00, 0xAB + 7, 0x0C, 0x96]
        );
    }

    #[test]
    fn string_macro_skips_unknown_characters() {
        let encoded = key_program_string(2, "a\u{e9}b\n").unwrap();
        assert_eq!(encoded.skipped, vec!['\u{e9}', '\n']);
        assert_eq!(encoded.command.body(), vec![2, 0x04, 0x00, 0x04, 0x05]);
    }

    #[test]
    fn string_macro_empty_after_resolution() {
        assert!(matches!(key_program_string(1, ""), Err(Error::EmptyMacro)));
        assert!(matches!(
            key_program_string(1, "\u{e9}\u{e8}"),
            Err(Error::EmptyMacro)
        ));
    }

    #[test]
    fn string_macro_capacity() {
        let fits = "a".repeat(50);
        let encoded = key_program_string(1, &fits).unwrap();
        assert_eq!(encoded.command.body().len(), 53);

        let too_long = "a".repeat(51);
        assert!(matches!(
            key_program_string(1, &too_long),
            Err(Error::MacroTooLong { count: 51, max: 50 })
        ));
    }

    #[test]
    fn skipped_characters_do_not_count_toward_capacity() {
        let text = format!("{}{}", "a".repeat(50), "\u{e9}".repeat(5));
        let encoded = key_program_string(1, &text).unwrap();
        assert_eq!(encoded.skipped.len(), 5);
    }

    #[test]
    fn read_config_frame() {
        let report = Command::ReadConfig.frame();
        assert_eq!(report.len(), REPORT_LEN);
        assert_eq!(report[0], 53);
        assert_eq!(report[1], 0x55);
        assert!(report[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn key_mode_tags() {
        for tag in 1..=4 {
            assert_eq!(KeyMode::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(KeyMode::from_tag(0x02), Some(KeyMode::Mouse));
        assert_eq!(KeyMode::from_tag(0x03), Some(KeyMode::Media));
        assert_eq!(KeyMode::from_tag(0), None);
        assert_eq!(KeyMode::from_tag(5), None);
    }
}
