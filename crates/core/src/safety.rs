//! Safety layer: validates key-program parameters before anything is sent
//! to the device.
//!
//! # Keypad bounds
//!
//! ## Key index
//! - **Range**: 1–2 (the two physical keys, numbered from the USB cable side)
//! - Index 0 is not a key; the firmware ignores bodies starting with it.
//!
//! ## String macros
//! - **Capacity**: 50 keycodes. The 53-byte body holds a 3-byte header
//!   `[key_index, 0x04, 0x00]` followed by the keycodes.
//! - Longer macros are rejected rather than cut short by the framer.
//!
//! ## Safety invariants
//! 1. Key indices are bounds-checked against [`KEY_COUNT`]
//! 2. Macro length is checked against [`MAX_MACRO_KEYCODES`]
//! 3. All validation happens BEFORE any HID communication

use crate::error::{Error, Result};
use crate::frame::DATA_LEN;

/// Number of programmable keys on the keypad.
pub const KEY_COUNT: u8 = 2;

/// Header bytes before the keycodes of a string macro body.
pub const MACRO_HEADER_LEN: usize = 3;

/// Maximum keycodes in a single string macro.
pub const MAX_MACRO_KEYCODES: usize = DATA_LEN - MACRO_HEADER_LEN;

/// Validate a 1-based key index.
pub fn validate_key_index(index: u8) -> Result<()> {
    if !(1..=KEY_COUNT).contains(&index) {
        return Err(Error::OutOfRange {
            field: "key_index",
            value: index as u32,
            min: 1,
            max: KEY_COUNT as u32,
        });
    }
    Ok(())
}

/// Validate the resolved keycode count of a string macro.
pub fn validate_macro_len(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::EmptyMacro);
    }
    if count > MAX_MACRO_KEYCODES {
        return Err(Error::MacroTooLong {
            count,
            max: MAX_MACRO_KEYCODES,
        });
    }
    Ok(())
}
