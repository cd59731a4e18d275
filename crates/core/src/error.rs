//! Error types for qinizx-keypad-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// No enumerated interface matched vendor, product and usage page.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The transport could not open the interface path.
    #[error("failed to open {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    /// Neither write of a double-send reported a positive byte count.
    #[error("write failed: {reason}")]
    WriteFailed { reason: String },

    /// Exactly one write of a double-send failed (1 = first, 2 = second).
    #[error("partial write: send {failed_send} of 2 failed")]
    PartialWrite { failed_send: u8 },

    /// A configuration slot read returned no data.
    #[error("no data for config slot {slot}")]
    ReadTimeout { slot: usize },

    /// A key name or character has no keycode.
    #[error("unknown key: {0:?}")]
    UnknownKeyToken(String),

    /// A string macro resolved to zero keycodes.
    #[error("macro contains no valid keycodes")]
    EmptyMacro,

    /// A string macro resolved to more keycodes than one report can carry.
    #[error("macro too long: {count} keycodes (maximum {max})")]
    MacroTooLong { count: usize, max: usize },

    /// Value out of safe range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// A command was issued on a session without an open handle.
    #[error("device session is not open")]
    NotOpen,

    /// Color text could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
