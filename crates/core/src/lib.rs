//! qinizx-keypad-core: vendor HID protocol, device discovery, and key programming.
//!
//! This crate provides the cross-platform core logic for the QINIZX 2-key
//! RGB keypad: lighting mode and color selection, per-key combo and string
//! macro programming, and configuration read-back over the vendor HID
//! interface.

pub mod color;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod keycodes;
pub mod safety;
pub mod session;
pub mod transport;

/// Keypad USB Vendor ID.
pub const VENDOR_ID: u16 = 0x8808;

/// Keypad USB Product ID.
pub const PRODUCT_ID: u16 = 0x6601;
