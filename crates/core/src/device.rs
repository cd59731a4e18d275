//! Device model: interface descriptors and vendor interface selection.
//!
//! The keypad exposes several HID interfaces (keyboard, consumer control,
//! vendor). Only the vendor interface, usage page 0xFF00, accepts commands.

use serde::Serialize;

/// Usage page of the vendor-specific command interface.
pub const VENDOR_USAGE_PAGE: u16 = 0xFF00;

/// One HID interface exposed by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDescriptor {
    /// Opaque platform path used to open the interface.
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: u16,
    pub usage: u16,
    pub interface_number: i32,
}

impl InterfaceDescriptor {
    pub fn is_vendor_interface(&self) -> bool {
        self.usage_page == VENDOR_USAGE_PAGE
    }
}

/// First vendor interface in enumeration order, if any.
pub fn find_vendor_interface(interfaces: &[InterfaceDescriptor]) -> Option<&InterfaceDescriptor> {
    interfaces.iter().find(|d| d.is_vendor_interface())
}
