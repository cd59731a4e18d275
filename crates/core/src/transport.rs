//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::device::InterfaceDescriptor;
use crate::error::{Error, Result};
use std::ffi::CString;
use tracing::debug;

/// Enumerates and opens HID interfaces.
pub trait HidBackend {
    type Handle: HidHandle;

    /// List every interface exposed for the vendor/product pair, in host order.
    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Result<Vec<InterfaceDescriptor>>;

    /// Open one interface by path. Dropping the handle closes it.
    fn open(&self, path: &str) -> Result<Self::Handle>;
}

/// Raw I/O on one open HID interface.
pub trait HidHandle {
    /// Write a raw report and return the number of bytes written.
    fn write(&self, data: &[u8]) -> Result<usize>;

    /// Read one report, waiting at most `timeout_ms`. Returns 0 on timeout.
    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}

/// Backend over the host's native HID library.
pub struct HidApiBackend {
    api: hidapi::HidApi,
}

impl HidApiBackend {
    pub fn new() -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        Ok(Self { api })
    }
}

impl HidBackend for HidApiBackend {
    type Handle = hidapi::HidDevice;

    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Result<Vec<InterfaceDescriptor>> {
        debug!("Starting HID device enumeration");
        let interfaces: Vec<InterfaceDescriptor> = self
            .api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| InterfaceDescriptor {
                path: info.path().to_string_lossy().into_owned(),
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                usage_page: info.usage_page(),
                usage: info.usage(),
                interface_number: info.interface_number(),
            })
            .collect();
        debug!(count = interfaces.len(), "Device enumeration complete");
        Ok(interfaces)
    }

    fn open(&self, path: &str) -> Result<Self::Handle> {
        let c_path = CString::new(path).map_err(|e| Error::OpenFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        self.api
            .open_path(&c_path)
            .map_err(|e| Error::OpenFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl HidHandle for hidapi::HidDevice {
    fn write(&self, data: &[u8]) -> Result<usize> {
        hidapi::HidDevice::write(self, data).map_err(|e| Error::Hid(format!("write: {e}")))
    }

    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        hidapi::HidDevice::read_timeout(self, buf, timeout_ms)
            .map_err(|e| Error::Hid(format!("read_timeout: {e}")))
    }
}
