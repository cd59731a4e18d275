//! Device session: locate, open, send with the firmware's timing, read back.
//!
//! The firmware only latches a command reliably when it is written twice:
//!
//! ```text
//! write(report); sleep(write_settle)      first send
//! sleep(repeat_gap)
//! write(report); sleep(write_settle)      second send
//! ```
//!
//! Both writes are always attempted and both must report a positive byte
//! count for the command to count as acknowledged.

use crate::color::Rgb;
use crate::command::{self, Command, LightingMode};
use crate::config::{ConfigSlot, CONFIG_SLOT_COUNT};
use crate::device::{find_vendor_interface, InterfaceDescriptor};
use crate::error::{Error, Result};
use crate::frame::{FramedReport, REPORT_LEN};
use crate::transport::{HidApiBackend, HidBackend, HidHandle};
use crate::{PRODUCT_ID, VENDOR_ID};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Delays the firmware needs between writes and the bound on each read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Sleep after every individual write.
    pub write_settle: Duration,
    /// Sleep between the two writes of a double-send.
    pub repeat_gap: Duration,
    /// Per-read timeout for configuration slots.
    pub read_timeout_ms: i32,
    /// Wait between closing and reopening the device.
    pub reopen_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            write_settle: Duration::from_millis(20),
            repeat_gap: Duration::from_millis(100),
            read_timeout_ms: 200,
            reopen_settle: Duration::from_millis(200),
        }
    }
}

impl Timing {
    /// No sleeps; for simulated transports only.
    pub fn immediate() -> Self {
        Self {
            write_settle: Duration::ZERO,
            repeat_gap: Duration::ZERO,
            read_timeout_ms: 0,
            reopen_settle: Duration::ZERO,
        }
    }
}

/// One connection to the keypad's vendor interface.
///
/// `Closed -> Open -> Closed`. At most one handle is live; opening again
/// releases the previous handle first.
pub struct DeviceSession<B: HidBackend> {
    backend: B,
    handle: Option<B::Handle>,
    path: Option<String>,
    timing: Timing,
}

impl DeviceSession<HidApiBackend> {
    /// Session over the host HID library, locating and opening the keypad.
    pub fn open_default() -> Result<Self> {
        let mut session = Self::new(HidApiBackend::new()?);
        session.open_vendor_interface()?;
        Ok(session)
    }
}

impl<B: HidBackend> DeviceSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handle: None,
            path: None,
            timing: Timing::default(),
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Path of the open interface.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Every interface the device exposes, vendor or not.
    pub fn interfaces(&self) -> Result<Vec<InterfaceDescriptor>> {
        self.backend.enumerate(VENDOR_ID, PRODUCT_ID)
    }

    /// Find the vendor interface (usage page 0xFF00).
    pub fn locate(&self) -> Result<InterfaceDescriptor> {
        let interfaces = self.interfaces()?;
        for iface in &interfaces {
            debug!(
                path = %iface.path,
                usage_page = format_args!("0x{:04X}", iface.usage_page),
                interface = iface.interface_number,
                "Enumerated interface"
            );
        }

        let found = find_vendor_interface(&interfaces).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "no vendor interface for VID=0x{VENDOR_ID:04X} PID=0x{PRODUCT_ID:04X} ({} interfaces seen)",
                interfaces.len()
            ))
        })?;

        info!(path = %found.path, "Found keypad vendor interface");
        Ok(found)
    }

    /// Open an interface, releasing any handle already held.
    pub fn open(&mut self, descriptor: &InterfaceDescriptor) -> Result<()> {
        if self.is_open() {
            debug!("Session already open, closing previous handle");
            self.close();
        }
        let handle = self.backend.open(&descriptor.path)?;
        info!(path = %descriptor.path, "Opened keypad");
        self.handle = Some(handle);
        self.path = Some(descriptor.path.clone());
        Ok(())
    }

    /// Locate and open the vendor interface.
    pub fn open_vendor_interface(&mut self) -> Result<InterfaceDescriptor> {
        let descriptor = self.locate()?;
        self.open(&descriptor)?;
        Ok(descriptor)
    }

    /// Release the handle. Closing a closed session does nothing.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!(path = ?self.path, "Closed keypad");
        }
        self.path = None;
    }

    /// Close, let the device settle, then locate and open the vendor
    /// interface again. Used between programming and reading back.
    pub fn reopen(&mut self) -> Result<InterfaceDescriptor> {
        self.close();
        thread::sleep(self.timing.reopen_settle);
        self.open_vendor_interface()
    }

    fn handle(&self) -> Result<&B::Handle> {
        self.handle.as_ref().ok_or(Error::NotOpen)
    }

    /// One write followed by the settle delay. Failures are returned, not raised.
    fn write_once(&self, handle: &B::Handle, report: &FramedReport) -> Result<usize> {
        trace!(report_hex = format_args!("{:02X?}", &report[..]), "TX");
        let result = match handle.write(report) {
            Ok(0) => Err(Error::WriteFailed {
                reason: "transport wrote 0 bytes".into(),
            }),
            other => other,
        };
        thread::sleep(self.timing.write_settle);
        result
    }

    /// Send a framed report twice with the firmware's delays.
    ///
    /// Returns the byte count of the second write.
    pub fn send(&self, report: &FramedReport) -> Result<usize> {
        let handle = self.handle()?;

        let first = self.write_once(handle, report);
        thread::sleep(self.timing.repeat_gap);
        let second = self.write_once(handle, report);

        match (first, second) {
            (Ok(_), Ok(n)) => Ok(n),
            (Err(e1), Err(e2)) => {
                warn!(first = %e1, second = %e2, "Both sends failed");
                Err(Error::WriteFailed {
                    reason: e2.to_string(),
                })
            }
            (Err(e), Ok(_)) => {
                warn!(error = %e, "First send failed, second succeeded");
                Err(Error::PartialWrite { failed_send: 1 })
            }
            (Ok(_), Err(e)) => {
                warn!(error = %e, "Second send failed after first succeeded");
                Err(Error::PartialWrite { failed_send: 2 })
            }
        }
    }

    /// Frame and double-send a command.
    pub fn execute(&self, command: &Command) -> Result<usize> {
        debug!(?command, "Sending command");
        self.send(&command.frame())
    }

    /// Select a lighting mode by raw index.
    pub fn set_mode_index(&self, index: u8) -> Result<usize> {
        self.execute(&command::mode_select(index))
    }

    pub fn set_mode(&self, mode: LightingMode) -> Result<usize> {
        self.set_mode_index(mode.index())
    }

    /// Send only the custom color command.
    pub fn set_custom_color(&self, rgb: Rgb) -> Result<usize> {
        self.execute(&command::custom_color(rgb))
    }

    /// Switch to the custom mode, then set its color.
    pub fn apply_custom_color(&self, rgb: Rgb) -> Result<usize> {
        self.set_mode(LightingMode::Custom)?;
        thread::sleep(self.timing.repeat_gap);
        self.set_custom_color(rgb)
    }

    /// Program a key with a keycode and modifier bits.
    pub fn program_combo(&self, key_index: u8, keycode: u8, modifier: u8) -> Result<usize> {
        let cmd = command::key_program_combo(key_index, keycode, modifier)?;
        self.execute(&cmd)
    }

    /// Program a key to type `text`. Returns the characters that were skipped.
    pub fn program_string(&self, key_index: u8, text: &str) -> Result<Vec<char>> {
        let encoded = command::key_program_string(key_index, text)?;
        self.execute(&encoded.command)?;
        Ok(encoded.skipped)
    }

    /// Request the configuration and collect the six response slots.
    ///
    /// Slots that return no data are kept as absent; the read continues.
    pub fn read_config(&self) -> Result<Vec<ConfigSlot>> {
        let handle = self.handle()?;
        let report = Command::ReadConfig.frame();
        trace!(report_hex = format_args!("{:02X?}", &report[..]), "TX read request");
        match handle.write(&report) {
            Ok(n) if n > 0 => {}
            Ok(_) => {
                return Err(Error::WriteFailed {
                    reason: "read request wrote 0 bytes".into(),
                })
            }
            Err(e) => {
                return Err(Error::WriteFailed {
                    reason: e.to_string(),
                })
            }
        }

        let mut slots = Vec::with_capacity(CONFIG_SLOT_COUNT);
        for index in 0..CONFIG_SLOT_COUNT {
            let mut buf = [0u8; REPORT_LEN];
            let data = match handle.read_timeout(&mut buf, self.timing.read_timeout_ms) {
                Ok(n) if n > 0 => {
                    trace!(slot = index, data_hex = format_args!("{:02X?}", &buf[..n]), "RX");
                    Some(buf[..n].to_vec())
                }
                Ok(_) => {
                    debug!(slot = index, "Config slot read timed out");
                    None
                }
                Err(e) => {
                    warn!(slot = index, error = %e, "Config slot read failed");
                    None
                }
            };
            slots.push(ConfigSlot { index, data });
        }

        debug!(
            present = slots.iter().filter(|s| s.is_present()).count(),
            "Config read complete"
        );
        Ok(slots)
    }
}
