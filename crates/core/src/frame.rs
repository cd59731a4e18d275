//! Report framing for the vendor interface.
//!
//! Every outbound command is carried in a fixed 64-byte report:
//!
//! ```text
//! [0]      length of the body that follows (always DATA_LEN = 53)
//! [1..54]  command body, zero-padded or truncated to 53 bytes
//! [54..64] zero
//! ```

/// Total size of a HID report on the wire.
pub const REPORT_LEN: usize = 64;

/// Fixed body length the firmware expects after the length byte.
pub const DATA_LEN: usize = 0x35;

/// One framed on-wire report.
pub type FramedReport = [u8; REPORT_LEN];

/// Wrap a command body into a 64-byte report.
///
/// Bodies longer than [`DATA_LEN`] are truncated without error, matching what
/// the firmware itself does with oversized bodies.
pub fn frame(body: &[u8]) -> FramedReport {
    let mut report = [0u8; REPORT_LEN];
    report[0] = DATA_LEN as u8;
    let n = body.len().min(DATA_LEN);
    report[1..1 + n].copy_from_slice(&body[..n]);
    report
}
