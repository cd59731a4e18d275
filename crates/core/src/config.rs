//! Configuration read-back slots and their decoding.
//!
//! After a `0x55` request the device answers with six reports. Only the first
//! two bytes of a slot are understood:
//!
//! ```text
//! [0]   key index (1 or 2)
//! [1]   key mode tag (0x01..=0x04)
//! [2..] not reverse-engineered; kept as raw payload
//! ```

use crate::command::{KeyMode, KeyProgramEntry};
use crate::error::{Error, Result};
use crate::safety;
use serde::Serialize;

/// Number of responses the device sends for one read request.
pub const CONFIG_SLOT_COUNT: usize = 6;

/// One read-back response. `data` is `None` when the read returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSlot {
    pub index: usize,
    pub data: Option<Vec<u8>>,
}

impl ConfigSlot {
    pub fn is_present(&self) -> bool {
        self.data.is_some()
    }

    /// Slot bytes, or `ReadTimeout` when the slot is absent.
    pub fn bytes(&self) -> Result<&[u8]> {
        self.data
            .as_deref()
            .ok_or(Error::ReadTimeout { slot: self.index })
    }

    /// Hex of the first 8 bytes, for display.
    pub fn preview(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|d| d.iter().take(8).map(|b| format!("{b:02x}")).collect())
    }
}

/// A decoded slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedSlot {
    /// Header recognized; `payload` holds the uninterpreted remainder.
    Entry(KeyProgramEntry),
    /// Header not recognized.
    Raw { bytes: Vec<u8> },
}

/// Decode one present slot's bytes.
pub fn decode(data: &[u8]) -> DecodedSlot {
    if let [key_index, tag, rest @ ..] = data {
        if let Some(mode) = KeyMode::from_tag(*tag) {
            if safety::validate_key_index(*key_index).is_ok() {
                return DecodedSlot::Entry(KeyProgramEntry {
                    key_index: *key_index,
                    mode,
                    payload: rest.to_vec(),
                });
            }
        }
    }
    DecodedSlot::Raw {
        bytes: data.to_vec(),
    }
}

/// Decode every slot, keeping absent slots as `None` in their original position.
pub fn decode_all(slots: &[ConfigSlot]) -> Vec<Option<DecodedSlot>> {
    slots
        .iter()
        .map(|slot| slot.data.as_deref().map(decode))
        .collect()
}
