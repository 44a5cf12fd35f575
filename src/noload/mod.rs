//! NoLoad vendor-specific structure decoding
//!
//! The on-wire layout of the vendor-specific identify regions changed
//! incompatibly across NoLoad firmware generations. The format version is a
//! controller-level property derived from the firmware-revision text; it
//! selects which overlay applies to the namespace region.

pub mod ctrl;
pub mod ns;
pub mod status;

pub use ctrl::CtrlRecord;
pub use ns::{Accelerator, NsRecord, NsRecordV4, NsRecordV6};
pub use status::{decode_status, decode_status_v4, decode_status_v6, RegisterField};

use std::fmt;

use serde::Serialize;

/// Discriminator selecting which vendor-specific layout applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatVersion {
    /// Single embedded accelerator descriptor
    V4,
    /// Namespace header plus a counted accelerator descriptor array
    V6,
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::V4 => write!(f, "4"),
            FormatVersion::V6 => write!(f, "6"),
        }
    }
}

/// Extract the format version from firmware-revision text
///
/// The leading decimal integer of the revision is the version tag. Anything
/// without a parseable leading integer, or with an integer outside the known
/// set, is an unknown version; callers must refuse to overlay rather than
/// guess a layout.
pub fn detect_version(firmware_rev: &str) -> Option<FormatVersion> {
    let digits: String = firmware_rev
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>().ok()? {
        4 => Some(FormatVersion::V4),
        6 => Some(FormatVersion::V6),
        other => {
            log::debug!("firmware revision {firmware_rev:?} carries unknown version {other}");
            None
        }
    }
}

/// Read a little-endian 32-bit word at `offset`
pub(crate) fn le32(buffer: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buffer[offset],
        buffer[offset + 1],
        buffer[offset + 2],
        buffer[offset + 3],
    ])
}
