//! Read-only views over raw NVMe Identify data structures
//!
//! An Identify command always returns a 4096-byte buffer. Only three
//! standard fields are read here (model number, firmware revision, and the
//! vendor-specific region); everything else is opaque to this crate.

/// Size of every Identify payload, per the NVMe Identify command contract
pub const IDENTIFY_BUFFER_SIZE: usize = 4096;

const MODEL_NUMBER_OFFSET: usize = 24;
const MODEL_NUMBER_LEN: usize = 40;
const FIRMWARE_REV_OFFSET: usize = 64;
const FIRMWARE_REV_LEN: usize = 8;

/// Offset of the vendor-specific region in Identify Controller data
pub const CTRL_VS_OFFSET: usize = 3072;
/// Length of the Identify Controller vendor-specific region
pub const CTRL_VS_LEN: usize = IDENTIFY_BUFFER_SIZE - CTRL_VS_OFFSET;

/// Offset of the vendor-specific region in Identify Namespace data
pub const NS_VS_OFFSET: usize = 384;
/// Length of the Identify Namespace vendor-specific region
pub const NS_VS_LEN: usize = IDENTIFY_BUFFER_SIZE - NS_VS_OFFSET;

/// Owned Identify Controller payload
#[derive(Clone)]
pub struct IdCtrl {
    raw: Box<[u8; IDENTIFY_BUFFER_SIZE]>,
}

impl IdCtrl {
    /// Wrap a raw Identify Controller buffer
    pub fn from_raw(raw: Box<[u8; IDENTIFY_BUFFER_SIZE]>) -> Self {
        Self { raw }
    }

    /// Model number (MN), trimmed of padding
    pub fn model_number(&self) -> String {
        fixed_string(&self.raw[..], MODEL_NUMBER_OFFSET, MODEL_NUMBER_LEN)
    }

    /// Firmware revision (FR), trimmed of padding
    pub fn firmware_rev(&self) -> String {
        fixed_string(&self.raw[..], FIRMWARE_REV_OFFSET, FIRMWARE_REV_LEN)
    }

    /// Vendor-specific region bytes
    pub fn vs(&self) -> &[u8] {
        &self.raw[CTRL_VS_OFFSET..]
    }
}

/// Owned Identify Namespace payload
#[derive(Clone)]
pub struct IdNs {
    raw: Box<[u8; IDENTIFY_BUFFER_SIZE]>,
}

impl IdNs {
    /// Wrap a raw Identify Namespace buffer
    pub fn from_raw(raw: Box<[u8; IDENTIFY_BUFFER_SIZE]>) -> Self {
        Self { raw }
    }

    /// Vendor-specific region bytes
    pub fn vs(&self) -> &[u8] {
        &self.raw[NS_VS_OFFSET..]
    }
}

/// Read a fixed-width, NUL-terminated-or-truncated string field
///
/// Never reads past the declared capacity; trailing NULs and the space
/// padding NVMe uses for ASCII fields are stripped.
pub(crate) fn fixed_string(buffer: &[u8], offset: usize, len: usize) -> String {
    let bytes = &buffer[offset..offset + len];
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_with(offset: usize, text: &[u8]) -> IdCtrl {
        let mut raw = Box::new([0u8; IDENTIFY_BUFFER_SIZE]);
        raw[offset..offset + text.len()].copy_from_slice(text);
        IdCtrl::from_raw(raw)
    }

    #[test]
    fn model_number_stops_at_nul() {
        let ctrl = ctrl_with(MODEL_NUMBER_OFFSET, b"Eideticom NoLoad U.2\0garbage");
        assert_eq!(ctrl.model_number(), "Eideticom NoLoad U.2");
    }

    #[test]
    fn firmware_rev_trims_space_padding() {
        let ctrl = ctrl_with(FIRMWARE_REV_OFFSET, b"6.0.0   ");
        assert_eq!(ctrl.firmware_rev(), "6.0.0");
    }

    #[test]
    fn vs_regions_have_expected_extents() {
        assert_eq!(CTRL_VS_LEN, 1024);
        assert_eq!(NS_VS_LEN, 3712);

        let ctrl = ctrl_with(0, &[]);
        assert_eq!(ctrl.vs().len(), CTRL_VS_LEN);

        let ns = IdNs::from_raw(Box::new([0u8; IDENTIFY_BUFFER_SIZE]));
        assert_eq!(ns.vs().len(), NS_VS_LEN);
    }

    #[test]
    fn fixed_string_never_reads_past_capacity() {
        let buffer = *b"abcdefgh";
        assert_eq!(fixed_string(&buffer, 0, 4), "abcd");
    }
}
