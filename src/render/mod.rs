//! Presentation back ends for decoded NoLoad records
//!
//! The text and JSON renderers are kept field-for-field equivalent: both
//! consume the same decoded records and build the trailing-payload dump
//! from the shared [`hexdump_rows`] helper, so operators can script against
//! either form.

pub mod json;
pub mod text;

use serde::Serialize;

/// Output form selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Line-oriented text
    Normal,
    /// Structured JSON document
    Json,
}

/// Detail level of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Raw field values only
    Plain,
    /// Adds the status-register breakdown and decoded controller strings
    Verbose,
}

impl Mode {
    /// Whether human-readable decorations are requested
    pub fn is_verbose(self) -> bool {
        self == Mode::Verbose
    }
}

/// Bytes per hex-dump row
const DUMP_ROW_LEN: usize = 16;

/// One rendered hex-dump row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpRow {
    /// Byte offset of the first byte in the row
    pub offset: usize,
    /// Space-separated two-digit hex bytes
    pub hex: String,
    /// Printable-ASCII projection, `.` for everything else
    pub ascii: String,
}

impl DumpRow {
    /// Row as rendered in text output
    pub fn line(&self) -> String {
        format!("{:04x}: {:<47} \"{}\"", self.offset, self.hex, self.ascii)
    }
}

/// Group `data` into 16-byte dump rows; the final row may be partial
pub fn hexdump_rows(data: &[u8]) -> Vec<DumpRow> {
    data.chunks(DUMP_ROW_LEN)
        .enumerate()
        .map(|(i, chunk)| DumpRow {
            offset: i * DUMP_ROW_LEN,
            hex: chunk
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" "),
            ascii: chunk
                .iter()
                .map(|&b| {
                    if (0x20..0x7f).contains(&b) {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_payload_yields_no_rows() {
        assert!(hexdump_rows(&[]).is_empty());
    }

    #[test]
    fn rows_group_sixteen_bytes_with_partial_tail() {
        let data: Vec<u8> = (0u8..20).collect();
        let rows = hexdump_rows(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].offset, 0);
        assert_eq!(rows[1].offset, 16);
        assert_eq!(rows[0].hex.split(' ').count(), 16);
        assert_eq!(rows[1].hex.split(' ').count(), 4);
    }

    #[test]
    fn ascii_projection_masks_unprintables() {
        let rows = hexdump_rows(b"Hi\x00\xff");
        assert_eq!(rows[0].ascii, "Hi..");
        assert_eq!(rows[0].hex, "48 69 00 ff");
    }
}
