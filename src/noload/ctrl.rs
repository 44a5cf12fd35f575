//! Controller vendor-specific record
//!
//! The controller region layout is shared by every NoLoad generation; later
//! firmware only appended fields, so one overlay covers all of them.

use serde::Serialize;

use super::le32;

/// Bytes of the controller vendor-specific region actually populated
pub const CTRL_RECORD_LEN: usize = 80;

/// Decoded controller vendor-specific record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CtrlRecord {
    /// Hardware build timestamp, packed (see [`format_build_date`])
    pub hw_build_date: u32,
    /// Firmware build timestamp, packed
    pub fw_build_date: u32,
    /// Board id and major.minor system version, packed
    pub hw_system_ver: u32,
    /// Work-item counter of the firmware build
    pub work_item: u32,
    /// Firmware commit hash, five 32-bit words
    pub fw_commit_sha: [u32; 5],
    /// Hardware commit hash, five 32-bit words
    pub hw_commit_sha: [u32; 5],
    /// Commit hash the firmware binary was compiled from
    pub compiled_fw_commit_sha: [u32; 5],
    /// Jobs issued since power-up
    pub job_id_count: u32,
}

impl CtrlRecord {
    /// Overlay the controller vendor-specific region
    ///
    /// Structurally infallible: the layout is fixed and carries no
    /// variable-count fields. `vs` must hold at least [`CTRL_RECORD_LEN`]
    /// bytes, which the 1024-byte identify region always does.
    pub fn overlay(vs: &[u8]) -> Self {
        Self {
            hw_build_date: le32(vs, 0),
            fw_build_date: le32(vs, 4),
            hw_system_ver: le32(vs, 8),
            work_item: le32(vs, 12),
            fw_commit_sha: sha_words(vs, 16),
            hw_commit_sha: sha_words(vs, 36),
            compiled_fw_commit_sha: sha_words(vs, 56),
            job_id_count: le32(vs, 76),
        }
    }

    /// Hardware build timestamp as a calendar string
    pub fn hw_build_str(&self) -> String {
        format_build_date(self.hw_build_date)
    }

    /// Firmware build timestamp as a calendar string
    pub fn fw_build_str(&self) -> String {
        format_build_date(self.fw_build_date)
    }

    /// Marketing name of the carrier board
    pub fn board_name(&self) -> &'static str {
        match self.hw_system_ver & 0xff {
            1 => "Flash GT Plus (250sp)",
            2 => "AlphaData 9v3",
            3 => "Bittware U2 Series 1",
            4 => "Bittware U2 Series 2",
            5 => "Xilinx VCU1525 v1.1",
            _ => "Unknown",
        }
    }

    /// Hardware system version as `major.minor`
    pub fn system_version(&self) -> String {
        let major = (self.hw_system_ver >> 12) & 0xf;
        let minor = (self.hw_system_ver >> 8) & 0xf;
        format!("{major}.{minor}")
    }

    /// Firmware commit hash as 40 hex digits
    pub fn fw_commit_str(&self) -> String {
        sha_string(&self.fw_commit_sha)
    }

    /// Hardware commit hash as 40 hex digits
    pub fn hw_commit_str(&self) -> String {
        sha_string(&self.hw_commit_sha)
    }

    /// Compiled-from commit hash as 40 hex digits
    pub fn compiled_fw_commit_str(&self) -> String {
        sha_string(&self.compiled_fw_commit_sha)
    }
}

fn sha_words(vs: &[u8], offset: usize) -> [u32; 5] {
    [
        le32(vs, offset),
        le32(vs, offset + 4),
        le32(vs, offset + 8),
        le32(vs, offset + 12),
        le32(vs, offset + 16),
    ]
}

fn sha_string(words: &[u32; 5]) -> String {
    format!(
        "{:08x}{:08x}{:08x}{:08x}{:08x}",
        words[0], words[1], words[2], words[3], words[4]
    )
}

/// Unpack a build-date word into `YYYY-MM-DD HH:MM:SS`
///
/// Layout: day in bits 31:27, month in 26:23, year-since-2000 in 22:17,
/// hour in 16:12, minute in 11:6, second in 5:0. Pure and idempotent.
pub fn format_build_date(word: u32) -> String {
    let day = (word >> 27) & 0x1f;
    let month = (word >> 23) & 0x0f;
    let year = (word >> 17) & 0x3f;
    let hour = (word >> 12) & 0x1f;
    let minute = (word >> 6) & 0x3f;
    let second = word & 0x3f;

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year + 2000,
        month,
        day,
        hour,
        minute,
        second
    )
}
