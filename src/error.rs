//! Error types for the noload library

use std::io;
use thiserror::Error;

use crate::transport::status_to_string;

/// Main error type for noload operations
#[derive(Error, Debug)]
pub enum NoloadError {
    /// Malformed invocation; reported before any device I/O is attempted
    #[error("usage error: {0}")]
    Usage(String),

    /// System-level failure opening, stat-ing or identifying a device
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// Identify command completed with a non-zero NVMe status code
    #[error("{}", format_nvme_status(*status, *nsid))]
    NvmeStatus {
        /// Completion status returned by the controller
        status: u32,
        /// Namespace id of the failed command, when it had one
        nsid: Option<u32>,
    },

    /// Controller identified but not made by Eideticom
    #[error("Not an Eideticom device: {model}")]
    VendorMismatch {
        /// Model number reported by the controller
        model: String,
    },

    /// Firmware revision does not map to a known NoLoad layout
    #[error("unrecognized NoLoad version in firmware revision {revision:?}")]
    UnsupportedVersion {
        /// Raw firmware-revision text from Identify Controller
        revision: String,
    },

    /// V6 accelerator count outside the valid presentation range
    #[error("ns_num_accels not valid (must be between 1 and 8), got {count}")]
    CountOutOfRange {
        /// Declared accelerator count
        count: u32,
    },

    /// Declared trailing-payload length exceeds the region capacity
    #[error("acc_spec_len {len} exceeds region capacity of {cap} bytes")]
    SpecLenTooLarge {
        /// Declared payload length
        len: u32,
        /// Fixed capacity of the trailing region
        cap: u32,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_nvme_status(status: u32, nsid: Option<u32>) -> String {
    match nsid {
        Some(n) => format!(
            "NVMe Status:{}({:#x}) NSID:{}",
            status_to_string(status),
            status,
            n
        ),
        None => format!("NVMe Status:{}({:#x})", status_to_string(status), status),
    }
}

/// Result type for noload operations
pub type Result<T> = std::result::Result<T, NoloadError>;
