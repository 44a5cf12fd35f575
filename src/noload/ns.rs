//! Namespace vendor-specific records
//!
//! The namespace region is a version-keyed union on the wire. It is only
//! materialized here through [`NsRecord::overlay`], which validates the
//! bounded-count fields before any sub-structure is read, so callers can
//! never read a V6 field through a V4-shaped accessor.

use serde::Serialize;

use super::{le32, FormatVersion};
use crate::error::{NoloadError, Result};
use crate::identify::fixed_string;

/// Presentation-layer bound on the V6 accelerator count (authoritative)
pub const NS_ACCEL_MAX: u32 = 8;
/// Storage capacity of the V6 accelerator array (never the validation bound)
pub const NS_ACCEL_SLOTS: usize = 27;

/// Capacity of the V4 trailing opaque payload
const V4_SPEC_CAP: usize = 3600;
/// Capacity of a V6 per-accelerator trailing opaque payload
const ACCEL_SPEC_CAP: usize = 104;

/// Byte offset of the first V6 accelerator slot
const ACCEL_BASE: usize = 256;
/// Stride of one V6 accelerator slot
const ACCEL_STRIDE: usize = 128;

/// Decoded namespace vendor-specific record, tagged by format version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NsRecord {
    /// Version 4 layout: one embedded accelerator
    V4(NsRecordV4),
    /// Version 6 layout: header plus counted accelerator array
    V6(NsRecordV6),
}

/// Version 4 namespace record: a single accelerator descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NsRecordV4 {
    /// Accelerator status register
    pub acc_status: u32,
    /// Accelerator name, NUL-trimmed
    pub acc_name: String,
    /// Lock word; non-zero means locked with that value
    pub acc_lock: u32,
    /// Accelerator version word
    pub acc_ver: u32,
    /// Configuration words
    pub acc_cfg: [u32; 6],
    /// Declared trailing-payload length in bytes
    pub acc_spec_len: u32,
    /// Trailing opaque payload, exactly `acc_spec_len` bytes
    pub acc_spec: Vec<u8>,
}

/// Version 6 namespace record: header plus accelerator descriptors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NsRecordV6 {
    /// Namespace type tag
    pub ns_type: u32,
    /// Namespace name, NUL-trimmed
    pub ns_name: String,
    /// Namespace version word
    pub ns_ver: u32,
    /// Feature bitmap
    pub ns_features: u32,
    /// Accelerator descriptors, in array order; length is the validated count
    pub accels: Vec<Accelerator>,
}

/// One V6 accelerator descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accelerator {
    /// Accelerator status register
    pub acc_status: u32,
    /// Job-state word
    pub acc_job_state: u32,
    /// Handshake word
    pub acc_handshake: u32,
    /// Declared trailing-payload length in bytes
    pub acc_spec_len: u32,
    /// Trailing opaque payload, exactly `acc_spec_len` bytes
    pub acc_spec: Vec<u8>,
}

impl NsRecord {
    /// Overlay the namespace vendor-specific region as `version`
    ///
    /// The only constructor. V4 always succeeds structurally; V6 validates
    /// the accelerator count against the presentation bound before any slot
    /// is read. Declared trailing-payload lengths are checked against their
    /// fixed capacity so no read can pass the region.
    pub fn overlay(vs: &[u8], version: FormatVersion) -> Result<Self> {
        match version {
            FormatVersion::V4 => Ok(NsRecord::V4(overlay_v4(vs)?)),
            FormatVersion::V6 => Ok(NsRecord::V6(overlay_v6(vs)?)),
        }
    }

    /// Format version this record was overlaid as
    pub fn version(&self) -> FormatVersion {
        match self {
            NsRecord::V4(_) => FormatVersion::V4,
            NsRecord::V6(_) => FormatVersion::V6,
        }
    }
}

fn spec_payload(vs: &[u8], offset: usize, len: u32, cap: usize) -> Result<Vec<u8>> {
    if len as usize > cap {
        return Err(NoloadError::SpecLenTooLarge {
            len,
            cap: cap as u32,
        });
    }
    Ok(vs[offset..offset + len as usize].to_vec())
}

fn overlay_v4(vs: &[u8]) -> Result<NsRecordV4> {
    let acc_spec_len = le32(vs, 108);
    Ok(NsRecordV4 {
        acc_status: le32(vs, 0),
        acc_name: fixed_string(vs, 16, 48),
        acc_lock: le32(vs, 64),
        acc_ver: le32(vs, 80),
        acc_cfg: [
            le32(vs, 84),
            le32(vs, 88),
            le32(vs, 92),
            le32(vs, 96),
            le32(vs, 100),
            le32(vs, 104),
        ],
        acc_spec_len,
        acc_spec: spec_payload(vs, 112, acc_spec_len, V4_SPEC_CAP)?,
    })
}

fn overlay_v6(vs: &[u8]) -> Result<NsRecordV6> {
    let count = le32(vs, 252);
    if count < 1 || count > NS_ACCEL_MAX {
        return Err(NoloadError::CountOutOfRange { count });
    }

    let mut accels = Vec::with_capacity(count as usize);
    for index in 0..count as usize {
        let base = ACCEL_BASE + index * ACCEL_STRIDE;
        let acc_spec_len = le32(vs, base + 20);
        accels.push(Accelerator {
            acc_status: le32(vs, base),
            acc_job_state: le32(vs, base + 4),
            acc_handshake: le32(vs, base + 8),
            acc_spec_len,
            acc_spec: spec_payload(vs, base + 24, acc_spec_len, ACCEL_SPEC_CAP)?,
        });
    }

    Ok(NsRecordV6 {
        ns_type: le32(vs, 0),
        ns_name: fixed_string(vs, 4, 48),
        ns_ver: le32(vs, 52),
        ns_features: le32(vs, 56),
        accels,
    })
}
