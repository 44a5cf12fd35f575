//! Identify entry points: vendor check, version detection, orchestration
//!
//! One invocation is one device open, one or two Identify calls, one decode
//! pass, then close. Nothing persists across invocations.

use crate::error::{NoloadError, Result};
use crate::identify::{IdCtrl, IdNs};
use crate::noload::{detect_version, CtrlRecord, FormatVersion, NsRecord};
use crate::transport::{scan_controllers, NvmeDevice};

/// Vendor name matched (case-sensitively) against the controller model number
pub const VENDOR_NAME: &str = "Eideticom";

/// Controller identify result for one device
pub struct ControllerReport {
    /// Model number reported by the controller
    pub model: String,
    /// Raw firmware-revision text
    pub revision: String,
    /// Format version derived from the revision, when recognized
    pub version: Option<FormatVersion>,
    /// Decoded controller vendor-specific record
    pub record: CtrlRecord,
}

/// Namespace identify result for one device
pub struct NamespaceReport {
    /// Namespace the record was read from
    pub nsid: u32,
    /// Format version inherited from the parent controller
    pub version: FormatVersion,
    /// Decoded namespace vendor-specific record
    pub record: NsRecord,
}

/// One vendor controller in the system listing
pub enum ListEntry {
    /// Version 4 card: single accelerator summary
    V4 {
        /// Device node name
        node: String,
        /// Accelerator name
        acc_name: String,
        /// Accelerator version word
        acc_ver: u32,
        /// Accelerator status word
        acc_status: u32,
    },
    /// Version 6 card: namespace summary
    V6 {
        /// Device node name
        node: String,
        /// Namespace name
        ns_name: String,
        /// Namespace version word
        ns_ver: u32,
        /// Validated accelerator count
        num_accels: u32,
    },
}

/// Reject controllers not made by the vendor
fn check_vendor(ctrl: &IdCtrl) -> Result<()> {
    let model = ctrl.model_number();
    if model.contains(VENDOR_NAME) {
        Ok(())
    } else {
        Err(NoloadError::VendorMismatch { model })
    }
}

fn require_version(ctrl: &IdCtrl) -> Result<FormatVersion> {
    let revision = ctrl.firmware_rev();
    detect_version(&revision).ok_or(NoloadError::UnsupportedVersion { revision })
}

/// Run Identify Controller against `path` and decode the vendor region
pub fn controller_report(path: &str) -> Result<ControllerReport> {
    let device = NvmeDevice::open(path)?;
    let ctrl = IdCtrl::from_raw(device.identify_controller()?);
    check_vendor(&ctrl)?;

    let revision = ctrl.firmware_rev();
    Ok(ControllerReport {
        model: ctrl.model_number(),
        version: detect_version(&revision),
        revision,
        record: CtrlRecord::overlay(ctrl.vs()),
    })
}

/// Run Identify Namespace against `path` and decode the vendor region
///
/// The format version is a controller-level property, so Identify
/// Controller runs first; the vendor check happens before any namespace-id
/// handling. When `nsid` is absent it is resolved from the handle, which
/// only works for block nodes.
pub fn namespace_report(path: &str, nsid: Option<u32>) -> Result<NamespaceReport> {
    let device = NvmeDevice::open(path)?;
    let ctrl = IdCtrl::from_raw(device.identify_controller()?);
    check_vendor(&ctrl)?;
    let version = require_version(&ctrl)?;

    let nsid = match nsid {
        Some(n) => n,
        None if device.is_block()? => device.resolve_nsid()?,
        None => {
            return Err(NoloadError::Usage(
                "requesting namespace-id from non-block device".to_string(),
            ))
        }
    };

    let ns = IdNs::from_raw(device.identify_namespace(nsid)?);
    let record = NsRecord::overlay(ns.vs(), version)?;
    log::debug!("decoded {path} nsid {nsid} as version {version}");

    Ok(NamespaceReport {
        nsid,
        version,
        record,
    })
}

/// List every vendor controller under `dev_root`
///
/// Non-vendor controllers are skipped; a vendor controller with an
/// unrecognized version aborts the listing, as does any transport failure.
pub fn list_controllers(dev_root: &str) -> Result<Vec<ListEntry>> {
    let mut entries = Vec::new();

    for snapshot in scan_controllers(dev_root)? {
        if check_vendor(&snapshot.ctrl).is_err() {
            log::debug!("skipping non-vendor node {}", snapshot.node);
            continue;
        }

        let version = require_version(&snapshot.ctrl)?;
        match NsRecord::overlay(snapshot.ns.vs(), version)? {
            NsRecord::V4(v4) => entries.push(ListEntry::V4 {
                node: snapshot.node,
                acc_name: v4.acc_name,
                acc_ver: v4.acc_ver,
                acc_status: v4.acc_status,
            }),
            NsRecord::V6(v6) => entries.push(ListEntry::V6 {
                node: snapshot.node,
                ns_name: v6.ns_name,
                ns_ver: v6.ns_ver,
                num_accels: v6.accels.len() as u32,
            }),
        }
    }

    Ok(entries)
}
