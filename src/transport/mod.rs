//! Device transport: admin-command ioctls and controller enumeration

mod admin;

pub use admin::{status_to_string, NvmeDevice};

use std::fs;

use crate::error::Result;
use crate::identify::{IdCtrl, IdNs};

/// Default device directory scanned by `scan_controllers`
pub const DEFAULT_DEV_ROOT: &str = "/dev";

/// One enumerated namespace node with both Identify snapshots
pub struct ControllerSnapshot {
    /// Node name, e.g. `nvme0n1`
    pub node: String,
    /// Full device path the snapshots were taken from
    pub path: String,
    /// Identify Controller data
    pub ctrl: IdCtrl,
    /// Identify Namespace data for the node's namespace
    pub ns: IdNs,
}

/// Enumerate NVMe namespace block nodes under `dev_root`
///
/// The scan is sequential and fully materialized: every matching node is
/// opened, both Identify snapshots are fetched, and the handle is closed
/// before the next node is touched. A failure on any one node aborts the
/// whole listing.
pub fn scan_controllers(dev_root: &str) -> Result<Vec<ControllerSnapshot>> {
    let mut nodes: Vec<String> = fs::read_dir(dev_root)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_namespace_node(name))
        .collect();
    nodes.sort();

    let mut snapshots = Vec::with_capacity(nodes.len());
    for node in nodes {
        let path = format!("{}/{}", dev_root.trim_end_matches('/'), node);
        log::debug!("scanning {path}");

        let device = NvmeDevice::open(&path)?;
        let ctrl = IdCtrl::from_raw(device.identify_controller()?);
        let nsid = device.resolve_nsid()?;
        let ns = IdNs::from_raw(device.identify_namespace(nsid)?);

        snapshots.push(ControllerSnapshot {
            node,
            path,
            ctrl,
            ns,
        });
    }

    Ok(snapshots)
}

/// Match namespace block node names of the form `nvme<ctrl>n<ns>`
fn is_namespace_node(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("nvme") else {
        return false;
    };
    let ctrl_digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if ctrl_digits == 0 {
        return false;
    }
    let Some(ns_part) = rest[ctrl_digits..].strip_prefix('n') else {
        return false;
    };
    !ns_part.is_empty() && ns_part.chars().all(|c| c.is_ascii_digit())
}
