//! NVMe admin-command transport over the kernel passthrough ioctl

use std::ffi::CString;
use std::io;
use std::os::unix::io::RawFd;

use crate::error::{NoloadError, Result};
use crate::identify::IDENTIFY_BUFFER_SIZE;

/// Admin command opcode for Identify
const NVME_ADMIN_IDENTIFY: u8 = 0x06;
/// CNS value selecting Identify Namespace data
const CNS_NAMESPACE: u32 = 0x00;
/// CNS value selecting Identify Controller data
const CNS_CONTROLLER: u32 = 0x01;

/// _IOWR('N', 0x41, struct nvme_admin_cmd)
const NVME_IOCTL_ADMIN_CMD: libc::c_ulong = 0xC048_4E41;
/// _IO('N', 0x40): returns the namespace id of a block handle
const NVME_IOCTL_ID: libc::c_ulong = 0x4E40;

/// Kernel NVMe admin command passthrough structure
#[repr(C)]
#[derive(Debug, Default)]
struct NvmeAdminCmd {
    opcode: u8,
    flags: u8,
    rsvd1: u16,
    nsid: u32,
    cdw2: u32,
    cdw3: u32,
    metadata: u64,
    addr: u64,
    metadata_len: u32,
    data_len: u32,
    cdw10: u32,
    cdw11: u32,
    cdw12: u32,
    cdw13: u32,
    cdw14: u32,
    cdw15: u32,
    timeout_ms: u32,
    result: u32,
}

/// Open NVMe device handle
///
/// One handle performs at most one or two Identify calls per command
/// invocation and is closed on drop. No retries, no shared state.
#[derive(Debug)]
pub struct NvmeDevice {
    fd: RawFd,
    path: String,
}

impl NvmeDevice {
    /// Open a device node read-only
    pub fn open(path: &str) -> Result<Self> {
        let c_path = CString::new(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDONLY) };
        if fd < 0 {
            return Err(io::Error::last_os_error().into());
        }

        Ok(Self {
            fd,
            path: path.to_string(),
        })
    }

    /// Path this handle was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the handle refers to a block device (a namespace node)
    pub fn is_block(&self) -> Result<bool> {
        let mut stat: libc::stat = unsafe { std::mem::zeroed() };
        let ret = unsafe { libc::fstat(self.fd, &mut stat) };
        if ret < 0 {
            return Err(io::Error::last_os_error().into());
        }
        Ok(stat.st_mode & libc::S_IFMT == libc::S_IFBLK)
    }

    /// Resolve the namespace id of a block handle
    pub fn resolve_nsid(&self) -> Result<u32> {
        let ret = unsafe { libc::ioctl(self.fd, NVME_IOCTL_ID, 0usize) };
        if ret < 0 {
            return Err(io::Error::last_os_error().into());
        }
        Ok(ret as u32)
    }

    /// Send an Identify Controller command
    pub fn identify_controller(&self) -> Result<Box<[u8; IDENTIFY_BUFFER_SIZE]>> {
        self.identify(0, CNS_CONTROLLER, None)
    }

    /// Send an Identify Namespace command for `nsid`
    pub fn identify_namespace(&self, nsid: u32) -> Result<Box<[u8; IDENTIFY_BUFFER_SIZE]>> {
        self.identify(nsid, CNS_NAMESPACE, Some(nsid))
    }

    fn identify(
        &self,
        nsid: u32,
        cns: u32,
        err_nsid: Option<u32>,
    ) -> Result<Box<[u8; IDENTIFY_BUFFER_SIZE]>> {
        let mut buffer = Box::new([0u8; IDENTIFY_BUFFER_SIZE]);
        let mut cmd = NvmeAdminCmd {
            opcode: NVME_ADMIN_IDENTIFY,
            nsid,
            addr: buffer.as_mut_ptr() as u64,
            data_len: IDENTIFY_BUFFER_SIZE as u32,
            cdw10: cns,
            ..Default::default()
        };

        let ret = unsafe { libc::ioctl(self.fd, NVME_IOCTL_ADMIN_CMD, &mut cmd) };
        if ret < 0 {
            return Err(io::Error::last_os_error().into());
        }
        if ret > 0 {
            return Err(NoloadError::NvmeStatus {
                status: ret as u32,
                nsid: err_nsid,
            });
        }

        log::debug!("identify cns={:#x} nsid={} on {} ok", cns, nsid, self.path);
        Ok(buffer)
    }
}

impl Drop for NvmeDevice {
    fn drop(&mut self) {
        if self.fd >= 0 {
            unsafe { libc::close(self.fd) };
            self.fd = -1;
        }
    }
}

/// Map an NVMe completion status code to its specification name
pub fn status_to_string(status: u32) -> &'static str {
    match status & 0x7ff {
        0x0 => "SUCCESS",
        0x1 => "INVALID_OPCODE",
        0x2 => "INVALID_FIELD",
        0x3 => "CMDID_CONFLICT",
        0x4 => "DATA_XFER_ERROR",
        0x5 => "POWER_LOSS",
        0x6 => "INTERNAL",
        0x7 => "ABORT_REQ",
        0xb => "INVALID_NS",
        0x16 => "INVALID_LOG_PAGE",
        0x17 => "INVALID_FORMAT",
        _ => "UNKNOWN_STATUS",
    }
}
