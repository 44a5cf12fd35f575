//! # NoLoad NVMe vendor-specific identify decoder
//!
//! Decodes and renders the Eideticom NoLoad vendor-specific regions of
//! NVMe Identify Controller and Identify Namespace data, across the
//! incompatible on-wire revisions of the NoLoad identify format.
//!
//! ## Architecture
//!
//! - **Transport** ([`transport`]): admin-command ioctls and device
//!   enumeration. Blocking, one-shot, read-only.
//! - **Decode** ([`noload`]): firmware-revision version detection, the
//!   validating layout overlay, and the per-era status register decoders.
//! - **Render** ([`render`]): text and JSON back ends, kept field-for-field
//!   equivalent.
//! - **Entry points** ([`api`]): vendor check plus orchestration per
//!   command invocation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use noload::render::{text, Mode};
//!
//! fn main() -> noload::Result<()> {
//!     let report = noload::api::namespace_report("/dev/nvme0n1", None)?;
//!     print!("{}", text::render_ns(&report.record, report.nsid, Mode::Plain));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod error;
pub mod identify;
pub mod noload;
pub mod render;
pub mod transport;

// Re-export main API for easy access
pub use api::{controller_report, list_controllers, namespace_report, VENDOR_NAME};
pub use error::{NoloadError, Result};
pub use noload::{
    decode_status, decode_status_v4, decode_status_v6, detect_version, CtrlRecord, FormatVersion,
    NsRecord,
};
pub use render::{Mode, OutputFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{controller_report, list_controllers, namespace_report};
    pub use crate::error::{NoloadError, Result};
    pub use crate::noload::{detect_version, FormatVersion, NsRecord};
    pub use crate::render::{Mode, OutputFormat};
}
