//! Adapters implementing the [`ScanSource`](crate::port::ScanSource) port.

mod json_file;
mod static_source;

pub use json_file::{parse_scan_json, JsonScanFile};
pub use static_source::StaticScanSource;
