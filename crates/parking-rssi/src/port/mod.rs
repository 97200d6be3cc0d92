//! Port definitions.
//!
//! The radio scan mechanism is platform glue; the core only sees it through
//! [`ScanSource`], so file-based, platform and test-double adapters can be
//! swapped freely.

mod scan_source;

pub use scan_source::ScanSource;
