//! The driving port for Wi-Fi scans.

use crate::domain::scan::ScanEntry;
use crate::error::ScanError;

/// Port that abstracts the platform Wi-Fi scanning backend.
///
/// Implementations include:
/// - [`crate::adapter::JsonScanFile`] -- scan results captured to a file.
/// - [`crate::adapter::StaticScanSource`] -- canned results for tests.
pub trait ScanSource: Send + Sync {
    /// Perform a scan and return every visible radio.
    ///
    /// A failed scan delivers no entries; callers treat it as "no update".
    fn scan(&self) -> Result<Vec<ScanEntry>, ScanError>;
}
