//! Canned scan results.

use parking_lot::Mutex;

use crate::domain::scan::ScanEntry;
use crate::error::ScanError;
use crate::port::ScanSource;

/// [`ScanSource`] returning preset results. Useful as a test double and
/// for replaying a known fingerprint.
#[derive(Debug)]
pub struct StaticScanSource {
    outcome: Mutex<Result<Vec<ScanEntry>, String>>,
}

impl StaticScanSource {
    /// A source that always succeeds with `entries`.
    pub fn new(entries: Vec<ScanEntry>) -> Self {
        Self { outcome: Mutex::new(Ok(entries)) }
    }

    /// A source that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { outcome: Mutex::new(Err(reason.into())) }
    }

    /// Replace the entries returned by later scans.
    pub fn set_entries(&self, entries: Vec<ScanEntry>) {
        *self.outcome.lock() = Ok(entries);
    }
}

impl ScanSource for StaticScanSource {
    fn scan(&self) -> Result<Vec<ScanEntry>, ScanError> {
        self.outcome.lock().clone().map_err(ScanError::failed)
    }
}
