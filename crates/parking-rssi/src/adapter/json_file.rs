//! Scan results read from a JSON capture file.
//!
//! Expected format, one object per radio:
//!
//! ```json
//! [
//!   { "bssid": "a4:2b:b0:01:02:03", "name": "Lot-A", "rssi_dbm": -61 },
//!   { "bssid": "00:0c:42:aa:bb:cc", "rssi_dbm": -78.5 }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::bssid::BssidId;
use crate::domain::scan::ScanEntry;
use crate::error::ScanError;
use crate::port::ScanSource;

#[derive(Debug, Deserialize)]
struct RawEntry {
    bssid: String,
    #[serde(default)]
    name: String,
    rssi_dbm: f32,
}

/// Parse the JSON capture format into scan entries.
///
/// # Errors
///
/// [`ScanError::Parse`] for malformed JSON or a bad hardware address.
pub fn parse_scan_json(text: &str) -> Result<Vec<ScanEntry>, ScanError> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(text).map_err(|e| ScanError::Parse(e.to_string()))?;
    raw.into_iter()
        .map(|r| {
            let bssid = BssidId::parse(&r.bssid).map_err(|e| ScanError::Parse(e.to_string()))?;
            Ok(ScanEntry::new(bssid, r.name, r.rssi_dbm))
        })
        .collect()
}

/// [`ScanSource`] that re-reads a capture file on every scan.
#[derive(Debug, Clone)]
pub struct JsonScanFile {
    path: PathBuf,
}

impl JsonScanFile {
    /// Create an adapter for `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Capture file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanSource for JsonScanFile {
    fn scan(&self) -> Result<Vec<ScanEntry>, ScanError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| ScanError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        parse_scan_json(&text)
    }
}
