//! Raw scan results as delivered by a scan source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::bssid::BssidId;

/// One radio seen by a Wi-Fi scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Hardware address of the radio.
    pub bssid: BssidId,
    /// SSID or other display name. May be empty for hidden networks.
    pub display_name: String,
    /// Received signal strength in dBm (typically -30 to -90).
    pub rssi_dbm: f32,
}

impl ScanEntry {
    /// Create a scan entry.
    pub fn new(bssid: BssidId, display_name: impl Into<String>, rssi_dbm: f32) -> Self {
        Self { bssid, display_name: display_name.into(), rssi_dbm }
    }
}

/// Sparse readings keyed by hardware address.
pub type Readings = HashMap<BssidId, f32>;

/// Collapse scan entries into readings. When a radio is reported more than
/// once, the last report wins.
pub fn readings_from_scan(entries: &[ScanEntry]) -> Readings {
    entries.iter().map(|e| (e.bssid, e.rssi_dbm)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_report_wins() {
        let id = BssidId([1; 6]);
        let readings = readings_from_scan(&[
            ScanEntry::new(id, "a", -70.0),
            ScanEntry::new(id, "a", -65.0),
        ]);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[&id], -65.0);
    }
}
