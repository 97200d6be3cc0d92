//! Access point entity: a scanned radio bound to one grid cell.

use serde::{Deserialize, Serialize};

use crate::domain::bssid::BssidId;

/// A physical access point bound to a cell of the parking grid.
///
/// Identity is the hardware address; uniqueness is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Hardware address (primary key).
    pub bssid: BssidId,
    /// Display name, usually the SSID seen when the radio was bound.
    pub name: String,
    /// Whether the access point takes part in scans.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Grid row.
    pub row: u32,
    /// Grid column.
    pub col: u32,
}

fn default_active() -> bool {
    true
}

impl AccessPoint {
    /// Maximum stored length of [`AccessPoint::name`], in characters.
    pub const MAX_NAME_CHARS: usize = 32;

    /// Create an active access point. Names longer than
    /// [`Self::MAX_NAME_CHARS`] are truncated.
    pub fn new(bssid: BssidId, name: impl Into<String>, row: u32, col: u32) -> Self {
        let name: String = name.into();
        let name = if name.chars().count() > Self::MAX_NAME_CHARS {
            name.chars().take(Self::MAX_NAME_CHARS).collect()
        } else {
            name
        };
        Self { bssid, name, active: true, row, col }
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Linear slot of this access point for a grid with `cols` columns.
    /// Saturates instead of wrapping, so an absurd binding lands outside
    /// every grid.
    pub fn linear_index(&self, cols: usize) -> usize {
        (self.row as usize).saturating_mul(cols).saturating_add(self.col as usize)
    }
}
