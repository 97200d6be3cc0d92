//! Router registry: which access point sits in which grid cell.
//!
//! The registry is a thin aggregate over the access-point table. Slot
//! indices are never stored; they are derived on every read from each
//! access point's `(row, col)` and the grid's column count, so insertion
//! order has no influence on the fingerprint layout.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::access_point::AccessPoint;
use crate::domain::bssid::BssidId;
use crate::error::{ParkingError, ParkingResult, StorageError};
use crate::storage::ParkingStorage;

/// Hardware address to fingerprint slot.
pub type SlotMap = HashMap<BssidId, usize>;

/// Access-point bindings backed by a [`ParkingStorage`].
#[derive(Clone)]
pub struct RouterRegistry {
    storage: Arc<dyn ParkingStorage>,
}

impl RouterRegistry {
    /// Create a registry over `storage`.
    pub fn new(storage: Arc<dyn ParkingStorage>) -> Self {
        Self { storage }
    }

    /// Bind an active access point to `(row, col)`.
    ///
    /// No grid bounds are checked here; an out-of-grid binding only matters
    /// once fingerprints are built for a specific grid.
    ///
    /// # Errors
    ///
    /// [`ParkingError::DuplicateIdentifier`] if `bssid` is already bound.
    pub fn add_access_point(
        &self,
        bssid: BssidId,
        name: impl Into<String>,
        row: u32,
        col: u32,
    ) -> ParkingResult<AccessPoint> {
        let ap = AccessPoint::new(bssid, name, row, col);
        self.add(ap.clone())?;
        Ok(ap)
    }

    /// Insert a fully specified access point (e.g. an inactive one).
    pub fn add(&self, access_point: AccessPoint) -> ParkingResult<()> {
        match self.storage.insert_access_point(&access_point) {
            Ok(()) => {
                tracing::info!(
                    bssid = %access_point.bssid,
                    name = %access_point.name,
                    row = access_point.row,
                    col = access_point.col,
                    "bound access point"
                );
                Ok(())
            }
            Err(StorageError::DuplicateKey { .. }) => {
                Err(ParkingError::DuplicateIdentifier { bssid: access_point.bssid })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All access points in insertion order.
    pub fn list_access_points(&self) -> ParkingResult<Vec<AccessPoint>> {
        Ok(self.storage.access_points()?)
    }

    /// Look up one access point.
    pub fn get(&self, bssid: BssidId) -> ParkingResult<Option<AccessPoint>> {
        Ok(self
            .storage
            .access_points()?
            .into_iter()
            .find(|ap| ap.bssid == bssid))
    }

    /// Number of bound access points.
    pub fn len(&self) -> ParkingResult<usize> {
        Ok(self.storage.access_points()?.len())
    }

    /// Whether no access point is bound.
    pub fn is_empty(&self) -> ParkingResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every binding. Required whenever the grid shape changes.
    pub fn remove_all(&self) -> ParkingResult<()> {
        self.storage.clear_access_points()?;
        tracing::info!("cleared all access point bindings");
        Ok(())
    }

    /// `row * cols + col` for a bound access point.
    ///
    /// # Errors
    ///
    /// [`ParkingError::UnknownIdentifier`] if `bssid` is not bound.
    pub fn identifier_to_linear_index(&self, bssid: BssidId, cols: usize) -> ParkingResult<usize> {
        self.get(bssid)?
            .map(|ap| ap.linear_index(cols))
            .ok_or(ParkingError::UnknownIdentifier { bssid })
    }

    /// Slot of every active access point for a grid with `cols` columns.
    ///
    /// Inactive access points are left out, so their slot keeps the
    /// sentinel value in every fingerprint.
    pub fn slot_map(&self, cols: usize) -> ParkingResult<SlotMap> {
        Ok(self
            .storage
            .access_points()?
            .into_iter()
            .filter(|ap| ap.active)
            .map(|ap| (ap.bssid, ap.linear_index(cols)))
            .collect())
    }
}

impl std::fmt::Debug for RouterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterRegistry").finish_non_exhaustive()
    }
}
