//! Dense fingerprint construction from sparse scan readings.

use crate::domain::sample::FeatureVector;
use crate::domain::scan::Readings;
use crate::pipeline::registry::SlotMap;

/// Value stored in a slot with no reading in the current scan.
pub const SENTINEL_DBM: f32 = 0.0;

/// Builds fixed-length fingerprints. Stateless; the same inputs always
/// produce the same vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    /// Map `readings` onto a vector of `input_size` slots.
    ///
    /// Readings from radios missing from `slots` are foreign networks and
    /// are dropped. Registered radios that were not heard keep
    /// [`SENTINEL_DBM`]. A slot index beyond `input_size` (a radio bound
    /// outside the current grid) is dropped as well.
    pub fn build(readings: &Readings, slots: &SlotMap, input_size: usize) -> FeatureVector {
        let mut vector = vec![SENTINEL_DBM; input_size];
        for (bssid, &rssi) in readings {
            let Some(&idx) = slots.get(bssid) else {
                continue;
            };
            match vector.get_mut(idx) {
                Some(slot) => *slot = rssi,
                None => tracing::debug!(
                    %bssid,
                    slot = idx,
                    input_size,
                    "dropping reading for access point bound outside the grid"
                ),
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bssid::BssidId;

    fn slots() -> SlotMap {
        [(BssidId([1; 6]), 0), (BssidId([2; 6]), 3)].into_iter().collect()
    }

    #[test]
    fn empty_readings_give_all_sentinel() {
        let v = FeatureVectorBuilder::build(&Readings::new(), &slots(), 6);
        assert_eq!(v, vec![0.0; 6]);
    }

    #[test]
    fn registered_readings_fill_their_slot() {
        let readings: Readings =
            [(BssidId([1; 6]), -48.0), (BssidId([2; 6]), -71.5)].into_iter().collect();
        let v = FeatureVectorBuilder::build(&readings, &slots(), 6);
        assert_eq!(v, vec![-48.0, 0.0, 0.0, -71.5, 0.0, 0.0]);
    }

    #[test]
    fn foreign_radios_are_ignored() {
        let readings: Readings = [(BssidId([9; 6]), -30.0)].into_iter().collect();
        assert_eq!(
            FeatureVectorBuilder::build(&readings, &slots(), 6),
            FeatureVectorBuilder::build(&Readings::new(), &slots(), 6)
        );
    }

    #[test]
    fn slots_beyond_input_size_are_dropped() {
        let readings: Readings = [(BssidId([2; 6]), -60.0)].into_iter().collect();
        assert_eq!(FeatureVectorBuilder::build(&readings, &slots(), 2), vec![0.0, 0.0]);
    }
}
