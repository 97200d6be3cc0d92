//! Occupied / free slot read-out derived from a prediction.

use serde::{Deserialize, Serialize};

/// Occupancy of a lot with a fixed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyEstimate {
    /// Predicted number of occupied slots.
    pub occupied: u32,
    /// `capacity - occupied`, saturating at zero.
    pub unoccupied: u32,
    /// Configured lot capacity.
    pub capacity: u32,
}

impl OccupancyEstimate {
    /// Build an estimate from a predicted label.
    pub fn from_prediction(label: u32, capacity: u32) -> Self {
        Self {
            occupied: label,
            unoccupied: capacity.saturating_sub(label),
            capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unoccupied_saturates() {
        assert_eq!(OccupancyEstimate::from_prediction(3, 10).unoccupied, 7);
        assert_eq!(OccupancyEstimate::from_prediction(12, 10).unoccupied, 0);
    }
}
