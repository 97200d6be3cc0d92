//! Hardware address conversion tests.

use parking_rssi::{BssidId, ParkingError};
use proptest::prelude::*;

#[test]
fn test_leading_zero_octets_round_trip() {
    let id = BssidId::parse("00:0c:42:00:0a:01").unwrap();
    assert_eq!(id.to_string(), "00:0c:42:00:0a:01");
    assert_eq!(id.to_u64(), 0x000c_4200_0a01);
    assert_eq!(BssidId::from_u64(id.to_u64()).unwrap(), id);
}

#[test]
fn test_values_above_48_bits_are_rejected() {
    assert!(matches!(BssidId::from_u64(1 << 48), Err(ParkingError::InvalidBssid { .. })));
    assert!(BssidId::from_u64(BssidId::MAX).is_ok());
}

#[test]
fn test_malformed_text_is_rejected() {
    for input in ["", "00:11:22:33:44", "00:11:22:33:44:55:66", "zz:11:22:33:44:55", "001:1:2:3:4:5"] {
        assert!(BssidId::parse(input).is_err(), "accepted {input:?}");
    }
}

proptest! {
    /// Every 48-bit value survives integer and text conversion.
    #[test]
    fn identifier_round_trips(value in 0u64..=BssidId::MAX) {
        let id = BssidId::from_u64(value).unwrap();
        prop_assert_eq!(id.to_u64(), value);
        let parsed: BssidId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }
}
