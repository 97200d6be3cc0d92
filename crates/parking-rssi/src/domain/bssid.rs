//! Hardware-address value object for access points.
//!
//! An access point is identified by its 6-octet IEEE 802.11 MAC address.
//! The address has two persisted forms that must round-trip exactly:
//! a 48-bit integer (the primary key of the access-point table) and the
//! canonical colon-separated lowercase hex string `aa:bb:cc:dd:ee:ff`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkingError;

// ---------------------------------------------------------------------------
// BssidId -- Value Object
// ---------------------------------------------------------------------------

/// A unique BSSID identifier wrapping a 6-byte MAC address.
///
/// Serialized as its 48-bit integer form.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BssidId(pub [u8; 6]);

impl BssidId {
    /// Largest integer that fits in 48 bits.
    pub const MAX: u64 = (1 << 48) - 1;

    /// Create a `BssidId` from a byte slice.
    ///
    /// Returns an error if the slice is not exactly 6 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParkingError> {
        let arr: [u8; 6] = bytes
            .try_into()
            .map_err(|_| ParkingError::invalid_bssid(format!("{} bytes", bytes.len())))?;
        Ok(Self(arr))
    }

    /// Build from the 48-bit integer form. Big-endian: the first octet of
    /// the address is the most significant byte.
    pub fn from_u64(value: u64) -> Result<Self, ParkingError> {
        if value > Self::MAX {
            return Err(ParkingError::invalid_bssid(value.to_string()));
        }
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&be[2..]);
        Ok(Self(bytes))
    }

    /// The 48-bit integer form.
    pub fn to_u64(&self) -> u64 {
        let mut be = [0u8; 8];
        be[2..].copy_from_slice(&self.0);
        u64::from_be_bytes(be)
    }

    /// Parse a `BssidId` from a colon-separated hex string such as
    /// `"aa:bb:cc:dd:ee:ff"`.
    ///
    /// Non-canonical input is accepted: upper-case digits and one-digit
    /// octets (`"a:b:c:d:e:f"`). [`Display`](fmt::Display) always writes the
    /// canonical lowercase, zero-padded form, so parsed text may not
    /// round-trip byte for byte while the address itself always does.
    pub fn parse(s: &str) -> Result<Self, ParkingError> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 6 {
            return Err(ParkingError::invalid_bssid(s));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ParkingError::invalid_bssid(s));
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| ParkingError::invalid_bssid(s))?;
        }
        Ok(Self(bytes))
    }

    /// Return the raw 6-byte MAC address.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Debug for BssidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BssidId({self})")
    }
}

impl fmt::Display for BssidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for BssidId {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u64> for BssidId {
    type Error = ParkingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_u64(value)
    }
}

impl From<BssidId> for u64 {
    fn from(id: BssidId) -> Self {
        id.to_u64()
    }
}
