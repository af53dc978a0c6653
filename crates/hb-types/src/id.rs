use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier assigned to a submitted payload.
///
/// Ids are issued sequentially starting at 1 by the store's allocator. The
/// value 0 is never issued and is rejected when parsing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashId(u64);

impl HashId {
    /// The first id a fresh store hands out.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw value. Returns `None` for 0.
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Wrap a raw value without the zero check.
    ///
    /// Only the allocator should need this; it never produces 0.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashId({})", self.0)
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses plain decimal digits only: no sign, no whitespace.
impl FromStr for HashId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        let raw: u64 = s.parse().map_err(|_| TypeError::InvalidId(s.to_string()))?;
        Self::new(raw).ok_or(TypeError::ZeroId)
    }
}

impl From<HashId> for u64 {
    fn from(id: HashId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_rejected() {
        assert!(HashId::new(0).is_none());
        assert_eq!("0".parse::<HashId>(), Err(TypeError::ZeroId));
    }

    #[test]
    fn parse_plain_decimal() {
        assert_eq!("42".parse::<HashId>().unwrap().get(), 42);
        assert_eq!("007".parse::<HashId>().unwrap().get(), 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "-1", "+1", " 1", "1a", "abc", "18446744073709551616"] {
            assert!(bad.parse::<HashId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(HashId::from_raw(12).to_string(), "12");
        assert_eq!(format!("{:?}", HashId::FIRST), "HashId(1)");
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&HashId::from_raw(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(HashId::from_raw(1) < HashId::from_raw(2));
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(raw in 1u64..) {
            let id = HashId::from_raw(raw);
            prop_assert_eq!(id.to_string().parse::<HashId>().unwrap(), id);
        }
    }
}
