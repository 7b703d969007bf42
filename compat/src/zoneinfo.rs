//! Time zone lookup.
//!
//! The board has no zone database and no notion of where it is: local time is UTC.

/// Name of the local time zone.
pub const LOCAL_ZONE: &str = "UTC";

/// Directories searched for zone files.
pub const PLATFORM_ZONE_SOURCES: &[&str] = &[];

/// Returns the zone database bundled under `root`, if any.
///
/// Lookups are always pointed at the embedded database name.
pub fn zone_source(_root: &str) -> Option<&'static str> {
    Some("zoneinfo")
}

/// A time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    name: &'static str,
    offset: i32,
}

impl Location {
    /// Zone name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Offset east of UTC, in seconds.
    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// Returns the local time zone.
pub fn local() -> Location {
    Location {
        name: LOCAL_ZONE,
        offset: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_time_is_utc() {
        let loc = local();
        assert_eq!(loc.name(), "UTC");
        assert_eq!(loc.offset(), 0);
    }

    #[test]
    fn zone_lookup() {
        assert!(PLATFORM_ZONE_SOURCES.is_empty());
        assert_eq!(zone_source("/usr/lib/go"), Some("zoneinfo"));
        assert_eq!(zone_source(""), Some("zoneinfo"));
    }
}
