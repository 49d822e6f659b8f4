//! Server version parsing and comparison.
//!
//! SQL Server reports `ProductVersion` as `Major.Minor.Patch.Build`; the
//! paging strategy switches on `Major.Minor.Patch` compared against 11.0.0
//! (SQL Server 2012, the first release with OFFSET...FETCH).

use serde::{Deserialize, Serialize};

/// A parsed `Major.Minor.Patch` server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerVersion {
    /// Major version (e.g. 11 for SQL Server 2012).
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch level.
    pub patch: u32,
}

/// First server version supporting OFFSET...FETCH paging.
pub const OFFSET_FETCH_MIN: ServerVersion = ServerVersion {
    major: 11,
    minor: 0,
    patch: 0,
};

impl ServerVersion {
    /// Construct from parts.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string.
    ///
    /// Accepts `Major`, `Major.Minor`, `Major.Minor.Patch`, and ignores a
    /// trailing build component (`15.0.2000.5` parses as 15.0.2000).
    /// Returns `None` for anything else; callers treat an unknown version
    /// as "modern".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let mut parts = raw.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        // Fourth component is the build number; anything past it is malformed.
        match parts.next() {
            Some(build) => {
                build.parse::<u32>().ok()?;
                if parts.next().is_some() {
                    return None;
                }
            }
            None => {}
        }
        Some(Self {
            major,
            minor,
            patch,
        })
    }

    /// Whether this version supports OFFSET...FETCH paging (>= 11.0.0).
    #[must_use]
    pub fn supports_offset_fetch(&self) -> bool {
        *self >= OFFSET_FETCH_MIN
    }
}

/// Strip the trailing build number from a raw `Major.Minor.Patch.Build`
/// product version.
///
/// Mirrors the generated catalog SQL, which reverses the string, cuts at
/// the first dot, and reverses back (split-from-right at the string
/// level). A value with three or fewer components passes through.
#[must_use]
pub fn strip_build_number(raw: &str) -> String {
    let dots = raw.matches('.').count();
    if dots < 3 {
        return raw.to_string();
    }
    match raw.rfind('.') {
        Some(idx) => raw[..idx].to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let v = ServerVersion::parse("12.0.2000").unwrap();
        assert_eq!(v, ServerVersion::new(12, 0, 2000));
    }

    #[test]
    fn test_parse_with_build() {
        let v = ServerVersion::parse("15.0.2000.5").unwrap();
        assert_eq!(v, ServerVersion::new(15, 0, 2000));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ServerVersion::parse("").is_none());
        assert!(ServerVersion::parse("latest").is_none());
        assert!(ServerVersion::parse("11.x").is_none());
    }

    #[test]
    fn test_offset_fetch_boundary() {
        assert!(ServerVersion::new(11, 0, 0).supports_offset_fetch());
        assert!(ServerVersion::new(12, 0, 2000).supports_offset_fetch());
        assert!(!ServerVersion::new(10, 50, 1600).supports_offset_fetch());
    }

    #[test]
    fn test_strip_build_number() {
        assert_eq!(strip_build_number("15.0.2000.5"), "15.0.2000");
        assert_eq!(strip_build_number("11.0.2100"), "11.0.2100");
    }
}
