//! Document format version and half-open version ranges.

use serde::Serialize;

/// HWP format version `(major, minor, build, revision)`.
///
/// Ordering is lexicographic over the four components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub revision: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, build: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Unpack the `0xMMnnPPrr` word stored in the `FileHeader` stream.
    ///
    /// ```
    /// use hwpmodel::Version;
    /// assert_eq!(Version::from_u32(0x0500_0107), Version::new(5, 0, 1, 7));
    /// ```
    pub const fn from_u32(word: u32) -> Self {
        Self::new(
            (word >> 24) as u8,
            (word >> 16) as u8,
            (word >> 8) as u8,
            word as u8,
        )
    }

    pub const fn to_u32(self) -> u32 {
        (self.major as u32) << 24
            | (self.minor as u32) << 16
            | (self.build as u32) << 8
            | self.revision as u32
    }
}

impl From<(u8, u8, u8, u8)> for Version {
    fn from((major, minor, build, revision): (u8, u8, u8, u8)) -> Self {
        Self::new(major, minor, build, revision)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// `[start, end)` over [`Version`]; an absent bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub start: Option<Version>,
    pub end: Option<Version>,
}

impl VersionRange {
    pub const ALL: VersionRange = VersionRange {
        start: None,
        end: None,
    };

    pub const fn new(start: Option<Version>, end: Option<Version>) -> Self {
        Self { start, end }
    }

    pub const fn since(start: Version) -> Self {
        Self::new(Some(start), None)
    }

    pub const fn until(end: Version) -> Self {
        Self::new(None, Some(end))
    }

    pub fn contains(&self, version: Version) -> bool {
        self.start.is_none_or(|start| start <= version) && self.end.is_none_or(|end| version < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(5, 0, 1, 7) > Version::new(5, 0, 0, 7));
        assert!(Version::new(5, 0, 0, 5) < Version::new(5, 0, 0, 7));
        assert!(Version::new(5, 1, 0, 0) > Version::new(5, 0, 9, 9));
        assert_eq!(Version::from_u32(Version::new(5, 0, 3, 2).to_u32()), Version::new(5, 0, 3, 2));
    }

    #[test]
    fn test_range_is_half_open() {
        let range = VersionRange::new(Some(Version::new(5, 0, 0, 5)), Some(Version::new(5, 0, 1, 7)));
        assert!(!range.contains(Version::new(5, 0, 0, 4)));
        assert!(range.contains(Version::new(5, 0, 0, 5)));
        assert!(range.contains(Version::new(5, 0, 1, 6)));
        assert!(!range.contains(Version::new(5, 0, 1, 7)));
        assert!(VersionRange::ALL.contains(Version::new(0, 0, 0, 0)));
    }
}
