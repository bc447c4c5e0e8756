use std::{fmt, str::FromStr};

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};

/// Version parsing errors
#[derive(Debug, thiserror::Error)]
pub enum SemVerError {
    /// Nothing to parse
    #[error("Empty version string")]
    Empty,
    /// Not `major.minor[.patch][-pre][+build]`
    #[error("Invalid version {input:?}: {source}")]
    Invalid {
        /// The rejected input
        input: String,
        /// Parser error
        #[source]
        source: semver::Error,
    },
}

/// A Safe contract (or app) version with semver precedence.
///
/// Ordering follows semver, with build metadata as a final tiebreak, so
/// `1.3.0+L2` sorts after `1.3.0` and `1.3.0-rc.1` before it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer(Version);

impl Default for SemVer {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl SemVer {
    /// First contract version naming the refund gas `baseGas`
    pub const V1_0_0: SemVer = SemVer::new(1, 0, 0);

    /// First contract version binding the chain id into the domain
    pub const V1_3_0: SemVer = SemVer::new(1, 3, 0);

    /// Plain `major.minor.patch`
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parse, keeping pre-release and build metadata.
    ///
    /// # Errors
    ///
    /// Empty or malformed input
    pub fn parse(s: &str) -> Result<Self, SemVerError> {
        Self::parse_with(s, false)
    }

    /// Parse `s`. A missing patch component reads as `0`. With
    /// `ignore_extensions` the pre-release and build metadata are dropped.
    ///
    /// # Errors
    ///
    /// Empty or malformed input
    pub fn parse_with(s: &str, ignore_extensions: bool) -> Result<Self, SemVerError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SemVerError::Empty);
        }
        let mut version = match Version::parse(s) {
            Ok(version) => version,
            Err(source) => with_patch(s)
                .and_then(|completed| Version::parse(&completed).ok())
                .ok_or_else(|| SemVerError::Invalid { input: s.to_owned(), source })?,
        };
        if ignore_extensions {
            version.pre = Prerelease::EMPTY;
            version.build = BuildMetadata::EMPTY;
        }
        Ok(Self(version))
    }

    /// Parse `lower...upper`, or a single version with no upper bound
    ///
    /// # Errors
    ///
    /// Either side fails to parse
    pub fn parse_range(
        s: &str,
        ignore_extensions: bool,
    ) -> Result<(SemVer, Option<SemVer>), SemVerError> {
        match s.split_once("...") {
            Some((lower, upper)) => Ok((
                Self::parse_with(lower, ignore_extensions)?,
                Some(Self::parse_with(upper, ignore_extensions)?),
            )),
            None => Ok((Self::parse_with(s, ignore_extensions)?, None)),
        }
    }

    /// True if this version matches any entry in a comma separated list of
    /// exact versions and inclusive `lower...upper` ranges. Entries that do
    /// not parse match nothing.
    pub fn is_inside(&self, ranges: &str, ignore_extensions: bool) -> bool {
        let this = if ignore_extensions { self.without_extensions() } else { self.clone() };
        ranges
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| match Self::parse_range(entry, ignore_extensions) {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::warn!(entry, error = %e, "skipping unparseable version range");
                    None
                }
            })
            .any(|(lower, upper)| match upper {
                Some(upper) => lower <= this && this <= upper,
                None => lower == this,
            })
    }

    /// Copy without pre-release and build metadata
    pub fn without_extensions(&self) -> Self {
        let mut version = self.0.clone();
        version.pre = Prerelease::EMPTY;
        version.build = BuildMetadata::EMPTY;
        Self(version)
    }

    /// Major component
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component
    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Pre-release identifiers, if any
    pub fn pre_release(&self) -> Option<&str> {
        Some(self.0.pre.as_str()).filter(|pre| !pre.is_empty())
    }

    /// Build metadata, if any
    pub fn build_metadata(&self) -> Option<&str> {
        Some(self.0.build.as_str()).filter(|build| !build.is_empty())
    }
}

// "1.2-rc+L2" -> "1.2.0-rc+L2"
fn with_patch(s: &str) -> Option<String> {
    let core_end = s.find(|c| c == '-' || c == '+').unwrap_or(s.len());
    let (core, extensions) = s.split_at(core_end);
    (core.matches('.').count() == 1).then(|| format!("{}.0{}", core, extensions))
}

impl From<Version> for SemVer {
    fn from(version: Version) -> Self {
        Self(version)
    }
}

impl FromStr for SemVer {
    type Err = SemVerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for SemVer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SemVer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
