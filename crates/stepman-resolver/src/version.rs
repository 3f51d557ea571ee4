//! Concrete step versions and user-supplied version constraints.
//!
//! Accepted constraint forms:
//! - `""` — latest published version
//! - `1` or `1.x.x` — newest `1.*.*`
//! - `1.2` or `1.2.x` — newest `1.2.*`
//! - `1.2.3` — exactly `1.2.3`

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use semver::Version;
use thiserror::Error;

/// A concrete `major.minor.patch` version, backed by semver.
///
/// Pre-release and build metadata are not part of step versions and are
/// rejected when parsing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semver(Version);

/// A manifest version key that is not a plain `major.minor.patch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{input}` is not a valid step version: {reason}")]
pub struct SemverError {
    pub input: String,
    pub reason: String,
}

impl Semver {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

impl FromStr for Semver {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = Version::parse(s).map_err(|e| SemverError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(SemverError {
                input: s.to_string(),
                reason: "pre-release and build metadata are not supported".to_string(),
            });
        }
        Ok(Self(version))
    }
}

/// How much of a constraint's version is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockType {
    /// All three components pinned.
    Fixed,
    /// Major and minor pinned; newest patch wins.
    MinorLocked,
    /// Major pinned; newest minor.patch wins.
    MajorLocked,
    /// Nothing pinned; the library's latest marker wins.
    Latest,
}

/// A parsed version request.
///
/// Components not pinned by `lock_type` are zero and carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    lock_type: LockType,
    version: Semver,
}

/// Why a version constraint string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConstraintError {
    #[error("Invalid version constraint `{input}`: too many dot-separated parts")]
    #[diagnostic(help("Use one of `X`, `X.x.x`, `X.Y`, `X.Y.x` or `X.Y.Z`"))]
    InvalidFormat { input: String },

    #[error("Invalid major version in constraint `{input}`")]
    #[diagnostic(help("The major version must be a non-negative integer; `x.x.x` is not supported, omit the version to get the latest"))]
    InvalidMajorVersion { input: String },

    #[error("Invalid minor version in constraint `{input}`")]
    #[diagnostic(help("The minor version must be a non-negative integer or `x` (as in `1.x.x`)"))]
    InvalidMinorVersion { input: String },

    #[error("Invalid patch version in constraint `{input}`")]
    #[diagnostic(help("The patch version must be a non-negative integer or `x`"))]
    InvalidPatchVersion { input: String },
}

const WILDCARD: &str = "x";

impl VersionConstraint {
    pub fn fixed(version: Semver) -> Self {
        Self {
            lock_type: LockType::Fixed,
            version,
        }
    }

    pub fn minor_locked(major: u64, minor: u64) -> Self {
        Self {
            lock_type: LockType::MinorLocked,
            version: Semver::new(major, minor, 0),
        }
    }

    pub fn major_locked(major: u64) -> Self {
        Self {
            lock_type: LockType::MajorLocked,
            version: Semver::new(major, 0, 0),
        }
    }

    pub fn latest() -> Self {
        Self {
            lock_type: LockType::Latest,
            version: Semver::new(0, 0, 0),
        }
    }

    /// Parse a constraint string.
    ///
    /// Total over all inputs: returns either a constraint or a typed error.
    pub fn parse(input: &str) -> Result<Self, ConstraintError> {
        if input.is_empty() {
            return Ok(Self::latest());
        }

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() > 3 {
            return Err(ConstraintError::InvalidFormat {
                input: input.to_string(),
            });
        }

        let major = parse_component(parts[0]).ok_or_else(|| ConstraintError::InvalidMajorVersion {
            input: input.to_string(),
        })?;
        if parts.len() == 1 || (parts.len() == 3 && parts[1] == WILDCARD && parts[2] == WILDCARD) {
            return Ok(Self::major_locked(major));
        }

        let minor = parse_component(parts[1]).ok_or_else(|| ConstraintError::InvalidMinorVersion {
            input: input.to_string(),
        })?;
        if parts.len() == 2 || parts[2] == WILDCARD {
            return Ok(Self::minor_locked(major, minor));
        }

        let patch = parse_component(parts[2]).ok_or_else(|| ConstraintError::InvalidPatchVersion {
            input: input.to_string(),
        })?;
        Ok(Self::fixed(Semver::new(major, minor, patch)))
    }

    pub fn lock_type(&self) -> LockType {
        self.lock_type
    }

    /// The pinned components; unpinned ones are zero.
    pub fn version(&self) -> &Semver {
        &self.version
    }
}

impl FromStr for VersionConstraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.version;
        match self.lock_type {
            LockType::Fixed => write!(f, "{v}"),
            LockType::MinorLocked => write!(f, "{}.{}.x", v.major(), v.minor()),
            LockType::MajorLocked => write!(f, "{}.x.x", v.major()),
            LockType::Latest => f.write_str("latest"),
        }
    }
}

/// Unsigned base-10 integer with no sign character.
///
/// `u64::from_str` accepts a leading `+`, so digits are checked first.
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
