//! Version arithmetic and normalization

use std::sync::OnceLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use tracing::debug;

use crate::error::VersionError;
use crate::types::Increment;

/// What the user asked to bump to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpTarget {
    /// Apply an increment to the current version
    Increment(Increment),
    /// Write this exact version
    Version(String),
}

impl BumpTarget {
    /// Parse a command-line argument: an increment name, or anything starting
    /// with a digit or `v<digit>` as an explicit version.
    pub fn parse(arg: &str) -> Result<Self, VersionError> {
        if let Ok(increment) = arg.parse::<Increment>() {
            return Ok(Self::Increment(increment));
        }

        if looks_like_version(arg) {
            return Ok(Self::Version(arg.to_string()));
        }

        Err(VersionError::InvalidTarget(arg.to_string()))
    }
}

fn looks_like_version(arg: &str) -> bool {
    let mut chars = arg.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('v') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Apply `increment` to `current`.
///
/// Returns `None` when `current` is not a valid semantic version, a
/// component would overflow, or the increment is `custom`, which has no
/// arithmetic meaning.
pub fn increment_version(current: &str, increment: Increment) -> Option<String> {
    let mut version = Version::parse(current.trim().trim_start_matches('v')).ok()?;
    let zero = Prerelease::new("0").ok()?;

    match increment {
        Increment::Major => {
            if version.minor != 0 || version.patch != 0 || version.pre.is_empty() {
                version.major = version.major.checked_add(1)?;
            }
            version.minor = 0;
            version.patch = 0;
            version.pre = Prerelease::EMPTY;
        }
        Increment::Minor => {
            if version.patch != 0 || version.pre.is_empty() {
                version.minor = version.minor.checked_add(1)?;
            }
            version.patch = 0;
            version.pre = Prerelease::EMPTY;
        }
        Increment::Patch => {
            if version.pre.is_empty() {
                version.patch = version.patch.checked_add(1)?;
            }
            version.pre = Prerelease::EMPTY;
        }
        Increment::Premajor => {
            version.major = version.major.checked_add(1)?;
            version.minor = 0;
            version.patch = 0;
            version.pre = zero;
        }
        Increment::Preminor => {
            version.minor = version.minor.checked_add(1)?;
            version.patch = 0;
            version.pre = zero;
        }
        Increment::Prepatch => {
            version.patch = version.patch.checked_add(1)?;
            version.pre = zero;
        }
        Increment::Prerelease => {
            if version.pre.is_empty() {
                version.patch = version.patch.checked_add(1)?;
                version.pre = zero;
            } else {
                version.pre = next_prerelease(&version.pre)?;
            }
        }
        Increment::Custom => return None,
    }

    version.build = BuildMetadata::EMPTY;
    debug!(current, %increment, next = %version, "incremented version");
    Some(version.to_string())
}

/// Increment the right-most numeric identifier, or append `.0` if none exists
fn next_prerelease(pre: &Prerelease) -> Option<Prerelease> {
    let mut parts: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();

    match parts.iter().rposition(|p| p.parse::<u64>().is_ok()) {
        Some(idx) => {
            let n: u64 = parts[idx].parse().ok()?;
            parts[idx] = n.checked_add(1)?.to_string();
        }
        None => parts.push("0".to_string()),
    }

    Prerelease::new(&parts.join(".")).ok()
}

/// Normalize a user-supplied version: strip leading `v`s, then accept it
/// as-is if it is valid semver, otherwise coerce the first
/// `major[.minor[.patch]]` run of digits it contains.
pub fn normalize_version(input: &str) -> Result<String, VersionError> {
    let trimmed = input.trim().trim_start_matches('v');

    if Version::parse(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    coerce(trimmed).ok_or_else(|| VersionError::InvalidFormat(input.to_string()))
}

fn coerce(input: &str) -> Option<String> {
    static COERCE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = COERCE
        .get_or_init(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").ok())
        .as_ref()?;

    let caps = re.captures(input)?;
    let part = |i: usize| -> Option<u64> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    Some(Version::new(part(1)?, part(2)?, part(3)?).to_string())
}
