//! Core types for bumpr

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Increment applied to the current version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    /// Major version bump
    Major,
    /// Minor version bump
    Minor,
    /// Patch version bump
    Patch,
    /// Major bump into a pre-release
    Premajor,
    /// Minor bump into a pre-release
    Preminor,
    /// Patch bump into a pre-release
    Prepatch,
    /// Next pre-release
    Prerelease,
    /// Explicit version supplied by the user
    Custom,
}

impl Increment {
    /// Every increment, in the order they are offered to the user
    pub const ALL: [Increment; 8] = [
        Self::Major,
        Self::Minor,
        Self::Patch,
        Self::Premajor,
        Self::Preminor,
        Self::Prepatch,
        Self::Prerelease,
        Self::Custom,
    ];

    /// Returns the string representation of the increment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Premajor => "premajor",
            Self::Preminor => "preminor",
            Self::Prepatch => "prepatch",
            Self::Prerelease => "prerelease",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Increment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Increment {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| VersionError::InvalidIncrement(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_roundtrip() {
        for increment in Increment::ALL {
            let parsed: Increment = increment.as_str().parse().unwrap();
            assert_eq!(parsed, increment);
        }
    }

    #[test]
    fn test_increment_is_case_sensitive() {
        assert!("Major".parse::<Increment>().is_err());
        assert!("1.0.0".parse::<Increment>().is_err());
    }

    #[test]
    fn test_increment_serde() {
        let json = serde_json::to_string(&Increment::Prepatch).unwrap();
        assert_eq!(json, "\"prepatch\"");
        let parsed: Vec<Increment> = serde_json::from_str("[\"major\", \"custom\"]").unwrap();
        assert_eq!(parsed, vec![Increment::Major, Increment::Custom]);
    }
}
