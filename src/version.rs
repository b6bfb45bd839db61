//! Target game versions and version-qualified field selection.

use crate::node::{Node, NodeMap};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Error type for target version parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VersionError {
    #[error("target version '{0}' is not of the form 'major.minor'")]
    Malformed(String),
}

/// A `major.minor` game version that rule fields are matched against.
///
/// Any components after the second are ignored, so `"1.5.4104"` targets
/// `1.5`.
#[derive(Debug, Clone)]
pub struct TargetVersion {
    major: String,
    minor: String,
    label_pattern: Regex,
}

impl TargetVersion {
    /// Parse a target version string.
    ///
    /// # Errors
    /// Returns [`VersionError::Malformed`] when the string has no dot or an
    /// empty major/minor component.
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let mut parts = version.trim().split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts
            .next()
            .ok_or_else(|| VersionError::Malformed(version.to_string()))?;

        if major.is_empty() || minor.is_empty() {
            return Err(VersionError::Malformed(version.to_string()));
        }

        let pattern = format!("^v{}\\.{}", regex::escape(major), regex::escape(minor));
        let label_pattern =
            Regex::new(&pattern).map_err(|_| VersionError::Malformed(version.to_string()))?;

        Ok(Self {
            major: major.to_string(),
            minor: minor.to_string(),
            label_pattern,
        })
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Whether a version label such as `v1.5` applies to this target.
    ///
    /// Only the start of the label is matched, so `v1.5-extra` applies to
    /// `1.5` as well.
    pub fn matches_label(&self, label: &str) -> bool {
        self.label_pattern.is_match(label)
    }
}

impl PartialEq for TargetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl Eq for TargetVersion {}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for TargetVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How many matching entries [`match_version`] collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    All,
    First,
}

/// Select the values of a version-keyed map that apply to `target`.
///
/// # Arguments
/// * `input` - Map keyed by version labels (`v1.4`, `v1.5`, ...)
/// * `target` - The game version being targeted
/// * `mode` - Collect every match in map order, or stop at the first
///
/// # Returns
/// `None` when no label matches, otherwise the matched values.
pub fn match_version<'a>(
    input: &'a NodeMap,
    target: &TargetVersion,
    mode: MatchMode,
) -> Option<Vec<&'a Node>> {
    let mut results = Vec::new();

    for (label, value) in input {
        if target.matches_label(label) {
            results.push(value);
            if mode == MatchMode::First {
                break;
            }
        }
    }

    if results.is_empty() {
        None
    } else {
        Some(results)
    }
}
