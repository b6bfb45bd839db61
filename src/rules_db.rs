//! Externally maintained load-order rules database.
//!
//! The database is a JSON document keyed by package id. It is read here but
//! not merged into descriptor rule sets.

use crate::identifier::PackageIdSet;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error type for rules database loading
#[derive(Debug, thiserror::Error)]
pub enum RulesDbError {
    #[error("failed to read rules DB {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode rules DB {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level rules database document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalRulesSchema {
    /// Unix timestamp of the last database update
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub rules: IndexMap<String, ExternalRule>,
}

impl ExternalRulesSchema {
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    /// Rules for a package id, matched case-insensitively.
    pub fn rule_for(&self, package_id: &str) -> Option<&ExternalRule> {
        let folded = package_id.to_lowercase();
        self.rules
            .iter()
            .find(|(id, _)| id.to_lowercase() == folded)
            .map(|(_, rule)| rule)
    }
}

/// Rules the database declares for one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRule {
    #[serde(default)]
    pub load_after: IndexMap<String, RuleAnnotation>,
    #[serde(default)]
    pub load_before: IndexMap<String, RuleAnnotation>,
    #[serde(default)]
    pub load_top: Option<RuleFlag>,
    #[serde(default)]
    pub load_bottom: Option<RuleFlag>,
}

impl ExternalRule {
    pub fn load_after_ids(&self) -> PackageIdSet {
        self.load_after.keys().map(String::as_str).collect()
    }

    pub fn load_before_ids(&self) -> PackageIdSet {
        self.load_before.keys().map(String::as_str).collect()
    }

    pub fn is_load_top(&self) -> bool {
        self.load_top.is_some_and(|flag| flag.value)
    }

    pub fn is_load_bottom(&self) -> bool {
        self.load_bottom.is_some_and(|flag| flag.value)
    }
}

/// Who added a rule and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleAnnotation {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFlag {
    pub value: bool,
}

/// Load the rules database at `path`.
///
/// # Returns
/// * `Ok(Some(db))` - The database was found and decoded
/// * `Ok(None)` - No file exists at `path`
/// * `Err(e)` - The file exists but couldn't be read or decoded
pub fn get_rules_db(path: &Path) -> Result<Option<ExternalRulesSchema>, RulesDbError> {
    tracing::info!("Checking Rules DB at: {}", path.display());

    if !path.exists() {
        tracing::warn!("Rules DB not found at specified path.");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| RulesDbError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rules_db: ExternalRulesSchema =
        serde_json::from_str(&content).map_err(|source| RulesDbError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("Loaded {} additional rules", rules_db.rules.len());
    Ok(Some(rules_db))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timestamp": 1700000000,
        "rules": {
            "Some.Mod": {
                "loadAfter": {
                    "Other.Mod": {"name": ["curator"], "comment": ["patches other"]}
                },
                "loadBottom": {"value": true}
            }
        }
    }"#;

    #[test]
    fn test_missing_db_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = get_rules_db(&dir.path().join("communityRules.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("communityRules.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let db = get_rules_db(&path).unwrap().unwrap();
        assert_eq!(db.rules.len(), 1);
        assert_eq!(db.updated_at().unwrap().timestamp(), 1700000000);

        let rule = db.rule_for("some.mod").unwrap();
        assert!(rule.load_after_ids().contains("other.mod"));
        assert!(rule.load_before_ids().is_empty());
        assert!(rule.is_load_bottom());
        assert!(!rule.is_load_top());
        assert_eq!(rule.load_after["Other.Mod"].comment, vec!["patches other"]);
    }

    #[test]
    fn test_undecodable_db_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("communityRules.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            get_rules_db(&path),
            Err(RulesDbError::Decode { .. })
        ));
    }
}
