//! Record assembly from a descriptor's `ModMetaData` map.
//!
//! Each field is resolved independently; a field that can't be resolved marks
//! the record invalid but never stops the remaining fields from being read.

use crate::extraction::{extract_field, extract_text, extract_value, Extracted};
use crate::identifier::PackageId;
use crate::node::NodeMap;
use crate::official::{self, OFFICIAL_PACKAGE_MARKER, UNKNOWN_OFFICIAL_NAME};
use crate::record::{InvalidReason, ListedMod, ModMetadata, ModRecord};
use crate::rules::create_base_rules;
use crate::version::TargetVersion;
use std::path::PathBuf;

/// Build a record from a descriptor's `ModMetaData` map.
///
/// # Returns
/// The record's validity alongside the fully assembled record.
///
/// # Example
/// ```
/// use modmeta::{create_listed_mod, ListedMod, NodeMap, TargetVersion};
///
/// let data: NodeMap = serde_json::from_str(r#"{
///     "packageId": "Foo.Bar",
///     "name": "Foo",
///     "description": "Does foo things",
///     "author": "Someone",
///     "supportedVersions": {"li": "1.5"}
/// }"#).unwrap();
///
/// let (valid, record) = create_listed_mod(&data, &TargetVersion::parse("1.5").unwrap());
/// assert!(valid);
/// assert_eq!(record.name(), "Foo");
/// ```
pub fn create_listed_mod(mod_data: &NodeMap, target: &TargetVersion) -> (bool, ModRecord) {
    let record = parse_required(mod_data, ModRecord::Base(ModMetadata::default())).into_ruled();
    let record = parse_optional(mod_data, record, target);

    (record.is_valid(), record)
}

/// The official-content state of a record after identifier resolution.
enum Official {
    /// Matched the official-content table
    Known,
    /// Looks official and reported its own app id
    Unlisted,
    No,
}

fn parse_required(mod_data: &NodeMap, mut record: ModRecord) -> ModRecord {
    let package_id = extract_field(mod_data, "packageId");
    match package_id.and_then(|v| v.as_text()) {
        Some(id) => record.metadata_mut().package_id = Some(PackageId::new(id)),
        None => record
            .metadata_mut()
            .validity
            .invalidate(InvalidReason::PackageId {
                found: describe(package_id),
            }),
    }

    let (mut record, official) = resolve_official(mod_data, record);

    match extract_text(mod_data, "name") {
        Some(name) if !matches!(official, Official::Known) => {
            record.metadata_mut().name = name.to_string();
        }
        Some(_) => {}
        None if matches!(official, Official::No) => {
            let metadata = record.metadata_mut();
            let fallback = metadata.package_id.as_ref().map(|id| id.as_str().to_string());
            if let Some(id) = &fallback {
                metadata.name = id.clone();
            }
            metadata.validity.invalidate(InvalidReason::Name { fallback });
        }
        None => {}
    }

    match extract_text(mod_data, "description") {
        Some(description) if !matches!(official, Official::Known) => {
            record.metadata_mut().description = description.to_string();
        }
        Some(_) => {}
        None if matches!(official, Official::No) => {
            record
                .metadata_mut()
                .validity
                .invalidate(InvalidReason::Description);
        }
        None => {}
    }

    let is_official = record.is_official();
    let metadata = record.metadata_mut();

    let author = extract_text(mod_data, "author");
    if let Some(author) = author {
        metadata.authors.push(author.to_string());
    }
    let listed = parse_string_list(extract_field(mod_data, "authors"));
    let has_listed = !listed.is_empty();
    metadata.authors.extend(listed);

    if author.is_none() && !has_listed && !is_official {
        metadata.validity.invalidate(InvalidReason::Authors);
    }

    let versions = parse_string_list(extract_field(mod_data, "supportedVersions"));
    if !versions.is_empty() {
        metadata.supported_versions = versions.into_iter().collect();
    } else if !is_official {
        metadata.validity.invalidate(InvalidReason::SupportedVersions);
    }

    record
}

fn resolve_official(mod_data: &NodeMap, record: ModRecord) -> (ModRecord, Official) {
    let Some(package_id) = record.package_id().cloned() else {
        return (record, Official::No);
    };

    if let Some(content) = official::lookup_package_id(package_id.folded()) {
        tracing::info!("Detected known Ludeon package id: {}.", package_id);

        let mut record = record.into_official(content.app_id);
        let metadata = record.metadata_mut();
        metadata.name = content.name.to_string();
        metadata.description = content.description.to_string();
        return (record, Official::Known);
    }

    if !package_id.contains(OFFICIAL_PACKAGE_MARKER) {
        return (record, Official::No);
    }

    tracing::warn!(
        "Detected mod that is possibly a Ludeon mod with package id: {}. \
         Could not be matched with known DLC package ids.",
        package_id
    );

    let steam_app_id = extract_field(mod_data, "steamAppId");
    match steam_app_id.and_then(|v| v.as_text()) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(app_id) => {
                tracing::info!(
                    "Found steam app id '{}' for suspected Ludeon mod '{}'. Treating as Ludeon mod.",
                    app_id,
                    package_id
                );
                let mut record = record.into_official(app_id);
                let metadata = record.metadata_mut();
                metadata.name = UNKNOWN_OFFICIAL_NAME.to_string();
                metadata.description = UNKNOWN_OFFICIAL_NAME.to_string();
                (record, Official::Unlisted)
            }
            Err(_) => {
                tracing::warn!(
                    "Found steamAppId '{}' was not a valid integer. Treating {} as a normal mod.",
                    raw,
                    package_id
                );
                (record, Official::No)
            }
        },
        None => {
            tracing::warn!(
                "Could not find steamAppId in mod data. Treating {} as a normal mod.",
                package_id
            );
            (record, Official::No)
        }
    }
}

fn parse_optional(mod_data: &NodeMap, mut record: ModRecord, target: &TargetVersion) -> ModRecord {
    let Some(ruled) = record.ruled_mut() else {
        return record;
    };

    if let Some(version) = non_empty_text(mod_data, "modVersion") {
        ruled.mod_version = Some(version.to_string());
    }

    if let Some(icon) = non_empty_text(mod_data, "modIconPath") {
        ruled.mod_icon_path = Some(PathBuf::from(icon));
    }

    if let Some(url) = non_empty_text(mod_data, "url") {
        ruled.url = Some(url.to_string());
    }

    // descriptionsByVersion is not read
    ruled.rules = create_base_rules(mod_data, target);

    record
}

// A single string or the text items of a list. Non-text items are skipped.
fn parse_string_list(value: Option<Extracted<'_>>) -> Vec<String> {
    match value {
        Some(Extracted::Text(s)) => vec![s.to_string()],
        Some(Extracted::List(items)) => items
            .iter()
            .filter_map(|item| extract_value(item).as_text())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty_text<'a>(mod_data: &'a NodeMap, key: &str) -> Option<&'a str> {
    extract_text(mod_data, key).filter(|s| !s.is_empty())
}

fn describe(value: Option<Extracted<'_>>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(Extracted::Empty) => "<empty>".to_string(),
        Some(Extracted::Text(s)) => format!("{:?}", s),
        Some(Extracted::List(items)) => format!("<list of {}>", items.len()),
        Some(Extracted::Map(map)) => format!("<map with {} keys>", map.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: serde_json::Value) -> (bool, ModRecord) {
        let data: NodeMap = serde_json::from_value(value).unwrap();
        create_listed_mod(&data, &TargetVersion::parse("1.5").unwrap())
    }

    fn reasons(record: &ModRecord) -> Vec<InvalidReason> {
        record.metadata().validity.reasons().to_vec()
    }

    #[test]
    fn test_complete_descriptor_is_valid() {
        let (valid, record) = build(json!({
            "packageId": "Foo.Bar",
            "name": "Foo",
            "description": "Does foo",
            "author": "Someone",
            "supportedVersions": {"li": "1.5"}
        }));

        assert!(valid);
        assert!(matches!(record, ModRecord::Ruled(_)));
        assert_eq!(record.package_id().unwrap().as_str(), "Foo.Bar");
        assert_eq!(record.authors(), &["Someone".to_string()]);
        assert!(record.metadata().supported_versions.contains("1.5"));
    }

    #[test]
    fn test_missing_name_defaults_to_package_id() {
        let (valid, record) = build(json!({
            "packageId": "Foo.Bar",
            "description": "Does foo",
            "author": "Someone",
            "supportedVersions": ["1.5"]
        }));

        assert!(!valid);
        assert_eq!(record.name(), "Foo.Bar");
        assert_eq!(
            reasons(&record),
            vec![InvalidReason::Name {
                fallback: Some("Foo.Bar".to_string())
            }]
        );
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let (valid, record) = build(json!({"packageId": ["not", "text"]}));

        assert!(!valid);
        assert_eq!(
            reasons(&record),
            vec![
                InvalidReason::PackageId {
                    found: "<list of 2>".to_string()
                },
                InvalidReason::Name { fallback: None },
                InvalidReason::Description,
                InvalidReason::Authors,
                InvalidReason::SupportedVersions,
            ]
        );
        assert_eq!(record.name(), "");
    }

    #[test]
    fn test_known_official_content() {
        let (valid, record) = build(json!({
            "packageId": "Ludeon.RimWorld.Royalty",
            "name": "Something else"
        }));

        assert!(valid);
        assert_eq!(record.app_id(), Some(1149640));
        assert_eq!(record.name(), "Royalty (DLC #1)");
        assert!(record.description().starts_with("Royalty expansion"));
        assert!(record.rules().is_some());
    }

    #[test]
    fn test_unlisted_official_with_app_id() {
        let (valid, record) = build(json!({
            "packageId": "ludeon.rimworld.future",
            "steamAppId": "9999999"
        }));

        assert!(valid);
        assert_eq!(record.app_id(), Some(9999999));
        assert_eq!(record.name(), UNKNOWN_OFFICIAL_NAME);
        assert_eq!(record.description(), UNKNOWN_OFFICIAL_NAME);
    }

    #[test]
    fn test_unlisted_official_prefers_descriptor_name() {
        let (_, record) = build(json!({
            "packageId": "ludeon.rimworld.future",
            "steamAppId": "9999999",
            "name": "Future"
        }));

        assert_eq!(record.name(), "Future");
        assert_eq!(record.description(), UNKNOWN_OFFICIAL_NAME);
    }

    #[test]
    fn test_suspected_official_without_app_id_is_normal() {
        let (valid, record) = build(json!({
            "packageId": "ludeon.rimworld.fake",
            "steamAppId": "not-a-number",
            "name": "Fake"
        }));

        assert!(!valid);
        assert!(!record.is_official());
        assert_eq!(
            reasons(&record),
            vec![
                InvalidReason::Description,
                InvalidReason::Authors,
                InvalidReason::SupportedVersions
            ]
        );
    }

    #[test]
    fn test_authors_are_concatenated_singular_first() {
        let (_, record) = build(json!({
            "packageId": "a.b",
            "author": "Lead",
            "authors": {"li": ["Second", "Third"]}
        }));

        assert_eq!(
            record.authors(),
            &["Lead".to_string(), "Second".to_string(), "Third".to_string()]
        );
        assert!(!reasons(&record).contains(&InvalidReason::Authors));
    }

    #[test]
    fn test_supported_versions_are_deduplicated() {
        let (_, record) = build(json!({
            "packageId": "a.b",
            "supportedVersions": {"li": ["1.4", "1.5", "1.4"]}
        }));

        let versions: Vec<&String> = record.metadata().supported_versions.iter().collect();
        assert_eq!(versions, vec!["1.4", "1.5"]);
    }

    #[test]
    fn test_optional_fields() {
        let (_, record) = build(json!({
            "packageId": "a.b",
            "modVersion": "1.2.3",
            "modIconPath": "About/Icon.png",
            "url": "",
            "loadAfter": {"li": "ludeon.rimworld"}
        }));

        let ruled = record.ruled().unwrap();
        assert_eq!(ruled.mod_version.as_deref(), Some("1.2.3"));
        assert_eq!(ruled.mod_icon_path, Some(PathBuf::from("About/Icon.png")));
        assert_eq!(ruled.url, None);
        assert!(ruled.rules.load_after.contains("Ludeon.RimWorld"));
    }

    #[test]
    fn test_bare_descriptor_is_promoted_to_ruled() {
        let (valid, record) = build(json!({"packageId": "a.b"}));

        assert!(!valid);
        assert!(matches!(record, ModRecord::Ruled(_)));
        assert_eq!(record.rules(), Some(&crate::rules::RuleSet::default()));
    }
}
