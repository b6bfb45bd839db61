//! Typed mod metadata records.
//!
//! A record starts out as a plain [`RuledMod`] and may be upgraded to an
//! [`OfficialMod`] while it is being built. Upgrades consume the previous
//! record and never go the other way.

use crate::identifier::PackageId;
use crate::rules::RuleSet;
use indexmap::IndexSet;
use serde::Serialize;
use std::path::PathBuf;

/// Why a record was marked invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("packageId was not a string: {found}. This mod will be considered invalid by RimWorld.")]
    PackageId { found: String },

    #[error("couldn't parse a valid name{}. This mod will be considered invalid by RimWorld.", fallback_note(.fallback))]
    Name { fallback: Option<String> },

    #[error("couldn't parse a valid description. This mod will be considered invalid by RimWorld.")]
    Description,

    #[error("couldn't parse valid author(s). This mod will be considered invalid by RimWorld.")]
    Authors,

    #[error("couldn't parse valid supportedVersions. This mod will be considered invalid by RimWorld.")]
    SupportedVersions,

    /// The descriptor itself could not be read.
    #[error("descriptor could not be parsed: {detail}")]
    Descriptor { detail: String },
}

fn fallback_note(fallback: &Option<String>) -> String {
    match fallback {
        Some(id) => format!(" (defaulting to packageId {})", id),
        None => String::new(),
    }
}

/// Accumulated validity of a record.
///
/// Reasons are only ever appended, so once a record is invalid it stays
/// invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Validity {
    reasons: Vec<InvalidReason>,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Record a reason and emit a warning for it.
    pub fn invalidate(&mut self, reason: InvalidReason) {
        tracing::warn!("{}", reason);
        self.reasons.push(reason);
    }

    pub fn reasons(&self) -> &[InvalidReason] {
        &self.reasons
    }
}

/// Fields every listed mod has.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModMetadata {
    pub package_id: Option<PackageId>,
    pub name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub supported_versions: IndexSet<String>,
    pub validity: Validity,
    pub mod_path: Option<PathBuf>,
}

impl ModMetadata {
    /// An empty record that is already invalid for `reason`.
    pub fn invalid(reason: InvalidReason) -> Self {
        let mut metadata = Self::default();
        metadata.validity.invalidate(reason);
        metadata
    }
}

/// A listed mod that also carries optional fields and load-order rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuledMod {
    #[serde(flatten)]
    pub metadata: ModMetadata,
    pub mod_version: Option<String>,
    pub mod_icon_path: Option<PathBuf>,
    pub url: Option<String>,
    pub rules: RuleSet,
}

impl From<ModMetadata> for RuledMod {
    fn from(metadata: ModMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }
}

/// First-party content, identified by its numeric app id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficialMod {
    #[serde(flatten)]
    pub ruled: RuledMod,
    pub app_id: u64,
}

/// A parsed mod descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModRecord {
    Base(ModMetadata),
    Ruled(RuledMod),
    Official(OfficialMod),
}

impl Default for ModRecord {
    fn default() -> Self {
        ModRecord::Ruled(RuledMod::default())
    }
}

impl ModRecord {
    /// Promote a base record to a ruled one. Other variants are returned unchanged.
    pub fn into_ruled(self) -> Self {
        match self {
            ModRecord::Base(metadata) => ModRecord::Ruled(metadata.into()),
            other => other,
        }
    }

    /// Upgrade to official content, keeping every field set so far.
    ///
    /// A record that is already official keeps its original app id.
    pub fn into_official(self, app_id: u64) -> Self {
        match self {
            ModRecord::Base(metadata) => ModRecord::Official(OfficialMod {
                ruled: metadata.into(),
                app_id,
            }),
            ModRecord::Ruled(ruled) => ModRecord::Official(OfficialMod { ruled, app_id }),
            official @ ModRecord::Official(_) => official,
        }
    }

    pub fn is_official(&self) -> bool {
        matches!(self, ModRecord::Official(_))
    }

    pub fn app_id(&self) -> Option<u64> {
        match self {
            ModRecord::Official(official) => Some(official.app_id),
            _ => None,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut ModMetadata {
        match self {
            ModRecord::Base(metadata) => metadata,
            ModRecord::Ruled(ruled) => &mut ruled.metadata,
            ModRecord::Official(official) => &mut official.ruled.metadata,
        }
    }

    pub fn ruled(&self) -> Option<&RuledMod> {
        match self {
            ModRecord::Base(_) => None,
            ModRecord::Ruled(ruled) => Some(ruled),
            ModRecord::Official(official) => Some(&official.ruled),
        }
    }

    pub fn ruled_mut(&mut self) -> Option<&mut RuledMod> {
        match self {
            ModRecord::Base(_) => None,
            ModRecord::Ruled(ruled) => Some(ruled),
            ModRecord::Official(official) => Some(&mut official.ruled),
        }
    }

    pub fn rules(&self) -> Option<&RuleSet> {
        self.ruled().map(|ruled| &ruled.rules)
    }
}

/// Capabilities shared by every record variant.
pub trait ListedMod {
    fn metadata(&self) -> &ModMetadata;

    fn package_id(&self) -> Option<&PackageId> {
        self.metadata().package_id.as_ref()
    }

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn description(&self) -> &str {
        &self.metadata().description
    }

    fn authors(&self) -> &[String] {
        &self.metadata().authors
    }

    fn is_valid(&self) -> bool {
        self.metadata().validity.is_valid()
    }
}

impl ListedMod for ModMetadata {
    fn metadata(&self) -> &ModMetadata {
        self
    }
}

impl ListedMod for RuledMod {
    fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }
}

impl ListedMod for OfficialMod {
    fn metadata(&self) -> &ModMetadata {
        &self.ruled.metadata
    }
}

impl ListedMod for ModRecord {
    fn metadata(&self) -> &ModMetadata {
        match self {
            ModRecord::Base(metadata) => metadata,
            ModRecord::Ruled(ruled) => &ruled.metadata,
            ModRecord::Official(official) => &official.ruled.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ModMetadata {
        ModMetadata {
            package_id: Some(PackageId::new("Foo.Bar")),
            name: name.to_string(),
            ..ModMetadata::default()
        }
    }

    #[test]
    fn test_validity_is_monotonic() {
        let mut validity = Validity::default();
        assert!(validity.is_valid());

        validity.invalidate(InvalidReason::Description);
        validity.invalidate(InvalidReason::Authors);

        assert!(!validity.is_valid());
        assert_eq!(
            validity.reasons(),
            &[InvalidReason::Description, InvalidReason::Authors]
        );
    }

    #[test]
    fn test_reason_messages_name_consequence() {
        let reason = InvalidReason::Name {
            fallback: Some("Foo.Bar".to_string()),
        };
        let msg = reason.to_string();
        assert!(msg.contains("defaulting to packageId Foo.Bar"));
        assert!(msg.contains("considered invalid by RimWorld"));

        let msg = InvalidReason::Name { fallback: None }.to_string();
        assert!(!msg.contains("defaulting"));
    }

    #[test]
    fn test_upgrade_keeps_fields() {
        let mut record = ModRecord::Base(named("Core"));
        record.metadata_mut().authors.push("Ludeon Studios".to_string());

        let record = record.into_official(294100);
        assert!(record.is_official());
        assert_eq!(record.app_id(), Some(294100));
        assert_eq!(record.name(), "Core");
        assert_eq!(record.authors(), &["Ludeon Studios".to_string()]);
    }

    #[test]
    fn test_upgrade_is_one_directional() {
        let record = ModRecord::Ruled(RuledMod::from(named("Core")))
            .into_official(294100)
            .into_ruled()
            .into_official(1);

        assert_eq!(record.app_id(), Some(294100));
    }

    #[test]
    fn test_into_ruled_promotes_base() {
        let record = ModRecord::Base(named("x")).into_ruled();
        assert!(matches!(record, ModRecord::Ruled(_)));
        assert!(record.rules().is_some());
        assert_eq!(
            record.package_id().map(PackageId::as_str),
            Some("Foo.Bar")
        );
    }

    #[test]
    fn test_invalid_base_record() {
        let metadata = ModMetadata::invalid(InvalidReason::Descriptor {
            detail: "missing ModMetaData".to_string(),
        });
        assert!(!metadata.is_valid());
        assert!(metadata.package_id().is_none());
    }

    #[test]
    fn test_official_serializes_flat() {
        let record = ModRecord::Ruled(RuledMod::from(named("Core"))).into_official(294100);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["kind"], "official");
        assert_eq!(value["app_id"], 294100);
        assert_eq!(value["package_id"], "Foo.Bar");
        assert_eq!(value["name"], "Core");
    }
}
