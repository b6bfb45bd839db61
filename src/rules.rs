//! Dependency and load-order rules declared by a descriptor.
//!
//! Every rule category merges the same way: unconditioned entries first, then
//! entries from the version-qualified map that match the target version, then
//! (for load before/after) the forced entries.

use crate::extraction::{collect_entries, extract_text, extract_value};
use crate::identifier::{PackageId, PackageIdSet};
use crate::node::{Node, NodeMap};
use crate::version::{match_version, MatchMode, TargetVersion};
use indexmap::IndexMap;
use serde::Serialize;

/// A mod another mod depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyMod {
    pub package_id: Option<PackageId>,
    pub name: Option<String>,
    pub workshop_url: Option<String>,
}

/// An entry dropped while building a [`RuleSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiscardedEntry {
    /// A later dependency on an id that was already declared
    DuplicateDependency { package_id: PackageId },
    /// A dependency entry that wasn't a structured map
    MalformedDependency { entry: String },
    /// A load-order or incompatibility entry that wasn't text
    NonTextRule { category: RuleCategory, entry: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    LoadBefore,
    LoadAfter,
    IncompatibleWith,
}

/// Load-order and dependency constraints for one mod.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet {
    pub dependencies: IndexMap<PackageId, DependencyMod>,
    /// Dependencies declared without a usable `packageId`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unkeyed_dependencies: Vec<DependencyMod>,
    pub load_before: PackageIdSet,
    pub load_after: PackageIdSet,
    pub incompatible_with: PackageIdSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discarded: Vec<DiscardedEntry>,
}

impl RuleSet {
    pub fn dependency(&self, package_id: &str) -> Option<&DependencyMod> {
        self.dependencies.get(&PackageId::new(package_id))
    }

    fn discard(&mut self, entry: DiscardedEntry) {
        self.discarded.push(entry);
    }

    fn add_dependency(&mut self, dependency: DependencyMod) {
        let Some(package_id) = dependency.package_id.clone() else {
            tracing::warn!(
                "Dependency without a packageId: {:?}. This mod may be invalid.",
                dependency
            );
            self.unkeyed_dependencies.push(dependency);
            return;
        };

        if self.dependencies.contains_key(&package_id) {
            tracing::warn!("Duplicate dependency found: {}. Skipping.", package_id);
            self.discard(DiscardedEntry::DuplicateDependency { package_id });
        } else {
            self.dependencies.insert(package_id, dependency);
        }
    }
}

/// Build the rule set declared by a descriptor for `target`.
///
/// # Arguments
/// * `mod_data` - The descriptor's `ModMetaData` map
/// * `target` - Game version used to pick version-qualified entries
pub fn create_base_rules(mod_data: &NodeMap, target: &TargetVersion) -> RuleSet {
    let mut rules = RuleSet::default();

    for entry in merged_entries(mod_data, "modDependencies", None, target) {
        match entry.as_map() {
            Some(map) => rules.add_dependency(create_mod_dependency(map)),
            None => {
                tracing::warn!(
                    "Skipping invalid dependency: {}. This mod may be invalid.",
                    entry.describe()
                );
                rules.discard(DiscardedEntry::MalformedDependency {
                    entry: entry.describe(),
                });
            }
        }
    }

    rules.load_before = load_operations(
        &mut rules.discarded,
        mod_data,
        RuleCategory::LoadBefore,
        target,
    );
    rules.load_after = load_operations(
        &mut rules.discarded,
        mod_data,
        RuleCategory::LoadAfter,
        target,
    );
    rules.incompatible_with = load_operations(
        &mut rules.discarded,
        mod_data,
        RuleCategory::IncompatibleWith,
        target,
    );

    rules
}

/// Build a [`DependencyMod`] from one dependency entry.
///
/// Fields that are missing or not text are left unset.
pub fn create_mod_dependency(input: &NodeMap) -> DependencyMod {
    DependencyMod {
        package_id: extract_text(input, "packageId").map(PackageId::new),
        name: extract_text(input, "displayName").map(str::to_string),
        workshop_url: extract_text(input, "workshopUrl").map(str::to_string),
    }
}

impl RuleCategory {
    fn key(self) -> &'static str {
        match self {
            RuleCategory::LoadBefore => "loadBefore",
            RuleCategory::LoadAfter => "loadAfter",
            RuleCategory::IncompatibleWith => "incompatibleWith",
        }
    }

    fn force_key(self) -> Option<&'static str> {
        match self {
            RuleCategory::LoadBefore => Some("forceLoadBefore"),
            RuleCategory::LoadAfter => Some("forceLoadAfter"),
            RuleCategory::IncompatibleWith => None,
        }
    }
}

fn load_operations(
    discarded: &mut Vec<DiscardedEntry>,
    mod_data: &NodeMap,
    category: RuleCategory,
    target: &TargetVersion,
) -> PackageIdSet {
    let mut ids = PackageIdSet::new();

    for entry in merged_entries(mod_data, category.key(), category.force_key(), target) {
        match extract_value(entry).as_text() {
            Some(id) => {
                ids.insert(id);
            }
            None => {
                tracing::warn!(
                    "Skipping non-text {} entry: {}",
                    category.key(),
                    entry.describe()
                );
                discarded.push(DiscardedEntry::NonTextRule {
                    category,
                    entry: entry.describe(),
                });
            }
        }
    }

    ids
}

// Unconditioned, then version-matched `{key}ByVersion`, then forced entries.
fn merged_entries<'a>(
    mod_data: &'a NodeMap,
    key: &str,
    force_key: Option<&str>,
    target: &TargetVersion,
) -> Vec<&'a Node> {
    let mut entries: Vec<&Node> = mod_data.get(key).map(collect_entries).unwrap_or_default();

    let versioned_key = format!("{}ByVersion", key);
    match mod_data.get(&versioned_key) {
        Some(Node::Map(versioned)) => {
            if let Some(matched) = match_version(versioned, target, MatchMode::All) {
                entries.extend(matched.into_iter().flat_map(collect_entries));
            }
        }
        Some(other) => {
            tracing::debug!("Ignoring {} that is not a map: {}", versioned_key, other.describe());
        }
        None => {}
    }

    if let Some(force_key) = force_key {
        if let Some(forced) = mod_data.get(force_key) {
            entries.extend(collect_entries(forced));
        }
    }

    entries
}
