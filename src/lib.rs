//! # modmeta: typed metadata from mod descriptors
//!
//! Turns the loosely structured `About.xml` descriptor of a RimWorld mod
//! into a validated [`ModRecord`] and extracts the load-order rules it
//! declares.
//!
//! ## Features
//!
//! - **Case-insensitive identity**: [`PackageId`] and [`PackageIdSet`] compare by
//!   lowercase form but keep the original casing for display
//! - **Shape normalization**: [`extract_value`] peels off wrapper elements and
//!   attribute markers from the generic [`Node`] tree
//! - **Version-qualified rules**: `*ByVersion` fields are matched against a
//!   [`TargetVersion`] and merged into the [`RuleSet`]
//! - **Official content**: first-party packages are recognized and upgraded to
//!   [`OfficialMod`] records with table-sourced metadata
//!
//! ## Example
//!
//! ```ignore
//! use modmeta::{parse_descriptor, ListedMod, TargetVersion};
//!
//! let target = TargetVersion::parse("1.5")?;
//! let (valid, record) = parse_descriptor("Mods/Foo/About/About.xml", &target);
//! if !valid {
//!     for reason in record.metadata().validity.reasons() {
//!         eprintln!("{}", reason);
//!     }
//! }
//! ```

pub mod builder;
pub mod config;
pub mod extraction;
pub mod identifier;
pub mod node;
pub mod official;
pub mod parser;
pub mod record;
pub mod rules;
pub mod rules_db;
pub mod serialization;
pub mod version;
pub mod xml;

// Re-export key types
pub use builder::create_listed_mod;
pub use config::{ConfigError, ParserConfig};
pub use extraction::{collect_entries, extract_value, Extracted};
pub use identifier::{PackageId, PackageIdSet};
pub use node::{Node, NodeMap};
pub use parser::{load_descriptor, parse_descriptor, DescriptorError};
pub use record::{InvalidReason, ListedMod, ModMetadata, ModRecord, OfficialMod, RuledMod, Validity};
pub use rules::{create_base_rules, create_mod_dependency, DependencyMod, DiscardedEntry, RuleSet};
pub use rules_db::{get_rules_db, ExternalRule, ExternalRulesSchema, RulesDbError};
pub use serialization::{OutputFormat, RecordWriter, SerializationError};
pub use version::{match_version, MatchMode, TargetVersion, VersionError};
pub use xml::{xml_path_to_node, xml_str_to_node, XmlError};
