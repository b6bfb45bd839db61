//! Official content bundled with the game.
//!
//! Core game data and paid expansions ship as packages too, but their
//! descriptors are sparse. Their display metadata comes from this table
//! rather than from the descriptor.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Display metadata for one piece of official content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficialContent {
    pub app_id: u64,
    /// Lowercase package id
    pub package_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Substring that marks a package id as probably first-party.
pub const OFFICIAL_PACKAGE_MARKER: &str = "ludeon.";

/// Name and description given to first-party content missing from [`OFFICIAL_CONTENT`].
pub const UNKNOWN_OFFICIAL_NAME: &str = "Unknown Ludeon mod";

pub const OFFICIAL_CONTENT: &[OfficialContent] = &[
    OfficialContent {
        app_id: 294100,
        package_id: "ludeon.rimworld",
        name: "Core (Base game)",
        description: "The core game data for RimWorld.",
    },
    OfficialContent {
        app_id: 1149640,
        package_id: "ludeon.rimworld.royalty",
        name: "Royalty (DLC #1)",
        description: "Royalty expansion: the Empire, psychic powers, titles, quests and mechanoid clusters.",
    },
    OfficialContent {
        app_id: 1392840,
        package_id: "ludeon.rimworld.ideology",
        name: "Ideology (DLC #2)",
        description: "Ideology expansion: belief systems, rituals, roles, relics and ancient complexes.",
    },
    OfficialContent {
        app_id: 1826140,
        package_id: "ludeon.rimworld.biotech",
        name: "Biotech (DLC #3)",
        description: "Biotech expansion: children and family, xenogenes, mechanitors and new threats.",
    },
    OfficialContent {
        app_id: 2380740,
        package_id: "ludeon.rimworld.anomaly",
        name: "Anomaly (DLC #4)",
        description: "Anomaly expansion: dark entities, containment, study and the void.",
    },
    OfficialContent {
        app_id: 3022790,
        package_id: "ludeon.rimworld.odyssey",
        name: "Odyssey (DLC #5)",
        description: "Odyssey expansion: gravships, orbital travel and new biomes.",
    },
];

/// Lowercase package id -> app id, built on first use.
pub fn package_id_app_id_map() -> &'static HashMap<&'static str, u64> {
    static MAP: OnceLock<HashMap<&'static str, u64>> = OnceLock::new();
    MAP.get_or_init(|| {
        OFFICIAL_CONTENT
            .iter()
            .map(|content| (content.package_id, content.app_id))
            .collect()
    })
}

pub fn content_for_app_id(app_id: u64) -> Option<&'static OfficialContent> {
    OFFICIAL_CONTENT.iter().find(|content| content.app_id == app_id)
}

/// Look up official content by (case-insensitive) package id.
pub fn lookup_package_id(package_id: &str) -> Option<&'static OfficialContent> {
    package_id_app_id_map()
        .get(package_id.to_lowercase().as_str())
        .and_then(|app_id| content_for_app_id(*app_id))
}
