//! Descriptor entry point: reads an `About.xml`-style file and builds its record.

use crate::builder::create_listed_mod;
use crate::node::{Node, NodeMap};
use crate::record::{InvalidReason, ModMetadata, ModRecord};
use crate::version::TargetVersion;
use crate::xml::{xml_path_to_node, XmlError};
use std::path::Path;

/// Root element every descriptor must contain.
pub const ROOT_KEY: &str = "ModMetaData";

/// Error type for descriptor loading
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("unable to parse {path}: {source}")]
    Xml {
        path: String,
        #[source]
        source: XmlError,
    },

    #[error("could not parse {path}: no ModMetaData entry")]
    MissingRoot { path: String },
}

/// Read a descriptor and return its `ModMetaData` map.
///
/// # Errors
/// Returns an error if the file can't be read or parsed, or if it has no
/// non-empty `ModMetaData` element.
pub fn load_descriptor(path: &Path) -> Result<NodeMap, DescriptorError> {
    let mut document = xml_path_to_node(path).map_err(|source| DescriptorError::Xml {
        path: path.display().to_string(),
        source,
    })?;

    match document.swap_remove(ROOT_KEY) {
        Some(Node::Map(mod_data)) if !mod_data.is_empty() => Ok(mod_data),
        _ => Err(DescriptorError::MissingRoot {
            path: path.display().to_string(),
        }),
    }
}

/// Parse one descriptor file into a record.
///
/// Failures never escape: an unreadable descriptor yields `false` and an
/// empty, invalid base record.
///
/// # Arguments
/// * `path` - Path to the descriptor XML
/// * `target` - Game version used for version-qualified rules
pub fn parse_descriptor(path: impl AsRef<Path>, target: &TargetVersion) -> (bool, ModRecord) {
    let path = path.as_ref();

    let mod_data = match load_descriptor(path) {
        Ok(mod_data) => mod_data,
        Err(err) => {
            tracing::error!("{}", err);
            let metadata = ModMetadata::invalid(InvalidReason::Descriptor {
                detail: err.to_string(),
            });
            return (false, ModRecord::Base(metadata));
        }
    };

    let (valid, mut record) = create_listed_mod(&mod_data, target);
    record.metadata_mut().mod_path = Some(path.to_path_buf());

    (valid, record)
}
