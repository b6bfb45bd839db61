//! Case-insensitive package identifiers.
//!
//! Package ids are compared, hashed and deduplicated by their lowercase form,
//! while the original casing is kept for display.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A package identifier with case-insensitive identity.
///
/// # Example
///
/// ```
/// use modmeta::PackageId;
///
/// let id = PackageId::new("Foo.Bar");
/// assert_eq!(id, PackageId::new("foo.bar"));
/// assert_eq!(id.to_string(), "Foo.Bar");
/// assert_eq!(id.folded(), "foo.bar");
/// ```
#[derive(Debug, Clone)]
pub struct PackageId {
    original: String,
    folded: String,
}

impl PackageId {
    pub fn new(value: impl Into<String>) -> Self {
        let original = value.into();
        let folded = original.to_lowercase();
        Self { original, folded }
    }

    /// The identifier as it was written.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The lowercase form used for identity.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive substring test against the folded form.
    pub fn contains(&self, needle: &str) -> bool {
        self.folded.contains(&needle.to_lowercase())
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for PackageId {}

impl PartialEq<str> for PackageId {
    fn eq(&self, other: &str) -> bool {
        self.folded == other.to_lowercase()
    }
}

impl PartialEq<&str> for PackageId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

impl From<&str> for PackageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PackageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for PackageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for PackageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// An insertion-ordered set of [`PackageId`]s.
///
/// Inserting an id that folds to an existing member leaves the set unchanged;
/// the first spelling seen is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIdSet {
    ids: IndexSet<PackageId>,
}

impl PackageIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns `false` if an equivalent id was already present.
    pub fn insert(&mut self, id: impl Into<PackageId>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(&PackageId::new(id))
    }

    pub fn contains_id(&self, id: &PackageId) -> bool {
        self.ids.contains(id)
    }

    /// Remove an id, keeping the order of the remaining members.
    ///
    /// # Returns
    /// The stored member (with its original casing) if one matched.
    pub fn remove(&mut self, id: &str) -> Option<PackageId> {
        self.ids.shift_take(&PackageId::new(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageId> {
        self.ids.iter()
    }

    /// Folded forms of all members, in insertion order.
    pub fn folded(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(PackageId::folded)
    }

    pub fn union(&self, other: &Self) -> Self {
        self.ids.union(&other.ids).cloned().collect()
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.ids.intersection(&other.ids).cloned().collect()
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.ids.difference(&other.ids).cloned().collect()
    }
}

impl<T: Into<PackageId>> FromIterator<T> for PackageIdSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Into<PackageId>> Extend<T> for PackageIdSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a PackageIdSet {
    type Item = &'a PackageId;
    type IntoIter = indexmap::set::Iter<'a, PackageId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
