//! Asset metadata records

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// The six asset kinds an asset library can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Animation actions.
    Actions,
    /// Object collections.
    Collections,
    /// Materials.
    Materials,
    /// Node groups.
    NodeGroups,
    /// Objects.
    Objects,
    /// Worlds (environment lighting).
    Worlds,
}

impl AssetType {
    /// All asset types, in catalog order.
    pub const ALL: [AssetType; 6] = [
        AssetType::Actions,
        AssetType::Collections,
        AssetType::Materials,
        AssetType::NodeGroups,
        AssetType::Objects,
        AssetType::Worlds,
    ];

    /// Plural snake_case name, as used in archives and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Actions => "actions",
            AssetType::Collections => "collections",
            AssetType::Materials => "materials",
            AssetType::NodeGroups => "node_groups",
            AssetType::Objects => "objects",
            AssetType::Worlds => "worlds",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownAssetType(s.to_string()))
    }
}

/// Fully-qualified asset identity: library, type and name.
///
/// Names alone collide across libraries (two packs may both ship a
/// "Wood" material), so the catalog always keys on all three.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId {
    /// Library the asset was found in.
    pub library_name: String,
    /// Asset type.
    pub asset_type: AssetType,
    /// Asset name inside its archive.
    pub name: String,
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.library_name, self.asset_type, self.name)
    }
}

/// Metadata for one discovered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Asset name inside its archive.
    pub name: String,
    /// Library the asset was found in.
    pub library_name: String,
    /// Asset type.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Tags attached to the asset.
    pub tags: BTreeSet<String>,
    /// Archive holding the asset.
    pub source_file: PathBuf,
}

impl AssetRecord {
    /// Identity key of this record.
    pub fn id(&self) -> AssetId {
        AssetId {
            library_name: self.library_name.clone(),
            asset_type: self.asset_type,
            name: self.name.clone(),
        }
    }

    /// Whether every tag in `required` is present on this asset.
    pub fn has_tags<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|tag| self.tags.contains(tag.as_ref()))
    }
}

impl fmt::Display for AssetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        write!(
            f,
            "{}: {} from {} with tags [{}]",
            self.name,
            self.asset_type,
            self.library_name,
            tags.join(", ")
        )
    }
}
