use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of an external asset referenced by the animation document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image referenced by an Image layer. The generated code loads it at
/// runtime from `uri`; the bytes are never read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub uri: String,
    pub width: f64,
    pub height: f64,
}

impl Asset {
    pub fn new(id: AssetId, uri: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id,
            uri: uri.into(),
            width,
            height,
        }
    }
}

/// Assets keyed by id, iterated in id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset. A later registration with the same id replaces the
    /// earlier one.
    pub fn register(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
