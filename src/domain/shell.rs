// Copyright (c) 2025 - Cowboy AI, Inc.
//! AAS v3 entity bodies served by repositories
//!
//! Only the fields the search needs are typed. Everything else in the
//! payload is kept in `extra` so a resolved shell can be handed to the
//! caller unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key inside a [`Reference`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

/// AAS reference (model or external)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub reference_type: String,
    #[serde(default)]
    pub keys: Vec<Key>,
}

impl Reference {
    /// Model reference pointing at a submodel
    pub fn submodel(submodel_id: impl Into<String>) -> Self {
        Self {
            reference_type: "ModelReference".to_string(),
            keys: vec![Key {
                key_type: "Submodel".to_string(),
                value: submodel_id.into(),
            }],
        }
    }

    /// Value of the first key, which is the referenced ID for submodel references
    pub fn first_key_value(&self) -> Option<&str> {
        self.keys.first().map(|k| k.value.as_str())
    }
}

/// Specific asset identifier (name/value pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificAssetId {
    pub name: String,
    pub value: String,
}

/// Asset information of a shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInformation {
    pub asset_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specific_asset_ids: Vec<SpecificAssetId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AssetInformation {
    fn default() -> Self {
        Self {
            asset_kind: "Instance".to_string(),
            global_asset_id: None,
            specific_asset_ids: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Asset Administration Shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAdministrationShell {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default)]
    pub asset_information: AssetInformation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodels: Vec<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetAdministrationShell {
    /// Minimal shell with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: None,
            asset_information: AssetInformation::default(),
            submodels: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Set the asset's global ID
    pub fn with_global_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_information.global_asset_id = Some(asset_id.into());
        self
    }

    /// Add a submodel reference
    pub fn with_submodel(mut self, submodel_id: impl Into<String>) -> Self {
        self.submodels.push(Reference::submodel(submodel_id));
        self
    }

    /// IDs of all referenced submodels, in reference order
    pub fn submodel_ids(&self) -> impl Iterator<Item = &str> {
        self.submodels.iter().filter_map(Reference::first_key_value)
    }
}

/// Submodel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submodel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Submodel {
    /// Minimal submodel with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: None,
            semantic_id: None,
            extra: Map::new(),
        }
    }
}
