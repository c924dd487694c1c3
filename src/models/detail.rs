// src/models/detail.rs

//! Secondary application data attached by the detail fetch: documents,
//! the decision, and the tenure geometry features.

use serde::{Deserialize, Serialize};

/// A document attached to an application, comment or decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_application", default)]
    pub application_id: Option<String>,

    #[serde(rename = "_decision", default)]
    pub decision_id: Option<String>,

    #[serde(rename = "documentFileName", default)]
    pub document_file_name: Option<String>,

    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "internalURL", default)]
    pub internal_url: Option<String>,

    #[serde(rename = "internalMime", default)]
    pub internal_mime: Option<String>,
}

/// The decision record for an application, if one has been made.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_application", default)]
    pub application_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A tenure geometry feature. Geometry and Tantalis properties are kept as
/// raw JSON; this client never interprets them, only passes them through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "applicationID", default)]
    pub application_id: Option<String>,

    #[serde(default)]
    pub geometry: Option<serde_json::Value>,

    #[serde(default)]
    pub properties: Option<serde_json::Value>,

    #[serde(rename = "type", default)]
    pub feature_type: Option<String>,
}
