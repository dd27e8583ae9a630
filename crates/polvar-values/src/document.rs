//! The values document: operator-supplied variable values for a dry run.
//!
//! A document is read once and never mutated afterwards. Every collection is
//! optional on disk and defaults to empty.

use crate::error::ValuesError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const VALUES_API_VERSION: &str = "cli.kyverno.io/v1alpha1";
pub const VALUES_KIND: &str = "Value";

/// Variable name -> arbitrary value.
pub type ValueMap = BTreeMap<String, Value>;

/// Variable name -> one value per foreach iteration.
pub type ForeachValues = BTreeMap<String, Vec<Value>>;

/// Namespace label set.
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Values applied to every (policy, resource) pair.
    #[serde(default)]
    pub global_values: ValueMap,

    #[serde(default)]
    pub policies: Vec<PolicyValues>,

    #[serde(default, rename = "namespaceSelector")]
    pub namespace_selectors: Vec<NamespaceSelector>,

    #[serde(default)]
    pub subresources: Vec<Subresource>,
}

/// Values scoped to one policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyValues {
    pub name: String,

    #[serde(default)]
    pub resources: Vec<ResourceValues>,

    #[serde(default)]
    pub rules: Vec<RuleValues>,
}

/// Values for one resource evaluated under the enclosing policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceValues {
    pub name: String,

    #[serde(default)]
    pub values: ValueMap,
}

/// Values for one rule of the enclosing policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleValues {
    pub name: String,

    #[serde(default)]
    pub values: ValueMap,

    #[serde(default)]
    pub foreach_values: ForeachValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSelector {
    pub name: String,

    #[serde(default)]
    pub labels: Labels,
}

/// A subresource and the resource it hangs off. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subresource {
    pub subresource: ApiResource,
    pub parent_resource: ApiResource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub singular_name: String,

    #[serde(default)]
    pub namespaced: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<String>,
}

impl ValuesDocument {
    /// Parse a values document from YAML (JSON input is accepted as well).
    ///
    /// An empty or comment-only source yields an empty document. A `kind`
    /// header, when present, must be `Value`.
    pub fn from_yaml_str(source: &str) -> Result<Self, ValuesError> {
        let has_content = source.lines().any(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#') && trimmed != "---"
        });
        if !has_content {
            return Ok(Self::default());
        }

        let document: Self =
            serde_yaml::from_str(source).map_err(|e| ValuesError::Parse(e.to_string()))?;
        if let Some(kind) = document.kind.as_deref()
            && kind != VALUES_KIND
        {
            return Err(ValuesError::UnexpectedKind(kind.to_string()));
        }
        Ok(document)
    }

    /// Read and parse a values document from disk.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ValuesError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ValuesError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&source)
    }
}
