//! Model tree
//!
//! Populated metadata nodes as handed over by the model-loading layer. The
//! engine only reads them.

use crate::descriptor::{NodeTypeDescriptor, IDENTIFIER};
use crate::error::{invalid_argument, SyncResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// One node of the model tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModelNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 128, message = "Node id must be between 1 and 128 characters"))]
    #[validate(regex(path = *IDENTIFIER, message = "Node id is not a valid identifier"))]
    pub id: Option<String>,

    /// Field name -> stored value; `null` means not configured
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Option<Value>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    /// Record a field that is present but unset
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.values.insert(name.into(), None);
        self
    }

    pub fn with_child(mut self, child: ModelNode) -> Self {
        self.children.push(child);
        self
    }

    /// Stored non-null value of a field
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// First direct child with the given id
    pub fn child(&self, id: &str) -> Option<&ModelNode> {
        self.children.iter().find(|c| c.id.as_deref() == Some(id))
    }

    /// Parse a tree from JSON and validate its identifiers
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let node: ModelNode = serde_json::from_str(json)
            .map_err(|e| invalid_argument(format!("Malformed model document: {}", e)))?;
        node.check()?;
        Ok(node)
    }

    pub fn check(&self) -> SyncResult<()> {
        self.validate()
            .map_err(|e| invalid_argument(format!("Malformed model node: {}", e)))
    }

    /// Stored values with no matching field on `node_type`
    pub fn unknown_fields<'a>(&'a self, node_type: &NodeTypeDescriptor) -> Vec<&'a str> {
        self.values
            .keys()
            .filter(|name| node_type.field(name).is_none())
            .map(String::as_str)
            .collect()
    }
}
