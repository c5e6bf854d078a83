//! Model Extension Registrar
//!
//! The schema registry collects generated node types per owner during the
//! schema-build phase. It is written through `&mut self` only, so a single
//! writer is enforced by the borrow checker; once frozen it is shared read-only.

use crate::descriptor::NodeTypeDescriptor;
use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// Same owner, identifier and fields were already present
    Unchanged,
}

/// Inspectable summary of the registry (lightweight, used for listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub checksum: String,
    pub frozen: bool,
    pub owner_count: usize,
    pub node_type_count: usize,
    pub field_count: usize,
    pub node_types: Vec<NodeTypeDescriptor>,
}

/// Append-only store of node types, keyed by owner
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Owner -> child node types in registration order
    children: HashMap<String, Vec<NodeTypeDescriptor>>,
    frozen: bool,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node_type` as an allowed child of `owner`.
    ///
    /// Repeating an identical registration is a no-op, even once frozen; the
    /// same identifier with a different field set is a conflict.
    pub fn register(&mut self, owner: &str, node_type: NodeTypeDescriptor) -> SyncResult<Registration> {
        let mut node_type = node_type;
        node_type.owner = owner.to_string();

        if let Some(existing) = self.node_type(owner, &node_type.identifier) {
            if existing.same_shape(&node_type) {
                debug!("Node type {} under {} already registered", node_type.identifier, owner);
                return Ok(Registration::Unchanged);
            }
            return Err(SyncError::SchemaConflict {
                owner: owner.to_string(),
                identifier: node_type.identifier,
            });
        }

        if self.frozen {
            return Err(SyncError::RegistryFrozen {
                owner: owner.to_string(),
                identifier: node_type.identifier,
            });
        }

        let siblings = self.children.entry(owner.to_string()).or_default();
        info!(
            "Registered node type {} under {} ({} fields)",
            node_type.identifier,
            owner,
            node_type.fields.len()
        );
        siblings.push(node_type);
        Ok(Registration::Added)
    }

    /// End the build phase; further registrations fail
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            info!(
                "Schema registry frozen: {} node types under {} owners",
                self.len(),
                self.children.len()
            );
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn node_type(&self, owner: &str, identifier: &str) -> Option<&NodeTypeDescriptor> {
        self.children
            .get(owner)?
            .iter()
            .find(|n| n.identifier == identifier)
    }

    /// Child node types of `owner` in registration order
    pub fn children(&self, owner: &str) -> &[NodeTypeDescriptor] {
        self.children.get(owner).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.children.keys().map(String::as_str).collect();
        owners.sort();
        owners
    }

    pub fn len(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute checksum from registry content, independent of registration order
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();

        let mut entries: Vec<String> = self
            .children
            .iter()
            .flat_map(|(owner, nodes)| {
                nodes.iter().map(move |n| {
                    let fields: Vec<String> = n
                        .fields
                        .iter()
                        .map(|f| format!("{}:{}", f.name, f.value_type))
                        .collect();
                    format!("{}/{}[{}]", owner, n.identifier, fields.join(","))
                })
            })
            .collect();
        entries.sort();

        for entry in &entries {
            hasher.update(entry.as_bytes());
            hasher.update(b"\n");
        }

        format!("{:x}", hasher.finalize())
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut node_types: Vec<NodeTypeDescriptor> = self.children.values().flatten().cloned().collect();
        node_types.sort_by(|a, b| (&a.owner, &a.identifier).cmp(&(&b.owner, &b.identifier)));

        RegistrySnapshot {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            checksum: self.checksum(),
            frozen: self.frozen,
            owner_count: self.children.len(),
            node_type_count: node_types.len(),
            field_count: node_types.iter().map(|n| n.fields.len()).sum(),
            node_types,
        }
    }
}
