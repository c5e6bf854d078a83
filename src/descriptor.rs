//! Type metadata
//!
//! Describes the shape of participating types without runtime reflection.
//! Every type taking part in discovery implements [`Describe`] and is entered
//! once into a [`TypeTable`] at startup; the matcher and the builder only ever
//! read from that table.

use crate::error::{invalid_argument, SyncResult};
use crate::value::ValueType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use validator::Validate;

/// Property and node identifiers: a letter or underscore, then letters, digits, underscores
pub static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// One property of a described type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[validate(length(min = 1, max = 128, message = "Property name must be between 1 and 128 characters"))]
    #[validate(regex(path = *IDENTIFIER, message = "Property name is not a valid identifier"))]
    pub name: String,
    pub value_type: ValueType,
    pub settable: bool,
}

impl PropertyDescriptor {
    /// A read/write property
    pub fn settable(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            settable: true,
        }
    }

    /// A read-only property
    pub fn read_only(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            settable: false,
        }
    }
}

/// Ordered property list of a named type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    #[validate(length(min = 1, max = 128, message = "Type name must be between 1 and 128 characters"))]
    pub name: String,
    #[validate(nested)]
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// First property with the given name, in declaration order
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn settable_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.settable)
    }

    /// Reject descriptors the matcher and builder cannot work with
    pub fn check(&self) -> SyncResult<()> {
        self.validate()
            .map_err(|e| invalid_argument(format!("Malformed type descriptor {:?}: {}", self.name, e)))
    }
}

/// One field of a generated node type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub value_type: ValueType,
}

impl From<&PropertyDescriptor> for FieldDescriptor {
    fn from(property: &PropertyDescriptor) -> Self {
        Self {
            name: property.name.clone(),
            value_type: property.value_type.clone(),
        }
    }
}

/// A schema node type generated for one discovered option group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDescriptor {
    /// Join key with the live property, equal to the source property name
    pub identifier: String,
    /// Base node type this node extends
    pub owner: String,
    pub fields: Vec<FieldDescriptor>,
    /// Composite type on the reference side, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Composite type on the live side, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

impl NodeTypeDescriptor {
    pub fn new(identifier: impl Into<String>, owner: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            identifier: identifier.into(),
            owner: owner.into(),
            fields,
            source_type: None,
            target_type: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Same registration key and same field set, ignoring informational origin
    pub fn same_shape(&self, other: &NodeTypeDescriptor) -> bool {
        self.identifier == other.identifier && self.owner == other.owner && self.fields == other.fields
    }
}

/// Implemented by every type that takes part in discovery
pub trait Describe {
    fn type_name() -> &'static str;

    fn describe() -> TypeDescriptor;
}

/// Statically registered type metadata: type name -> descriptor
#[derive(Debug, Default)]
pub struct TypeTable {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a described type into the table
    pub fn register<T: Describe>(&mut self) -> SyncResult<()> {
        self.insert(T::describe())
    }

    /// Enter a descriptor that has no Rust type behind it, e.g. a reference shape
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> SyncResult<()> {
        descriptor.check()?;

        if let Some(existing) = self.types.get(&descriptor.name) {
            if *existing == descriptor {
                return Ok(());
            }
            return Err(invalid_argument(format!(
                "Type {} is already described with a different shape",
                descriptor.name
            )));
        }

        debug!(
            "Described type {} ({} properties)",
            descriptor.name,
            descriptor.properties.len()
        );
        self.types.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Lookup that treats an unknown name as an invalid argument
    pub fn resolve(&self, name: &str) -> SyncResult<&TypeDescriptor> {
        self.get(name)
            .ok_or_else(|| invalid_argument(format!("Unknown type {}", name)))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
