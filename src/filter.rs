//! Property filters
//!
//! Caller-supplied policy deciding which properties take part in discovery.
//! Filters are plain predicates wrapped so they can be cloned, combined and
//! shared between the schema-build phase and the runtime phase.

use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

type PropertyPredicate = dyn Fn(&PropertyDescriptor) -> bool + Send + Sync;
type TypePredicate = dyn Fn(&TypeDescriptor) -> bool + Send + Sync;

/// Predicate over a single property
#[derive(Clone)]
pub struct PropertyFilter {
    label: String,
    predicate: Arc<PropertyPredicate>,
}

impl PropertyFilter {
    pub fn new(
        label: impl Into<String>,
        predicate: impl Fn(&PropertyDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn accepts(&self, property: &PropertyDescriptor) -> bool {
        (self.predicate)(property)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn all() -> Self {
        Self::new("all", |_| true)
    }

    pub fn settable() -> Self {
        Self::new("settable", |p| p.settable)
    }

    /// Value-typed fields only (bool, int, float, text)
    pub fn scalar() -> Self {
        Self::new("scalar", |p| p.value_type.is_scalar())
    }

    /// Nested objects only
    pub fn composite() -> Self {
        Self::new("composite", |p| !p.value_type.is_scalar())
    }

    /// Nested objects whose type name matches `pattern`, e.g. editor settings shapes
    pub fn composite_matching(pattern: Regex) -> Self {
        let label = format!("composite~/{}/", pattern.as_str());
        Self::new(label, move |p| {
            p.value_type
                .composite_name()
                .is_some_and(|name| pattern.is_match(name))
        })
    }

    pub fn name_matching(pattern: Regex) -> Self {
        let label = format!("name~/{}/", pattern.as_str());
        Self::new(label, move |p| pattern.is_match(&p.name))
    }

    pub fn and(self, other: PropertyFilter) -> Self {
        let label = format!("({} and {})", self.label, other.label);
        Self::new(label, move |p| self.accepts(p) && other.accepts(p))
    }

    pub fn or(self, other: PropertyFilter) -> Self {
        let label = format!("({} or {})", self.label, other.label);
        Self::new(label, move |p| self.accepts(p) || other.accepts(p))
    }

    pub fn not(self) -> Self {
        let label = format!("not {}", self.label);
        Self::new(label, move |p| !self.accepts(p))
    }
}

impl fmt::Debug for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyFilter").field(&self.label).finish()
    }
}

/// Predicate deciding whether a whole type is eligible
#[derive(Clone)]
pub struct TypeFilter {
    label: String,
    predicate: Arc<TypePredicate>,
}

impl TypeFilter {
    pub fn new(
        label: impl Into<String>,
        predicate: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn accepts(&self, descriptor: &TypeDescriptor) -> bool {
        (self.predicate)(descriptor)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn all() -> Self {
        Self::new("all", |_| true)
    }

    /// Eligible when at least one property passes `filter`
    pub fn any_property(filter: PropertyFilter) -> Self {
        let label = format!("any {}", filter.label());
        Self::new(label, move |t| t.properties.iter().any(|p| filter.accepts(p)))
    }
}

impl fmt::Debug for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeFilter").field(&self.label).finish()
    }
}
