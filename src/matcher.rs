//! Property Matcher
//!
//! Pairs the properties of a live (target) type with the properties of a
//! reference (source) shape by name.

use crate::descriptor::{PropertyDescriptor, TypeDescriptor, TypeTable};
use crate::error::SyncResult;
use crate::filter::{PropertyFilter, TypeFilter};
use serde::Serialize;
use tracing::debug;

/// A source property and the target property sharing its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyPair<'a> {
    pub source: &'a PropertyDescriptor,
    pub target: &'a PropertyDescriptor,
}

/// Find properties present on both types, in target declaration order.
///
/// The source filter decides whether the source type takes part at all; when
/// it rejects the type the result is empty. On duplicate source names the first
/// declared property wins.
pub fn match_properties<'a>(
    source: &'a TypeDescriptor,
    target: &'a TypeDescriptor,
    source_filter: &TypeFilter,
    target_filter: &PropertyFilter,
) -> Vec<PropertyPair<'a>> {
    if !source_filter.accepts(source) {
        debug!(
            "Source type {} rejected by filter {}",
            source.name,
            source_filter.label()
        );
        return Vec::new();
    }

    target
        .properties
        .iter()
        .filter(|t| target_filter.accepts(t))
        .filter_map(|t| {
            source
                .property(&t.name)
                .map(|s| PropertyPair { source: s, target: t })
        })
        .collect()
}

/// Resolve both types through the table, then match
pub fn match_named<'a>(
    table: &'a TypeTable,
    source_name: &str,
    target_name: &str,
    source_filter: &TypeFilter,
    target_filter: &PropertyFilter,
) -> SyncResult<Vec<PropertyPair<'a>>> {
    let source = table.resolve(source_name)?;
    let target = table.resolve(target_name)?;
    source.check()?;
    target.check()?;

    let pairs = match_properties(source, target, source_filter, target_filter);
    debug!(
        "Matched {} of {} properties between {} and {}",
        pairs.len(),
        target.properties.len(),
        source_name,
        target_name
    );
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::value::ValueType;
    use pretty_assertions::assert_eq;

    fn names(pairs: &[PropertyPair<'_>]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| (p.source.name.clone(), p.target.name.clone()))
            .collect()
    }

    fn control() -> TypeDescriptor {
        TypeDescriptor::new("GridControl")
            .with_property(PropertyDescriptor::read_only("Behavior", ValueType::composite("BehaviorOptions")))
            .with_property(PropertyDescriptor::read_only("Appearance", ValueType::composite("AppearanceOptions")))
            .with_property(PropertyDescriptor::settable("Caption", ValueType::Text))
    }

    fn reference() -> TypeDescriptor {
        TypeDescriptor::new("IGridOptions")
            .with_property(PropertyDescriptor::settable("Behavior", ValueType::composite("IBehaviorOptions")))
    }

    #[test]
    fn test_drops_target_without_source_counterpart() {
        let (source, target) = (reference(), control());
        let pairs = match_properties(&source, &target, &TypeFilter::all(), &PropertyFilter::composite());

        assert_eq!(names(&pairs), vec![("Behavior".to_string(), "Behavior".to_string())]);
    }

    #[test]
    fn test_target_filter_is_sound() {
        let source = TypeDescriptor::new("IGridOptions")
            .with_property(PropertyDescriptor::settable("Behavior", ValueType::composite("B")))
            .with_property(PropertyDescriptor::settable("Caption", ValueType::Text));
        let target = control();
        let filter = PropertyFilter::composite();

        let pairs = match_properties(&source, &target, &TypeFilter::all(), &filter);
        assert!(pairs.iter().all(|p| filter.accepts(p.target) && p.source.name == p.target.name));
        assert!(!pairs.iter().any(|p| p.target.name == "Caption"));
    }

    #[test]
    fn test_source_filter_applies_to_whole_type() {
        let (source, target) = (reference(), control());
        let reject = TypeFilter::new("none", |_| false);

        assert!(match_properties(&source, &target, &reject, &PropertyFilter::all()).is_empty());
    }

    #[test]
    fn test_first_source_match_wins() {
        let source = TypeDescriptor::new("IDup")
            .with_property(PropertyDescriptor::settable("Behavior", ValueType::composite("First")))
            .with_property(PropertyDescriptor::settable("Behavior", ValueType::composite("Second")));
        let target = control();

        let pairs = match_properties(&source, &target, &TypeFilter::all(), &PropertyFilter::all());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source.value_type, ValueType::composite("First"));
    }

    #[test]
    fn test_pairs_follow_target_order() {
        let source = TypeDescriptor::new("IGridOptions")
            .with_property(PropertyDescriptor::settable("Appearance", ValueType::composite("A")))
            .with_property(PropertyDescriptor::settable("Behavior", ValueType::composite("B")));
        let target = control();

        let pairs = match_properties(&source, &target, &TypeFilter::all(), &PropertyFilter::all());
        assert_eq!(
            names(&pairs),
            vec![
                ("Behavior".to_string(), "Behavior".to_string()),
                ("Appearance".to_string(), "Appearance".to_string()),
            ]
        );
    }

    #[test]
    fn test_match_named_unknown_type() {
        let mut table = TypeTable::new();
        table.insert(control()).unwrap();

        let result = match_named(&table, "IMissing", "GridControl", &TypeFilter::all(), &PropertyFilter::all());
        assert!(matches!(result, Err(SyncError::InvalidArgument(_))));
    }
}
