//! Dynamic Node Type Builder
//!
//! Turns a matched property pair into a node type whose fields mirror the
//! settable nested properties of the live composite.

use crate::descriptor::{FieldDescriptor, NodeTypeDescriptor, TypeTable};
use crate::error::{invalid_argument, SyncResult};
use crate::filter::PropertyFilter;
use crate::matcher::PropertyPair;
use tracing::debug;

/// Build the node type for one matched pair.
///
/// The identifier is the source property name. A composite without eligible
/// nested properties yields a node type with no fields.
pub fn build(
    table: &TypeTable,
    owner: &str,
    pair: &PropertyPair<'_>,
    field_filter: &PropertyFilter,
) -> SyncResult<NodeTypeDescriptor> {
    if owner.is_empty() {
        return Err(invalid_argument("Owner node type must not be empty"));
    }

    let target_type = pair.target.value_type.composite_name().ok_or_else(|| {
        invalid_argument(format!(
            "Property {} is not a composite ({})",
            pair.target.name, pair.target.value_type
        ))
    })?;
    let composite = table.resolve(target_type)?;

    let fields: Vec<FieldDescriptor> = composite
        .settable_properties()
        .filter(|p| field_filter.accepts(p))
        .map(FieldDescriptor::from)
        .collect();

    debug!(
        "Built node type {} under {} with {} fields from {}",
        pair.source.name,
        owner,
        fields.len(),
        target_type
    );

    let mut node_type = NodeTypeDescriptor::new(pair.source.name.clone(), owner, fields);
    node_type.source_type = pair.source.value_type.composite_name().map(str::to_string);
    node_type.target_type = Some(target_type.to_string());
    Ok(node_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
    use crate::error::SyncError;
    use crate::registry::{Registration, SchemaRegistry};
    use crate::value::ValueType;
    use pretty_assertions::assert_eq;

    fn table() -> TypeTable {
        let mut table = TypeTable::new();
        table
            .insert(
                TypeDescriptor::new("GridOptionsView")
                    .with_property(PropertyDescriptor::settable("ShowHeader", ValueType::Bool))
                    .with_property(PropertyDescriptor::read_only("IsLoading", ValueType::Bool))
                    .with_property(PropertyDescriptor::settable("RowHeight", ValueType::Int))
                    .with_property(PropertyDescriptor::settable("Appearance", ValueType::composite("Style"))),
            )
            .unwrap();
        table.insert(TypeDescriptor::new("Sealed")).unwrap();
        table
    }

    fn pair<'a>(source: &'a PropertyDescriptor, target: &'a PropertyDescriptor) -> PropertyPair<'a> {
        PropertyPair { source, target }
    }

    #[test]
    fn test_fields_are_settable_and_filtered() {
        let table = table();
        let source = PropertyDescriptor::settable("OptionsView", ValueType::composite("IOptionsView"));
        let target = PropertyDescriptor::read_only("OptionsView", ValueType::composite("GridOptionsView"));

        let node = build(&table, "GridOptions", &pair(&source, &target), &PropertyFilter::scalar()).unwrap();

        assert_eq!(node.identifier, "OptionsView");
        assert_eq!(node.owner, "GridOptions");
        assert_eq!(
            node.fields,
            vec![
                FieldDescriptor { name: "ShowHeader".to_string(), value_type: ValueType::Bool },
                FieldDescriptor { name: "RowHeight".to_string(), value_type: ValueType::Int },
            ]
        );
        assert_eq!(node.source_type.as_deref(), Some("IOptionsView"));
        assert_eq!(node.target_type.as_deref(), Some("GridOptionsView"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let table = table();
        let source = PropertyDescriptor::settable("OptionsView", ValueType::composite("IOptionsView"));
        let target = PropertyDescriptor::read_only("OptionsView", ValueType::composite("GridOptionsView"));
        let p = pair(&source, &target);

        let first = build(&table, "GridOptions", &p, &PropertyFilter::all()).unwrap();
        let second = build(&table, "GridOptions", &p, &PropertyFilter::all()).unwrap();
        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn test_empty_composite_yields_empty_node() {
        let table = table();
        let source = PropertyDescriptor::settable("Sealed", ValueType::composite("ISealed"));
        let target = PropertyDescriptor::read_only("Sealed", ValueType::composite("Sealed"));

        let node = build(&table, "GridOptions", &pair(&source, &target), &PropertyFilter::all()).unwrap();
        assert!(node.fields.is_empty());

        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.register("GridOptions", node).unwrap(), Registration::Added);
    }

    #[test]
    fn test_scalar_target_is_invalid() {
        let table = table();
        let source = PropertyDescriptor::settable("Caption", ValueType::Text);
        let target = PropertyDescriptor::settable("Caption", ValueType::Text);

        let err = build(&table, "GridOptions", &pair(&source, &target), &PropertyFilter::all()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_composite_is_invalid() {
        let table = table();
        let source = PropertyDescriptor::settable("Printing", ValueType::composite("IPrinting"));
        let target = PropertyDescriptor::read_only("Printing", ValueType::composite("PrintOptions"));

        let err = build(&table, "GridOptions", &pair(&source, &target), &PropertyFilter::all()).unwrap_err();
        assert_eq!(err, SyncError::InvalidArgument("Unknown type PrintOptions".to_string()));
    }
}
