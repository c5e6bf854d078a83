//! Value Synchronizer
//!
//! Copies configured values from the model tree into the nested option groups
//! of a live control. The walk is two levels deep: node -> field on the model
//! side, property -> nested property on the live side.

use crate::control::{Accessor, Control};
use crate::descriptor::FieldDescriptor;
use crate::error::SyncError;
use crate::model::ModelNode;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Binding of one node identifier to the live property it configures
pub struct PropertyBinding<C> {
    pub identifier: String,
    pub accessor: Accessor<C>,
    pub fields: Vec<FieldDescriptor>,
}

impl<C> Clone for PropertyBinding<C> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            accessor: self.accessor,
            fields: self.fields.clone(),
        }
    }
}

impl<C> fmt::Debug for PropertyBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("identifier", &self.identifier)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Identifier -> setter table for one control type, built during the schema phase
pub struct SyncPlan<C> {
    option_group: String,
    bindings: Vec<PropertyBinding<C>>,
}

impl<C: Control> SyncPlan<C> {
    pub fn new() -> Self {
        Self {
            option_group: C::option_group().to_string(),
            bindings: Vec::new(),
        }
    }
}

impl<C: Control> Default for SyncPlan<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SyncPlan<C> {
    pub fn bind(&mut self, binding: PropertyBinding<C>) {
        self.bindings.push(binding);
    }

    pub fn option_group(&self) -> &str {
        &self.option_group
    }

    pub fn bindings(&self) -> &[PropertyBinding<C>] {
        &self.bindings
    }

    pub fn binding(&self, identifier: &str) -> Option<&PropertyBinding<C>> {
        self.bindings.iter().find(|b| b.identifier == identifier)
    }
}

impl<C> fmt::Debug for SyncPlan<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncPlan")
            .field("option_group", &self.option_group)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// What one synchronization pass did
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub anchor_found: bool,
    /// Fields written into the live object
    pub applied: usize,
    /// Fields absent or null in the model
    pub skipped_unset: usize,
    /// Properties whose nested object was absent
    pub skipped_missing_object: usize,
    #[serde(skip)]
    pub errors: Vec<SyncError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Locate the anchor node: the direct child of `root` named after the option group
pub fn find_anchor<'a>(root: &'a ModelNode, option_group: &str) -> Option<&'a ModelNode> {
    root.child(option_group)
}

/// Apply the model values under `root` to `live`.
///
/// Absent or null fields leave the live value untouched. A value that cannot
/// be coerced is recorded in the report and the pass continues; the caller
/// decides how to surface it.
pub fn synchronize<C>(root: &ModelNode, live: &mut C, plan: &SyncPlan<C>) -> SyncReport {
    let mut report = SyncReport::default();

    let Some(anchor) = find_anchor(root, plan.option_group()) else {
        debug!("No options node {} in model, nothing to synchronize", plan.option_group());
        return report;
    };
    report.anchor_found = true;

    for binding in plan.bindings() {
        let Some(group) = (binding.accessor)(live) else {
            debug!("Property {} holds no object, skipped", binding.identifier);
            report.skipped_missing_object += 1;
            continue;
        };

        // Flat option groups keep their values on the anchor itself
        let source = anchor.child(&binding.identifier).unwrap_or(anchor);

        for field in &binding.fields {
            let Some(value) = source.value(&field.name) else {
                report.skipped_unset += 1;
                continue;
            };

            match group.set_field(&field.name, value) {
                Ok(true) => report.applied += 1,
                Ok(false) => {
                    debug!("{}.{} has no setter", binding.identifier, field.name);
                    report.skipped_unset += 1;
                }
                Err(e) => {
                    debug!("Skipping {}.{}: {}", binding.identifier, field.name, e);
                    report.errors.push(e);
                }
            }
        }
    }

    debug!(
        "Synchronized {}: {} applied, {} unset, {} errors",
        plan.option_group(),
        report.applied,
        report.skipped_unset,
        report.errors.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::OptionGroup;
    use crate::descriptor::{Describe, PropertyDescriptor, TypeDescriptor};
    use crate::value::ValueType;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Settings {
        show_header: bool,
        row_height: i32,
    }

    crate::option_group! {
        Settings {
            "ShowHeader" => show_header: bool,
            "RowHeight" => row_height: i32,
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Grid {
        settings: Option<Settings>,
    }

    impl Grid {
        fn with_defaults() -> Self {
            Self {
                settings: Some(Settings {
                    show_header: false,
                    row_height: 20,
                }),
            }
        }

        fn settings_group(&mut self) -> Option<&mut dyn OptionGroup> {
            self.settings.as_mut().map(|s| s as &mut dyn OptionGroup)
        }
    }

    impl Describe for Grid {
        fn type_name() -> &'static str {
            "Grid"
        }

        fn describe() -> TypeDescriptor {
            TypeDescriptor::new("Grid")
                .with_property(PropertyDescriptor::read_only("Settings", ValueType::composite("Settings")))
        }
    }

    impl Control for Grid {
        fn option_group() -> &'static str {
            "GridOptions"
        }

        fn accessors() -> Vec<(&'static str, Accessor<Self>)> {
            vec![("Settings", Self::settings_group as Accessor<Self>)]
        }
    }

    fn plan() -> SyncPlan<Grid> {
        let mut plan = SyncPlan::new();
        plan.bind(PropertyBinding {
            identifier: "Settings".to_string(),
            accessor: Grid::settings_group,
            fields: Settings::describe().properties.iter().map(FieldDescriptor::from).collect(),
        });
        plan
    }

    fn settings(grid: &Grid) -> Settings {
        grid.settings.clone().unwrap()
    }

    #[test]
    fn test_partial_update_keeps_defaults() {
        let root = ModelNode::new("ListView")
            .with_child(ModelNode::new("GridOptions").with_value("ShowHeader", true));
        let mut grid = Grid::with_defaults();

        let report = synchronize(&root, &mut grid, &plan());

        assert_eq!(
            settings(&grid),
            Settings {
                show_header: true,
                row_height: 20,
            }
        );
        assert!(report.anchor_found);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped_unset, 1);
    }

    #[test]
    fn test_values_from_property_node() {
        let root = ModelNode::new("ListView").with_child(
            ModelNode::new("GridOptions")
                .with_value("RowHeight", 99)
                .with_child(ModelNode::new("Settings").with_value("RowHeight", 32)),
        );
        let mut grid = Grid::with_defaults();

        synchronize(&root, &mut grid, &plan());
        assert_eq!(settings(&grid).row_height, 32);
        assert!(!settings(&grid).show_header);
    }

    #[test]
    fn test_null_field_is_untouched() {
        let root = ModelNode::new("ListView").with_child(
            ModelNode::new("GridOptions")
                .with_null("ShowHeader")
                .with_value("RowHeight", 28),
        );
        let mut grid = Grid::with_defaults();

        synchronize(&root, &mut grid, &plan());
        assert_eq!(
            settings(&grid),
            Settings {
                show_header: false,
                row_height: 28,
            }
        );
    }

    #[test]
    fn test_missing_anchor_is_noop() {
        let root = ModelNode::new("ListView").with_child(ModelNode::new("TreeOptions").with_value("ShowHeader", true));
        let mut grid = Grid::with_defaults();

        let report = synchronize(&root, &mut grid, &plan());
        assert!(!report.anchor_found);
        assert_eq!(grid, Grid::with_defaults());
    }

    #[test]
    fn test_missing_nested_object_is_skipped() {
        let root = ModelNode::new("ListView")
            .with_child(ModelNode::new("GridOptions").with_value("ShowHeader", true));
        let mut grid = Grid { settings: None };

        let report = synchronize(&root, &mut grid, &plan());
        assert_eq!(report.skipped_missing_object, 1);
        assert_eq!(grid.settings, None);
    }

    #[test]
    fn test_type_mismatch_does_not_stop_other_fields() {
        let root = ModelNode::new("ListView").with_child(
            ModelNode::new("GridOptions")
                .with_value("ShowHeader", "yes")
                .with_value("RowHeight", 40),
        );
        let mut grid = Grid::with_defaults();

        let report = synchronize(&root, &mut grid, &plan());

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code(), "TYPE_MISMATCH");
        assert_eq!(
            settings(&grid),
            Settings {
                show_header: false,
                row_height: 40,
            }
        );
    }

    #[test]
    fn test_synchronize_is_idempotent() {
        let root = ModelNode::new("ListView").with_child(
            ModelNode::new("GridOptions")
                .with_value("ShowHeader", true)
                .with_value("RowHeight", 24),
        );
        let plan = plan();

        let mut once = Grid::with_defaults();
        synchronize(&root, &mut once, &plan);

        let mut twice = Grid::with_defaults();
        synchronize(&root, &mut twice, &plan);
        synchronize(&root, &mut twice, &plan);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_model_is_not_mutated() {
        let root = ModelNode::new("ListView")
            .with_child(ModelNode::new("GridOptions").with_value("RowHeight", 30));
        let before = root.clone();

        synchronize(&root, &mut Grid::with_defaults(), &plan());
        assert_eq!(root, before);
    }
}
