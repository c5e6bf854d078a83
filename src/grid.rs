//! Grid control
//!
//! A list-view grid with three option groups, described for the engine. The
//! binary synchronizes it from a model file; the adapter tests drive it
//! through a full schema build.

use crate::adapter::OptionsExtender;
use crate::control::{Accessor, Control, OptionGroup};
use crate::descriptor::{Describe, PropertyDescriptor, TypeDescriptor, TypeTable};
use crate::error::SyncResult;
use crate::filter::PropertyFilter;
use crate::value::ValueType;
use regex::Regex;
use serde::Serialize;

/// Reference shape listing the grid option groups a model may configure
pub const GRID_OPTIONS_REFERENCE: &str = "IModelGridOptions";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptionsView {
    pub show_header: bool,
    pub show_footer: bool,
    pub row_height: i32,
    pub group_panel_text: String,
}

impl Default for GridOptionsView {
    fn default() -> Self {
        Self {
            show_header: false,
            show_footer: false,
            row_height: 20,
            group_panel_text: "Drag a column header here to group by that column".to_string(),
        }
    }
}

crate::option_group! {
    GridOptionsView {
        "ShowHeader" => show_header: bool,
        "ShowFooter" => show_footer: bool,
        "RowHeight" => row_height: i32,
        "GroupPanelText" => group_panel_text: String,
    }
    read_only {
        "IsPrinting": bool,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptionsBehavior {
    pub editable: bool,
    pub auto_select_all_in_editor: bool,
    pub scroll_speed: f64,
}

impl Default for GridOptionsBehavior {
    fn default() -> Self {
        Self {
            editable: true,
            auto_select_all_in_editor: true,
            scroll_speed: 1.0,
        }
    }
}

crate::option_group! {
    GridOptionsBehavior {
        "Editable" => editable: bool,
        "AutoSelectAllInEditor" => auto_select_all_in_editor: bool,
        "ScrollSpeed" => scroll_speed: f64,
    }
}

/// Present on the control but not part of the reference shape
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptionsPrint {
    pub print_header: bool,
}

crate::option_group! {
    GridOptionsPrint {
        "PrintHeader" => print_header: bool,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridControl {
    pub caption: String,
    pub options_view: Option<GridOptionsView>,
    pub options_behavior: Option<GridOptionsBehavior>,
    pub options_print: Option<GridOptionsPrint>,
}

impl Default for GridControl {
    fn default() -> Self {
        Self {
            caption: String::new(),
            options_view: Some(GridOptionsView::default()),
            options_behavior: Some(GridOptionsBehavior::default()),
            options_print: Some(GridOptionsPrint::default()),
        }
    }
}

impl GridControl {
    fn options_view_group(&mut self) -> Option<&mut dyn OptionGroup> {
        self.options_view.as_mut().map(|o| o as &mut dyn OptionGroup)
    }

    fn options_behavior_group(&mut self) -> Option<&mut dyn OptionGroup> {
        self.options_behavior.as_mut().map(|o| o as &mut dyn OptionGroup)
    }

    fn options_print_group(&mut self) -> Option<&mut dyn OptionGroup> {
        self.options_print.as_mut().map(|o| o as &mut dyn OptionGroup)
    }
}

impl Describe for GridControl {
    fn type_name() -> &'static str {
        "GridControl"
    }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_name())
            .with_property(PropertyDescriptor::settable("Caption", ValueType::Text))
            .with_property(PropertyDescriptor::read_only(
                "OptionsView",
                ValueType::composite(GridOptionsView::type_name()),
            ))
            .with_property(PropertyDescriptor::read_only(
                "OptionsBehavior",
                ValueType::composite(GridOptionsBehavior::type_name()),
            ))
            .with_property(PropertyDescriptor::read_only(
                "OptionsPrint",
                ValueType::composite(GridOptionsPrint::type_name()),
            ))
    }
}

impl Control for GridControl {
    fn option_group() -> &'static str {
        "GridOptions"
    }

    fn accessors() -> Vec<(&'static str, Accessor<Self>)> {
        vec![
            ("OptionsView", Self::options_view_group as Accessor<Self>),
            ("OptionsBehavior", Self::options_behavior_group as Accessor<Self>),
            ("OptionsPrint", Self::options_print_group as Accessor<Self>),
        ]
    }
}

/// The reference shape: which option groups the model exposes
pub fn grid_options_reference() -> TypeDescriptor {
    TypeDescriptor::new(GRID_OPTIONS_REFERENCE)
        .with_property(PropertyDescriptor::settable(
            "OptionsView",
            ValueType::composite("IModelGridOptionsView"),
        ))
        .with_property(PropertyDescriptor::settable(
            "OptionsBehavior",
            ValueType::composite("IModelGridOptionsBehavior"),
        ))
}

/// Type table with the grid control, its option groups and the reference shape
pub fn grid_type_table() -> SyncResult<TypeTable> {
    let mut table = TypeTable::new();
    table.register::<GridOptionsView>()?;
    table.register::<GridOptionsBehavior>()?;
    table.register::<GridOptionsPrint>()?;
    table.register::<GridControl>()?;
    table.insert(grid_options_reference())?;
    Ok(table)
}

/// Extender accepting composite properties whose type name matches `editor_pattern`
/// and synchronizing their settable scalar fields
pub fn grid_extender(base_node: &str, editor_pattern: Regex) -> OptionsExtender<GridControl> {
    OptionsExtender::new(
        GRID_OPTIONS_REFERENCE,
        base_node,
        PropertyFilter::composite_matching(editor_pattern),
        PropertyFilter::settable().and(PropertyFilter::scalar()),
    )
}
