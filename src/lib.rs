//! modelsync - option-group schema discovery and value synchronization
//!
//! Discovers the option groups a control exposes, projects them into node
//! types of an application model, and later copies configured model values
//! back into live controls.
//!
//! Two phases:
//! - Schema build (once per application model): match, build, register
//! - Runtime (once per control instance): locate the options node, synchronize

pub mod adapter;
pub mod builder;
pub mod config;
pub mod control;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod grid;
pub mod matcher;
pub mod model;
pub mod registry;
pub mod sync;
pub mod value;

pub use adapter::{run_schema_build, BuildSummary, OptionsExtender, SchemaExtender};
pub use control::{Accessor, Control, OptionGroup};
pub use descriptor::{Describe, FieldDescriptor, NodeTypeDescriptor, PropertyDescriptor, TypeDescriptor, TypeTable};
pub use error::{SyncError, SyncResult};
pub use filter::{PropertyFilter, TypeFilter};
pub use model::ModelNode;
pub use registry::{Registration, RegistrySnapshot, SchemaRegistry};
pub use sync::{synchronize, SyncPlan, SyncReport};
pub use value::{Scalar, Value, ValueType};
