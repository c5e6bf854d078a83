//! Lifecycle Adapter
//!
//! Glue between the host application lifecycle and the engine. An
//! [`OptionsExtender`] is created per control type; the host calls
//! [`SchemaExtender::extend_model`] once while the application model is built
//! and [`OptionsExtender::on_control_created`] every time a control is
//! instantiated.

use crate::builder;
use crate::control::{Accessor, Control};
use crate::descriptor::{NodeTypeDescriptor, TypeTable};
use crate::error::{invalid_argument, SyncResult};
use crate::filter::{PropertyFilter, TypeFilter};
use crate::matcher;
use crate::model::ModelNode;
use crate::registry::{Registration, SchemaRegistry};
use crate::sync::{self, PropertyBinding, SyncPlan, SyncReport};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Schema-build hook, object safe so extenders of different control types can
/// be driven together
pub trait SchemaExtender {
    /// Name used in logs and build summaries
    fn name(&self) -> &str;

    /// Discover, build and register node types. Returns the number of node
    /// types newly added to the registry. The resulting plan stays pending
    /// until [`SchemaExtender::commit`].
    fn extend_model(&mut self, table: &TypeTable, registry: &mut SchemaRegistry) -> SyncResult<usize>;

    /// Activate the pending plan once the registry is frozen
    fn commit(&mut self);

    /// Drop both pending and active plans after an aborted build
    fn discard(&mut self);
}

/// Options extender for one control type
pub struct OptionsExtender<C: Control> {
    name: String,
    reference_type: String,
    base_node: String,
    reference_filter: TypeFilter,
    control_filter: PropertyFilter,
    field_filter: PropertyFilter,
    pending: Option<SyncPlan<C>>,
    plan: Option<SyncPlan<C>>,
}

impl<C: Control> OptionsExtender<C> {
    /// `reference_type` names the shape listing the option groups that may be
    /// configured; `base_node` is the node type the option group extends.
    pub fn new(
        reference_type: impl Into<String>,
        base_node: impl Into<String>,
        control_filter: PropertyFilter,
        field_filter: PropertyFilter,
    ) -> Self {
        let reference_type = reference_type.into();
        Self {
            name: format!("{}/{}", C::type_name(), reference_type),
            reference_type,
            base_node: base_node.into(),
            reference_filter: TypeFilter::all(),
            control_filter,
            field_filter,
            pending: None,
            plan: None,
        }
    }

    pub fn with_reference_filter(mut self, filter: TypeFilter) -> Self {
        self.reference_filter = filter;
        self
    }

    /// Active plan; `None` until a schema build containing this extender completes
    pub fn plan(&self) -> Option<&SyncPlan<C>> {
        self.plan.as_ref()
    }

    /// Push the configured model values into a freshly created control
    pub fn on_control_created(&self, root: &ModelNode, control: &mut C) -> SyncReport {
        let Some(plan) = &self.plan else {
            warn!(
                "Control {} created before its schema was built, skipping synchronization",
                C::type_name()
            );
            return SyncReport::default();
        };

        let report = sync::synchronize(root, control, plan);
        for e in &report.errors {
            warn!(code = e.code(), "{}: {}", C::type_name(), e);
        }
        if report.anchor_found {
            info!(
                "Applied {} option values to {} ({} errors)",
                report.applied,
                C::type_name(),
                report.errors.len()
            );
        }
        report
    }

    /// Node types and bindings for every matched property, without touching the registry
    fn discover(&self, table: &TypeTable) -> SyncResult<(Vec<NodeTypeDescriptor>, SyncPlan<C>)> {
        let pairs = matcher::match_named(
            table,
            &self.reference_type,
            C::type_name(),
            &self.reference_filter,
            &self.control_filter,
        )?;

        let accessors: HashMap<&str, Accessor<C>> = C::accessors().into_iter().collect();
        let mut node_types = Vec::with_capacity(pairs.len());
        let mut plan = SyncPlan::new();

        for pair in &pairs {
            let node_type = builder::build(table, C::option_group(), pair, &self.field_filter)?;
            let accessor = accessors.get(pair.target.name.as_str()).copied().ok_or_else(|| {
                invalid_argument(format!(
                    "{} describes property {} but provides no accessor for it",
                    C::type_name(),
                    pair.target.name
                ))
            })?;

            plan.bind(PropertyBinding {
                identifier: node_type.identifier.clone(),
                accessor,
                fields: node_type.fields.clone(),
            });
            node_types.push(node_type);
        }

        Ok((node_types, plan))
    }
}

impl<C: Control> SchemaExtender for OptionsExtender<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn extend_model(&mut self, table: &TypeTable, registry: &mut SchemaRegistry) -> SyncResult<usize> {
        // Resolve everything first so a bad descriptor leaves the registry untouched
        let (node_types, plan) = self.discover(table)?;
        let mut added = 0;

        let group = NodeTypeDescriptor::new(C::option_group(), &self.base_node, Vec::new());
        if registry.register(&self.base_node, group)? == Registration::Added {
            added += 1;
        }

        for node_type in node_types {
            if registry.register(C::option_group(), node_type)? == Registration::Added {
                added += 1;
            }
        }

        debug!(
            "{} bound {} option groups under {}",
            C::type_name(),
            plan.bindings().len(),
            C::option_group()
        );
        self.pending = Some(plan);
        Ok(added)
    }

    fn commit(&mut self) {
        if let Some(plan) = self.pending.take() {
            self.plan = Some(plan);
        }
    }

    fn discard(&mut self) {
        if self.pending.take().is_some() || self.plan.take().is_some() {
            debug!("Discarded sync plan of {}", self.name);
        }
    }
}

/// Result of one schema-build phase
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub succeeded: Vec<String>,
    /// Extender name -> reason it was skipped
    pub failed: Vec<(String, String)>,
    pub node_types_added: usize,
    pub checksum: String,
}

/// Run every extender against the registry, freeze it, then activate the plans.
///
/// An invalid argument only skips the extender that raised it. A schema
/// conflict or a write to a frozen registry aborts the phase and discards the
/// plans of every extender, so no control is synchronized from that schema.
pub fn run_schema_build(
    table: &TypeTable,
    registry: &mut SchemaRegistry,
    extenders: &mut [&mut dyn SchemaExtender],
) -> SyncResult<BuildSummary> {
    info!("Building option schema for {} control types", extenders.len());
    let mut summary = BuildSummary::default();
    let mut aborted = None;

    for extender in extenders.iter_mut() {
        match extender.extend_model(table, registry) {
            Ok(added) => {
                summary.node_types_added += added;
                summary.succeeded.push(extender.name().to_string());
            }
            Err(e) if e.is_recoverable() => {
                error!(code = e.code(), "Skipping {}: {}", extender.name(), e);
                summary.failed.push((extender.name().to_string(), e.to_string()));
            }
            Err(e) => {
                error!(code = e.code(), "Schema build aborted by {}: {}", extender.name(), e);
                aborted = Some(e);
                break;
            }
        }
    }

    if let Some(e) = aborted {
        for extender in extenders.iter_mut() {
            extender.discard();
        }
        return Err(e);
    }

    registry.freeze();
    for extender in extenders.iter_mut() {
        extender.commit();
    }
    summary.checksum = registry.checksum();
    info!(
        "Schema build complete: {} ok, {} failed, {} node types added",
        summary.succeeded.len(),
        summary.failed.len(),
        summary.node_types_added
    );
    Ok(summary)
}
