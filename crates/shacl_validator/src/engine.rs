//! Shape evaluation driver.
//!
//! This module provides the `ShapeValidator` that runs every constraint of a
//! shape against focus nodes or already-resolved value nodes, follows
//! `sh:property` links, and merges the per-constraint reports. The free
//! functions are the re-entry points the logical and shape-based constraints
//! use for nested evaluation.

use shacl_core::{
    EvaluationContext, EvaluationScope, Graph, IdGenerator, Resource, Shape, ShapeKind,
    ShapesGraph, Term, UuidGenerator, ValidationOptions, ValidationReport,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Drives shape evaluation.
///
/// # Example
///
/// ```rust
/// use shacl_core::{Graph, Literal, PropertyPath, Resource, Shape, ShapesGraph, Term};
/// use shacl_validator::{MaxLengthConstraint, ShapeValidator};
///
/// let shape = Shape::property(
///     Resource::new("http://example.org/NameShape"),
///     PropertyPath::predicate("http://example.org/name"),
/// )
/// .constraint(MaxLengthConstraint::new(3))
/// .build();
///
/// let mut data = Graph::new();
/// let alice = Resource::new("http://example.org/alice");
/// data.add(&alice, "http://example.org/name", Literal::plain("Alice"));
///
/// let validator = ShapeValidator::new();
/// let report = validator.validate_focus_node(&ShapesGraph::new(), &data, &shape, &alice.into());
///
/// if report.conforms() {
///     println!("Validation passed!");
/// } else {
///     for result in report.results() {
///         println!("{} violates {}", result.value, result.source_constraint_component);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShapeValidator {
    options: ValidationOptions,
    ids: Arc<dyn IdGenerator>,
}

impl ShapeValidator {
    /// Creates a validator with default options and random identities.
    pub fn new() -> Self {
        Self {
            options: ValidationOptions::default(),
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Sets the validation options.
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the generator used for report and result identities.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Creates a top-level evaluation context over the given graphs.
    pub fn context<'a>(
        &'a self,
        shapes: &'a ShapesGraph,
        data: &'a Graph,
    ) -> EvaluationContext<'a> {
        EvaluationContext::new(shapes, data, self.ids.as_ref(), &self.options)
    }

    /// Validates already-resolved value nodes of one focus node.
    ///
    /// # Arguments
    ///
    /// * `shapes` - Shapes that nested constraints and `sh:property` links refer to
    /// * `data` - The data graph
    /// * `shape` - The shape to evaluate
    /// * `focus_node` - The node being validated
    /// * `value_nodes` - Value nodes produced by pattern matching; duplicates are dropped
    pub fn validate_value_nodes(
        &self,
        shapes: &ShapesGraph,
        data: &Graph,
        shape: &Shape,
        focus_node: &Term,
        value_nodes: &[Term],
    ) -> ValidationReport {
        let ctx = self.context(shapes, data);
        evaluate_value_nodes(&ctx, shape, focus_node, value_nodes)
    }

    /// Validates one focus node, resolving its value nodes from the shape's path.
    pub fn validate_focus_node(
        &self,
        shapes: &ShapesGraph,
        data: &Graph,
        shape: &Shape,
        focus_node: &Term,
    ) -> ValidationReport {
        let ctx = self.context(shapes, data);
        evaluate_shape(&ctx, shape, focus_node)
    }

    /// Validates several focus nodes and merges the reports in order.
    pub fn validate_focus_nodes(
        &self,
        shapes: &ShapesGraph,
        data: &Graph,
        shape: &Shape,
        focus_nodes: &[Term],
    ) -> ValidationReport {
        let ctx = self.context(shapes, data);
        let mut report = ctx.report();
        for focus_node in focus_nodes {
            report.merge(evaluate_shape(&ctx, shape, focus_node));
        }
        report
    }
}

impl Default for ShapeValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Value nodes of `focus_node` for `shape`: the focus node itself for node
/// shapes, the nodes reached through the path for property shapes.
pub fn value_nodes(data: &Graph, shape: &Shape, focus_node: &Term) -> Vec<Term> {
    match shape.kind() {
        ShapeKind::Node => vec![focus_node.clone()],
        ShapeKind::Property(path) => path.evaluate(data, focus_node),
    }
}

/// Evaluates `shape` on one focus node.
pub fn evaluate_shape(
    ctx: &EvaluationContext<'_>,
    shape: &Shape,
    focus_node: &Term,
) -> ValidationReport {
    let values = value_nodes(ctx.data_graph(), shape, focus_node);
    evaluate_value_nodes(ctx, shape, focus_node, &values)
}

/// Evaluates `shape` on one focus node with the given value nodes.
///
/// Constraints run in shape order; value-scoped constraints run once per
/// value node, focus-scoped ones once. Property shapes linked with
/// `sh:property` are then evaluated with each value node as focus, one level
/// deeper.
pub fn evaluate_value_nodes(
    ctx: &EvaluationContext<'_>,
    shape: &Shape,
    focus_node: &Term,
    value_nodes: &[Term],
) -> ValidationReport {
    let mut report = ctx.report();

    if shape.is_deactivated() && !ctx.options().include_deactivated {
        trace!(shape = %shape.id(), "Skipping deactivated shape");
        return report;
    }

    let values = dedup(value_nodes);
    debug!(
        shape = %shape.id(),
        focus = %focus_node,
        values = values.len(),
        depth = ctx.depth(),
        "Evaluating shape"
    );

    for constraint in shape.constraints() {
        trace!(component = %constraint.component(), "Evaluating constraint");
        match constraint.scope() {
            EvaluationScope::ValueNode => {
                for value in &values {
                    report.merge(constraint.evaluate(ctx, shape, focus_node, value, &values));
                }
            }
            EvaluationScope::FocusNode => {
                report.merge(constraint.evaluate(ctx, shape, focus_node, focus_node, &values));
            }
        }
    }

    if !shape.properties().is_empty() {
        match ctx.nested() {
            Some(nested) => {
                for property_id in shape.properties() {
                    let Some(property) = lookup(ctx, property_id) else {
                        continue;
                    };
                    for value in &values {
                        report.merge(evaluate_shape(&nested, property, value));
                    }
                }
            }
            None => warn!(
                shape = %shape.id(),
                max_depth = ctx.options().max_depth,
                "Maximum nesting depth reached, skipping property shapes"
            ),
        }
    }

    debug!(shape = %shape.id(), results = report.len(), "Shape evaluated");
    report
}

/// Outcome of checking a node against a referenced shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conformance {
    /// The node conforms
    Conforms,
    /// The node does not conform
    Violates,
    /// The shape is unknown or the nesting depth is exhausted
    Undetermined,
}

impl Conformance {
    /// Returns true only for a decided conformance.
    pub fn conforms(self) -> bool {
        self == Conformance::Conforms
    }

    /// Returns true only for a decided non-conformance.
    pub fn violates(self) -> bool {
        self == Conformance::Violates
    }
}

/// Checks `node` against the shape identified by `shape_id`.
///
/// Used by the logical and shape-based constraints; the nested report is
/// discarded. Unknown shapes and exhausted nesting depth are
/// [`Conformance::Undetermined`], and callers never report a violation on
/// an undetermined outcome.
pub fn conformance(ctx: &EvaluationContext<'_>, shape_id: &Resource, node: &Term) -> Conformance {
    let Some(shape) = lookup(ctx, shape_id) else {
        return Conformance::Undetermined;
    };
    let Some(nested) = ctx.nested() else {
        warn!(
            shape = %shape_id,
            node = %node,
            max_depth = ctx.options().max_depth,
            "Maximum nesting depth reached, conformance undetermined"
        );
        return Conformance::Undetermined;
    };
    if evaluate_shape(&nested, shape, node).conforms() {
        Conformance::Conforms
    } else {
        Conformance::Violates
    }
}

fn lookup<'a>(ctx: &EvaluationContext<'a>, shape_id: &Resource) -> Option<&'a Shape> {
    let shape = ctx.shapes_graph().get(shape_id);
    if shape.is_none() {
        warn!(shape = %shape_id, "Referenced shape not found in shapes graph");
    }
    shape
}

fn dedup(values: &[Term]) -> Vec<Term> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}
