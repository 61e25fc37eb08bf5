//! The constraint contract and the context constraints evaluate in.
//!
//! Every rule kind implements [`Constraint`]. Implementations hold immutable
//! configuration fixed at construction, so one instance can be shared across
//! shapes and evaluated from several threads at once.

use crate::graph::Graph;
use crate::ids::IdGenerator;
use crate::report::{ValidationReport, ValidationResult};
use crate::shape::{Shape, ShapesGraph};
use crate::term::{Resource, Term};
use crate::vocabulary::ConstraintComponent;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How a constraint wants to be called by the shape driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationScope {
    /// Called once per value node
    ValueNode,
    /// Called once per focus node; `value_node` is the focus node and
    /// `all_value_nodes` carries the whole value node set
    FocusNode,
}

/// A single validation rule.
///
/// # Example
///
/// ```rust
/// use shacl_core::{
///     Constraint, ConstraintComponent, EvaluationContext, Graph, Resource, Shape, Term,
///     ValidationReport,
/// };
///
/// /// Rejects every literal.
/// #[derive(Debug)]
/// struct NoLiterals {
///     id: Resource,
/// }
///
/// impl Constraint for NoLiterals {
///     fn id(&self) -> &Resource {
///         &self.id
///     }
///
///     fn component(&self) -> ConstraintComponent {
///         ConstraintComponent::Custom(Resource::new("http://example.org/NoLiterals"))
///     }
///
///     fn evaluate(
///         &self,
///         ctx: &EvaluationContext<'_>,
///         shape: &Shape,
///         focus_node: &Term,
///         value_node: &Term,
///         _all_value_nodes: &[Term],
///     ) -> ValidationReport {
///         let mut report = ctx.report();
///         if value_node.is_literal() {
///             report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
///         }
///         report
///     }
///
///     fn to_graph(&self, _shape: Option<&Shape>) -> Graph {
///         Graph::new()
///     }
/// }
/// ```
pub trait Constraint: Send + Sync + Debug {
    /// Identity of this constraint; blank when the constraint is anonymous.
    fn id(&self) -> &Resource;

    /// The constraint component reported for violations.
    fn component(&self) -> ConstraintComponent;

    /// Whether the driver calls this constraint per value node or per focus node.
    fn scope(&self) -> EvaluationScope {
        EvaluationScope::ValueNode
    }

    /// Evaluates the constraint for one value node.
    ///
    /// Returns a report holding exactly one result per violation; an empty
    /// report means the constraint is satisfied. Never fails.
    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        all_value_nodes: &[Term],
    ) -> ValidationReport;

    /// Serializes the configuration as triples whose subject is the shape.
    ///
    /// Returns an empty graph when there is no shape to anchor on.
    fn to_graph(&self, shape: Option<&Shape>) -> Graph;
}

/// Options controlling a validation run.
///
/// Deserializable so host applications can load it from their own
/// configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Maximum nesting of shape evaluation through `sh:node`, `sh:property`
    /// and logical constraints
    pub max_depth: usize,

    /// Whether deactivated shapes are evaluated anyway
    pub include_deactivated: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: 32,
            include_deactivated: false,
        }
    }
}

impl ValidationOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluates deactivated shapes too.
    pub fn with_include_deactivated(mut self, include: bool) -> Self {
        self.include_deactivated = include;
        self
    }
}

/// Everything a constraint can read during evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    shapes_graph: &'a ShapesGraph,
    data_graph: &'a Graph,
    ids: &'a dyn IdGenerator,
    options: &'a ValidationOptions,
    depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a top-level context.
    pub fn new(
        shapes_graph: &'a ShapesGraph,
        data_graph: &'a Graph,
        ids: &'a dyn IdGenerator,
        options: &'a ValidationOptions,
    ) -> Self {
        Self {
            shapes_graph,
            data_graph,
            ids,
            options,
            depth: 0,
        }
    }

    /// Shapes that nested constraints may refer to.
    pub fn shapes_graph(&self) -> &'a ShapesGraph {
        self.shapes_graph
    }

    /// The data being validated.
    pub fn data_graph(&self) -> &'a Graph {
        self.data_graph
    }

    /// Run options.
    pub fn options(&self) -> &'a ValidationOptions {
        self.options
    }

    /// Current nesting depth, 0 at the top level.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns a context one level deeper, or `None` when the depth limit is reached.
    pub fn nested(&self) -> Option<Self> {
        if self.depth >= self.options.max_depth {
            return None;
        }
        Some(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Returns a fresh blank identity.
    pub fn next_id(&self) -> Resource {
        self.ids.next_blank()
    }

    /// Creates an empty report with a fresh identity.
    pub fn report(&self) -> ValidationReport {
        ValidationReport::new(self.next_id())
    }

    /// Creates a result carrying the shape's context and a fresh identity.
    pub fn result(
        &self,
        shape: &Shape,
        component: ConstraintComponent,
        focus_node: &Term,
        value: &Term,
    ) -> ValidationResult {
        ValidationResult::new(shape, component, focus_node, value, self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn test_nested_respects_max_depth() {
        let shapes = ShapesGraph::new();
        let data = Graph::new();
        let ids = SequentialIds::default();
        let options = ValidationOptions::new().with_max_depth(1);
        let ctx = EvaluationContext::new(&shapes, &data, &ids, &options);

        let nested = ctx.nested().expect("one level allowed");
        assert_eq!(nested.depth(), 1);
        assert!(nested.nested().is_none());
    }

    #[test]
    fn test_report_identities_come_from_generator() {
        let shapes = ShapesGraph::new();
        let data = Graph::new();
        let ids = SequentialIds::new("t");
        let options = ValidationOptions::default();
        let ctx = EvaluationContext::new(&shapes, &data, &ids, &options);

        assert_eq!(ctx.report().id(), &Resource::blank("t0"));
        assert_eq!(ctx.report().id(), &Resource::blank("t1"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidationOptions = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(options.max_depth, 4);
        assert!(!options.include_deactivated);
    }
}
