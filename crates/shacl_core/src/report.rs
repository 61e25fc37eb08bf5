//! Validation reports.
//!
//! A [`ValidationReport`] is an identity plus an append-only list of
//! [`ValidationResult`]s. Constraints return a fresh report per call; callers
//! merge those into larger reports. An empty report means every evaluated
//! constraint was satisfied.

use crate::error::Result;
use crate::graph::Graph;
use crate::shape::{PropertyPath, Severity, Shape};
use crate::term::{Literal, Resource, Term};
use crate::vocabulary::{ConstraintComponent, rdf, shacl};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One detected violation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationResult {
    /// Identity of this result
    pub id: Resource,

    /// Shape whose constraint was violated
    pub source_shape: Resource,

    /// Rule kind that produced the result
    pub source_constraint_component: ConstraintComponent,

    /// Node validated against the shape
    pub focus_node: Term,

    /// Path of the property shape; `None` for node shapes
    pub result_path: Option<PropertyPath>,

    /// Offending value node
    pub value: Term,

    /// Messages configured on the shape
    pub messages: Vec<Literal>,

    /// Severity configured on the shape
    pub severity: Severity,
}

impl ValidationResult {
    /// Creates a result inheriting path, messages and severity from `shape`.
    pub fn new(
        shape: &Shape,
        component: ConstraintComponent,
        focus_node: &Term,
        value: &Term,
        id: Resource,
    ) -> Self {
        Self {
            id,
            source_shape: shape.id().clone(),
            source_constraint_component: component,
            focus_node: focus_node.clone(),
            result_path: shape.path().cloned(),
            value: value.clone(),
            messages: shape.messages().to_vec(),
            severity: shape.severity(),
        }
    }

    /// Overrides the result path.
    pub fn with_path(mut self, path: PropertyPath) -> Self {
        self.result_path = Some(path);
        self
    }

    /// Returns true if both results describe the same violation, ignoring
    /// their identities.
    pub fn same_violation(&self, other: &ValidationResult) -> bool {
        self.source_shape == other.source_shape
            && self.source_constraint_component == other.source_constraint_component
            && self.focus_node == other.focus_node
            && self.result_path == other.result_path
            && self.value == other.value
            && self.messages == other.messages
            && self.severity == other.severity
    }

    /// Serializes the result in the SHACL results vocabulary.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        graph.add(&self.id, rdf::TYPE, Resource::new(shacl::VALIDATION_RESULT));
        graph.add(
            &self.id,
            shacl::RESULT_SEVERITY,
            Resource::new(self.severity.iri()),
        );
        graph.add(&self.id, shacl::FOCUS_NODE, self.focus_node.clone());
        if let Some(path) = &self.result_path {
            let path_term = path.write(&mut graph, &self.id);
            graph.add(&self.id, shacl::RESULT_PATH, path_term);
        }
        graph.add(&self.id, shacl::VALUE, self.value.clone());
        graph.add(&self.id, shacl::SOURCE_SHAPE, self.source_shape.clone());
        graph.add(
            &self.id,
            shacl::SOURCE_CONSTRAINT_COMPONENT,
            self.source_constraint_component.to_resource(),
        );
        for message in &self.messages {
            graph.add(&self.id, shacl::RESULT_MESSAGE, message.clone());
        }
        graph
    }
}

/// Ordered, append-only collection of validation results.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    id: Resource,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new(id: Resource) -> Self {
        Self {
            id,
            results: Vec::new(),
        }
    }

    /// Report identity.
    pub fn id(&self) -> &Resource {
        &self.id
    }

    /// Appends a result.
    pub fn add_result(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    /// Appends every result of `other`, keeping their order.
    pub fn merge(&mut self, other: ValidationReport) {
        self.results.extend(other.results);
    }

    /// Results in the order they were added.
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if there are no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns true if no result was recorded, whatever its severity.
    pub fn conforms(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// Number of `sh:Violation` results.
    pub fn violation_count(&self) -> usize {
        self.count(Severity::Violation)
    }

    /// Number of `sh:Warning` results.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Number of `sh:Info` results.
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Serializes the report in the SHACL results vocabulary.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        graph.add(&self.id, rdf::TYPE, Resource::new(shacl::VALIDATION_REPORT));
        graph.add(&self.id, shacl::CONFORMS, Literal::boolean(self.conforms()));
        for result in &self.results {
            graph.add(&self.id, shacl::RESULT, result.id.clone());
            graph.merge(result.to_graph());
        }
        graph
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("conforms", &self.conforms())?;
        state.serialize_field("results", &self.results)?;
        state.end()
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationResult;
    type IntoIter = std::vec::IntoIter<ValidationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationResult;
    type IntoIter = std::slice::Iter<'a, ValidationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
