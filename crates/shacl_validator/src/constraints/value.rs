//! Value constraints: `sh:in`, `sh:hasValue`, `sh:languageIn` and `sh:uniqueLang`.

use super::with_id;
use shacl_core::vocabulary::shacl;
use shacl_core::{
    Constraint, ConstraintComponent, EvaluationContext, EvaluationScope, Graph, Literal, Resource,
    Shape, Term, ValidationReport,
};
use std::collections::HashMap;

/// `sh:in`: every value node is one of the listed terms.
#[derive(Debug, Clone)]
pub struct InConstraint {
    id: Resource,
    values: Vec<Term>,
}

impl InConstraint {
    /// Creates the constraint from the allowed terms, kept in order.
    pub fn new(values: impl IntoIterator<Item = Term>) -> Self {
        Self {
            id: Resource::fresh_blank(),
            values: values.into_iter().collect(),
        }
    }

    /// Allowed terms.
    pub fn values(&self) -> &[Term] {
        &self.values
    }
}

with_id!(InConstraint);

impl Constraint for InConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::In
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        _all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        if !self.values.contains(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add_list(shape.id(), shacl::IN, &self.id, self.values.iter().cloned());
        }
        graph
    }
}

/// `sh:hasValue`: one of the value nodes is the given term.
#[derive(Debug, Clone)]
pub struct HasValueConstraint {
    id: Resource,
    value: Term,
}

impl HasValueConstraint {
    /// Creates the constraint.
    pub fn new(value: impl Into<Term>) -> Self {
        Self {
            id: Resource::fresh_blank(),
            value: value.into(),
        }
    }

    /// Required term.
    pub fn value(&self) -> &Term {
        &self.value
    }
}

with_id!(HasValueConstraint);

impl Constraint for HasValueConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::HasValue
    }

    fn scope(&self) -> EvaluationScope {
        EvaluationScope::FocusNode
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        _value_node: &Term,
        all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        if !all_value_nodes.contains(&self.value) {
            report.add_result(ctx.result(shape, self.component(), focus_node, focus_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::HAS_VALUE, self.value.clone());
        }
        graph
    }
}

/// Basic language range matching (RFC 4647 section 3.3.1).
fn matches_language_range(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range
        || tag
            .strip_prefix(range.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
}

/// `sh:languageIn`: every value node is a literal whose language tag matches
/// one of the ranges.
#[derive(Debug, Clone)]
pub struct LanguageInConstraint {
    id: Resource,
    languages: Vec<String>,
}

impl LanguageInConstraint {
    /// Creates the constraint from language ranges such as `en` or `de-CH`.
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Resource::fresh_blank(),
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Allowed language ranges.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    fn allows(&self, value: &Term) -> bool {
        let Some(tag) = value.as_literal().and_then(Literal::language) else {
            return false;
        };
        self.languages
            .iter()
            .any(|range| matches_language_range(tag, range))
    }
}

with_id!(LanguageInConstraint);

impl Constraint for LanguageInConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::LanguageIn
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        value_node: &Term,
        _all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        if !self.allows(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            let items = self
                .languages
                .iter()
                .map(|language| Term::from(Literal::string(language.as_str())));
            graph.add_list(shape.id(), shacl::LANGUAGE_IN, &self.id, items);
        }
        graph
    }
}

/// `sh:uniqueLang`: no two value nodes share a language tag.
///
/// Reports one result per duplicated tag; the value is the first literal that
/// repeats the tag. Tags compare case-insensitively.
#[derive(Debug, Clone)]
pub struct UniqueLangConstraint {
    id: Resource,
    unique_lang: bool,
}

impl UniqueLangConstraint {
    /// Creates the constraint. `false` disables the check.
    pub fn new(unique_lang: bool) -> Self {
        Self {
            id: Resource::fresh_blank(),
            unique_lang,
        }
    }

    /// Whether uniqueness is enforced.
    pub fn unique_lang(&self) -> bool {
        self.unique_lang
    }
}

with_id!(UniqueLangConstraint);

impl Constraint for UniqueLangConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::UniqueLang
    }

    fn scope(&self) -> EvaluationScope {
        EvaluationScope::FocusNode
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        shape: &Shape,
        focus_node: &Term,
        _value_node: &Term,
        all_value_nodes: &[Term],
    ) -> ValidationReport {
        let mut report = ctx.report();
        if !self.unique_lang {
            return report;
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for value in all_value_nodes {
            let Some(tag) = value.as_literal().and_then(Literal::language) else {
                continue;
            };
            let count = seen.entry(tag.to_ascii_lowercase()).or_default();
            *count += 1;
            if *count == 2 {
                report.add_result(ctx.result(shape, self.component(), focus_node, value));
            }
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::UNIQUE_LANG, Literal::boolean(self.unique_lang));
        }
        graph
    }
}
