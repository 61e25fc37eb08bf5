//! String-based constraints: `sh:minLength`, `sh:maxLength` and `sh:pattern`.
//!
//! All three look at the string form of a value node: the lexical value of a
//! literal or the IRI of a resource. Blank resources have no meaningful string
//! form and always violate. Lengths are counted in Unicode code points.

use super::{clamp, integer_literal, lexical_form, with_id};
use regex::{Regex, RegexBuilder};
use shacl_core::vocabulary::shacl;
use shacl_core::{
    ConfigurationError, Constraint, ConstraintComponent, EvaluationContext, Graph, Literal,
    Resource, Shape, Term, ValidationReport,
};
use std::fmt;

fn code_points(term: &Term) -> usize {
    lexical_form(term).chars().count()
}

/// `sh:maxLength`: string form has at most `max_length` code points.
#[derive(Debug, Clone)]
pub struct MaxLengthConstraint {
    id: Resource,
    max_length: usize,
}

impl MaxLengthConstraint {
    /// Creates the constraint. Negative lengths are treated as zero.
    pub fn new(max_length: i64) -> Self {
        Self {
            id: Resource::fresh_blank(),
            max_length: clamp(max_length),
        }
    }

    /// Maximum number of code points.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn violates(&self, value: &Term) -> bool {
        value.is_blank() || code_points(value) > self.max_length
    }
}

with_id!(MaxLengthConstraint);

impl Constraint for MaxLengthConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::MaxLength
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
        if self.violates(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::MAX_LENGTH, integer_literal(self.max_length));
        }
        graph
    }
}

/// `sh:minLength`: string form has at least `min_length` code points.
#[derive(Debug, Clone)]
pub struct MinLengthConstraint {
    id: Resource,
    min_length: usize,
}

impl MinLengthConstraint {
    /// Creates the constraint. Negative lengths are treated as zero.
    pub fn new(min_length: i64) -> Self {
        Self {
            id: Resource::fresh_blank(),
            min_length: clamp(min_length),
        }
    }

    /// Minimum number of code points.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    fn violates(&self, value: &Term) -> bool {
        value.is_blank() || code_points(value) < self.min_length
    }
}

with_id!(MinLengthConstraint);

impl Constraint for MinLengthConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::MinLength
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
        if self.violates(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        if let Some(shape) = shape {
            graph.add(shape.id(), shacl::MIN_LENGTH, integer_literal(self.min_length));
        }
        graph
    }
}

/// Regex flags accepted by `sh:flags`.
///
/// Displayed in the fixed order `i`, `s`, `m`, `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// `i`: case-insensitive matching
    pub case_insensitive: bool,
    /// `s`: `.` also matches line terminators
    pub dot_all: bool,
    /// `m`: `^` and `$` match at line boundaries
    pub multi_line: bool,
    /// `x`: whitespace and `#` comments in the pattern are ignored
    pub extended: bool,
}

impl PatternFlags {
    /// No flags set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses a SHACL flags string.
    ///
    /// Fails with [`ConfigurationError::UnsupportedFlag`] for `q` (the regex
    /// engine has no literal-pattern mode) and for any unknown character.
    pub fn parse(flags: &str) -> Result<Self, ConfigurationError> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                'i' => parsed.case_insensitive = true,
                's' => parsed.dot_all = true,
                'm' => parsed.multi_line = true,
                'x' => parsed.extended = true,
                other => return Err(ConfigurationError::UnsupportedFlag { flag: other }),
            }
        }
        Ok(parsed)
    }

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, builder: &mut RegexBuilder) {
        builder
            .case_insensitive(self.case_insensitive)
            .dot_matches_new_line(self.dot_all)
            .multi_line(self.multi_line)
            .ignore_whitespace(self.extended);
    }
}

impl fmt::Display for PatternFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.case_insensitive, 'i'),
            (self.dot_all, 's'),
            (self.multi_line, 'm'),
            (self.extended, 'x'),
        ];
        for (set, flag) in flags {
            if set {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}

/// `sh:pattern`: string form matches a regular expression.
///
/// Matching is unanchored, as in XPath `fn:matches`.
#[derive(Debug, Clone)]
pub struct PatternConstraint {
    id: Resource,
    pattern: String,
    flags: PatternFlags,
    regex: Regex,
}

impl PatternConstraint {
    /// Compiles the pattern with the given flags.
    pub fn new(pattern: impl Into<String>, flags: PatternFlags) -> Result<Self, ConfigurationError> {
        let pattern = pattern.into();
        let mut builder = RegexBuilder::new(&pattern);
        flags.apply(&mut builder);
        let regex = builder
            .build()
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            id: Resource::fresh_blank(),
            pattern,
            flags,
            regex,
        })
    }

    /// Builds the constraint from raw `sh:pattern` / `sh:flags` values.
    ///
    /// A missing pattern is a configuration error; missing flags mean none.
    pub fn from_parameters(
        pattern: Option<&str>,
        flags: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let pattern =
            pattern.ok_or_else(|| ConfigurationError::missing("PatternConstraint", "pattern"))?;
        let flags = flags.map(PatternFlags::parse).transpose()?.unwrap_or_default();
        Self::new(pattern, flags)
    }

    /// Pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Configured flags.
    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    fn violates(&self, value: &Term) -> bool {
        value.is_blank() || !self.regex.is_match(lexical_form(value))
    }
}

with_id!(PatternConstraint);

impl Constraint for PatternConstraint {
    fn id(&self) -> &Resource {
        &self.id
    }

    fn component(&self) -> ConstraintComponent {
        ConstraintComponent::Pattern
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
        if self.violates(value_node) {
            report.add_result(ctx.result(shape, self.component(), focus_node, value_node));
        }
        report
    }

    fn to_graph(&self, shape: Option<&Shape>) -> Graph {
        let mut graph = Graph::new();
        let Some(shape) = shape else {
            return graph;
        };

        graph.add(shape.id(), shacl::PATTERN, Literal::string(&self.pattern));
        if !self.flags.is_empty() {
            graph.add(shape.id(), shacl::FLAGS, Literal::string(self.flags.to_string()));
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{Fixture, ex, property_shape};
    use super::*;
    use pretty_assertions::assert_eq;
    use shacl_core::vocabulary::xsd;

    #[test]
    fn test_max_length_counts_code_points() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let constraint = MaxLengthConstraint::new(3);

        assert!(fixture.check(&constraint, &shape, &Literal::plain("abc").into()).is_empty());
        assert!(fixture.check(&constraint, &shape, &Literal::plain("日本語").into()).is_empty());
        assert!(fixture.check(&constraint, &shape, &Literal::plain("").into()).is_empty());
        assert_eq!(
            fixture.check(&constraint, &shape, &Literal::plain("abcd").into()).len(),
            1
        );
    }

    #[test]
    fn test_max_length_ignores_datatype() {
        let fixture = Fixture::new();
        let constraint = MaxLengthConstraint::new(2);
        let value = Term::from(Literal::integer(123));
        assert_eq!(fixture.check(&constraint, &property_shape(), &value).len(), 1);
    }

    #[test]
    fn test_max_length_on_resources() {
        let fixture = Fixture::new();
        let shape = property_shape();

        let long_enough = MaxLengthConstraint::new(100);
        assert!(fixture.check(&long_enough, &shape, &ex("a").into()).is_empty());
        assert_eq!(
            fixture.check(&long_enough, &shape, &Resource::blank("b").into()).len(),
            1
        );

        let short = MaxLengthConstraint::new(5);
        assert_eq!(fixture.check(&short, &shape, &ex("a").into()).len(), 1);
    }

    #[test]
    fn test_negative_max_length_clamps_to_zero() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let constraint = MaxLengthConstraint::new(-4);

        assert_eq!(constraint.max_length(), 0);
        assert!(fixture.check(&constraint, &shape, &Literal::plain("").into()).is_empty());
        assert_eq!(fixture.check(&constraint, &shape, &Literal::plain("a").into()).len(), 1);
    }

    #[test]
    fn test_max_length_result_fields() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let focus = Term::from(ex("focus"));
        let value = Term::from(Literal::plain("abcd"));

        let report = MaxLengthConstraint::new(3).evaluate(
            &fixture.ctx(),
            &shape,
            &focus,
            &value,
            std::slice::from_ref(&value),
        );

        let result = &report.results()[0];
        assert_eq!(result.source_shape, ex("S"));
        assert_eq!(result.source_constraint_component, ConstraintComponent::MaxLength);
        assert_eq!(result.focus_node, focus);
        assert_eq!(result.value, value);
        assert!(result.result_path.is_some());
        assert!(result.id.is_blank());
    }

    #[test]
    fn test_min_length() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let constraint = MinLengthConstraint::new(2);

        assert!(fixture.check(&constraint, &shape, &Literal::plain("ab").into()).is_empty());
        assert_eq!(fixture.check(&constraint, &shape, &Literal::plain("é").into()).len(), 1);
        assert_eq!(
            fixture.check(&constraint, &shape, &Resource::blank("b").into()).len(),
            1
        );

        let zero = MinLengthConstraint::new(-1);
        assert!(fixture.check(&zero, &shape, &Literal::plain("").into()).is_empty());
    }

    #[test]
    fn test_length_to_graph() {
        let shape = property_shape();

        let graph = MaxLengthConstraint::new(5).to_graph(Some(&shape));
        assert_eq!(graph.len(), 1);
        assert_eq!(
            graph.object(shape.id(), shacl::MAX_LENGTH),
            Some(&Term::from(Literal::typed("5", xsd::INTEGER)))
        );

        let graph = MinLengthConstraint::new(-3).to_graph(Some(&shape));
        assert_eq!(
            graph.object(shape.id(), shacl::MIN_LENGTH),
            Some(&Term::from(Literal::typed("0", xsd::INTEGER)))
        );

        assert!(MaxLengthConstraint::new(5).to_graph(None).is_empty());
    }

    #[test]
    fn test_pattern_matching() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let constraint = PatternConstraint::new("^[A-Z][a-z]+$", PatternFlags::none()).unwrap();

        assert!(fixture.check(&constraint, &shape, &Literal::plain("Alice").into()).is_empty());
        assert_eq!(fixture.check(&constraint, &shape, &Literal::plain("alice").into()).len(), 1);
        assert_eq!(
            fixture.check(&constraint, &shape, &Resource::blank("x").into()).len(),
            1
        );
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let fixture = Fixture::new();
        let constraint = PatternConstraint::new("example", PatternFlags::none()).unwrap();
        assert!(fixture.check(&constraint, &property_shape(), &ex("a").into()).is_empty());
    }

    #[test]
    fn test_match_anything_pattern() {
        let fixture = Fixture::new();
        let shape = property_shape();
        let constraint = PatternConstraint::new(".*", PatternFlags::none()).unwrap();

        for value in [
            Term::from(Literal::plain("")),
            Term::from(Literal::lang("chat", "fr")),
            Term::from(ex("a")),
        ] {
            assert!(fixture.check(&constraint, &shape, &value).is_empty());
        }
        assert_eq!(
            fixture.check(&constraint, &shape, &Resource::blank("x").into()).len(),
            1
        );
    }

    #[test]
    fn test_pattern_flags_change_matching() {
        let fixture = Fixture::new();
        let shape = property_shape();

        let insensitive = PatternConstraint::from_parameters(Some("^abc$"), Some("i")).unwrap();
        assert!(fixture.check(&insensitive, &shape, &Literal::plain("ABC").into()).is_empty());

        let dot_all = PatternConstraint::from_parameters(Some("^a.b$"), Some("s")).unwrap();
        assert!(fixture.check(&dot_all, &shape, &Literal::plain("a\nb").into()).is_empty());

        let multi_line = PatternConstraint::from_parameters(Some("^b$"), Some("m")).unwrap();
        assert!(fixture.check(&multi_line, &shape, &Literal::plain("a\nb").into()).is_empty());

        let extended = PatternConstraint::from_parameters(Some("a b c # letters"), Some("x")).unwrap();
        assert!(fixture.check(&extended, &shape, &Literal::plain("abc").into()).is_empty());
    }

    #[test]
    fn test_pattern_configuration_errors() {
        assert_eq!(
            PatternConstraint::from_parameters(None, Some("i")).unwrap_err(),
            ConfigurationError::missing("PatternConstraint", "pattern")
        );
        assert_eq!(
            PatternConstraint::from_parameters(Some("a"), Some("iq")).unwrap_err(),
            ConfigurationError::UnsupportedFlag { flag: 'q' }
        );
        assert!(matches!(
            PatternConstraint::from_parameters(Some("(unclosed"), None),
            Err(ConfigurationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_pattern_to_graph() {
        let shape = property_shape();

        let constraint = PatternConstraint::from_parameters(Some("^a"), Some("mi")).unwrap();
        let graph = constraint.to_graph(Some(&shape));
        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.object(shape.id(), shacl::PATTERN),
            Some(&Term::from(Literal::string("^a")))
        );
        assert_eq!(
            graph.object(shape.id(), shacl::FLAGS),
            Some(&Term::from(Literal::string("im")))
        );

        let plain = PatternConstraint::new("^a", PatternFlags::none()).unwrap();
        let graph = plain.to_graph(Some(&shape));
        assert_eq!(graph.len(), 1);
        assert!(graph.object(shape.id(), shacl::FLAGS).is_none());
    }

    #[test]
    fn test_flags_display_order() {
        let flags = PatternFlags::parse("xmsi").unwrap();
        assert_eq!(flags.to_string(), "ismx");
        assert!(PatternFlags::parse("").unwrap().is_empty());
    }
}
