// core/src/validation/rule_set.rs

use crate::validation::input::{RequestInput, Target};
use crate::validation::rule::{Constraint, Rule};
use crate::validation::verdict::Verdicts;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

/// The ordered rules attached to one route.
///
/// ```
/// use catalog_pipeline::{coerce, RuleSet};
///
/// let rules = RuleSet::new()
///   .param("id", |f| f.is_integer("Invalid id"))
///   .body("price", |f| {
///     f.is_numeric("Invalid value")
///       .custom("positive", |v| coerce::number(v).map_or(false, |n| n > 0.0), "Invalid price")
///   });
/// assert_eq!(rules.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
  rules: Vec<Rule>,
}

impl RuleSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares the rules for a path parameter, in the order `build` adds them.
  pub fn param(self, name: &str, build: impl FnOnce(FieldRules) -> FieldRules) -> Self {
    self.field(Target::Param(name.to_string()), build)
  }

  /// Declares the rules for a body field, in the order `build` adds them.
  pub fn body(self, name: &str, build: impl FnOnce(FieldRules) -> FieldRules) -> Self {
    self.field(Target::Body(name.to_string()), build)
  }

  fn field(mut self, target: Target, build: impl FnOnce(FieldRules) -> FieldRules) -> Self {
    let field_rules = build(FieldRules { target, rules: Vec::new() });
    self.rules.extend(field_rules.rules);
    self
  }

  pub fn rules(&self) -> &[Rule] {
    &self.rules
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Runs every rule in declaration order and collects one verdict per failure.
  pub fn evaluate(&self, input: &RequestInput) -> Verdicts {
    let mut verdicts = Verdicts::default();
    for rule in &self.rules {
      if let Some(verdict) = rule.evaluate(input) {
        event!(
          Level::DEBUG,
          field = %verdict.field,
          constraint = rule.constraint.name(),
          "Validation rule failed."
        );
        verdicts.push(verdict);
      }
    }
    verdicts
  }
}

/// Builder for the rules of a single target.
#[derive(Debug)]
pub struct FieldRules {
  target: Target,
  rules: Vec<Rule>,
}

impl FieldRules {
  fn with(mut self, constraint: Constraint, message: impl Into<String>) -> Self {
    self.rules.push(Rule::new(self.target.clone(), constraint, message));
    self
  }

  pub fn not_empty(self, message: impl Into<String>) -> Self {
    self.with(Constraint::RequiredNonEmpty, message)
  }

  pub fn is_integer(self, message: impl Into<String>) -> Self {
    self.with(Constraint::IsInteger, message)
  }

  pub fn is_numeric(self, message: impl Into<String>) -> Self {
    self.with(Constraint::IsNumeric, message)
  }

  pub fn is_boolean(self, message: impl Into<String>) -> Self {
    self.with(Constraint::IsBoolean, message)
  }

  pub fn custom(
    self,
    name: &str,
    predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    message: impl Into<String>,
  ) -> Self {
    self.with(
      Constraint::Custom {
        name: name.to_string(),
        predicate: Arc::new(predicate),
      },
      message,
    )
  }
}
