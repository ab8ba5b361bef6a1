// core/src/validation/rule.rs

use crate::validation::coerce;
use crate::validation::input::{RequestInput, Target};
use crate::validation::verdict::Verdict;
use serde_json::Value;
use std::sync::Arc;

/// A user-supplied check over a possibly missing value.
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync + 'static>;

/// What a rule requires of its target.
#[derive(Clone)]
pub enum Constraint {
  RequiredNonEmpty,
  IsInteger,
  IsNumeric,
  IsBoolean,
  Custom { name: String, predicate: Predicate },
}

impl Constraint {
  pub fn check(&self, value: Option<&Value>) -> bool {
    match self {
      Constraint::RequiredNonEmpty => coerce::text(value).is_some(),
      Constraint::IsInteger => coerce::integer(value).is_some(),
      Constraint::IsNumeric => coerce::number(value).is_some(),
      Constraint::IsBoolean => coerce::boolean(value).is_some(),
      Constraint::Custom { predicate, .. } => predicate(value),
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Constraint::RequiredNonEmpty => "required-non-empty",
      Constraint::IsInteger => "is-integer",
      Constraint::IsNumeric => "is-numeric",
      Constraint::IsBoolean => "is-boolean",
      Constraint::Custom { name, .. } => name,
    }
  }
}

impl std::fmt::Debug for Constraint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// One declared check: the value at `target` must satisfy `constraint`, else `message` is reported.
#[derive(Debug, Clone)]
pub struct Rule {
  pub target: Target,
  pub constraint: Constraint,
  pub message: String,
}

impl Rule {
  pub fn new(target: Target, constraint: Constraint, message: impl Into<String>) -> Self {
    Self {
      target,
      constraint,
      message: message.into(),
    }
  }

  /// `Some(verdict)` when the rule fails for `input`.
  pub fn evaluate(&self, input: &RequestInput) -> Option<Verdict> {
    let value = input.lookup(&self.target);
    if self.constraint.check(value.as_deref()) {
      None
    } else {
      Some(Verdict {
        field: self.target.field().to_string(),
        location: self.target.location(),
        message: self.message.clone(),
      })
    }
  }
}
