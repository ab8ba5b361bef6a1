// core/src/validation/verdict.rs

use crate::validation::input::Location;
use serde::{Deserialize, Serialize};

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
  pub field: String,
  pub location: Location,
  pub message: String,
}

/// Failures of one request, in rule declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdicts(Vec<Verdict>);

impl Verdicts {
  pub fn push(&mut self, verdict: Verdict) {
    self.0.push(verdict);
  }

  pub fn extend(&mut self, other: Verdicts) {
    self.0.extend(other.0);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Verdict> {
    self.0.iter()
  }

  pub fn messages_for(&self, field: &str) -> Vec<&str> {
    self
      .0
      .iter()
      .filter(|v| v.field == field)
      .map(|v| v.message.as_str())
      .collect()
  }
}

impl IntoIterator for Verdicts {
  type Item = Verdict;
  type IntoIter = std::vec::IntoIter<Verdict>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}
