// core/src/guard.rs

//! The input guard: the single gate between validation and the resource handler.

use crate::core::control::PipelineControl;
use crate::validation::Verdicts;
use tracing::{event, Level};

/// What the guard decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
  /// No verdicts; the request proceeds unchanged.
  Pass,
  /// At least one verdict; the handler must not run.
  Reject { failures: usize },
}

impl GuardDecision {
  pub fn control(self) -> PipelineControl {
    match self {
      GuardDecision::Pass => PipelineControl::Continue,
      GuardDecision::Reject { .. } => PipelineControl::Stop,
    }
  }
}

pub struct InputGuard;

impl InputGuard {
  pub fn inspect(verdicts: &Verdicts) -> GuardDecision {
    if verdicts.is_empty() {
      return GuardDecision::Pass;
    }
    event!(Level::INFO, failures = verdicts.len(), "Input guard rejected request.");
    GuardDecision::Reject {
      failures: verdicts.len(),
    }
  }
}
