// core/src/lib.rs

//! catalog-pipeline: the request-processing pipeline behind the product catalog API.
//!
//! Every route is served by a short, ordered pipeline of named steps:
//!  - `validate`: all declared rules run against the request input and each
//!    failure is accumulated as a verdict.
//!  - `guard`: halts the pipeline when at least one verdict was recorded.
//!  - `handle`: the resource handler, only ever reached with clean input.
//!
//! The engine (`Pipeline`, `ContextData`, `PipelineControl`) knows nothing about
//! HTTP. The web layer supplies the context type and the handlers, and decides
//! how a `Stopped` run is rendered.

pub mod chain;
pub mod core;
pub mod error;
pub mod guard;
pub mod pipeline;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::chain::{route_chain, ValidationScope, GUARD_STEP, HANDLE_STEP, VALIDATE_STEP};
pub use crate::guard::{GuardDecision, InputGuard};
pub use crate::validation::{
  coerce, Constraint, FieldRules, Location, Predicate, RequestInput, Rule, RuleSet, Target, Verdict, Verdicts,
};

pub use crate::error::{EngineResult, PipelineError};
