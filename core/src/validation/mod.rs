// core/src/validation/mod.rs

//! Declarative request validation.
//!
//! A `RuleSet` is an ordered list of `(target, constraint, message)` rules.
//! Evaluation never short-circuits: every rule runs and every failure becomes a
//! `Verdict`, so a client sees all problems with its request at once.

pub mod coerce;
pub mod input;
pub mod rule;
pub mod rule_set;
pub mod verdict;

pub use input::{Location, RequestInput, Target};
pub use rule::{Constraint, Predicate, Rule};
pub use rule_set::{FieldRules, RuleSet};
pub use verdict::{Verdict, Verdicts};
