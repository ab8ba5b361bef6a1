// core/src/chain.rs

//! Assembles the per-route chain `validate -> guard -> handle`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::core::step::SkipCondition;
use crate::error::PipelineError;
use crate::guard::InputGuard;
use crate::pipeline::definition::Pipeline;
use crate::validation::{RequestInput, RuleSet, Verdicts};
use std::sync::Arc;

pub const VALIDATE_STEP: &str = "validate";
pub const GUARD_STEP: &str = "guard";
pub const HANDLE_STEP: &str = "handle";

/// Request-scoped data a route chain can validate.
pub trait ValidationScope: Send + Sync + 'static {
  fn input(&self) -> &RequestInput;
  fn verdicts(&self) -> &Verdicts;
  fn verdicts_mut(&mut self) -> &mut Verdicts;
}

/// Builds a pipeline whose `validate` and `guard` steps are wired up.
///
/// The caller registers the resource handler on `HANDLE_STEP`; until it does,
/// running the chain fails with `PipelineError::HandlerMissing`. When `rules`
/// is empty the `validate` step is skipped.
pub fn route_chain<TData, Err>(rules: Arc<RuleSet>) -> Pipeline<TData, Err>
where
  TData: ValidationScope,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  let no_rules = rules.is_empty();
  let skip_validate: Option<SkipCondition<TData>> = if no_rules {
    Some(Arc::new(|_ctx: ContextData<TData>| true))
  } else {
    None
  };

  let mut pipeline = Pipeline::new(&[
    (VALIDATE_STEP, false, skip_validate),
    (GUARD_STEP, false, None),
    (HANDLE_STEP, false, None),
  ]);

  pipeline.on_root(VALIDATE_STEP, move |ctx: ContextData<TData>| {
    let rules = Arc::clone(&rules);
    async move {
      let verdicts = rules.evaluate(ctx.read().input());
      ctx.write().verdicts_mut().extend(verdicts);
      Ok::<_, PipelineError>(PipelineControl::Continue)
    }
  });

  pipeline.on_root(GUARD_STEP, |ctx: ContextData<TData>| async move {
    let decision = InputGuard::inspect(ctx.read().verdicts());
    Ok::<_, PipelineError>(decision.control())
  });

  pipeline
}
