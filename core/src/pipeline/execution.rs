// core/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the steps and their handlers in order.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Stops at the first handler returning `PipelineControl::Stop`
  /// (`Ok(PipelineResult::Stopped)`) or failing (`Err`). A non-optional step
  /// without handlers fails with `PipelineError::HandlerMissing` converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::TRACE, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name_str, step_index = step_idx, "Step skipped by 'skip_if' condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name_str) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::TRACE, step = step_name_str, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = step_name_str, "Non-optional step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        match handler_fn(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(
              Level::DEBUG,
              step = step_name_str,
              handler_index = handler_idx,
              "Pipeline stopped by handler."
            );
            return Ok(PipelineResult::Stopped);
          }
          Err(e) => {
            event!(Level::DEBUG, step = step_name_str, handler_index = handler_idx, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::TRACE, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
