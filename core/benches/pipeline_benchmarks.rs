use catalog_pipeline::{
  coerce, route_chain, ContextData, Pipeline, PipelineControl, PipelineError, RequestInput, RuleSet,
  ValidationScope, Verdicts, HANDLE_STEP,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Default)]
struct BenchRequest {
  input: RequestInput,
  verdicts: Verdicts,
}

impl ValidationScope for BenchRequest {
  fn input(&self) -> &RequestInput {
    &self.input
  }

  fn verdicts(&self) -> &Verdicts {
    &self.verdicts
  }

  fn verdicts_mut(&mut self) -> &mut Verdicts {
    &mut self.verdicts
  }
}

fn update_rules() -> RuleSet {
  RuleSet::new()
    .param("id", |f| f.is_integer("Invalid id"))
    .body("name", |f| f.not_empty("Product name must not be empty"))
    .body("price", |f| {
      f.is_numeric("Invalid value")
        .not_empty("Product price must not be empty")
        .custom("positive", |v| coerce::number(v).map_or(false, |n| n > 0.0), "Invalid price")
    })
    .body("availability", |f| f.is_boolean("Invalid availability value"))
}

fn inputs() -> Vec<(&'static str, &'static str, Value)> {
  vec![
    ("clean", "12", json!({"name": "Casita", "price": 300, "availability": true})),
    ("all_failing", "abc", json!({})),
  ]
}

fn bench_rule_evaluation(c: &mut Criterion) {
  let mut group = c.benchmark_group("RuleEvaluation");
  let rules = update_rules();

  for (label, id, body) in inputs() {
    let input = RequestInput::new().with_param("id", id).with_body(body);
    group.bench_with_input(BenchmarkId::new("update_rules", label), &input, |b, input| {
      b.iter(|| rules.evaluate(input))
    });
  }
  group.finish();
}

fn bench_route_chain(c: &mut Criterion) {
  let mut group = c.benchmark_group("RouteChain");
  let rt = Runtime::new().unwrap();

  let mut chain: Pipeline<BenchRequest, PipelineError> = route_chain(Arc::new(update_rules()));
  chain.on_root(HANDLE_STEP, |_ctx: ContextData<BenchRequest>| async move {
    Ok::<_, PipelineError>(PipelineControl::Continue)
  });
  let chain = Arc::new(chain);

  for (label, id, body) in inputs() {
    group.bench_function(BenchmarkId::new("run", label), |b| {
      b.to_async(&rt).iter_batched(
        || {
          ContextData::new(BenchRequest {
            input: RequestInput::new().with_param("id", id).with_body(body.clone()),
            ..Default::default()
          })
        },
        |ctx| {
          let chain = chain.clone();
          async move { chain.run(ctx).await.unwrap() }
        },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

criterion_group!(benches, bench_rule_evaluation, bench_route_chain);
criterion_main!(benches);
