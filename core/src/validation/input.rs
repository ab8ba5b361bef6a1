// core/src/validation/input.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Where a validated value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
  Params,
  Body,
}

/// The value a rule inspects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
  /// A named path parameter, always a string.
  Param(String),
  /// A top-level field of the JSON body.
  Body(String),
}

impl Target {
  pub fn field(&self) -> &str {
    match self {
      Target::Param(name) | Target::Body(name) => name,
    }
  }

  pub fn location(&self) -> Location {
    match self {
      Target::Param(_) => Location::Params,
      Target::Body(_) => Location::Body,
    }
  }
}

/// Everything the rules of one request may look at.
///
/// Path parameters are extracted by the router before any rule runs.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
  params: HashMap<String, String>,
  body: Value,
}

impl RequestInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.params.insert(name.into(), value.into());
    self
  }

  pub fn with_body(mut self, body: Value) -> Self {
    self.body = body;
    self
  }

  pub fn param(&self, name: &str) -> Option<&str> {
    self.params.get(name).map(String::as_str)
  }

  pub fn body(&self) -> &Value {
    &self.body
  }

  /// A top-level body field. `None` when the field is absent or the body is not an object.
  pub fn body_field(&self, name: &str) -> Option<&Value> {
    self.body.get(name)
  }

  /// Resolves `target` to a JSON value; path parameters become JSON strings.
  pub fn lookup(&self, target: &Target) -> Option<Cow<'_, Value>> {
    match target {
      Target::Param(name) => self.param(name).map(|v| Cow::Owned(Value::String(v.to_string()))),
      Target::Body(name) => self.body_field(name).map(Cow::Borrowed),
    }
  }
}
