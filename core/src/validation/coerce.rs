// core/src/validation/coerce.rs

//! Value coercions shared by the constraints and by handlers reading validated input.
//!
//! Each constraint passes exactly when the matching coercion returns `Some`, so a
//! handler that runs after validation can coerce without a second error path.

use serde_json::Value;

/// Integers: JSON integers within `i64`, or base-10 strings with an optional sign
/// and no leading zeros (`0` itself is fine).
pub fn integer(value: Option<&Value>) -> Option<i64> {
  match value? {
    Value::Number(n) => n.as_i64(),
    Value::String(s) if is_integer_str(s) => s.parse::<i64>().ok(),
    _ => None,
  }
}

fn is_integer_str(s: &str) -> bool {
  let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
  !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && (digits == "0" || !digits.starts_with('0'))
}

/// Numbers: any JSON number, or a string matching `[+-]?digits[.digits]` / `[+-]?.digits`.
pub fn number(value: Option<&Value>) -> Option<f64> {
  match value? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) if is_numeric_str(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
    _ => None,
  }
}

/// Booleans: JSON booleans, `"true"`/`"false"`/`"1"`/`"0"`, and the numbers `1`/`0`.
pub fn boolean(value: Option<&Value>) -> Option<bool> {
  match value? {
    Value::Bool(b) => Some(*b),
    Value::String(s) => match s.as_str() {
      "true" | "1" => Some(true),
      "false" | "0" => Some(false),
      _ => None,
    },
    Value::Number(n) => match n.as_u64() {
      Some(1) => Some(true),
      Some(0) => Some(false),
      _ => None,
    },
    _ => None,
  }
}

/// Non-empty text: non-empty strings, or numbers and booleans in their display form.
pub fn text(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

pub fn is_numeric_str(s: &str) -> bool {
  let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
  let (int_part, frac_part) = match unsigned.split_once('.') {
    Some((int_part, frac_part)) => (int_part, Some(frac_part)),
    None => (unsigned, None),
  };
  let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
  match frac_part {
    Some(frac) => !frac.is_empty() && all_digits(frac) && all_digits(int_part),
    None => !int_part.is_empty() && all_digits(int_part),
  }
}
