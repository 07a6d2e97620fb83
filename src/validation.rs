use std::fmt;

use tracing::trace;

use crate::InvalidInput;
use crate::evaluator::{CompiledFunction, compile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
  Min,
  Max,
}

impl fmt::Display for Bound {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Bound::Min => write!(f, "min"),
      Bound::Max => write!(f, "max"),
    }
  }
}

/// Raw text of one plot action, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotRequest {
  pub function: String,
  pub min: String,
  pub max: String,
}

impl PlotRequest {
  pub fn new(
    function: impl Into<String>,
    min: impl Into<String>,
    max: impl Into<String>,
  ) -> Self {
    Self {
      function: function.into(),
      min: min.into(),
      max: max.into(),
    }
  }

  /// Build a request from input fields, dropping surrounding whitespace.
  pub fn from_fields(function: &str, min: &str, max: &str) -> Self {
    Self::new(function.trim(), min.trim(), max.trim())
  }

  pub fn check(
    &self,
  ) -> Result<(CompiledFunction, ValidatedDomain), InvalidInput> {
    check(&self.function, &self.min, &self.max)
  }

  pub fn is_valid(&self) -> bool {
    self.check().is_ok()
  }
}

/// A finite, non-empty interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedDomain {
  lower: f64,
  upper: f64,
}

impl ValidatedDomain {
  pub fn new(lower: f64, upper: f64) -> Result<Self, InvalidInput> {
    if !lower.is_finite() {
      return Err(InvalidInput::NotANumber {
        bound: Bound::Min,
        text: lower.to_string(),
      });
    }
    if !upper.is_finite() {
      return Err(InvalidInput::NotANumber {
        bound: Bound::Max,
        text: upper.to_string(),
      });
    }
    if lower >= upper {
      return Err(InvalidInput::EmptyDomain {
        min: lower,
        max: upper,
      });
    }
    Ok(Self { lower, upper })
  }

  pub fn lower(&self) -> f64 {
    self.lower
  }

  pub fn upper(&self) -> f64 {
    self.upper
  }

  /// `upper - lower`; infinite when the bounds are more than `f64::MAX`
  /// apart.
  pub fn width(&self) -> f64 {
    self.upper - self.lower
  }
}

/// Check a function string and its bounds, reporting the first problem.
///
/// Checks run in a fixed order: function present, function compiles,
/// bounds present, bounds numeric, `min < max`.
pub fn check(
  function: &str,
  min: &str,
  max: &str,
) -> Result<(CompiledFunction, ValidatedDomain), InvalidInput> {
  if function.is_empty() {
    return Err(InvalidInput::EmptyFunction);
  }
  let compiled = compile(function)?;

  if min.is_empty() {
    return Err(InvalidInput::EmptyBound(Bound::Min));
  }
  if max.is_empty() {
    return Err(InvalidInput::EmptyBound(Bound::Max));
  }
  let lower = parse_bound(Bound::Min, min)?;
  let upper = parse_bound(Bound::Max, max)?;

  let domain = ValidatedDomain::new(lower, upper)?;
  Ok((compiled, domain))
}

/// Boolean form of [`check`]: `true` only when every check passes.
pub fn validate(function: &str, min: &str, max: &str) -> bool {
  match check(function, min, max) {
    Ok(_) => true,
    Err(reason) => {
      trace!(function, min, max, %reason, "rejected plot request");
      false
    }
  }
}

fn parse_bound(bound: Bound, text: &str) -> Result<f64, InvalidInput> {
  match text.trim().parse::<f64>() {
    Ok(value) if value.is_finite() => Ok(value),
    _ => Err(InvalidInput::NotANumber {
      bound,
      text: text.to_string(),
    }),
  }
}
