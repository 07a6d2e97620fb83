use tracing::debug;

use crate::ExpressionError;
use crate::evaluator::{CompiledFunction, compile};
use crate::validation::ValidatedDomain;

/// Number of points a plot is sampled at.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// `count` evenly spaced values over `[lower, upper]`, both ends included.
///
/// One value yields `[lower]`, zero yields nothing. The last value is
/// exactly `upper` rather than the accumulated step.
pub fn linspace(lower: f64, upper: f64, count: usize) -> Vec<f64> {
  match count {
    0 => Vec::new(),
    1 => vec![lower],
    _ => {
      let intervals = (count - 1) as f64;
      let span = upper - lower;
      let mut values: Vec<f64> = if span.is_finite() {
        let step = span / intervals;
        (0..count).map(|i| lower + i as f64 * step).collect()
      } else {
        // Bounds more than f64::MAX apart: blend the endpoints instead
        (0..count)
          .map(|i| {
            let t = i as f64 / intervals;
            lower * (1.0 - t) + upper * t
          })
          .collect()
      };
      values[count - 1] = upper;
      values
    }
  }
}

/// Paired x and y values of one plotted curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
  xs: Vec<f64>,
  ys: Vec<f64>,
}

impl SampleSet {
  pub fn xs(&self) -> &[f64] {
    &self.xs
  }

  pub fn ys(&self) -> &[f64] {
    &self.ys
  }

  pub fn len(&self) -> usize {
    self.xs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.xs.is_empty()
  }

  pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
    self.xs.iter().copied().zip(self.ys.iter().copied())
  }

  /// Smallest and largest finite y value, if any.
  pub fn finite_y_range(&self) -> Option<(f64, f64)> {
    self
      .ys
      .iter()
      .copied()
      .filter(|y| y.is_finite())
      .fold(None, |range, y| match range {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
      })
  }

  pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
    (self.xs, self.ys)
  }
}

impl CompiledFunction {
  /// Evaluate at `count` evenly spaced points of `domain`.
  pub fn sample(&self, domain: &ValidatedDomain, count: usize) -> SampleSet {
    self.sample_range(domain.lower(), domain.upper(), count)
  }

  fn sample_range(&self, lower: f64, upper: f64, count: usize) -> SampleSet {
    let xs = linspace(lower, upper, count);
    let ys: Vec<f64> = xs.iter().map(|&x| self.eval(x)).collect();
    let non_finite = ys.iter().filter(|y| !y.is_finite()).count();
    debug!(lower, upper, count, non_finite, "sampled function");
    SampleSet { xs, ys }
  }
}

/// Compile `function` and sample it over `[lower, upper]`.
///
/// Meant to run after validation; the bounds are taken as given.
pub fn sample(
  function: &str,
  lower: f64,
  upper: f64,
  count: usize,
) -> Result<SampleSet, ExpressionError> {
  Ok(compile(function)?.sample_range(lower, upper, count))
}
