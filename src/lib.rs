use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod evaluator;
pub mod functions;
pub mod plotter;
pub mod sampling;
pub mod syntax;
pub mod validation;

pub use evaluator::{CompiledFunction, compile};
pub use functions::plot::{Figure, PlotConfig, render_svg};
pub use plotter::{Alert, FunctionPlotter, PlotFailure};
pub use sampling::{DEFAULT_SAMPLE_COUNT, SampleSet, linspace, sample};
pub use validation::{Bound, PlotRequest, ValidatedDomain, check, validate};

#[derive(Parser)]
#[grammar = "expression.pest"]
pub struct ExpressionParser;

/// Reasons a function string cannot be turned into a callable of `x`.
#[derive(Error, Debug)]
pub enum ExpressionError {
  #[error("Parse error: {0}")]
  Syntax(#[from] Box<pest::error::Error<Rule>>),
  #[error("Unknown symbol: {0}")]
  UnknownSymbol(String),
  #[error("Unknown function: {0}")]
  UnknownFunction(String),
  #[error("{name} expects {expected}, got {found}")]
  Arity {
    name: String,
    expected: String,
    found: usize,
  },
}

/// Everything that can make a plot request unusable.
///
/// The UI only ever shows one generic message for all of these; the
/// variants exist for callers (and logs) that want to know which check
/// failed.
#[derive(Error, Debug)]
pub enum InvalidInput {
  #[error("Empty function")]
  EmptyFunction,
  #[error(transparent)]
  Expression(#[from] ExpressionError),
  #[error("Empty {0} value")]
  EmptyBound(Bound),
  #[error("Invalid {bound} value: {text:?} is not a finite number")]
  NotANumber { bound: Bound, text: String },
  #[error("Empty domain: min ({min}) must be less than max ({max})")]
  EmptyDomain { min: f64, max: f64 },
}

#[derive(Error, Debug)]
pub enum RenderError {
  #[error("Plot: {0}")]
  Backend(String),
}

impl ExpressionParser {
  pub fn parse_expression(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Parse an already normalized expression (`**` for powers) into pest pairs.
pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  ExpressionParser::parse_expression(input)
}
