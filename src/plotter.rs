//! Stateful adapter between input fields and the plotting surface.
//!
//! A front end (window, terminal, test) writes the three text fields,
//! calls [`FunctionPlotter::plot`], and either shows the resulting
//! [`Figure`] or the returned [`Alert`].

use thiserror::Error;
use tracing::{debug, info};

use crate::functions::plot::{Figure, PlotConfig, render_svg};
use crate::validation::PlotRequest;
use crate::{InvalidInput, RenderError};

pub const INVALID_INPUT_TITLE: &str = "Invalid Input";
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid input.";

/// A blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
  pub title: String,
  pub message: String,
}

impl std::fmt::Display for Alert {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.title, self.message)
  }
}

#[derive(Error, Debug)]
pub enum PlotFailure {
  #[error(transparent)]
  InvalidInput(#[from] InvalidInput),
  #[error(transparent)]
  Render(#[from] RenderError),
}

impl PlotFailure {
  /// What the user gets to see. Every kind of invalid input maps to the
  /// same generic alert.
  pub fn alert(&self) -> Alert {
    match self {
      PlotFailure::InvalidInput(_) => Alert {
        title: INVALID_INPUT_TITLE.to_string(),
        message: INVALID_INPUT_MESSAGE.to_string(),
      },
      PlotFailure::Render(e) => Alert {
        title: "Plot Error".to_string(),
        message: e.to_string(),
      },
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionPlotter {
  pub function_input: String,
  pub min_input: String,
  pub max_input: String,
  config: PlotConfig,
  figure: Option<Figure>,
}

impl FunctionPlotter {
  pub fn new(config: PlotConfig) -> Self {
    Self {
      config,
      ..Default::default()
    }
  }

  pub fn set_inputs(&mut self, function: &str, min: &str, max: &str) {
    self.function_input = function.to_string();
    self.min_input = min.to_string();
    self.max_input = max.to_string();
  }

  pub fn config(&self) -> &PlotConfig {
    &self.config
  }

  /// The plot currently on the surface, if any.
  pub fn figure(&self) -> Option<&Figure> {
    self.figure.as_ref()
  }

  /// Validate the current inputs, then sample and render them.
  ///
  /// On invalid input the previous figure stays as it was. Otherwise the
  /// previous figure is cleared before the new one is produced.
  pub fn plot(&mut self) -> Result<&Figure, PlotFailure> {
    let request = PlotRequest::from_fields(
      &self.function_input,
      &self.min_input,
      &self.max_input,
    );
    let (compiled, domain) = request.check().map_err(|reason| {
      debug!(?request, %reason, "invalid plot request");
      reason
    })?;

    self.figure = None;
    let samples = compiled.sample(&domain, self.config.samples);
    let svg = render_svg(&samples, &self.config)?;
    info!(
      function = %request.function,
      lower = domain.lower(),
      upper = domain.upper(),
      points = samples.len(),
      "plotted function"
    );
    Ok(self.figure.insert(Figure { samples, svg }))
  }
}
