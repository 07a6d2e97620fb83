use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use function_plotter::functions::plot::{MAX_DIMENSION, MIN_DIMENSION};
use function_plotter::{FunctionPlotter, PlotConfig, PlotRequest, SampleSet};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Write logs to this file instead of stderr
  #[arg(long, global = true)]
  log: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// The function and domain of one plot request
#[derive(clap::Args)]
struct Request {
  /// Expression in x, e.g. "x^2 - 3*sin(x)"
  #[arg(allow_hyphen_values = true)]
  function: String,

  /// Lower bound of the domain
  #[arg(long, allow_hyphen_values = true)]
  min: String,

  /// Upper bound of the domain
  #[arg(long, allow_hyphen_values = true)]
  max: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
  Table,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Render the function over [min, max] to an SVG file
  Plot {
    #[command(flatten)]
    request: Request,

    /// Output file
    #[arg(short, long, default_value = "plot.svg")]
    output: PathBuf,

    /// Number of evenly spaced sample points
    #[arg(long, default_value_t = function_plotter::DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Image width in pixels
    #[arg(
      long,
      default_value_t = function_plotter::functions::plot::DEFAULT_WIDTH,
      value_parser = clap::value_parser!(u32)
        .range(i64::from(MIN_DIMENSION)..=i64::from(MAX_DIMENSION))
    )]
    width: u32,

    /// Image height in pixels
    #[arg(
      long,
      default_value_t = function_plotter::functions::plot::DEFAULT_HEIGHT,
      value_parser = clap::value_parser!(u32)
        .range(i64::from(MIN_DIMENSION)..=i64::from(MAX_DIMENSION))
    )]
    height: u32,

    /// Plot title
    #[arg(long, default_value = function_plotter::functions::plot::DEFAULT_TITLE)]
    title: String,
  },
  /// Print whether the request is plottable
  Validate {
    #[command(flatten)]
    request: Request,
  },
  /// Print the sampled points
  Sample {
    #[command(flatten)]
    request: Request,

    /// Number of evenly spaced sample points
    #[arg(long, default_value_t = function_plotter::DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
  },
}

fn init_logging(verbose: u8, log: Option<PathBuf>) -> Result<()> {
  let level = match verbose {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  };
  match log {
    Some(log_path) => {
      let file = std::fs::File::create(&log_path).with_context(|| {
        format!("cannot create log file {}", log_path.display())
      })?;
      let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .finish();
      tracing::subscriber::set_global_default(subscriber)?;
    }
    None => {
      let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
      tracing::subscriber::set_global_default(subscriber)?;
    }
  }
  Ok(())
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_logging(cli.verbose, cli.log)?;

  match cli.command {
    Commands::Plot {
      request,
      output,
      samples,
      width,
      height,
      title,
    } => {
      let config = PlotConfig {
        samples,
        width,
        height,
        title,
        ..Default::default()
      };
      let mut plotter = FunctionPlotter::new(config);
      plotter.set_inputs(&request.function, &request.min, &request.max);
      match plotter.plot() {
        Ok(figure) => {
          std::fs::write(&output, &figure.svg).with_context(|| {
            format!("cannot write plot to {}", output.display())
          })?;
          println!("{}", output.display());
          Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
          eprintln!("{}", failure.alert());
          Ok(ExitCode::FAILURE)
        }
      }
    }
    Commands::Validate { request } => {
      let request =
        PlotRequest::from_fields(&request.function, &request.min, &request.max);
      println!("{}", request.is_valid());
      Ok(ExitCode::SUCCESS)
    }
    Commands::Sample {
      request,
      samples,
      format,
    } => {
      let request =
        PlotRequest::from_fields(&request.function, &request.min, &request.max);
      let (compiled, domain) = match request.check() {
        Ok(valid) => valid,
        Err(reason) => {
          eprintln!("Error: {reason}");
          return Ok(ExitCode::FAILURE);
        }
      };
      print_samples(&compiled.sample(&domain, samples), format)?;
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn print_samples(samples: &SampleSet, format: Format) -> Result<()> {
  match format {
    Format::Table => {
      println!("x\ty");
      for (x, y) in samples.points() {
        println!("{x}\t{y}");
      }
    }
    Format::Json => {
      // non-finite values become null
      let value = serde_json::json!({
        "x": samples.xs(),
        "y": samples.ys(),
      });
      println!("{}", serde_json::to_string_pretty(&value)?);
    }
  }
  Ok(())
}
