use plotters::prelude::*;

use crate::RenderError;
use crate::sampling::{DEFAULT_SAMPLE_COUNT, SampleSet};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const DEFAULT_TITLE: &str = "Function Plot";
/// Accepted image sides in display pixels.
pub const MIN_DIMENSION: u32 = 100;
pub const MAX_DIMENSION: u32 = 20_000;
/// Internal rendering resolution multiplier for sub-pixel precision.
/// Plotters maps to integer coordinates, so we render at a higher resolution
/// and scale down via SVG viewBox to get smooth curves.
pub(crate) const RESOLUTION_SCALE: u32 = 10;

const LINE_COLOR: RGBColor = RGBColor(0x5E, 0x81, 0xB5);
const AXIS_COLOR: RGBColor = RGBColor(0x66, 0x66, 0x66);
const ORIGIN_COLOR: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);

// Layout in display pixels
const MARGIN: f64 = 10.0;
const TITLE_AREA: f64 = 25.0;
const X_LABEL_AREA: f64 = 41.0;
const Y_LABEL_AREA: f64 = 58.0;
const TICK_LENGTH: f64 = 4.0;
const FONT_SIZE: f64 = 11.0;
const TITLE_FONT_SIZE: f64 = 13.0;

const MAX_TICKS: usize = 12;

/// Settings of a plot request that are not typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
  pub samples: usize,
  pub width: u32,
  pub height: u32,
  pub title: String,
  pub x_label: String,
  pub y_label: String,
}

impl Default for PlotConfig {
  fn default() -> Self {
    Self {
      samples: DEFAULT_SAMPLE_COUNT,
      width: DEFAULT_WIDTH,
      height: DEFAULT_HEIGHT,
      title: DEFAULT_TITLE.to_string(),
      x_label: "x".to_string(),
      y_label: "y".to_string(),
    }
  }
}

/// What the plotting surface currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
  pub samples: SampleSet,
  pub svg: String,
}

/// Split points into contiguous finite segments, breaking at NaN/Infinity
pub(crate) fn split_into_segments(
  points: impl Iterator<Item = (f64, f64)>,
) -> Vec<Vec<(f64, f64)>> {
  let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
  let mut current: Vec<(f64, f64)> = Vec::new();

  for (x, y) in points {
    if y.is_finite() {
      current.push((x, y));
    } else if current.len() > 1 {
      segments.push(std::mem::take(&mut current));
    } else {
      current.clear();
    }
  }
  if current.len() > 1 {
    segments.push(current);
  }
  segments
}

/// Round `raw` up to 1, 2 or 5 times a power of ten.
pub(crate) fn nice_step(raw: f64) -> f64 {
  let mag = 10_f64.powf(raw.abs().log10().floor());
  let norm = raw / mag;
  let nice = if norm <= 1.0 {
    1.0
  } else if norm <= 2.0 {
    2.0
  } else if norm <= 5.0 {
    5.0
  } else {
    10.0
  };
  nice * mag
}

/// Format a tick value to the precision of its tick step.
///
/// Very large and very small values switch to exponent notation.
pub(crate) fn format_tick(v: f64, step: f64) -> String {
  if v == 0.0 {
    return "0".to_string();
  }
  let step_exponent = step.abs().log10().floor();
  let magnitude = v.abs();
  if (1e-4..1e15).contains(&magnitude) {
    let decimals = (-step_exponent).max(0.0) as usize;
    format!("{v:.decimals$}")
  } else {
    let digits = (magnitude.log10().floor() - step_exponent).max(0.0) as usize;
    let formatted = format!("{v:.digits$e}");
    match formatted.split_once('e') {
      Some((mantissa, exponent)) if mantissa.contains('.') => format!(
        "{}e{exponent}",
        mantissa.trim_end_matches('0').trim_end_matches('.')
      ),
      _ => formatted,
    }
  }
}

/// A plot axis over `lo < hi`, both finite.
///
/// Positions are computed from halved values, so an axis wider than
/// `f64::MAX` still maps onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Axis {
  lo: f64,
  hi: f64,
}

impl Axis {
  /// Where `v` sits along the axis: 0 at `lo`, 1 at `hi`.
  pub(crate) fn fraction(&self, v: f64) -> f64 {
    (v / 2.0 - self.lo / 2.0) / (self.hi / 2.0 - self.lo / 2.0)
  }

  fn contains(&self, v: f64) -> bool {
    self.lo < v && v < self.hi
  }

  /// Labelled tick values and their common step, about five per axis.
  pub(crate) fn ticks(&self) -> (Vec<f64>, f64) {
    let step = nice_step(self.hi / 5.0 - self.lo / 5.0);
    let first = (self.lo / step).ceil();
    let last = (self.hi / step).floor();
    if !(first <= last) {
      return (Vec::new(), step);
    }
    let count = ((last - first) as usize + 1).min(MAX_TICKS);
    let ticks: Vec<f64> = (0..count)
      .map(|i| (first + i as f64) * step)
      .filter(|t| self.lo <= *t && *t <= self.hi)
      .collect();
    (ticks, step)
  }
}

/// Y axis: the finite data range padded by 4%, or `[-1, 1]` when nothing
/// finite was sampled. Padding saturates at the largest finite values.
pub(crate) fn y_axis(samples: &SampleSet) -> Axis {
  match samples.finite_y_range() {
    None => Axis { lo: -1.0, hi: 1.0 },
    Some((lo, hi)) => {
      let half_span = hi / 2.0 - lo / 2.0;
      let padding = if half_span > 0.0 {
        half_span * 0.08
      } else {
        (lo.abs() * 0.04).max(1.0)
      };
      Axis {
        lo: (lo - padding).max(f64::MIN),
        hi: (hi + padding).min(f64::MAX),
      }
    }
  }
}

/// Plot area in render pixels together with the axes it shows.
struct Frame {
  x: Axis,
  y: Axis,
  left: f64,
  top: f64,
  width: f64,
  height: f64,
}

impl Frame {
  fn new(x: Axis, y: Axis, render_width: u32, render_height: u32) -> Self {
    let s = RESOLUTION_SCALE as f64;
    let left = (MARGIN + Y_LABEL_AREA) * s;
    let top = TITLE_AREA * s;
    Frame {
      x,
      y,
      left,
      top,
      width: render_width as f64 - left - MARGIN * s,
      height: render_height as f64 - top - (MARGIN + X_LABEL_AREA) * s,
    }
  }

  fn right(&self) -> f64 {
    self.left + self.width
  }

  fn bottom(&self) -> f64 {
    self.top + self.height
  }

  fn x_pixel(&self, x: f64) -> f64 {
    self.left + self.x.fraction(x) * self.width
  }

  fn y_pixel(&self, y: f64) -> f64 {
    self.bottom() - self.y.fraction(y) * self.height
  }

  fn point(&self, (x, y): (f64, f64)) -> (i32, i32) {
    (pixel(self.x_pixel(x)), pixel(self.y_pixel(y)))
  }
}

fn pixel(v: f64) -> i32 {
  v.round() as i32
}

fn backend_error(e: impl std::fmt::Display) -> RenderError {
  RenderError::Backend(e.to_string())
}

fn render_size(width: u32, height: u32) -> Result<(u32, u32), RenderError> {
  let accepted = MIN_DIMENSION..=MAX_DIMENSION;
  if !accepted.contains(&width) || !accepted.contains(&height) {
    return Err(RenderError::Backend(format!(
      "image size {width}x{height} is outside {MIN_DIMENSION}..={MAX_DIMENSION}"
    )));
  }
  Ok((width * RESOLUTION_SCALE, height * RESOLUTION_SCALE))
}

/// Render `samples` as an SVG line plot with title and axis labels.
///
/// Non-finite y values break the curve into separate segments.
pub fn render_svg(
  samples: &SampleSet,
  config: &PlotConfig,
) -> Result<String, RenderError> {
  let x_axis = match (samples.xs().first(), samples.xs().last()) {
    (Some(&lo), Some(&hi)) if lo < hi => Axis { lo, hi },
    _ => {
      return Err(RenderError::Backend(
        "need at least two increasing x values".into(),
      ));
    }
  };
  let (render_width, render_height) = render_size(config.width, config.height)?;
  let frame = Frame::new(x_axis, y_axis(samples), render_width, render_height);
  let (x_ticks, x_step) = frame.x.ticks();
  let (y_ticks, y_step) = frame.y.ticks();

  let tick = TICK_LENGTH * RESOLUTION_SCALE as f64;
  let (left, top) = (pixel(frame.left), pixel(frame.top));
  let (right, bottom) = (pixel(frame.right()), pixel(frame.bottom()));

  let mut buf = String::new();
  {
    let root = SVGBackend::with_string(&mut buf, (render_width, render_height))
      .into_drawing_area();
    root.fill(&WHITE).map_err(backend_error)?;

    let line = |points: Vec<(i32, i32)>, style: ShapeStyle| {
      root
        .draw(&PathElement::new(points, style))
        .map_err(backend_error)
    };

    // Lighter origin lines through x=0 and y=0 if visible
    let origin = ORIGIN_COLOR.stroke_width(RESOLUTION_SCALE);
    if frame.y.contains(0.0) {
      let y0 = pixel(frame.y_pixel(0.0));
      line(vec![(left, y0), (right, y0)], origin)?;
    }
    if frame.x.contains(0.0) {
      let x0 = pixel(frame.x_pixel(0.0));
      line(vec![(x0, top), (x0, bottom)], origin)?;
    }

    let axis = AXIS_COLOR.stroke_width(RESOLUTION_SCALE);
    line(vec![(left, top), (left, bottom), (right, bottom)], axis)?;
    for &t in &x_ticks {
      let x = pixel(frame.x_pixel(t));
      line(vec![(x, bottom), (x, pixel(frame.bottom() + tick))], axis)?;
    }
    for &t in &y_ticks {
      let y = pixel(frame.y_pixel(t));
      line(vec![(pixel(frame.left - tick), y), (left, y)], axis)?;
    }

    for segment in split_into_segments(samples.points()) {
      let points = segment.into_iter().map(|p| frame.point(p)).collect();
      line(points, LINE_COLOR.stroke_width(15))?; // 1.5px at display size
    }

    root.present().map_err(backend_error)?;
  }

  rewrite_svg_header(
    &mut buf,
    config.width,
    config.height,
    render_width,
    render_height,
  );

  // Tick labels, title and axis labels go in as plain SVG text before </svg>
  let sf = RESOLUTION_SCALE as f64;
  let font_size = FONT_SIZE * sf;
  let mut labels_svg = String::new();
  for &t in &x_ticks {
    labels_svg.push_str(&text_element(
      (frame.x_pixel(t), frame.bottom() + tick + font_size),
      "middle",
      font_size,
      "#666",
      "",
      &format_tick(t, x_step),
    ));
  }
  let y_label_x = frame.left - tick - font_size * 0.4;
  for &t in &y_ticks {
    labels_svg.push_str(&text_element(
      (y_label_x, frame.y_pixel(t) + font_size * 0.35),
      "end",
      font_size,
      "#666",
      "",
      &format_tick(t, y_step),
    ));
  }

  let center_x = frame.left + frame.width / 2.0;
  if !config.x_label.is_empty() {
    labels_svg.push_str(&text_element(
      (center_x, frame.bottom() + font_size * 2.8),
      "middle",
      font_size,
      "#666",
      "",
      &config.x_label,
    ));
  }
  if !config.y_label.is_empty() {
    let lx = MARGIN * sf + font_size * 0.8;
    let cy = frame.top + frame.height / 2.0;
    labels_svg.push_str(&text_element(
      (lx, cy),
      "middle",
      font_size,
      "#666",
      &format!(" transform=\"rotate(-90,{lx:.1},{cy:.1})\""),
      &config.y_label,
    ));
  }
  if !config.title.is_empty() {
    let title_font_size = TITLE_FONT_SIZE * sf;
    labels_svg.push_str(&text_element(
      (center_x, frame.top - title_font_size * 0.5),
      "middle",
      title_font_size,
      "#333",
      "",
      &config.title,
    ));
  }

  if let Some(insert_pos) = buf.rfind("</svg>") {
    buf.insert_str(insert_pos, &labels_svg);
  }
  Ok(buf)
}

fn text_element(
  (x, y): (f64, f64),
  anchor: &str,
  font_size: f64,
  fill: &str,
  attributes: &str,
  text: &str,
) -> String {
  format!(
    "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"{anchor}\" \
     font-family=\"sans-serif\" font-size=\"{font_size:.0}\" \
     fill=\"{fill}\"{attributes}>{}</text>\n",
    html_escape(text)
  )
}

/// Escape special characters for SVG text content.
fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}

/// Rewrite the SVG header to use viewBox for display scaling.
fn rewrite_svg_header(
  buf: &mut String,
  svg_width: u32,
  svg_height: u32,
  render_width: u32,
  render_height: u32,
) {
  if let Some(pos) = buf.find('>') {
    let new_header = format!(
      "<svg width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" preserveAspectRatio=\"xMidYMid meet\" xmlns=\"http://www.w3.org/2000/svg\"",
      svg_width, svg_height, render_width, render_height,
    );
    buf.replace_range(..pos, &new_header);
  }
}
