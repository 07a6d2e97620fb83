use std::fmt;

/// Named constants usable in place of `x`.
pub fn lookup_constant(name: &str) -> Option<f64> {
  match name {
    "pi" => Some(std::f64::consts::PI),
    "E" => Some(std::f64::consts::E),
    _ => None,
  }
}

/// How many arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  Exactly(usize),
  Between(usize, usize),
  AtLeast(usize),
}

impl Arity {
  pub fn accepts(self, count: usize) -> bool {
    match self {
      Arity::Exactly(n) => count == n,
      Arity::Between(lo, hi) => (lo..=hi).contains(&count),
      Arity::AtLeast(n) => count >= n,
    }
  }
}

impl fmt::Display for Arity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
    match *self {
      Arity::Exactly(n) => write!(f, "exactly {n} {}", plural(n)),
      Arity::Between(lo, hi) => write!(f, "{lo} or {hi} arguments"),
      Arity::AtLeast(n) => write!(f, "at least {n} {}", plural(n)),
    }
  }
}

/// Numeric functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
  Sin,
  Cos,
  Tan,
  Sec,
  Csc,
  Cot,
  Asin,
  Acos,
  Atan,
  Atan2,
  Sinh,
  Cosh,
  Tanh,
  Asinh,
  Acosh,
  Atanh,
  Exp,
  Log,
  Sqrt,
  Cbrt,
  Abs,
  Floor,
  Ceiling,
  Sign,
  Min,
  Max,
}

impl Builtin {
  pub fn lookup(name: &str) -> Option<Self> {
    let builtin = match name {
      "sin" => Self::Sin,
      "cos" => Self::Cos,
      "tan" => Self::Tan,
      "sec" => Self::Sec,
      "csc" => Self::Csc,
      "cot" => Self::Cot,
      "asin" => Self::Asin,
      "acos" => Self::Acos,
      "atan" => Self::Atan,
      "atan2" => Self::Atan2,
      "sinh" => Self::Sinh,
      "cosh" => Self::Cosh,
      "tanh" => Self::Tanh,
      "asinh" => Self::Asinh,
      "acosh" => Self::Acosh,
      "atanh" => Self::Atanh,
      "exp" => Self::Exp,
      "log" | "ln" => Self::Log,
      "sqrt" => Self::Sqrt,
      "cbrt" => Self::Cbrt,
      "abs" | "Abs" => Self::Abs,
      "floor" => Self::Floor,
      "ceiling" => Self::Ceiling,
      "sign" => Self::Sign,
      "Min" => Self::Min,
      "Max" => Self::Max,
      _ => return None,
    };
    Some(builtin)
  }

  pub fn arity(self) -> Arity {
    match self {
      Self::Log => Arity::Between(1, 2),
      Self::Atan2 => Arity::Exactly(2),
      Self::Min | Self::Max => Arity::AtLeast(1),
      _ => Arity::Exactly(1),
    }
  }

  /// Apply to already evaluated arguments. The argument count has been
  /// checked against `arity()` when the expression was compiled.
  pub fn apply(self, args: &[f64]) -> f64 {
    let a = args.first().copied().unwrap_or(f64::NAN);
    match self {
      Self::Sin => a.sin(),
      Self::Cos => a.cos(),
      Self::Tan => a.tan(),
      Self::Sec => 1.0 / a.cos(),
      Self::Csc => 1.0 / a.sin(),
      Self::Cot => 1.0 / a.tan(),
      Self::Asin => a.asin(),
      Self::Acos => a.acos(),
      Self::Atan => a.atan(),
      Self::Atan2 => a.atan2(args.get(1).copied().unwrap_or(f64::NAN)),
      Self::Sinh => a.sinh(),
      Self::Cosh => a.cosh(),
      Self::Tanh => a.tanh(),
      Self::Asinh => a.asinh(),
      Self::Acosh => a.acosh(),
      Self::Atanh => a.atanh(),
      Self::Exp => a.exp(),
      Self::Log => match args.get(1) {
        Some(base) => a.ln() / base.ln(),
        None => a.ln(),
      },
      Self::Sqrt => a.sqrt(),
      // real cube root, defined for negative arguments too
      Self::Cbrt => a.cbrt(),
      Self::Abs => a.abs(),
      Self::Floor => a.floor(),
      Self::Ceiling => a.ceil(),
      Self::Sign => sign(a),
      Self::Min => extremum(args, f64::min),
      Self::Max => extremum(args, f64::max),
    }
  }
}

/// -1, 0 or 1; NaN stays NaN. Unlike `f64::signum`, zero maps to zero.
fn sign(value: f64) -> f64 {
  if value.is_nan() || value == 0.0 {
    value
  } else {
    value.signum()
  }
}

/// Fold `args` with `pick`, propagating NaN instead of skipping it.
fn extremum(args: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
  if args.iter().any(|v| v.is_nan()) {
    return f64::NAN;
  }
  args.iter().copied().reduce(pick).unwrap_or(f64::NAN)
}

/// Python-style floored modulo: the result takes the sign of the divisor.
pub fn floored_modulo(a: f64, b: f64) -> f64 {
  let r = a % b;
  if r != 0.0 && (r < 0.0) != (b < 0.0) {
    r + b
  } else {
    r
  }
}
