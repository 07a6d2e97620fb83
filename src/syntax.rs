use pest::iterators::Pair;
use std::fmt;

use crate::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  FloorDivide,
  Modulo,
  Power,
}

impl BinaryOperator {
  fn from_token(token: &str) -> Self {
    match token {
      "+" => Self::Plus,
      "-" => Self::Minus,
      "*" => Self::Times,
      "/" => Self::Divide,
      "//" => Self::FloorDivide,
      "%" => Self::Modulo,
      "**" => Self::Power,
      other => unreachable!("grammar admitted unknown operator {other:?}"),
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      Self::Plus => "+",
      Self::Minus => "-",
      Self::Times => "*",
      Self::Divide => "/",
      Self::FloorDivide => "//",
      Self::Modulo => "%",
      Self::Power => "**",
    }
  }

  fn precedence(self) -> u8 {
    match self {
      Self::Plus | Self::Minus => 1,
      Self::Times | Self::Divide | Self::FloorDivide | Self::Modulo => 2,
      Self::Power => 4,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Plus,
  Minus,
}

impl UnaryOperator {
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Plus => "+",
      Self::Minus => "-",
    }
  }
}

const UNARY_PRECEDENCE: u8 = 3;

/// Parsed expression, before any names are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Real(f64),
  Identifier(String),
  FunctionCall {
    name: String,
    args: Vec<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
}

/// Rewrite calculator-style `^` exponentiation into `**`.
///
/// Validation and evaluation both go through this, so whatever validates
/// also evaluates.
pub fn normalize_power_operator(input: &str) -> String {
  input.replace('^', "**")
}

/// Convert a pest pair from the expression grammar into an `Expr`.
pub fn pair_to_expr(pair: Pair<Rule>) -> Expr {
  match pair.as_rule() {
    Rule::Program => {
      let inner = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::Expression);
      match inner {
        Some(expression) => pair_to_expr(expression),
        None => unreachable!("Program always wraps an Expression"),
      }
    }
    Rule::Expression | Rule::Term => fold_left_associative(pair),
    Rule::Factor => {
      let mut inner = pair.into_inner();
      let first = next_pair(&mut inner);
      if first.as_rule() == Rule::UnaryOperator {
        let op = match first.as_str() {
          "-" => UnaryOperator::Minus,
          _ => UnaryOperator::Plus,
        };
        let operand = pair_to_expr(next_pair(&mut inner));
        Expr::UnaryOp {
          op,
          operand: Box::new(operand),
        }
      } else {
        pair_to_expr(first)
      }
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = pair_to_expr(next_pair(&mut inner));
      match inner.next() {
        // PowerOperator, then the exponent Factor
        Some(_) => {
          let exponent = pair_to_expr(next_pair(&mut inner));
          Expr::BinaryOp {
            op: BinaryOperator::Power,
            left: Box::new(base),
            right: Box::new(exponent),
          }
        }
        None => base,
      }
    }
    Rule::Group => pair_to_expr(next_pair(&mut pair.into_inner())),
    Rule::FunctionCall => {
      let mut inner = pair.into_inner();
      let name = next_pair(&mut inner).as_str().to_string();
      let args = inner.map(pair_to_expr).collect();
      Expr::FunctionCall { name, args }
    }
    // The grammar only admits literals Rust can read as f64; overflow
    // saturates to infinity.
    Rule::Number => Expr::Real(pair.as_str().parse().unwrap_or(f64::NAN)),
    Rule::Identifier => Expr::Identifier(pair.as_str().to_string()),
    rule => unreachable!("unexpected rule in expression tree: {rule:?}"),
  }
}

fn next_pair<'i>(pairs: &mut pest::iterators::Pairs<'i, Rule>) -> Pair<'i, Rule> {
  match pairs.next() {
    Some(pair) => pair,
    None => unreachable!("grammar guarantees the operand is present"),
  }
}

/// `a op b op c` → `(a op b) op c` for the `+ -` and `* / // %` levels.
fn fold_left_associative(pair: Pair<Rule>) -> Expr {
  let mut inner = pair.into_inner();
  let mut acc = pair_to_expr(next_pair(&mut inner));
  while let Some(op_pair) = inner.next() {
    let op = BinaryOperator::from_token(op_pair.as_str());
    let right = pair_to_expr(next_pair(&mut inner));
    acc = Expr::BinaryOp {
      op,
      left: Box::new(acc),
      right: Box::new(right),
    };
  }
  acc
}

impl Expr {
  fn precedence(&self) -> u8 {
    match self {
      Expr::BinaryOp { op, .. } => op.precedence(),
      Expr::UnaryOp { .. } => UNARY_PRECEDENCE,
      _ => u8::MAX,
    }
  }

  fn fmt_operand(
    &self,
    f: &mut fmt::Formatter<'_>,
    needs_parens: bool,
  ) -> fmt::Result {
    if needs_parens {
      write!(f, "({self})")
    } else {
      write!(f, "{self}")
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Real(value) => write!(f, "{value}"),
      Expr::Identifier(name) => write!(f, "{name}"),
      Expr::FunctionCall { name, args } => {
        write!(f, "{name}(")?;
        for (i, arg) in args.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{arg}")?;
        }
        write!(f, ")")
      }
      Expr::UnaryOp { op, operand } => {
        write!(f, "{}", op.symbol())?;
        // -x**2 prints as-is, but -(a + b) keeps its parentheses
        operand.fmt_operand(f, operand.precedence() < UNARY_PRECEDENCE)
      }
      Expr::BinaryOp { op, left, right } => {
        let prec = op.precedence();
        let (left_parens, right_parens) = if *op == BinaryOperator::Power {
          // right associative; a unary base must be grouped: (-x)**2
          (left.precedence() <= prec, right.precedence() < UNARY_PRECEDENCE)
        } else {
          (left.precedence() < prec, right.precedence() <= prec)
        };
        left.fmt_operand(f, left_parens)?;
        write!(f, " {} ", op.symbol())?;
        right.fmt_operand(f, right_parens)
      }
    }
  }
}
