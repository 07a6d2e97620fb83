use tracing::debug;

use crate::functions::math::{Builtin, floored_modulo, lookup_constant};
use crate::syntax::{
  BinaryOperator, Expr, UnaryOperator, normalize_power_operator, pair_to_expr,
};
use crate::{ExpressionError, parse};

/// The one free variable an expression may mention.
pub const VARIABLE: &str = "x";

/// Expression tree with every name resolved, so evaluation cannot fail.
#[derive(Debug, Clone, PartialEq)]
enum Node {
  Constant(f64),
  Variable,
  Unary(UnaryOperator, Box<Node>),
  Binary(BinaryOperator, Box<Node>, Box<Node>),
  Call(Builtin, Vec<Node>),
}

/// A function string compiled into a callable of `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
  expr: Expr,
  body: Node,
}

/// Compile a user function string.
///
/// `^` is accepted as a synonym for `**`. Any syntax error, unknown name,
/// or call with the wrong number of arguments is reported here rather
/// than at evaluation time.
pub fn compile(function: &str) -> Result<CompiledFunction, ExpressionError> {
  let normalized = normalize_power_operator(function);
  let mut pairs = parse(&normalized)?;
  let program = match pairs.next() {
    Some(program) => program,
    None => unreachable!("a successful parse yields a Program"),
  };
  let expr = pair_to_expr(program);
  let body = resolve(&expr)?;
  debug!(function, parsed = %expr, "compiled expression");
  Ok(CompiledFunction { expr, body })
}

fn resolve(expr: &Expr) -> Result<Node, ExpressionError> {
  match expr {
    Expr::Real(value) => Ok(Node::Constant(*value)),
    Expr::Identifier(name) if name == VARIABLE => Ok(Node::Variable),
    Expr::Identifier(name) => lookup_constant(name)
      .map(Node::Constant)
      .ok_or_else(|| ExpressionError::UnknownSymbol(name.clone())),
    Expr::FunctionCall { name, args } => {
      let builtin = Builtin::lookup(name)
        .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
      let arity = builtin.arity();
      if !arity.accepts(args.len()) {
        return Err(ExpressionError::Arity {
          name: name.clone(),
          expected: arity.to_string(),
          found: args.len(),
        });
      }
      let args = args.iter().map(resolve).collect::<Result<Vec<_>, _>>()?;
      Ok(Node::Call(builtin, args))
    }
    Expr::UnaryOp { op, operand } => {
      Ok(Node::Unary(*op, Box::new(resolve(operand)?)))
    }
    Expr::BinaryOp { op, left, right } => Ok(Node::Binary(
      *op,
      Box::new(resolve(left)?),
      Box::new(resolve(right)?),
    )),
  }
}

impl Node {
  fn eval(&self, x: f64) -> f64 {
    match self {
      Node::Constant(value) => *value,
      Node::Variable => x,
      Node::Unary(UnaryOperator::Plus, operand) => operand.eval(x),
      Node::Unary(UnaryOperator::Minus, operand) => -operand.eval(x),
      Node::Binary(op, left, right) => {
        let (a, b) = (left.eval(x), right.eval(x));
        match op {
          BinaryOperator::Plus => a + b,
          BinaryOperator::Minus => a - b,
          BinaryOperator::Times => a * b,
          BinaryOperator::Divide => a / b,
          BinaryOperator::FloorDivide => (a / b).floor(),
          BinaryOperator::Modulo => floored_modulo(a, b),
          BinaryOperator::Power => a.powf(b),
        }
      }
      Node::Call(builtin, args) => {
        let values: Vec<f64> = args.iter().map(|arg| arg.eval(x)).collect();
        builtin.apply(&values)
      }
    }
  }
}

impl CompiledFunction {
  /// Evaluate at `x`. Division by zero, domain errors and overflow come
  /// back as the IEEE result (infinity or NaN).
  pub fn eval(&self, x: f64) -> f64 {
    self.body.eval(x)
  }

  /// The parsed expression, with `^` already rewritten.
  pub fn expr(&self) -> &Expr {
    &self.expr
  }
}
