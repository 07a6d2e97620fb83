use function_plotter::{ExpressionError, compile};

fn eval(function: &str, x: f64) -> f64 {
  compile(function).unwrap().eval(x)
}

fn assert_close(actual: f64, expected: f64) {
  assert!(
    (actual - expected).abs() < 1e-9,
    "expected {expected}, got {actual}"
  );
}

mod evaluator_tests {
  use super::*;

  mod arithmetic {
    use super::*;

    #[test]
    fn polynomial() {
      assert_eq!(eval("x^2", 3.0), 9.0);
      assert_eq!(eval("3*x**2 + 2*x + 1", 2.0), 17.0);
    }

    #[test]
    fn caret_and_double_star_agree() {
      for x in [-2.5, 0.0, 1.0, 4.0] {
        assert_eq!(eval("x^3 - 2^x", x), eval("x**3 - 2**x", x));
      }
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
      assert_eq!(eval("-x^2", 3.0), -9.0);
      assert_eq!(eval("(-x)^2", 3.0), 9.0);
      assert_eq!(eval("2^-x", 1.0), 0.5);
    }

    #[test]
    fn power_is_right_associative() {
      assert_eq!(eval("2^3^x", 2.0), 512.0);
    }

    #[test]
    fn floor_division() {
      assert_eq!(eval("x // 2", 7.0), 3.0);
      assert_eq!(eval("x // 2", -7.0), -4.0);
    }

    #[test]
    fn modulo_takes_sign_of_divisor() {
      assert_eq!(eval("x % 3", -7.0), 2.0);
      assert_eq!(eval("x % -3", 7.0), -2.0);
    }
  }

  mod functions {
    use super::*;

    #[test]
    fn trigonometric() {
      assert_close(eval("sin(x)", std::f64::consts::FRAC_PI_2), 1.0);
      assert_close(eval("cos(pi)", 0.0), -1.0);
      assert_close(eval("sec(x)", 0.0), 1.0);
      assert_close(eval("atan2(x, 1)", 1.0), std::f64::consts::FRAC_PI_4);
    }

    #[test]
    fn exponential_and_logarithm() {
      assert_close(eval("log(exp(x))", 2.5), 2.5);
      assert_close(eval("ln(E)", 0.0), 1.0);
      assert_close(eval("log(x, 10)", 1000.0), 3.0);
    }

    #[test]
    fn roots_and_rounding() {
      assert_eq!(eval("sqrt(x)", 16.0), 4.0);
      assert_close(eval("cbrt(x)", -27.0), -3.0);
      assert_eq!(eval("floor(x) + ceiling(x)", 1.5), 3.0);
      assert_eq!(eval("Abs(x) + abs(x)", -2.0), 4.0);
      assert_eq!(eval("sign(x)", 0.0), 0.0);
    }

    #[test]
    fn min_and_max() {
      assert_eq!(eval("Max(x, 0)", -3.0), 0.0);
      assert_eq!(eval("Min(x, 0, 2)", -3.0), -3.0);
    }
  }

  mod ieee_results {
    use super::*;

    #[test]
    fn division_by_zero_is_infinite() {
      assert_eq!(eval("1/x", 0.0), f64::INFINITY);
      assert!(eval("0/x", 0.0).is_nan());
    }

    #[test]
    fn domain_errors_are_nan() {
      assert!(eval("sqrt(x)", -1.0).is_nan());
      assert!(eval("log(x)", -1.0).is_nan());
      assert!(eval("x^0.5", -4.0).is_nan());
    }

    #[test]
    fn overflow_is_infinite() {
      assert_eq!(eval("exp(x)", 1000.0), f64::INFINITY);
      assert_eq!(eval("1e999 + x", 0.0), f64::INFINITY);
    }
  }

  mod compile_errors {
    use super::*;

    #[test]
    fn unknown_symbol() {
      match compile("asjoa") {
        Err(ExpressionError::UnknownSymbol(name)) => assert_eq!(name, "asjoa"),
        other => panic!("expected unknown symbol, got {other:?}"),
      }
    }

    #[test]
    fn unknown_function() {
      assert!(matches!(
        compile("foo(x)"),
        Err(ExpressionError::UnknownFunction(_))
      ));
    }

    #[test]
    fn function_name_used_as_value() {
      assert!(matches!(
        compile("sin + x"),
        Err(ExpressionError::UnknownSymbol(_))
      ));
    }

    #[test]
    fn wrong_arity() {
      let err = compile("atan2(x)").unwrap_err();
      assert_eq!(err.to_string(), "atan2 expects exactly 2 arguments, got 1");
      let err = compile("log()").unwrap_err();
      assert_eq!(err.to_string(), "log expects 1 or 2 arguments, got 0");
    }

    #[test]
    fn syntax_error() {
      assert!(matches!(compile("x +* 2"), Err(ExpressionError::Syntax(_))));
      assert!(matches!(compile("2x"), Err(ExpressionError::Syntax(_))));
    }

    #[test]
    fn no_code_execution_escape_hatches() {
      assert!(compile("__import__('os')").is_err());
      assert!(compile("x; 1").is_err());
    }
  }
}
