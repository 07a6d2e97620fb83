use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
  Command::cargo_bin("function-plotter").unwrap()
}

mod cli_tests {
  use super::*;

  #[test]
  fn plot_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("square.svg");
    cli()
      .args(["plot", "x^2", "--min", "-10", "--max", "10", "-o"])
      .arg(&output)
      .assert()
      .success();
    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Function Plot"));
  }

  #[test]
  fn plot_rejects_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.svg");
    cli()
      .args(["plot", "x", "--min", "100", "--max", "10", "-o"])
      .arg(&output)
      .assert()
      .failure()
      .stderr(predicate::str::contains(
        "Invalid Input: Please enter a valid input.",
      ));
    assert!(!output.exists());
  }

  #[test]
  fn validate_prints_boolean() {
    cli()
      .args(["validate", "x^2", "--min", "-10", "--max", "10"])
      .assert()
      .success()
      .stdout("true\n");
    cli()
      .args(["validate", "asjoa", "--min", "ajnska", "--max", "10"])
      .assert()
      .success()
      .stdout("false\n");
  }

  #[test]
  fn sample_as_table() {
    cli()
      .args(["sample", "x^2", "--min=-10", "--max=10", "--samples", "5"])
      .assert()
      .success()
      .stdout("x\ty\n-10\t100\n-5\t25\n0\t0\n5\t25\n10\t100\n");
  }

  #[test]
  fn sample_as_json_turns_nan_into_null() {
    cli()
      .args(["sample", "sqrt(x)", "--min", "-1", "--max", "1"])
      .args(["--samples", "3", "--format", "json"])
      .assert()
      .success()
      .stdout(predicate::str::contains("null"))
      .stdout(predicate::str::contains("\"x\""));
  }

  #[test]
  fn sample_reports_reason() {
    cli()
      .args(["sample", "x", "--min", "hh", "--max", "10"])
      .assert()
      .failure()
      .stderr(predicate::str::contains("Invalid min value"));
  }

  #[test]
  fn leading_minus_function() {
    cli()
      .args(["validate", "-x", "--min", "-1", "--max", "1"])
      .assert()
      .success()
      .stdout("true\n");
  }

  #[test]
  fn plot_rejects_oversized_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("huge.svg");
    cli()
      .args(["plot", "x", "--min", "0", "--max", "1"])
      .args(["--width", "500000000", "-o"])
      .arg(&output)
      .assert()
      .failure()
      .stderr(predicate::str::contains("--width"));
    assert!(!output.exists());
  }

  #[test]
  fn plot_handles_extreme_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sinh.svg");
    cli()
      .args(["plot", "sinh(x)", "--min", "-710", "--max", "710", "-o"])
      .arg(&output)
      .assert()
      .success();
    assert!(output.exists());
  }
}
