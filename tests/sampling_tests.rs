use function_plotter::{
  DEFAULT_SAMPLE_COUNT, SampleSet, ValidatedDomain, check, linspace, sample,
};

fn assert_evenly_spaced(samples: &SampleSet, lo: f64, hi: f64) {
  let xs = samples.xs();
  assert_eq!(xs.first(), Some(&lo));
  assert_eq!(xs.last(), Some(&hi));
  let intervals = (xs.len() - 1) as f64;
  let step = hi / intervals - lo / intervals;
  for pair in xs.windows(2) {
    assert!(pair[0] < pair[1], "not strictly increasing: {pair:?}");
    assert!(
      ((pair[1] - pair[0]) - step).abs() <= step.abs() * 1e-6,
      "uneven step between {} and {}",
      pair[0],
      pair[1]
    );
  }
}

mod sampling_tests {
  use super::*;

  #[test]
  fn square_over_symmetric_domain() {
    let samples = sample("x^2", -10.0, 10.0, DEFAULT_SAMPLE_COUNT).unwrap();
    assert_eq!(samples.len(), 100);
    assert_eq!(samples.xs().len(), 100);
    assert_eq!(samples.ys().len(), 100);
    assert_evenly_spaced(&samples, -10.0, 10.0);
    for (x, y) in samples.points() {
      assert!((y - x * x).abs() <= 1e-12 * (x * x).max(1.0), "{x}: {y}");
    }
  }

  #[test]
  fn caret_matches_double_star() {
    let caret = sample("x^2", -10.0, 10.0, 5).unwrap();
    let stars = sample("x**2", -10.0, 10.0, 5).unwrap();
    assert_eq!(caret, stars);
    assert_eq!(caret.xs(), &[-10.0, -5.0, 0.0, 5.0, 10.0]);
    assert_eq!(caret.ys(), &[100.0, 25.0, 0.0, 25.0, 100.0]);
  }

  #[test]
  fn sampling_is_idempotent() {
    let first = sample("sin(x) / x", -3.0, 7.0, 100).unwrap();
    let second = sample("sin(x) / x", -3.0, 7.0, 100).unwrap();
    // NaN != NaN, so compare bit patterns
    let bits = |s: &SampleSet| -> Vec<u64> {
      s.ys().iter().map(|y| y.to_bits()).collect()
    };
    assert_eq!(first.xs(), second.xs());
    assert_eq!(bits(&first), bits(&second));
  }

  #[test]
  fn validated_requests_sample_to_the_requested_count() {
    let requests = [
      ("x", "-1", "1"),
      ("1/x", "-5", "5"),
      ("sqrt(x)", "-4", "4"),
      ("exp(x)", "0", "1e-3"),
      ("tan(x)", "0.1", "100"),
    ];
    for (function, min, max) in requests {
      let (compiled, domain) = check(function, min, max).unwrap();
      for count in [2, 3, 10, DEFAULT_SAMPLE_COUNT] {
        let samples = compiled.sample(&domain, count);
        assert_eq!(samples.len(), count);
        assert_eq!(samples.ys().len(), count);
        assert_evenly_spaced(&samples, domain.lower(), domain.upper());
      }
    }
  }

  #[test]
  fn domain_wider_than_f64_max() {
    let (compiled, domain) = check("x", "-1e308", "1e308").unwrap();
    assert!(domain.width().is_infinite());
    let samples = compiled.sample(&domain, DEFAULT_SAMPLE_COUNT);
    assert_eq!(samples.len(), 100);
    assert!(samples.xs().iter().all(|x| x.is_finite()));
    assert_evenly_spaced(&samples, -1e308, 1e308);
    assert_eq!(samples.xs(), samples.ys());
  }

  #[test]
  fn non_finite_values_propagate() {
    let samples = sample("sqrt(x)", -1.0, 1.0, 3).unwrap();
    assert!(samples.ys()[0].is_nan());
    assert_eq!(samples.ys()[1], 0.0);
    assert_eq!(samples.ys()[2], 1.0);
  }

  #[test]
  fn validated_and_direct_sampling_agree() {
    let (compiled, domain) = check("x^3 - x", "-2", "2").unwrap();
    assert_eq!(
      compiled.sample(&domain, 50),
      sample("x^3 - x", -2.0, 2.0, 50).unwrap()
    );
  }

  #[test]
  fn unparseable_function_does_not_sample() {
    assert!(sample("x +", 0.0, 1.0, 10).is_err());
  }

  #[test]
  fn domain_requires_order() {
    assert!(ValidatedDomain::new(1.0, 1.0).is_err());
    assert!(ValidatedDomain::new(2.0, 1.0).is_err());
    assert!(ValidatedDomain::new(f64::NEG_INFINITY, 1.0).is_err());
    assert!(ValidatedDomain::new(-1.0, 1.0).is_ok());
  }

  #[test]
  fn linspace_hits_both_endpoints() {
    let xs = linspace(0.1, 0.7, 7);
    assert_eq!(xs.len(), 7);
    assert_eq!(xs[0], 0.1);
    assert_eq!(xs[6], 0.7);
  }

  #[test]
  fn into_parts_keeps_pairing() {
    let (xs, ys) = sample("2*x", 0.0, 1.0, 3).unwrap().into_parts();
    assert_eq!(xs, vec![0.0, 0.5, 1.0]);
    assert_eq!(ys, vec![0.0, 1.0, 2.0]);
  }
}
