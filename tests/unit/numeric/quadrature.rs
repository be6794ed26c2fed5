use super::*;

fn opts() -> QuadratureOpts {
    QuadratureOpts::default()
}

#[test]
fn polynomials_are_integrated_exactly() {
    let r = integrate(|x| x * x * x, 0.0, 1.0, &[], &opts()).unwrap();
    assert!((r.value - 0.25).abs() < 1e-14);
    assert_eq!(r.intervals, 1);
    assert_eq!(r.evaluations, 21);
}

#[test]
fn sine_over_half_period() {
    let r = integrate(f64::sin, 0.0, std::f64::consts::PI, &[], &opts()).unwrap();
    assert!((r.value - 2.0).abs() < 1e-12);
    assert!(r.abserr <= 1.49e-8);
}

#[test]
fn reversed_bounds_negate() {
    let fwd = integrate(|x| x.exp(), 0.0, 2.0, &[], &opts()).unwrap();
    let rev = integrate(|x| x.exp(), 2.0, 0.0, &[], &opts()).unwrap();
    assert_eq!(fwd.value, -rev.value);
}

#[test]
fn equal_bounds_integrate_to_zero() {
    let r = integrate(|_| 1.0, 3.0, 3.0, &[], &opts()).unwrap();
    assert_eq!(r.value, 0.0);
    assert_eq!(r.evaluations, 0);
}

#[test]
fn non_finite_bounds_are_rejected() {
    let err = integrate(|x| x, f64::NAN, 1.0, &[], &opts()).unwrap_err();
    assert!(matches!(err, IntegrationError::InvalidBounds { .. }));
}

#[test]
fn non_finite_integrand_surfaces_the_offending_point() {
    // The 21-point rule samples the midpoint of [-1, 1].
    let err = integrate(|x| 1.0 / x, -1.0, 1.0, &[], &opts()).unwrap_err();
    match err {
        IntegrationError::NonFiniteIntegrand { x, value } => {
            assert_eq!(x, 0.0);
            assert!(value.is_infinite());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn breakpoints_make_steps_cheap() {
    let step = |x: f64| if x < 0.3 { 0.0 } else { 1.0 };
    let r = integrate(step, 0.0, 1.0, &[0.3], &opts()).unwrap();
    assert!((r.value - 0.7).abs() < 1e-12);
    assert_eq!(r.intervals, 2);
}

#[test]
fn breakpoints_outside_the_range_are_ignored() {
    let r = integrate(|x| x, 0.0, 1.0, &[-1.0, 0.0, 1.0, 5.0, f64::NAN], &opts()).unwrap();
    assert_eq!(r.intervals, 1);
    assert!((r.value - 0.5).abs() < 1e-15);
}

#[test]
fn tight_budget_reports_non_convergence() {
    let step = |x: f64| if x < 0.3 { 0.0 } else { 1.0 };
    let o = QuadratureOpts {
        limit: 4,
        ..QuadratureOpts::default()
    };
    let err = integrate(step, 0.0, 1.0, &[], &o).unwrap_err();
    match err {
        IntegrationError::DidNotConverge { limit, result, .. } => {
            assert_eq!(limit, 4);
            assert!((result - 0.7).abs() < 0.1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_options_are_rejected() {
    let zero_tol = QuadratureOpts {
        epsabs: 0.0,
        epsrel: 0.0,
        limit: 10,
    };
    assert!(matches!(
        integrate(|x| x, 0.0, 1.0, &[], &zero_tol),
        Err(IntegrationError::InvalidOptions(_))
    ));

    let no_budget = QuadratureOpts {
        limit: 0,
        ..QuadratureOpts::default()
    };
    assert!(no_budget.validate().is_err());
}

#[test]
fn breakpoint_pieces_do_not_eat_the_budget() {
    let small = QuadratureOpts {
        limit: 2,
        ..QuadratureOpts::default()
    };
    let r = integrate(|x| x, 0.0, 1.0, &[0.25, 0.5, 0.75], &small).unwrap();
    assert_eq!(r.intervals, 4);
    assert!((r.value - 0.5).abs() < 1e-15);

    let many: Vec<f64> = (1..1000).map(|i| i as f64).collect();
    let r = integrate(|x| x.sin(), 0.0, 1000.0, &many, &opts()).unwrap();
    assert!((r.value - (1.0 - 1000f64.cos())).abs() < 1e-9);
}

#[test]
fn zero_integrals_of_large_integrands_stop_at_roundoff() {
    // Exact value 0, but integral(|f|) is far beyond what epsabs can resolve.
    let w = 2.0 * std::f64::consts::PI / 400.0;
    let r = integrate(|x| 1e5 * (w * x).cos(), 0.0, 400.0, &[], &opts()).unwrap();
    assert!(r.value.abs() < 1e-6, "{r:?}");

    let r = integrate(|x| x * x * (w * x).sin(), -200.0, 200.0, &[], &opts()).unwrap();
    assert!(r.value.abs() < 1e-5, "{r:?}");
    assert!(r.intervals < 50);
}

#[test]
fn opts_deserialize_with_defaults() {
    let o: QuadratureOpts = serde_json::from_str(r#"{ "limit": 500 }"#).unwrap();
    assert_eq!(o.limit, 500);
    assert_eq!(o.epsabs, 1.49e-8);
}
