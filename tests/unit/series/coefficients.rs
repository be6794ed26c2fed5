use super::*;
use crate::{
    foundation::error::FourierError, numeric::quadrature::IntegrationError,
    target::presets::reference_function,
};

const TOL: f64 = 1e-9;
const P: f64 = 400.0;

#[test]
fn constant_function_has_only_a_mean() {
    let c = 3.25;
    let f = |_x: f64| c;
    let set = compute_coefficients(&f, 6, 0.0, P).unwrap();
    assert!((set.a0() - c).abs() < TOL);
    assert_eq!(set.degree(), 6);
    for (a, b) in set.a_n().iter().zip(set.b_n()) {
        assert!(a.abs() < TOL, "a_n = {a}");
        assert!(b.abs() < TOL, "b_n = {b}");
    }
}

#[test]
fn pure_cosine_lands_in_its_harmonic() {
    let k = 3usize;
    let f = move |x: f64| (2.0 * PI * k as f64 * x / P).cos();
    let set = compute_coefficients(&f, 5, 0.0, P).unwrap();
    assert!(set.a0().abs() < TOL);
    for (idx, (a, b)) in set.a_n().iter().zip(set.b_n()).enumerate() {
        let want = if idx + 1 == k { 1.0 } else { 0.0 };
        assert!((a - want).abs() < TOL, "a_{} = {a}", idx + 1);
        assert!(b.abs() < TOL, "b_{} = {b}", idx + 1);
    }
}

#[test]
fn pure_sine_lands_in_its_harmonic() {
    let k = 2usize;
    let f = move |x: f64| (2.0 * PI * k as f64 * x / P).sin();
    let set = compute_coefficients(&f, 4, 0.0, P).unwrap();
    assert!(set.a0().abs() < TOL);
    for (idx, (a, b)) in set.a_n().iter().zip(set.b_n()).enumerate() {
        let want = if idx + 1 == k { 1.0 } else { 0.0 };
        assert!(a.abs() < TOL, "a_{} = {a}", idx + 1);
        assert!((b - want).abs() < TOL, "b_{} = {b}", idx + 1);
    }
}

#[test]
fn single_coefficients_match_the_full_set() {
    let f = reference_function().unwrap();
    let set = compute_coefficients(&f, 3, 0.0, P).unwrap();
    assert_eq!(compute_a0(&f, 0.0, P).unwrap(), set.a0());
    assert_eq!(compute_an(&f, 2, 0.0, P).unwrap(), set.a_n()[1]);
    assert_eq!(compute_bn(&f, 3, 0.0, P).unwrap(), set.b_n()[2]);
}

#[test]
fn reference_mean_is_exact() {
    // Two triangles of area 2500 and two plateaus of area 5000 over a period of 400.
    let f = reference_function().unwrap();
    assert!((compute_a0(&f, 0.0, P).unwrap() - 37.5).abs() < 1e-9);
}

#[test]
fn degree_zero_yields_only_a0() {
    let f = reference_function().unwrap();
    let set = compute_coefficients(&f, 0, 0.0, P).unwrap();
    assert_eq!(set.degree(), 0);
    assert!(set.a_n().is_empty());
    assert!(set.b_n().is_empty());
}

#[test]
fn trait_objects_are_accepted() {
    let f = reference_function().unwrap();
    let dyn_f: &dyn TargetFunction = &f;
    let a = compute_an(dyn_f, 1, 0.0, P).unwrap();
    assert_eq!(a, compute_an(&f, 1, 0.0, P).unwrap());
}

#[test]
fn zero_harmonic_and_empty_domains_are_rejected() {
    let f = |x: f64| x;
    assert!(matches!(
        compute_an(&f, 0, 0.0, 1.0),
        Err(FourierError::Validation(_))
    ));
    assert!(matches!(
        compute_bn(&f, 0, 0.0, 1.0),
        Err(FourierError::Validation(_))
    ));
    assert!(matches!(
        compute_a0(&f, 1.0, 1.0),
        Err(FourierError::Validation(_))
    ));
    // Reversed limits are a domain error here, unlike raw `integrate`.
    assert!(matches!(
        compute_coefficients(&f, 2, 5.0, 1.0),
        Err(FourierError::Validation(_))
    ));
}

#[test]
fn quadrature_failures_propagate_unchanged() {
    let f = |x: f64| 1.0 / (x - 200.0);
    let err = compute_a0(&f, 0.0, P).unwrap_err();
    match err {
        FourierError::Integration(IntegrationError::NonFiniteIntegrand { x, .. }) => {
            assert_eq!(x, 200.0)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let step = |x: f64| if x < 123.4 { 0.0 } else { 1.0 };
    let tight = QuadratureOpts {
        limit: 3,
        ..QuadratureOpts::default()
    };
    assert!(matches!(
        compute_coefficients_with(&step, 1, 0.0, P, &tight),
        Err(FourierError::Integration(
            IntegrationError::DidNotConverge { .. }
        ))
    ));
}

#[test]
fn coefficient_set_enforces_equal_lengths() {
    assert!(CoefficientSet::new(0.0, vec![1.0], vec![]).is_err());
    let json = r#"{ "a0": 1.0, "a_n": [1.0, 2.0], "b_n": [3.0] }"#;
    assert!(serde_json::from_str::<CoefficientSet>(json).is_err());

    let json = r#"{ "a0": 1.0, "a_n": [1.0, 2.0], "b_n": [3.0, 4.0] }"#;
    let set: CoefficientSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.degree(), 2);
}

#[test]
fn truncation_keeps_leading_harmonics() {
    let set = CoefficientSet::new(1.0, vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]).unwrap();
    let t = set.truncated(2).unwrap();
    assert_eq!(t.a0(), 1.0);
    assert_eq!(t.a_n(), &[1.0, 2.0]);
    assert_eq!(t.b_n(), &[4.0, 5.0]);
    assert!(matches!(
        set.truncated(4),
        Err(FourierError::IndexRange { degree: 4, .. })
    ));
}

#[test]
fn scaling_multiplies_every_coefficient() {
    let set = CoefficientSet::new(1.0, vec![2.0], vec![-3.0]).unwrap();
    let s = set.scaled(-2.0);
    assert_eq!(s.a0(), -2.0);
    assert_eq!(s.a_n(), &[-4.0]);
    assert_eq!(s.b_n(), &[6.0]);
}
