use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FourierError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FourierError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        FourierError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        FourierError::index_range(3, 2, 2)
            .to_string()
            .contains("index range error:")
    );
    assert!(
        FourierError::UndefinedDomain {
            x: 1.0,
            wrapped: 1.0
        }
        .to_string()
        .contains("undefined domain error:")
    );
}

#[test]
fn integration_errors_pass_through_verbatim() {
    let inner = IntegrationError::NonFiniteIntegrand {
        x: 2.0,
        value: f64::NAN,
    };
    let expected = inner.to_string();
    let err = FourierError::from(inner);
    assert_eq!(err.to_string(), expected);
    assert!(matches!(err, FourierError::Integration(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FourierError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
