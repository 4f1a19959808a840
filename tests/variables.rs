use rpncalc::{result, result_with, result_with_json, Bindings, ErrorKind};

fn approx(v: f64, b: f64) -> bool { (v - b).abs() < 1e-9 }

fn vars(pairs: &[(char, f64)]) -> Bindings {
    pairs.iter().copied().collect()
}

#[test]
fn bound_variables() {
    let b = vars(&[('x', 3.0), ('y', 10.0)]);
    assert!(approx(result_with("x + y", &b).unwrap(), 13.0));
    assert!(approx(result_with("2x", &b).unwrap(), 6.0));
    assert!(approx(result_with("xy", &b).unwrap(), 30.0));
    assert!(approx(result_with("2xy + 1", &b).unwrap(), 61.0));
    assert!(approx(result_with("(x+1)^2", &b).unwrap(), 16.0));
    assert!(approx(result_with("max(x, y)", &b).unwrap(), 10.0));
}

#[test]
fn unbound_variable() {
    let err = result("x + 1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnboundVariable('x'));
    let err = result_with("x + z", &vars(&[('x', 1.0)])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnboundVariable('z'));
}

#[test]
fn json_variables() {
    assert!(approx(result_with_json("a*b", r#"{"a": 1.5, "b": 4}"#).unwrap(), 6.0));
    let err = result_with_json("a", r#"{"a": true}"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[test]
fn json_keys_must_name_a_variable() {
    for json in [r#"{"xy": 1}"#, r#"{"X": 1}"#, r#"{"": 1}"#] {
        let err = result_with_json("x", json).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "json {}", json);
    }
}
