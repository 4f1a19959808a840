use rpncalc::{result, Calculator, EvalConfig, ErrorKind, FunctionRegistry, MathFunction};

fn approx(v: f64, b: f64) -> bool { (v - b).abs() < 1e-9 }

/// Subtracts its second argument from its first, as received.
struct Diff;

impl MathFunction for Diff {
    fn name(&self) -> &str { "diff" }
    fn arity(&self) -> usize { 2 }
    fn call(&self, args: &[f64]) -> f64 { args[0] - args[1] }
    fn description(&self) -> Option<&str> { Some("diff(a, b) is a - b") }
}

struct Answer;

impl MathFunction for Answer {
    fn name(&self) -> &str { "answer" }
    fn arity(&self) -> usize { 0 }
    fn call(&self, _args: &[f64]) -> f64 { 42.0 }
}

#[test]
fn builtin_functions() {
    assert!(approx(result("min(1,5)").unwrap(), 1.0));
    assert!(approx(result("max(1, 5)").unwrap(), 5.0));
    assert!(approx(result("sqrt(9)").unwrap(), 3.0));
    assert!(approx(result("abs(0-7)").unwrap(), 7.0));
    assert!(approx(result("floor(2.7) + ceil(2.2)").unwrap(), 5.0));
    assert!(approx(result("cos(0)").unwrap(), 1.0));
    assert!(approx(result("2sqrt(16)").unwrap(), 8.0));
}

#[test]
fn nested_calls() {
    assert!(approx(result("max(1, min(2, 3))").unwrap(), 2.0));
    assert!(approx(result("sqrt(sqrt(16))").unwrap(), 2.0));
    assert!(approx(result("min(3, sqrt(100))").unwrap(), 3.0));
}

#[test]
fn operators_before_a_separator_wait_for_the_closing_parenthesis() {
    // Evaluated as min(1, 2+3).
    assert!(approx(result("min(1+2, 3)").unwrap(), 1.0));
    let calc = Calculator::with_config(EvalConfig::conventional());
    assert!(approx(calc.result("min(1+2, 3)").unwrap(), 3.0));
    assert!(approx(calc.result("min(3*3, sqrt(100))").unwrap(), 9.0));
}

#[test]
fn arguments_arrive_in_reverse_of_written_order() {
    // pow receives (3, 2)
    assert!(approx(result("pow(2,3)").unwrap(), 9.0));
}

#[test]
fn written_argument_order_is_opt_in() {
    let calc = Calculator::with_config(EvalConfig::conventional());
    assert!(approx(calc.result("pow(2,3)").unwrap(), 8.0));
}

#[test]
fn custom_functions() {
    let mut calc = Calculator::default();
    calc.register(Box::new(Diff)).unwrap();
    calc.register(Box::new(Answer)).unwrap();

    assert!(approx(calc.result("diff(10, 4)").unwrap(), -6.0));
    assert!(approx(calc.result("answer() + 1").unwrap(), 43.0));
    assert!(calc.registry().has_function("diff"));

    // The process-wide default calculator is unaffected.
    let err = result("diff(10, 4)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFunction("diff".into()));
}

#[test]
fn empty_registry_knows_no_functions() {
    let calc = Calculator::new(FunctionRegistry::new(), EvalConfig::default());
    assert!(approx(calc.result("1+1").unwrap(), 2.0));
    let err = calc.result("sqrt(4)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFunction("sqrt".into()));
}

#[test]
fn wrong_argument_count_is_malformed() {
    assert_eq!(result("sqrt()").unwrap_err().kind, ErrorKind::MalformedExpression);
    assert_eq!(result("sqrt(1, 2)").unwrap_err().kind, ErrorKind::MalformedExpression);
}
