pub mod brackets;
pub mod calculator;
pub mod config;
pub mod converter;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod protocol;
pub mod token;

pub use brackets::validate;
pub use calculator::Calculator;
pub use config::{ArgumentOrder, EvalConfig, Grouping, Separators};
pub use error::{Error, ErrorKind};
pub use evaluator::Bindings;
pub use functions::{FunctionRegistry, MathFunction};
pub use token::{Operator, Token};

// Built once on first use; shared read-only by every call below.
lazy_static::lazy_static! {
    static ref DEFAULT_CALCULATOR: Calculator = Calculator::default();
}

/// Evaluate an arithmetic expression to f64.
pub fn result(expression: &str) -> Result<f64, Error> {
    DEFAULT_CALCULATOR.result(expression)
}

/// Evaluate with a map of single-letter variables.
pub fn result_with(expression: &str, bindings: &Bindings) -> Result<f64, Error> {
    DEFAULT_CALCULATOR.result_with(expression, bindings)
}

/// Evaluate with variables provided as JSON string.
/// JSON format: {"x": 2, "y": 0.5}
pub fn result_with_json(expression: &str, json_vars: &str) -> Result<f64, Error> {
    let bindings = bindings_from_json(json_vars)?;
    result_with(expression, &bindings)
}

/// Postfix form of `expression`, e.g. `3 4 2 * +` for `3+4*2`.
pub fn postfix(expression: &str) -> Result<Vec<Token>, Error> {
    DEFAULT_CALCULATOR.postfix(expression)
}

/// Parse a flat JSON object of numbers into variable bindings.
pub fn bindings_from_json(json_vars: &str) -> Result<Bindings, Error> {
    let json_value: serde_json::Value = serde_json::from_str(json_vars)
        .map_err(|e| Error::invalid_input(format!("Invalid JSON: {}", e)))?;

    match json_value {
        serde_json::Value::Object(map) => bindings_from_map(map),
        _ => Err(Error::invalid_input("JSON must be an object with key-value pairs")),
    }
}

/// The variable a binding key names; only a single lowercase letter can
/// appear as a `Variable` token.
pub fn variable_name(key: &str) -> Result<char, Error> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='z'), None) => Ok(c),
        _ => Err(Error::invalid_input(format!(
            "Invalid variable name '{}': expected a single letter a-z",
            key
        ))),
    }
}

/// Convert JSON key/value pairs into bindings; every key must be a variable
/// name and every value a number.
pub fn bindings_from_map<I>(pairs: I) -> Result<Bindings, Error>
where
    I: IntoIterator<Item = (String, serde_json::Value)>,
{
    let mut bindings = Bindings::new();
    for (key, value) in pairs {
        let name = variable_name(&key)?;
        let n = value.as_f64().ok_or_else(|| {
            Error::invalid_input(format!("Variable '{}' must be a number, got {}", key, value))
        })?;
        bindings.insert(name, n);
    }
    Ok(bindings)
}
