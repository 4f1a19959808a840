use crate::error::{Error, ErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A named numeric function callable from expressions.
///
/// # Example
/// ```rust
/// use rpncalc::functions::{FunctionRegistry, MathFunction};
///
/// struct Double;
///
/// impl MathFunction for Double {
///     fn name(&self) -> &str { "double" }
///     fn arity(&self) -> usize { 1 }
///     fn call(&self, args: &[f64]) -> f64 { args[0] * 2.0 }
/// }
///
/// let mut registry = FunctionRegistry::with_builtins();
/// registry.register(Box::new(Double)).unwrap();
/// assert_eq!(registry.arity("double"), Some(1));
/// ```
pub trait MathFunction: Send + Sync {
    /// Lowercase name used in expressions.
    fn name(&self) -> &str;

    /// Number of positional arguments.
    fn arity(&self) -> usize;

    /// Invoke with exactly `arity()` arguments.
    fn call(&self, args: &[f64]) -> f64;

    fn description(&self) -> Option<&str> { None }
}

/// Function backed by a plain `fn` pointer. Used for the builtin math table.
pub struct Builtin {
    name: &'static str,
    arity: usize,
    func: fn(&[f64]) -> f64,
    description: &'static str,
}

impl Builtin {
    pub fn new(name: &'static str, arity: usize, func: fn(&[f64]) -> f64, description: &'static str) -> Self {
        Self { name, arity, func, description }
    }
}

impl MathFunction for Builtin {
    fn name(&self) -> &str { self.name }
    fn arity(&self) -> usize { self.arity }
    fn call(&self, args: &[f64]) -> f64 { (self.func)(args) }
    fn description(&self) -> Option<&str> { Some(self.description) }
}

fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 { x } else { x.signum() }
}

// Arities follow the declared parameter counts of the usual host math table,
// so `max` and `min` take exactly two arguments. Names with digits (log10,
// atan2, ...) are left out: the lexer never folds digits into a name.
fn builtins() -> Vec<Builtin> {
    vec![
        Builtin::new("abs", 1, |a| a[0].abs(), "Absolute value"),
        Builtin::new("acos", 1, |a| a[0].acos(), "Arccosine in radians"),
        Builtin::new("acosh", 1, |a| a[0].acosh(), "Inverse hyperbolic cosine"),
        Builtin::new("asin", 1, |a| a[0].asin(), "Arcsine in radians"),
        Builtin::new("asinh", 1, |a| a[0].asinh(), "Inverse hyperbolic sine"),
        Builtin::new("atan", 1, |a| a[0].atan(), "Arctangent in radians"),
        Builtin::new("atanh", 1, |a| a[0].atanh(), "Inverse hyperbolic tangent"),
        Builtin::new("cbrt", 1, |a| a[0].cbrt(), "Cube root"),
        Builtin::new("ceil", 1, |a| a[0].ceil(), "Smallest integer not below x"),
        Builtin::new("cos", 1, |a| a[0].cos(), "Cosine"),
        Builtin::new("cosh", 1, |a| a[0].cosh(), "Hyperbolic cosine"),
        Builtin::new("exp", 1, |a| a[0].exp(), "e raised to x"),
        Builtin::new("floor", 1, |a| a[0].floor(), "Largest integer not above x"),
        Builtin::new("hypot", 2, |a| a[0].hypot(a[1]), "Length of the hypotenuse"),
        Builtin::new("log", 1, |a| a[0].ln(), "Natural logarithm"),
        Builtin::new("max", 2, |a| a[0].max(a[1]), "Larger of two values"),
        Builtin::new("min", 2, |a| a[0].min(a[1]), "Smaller of two values"),
        Builtin::new("pow", 2, |a| a[0].powf(a[1]), "pow(b, e) raises b to e"),
        // Halves round towards positive infinity.
        Builtin::new("round", 1, |a| (a[0] + 0.5).floor(), "Nearest integer"),
        Builtin::new("sign", 1, |a| sign(a[0]), "Sign of x: -1, 0 or 1"),
        Builtin::new("sin", 1, |a| a[0].sin(), "Sine"),
        Builtin::new("sinh", 1, |a| a[0].sinh(), "Hyperbolic sine"),
        Builtin::new("sqrt", 1, |a| a[0].sqrt(), "Square root"),
        Builtin::new("tan", 1, |a| a[0].tan(), "Tangent"),
        Builtin::new("tanh", 1, |a| a[0].tanh(), "Hyperbolic tangent"),
        Builtin::new("trunc", 1, |a| a[0].trunc(), "Integer part of x"),
    ]
}

/// Name to function mapping consulted by the lexer (arity) and the evaluator (call).
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn MathFunction>>,
}

impl FunctionRegistry {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registry preloaded with the builtin math functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for b in builtins() {
            registry.functions.insert(b.name.to_string(), Arc::new(b));
        }
        registry
    }

    /// Register a function, replacing any previous entry with the same name.
    pub fn register(&mut self, function: Box<dyn MathFunction>) -> Result<(), Error> {
        let name = function.name().to_string();

        if name.is_empty() {
            return Err(Error::invalid_input("Function name cannot be empty"));
        }

        // The lexer only accumulates lowercase ASCII letters into names.
        if !name.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(Error::invalid_input(format!(
                "Function name '{}' must consist of lowercase letters a-z",
                name
            )));
        }

        if self.functions.insert(name.clone(), Arc::from(function)).is_some() {
            warn!(function = %name, "replaced existing function");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn MathFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.get(name).map(|f| f.arity())
    }

    /// Sorted list of registered names.
    pub fn list_functions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Look up `name` and invoke it, checking the argument count first.
    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64, Error> {
        let function = self.get(name).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownFunction(name.to_string()),
                format!("Unknown function: {}", name),
                None,
            )
        })?;

        if args.len() != function.arity() {
            return Err(Error::malformed(format!(
                "{} expects {} arguments, got {}",
                name,
                function.arity(),
                args.len()
            )));
        }

        Ok(function.call(args))
    }
}
