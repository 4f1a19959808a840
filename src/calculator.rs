use crate::brackets::validate;
use crate::config::EvalConfig;
use crate::converter::to_postfix;
use crate::error::{Error, ErrorKind};
use crate::evaluator::{Bindings, Evaluator};
use crate::functions::{FunctionRegistry, MathFunction};
use crate::lexer::tokenize;
use crate::token::Token;
use tracing::debug;

/// Runs validation, tokenizing, conversion and evaluation against one
/// function registry and one configuration.
#[derive(Clone)]
pub struct Calculator {
    registry: FunctionRegistry,
    config: EvalConfig,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(FunctionRegistry::with_builtins(), EvalConfig::default())
    }
}

impl Calculator {
    pub fn new(registry: FunctionRegistry, config: EvalConfig) -> Self {
        Self { registry, config }
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self::new(FunctionRegistry::with_builtins(), config)
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn register(&mut self, function: Box<dyn MathFunction>) -> Result<(), Error> {
        self.registry.register(function)
    }

    fn check_input(expression: &str) -> Result<(), Error> {
        if expression.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "Unexpected input, expected an expression but found: {:?}",
                expression
            )));
        }
        if !validate(expression) {
            return Err(Error::new(
                ErrorKind::BracketMismatch,
                format!("Brackets are not valid. Check your expression: {}", expression),
                None,
            ));
        }
        Ok(())
    }

    /// Validate, tokenize and convert `expression` without evaluating it.
    pub fn postfix(&self, expression: &str) -> Result<Vec<Token>, Error> {
        Self::check_input(expression)?;
        let tokens = tokenize(expression, &self.registry)?;
        Ok(to_postfix(tokens, self.config))
    }

    pub fn result(&self, expression: &str) -> Result<f64, Error> {
        self.result_with(expression, &Bindings::new())
    }

    /// Evaluate `expression`, resolving variables from `bindings`.
    pub fn result_with(&self, expression: &str, bindings: &Bindings) -> Result<f64, Error> {
        debug!(expression, "evaluating");
        let postfix = self.postfix(expression)?;
        Evaluator::new(&self.registry, bindings, self.config.argument_order).evaluate(&postfix)
    }
}
