use crate::config::ArgumentOrder;
use crate::error::{Error, ErrorKind};
use crate::functions::FunctionRegistry;
use crate::token::Token;
use std::collections::HashMap;
use tracing::debug;

/// Numeric values for single-letter variables, keyed by the letter.
pub type Bindings = HashMap<char, f64>;

/// Value-stack evaluator for postfix token streams.
pub struct Evaluator<'a> {
    registry: &'a FunctionRegistry,
    bindings: &'a Bindings,
    argument_order: ArgumentOrder,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry, bindings: &'a Bindings, argument_order: ArgumentOrder) -> Self {
        Self { registry, bindings, argument_order }
    }

    fn pop(stack: &mut Vec<f64>, token: &Token) -> Result<f64, Error> {
        stack
            .pop()
            .ok_or_else(|| Error::malformed(format!("Missing operand for '{}'", token)))
    }

    pub fn evaluate(&self, postfix: &[Token]) -> Result<f64, Error> {
        let mut stack: Vec<f64> = Vec::new();

        for token in postfix {
            match token {
                Token::Number(n) => stack.push(*n),
                Token::Variable(c) => {
                    let value = self.bindings.get(c).copied().ok_or_else(|| {
                        Error::new(
                            ErrorKind::UnboundVariable(*c),
                            format!("Variable '{}' has no value", c),
                            None,
                        )
                    })?;
                    stack.push(value);
                }
                Token::Operator(op) => {
                    let rhs = Self::pop(&mut stack, token)?;
                    let lhs = Self::pop(&mut stack, token)?;
                    stack.push(op.apply(lhs, rhs));
                }
                Token::Function { name, arity } => {
                    let mut args = Vec::with_capacity(*arity);
                    for _ in 0..*arity {
                        args.push(Self::pop(&mut stack, token)?);
                    }
                    if self.argument_order == ArgumentOrder::Written {
                        args.reverse();
                    }
                    stack.push(self.registry.call(name, &args)?);
                }
                Token::OpeningParenthesis | Token::ClosingParenthesis | Token::Separator => {
                    return Err(Error::malformed(format!(
                        "Unexpected {} in postfix expression",
                        token.kind()
                    )));
                }
            }
        }

        match stack.as_slice() {
            [value] => {
                debug!(result = *value, "evaluated postfix");
                Ok(*value)
            }
            [] => Err(Error::malformed("Expression produced no value")),
            values => Err(Error::malformed(format!(
                "Expression left {} values on the stack",
                values.len()
            ))),
        }
    }
}

/// Evaluate `postfix` with the given registry, variable bindings and argument order.
pub fn evaluate(
    postfix: &[Token],
    registry: &FunctionRegistry,
    bindings: &Bindings,
    argument_order: ArgumentOrder,
) -> Result<f64, Error> {
    Evaluator::new(registry, bindings, argument_order).evaluate(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Operator;

    fn eval(postfix: &[Token]) -> Result<f64, Error> {
        evaluate(postfix, &FunctionRegistry::with_builtins(), &Bindings::new(), ArgumentOrder::Reversed)
    }

    #[test]
    fn operators_take_right_operand_first() {
        let postfix = [Token::Number(10.0), Token::Number(4.0), Token::Operator(Operator::Sub)];
        assert_eq!(eval(&postfix).unwrap(), 6.0);
        let postfix = [Token::Number(1.0), Token::Number(4.0), Token::Operator(Operator::Div)];
        assert_eq!(eval(&postfix).unwrap(), 0.25);
    }

    #[test]
    fn function_argument_order() {
        let registry = FunctionRegistry::with_builtins();
        let postfix = [
            Token::Number(2.0),
            Token::Number(3.0),
            Token::Function { name: "pow".into(), arity: 2 },
        ];
        let reversed = evaluate(&postfix, &registry, &Bindings::new(), ArgumentOrder::Reversed).unwrap();
        let written = evaluate(&postfix, &registry, &Bindings::new(), ArgumentOrder::Written).unwrap();
        assert_eq!(reversed, 9.0);
        assert_eq!(written, 8.0);
    }

    #[test]
    fn variables_resolve_from_bindings() {
        let mut bindings = Bindings::new();
        bindings.insert('x', 4.0);
        let postfix = [Token::Variable('x'), Token::Number(2.0), Token::Operator(Operator::Mul)];
        let registry = FunctionRegistry::new();
        assert_eq!(evaluate(&postfix, &registry, &bindings, ArgumentOrder::Reversed).unwrap(), 8.0);

        let err = evaluate(&[Token::Variable('y')], &registry, &bindings, ArgumentOrder::Reversed).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnboundVariable('y'));
    }

    #[test]
    fn malformed_postfix_is_an_error() {
        let underflow = [Token::Number(3.0), Token::Operator(Operator::Add)];
        assert_eq!(eval(&underflow).unwrap_err().kind, ErrorKind::MalformedExpression);
        let leftover = [Token::Number(3.0), Token::Number(4.0)];
        assert_eq!(eval(&leftover).unwrap_err().kind, ErrorKind::MalformedExpression);
        assert_eq!(eval(&[]).unwrap_err().kind, ErrorKind::MalformedExpression);
        assert_eq!(eval(&[Token::OpeningParenthesis]).unwrap_err().kind, ErrorKind::MalformedExpression);
    }
}
