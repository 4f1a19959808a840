use crate::config::{EvalConfig, Grouping, Separators};
use crate::token::{Operator, Token};
use tracing::{debug, trace};

fn should_pop(top: Operator, incoming: Operator, grouping: Grouping) -> bool {
    match grouping {
        Grouping::RightToLeft => top.priority() > incoming.priority(),
        Grouping::Conventional => {
            top.priority() > incoming.priority()
                || (top.priority() == incoming.priority() && !incoming.is_right_associative())
        }
    }
}

/// Shunting-yard conversion of an infix token stream into postfix order.
///
/// Separators never reach the output: argument boundaries are implied by
/// each function's arity.
pub fn to_postfix(tokens: Vec<Token>, config: EvalConfig) -> Vec<Token> {
    let grouping = config.grouping;
    let mut operators: Vec<Token> = Vec::new();
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Number(_) | Token::Variable(_) => output.push(token),
            Token::Operator(incoming) => {
                while let Some(Token::Operator(top)) = operators.last() {
                    if !should_pop(*top, incoming, grouping) {
                        break;
                    }
                    if let Some(op) = operators.pop() {
                        output.push(op);
                    }
                }
                operators.push(token);
            }
            Token::OpeningParenthesis | Token::Function { .. } => operators.push(token),
            Token::Separator => {
                if config.separators == Separators::Flush {
                    while let Some(Token::Operator(_)) = operators.last() {
                        if let Some(op) = operators.pop() {
                            output.push(op);
                        }
                    }
                }
            }
            Token::ClosingParenthesis => {
                while let Some(top) = operators.pop() {
                    if top == Token::OpeningParenthesis {
                        break;
                    }
                    output.push(top);
                }
                // The call owning this parenthesis sits directly below it.
                if matches!(operators.last(), Some(Token::Function { .. })) {
                    if let Some(function) = operators.pop() {
                        output.push(function);
                    }
                }
            }
        }
    }

    while let Some(top) = operators.pop() {
        output.push(top);
    }

    debug!(tokens = output.len(), ?grouping, "converted to postfix");
    trace!(postfix = %crate::token::render(&output));
    output
}
