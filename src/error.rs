use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Input is empty or holds nothing but whitespace.
    InvalidInput,
    BracketMismatch,
    /// Character the lexer does not recognize.
    UnexpectedCharacter(char),
    /// Run of digits and points that does not parse as a number, e.g. `1.2.3`.
    InvalidNumber,
    UnknownFunction(String),
    UnboundVariable(char),
    /// Postfix stream that does not reduce to exactly one value.
    MalformedExpression,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::BracketMismatch => "BracketMismatch",
            ErrorKind::UnexpectedCharacter(_) => "UnexpectedCharacter",
            ErrorKind::InvalidNumber => "InvalidNumber",
            ErrorKind::UnknownFunction(_) => "UnknownFunction",
            ErrorKind::UnboundVariable(_) => "UnboundVariable",
            ErrorKind::MalformedExpression => "MalformedExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based character index into the whitespace-stripped expression.
    pub position: Option<usize>,
}

impl Error {
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M, position: Option<usize>) -> Self {
        Self { kind, message: message.into(), position }
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::InvalidInput, message, None)
    }

    pub fn malformed<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::MalformedExpression, message, None)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at position {}", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Error {}
