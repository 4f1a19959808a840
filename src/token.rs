use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Operator::Add,
            '-' => Operator::Sub,
            '*' => Operator::Mul,
            '/' => Operator::Div,
            '^' => Operator::Pow,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    /// Fixed priority table: `+ -` = 1, `* /` = 2, `^` = 3.
    pub fn priority(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Operator::Pow)
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs / rhs,
            Operator::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Variable(char),
    Function { name: String, arity: usize },
    OpeningParenthesis,
    ClosingParenthesis,
    Separator,
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Number(_) => "Number",
            Token::Operator(_) => "Operator",
            Token::Variable(_) => "Variable",
            Token::Function { .. } => "Function",
            Token::OpeningParenthesis => "OpeningParenthesis",
            Token::ClosingParenthesis => "ClosingParenthesis",
            Token::Separator => "Separator",
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Variable(c) => write!(f, "{}", c),
            Token::Function { name, .. } => write!(f, "{}", name),
            Token::OpeningParenthesis => write!(f, "("),
            Token::ClosingParenthesis => write!(f, ")"),
            Token::Separator => write!(f, ","),
        }
    }
}

/// Render a token stream separated by single spaces, e.g. `3 4 2 * +`.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_table() {
        assert_eq!(Operator::Add.priority(), Operator::Sub.priority());
        assert!(Operator::Mul.priority() > Operator::Add.priority());
        assert!(Operator::Pow.priority() > Operator::Div.priority());
        assert!(Operator::Pow.is_right_associative());
        assert!(!Operator::Sub.is_right_associative());
    }

    #[test]
    fn render_postfix() {
        let tokens = vec![
            Token::Number(3.0),
            Token::Number(4.5),
            Token::Function { name: "max".into(), arity: 2 },
            Token::Operator(Operator::Pow),
        ];
        assert_eq!(render(&tokens), "3 4.5 max ^");
    }

    #[test]
    fn powf_handles_real_exponents() {
        assert_eq!(Operator::Pow.apply(2.0, -1.0), 0.5);
        assert!((Operator::Pow.apply(9.0, 0.5) - 3.0).abs() < 1e-12);
    }
}
