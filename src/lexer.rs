use crate::error::{Error, ErrorKind};
use crate::functions::FunctionRegistry;
use crate::token::{Operator, Token};
use tracing::debug;

/// Single-pass tokenizer. The digit and letter buffers live in this value,
/// so every `tokenize` call starts from empty buffers.
pub struct Lexer<'a> {
    registry: &'a FunctionRegistry,
    chars: Vec<char>,
    tokens: Vec<Token>,
    digits: String,
    digits_start: usize,
    letters: Vec<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &str, registry: &'a FunctionRegistry) -> Self {
        Self {
            registry,
            chars: input.chars().filter(|c| !c.is_whitespace()).collect(),
            tokens: Vec::new(),
            digits: String::new(),
            digits_start: 0,
            letters: Vec::new(),
        }
    }

    fn push_operator(&mut self, op: Operator) {
        self.tokens.push(Token::Operator(op));
    }

    fn flush_digits(&mut self) -> Result<(), Error> {
        if self.digits.is_empty() {
            return Ok(());
        }
        let n: f64 = self.digits.parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidNumber,
                format!("Invalid number '{}'", self.digits),
                Some(self.digits_start),
            )
        })?;
        self.tokens.push(Token::Number(n));
        self.digits.clear();
        Ok(())
    }

    // Each buffered letter is its own variable: `xy` is `x*y`.
    fn flush_letters(&mut self) {
        let letters = std::mem::take(&mut self.letters);
        for (i, c) in letters.iter().enumerate() {
            if i > 0 {
                self.push_operator(Operator::Mul);
            }
            self.tokens.push(Token::Variable(*c));
        }
    }

    fn flush_all(&mut self) -> Result<(), Error> {
        self.flush_digits()?;
        self.flush_letters();
        Ok(())
    }

    fn function(&mut self, position: usize) -> Result<(), Error> {
        let name: String = std::mem::take(&mut self.letters).into_iter().collect();
        let arity = self.registry.arity(&name).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownFunction(name.clone()),
                format!("Unknown function '{}'", name),
                Some(position),
            )
        })?;
        self.tokens.push(Token::Function { name, arity });
        Ok(())
    }

    fn unexpected(chars: &[char], c: char, position: usize) -> Error {
        let stripped: String = chars.iter().collect();
        Error::new(
            ErrorKind::UnexpectedCharacter(c),
            format!("Unexpected symbol in '{}' on index {}: '{}'", stripped, position, c),
            Some(position),
        )
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let chars = std::mem::take(&mut self.chars);
        for (i, &c) in chars.iter().enumerate() {
            let position = i + 1;
            match c {
                '0'..='9' | '.' => {
                    // No multiplication is inferred after a letter run: `x2`, `sqrt4(9)`.
                    if !self.letters.is_empty() {
                        return Err(Self::unexpected(&chars, c, position));
                    }
                    if self.digits.is_empty() {
                        self.digits_start = position;
                    }
                    self.digits.push(c);
                }
                'a'..='z' => {
                    // `2x` is `2*x`
                    if !self.digits.is_empty() {
                        self.flush_digits()?;
                        self.push_operator(Operator::Mul);
                    }
                    self.letters.push(c);
                }
                ',' => {
                    self.flush_all()?;
                    self.tokens.push(Token::Separator);
                }
                '(' => {
                    debug_assert!(self.digits.is_empty() || self.letters.is_empty());
                    if !self.letters.is_empty() {
                        self.function(position)?;
                    } else if !self.digits.is_empty() {
                        // `2(3+4)` is `2*(3+4)`
                        self.flush_digits()?;
                        self.push_operator(Operator::Mul);
                    }
                    self.tokens.push(Token::OpeningParenthesis);
                }
                ')' => {
                    self.flush_all()?;
                    self.tokens.push(Token::ClosingParenthesis);
                }
                _ => match Operator::from_char(c) {
                    Some(op) => {
                        self.flush_all()?;
                        self.push_operator(op);
                    }
                    None => return Err(Self::unexpected(&chars, c, position)),
                },
            }
        }
        self.flush_all()?;
        debug!(tokens = self.tokens.len(), "tokenized expression");
        Ok(self.tokens)
    }
}

/// Split `input` into tokens, resolving function arities against `registry`.
pub fn tokenize(input: &str, registry: &FunctionRegistry) -> Result<Vec<Token>, Error> {
    Lexer::new(input, registry).tokenize()
}
