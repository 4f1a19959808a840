use crate::error::Error;

/// How chains of equal-priority operators are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// Equal priorities never pop each other, so `10-3-2` is `10-(3-2)`.
    #[default]
    RightToLeft,
    /// Left-associative for `+ - * /`, right-associative for `^`.
    Conventional,
}

/// Order in which popped arguments are handed to a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentOrder {
    /// Stack pop order: `pow(2,3)` calls pow with (3, 2).
    #[default]
    Reversed,
    /// Order written in the expression.
    Written,
}

/// What the converter does when it meets a `,` between function arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separators {
    /// Dropped without touching the operator stack, so `min(1+2, 3)` is `min(1, 2+3)`.
    #[default]
    Ignored,
    /// Operators back to the call's `(` are flushed first.
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalConfig {
    pub grouping: Grouping,
    pub argument_order: ArgumentOrder,
    pub separators: Separators,
}

pub const GROUPING_ENV: &str = "RPN_GROUPING";
pub const ARGUMENT_ORDER_ENV: &str = "RPN_ARGUMENT_ORDER";
pub const SEPARATORS_ENV: &str = "RPN_SEPARATORS";

impl Grouping {
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "right-to-left" | "rtl" => Ok(Grouping::RightToLeft),
            "conventional" => Ok(Grouping::Conventional),
            other => Err(Error::invalid_input(format!(
                "Unknown grouping '{}', expected 'right-to-left' or 'conventional'",
                other
            ))),
        }
    }
}

impl ArgumentOrder {
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "reversed" => Ok(ArgumentOrder::Reversed),
            "written" => Ok(ArgumentOrder::Written),
            other => Err(Error::invalid_input(format!(
                "Unknown argument order '{}', expected 'reversed' or 'written'",
                other
            ))),
        }
    }
}

impl Separators {
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "ignored" | "ignore" => Ok(Separators::Ignored),
            "flush" => Ok(Separators::Flush),
            other => Err(Error::invalid_input(format!(
                "Unknown separator handling '{}', expected 'ignored' or 'flush'",
                other
            ))),
        }
    }
}

impl EvalConfig {
    /// Textbook behavior: left-to-right grouping, written argument order,
    /// separators flush pending operators.
    pub fn conventional() -> Self {
        Self {
            grouping: Grouping::Conventional,
            argument_order: ArgumentOrder::Written,
            separators: Separators::Flush,
        }
    }

    /// Read `RPN_GROUPING`, `RPN_ARGUMENT_ORDER` and `RPN_SEPARATORS`; unset
    /// variables keep the defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(v) = lookup(GROUPING_ENV) {
            config.grouping = Grouping::parse(&v)?;
        }
        if let Some(v) = lookup(ARGUMENT_ORDER_ENV) {
            config.argument_order = ArgumentOrder::parse(&v)?;
        }
        if let Some(v) = lookup(SEPARATORS_ENV) {
            config.separators = Separators::parse(&v)?;
        }
        Ok(config)
    }
}
