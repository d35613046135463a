//! Error types for building, evaluating and solving algebraic equations.
//!
//! [`AlgebraError::is_retryable`] is the single place where the retry policy of the
//! dependent-variable resolution loop is decided: structural failures (an equation shape the
//! solver cannot isolate, a nested unknown that cannot be resolved right now) let the loop move
//! on to the next registered equation, everything else reaches the caller untouched.
use thiserror::Error;

/// Errors produced while evaluating expressions or solving equations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// A solve was requested for a variable the equation does not mention
    #[error("dependent variable `{variable}` does not exist in equation {equation}")]
    NotInEquation { variable: String, equation: String },
    /// The equation has a shape the solver cannot isolate
    #[error("unsupported equation shape: {0}")]
    UnsupportedShape(String),
    /// The walk reached a leaf that is neither an operation nor the unknown
    #[error("unknown node type `{0}` reached while isolating the unknown")]
    UnknownNodeType(String),
    /// No registered equation produced a value
    #[error("none of the {} equation(s) of `{}` could be solved", .attempts.len(), .variable)]
    Unsolvable {
        variable: String,
        attempts: Vec<AlgebraError>,
    },
    /// A dependent variable was read again while it was being resolved
    #[error("cyclic dependency: `{0}` is already being resolved")]
    Cycle(String),
    /// The occurrence test and the tree walk disagree
    #[error("internal error: {0}")]
    Internal(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow in {0}")]
    Overflow(String),
    #[error("result of {0} is not a finite number")]
    Domain(String),
}

impl AlgebraError {
    /// `true` for failures that only rule out the current equation, so the resolution loop may
    /// try the next one
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AlgebraError::UnsupportedShape(_)
                | AlgebraError::UnknownNodeType(_)
                | AlgebraError::Unsolvable { .. }
                | AlgebraError::Cycle(_)
        )
    }
}

/// Errors produced while reading logger settings or starting the logger
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
