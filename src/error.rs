use core::fmt;

use thiserror::Error;

/// A 1-based line/column pair pointing at the first character of a token
/// or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The coarse class of a [LispError], mostly useful for callers that only
/// care which stage of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Evaluation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LispError {
    #[error("lexical error: {message} at {position}")]
    Lexical { message: String, position: Position },

    #[error("syntax error: {message} at {position}")]
    Syntax { message: String, position: Position },

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl LispError {
    pub(crate) fn lexical(message: impl Into<String>, position: Position) -> Self {
        Self::Lexical { message: message.into(), position }
    }

    pub(crate) fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::Syntax { message: message.into(), position }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical { .. } => ErrorKind::Lexical,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::Evaluation(_) => ErrorKind::Evaluation,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexical { position, .. } | Self::Syntax { position, .. } => Some(*position),
            Self::Evaluation(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("undefined name `{0}`")]
    UndefinedName(String),

    #[error("`{form}` expects {expected} operand(s), got {actual}")]
    FormArity { form: &'static str, expected: &'static str, actual: usize },

    #[error("malformed `{form}`: {reason}")]
    MalformedForm { form: &'static str, reason: String },

    #[error("not a function: {0}")]
    NotAFunction(String),

    #[error("function expects {expected} argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("`{builtin}` expects {expected} argument(s), got {actual}")]
    BuiltinArity { builtin: &'static str, expected: usize, actual: usize },

    #[error("`{builtin}` expects {expected}, got {found}")]
    TypeMismatch { builtin: &'static str, expected: &'static str, found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),
}
