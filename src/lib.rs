
mod builtin;
mod context;
mod error;
mod frame;
mod interpreter;
mod lexer;
mod parser;

#[cfg(test)]
mod test_utils;

pub use builtin::Builtin;
pub use context::EvaluationContext;
pub use error::{ErrorKind, EvaluationError, LispError, Position};
pub use frame::Frame;
pub use interpreter::{evaluate, quote, Closure, EvaluationResult, Function, Value};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_tokens, Expr, Sexp, MAX_NESTING};
