use std::rc::Rc;

use log::debug;

use crate::{builtin::builtin_frame, frame::Frame, interpreter::{evaluate, EvaluationResult, Value}, parser::{parse, Sexp}};


/// An evaluation context owns one global frame, populated with the builtins
/// once at construction, and evaluates source text against it.
///
/// Definitions made by one call to [EvaluationContext::run] stay visible to the
/// next, which is what a line-at-a-time caller such as a REPL needs.
pub struct EvaluationContext {
    frame: Rc<Frame>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self { frame: builtin_frame() }
    }

    pub fn global_frame(&self) -> &Rc<Frame> {
        &self.frame
    }

    pub fn evaluate_sexp(&mut self, sexp: &Sexp) -> EvaluationResult {
        evaluate(sexp, &self.frame)
    }

    /// Parses `source` and evaluates every top-level expression in order,
    /// returning the value of the last one ([Value::Unit] when there is none).
    /// Evaluation stops at the first error; definitions made before it remain.
    pub fn run(&mut self, source: &str) -> EvaluationResult {
        let program = parse(source)?;
        debug!("evaluating {} top-level expression(s)", program.len());

        let mut result = Value::Unit;
        for sexp in &program {
            result = self.evaluate_sexp(sexp)?;
        }
        Ok(result)
    }
}
