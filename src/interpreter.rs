use core::fmt;
use std::{collections::HashSet, rc::Rc};

use itertools::Itertools;
use log::trace;

use crate::{builtin::Builtin, error::{EvaluationError, LispError}, frame::Frame, parser::{Expr, Sexp}};

pub type EvaluationResult = Result<Value, LispError>;

// Value type produced by evaluating expressions. Variants are inspected by tag
// only; there are no implicit conversions between them.
#[derive(Clone, PartialEq)]
pub enum Value {
    Unit,
    Number(i64),
    Boolean(bool),
    Str(Rc<str>),
    List(Rc<[Value]>),
    Function(Function),
}

impl Value {
    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Self::List(values.into_iter().collect())
    }

    pub fn empty_list() -> Self {
        Self::List(Rc::from(Vec::new()))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Str(_) => "symbol",
            Self::List(_) => "list",
            Self::Function(_) => "function",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "#<unit>"),
            Self::Number(number) => number.fmt(f),
            Self::Boolean(true) => write!(f, "#t"),
            Self::Boolean(false) => write!(f, "#f"),
            Self::Str(text) => write!(f, "{}", text),
            Self::List(values) => write!(f, "({})", values.iter().join(" ")),
            Self::Function(function) => function.fmt(f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Display).fmt(f)
    }
}

#[derive(Clone)]
pub enum Function {
    Builtin(Builtin),
    Lisp(Rc<Closure>),
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Lisp(a), Self::Lisp(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
            Self::Lisp(closure) => write!(f, "<lambda ({})>", closure.parameters.iter().join(" ")),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Display).fmt(f)
    }
}

impl Function {
    pub fn call(&self, arguments: Vec<Value>) -> EvaluationResult {
        match self {
            Self::Builtin(builtin) => builtin.apply(arguments),
            Self::Lisp(closure) => closure.call(arguments),
        }
    }
}

/// A user-defined procedure. The captured frame is the one that was active
/// when the `lambda` was evaluated, not the frame of whoever calls it.
pub struct Closure {
    parameters: Vec<String>,
    body: Vec<Sexp>,
    environment: Rc<Frame>,
}

impl Closure {
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn body(&self) -> &[Sexp] {
        &self.body
    }

    pub fn environment(&self) -> &Rc<Frame> {
        &self.environment
    }

    fn call(&self, arguments: Vec<Value>) -> EvaluationResult {
        if arguments.len() != self.parameters.len() {
            return Err(LispError::from(EvaluationError::ArityMismatch {
                expected: self.parameters.len(),
                actual: arguments.len(),
            }))
        }
        trace!("calling lambda ({}) with {} argument(s)", self.parameters.iter().join(" "), arguments.len());

        let frame = Frame::child(&self.environment);
        for (parameter, argument) in self.parameters.iter().zip(arguments) {
            frame.define(parameter.as_str(), argument);
        }

        evaluate_sequence(&self.body, &frame)
    }
}

fn form_arity(form: &'static str, expected: &'static str, actual: usize) -> LispError {
    EvaluationError::FormArity { form, expected, actual }.into()
}

fn malformed(form: &'static str, reason: impl Into<String>) -> LispError {
    EvaluationError::MalformedForm { form, reason: reason.into() }.into()
}

fn evaluate_sequence(body: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    let mut result = Value::Unit;
    for sexp in body {
        result = evaluate(sexp, frame)?;
    }
    Ok(result)
}

fn evaluate_define(operands: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    // (define name expr) evaluates expr here and binds it in this very frame

    if operands.len() != 2 { return Err(form_arity("define", "2", operands.len())); }
    let name = operands[0].as_symbol()
        .ok_or_else(|| malformed("define", format!("expected a symbol to bind, found `{}`", operands[0])))?;

    let value = evaluate(&operands[1], frame)?;
    frame.define(name, value);
    Ok(Value::Unit)
}

fn evaluate_lambda(operands: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    // (lambda (param...) body...) needs a parameter list of distinct symbols
    // and at least one body expression

    if operands.len() < 2 { return Err(form_arity("lambda", "at least 2", operands.len())); }
    let parameter_list = match &operands[0].expr {
        Expr::List(elements) => elements,
        _ => return Err(malformed("lambda", format!("expected a parameter list, found `{}`", operands[0]))),
    };

    let mut seen = HashSet::new();
    let parameters = parameter_list.iter()
        .map(|sexp| match sexp.as_symbol() {
            Some(name) if seen.insert(name) => Ok(name.to_owned()),
            Some(name) => Err(malformed("lambda", format!("duplicate parameter `{}`", name))),
            None => Err(malformed("lambda", format!("parameter `{}` is not a symbol", sexp))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Function(Function::Lisp(Rc::new(Closure {
        parameters,
        body: operands[1..].to_vec(),
        environment: Rc::clone(frame),
    }))))
}

fn evaluate_if(operands: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    // Only the taken branch is evaluated; anything but #f counts as true

    if operands.len() != 3 { return Err(form_arity("if", "3", operands.len())); }

    if evaluate(&operands[0], frame)?.is_truthy() {
        evaluate(&operands[1], frame)
    } else {
        evaluate(&operands[2], frame)
    }
}

fn evaluate_quote(operands: &[Sexp]) -> EvaluationResult {
    if operands.len() != 1 { return Err(form_arity("quote", "1", operands.len())); }
    Ok(quote(&operands[0]))
}

/// Converts an expression into data without evaluating it. Symbols become
/// their names.
pub fn quote(sexp: &Sexp) -> Value {
    match &sexp.expr {
        Expr::Number(value) => Value::Number(*value),
        Expr::Boolean(value) => Value::Boolean(*value),
        Expr::Symbol(name) => Value::Str(Rc::from(name.as_str())),
        Expr::List(elements) => Value::list(elements.iter().map(quote)),
    }
}

fn evaluate_application(expression: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    // The callee is evaluated first, then the arguments from left to right

    let function = match evaluate(&expression[0], frame)? {
        Value::Function(function) => function,
        other => return Err(EvaluationError::NotAFunction(other.to_string()).into()),
    };

    let arguments = expression[1..].iter()
        .map(|sexp| evaluate(sexp, frame))
        .collect::<Result<Vec<_>, _>>()?;

    function.call(arguments)
}

fn evaluate_expression(expression: &[Sexp], frame: &Rc<Frame>) -> EvaluationResult {
    // Special forms are recognised by their leading symbol alone, so they
    // cannot be shadowed by a binding of the same name

    let Some(head) = expression.first() else { return Ok(Value::empty_list()) };
    let operands = &expression[1..];

    match head.as_symbol() {
        Some("define") => evaluate_define(operands, frame),
        Some("lambda") => evaluate_lambda(operands, frame),
        Some("if") => evaluate_if(operands, frame),
        Some("quote") => evaluate_quote(operands),
        Some("begin") => evaluate_sequence(operands, frame),
        _ => evaluate_application(expression, frame),
    }
}

pub fn evaluate(sexp: &Sexp, frame: &Rc<Frame>) -> EvaluationResult {
    match &sexp.expr {
        Expr::Number(value) => Ok(Value::Number(*value)),
        Expr::Boolean(value) => Ok(Value::Boolean(*value)),
        Expr::Symbol(name) => Ok(frame.lookup(name)?),
        Expr::List(expression) => evaluate_expression(expression, frame),
    }
}
