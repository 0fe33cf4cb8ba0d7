use std::{collections::HashMap, rc::Rc};

use crate::{error::{EvaluationError, LispError}, frame::Frame, interpreter::{EvaluationResult, Function, Value}};

/// The fixed set of procedures installed in every global frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Cons,
    Car,
    Cdr,
    List,
    IsNull,
    IsNumber,
    IsBoolean,
    IsList,
}

impl Builtin {
    pub const ALL: [Builtin; 17] = [
        Self::Add, Self::Sub, Self::Mul, Self::Div,
        Self::Eq, Self::Less, Self::Greater, Self::LessEq, Self::GreaterEq,
        Self::Cons, Self::Car, Self::Cdr, Self::List, Self::IsNull,
        Self::IsNumber, Self::IsBoolean, Self::IsList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Cons => "cons",
            Self::Car => "car",
            Self::Cdr => "cdr",
            Self::List => "list",
            Self::IsNull => "null?",
            Self::IsNumber => "number?",
            Self::IsBoolean => "boolean?",
            Self::IsList => "list?",
        }
    }

    pub fn apply(self, values: Vec<Value>) -> EvaluationResult {
        match self {
            Self::Add => builtin_add(values),
            Self::Sub => builtin_sub(values),
            Self::Mul => builtin_mul(values),
            Self::Div => builtin_div(values),
            Self::Eq => builtin_equal(values),
            Self::Less => builtin_compare(self, values, |a, b| a < b),
            Self::Greater => builtin_compare(self, values, |a, b| a > b),
            Self::LessEq => builtin_compare(self, values, |a, b| a <= b),
            Self::GreaterEq => builtin_compare(self, values, |a, b| a >= b),
            Self::Cons => builtin_cons(values),
            Self::Car => builtin_car(values),
            Self::Cdr => builtin_cdr(values),
            Self::List => Ok(Value::list(values)),
            Self::IsNull => builtin_predicate(self, values, |value| matches!(value, Value::List(list) if list.is_empty())),
            Self::IsNumber => builtin_predicate(self, values, |value| matches!(value, Value::Number(_))),
            Self::IsBoolean => builtin_predicate(self, values, |value| matches!(value, Value::Boolean(_))),
            Self::IsList => builtin_predicate(self, values, |value| matches!(value, Value::List(_))),
        }
    }
}

fn arity_error(builtin: Builtin, expected: usize, actual: usize) -> LispError {
    LispError::from(EvaluationError::BuiltinArity { builtin: builtin.name(), expected, actual })
}

fn check_arity(builtin: Builtin, values: &[Value], expected: usize) -> Result<(), LispError> {
    if values.len() != expected {
        return Err(arity_error(builtin, expected, values.len()))
    }
    Ok(())
}

fn type_mismatch(builtin: Builtin, expected: &'static str, found: &Value) -> LispError {
    LispError::from(EvaluationError::TypeMismatch {
        builtin: builtin.name(),
        expected,
        found: format!("{} `{}`", found.type_name(), found),
    })
}

fn to_number(builtin: Builtin, value: &Value) -> Result<i64, LispError> {
    match value {
        Value::Number(number) => Ok(*number),
        other => Err(type_mismatch(builtin, "a number", other)),
    }
}

fn to_list(builtin: Builtin, value: &Value) -> Result<Rc<[Value]>, LispError> {
    match value {
        Value::List(list) => Ok(Rc::clone(list)),
        other => Err(type_mismatch(builtin, "a list", other)),
    }
}

fn overflow(builtin: Builtin) -> LispError {
    LispError::from(EvaluationError::Overflow(builtin.name()))
}

fn binary_numbers(builtin: Builtin, values: &[Value]) -> Result<(i64, i64), LispError> {
    check_arity(builtin, values, 2)?;
    Ok((to_number(builtin, &values[0])?, to_number(builtin, &values[1])?))
}

fn builtin_add(values: Vec<Value>) -> EvaluationResult {
    let mut sum: i64 = 0;
    for value in &values {
        sum = sum.checked_add(to_number(Builtin::Add, value)?)
            .ok_or_else(|| overflow(Builtin::Add))?;
    }
    Ok(Value::Number(sum))
}

fn builtin_sub(values: Vec<Value>) -> EvaluationResult {
    let (a, b) = binary_numbers(Builtin::Sub, &values)?;
    a.checked_sub(b)
        .map(Value::Number)
        .ok_or_else(|| overflow(Builtin::Sub))
}

fn builtin_mul(values: Vec<Value>) -> EvaluationResult {
    // A plain loop over the operands; the product never looks `*` up again
    let mut product: i64 = 1;
    for value in &values {
        product = product.checked_mul(to_number(Builtin::Mul, value)?)
            .ok_or_else(|| overflow(Builtin::Mul))?;
    }
    Ok(Value::Number(product))
}

fn builtin_div(values: Vec<Value>) -> EvaluationResult {
    // Integer division rounding towards negative infinity
    let (a, b) = binary_numbers(Builtin::Div, &values)?;
    if b == 0 { return Err(LispError::from(EvaluationError::DivisionByZero)); }

    let quotient = a.checked_div(b).ok_or_else(|| overflow(Builtin::Div))?;
    if a % b != 0 && (a < 0) != (b < 0) {
        return Ok(Value::Number(quotient - 1))
    }
    Ok(Value::Number(quotient))
}

fn builtin_equal(values: Vec<Value>) -> EvaluationResult {
    // Values of different types are never equal, so `(= 1 #t)` is false
    let [a, b] = <[Value; 2]>::try_from(values)
        .map_err(|values| arity_error(Builtin::Eq, 2, values.len()))?;
    Ok(Value::Boolean(a == b))
}

fn builtin_compare<F: Fn(i64, i64) -> bool>(builtin: Builtin, values: Vec<Value>, f: F) -> EvaluationResult {
    let (a, b) = binary_numbers(builtin, &values)?;
    Ok(Value::Boolean(f(a, b)))
}

fn builtin_cons(values: Vec<Value>) -> EvaluationResult {
    // A non-list tail is wrapped so the result is always a proper list
    let [head, tail] = <[Value; 2]>::try_from(values)
        .map_err(|values| arity_error(Builtin::Cons, 2, values.len()))?;

    match tail {
        Value::List(list) => Ok(Value::list(std::iter::once(head).chain(list.iter().cloned()))),
        other => Ok(Value::list([head, other])),
    }
}

fn builtin_car(values: Vec<Value>) -> EvaluationResult {
    check_arity(Builtin::Car, &values, 1)?;

    let list = to_list(Builtin::Car, &values[0])?;
    Ok(list.first().cloned().unwrap_or(Value::Unit))
}

fn builtin_cdr(values: Vec<Value>) -> EvaluationResult {
    check_arity(Builtin::Cdr, &values, 1)?;

    let list = to_list(Builtin::Cdr, &values[0])?;
    if list.len() <= 1 { return Ok(Value::empty_list()); }
    Ok(Value::list(list[1..].iter().cloned()))
}

fn builtin_predicate(builtin: Builtin, values: Vec<Value>, f: impl Fn(&Value) -> bool) -> EvaluationResult {
    check_arity(builtin, &values, 1)?;
    Ok(Value::Boolean(f(&values[0])))
}

pub(crate) fn builtin_frame() -> Rc<Frame> {
    Frame::with_bindings(HashMap::from_iter(
        Builtin::ALL.into_iter()
            .map(|builtin| (builtin.name().to_owned(), Value::Function(Function::Builtin(builtin))))
    ))
}
