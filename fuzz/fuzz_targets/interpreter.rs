#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins, literals and loads from variables
#[derive(Arbitrary, Debug)]
enum LispAtom {
    Add, Sub, Mul, Div,
    True, False,
    Eq, Less, Greater, LessEq, GreaterEq,

    Cons, Car, Cdr, List,
    IsNull, IsNumber, IsBoolean, IsList,

    Identifier(u8),
    Number(i64),
}

impl fmt::Display for LispAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            LispAtom::Add => "+",
            LispAtom::Sub => "-",
            LispAtom::Mul => "*",
            LispAtom::Div => "/",
            LispAtom::True => "#t",
            LispAtom::False => "#f",
            LispAtom::Eq => "=",
            LispAtom::Less => "<",
            LispAtom::Greater => ">",
            LispAtom::LessEq => "<=",
            LispAtom::GreaterEq => ">=",
            LispAtom::Cons => "cons",
            LispAtom::Car => "car",
            LispAtom::Cdr => "cdr",
            LispAtom::List => "list",
            LispAtom::IsNull => "null?",
            LispAtom::IsNumber => "number?",
            LispAtom::IsBoolean => "boolean?",
            LispAtom::IsList => "list?",
            // A small pool of names so definitions and lookups meet
            LispAtom::Identifier(index) => return write!(f, "v{}", index % 8),
            LispAtom::Number(value) => return write!(f, "{}", value),
        })
    }
}

#[derive(Arbitrary, Debug)]
enum LispCommand {
    Lambda(Vec<LispCommand>),
    Define(Vec<LispCommand>),
    If(Vec<LispCommand>),
    Quote(Vec<LispCommand>),
    Begin(Vec<LispCommand>),
    Apply(Vec<LispCommand>),

    Atom(LispAtom),
}

fn stringify_arguments(values: &[LispCommand]) -> String {
    values.iter()
        .map(LispCommand::to_string)
        .join(" ")
}

impl fmt::Display for LispCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (head, args) = match self {
            LispCommand::Atom(atom) => return atom.fmt(f),
            LispCommand::Apply(args) => return write!(f, "({})", stringify_arguments(args)),
            LispCommand::Lambda(args) => ("lambda", args),
            LispCommand::Define(args) => ("define", args),
            LispCommand::If(args) => ("if", args),
            LispCommand::Quote(args) => ("quote", args),
            LispCommand::Begin(args) => ("begin", args),
        };

        write!(f, "({} {})", head, stringify_arguments(args))
    }
}

fuzz_target!(|commands: Vec<LispCommand>| {
    let mut context = tinylisp::EvaluationContext::new();

    for command in commands {
        let _ = context.run(&command.to_string());
    }
});
