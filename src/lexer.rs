use core::fmt;

use logos::Logos;

use crate::error::{LispError, Position};

// A symbol may not start with a digit, nor with `-` directly followed by a
// digit; those prefixes always begin a number. Letters and numerals in any
// script are symbol characters.
#[derive(Debug, Logos)]
#[logos(skip r"[\s\x1c-\x1f]+")]
#[logos(skip r";[^\n]*")]
enum Lexeme<'a> {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("#t", |_| true)]
    #[token("#f", |_| false)]
    Boolean(bool),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),

    #[regex(r"[\p{L}\p{Nl}\p{No}+*/=<>!?_][\p{L}\p{N}+*/=<>!?_-]*|-([\p{L}\p{Nl}\p{No}+*/=<>!?_-][\p{L}\p{N}+*/=<>!?_-]*)?", |lex| lex.slice())]
    Symbol(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    OpenParen,
    CloseParen,
    Number(i64),
    Symbol(&'a str),
    Boolean(bool),
    EndOfInput,
}

impl<'a> fmt::Display for TokenKind<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenParen => write!(f, "`(`"),
            Self::CloseParen => write!(f, "`)`"),
            Self::Number(value) => write!(f, "number {}", value),
            Self::Symbol(name) => write!(f, "symbol `{}`", name),
            Self::Boolean(true) => write!(f, "boolean #t"),
            Self::Boolean(false) => write!(f, "boolean #f"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A token together with the position of its first character. Symbols borrow
/// their text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub position: Position,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, position: Position) -> Self {
        Self { kind, position }
    }
}

impl<'a> Lexeme<'a> {
    fn into_kind(self) -> TokenKind<'a> {
        match self {
            Self::LeftParen => TokenKind::OpenParen,
            Self::RightParen => TokenKind::CloseParen,
            Self::Boolean(value) => TokenKind::Boolean(value),
            Self::Number(value) => TokenKind::Number(value),
            Self::Symbol(name) => TokenKind::Symbol(name),
        }
    }
}

// Converts byte offsets handed out by logos into line/column positions. Offsets
// must be requested in increasing order.
struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, offset: 0, position: Position::START }
    }

    fn advance_to(&mut self, offset: usize) -> Position {
        for ch in self.source[self.offset..offset].chars() {
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.offset = offset;
        self.position
    }
}

fn lexical_error(source: &str, start: usize, position: Position) -> LispError {
    let mut rest = source[start..].chars();
    match rest.next() {
        Some('#') => match rest.next() {
            Some(ch) => LispError::lexical(format!("invalid boolean literal `#{}`", ch), position),
            None => LispError::lexical("invalid boolean literal `#` at end of input", position),
        },
        Some(ch) if ch.is_ascii_digit() || ch == '-' => {
            let literal: String = source[start..].chars()
                .enumerate()
                .take_while(|(index, ch)| ch.is_ascii_digit() || (*index == 0 && *ch == '-'))
                .map(|(_, ch)| ch)
                .collect();
            LispError::lexical(format!("integer literal `{}` is out of range", literal), position)
        }
        Some(ch) => LispError::lexical(format!("unexpected character `{}`", ch), position),
        None => LispError::lexical("unexpected end of input", position),
    }
}

/// Splits `source` into tokens. The result always ends with exactly one
/// [TokenKind::EndOfInput] token; the first malformed character aborts the scan.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LispError> {
    let mut tokens = vec![];
    let mut cursor = Cursor::new(source);
    let mut lexer = Lexeme::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let position = cursor.advance_to(span.start);
        match result {
            Ok(lexeme) => tokens.push(Token::new(lexeme.into_kind(), position)),
            Err(_) => return Err(lexical_error(source, span.start, position)),
        }
    }

    tokens.push(Token::new(TokenKind::EndOfInput, cursor.advance_to(source.len())));
    Ok(tokens)
}
