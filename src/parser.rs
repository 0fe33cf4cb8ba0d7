use core::fmt;

use itertools::Itertools;

use crate::{error::{LispError, Position}, lexer::{tokenize, Token, TokenKind}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Boolean(bool),
    Symbol(String),
    List(Vec<Sexp>),
}

// Sexps are the basic building blocks of the language. Every node remembers
// where it started so evaluation diagnostics can point back into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sexp {
    pub expr: Expr,
    pub position: Position,
}

impl Sexp {
    pub fn new(expr: Expr, position: Position) -> Self {
        Self { expr, position }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.expr {
            Expr::Symbol(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Boolean(true) => write!(f, "#t"),
            Expr::Boolean(false) => write!(f, "#f"),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::List(elements) => write!(f, "({})", elements.iter().join(" ")),
        }
    }
}

type ParseResult<O> = Result<O, LispError>;

/// Lists nested deeper than this are rejected with a syntax error.
pub const MAX_NESTING: usize = 512;

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    cursor: usize,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, cursor: 0, depth: 0 }
    }

    // Past the end of the slice we keep answering with end of input, whether or
    // not the caller remembered to terminate the slice.
    fn current(&self) -> Token<'a> {
        match self.tokens.get(self.cursor) {
            Some(token) => *token,
            None => Token::new(TokenKind::EndOfInput, self.end_position()),
        }
    }

    fn end_position(&self) -> Position {
        self.tokens.last().map(|token| token.position).unwrap_or(Position::START)
    }

    fn advance(&mut self) {
        if self.current().kind != TokenKind::EndOfInput {
            self.cursor += 1;
        }
    }

    fn parse_atom(&mut self) -> ParseResult<Sexp> {
        let token = self.current();
        let expr = match token.kind {
            TokenKind::Number(value) => Expr::Number(value),
            TokenKind::Boolean(value) => Expr::Boolean(value),
            TokenKind::Symbol(name) => Expr::Symbol(name.to_owned()),
            other => return Err(LispError::syntax(format!("expected an atom, found {}", other), token.position)),
        };
        self.advance();
        Ok(Sexp::new(expr, token.position))
    }

    fn parse_list(&mut self) -> ParseResult<Sexp> {
        let open = self.current();
        if open.kind != TokenKind::OpenParen {
            return Err(LispError::syntax(format!("expected `(`, found {}", open.kind), open.position));
        }
        if self.depth == MAX_NESTING {
            return Err(LispError::syntax(
                format!("lists nested deeper than {} levels", MAX_NESTING),
                open.position,
            ));
        }
        self.advance();
        self.depth += 1;

        let mut elements = vec![];
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::CloseParen => {
                    self.advance();
                    break
                }
                TokenKind::EndOfInput => return Err(LispError::syntax(
                    format!("unterminated list opened at {}", open.position),
                    token.position,
                )),
                _ => elements.push(self.parse_expression()?),
            }
        }

        self.depth -= 1;
        Ok(Sexp::new(Expr::List(elements), open.position))
    }

    fn parse_expression(&mut self) -> ParseResult<Sexp> {
        match self.current().kind {
            TokenKind::OpenParen => self.parse_list(),
            _ => self.parse_atom(),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Vec<Sexp>> {
        let mut program = vec![];
        while self.current().kind != TokenKind::EndOfInput {
            program.push(self.parse_expression()?);
        }
        Ok(program)
    }
}

/// Builds one [Sexp] per top-level expression in `tokens`.
pub fn parse_tokens(tokens: &[Token<'_>]) -> ParseResult<Vec<Sexp>> {
    Parser::new(tokens).parse_program()
}

/// Tokenizes and parses `input` in one go.
pub fn parse(input: &str) -> ParseResult<Vec<Sexp>> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens)
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    fn number(value: i64, line: usize, column: usize) -> Sexp {
        Sexp::new(Expr::Number(value), Position::new(line, column))
    }

    fn symbol(name: &str, line: usize, column: usize) -> Sexp {
        Sexp::new(Expr::Symbol(name.to_owned()), Position::new(line, column))
    }

    #[test]
    fn parse_atoms() -> anyhow::Result<()> {
        assert_eq!(parse("42 #f foo")?, vec![
            number(42, 1, 1),
            Sexp::new(Expr::Boolean(false), Position::new(1, 4)),
            symbol("foo", 1, 7),
        ]);
        Ok(())
    }

    #[test]
    fn parse_nested_list() -> anyhow::Result<()> {
        let program = parse("(+ 1\n (* 2 3))")?;
        assert_eq!(program, vec![Sexp::new(Expr::List(vec![
            symbol("+", 1, 2),
            number(1, 1, 4),
            Sexp::new(Expr::List(vec![
                symbol("*", 2, 3),
                number(2, 2, 5),
                number(3, 2, 7),
            ]), Position::new(2, 2)),
        ]), Position::new(1, 1))]);
        Ok(())
    }

    #[test]
    fn parse_empty_list_and_program() -> anyhow::Result<()> {
        assert_eq!(parse("()")?, vec![Sexp::new(Expr::List(vec![]), Position::START)]);
        assert!(parse("")?.is_empty());
        assert!(parse("  ; nothing here\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn parse_multiple_top_level_expressions() -> anyhow::Result<()> {
        let program = parse("(define x 1) (define y 2) (+ x y)")?;
        assert_eq!(program.len(), 3);
        assert_eq!(program[2].to_string(), "(+ x y)");
        Ok(())
    }

    #[test]
    fn unterminated_list() {
        let error = parse("(+ 1 (* 2 3)").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.to_string().contains("unterminated list"));
        assert_eq!(error.position(), Some(Position::new(1, 13)));
    }

    #[test]
    fn stray_close_paren() {
        let error = parse("(+ 1 2))").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.position(), Some(Position::new(1, 8)));

        assert_eq!(parse(")").unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn nesting_limit() -> anyhow::Result<()> {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        let program = parse(&nested(MAX_NESTING))?;
        assert_eq!(program.len(), 1);

        let error = parse(&nested(MAX_NESTING + 1)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.position(), Some(Position::new(1, MAX_NESTING + 1)));

        let error = parse(&nested(200_000)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.to_string().contains("nested deeper"));

        // Depth is counted per path, not per program
        let siblings = nested(MAX_NESTING).repeat(3);
        assert_eq!(parse(&siblings)?.len(), 3);
        Ok(())
    }

    #[test]
    fn lexical_errors_surface_through_parse() {
        assert_eq!(parse("(#q)").unwrap_err().kind(), ErrorKind::Lexical);
    }

    #[test]
    fn cursor_never_moves_past_end() -> anyhow::Result<()> {
        let tokens = tokenize("1")?;
        let mut parser = Parser::new(&tokens);
        parser.advance();
        parser.advance();
        parser.advance();
        assert_eq!(parser.current().kind, TokenKind::EndOfInput);

        assert!(parse_tokens(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn display_round_trips_source_shape() -> anyhow::Result<()> {
        let source = "(define f (lambda (x) (if #t (quote (a b)) -3)))";
        assert_eq!(parse(source)?[0].to_string(), source);
        Ok(())
    }
}
