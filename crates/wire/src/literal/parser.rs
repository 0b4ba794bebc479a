//! Recursive-descent parser for literal input
//!
//! ```text
//! document := expr (',' expr)* [','] EOF
//! expr     := ('-' | '+') expr | postfix
//! postfix  := atom ('.' NAME | '(' arguments ')')*
//! atom     := NUMBER | STRING+ | NAME
//!           | '(' [expr (',' expr)* [',']] ')'
//!           | '[' [expr (',' expr)* [',']] ']'
//!           | '{' [expr ':' expr (',' expr ':' expr)* [',']] '}'
//!           | '{' expr (',' expr)* [','] '}'
//! ```

use super::error::EvalError;
use super::lexer::{Lexer, Span, Token, TokenKind};

/// Reserved words that can never be names
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Deepest nesting of brackets, unary signs and postfix operations accepted
pub const MAX_NESTING: usize = 200;

/// A parsed literal expression
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `None`
    None(Span),
    /// `True` or `False`
    Bool(bool, Span),
    /// Integer literal, before range checking
    Int(i128, Span),
    /// Float literal
    Float(f64, Span),
    /// String literal, adjacent literals already joined
    Str(String, Span),
    /// Bytes literal
    Bytes(Vec<u8>, Span),
    /// Bare name
    Name(String, Span),
    /// `[...]`
    List(Vec<Expr>, Span),
    /// `(...)` with at least one comma, or `()`
    Tuple(Vec<Expr>, Span),
    /// `{a, b}`
    Set(Vec<Expr>, Span),
    /// `{k: v}`
    Dict(Vec<(Expr, Expr)>, Span),
    /// `value.name`
    Attribute(Box<Expr>, String, Span),
    /// `func(args, name=value)`
    Call {
        /// What is called
        func: Box<Expr>,
        /// Positional arguments
        args: Vec<Expr>,
        /// Keyword arguments in source order
        keywords: Vec<(String, Expr)>,
        /// Whole call
        span: Span,
    },
    /// `-expr`
    Neg(Box<Expr>, Span),
    /// `+expr`
    Pos(Box<Expr>, Span),
}

impl Expr {
    /// Source span of this node
    pub fn span(&self) -> Span {
        match self {
            Self::None(s)
            | Self::Bool(_, s)
            | Self::Int(_, s)
            | Self::Float(_, s)
            | Self::Str(_, s)
            | Self::Bytes(_, s)
            | Self::Name(_, s)
            | Self::List(_, s)
            | Self::Tuple(_, s)
            | Self::Set(_, s)
            | Self::Dict(_, s)
            | Self::Attribute(_, _, s)
            | Self::Neg(_, s)
            | Self::Pos(_, s) => *s,
            Self::Call { span, .. } => *span,
        }
    }
}

/// Parse a complete literal document
pub fn parse(source: &str) -> Result<Expr, EvalError> {
    Parser::new(source).parse()
}

/// Parser over a token stream
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser for `source`
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: 0,
        }
    }

    /// Parse one document; a top-level comma list is a tuple
    pub fn parse(&mut self) -> Result<Expr, EvalError> {
        let first = self.parse_expr()?;
        let expr = if self.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) && !self.check(&TokenKind::Eof) {
                items.push(self.parse_expr()?);
            }
            let span = items[0].span().to(items[items.len() - 1].span());
            Expr::Tuple(items, span)
        } else {
            first
        };

        if self.check(&TokenKind::Eof) {
            Ok(expr)
        } else {
            Err(self.unexpected())
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_close(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// Error for the current token
    fn unexpected(&self) -> EvalError {
        let span = self.current.span;
        match &self.current.kind {
            TokenKind::Error(msg) => EvalError::syntax(msg.clone(), span),
            TokenKind::Eof => EvalError::syntax("unexpected EOF while parsing", span),
            kind => match kind.delimiter() {
                Some(c) if self.at_close() => EvalError::syntax(format!("unmatched '{}'", c), span),
                _ => EvalError::syntax("invalid syntax", span),
            },
        }
    }

    /// Take one nesting level, failing past [`MAX_NESTING`]
    fn descend(&mut self) -> Result<(), EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::syntax(
                "too many nested parentheses",
                self.current.span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect_close(&mut self, open: &Token) -> Result<Span, EvalError> {
        let open_char = open.kind.delimiter().unwrap_or('(');
        let expected = open.kind.closing();
        match self.current.kind.delimiter() {
            Some(c) if Some(c) == expected => Ok(self.advance().span),
            Some(c) if self.at_close() => Err(EvalError::syntax(
                format!(
                    "closing parenthesis '{}' does not match opening parenthesis '{}'",
                    c, open_char
                ),
                self.current.span,
            )),
            _ if self.check(&TokenKind::Eof) => Err(EvalError::syntax(
                format!("'{}' was never closed", open_char),
                open.span,
            )),
            _ => Err(self.unexpected()),
        }
    }

    // === Expressions ===

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let depth = self.depth;
        self.descend()?;
        let result = self.parse_unary();
        self.depth = depth;
        result
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.current.kind {
            TokenKind::Minus => {
                let op = self.advance();
                let operand = self.parse_expr()?;
                let span = op.span.to(operand.span());
                Ok(Expr::Neg(Box::new(operand), span))
            }
            TokenKind::Plus => {
                let op = self.advance();
                let operand = self.parse_expr()?;
                let span = op.span.to(operand.span());
                Ok(Expr::Pos(Box::new(operand), span))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, EvalError> {
        let depth = self.depth;
        let result = self.parse_postfix_chain();
        self.depth = depth;
        result
    }

    /// Each `.name` or call wraps the expression one level deeper
    fn parse_postfix_chain(&mut self) -> Result<Expr, EvalError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.current.kind {
                TokenKind::Dot | TokenKind::LParen => self.descend()?,
                _ => return Ok(expr),
            }
            match self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let TokenKind::Name(name) = &self.current.kind else {
                        return Err(self.unexpected());
                    };
                    let name = name.clone();
                    let end = self.advance().span;
                    let span = expr.span().to(end);
                    expr = Expr::Attribute(Box::new(expr), name, span);
                }
                _ => expr = self.parse_call(expr)?,
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, EvalError> {
        let span = self.current.span;
        match &self.current.kind {
            TokenKind::Int(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Int(n, span))
            }
            TokenKind::Float(f) => {
                let f = *f;
                self.advance();
                Ok(Expr::Float(f, span))
            }
            TokenKind::Str(_) | TokenKind::Bytes(_) => self.parse_strings(),
            TokenKind::Name(name) => {
                let expr = match name.as_str() {
                    "None" => Expr::None(span),
                    "True" => Expr::Bool(true, span),
                    "False" => Expr::Bool(false, span),
                    n if KEYWORDS.contains(&n) => return Err(self.unexpected()),
                    n => Expr::Name(n.to_string(), span),
                };
                self.advance();
                Ok(expr)
            }
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBracket => {
                let open = self.advance();
                let (items, span) = self.finish_sequence(&open, Vec::new())?;
                Ok(Expr::List(items, span))
            }
            TokenKind::LBrace => self.parse_brace(),
            _ => Err(self.unexpected()),
        }
    }

    /// Adjacent string literals join into one
    fn parse_strings(&mut self) -> Result<Expr, EvalError> {
        let start = self.current.span;
        let mut end = start;
        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;

        loop {
            match &self.current.kind {
                TokenKind::Str(s) if bytes.is_none() => {
                    text.get_or_insert_with(String::new).push_str(s);
                }
                TokenKind::Bytes(b) if text.is_none() => {
                    bytes.get_or_insert_with(Vec::new).extend_from_slice(b);
                }
                TokenKind::Str(_) | TokenKind::Bytes(_) => {
                    return Err(EvalError::syntax(
                        "cannot mix bytes and nonbytes literals",
                        self.current.span,
                    ));
                }
                _ => break,
            }
            end = self.advance().span;
        }

        let span = start.to(end);
        Ok(match bytes {
            Some(b) => Expr::Bytes(b, span),
            None => Expr::Str(text.unwrap_or_default(), span),
        })
    }

    fn parse_paren(&mut self) -> Result<Expr, EvalError> {
        let open = self.advance();
        if self.check(&TokenKind::RParen) {
            let close = self.advance().span;
            return Ok(Expr::Tuple(Vec::new(), open.span.to(close)));
        }
        let first = self.parse_expr()?;
        if self.check(&TokenKind::Comma) {
            let (items, span) = self.finish_sequence(&open, vec![first])?;
            return Ok(Expr::Tuple(items, span));
        }
        self.expect_close(&open)?;
        Ok(first)
    }

    fn parse_brace(&mut self) -> Result<Expr, EvalError> {
        let open = self.advance();
        if self.check(&TokenKind::RBrace) {
            let close = self.advance().span;
            return Ok(Expr::Dict(Vec::new(), open.span.to(close)));
        }
        let first = self.parse_expr()?;
        if !self.check(&TokenKind::Colon) {
            let (items, span) = self.finish_sequence(&open, vec![first])?;
            return Ok(Expr::Set(items, span));
        }

        let mut entries = Vec::new();
        let mut key = first;
        loop {
            if !self.eat(&TokenKind::Colon) {
                return Err(EvalError::syntax(
                    "':' expected after dictionary key",
                    self.current.span,
                ));
            }
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) || self.at_close() {
                break;
            }
            key = self.parse_expr()?;
        }
        let close = self.expect_close(&open)?;
        Ok(Expr::Dict(entries, open.span.to(close)))
    }

    /// Comma-separated expressions following `items`, through the closer
    fn finish_sequence(
        &mut self,
        open: &Token,
        mut items: Vec<Expr>,
    ) -> Result<(Vec<Expr>, Span), EvalError> {
        if items.is_empty() || self.eat(&TokenKind::Comma) {
            while !self.at_close() {
                items.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.expect_close(open)?;
        Ok((items, open.span.to(close)))
    }

    fn parse_call(&mut self, func: Expr) -> Result<Expr, EvalError> {
        let open = self.advance();
        let mut args = Vec::new();
        let mut keywords: Vec<(String, Expr)> = Vec::new();

        while !self.at_close() {
            let arg = self.parse_expr()?;
            let arg_span = arg.span();
            if self.check(&TokenKind::Equals) {
                let Expr::Name(name, at) = arg else {
                    return Err(EvalError::syntax(
                        "expression cannot contain assignment, perhaps you meant \"==\"?",
                        arg_span,
                    ));
                };
                self.advance();
                if keywords.iter().any(|(k, _)| *k == name) {
                    return Err(EvalError::syntax(
                        format!("keyword argument repeated: {}", name),
                        at,
                    ));
                }
                let value = self.parse_expr()?;
                keywords.push((name, value));
            } else if !keywords.is_empty() {
                return Err(EvalError::syntax(
                    "positional argument follows keyword argument",
                    arg_span,
                ));
            } else {
                args.push(arg);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let close = self.expect_close(&open)?;
        let span = func.span().to(close);
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
            span,
        })
    }
}
