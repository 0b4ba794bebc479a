//! Tokens and lexer for literal input
//!
//! The lexer never fails outright: malformed input becomes a
//! [`TokenKind::Error`] token that the parser reports with its position.

/// A span of source text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// 1-based line of the start
    pub line: u32,
    /// 1-based column of the start, in characters
    pub column: u32,
}

impl Span {
    /// Create a span
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span from the start of `self` to the end of `other`
    pub fn to(self, other: Self) -> Self {
        Self {
            end: other.end,
            ..self
        }
    }

    /// Text this span covers in `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A token with its location
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was scanned
    pub kind: TokenKind,
    /// Where it was scanned
    pub span: Span,
}

impl Token {
    /// Create a token
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// Integer literal, unsigned; signs are separate tokens
    Int(i128),
    /// Float literal
    Float(f64),
    /// String literal with escapes resolved
    Str(String),
    /// Bytes literal (`b'...'`)
    Bytes(Vec<u8>),
    /// Identifier or keyword
    Name(String),
    /// Any other operator character
    Operator(char),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Closing delimiter matching an opening one
    pub fn closing(&self) -> Option<char> {
        match self {
            Self::LParen => Some(')'),
            Self::LBracket => Some(']'),
            Self::LBrace => Some('}'),
            _ => None,
        }
    }

    /// The delimiter character, for open and close tokens
    pub fn delimiter(&self) -> Option<char> {
        match self {
            Self::LParen => Some('('),
            Self::RParen => Some(')'),
            Self::LBracket => Some('['),
            Self::RBracket => Some(']'),
            Self::LBrace => Some('{'),
            Self::RBrace => Some('}'),
            _ => None,
        }
    }
}

/// Lexer over literal source text
pub struct Lexer<'src> {
    rest: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Create a lexer for `source`
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.position;
        let line = self.line;
        let column = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.scan(c),
        };
        Token::new(kind, Span::new(start, self.position, line, column))
    }

    /// Scan every token up to and including `Eof`
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn scan(&mut self, c: char) -> TokenKind {
        let single = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '=' => Some(TokenKind::Equals),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return kind;
        }

        match c {
            '.' if self.peek_char_n(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            '\'' | '"' => self.scan_string(false, false),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_name_start(c) => self.scan_name_or_prefixed_string(),
            c => {
                self.advance();
                TokenKind::Operator(c)
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        let len = c.len_utf8();
        self.rest = &self.rest[len..];
        self.position += len;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\n' | '\r' | '\x0c' => {
                    self.advance();
                }
                '#' => {
                    while self.peek_char().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_name_text(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if !is_name_continue(c) {
                break;
            }
            name.push(c);
            self.advance();
        }
        name
    }

    fn scan_name_or_prefixed_string(&mut self) -> TokenKind {
        let name = self.scan_name_text();
        if matches!(self.peek_char(), Some('\'' | '"')) {
            if let Some((raw, bytes)) = string_prefix(&name) {
                return self.scan_string(raw, bytes);
            }
        }
        TokenKind::Name(name)
    }

    // === Numbers ===

    fn scan_number(&mut self) -> TokenKind {
        if self.peek_char() == Some('0') {
            let radix = match self.peek_char_n(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                self.advance();
                return self.scan_radix_int(radix);
            }
        }

        let mut text = String::new();
        let int_part = self.scan_digits(&mut text);
        let mut is_float = false;

        if self.peek_char() == Some('.') {
            is_float = true;
            text.push('.');
            self.advance();
            if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.scan_digits(&mut text);
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_char_n(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_char_n(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                self.advance();
                if signed {
                    text.extend(self.advance());
                }
                self.scan_digits(&mut text);
            }
        }

        if let Some(err) = self.check_number_end() {
            return err;
        }
        if text.contains("__") || text.ends_with('_') || text.contains("_.") {
            return TokenKind::Error("invalid decimal literal".into());
        }
        let digits: String = text.chars().filter(|&c| c != '_').collect();

        if is_float {
            return match digits.parse::<f64>() {
                Ok(f) => TokenKind::Float(f),
                Err(_) => TokenKind::Error("invalid decimal literal".into()),
            };
        }
        if int_part.len() > 1 && int_part.starts_with('0') && int_part.bytes().any(|b| b != b'0') {
            return TokenKind::Error(
                "leading zeros in decimal integer literals are not permitted; \
                 use an 0o prefix for octal integers"
                    .into(),
            );
        }
        match digits.parse::<i128>() {
            Ok(n) => TokenKind::Int(n),
            Err(_) => TokenKind::Error("integer literal is too large".into()),
        }
    }

    /// Digits and underscores; returns the digits scanned, underscores removed
    fn scan_digits(&mut self, text: &mut String) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if c != '_' {
                break;
            }
            text.push(c);
            self.advance();
        }
        digits
    }

    fn scan_radix_int(&mut self, radix: u32) -> TokenKind {
        let mut digits = String::new();
        let mut last_underscore = false;
        while let Some(c) = self.peek_char() {
            if c == '_' && !last_underscore {
                last_underscore = true;
            } else if c.is_digit(radix) {
                digits.push(c);
                last_underscore = false;
            } else {
                break;
            }
            self.advance();
        }
        let kind = match radix {
            16 => "hexadecimal",
            8 => "octal",
            _ => "binary",
        };
        if digits.is_empty() || last_underscore {
            return TokenKind::Error(format!("invalid {} literal", kind));
        }
        if self.peek_char().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
            return TokenKind::Error(format!("invalid digit in {} literal", kind));
        }
        match i128::from_str_radix(&digits, radix) {
            Ok(n) => TokenKind::Int(n),
            Err(_) => TokenKind::Error("integer literal is too large".into()),
        }
    }

    fn check_number_end(&mut self) -> Option<TokenKind> {
        match self.peek_char() {
            Some('j' | 'J') => {
                self.advance();
                Some(TokenKind::Error("complex literals are not supported".into()))
            }
            Some(c) if is_name_continue(c) => {
                self.scan_name_text();
                Some(TokenKind::Error("invalid decimal literal".into()))
            }
            _ => None,
        }
    }

    // === Strings ===

    fn scan_string(&mut self, raw: bool, bytes: bool) -> TokenKind {
        let Some(quote) = self.advance() else {
            return TokenKind::Error("unterminated string literal".into());
        };
        let mut text = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return TokenKind::Error("unterminated string literal".into());
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    if raw {
                        text.push('\\');
                        match self.advance() {
                            None | Some('\n') => {
                                return TokenKind::Error("unterminated string literal".into())
                            }
                            Some(c) => text.push(c),
                        }
                    } else if let Err(msg) = self.scan_escape(&mut text, bytes) {
                        return TokenKind::Error(msg);
                    }
                }
                Some(c) => {
                    if bytes && !c.is_ascii() {
                        return TokenKind::Error(
                            "bytes can only contain ASCII literal characters".into(),
                        );
                    }
                    text.push(c);
                }
            }
        }

        if bytes {
            // Escapes above 0x7f were pushed as U+0080..=U+00FF
            TokenKind::Bytes(text.chars().map(|c| c as u32 as u8).collect())
        } else {
            TokenKind::Str(text)
        }
    }

    fn scan_escape(&mut self, text: &mut String, bytes: bool) -> Result<(), String> {
        let c = self
            .advance()
            .ok_or_else(|| "unterminated string literal".to_string())?;
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => text.push(c),
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            't' => text.push('\t'),
            'b' => text.push('\x08'),
            'f' => text.push('\x0c'),
            'v' => text.push('\x0b'),
            'a' => text.push('\x07'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek_char().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.advance();
                        }
                        None => break,
                    }
                }
                if bytes {
                    text.push(char::from(code as u8));
                } else {
                    text.push(char_from(code)?);
                }
            }
            'x' => {
                let code = self.scan_hex(2, "\\xXX")?;
                text.push(char_from(code)?);
            }
            'u' if !bytes => {
                let code = self.scan_hex(4, "\\uXXXX")?;
                text.push(char_from(code)?);
            }
            'U' if !bytes => {
                let code = self.scan_hex(8, "\\UXXXXXXXX")?;
                text.push(char_from(code)?);
            }
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    fn scan_hex(&mut self, len: usize, form: &str) -> Result<u32, String> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| format!("truncated {} escape", form))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }
}

fn char_from(code: u32) -> Result<char, String> {
    char::from_u32(code).ok_or_else(|| format!("cannot represent code point U+{:04X}", code))
}

/// `(raw, bytes)` for a valid string prefix
fn string_prefix(name: &str) -> Option<(bool, bool)> {
    match name.to_ascii_lowercase().as_str() {
        "r" => Some((true, false)),
        "u" => Some((false, false)),
        "b" => Some((false, true)),
        "rb" | "br" => Some((true, true)),
        _ => None,
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
