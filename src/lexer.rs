use crate::value::{ErrorCode, RuntimeError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Nil,
    And,
    Or,
    Class,
    Trait,
    With,
    Fun,
    Var,
    If,
    Else,
    While,
    Print,
    Return,
    This,
    Super,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    BangEq,
    Eq,
    EqEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) line: usize,
}

pub(crate) struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(ch) = c {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
            }
        }
        c
    }

    /// Consume `expected` if it is next; used for two-character operators.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek2() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_string(&mut self) -> Result<TokenKind, RuntimeError> {
        let start_line = self.line;
        let mut s = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(RuntimeError::with_location(
                        "Unterminated string.",
                        ErrorCode::ParseGeneric,
                        start_line,
                        None,
                    ));
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some(other) => {
                        return Err(RuntimeError::with_location(
                            format!("Unknown escape sequence '\\{}'.", other),
                            ErrorCode::ParseGeneric,
                            self.line,
                            None,
                        ));
                    }
                    None => {
                        return Err(RuntimeError::with_location(
                            "Unterminated string.",
                            ErrorCode::ParseGeneric,
                            start_line,
                            None,
                        ));
                    }
                },
                Some(c) => s.push(c),
            }
        }
        Ok(TokenKind::Str(s))
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        // Fractional part only when a digit follows the dot, so that
        // `1.abs` stays a method call on `1`.
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.pos += 1;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        // The text is digits with at most one interior dot, always a valid f64.
        TokenKind::Number(text.parse().unwrap_or(0.0))
    }

    fn lex_ident(&mut self, first: char) -> TokenKind {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match text.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "class" => TokenKind::Class,
            "trait" => TokenKind::Trait,
            "with" => TokenKind::With,
            "fun" => TokenKind::Fun,
            "var" => TokenKind::Var,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            _ => TokenKind::Ident(text),
        }
    }

    pub(crate) fn tokenize(&mut self) -> Result<Vec<Token>, RuntimeError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let line = self.line;
            let Some(c) = self.advance() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                });
                return Ok(tokens);
            };
            let kind = match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                ';' => TokenKind::Semicolon,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '!' => {
                    if self.matches('=') {
                        TokenKind::BangEq
                    } else {
                        TokenKind::Bang
                    }
                }
                '=' => {
                    if self.matches('=') {
                        TokenKind::EqEq
                    } else {
                        TokenKind::Eq
                    }
                }
                '<' => {
                    if self.matches('=') {
                        TokenKind::Lte
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    if self.matches('=') {
                        TokenKind::Gte
                    } else {
                        TokenKind::Gt
                    }
                }
                '"' => self.lex_string()?,
                c if c.is_ascii_digit() => self.lex_number(c),
                c if c.is_alphabetic() || c == '_' => self.lex_ident(c),
                other => {
                    return Err(RuntimeError::with_location(
                        format!("Unexpected character '{}'.", other),
                        ErrorCode::ParseGeneric,
                        line,
                        None,
                    ));
                }
            };
            tokens.push(Token { kind, line });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_class_header() {
        assert_eq!(
            kinds("class C < S with T1, T2 {}"),
            vec![
                TokenKind::Class,
                TokenKind::Ident("C".to_string()),
                TokenKind::Lt,
                TokenKind::Ident("S".to_string()),
                TokenKind::With,
                TokenKind::Ident("T1".to_string()),
                TokenKind::Comma,
                TokenKind::Ident("T2".to_string()),
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_numbers() {
        assert_eq!(
            kinds("1 2.5 0.125"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.125),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_followed_by_dot_is_property_access() {
        assert_eq!(
            kinds("1.abs"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Dot,
                TokenKind::Ident("abs".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\"c""#),
            vec![TokenKind::Str("a\nb\"c".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn comments_and_lines() {
        let tokens = Lexer::new("var x; // comment\nx").tokenize().expect("tokenize");
        assert_eq!(tokens[0].line, 1);
        let x_ref = &tokens[3];
        assert_eq!(x_ref.kind, TokenKind::Ident("x".to_string()));
        assert_eq!(x_ref.line, 2);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Lexer::new("\"abc").tokenize().expect_err("should fail");
        assert!(err.message.contains("Unterminated string"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let err = Lexer::new("var x = @;").tokenize().expect_err("should fail");
        assert!(err.message.contains("Unexpected character '@'"));
    }
}
