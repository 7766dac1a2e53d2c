//! Lexer/Scanner implementation
//!
//! This module implements lexical analysis, converting source code into tokens.
//! Columns are counted in characters, offsets in bytes.

use crate::error::{CheckError, CheckResult, SourceLocation, SourcePosition, SourceSpan};
use super::token::{Keyword, Literal, TemplateToken, Token, TokenType};

/// Deepest template-in-substitution nesting the lexer accepts
const MAX_TEMPLATE_DEPTH: usize = 32;

/// Where a token started
#[derive(Debug, Clone, Copy)]
struct Mark {
    index: usize,
    position: SourcePosition,
}

/// Lexer for script source code
pub struct Lexer {
    source: Vec<char>,
    /// Byte offset of every char, plus the total length
    offsets: Vec<usize>,
    tokens: Vec<Token>,
    current: usize,
    line: usize,
    column: usize,
    saw_newline: bool,
    template_depth: usize,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut offsets = Vec::with_capacity(source.len() + 1);
        for (offset, c) in source.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(source.len());

        Self {
            source: chars,
            offsets,
            tokens: Vec::new(),
            current: 0,
            line: 1,
            column: 1,
            saw_newline: false,
            template_depth: 0,
        }
    }

    /// Tokenize the source code
    pub fn tokenize(&mut self) -> CheckResult<Vec<Token>> {
        // A byte order mark takes no column
        if self.peek() == '\u{feff}' {
            self.current += 1;
        }
        if self.peek() == '#' && self.peek_next() == '!' {
            self.skip_line();
        }

        while !self.is_at_end() {
            let mark = self.mark();
            self.scan_token(mark)?;
        }

        let end = self.mark();
        let mut eof = Token::eof(self.location_from(end));
        eof.newline_before = self.saw_newline;
        self.tokens.push(eof);

        Ok(std::mem::take(&mut self.tokens))
    }

    /// Scan a single token
    fn scan_token(&mut self, mark: Mark) -> CheckResult<()> {
        let c = self.advance();

        match c {
            // Whitespace (skip)
            ' ' | '\t' | '\u{feff}' | '\u{a0}' | '\u{b}' | '\u{c}' => Ok(()),

            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                self.saw_newline = true;
                Ok(())
            }

            // Single-character tokens
            '(' => self.add_token(TokenType::LeftParen, mark),
            ')' => self.add_token(TokenType::RightParen, mark),
            '{' => self.add_token(TokenType::LeftBrace, mark),
            '}' => self.add_token(TokenType::RightBrace, mark),
            '[' => self.add_token(TokenType::LeftBracket, mark),
            ']' => self.add_token(TokenType::RightBracket, mark),
            ',' => self.add_token(TokenType::Comma, mark),
            ';' => self.add_token(TokenType::Semicolon, mark),
            ':' => self.add_token(TokenType::Colon, mark),
            '~' => self.add_token(TokenType::Tilde, mark),

            '.' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number(mark)
                } else if self.peek() == '.' && self.peek_next() == '.' {
                    self.advance();
                    self.advance();
                    self.add_token(TokenType::Ellipsis, mark)
                } else {
                    self.add_token(TokenType::Dot, mark)
                }
            }

            '?' => {
                if self.match_char('?') {
                    if self.match_char('=') {
                        self.add_token(TokenType::CompoundAssign, mark)
                    } else {
                        self.add_token(TokenType::Nullish, mark)
                    }
                } else if self.peek() == '.' && !self.peek_next().is_ascii_digit() {
                    self.advance();
                    self.add_token(TokenType::QuestionDot, mark)
                } else {
                    self.add_token(TokenType::Question, mark)
                }
            }

            '+' => {
                if self.match_char('+') {
                    self.add_token(TokenType::PlusPlus, mark)
                } else {
                    self.operator_or_assign(TokenType::Plus, mark)
                }
            }

            '-' => {
                if self.match_char('-') {
                    self.add_token(TokenType::MinusMinus, mark)
                } else {
                    self.operator_or_assign(TokenType::Minus, mark)
                }
            }

            '*' => {
                if self.match_char('*') {
                    self.operator_or_assign(TokenType::StarStar, mark)
                } else {
                    self.operator_or_assign(TokenType::Star, mark)
                }
            }

            '%' => self.operator_or_assign(TokenType::Percent, mark),
            '^' => self.operator_or_assign(TokenType::Caret, mark),

            '&' => {
                if self.match_char('&') {
                    self.operator_or_assign(TokenType::AndAnd, mark)
                } else {
                    self.operator_or_assign(TokenType::Ampersand, mark)
                }
            }

            '|' => {
                if self.match_char('|') {
                    self.operator_or_assign(TokenType::OrOr, mark)
                } else {
                    self.operator_or_assign(TokenType::Pipe, mark)
                }
            }

            '=' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        self.add_token(TokenType::StrictEqual, mark)
                    } else {
                        self.add_token(TokenType::Equal, mark)
                    }
                } else if self.match_char('>') {
                    self.add_token(TokenType::FatArrow, mark)
                } else {
                    self.add_token(TokenType::Assign, mark)
                }
            }

            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        self.add_token(TokenType::StrictNotEqual, mark)
                    } else {
                        self.add_token(TokenType::NotEqual, mark)
                    }
                } else {
                    self.add_token(TokenType::Bang, mark)
                }
            }

            '<' => {
                if self.match_char('<') {
                    self.operator_or_assign(TokenType::ShiftLeft, mark)
                } else if self.match_char('=') {
                    self.add_token(TokenType::LessEqual, mark)
                } else {
                    self.add_token(TokenType::Less, mark)
                }
            }

            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        self.operator_or_assign(TokenType::UShiftRight, mark)
                    } else {
                        self.operator_or_assign(TokenType::ShiftRight, mark)
                    }
                } else if self.match_char('=') {
                    self.add_token(TokenType::GreaterEqual, mark)
                } else {
                    self.add_token(TokenType::Greater, mark)
                }
            }

            // Comments
            '/' => {
                if self.match_char('/') {
                    self.skip_line();
                    Ok(())
                } else if self.match_char('*') {
                    self.scan_multiline_comment(mark)
                } else {
                    self.operator_or_assign(TokenType::Slash, mark)
                }
            }

            // String literals
            '"' | '\'' => self.scan_string(c, mark),

            '`' => self.scan_template(mark),

            // Number literals
            c if c.is_ascii_digit() => self.scan_number(mark),

            // Identifiers and keywords
            c if is_identifier_start(c) => self.scan_identifier(mark),

            // Unexpected character
            _ => Err(self.error_at(mark.position, &format!("Unexpected character '{}'", c))),
        }
    }

    /// Emit `plain`, or a compound assignment when `=` follows
    fn operator_or_assign(&mut self, plain: TokenType, mark: Mark) -> CheckResult<()> {
        if self.match_char('=') {
            self.add_token(TokenType::CompoundAssign, mark)
        } else {
            self.add_token(plain, mark)
        }
    }

    /// Scan a string literal delimited by `quote`
    fn scan_string(&mut self, quote: char, mark: Mark) -> CheckResult<()> {
        let mut value = String::new();

        loop {
            if self.is_at_end() || matches!(self.peek(), '\n' | '\r') {
                return Err(self.error_at(mark.position, "Unterminated string"));
            }

            let c = self.advance();
            if c == quote {
                break;
            }
            if c == '\\' {
                self.scan_escape(&mut value, mark)?;
            } else {
                value.push(c);
            }
        }

        self.add_token(TokenType::Literal(Literal::String(value)), mark)
    }

    /// Decode one escape sequence; the backslash is already consumed
    fn scan_escape(&mut self, value: &mut String, mark: Mark) -> CheckResult<()> {
        if self.is_at_end() {
            return Err(self.error_at(mark.position, "Unterminated string"));
        }

        let escaped = self.advance();
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' => value.push('\0'),
            // Line continuation
            '\n' => {}
            '\r' => {
                self.match_char('\n');
            }
            'x' => {
                let code = self.scan_hex_digits(2)?;
                value.push(code_point(code));
            }
            'u' => {
                let code = if self.match_char('{') {
                    let mut code = 0u32;
                    while self.peek() != '}' {
                        let digit = self.advance().to_digit(16).ok_or_else(|| {
                            self.error("Invalid unicode escape sequence")
                        })?;
                        code = code.saturating_mul(16).saturating_add(digit);
                    }
                    self.advance();
                    code
                } else {
                    self.scan_hex_digits(4)?
                };
                value.push(code_point(code));
            }
            other => value.push(other),
        }
        Ok(())
    }

    fn scan_hex_digits(&mut self, count: usize) -> CheckResult<u32> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .to_digit(16)
                .ok_or_else(|| self.error("Invalid hexadecimal escape sequence"))?;
            self.advance();
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Scan a template literal, lexing each `${...}` substitution in place
    fn scan_template(&mut self, mark: Mark) -> CheckResult<()> {
        let mut quasis = Vec::new();
        let mut substitutions = Vec::new();
        let mut cooked = String::new();

        loop {
            if self.is_at_end() {
                return Err(self.error_at(mark.position, "Unterminated template literal"));
            }

            let c = self.advance();
            match c {
                '`' => break,
                '\\' => self.scan_escape(&mut cooked, mark)?,
                '$' if self.peek() == '{' => {
                    self.advance();
                    quasis.push(std::mem::take(&mut cooked));
                    if self.template_depth >= MAX_TEMPLATE_DEPTH {
                        return Err(self.error_at(mark.position, "Template literals nested too deeply"));
                    }
                    self.template_depth += 1;
                    let substitution = self.scan_substitution(mark);
                    self.template_depth -= 1;
                    substitutions.push(substitution?);
                }
                _ => cooked.push(c),
            }
        }
        quasis.push(cooked);

        self.add_token(
            TokenType::Template(TemplateToken {
                quasis,
                substitutions,
            }),
            mark,
        )
    }

    /// Lex tokens up to the `}` that closes a template substitution
    fn scan_substitution(&mut self, template: Mark) -> CheckResult<Vec<Token>> {
        let first = self.tokens.len();
        let mut depth = 0usize;

        loop {
            if self.is_at_end() {
                return Err(self.error_at(template.position, "Unterminated template literal"));
            }

            let before = self.tokens.len();
            let mark = self.mark();
            self.scan_token(mark)?;
            if self.tokens.len() == before {
                continue;
            }

            match self.tokens[self.tokens.len() - 1].token_type {
                TokenType::LeftBrace => depth += 1,
                TokenType::RightBrace if depth == 0 => {
                    self.tokens.pop();
                    break;
                }
                TokenType::RightBrace => depth -= 1,
                _ => {}
            }
        }

        Ok(self.tokens.split_off(first))
    }

    /// Scan a number literal
    fn scan_number(&mut self, mark: Mark) -> CheckResult<()> {
        let first = self.source[mark.index];

        if first == '0' && matches!(self.peek(), 'x' | 'X' | 'b' | 'B' | 'o' | 'O') {
            let radix = match self.advance() {
                'x' | 'X' => 16,
                'b' | 'B' => 2,
                _ => 8,
            };
            while self.peek().is_digit(radix) || self.peek() == '_' {
                self.advance();
            }
            self.match_char('n');

            let digits: String = self.source[mark.index + 2..self.current]
                .iter()
                .filter(|c| **c != '_' && **c != 'n')
                .collect();
            let value = u64::from_str_radix(&digits, radix)
                .map_err(|_| self.error_at(mark.position, &format!("Invalid number literal '{}'", self.lexeme(mark))))?;
            return self.add_token(TokenType::Literal(Literal::Number(value as f64)), mark);
        }

        // `first` may be the '.' of a leading-dot literal
        if first != '.' {
            self.digits();
            if self.peek() == '.' {
                self.advance();
            }
        }
        self.digits();

        if matches!(self.peek(), 'e' | 'E')
            && (self.peek_next().is_ascii_digit()
                || (matches!(self.peek_next(), '+' | '-')
                    && self.source.get(self.current + 2).is_some_and(|c| c.is_ascii_digit())))
        {
            self.advance();
            self.match_char('+');
            self.match_char('-');
            self.digits();
        }

        // BigInt suffix
        self.match_char('n');

        if is_identifier_start(self.peek()) {
            return Err(self.error("Identifier starts immediately after numeric literal"));
        }

        let text: String = self
            .lexeme(mark)
            .chars()
            .filter(|c| *c != '_' && *c != 'n')
            .collect();
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error_at(mark.position, &format!("Invalid number literal '{}'", text)))?;
        self.add_token(TokenType::Literal(Literal::Number(value)), mark)
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() || (self.peek() == '_' && self.peek_next().is_ascii_digit()) {
            self.advance();
        }
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, mark: Mark) -> CheckResult<()> {
        while is_identifier_part(self.peek()) {
            self.advance();
        }

        let lexeme = self.lexeme(mark);

        // Check if it's a keyword
        let token_type = if let Some(keyword) = Keyword::from_str(&lexeme) {
            TokenType::Keyword(keyword)
        } else {
            TokenType::Identifier
        };

        self.add_token(token_type, mark)
    }

    /// Scan a multi-line comment; these do not nest
    fn scan_multiline_comment(&mut self, mark: Mark) -> CheckResult<()> {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            if is_line_terminator(self.advance()) {
                self.saw_newline = true;
            }
        }

        Err(self.error_at(mark.position, "Unterminated multi-line comment"))
    }

    fn skip_line(&mut self) {
        while !is_line_terminator(self.peek()) && !self.is_at_end() {
            self.advance();
        }
    }

    /// Add a token spanning from `mark` to the current position
    fn add_token(&mut self, token_type: TokenType, mark: Mark) -> CheckResult<()> {
        let lexeme = self.lexeme(mark);
        let location = self.location_from(mark);
        let mut token = Token::new(token_type, lexeme, location);
        token.newline_before = std::mem::take(&mut self.saw_newline);
        self.tokens.push(token);
        Ok(())
    }

    fn lexeme(&self, mark: Mark) -> String {
        self.source[mark.index..self.current].iter().collect()
    }

    fn location_from(&self, mark: Mark) -> SourceLocation {
        SourceLocation::new(
            mark.position,
            self.current_position(),
            SourceSpan::new(self.offsets[mark.index], self.offsets[self.current]),
        )
    }

    fn mark(&self) -> Mark {
        Mark {
            index: self.current,
            position: self.current_position(),
        }
    }

    /// Advance to the next character; `\r\n` counts as one line break
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if is_line_terminator(c) && !(c == '\r' && self.peek() == '\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Check if the next character matches and consume it if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    /// Peek at the next character without consuming it
    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }

    /// Create an error at the current position
    fn error(&self, message: &str) -> CheckError {
        self.error_at(self.current_position(), message)
    }

    fn error_at(&self, position: SourcePosition, message: &str) -> CheckError {
        CheckError::lexer_error(message, position)
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Lone surrogates have no `char`; they decode to the replacement character
fn code_point(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize_source(source: &str) -> CheckResult<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize()
    }

    fn types(source: &str) -> Vec<TokenType> {
        tokenize_source(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize_source("").unwrap();
        assert_eq!(tokens.len(), 1); // Just EOF
        assert_eq!(tokens[0].token_type, TokenType::Eof);
    }

    #[test]
    fn test_single_character_tokens() {
        assert_eq!(
            types("(){}[],;.:~"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::LeftBracket,
                TokenType::RightBracket,
                TokenType::Comma,
                TokenType::Semicolon,
                TokenType::Dot,
                TokenType::Colon,
                TokenType::Tilde,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_multi_character_operators() {
        assert_eq!(
            types("=== !== => ... ?. ?? ** ++ >>> &&"),
            vec![
                TokenType::StrictEqual,
                TokenType::StrictNotEqual,
                TokenType::FatArrow,
                TokenType::Ellipsis,
                TokenType::QuestionDot,
                TokenType::Nullish,
                TokenType::StarStar,
                TokenType::PlusPlus,
                TokenType::UShiftRight,
                TokenType::AndAnd,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_compound_assignment_keeps_operator() {
        let tokens = tokenize_source("a += 1; b ??= c; d **= 2").unwrap();
        let compound: Vec<&str> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::CompoundAssign)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(compound, vec!["+=", "??=", "**="]);
    }

    #[test]
    fn test_conditional_before_decimal_is_not_optional_chain() {
        assert_eq!(
            types("a?.5:1"),
            vec![
                TokenType::Identifier,
                TokenType::Question,
                TokenType::Literal(Literal::Number(0.5)),
                TokenType::Colon,
                TokenType::Literal(Literal::Number(1.0)),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        let tokens = tokenize_source("let const function of undefined").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].token_type, TokenType::Keyword(Keyword::Const));
        assert_eq!(tokens[2].token_type, TokenType::Keyword(Keyword::Function));
        assert_eq!(tokens[3].token_type, TokenType::Identifier);
        assert_eq!(tokens[4].token_type, TokenType::Identifier);
    }

    #[test]
    fn test_identifiers() {
        let tokens = tokenize_source("foo $el _private myVar123 café").unwrap();
        let names: Vec<&str> = tokens[..5].iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(names, vec!["foo", "$el", "_private", "myVar123", "café"]);
        assert!(tokens[..5].iter().all(|t| t.token_type == TokenType::Identifier));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(
            types("0 42 3.14 .5 1e3 0xff 0b101 1_000 10n"),
            vec![
                TokenType::Literal(Literal::Number(0.0)),
                TokenType::Literal(Literal::Number(42.0)),
                TokenType::Literal(Literal::Number(3.14)),
                TokenType::Literal(Literal::Number(0.5)),
                TokenType::Literal(Literal::Number(1000.0)),
                TokenType::Literal(Literal::Number(255.0)),
                TokenType::Literal(Literal::Number(5.0)),
                TokenType::Literal(Literal::Number(1000.0)),
                TokenType::Literal(Literal::Number(10.0)),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals_and_escapes() {
        let tokens = tokenize_source(r#""hello\nworld" 'it\'s' "A\x42""#).unwrap();
        assert_eq!(
            tokens[0].token_type,
            TokenType::Literal(Literal::String("hello\nworld".to_string()))
        );
        assert_eq!(
            tokens[1].token_type,
            TokenType::Literal(Literal::String("it's".to_string()))
        );
        assert_eq!(
            tokens[2].token_type,
            TokenType::Literal(Literal::String("AB".to_string()))
        );
    }

    #[test]
    fn test_template_substitutions_are_lexed_in_place() {
        let tokens = tokenize_source("`Hi ${user.name}!`").unwrap();
        let TokenType::Template(template) = &tokens[0].token_type else {
            panic!("expected template, got {:?}", tokens[0].token_type);
        };
        assert_eq!(template.quasis, vec!["Hi ".to_string(), "!".to_string()]);
        assert_eq!(template.substitutions.len(), 1);

        let inner = &template.substitutions[0];
        assert_eq!(inner.len(), 3);
        assert_eq!(inner[0].lexeme, "user");
        assert_eq!(inner[0].location.start, SourcePosition::new(1, 7));
        assert_eq!(inner[0].location.span, SourceSpan::new(6, 10));
    }

    #[test]
    fn test_template_substitution_with_nested_braces() {
        let tokens = tokenize_source("`${ {a: 1}.a }` + x").unwrap();
        let TokenType::Template(template) = &tokens[0].token_type else {
            panic!("expected template");
        };
        assert_eq!(template.substitutions[0].len(), 7);
        assert_eq!(tokens[1].token_type, TokenType::Plus);
        assert_eq!(tokens[2].lexeme, "x");
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize_source("let x = 42 // trailing\n/* block\n */ let y").unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["let", "x", "=", "42", "let", "y", ""]);
        assert!(tokens[4].newline_before);
        assert!(!tokens[1].newline_before);
    }

    #[test]
    fn test_locations_use_chars_and_bytes() {
        let tokens = tokenize_source("é = 1\n  foo").unwrap();
        // 'é' is one column but two bytes
        assert_eq!(tokens[1].location.start, SourcePosition::new(1, 3));
        assert_eq!(tokens[1].location.span, SourceSpan::new(3, 4));

        let foo = &tokens[3];
        assert_eq!(foo.location.start, SourcePosition::new(2, 3));
        assert_eq!(foo.location.end, SourcePosition::new(2, 6));
        assert_eq!(foo.location.span, SourceSpan::new(9, 12));
    }

    #[test]
    fn test_every_line_terminator_starts_a_line() {
        let tokens = tokenize_source("a\rb\r\nc\u{2028}d\u{2029}e").unwrap();
        let lines: Vec<usize> = tokens[..5].iter().map(|t| t.location.start.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
        assert!(tokens[1..5].iter().all(|t| t.newline_before));
        assert_eq!(tokens[2].location.start, SourcePosition::new(3, 1));
        // `\r\n` is two bytes but one line break
        assert_eq!(tokens[2].location.span, SourceSpan::new(5, 6));
    }

    #[test]
    fn test_line_comment_ends_at_carriage_return() {
        let tokens = tokenize_source("// note\rvalue").unwrap();
        assert_eq!(tokens[0].lexeme, "value");
        assert_eq!(tokens[0].location.start, SourcePosition::new(2, 1));
    }

    #[test]
    fn test_byte_order_mark_takes_no_column() {
        let tokens = tokenize_source("\u{feff}const q = 1;").unwrap();
        assert_eq!(tokens[0].location.start, SourcePosition::new(1, 1));
        assert_eq!(tokens[0].location.span, SourceSpan::new(3, 8));
        assert_eq!(tokens[1].location.start, SourcePosition::new(1, 7));
    }

    #[test]
    fn test_deeply_nested_templates_are_rejected() {
        let depth = 200;
        let source = format!("{}x{}", "`${".repeat(depth), "}`".repeat(depth));
        let err = tokenize_source(&source).unwrap_err();
        assert_eq!(err.message(), "Template literals nested too deeply");

        let shallow = format!("{}x{}", "`${".repeat(4), "}`".repeat(4));
        assert!(tokenize_source(&shallow).is_ok());
    }

    #[test]
    fn test_hashbang_line() {
        let tokens = tokenize_source("#!/usr/bin/env node\nx").unwrap();
        assert_eq!(tokens[0].lexeme, "x");
    }

    #[test]
    fn test_unterminated_string() {
        let result = tokenize_source("let s = \"unterminated");
        match result {
            Err(CheckError::Lexer { message, position }) => {
                assert!(message.contains("Unterminated string"));
                assert_eq!(position, SourcePosition::new(1, 9));
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_character() {
        let result = tokenize_source("let x = @");
        match result {
            Err(CheckError::Lexer { message, position }) => {
                assert!(message.contains("Unexpected character '@'"));
                assert_eq!(position, SourcePosition::new(1, 9));
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }
}
