//! Token definitions for the script language
//!
//! This module defines all token types used in lexical analysis.

use crate::error::SourceLocation;
use std::fmt;

/// A token in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: SourceLocation,
    /// A line terminator appeared between this token and the previous one
    pub newline_before: bool,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, lexeme: String, location: SourceLocation) -> Self {
        Self {
            token_type,
            lexeme,
            location,
            newline_before: false,
        }
    }

    /// An end-of-input token placed at `location`
    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenType::Eof, String::new(), location)
    }
}

/// Token types in the script language
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Literal(Literal),
    Template(TemplateToken),

    // Identifiers and keywords
    Identifier,
    Keyword(Keyword),

    // Arithmetic
    Plus,         // +
    Minus,        // -
    Star,         // *
    StarStar,     // **
    Slash,        // /
    Percent,      // %
    PlusPlus,     // ++
    MinusMinus,   // --

    // Comparison
    Equal,            // ==
    StrictEqual,      // ===
    NotEqual,         // !=
    StrictNotEqual,   // !==
    Less,             // <
    LessEqual,        // <=
    Greater,          // >
    GreaterEqual,     // >=

    // Logical
    AndAnd,       // &&
    OrOr,         // ||
    Nullish,      // ??
    Bang,         // !

    // Bitwise
    Ampersand,    // &
    Pipe,         // |
    Caret,        // ^
    Tilde,        // ~
    ShiftLeft,    // <<
    ShiftRight,   // >>
    UShiftRight,  // >>>

    // Assignment
    Assign,       // =
    /// Compound assignment such as `+=` or `??=`; the lexeme carries the operator
    CompoundAssign,

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    LeftBracket,    // [
    RightBracket,   // ]
    Comma,          // ,
    Dot,            // .
    QuestionDot,    // ?.
    Ellipsis,       // ...
    Colon,          // :
    Semicolon,      // ;
    Question,       // ?
    FatArrow,       // =>

    // Special
    Eof,
}

/// A template literal: `quasis.len() == substitutions.len() + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateToken {
    pub quasis: Vec<String>,
    pub substitutions: Vec<Vec<Token>>,
}

/// Reserved words
///
/// `let`, `of` and `async` stay identifiers; the parser looks at their lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Declarations
    Var,
    Const,
    Function,
    Return,

    // Control flow
    If,
    Else,
    While,
    Do,
    For,
    In,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Throw,
    Try,
    Catch,
    Finally,

    // Literals
    True,
    False,
    Null,
    This,

    // Operators
    New,
    Typeof,
    Void,
    Delete,
    Instanceof,
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "var" => Some(Self::Var),
            "const" => Some(Self::Const),
            "function" => Some(Self::Function),
            "return" => Some(Self::Return),
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "while" => Some(Self::While),
            "do" => Some(Self::Do),
            "for" => Some(Self::For),
            "in" => Some(Self::In),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            "switch" => Some(Self::Switch),
            "case" => Some(Self::Case),
            "default" => Some(Self::Default),
            "throw" => Some(Self::Throw),
            "try" => Some(Self::Try),
            "catch" => Some(Self::Catch),
            "finally" => Some(Self::Finally),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "null" => Some(Self::Null),
            "this" => Some(Self::This),
            "new" => Some(Self::New),
            "typeof" => Some(Self::Typeof),
            "void" => Some(Self::Void),
            "delete" => Some(Self::Delete),
            "instanceof" => Some(Self::Instanceof),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Const => "const",
            Self::Function => "function",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Do => "do",
            Self::For => "for",
            Self::In => "in",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Throw => "throw",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Finally => "finally",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::This => "this",
            Self::New => "new",
            Self::Typeof => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
            Self::Instanceof => "instanceof",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Literal token values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::Number(n)) => write!(f, "number {}", n),
            Self::Literal(Literal::String(_)) => write!(f, "string"),
            Self::Template(_) => write!(f, "template literal"),
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::StarStar => write!(f, "**"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::PlusPlus => write!(f, "++"),
            Self::MinusMinus => write!(f, "--"),
            Self::Equal => write!(f, "=="),
            Self::StrictEqual => write!(f, "==="),
            Self::NotEqual => write!(f, "!="),
            Self::StrictNotEqual => write!(f, "!=="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::AndAnd => write!(f, "&&"),
            Self::OrOr => write!(f, "||"),
            Self::Nullish => write!(f, "??"),
            Self::Bang => write!(f, "!"),
            Self::Ampersand => write!(f, "&"),
            Self::Pipe => write!(f, "|"),
            Self::Caret => write!(f, "^"),
            Self::Tilde => write!(f, "~"),
            Self::ShiftLeft => write!(f, "<<"),
            Self::ShiftRight => write!(f, ">>"),
            Self::UShiftRight => write!(f, ">>>"),
            Self::Assign => write!(f, "="),
            Self::CompoundAssign => write!(f, "compound assignment"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::QuestionDot => write!(f, "?."),
            Self::Ellipsis => write!(f, "..."),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::Question => write!(f, "?"),
            Self::FatArrow => write!(f, "=>"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("const"), Some(Keyword::Const));
        assert_eq!(Keyword::from_str("function"), Some(Keyword::Function));
        assert_eq!(Keyword::from_str("typeof"), Some(Keyword::Typeof));
        assert_eq!(Keyword::from_str("invalid"), None);
        // contextual words stay identifiers
        assert_eq!(Keyword::from_str("of"), None);
        assert_eq!(Keyword::from_str("let"), None);
        assert_eq!(Keyword::from_str("undefined"), None);
    }

    #[test]
    fn test_keyword_round_trip_names() {
        for word in ["var", "const", "instanceof", "finally", "this"] {
            assert_eq!(Keyword::from_str(word).map(|k| k.as_str()), Some(word));
        }
    }

    #[test]
    fn test_token_type_display() {
        assert_eq!(TokenType::StrictNotEqual.to_string(), "!==");
        assert_eq!(TokenType::Keyword(Keyword::Else).to_string(), "keyword 'else'");
        assert_eq!(TokenType::Eof.to_string(), "end of input");
    }
}
