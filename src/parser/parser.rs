//! Parser implementation
//!
//! This module implements a recursive-descent parser for the script
//! language. Binary operators go through a precedence table; everything
//! else has its own function.

use crate::error::{CheckError, CheckResult, SourceLocation, SourcePosition, SourceSpan};
use crate::lexer::{Keyword, Literal as TokenLiteral, TemplateToken, Token, TokenType};
use super::ast::*;

/// Deepest nesting of statements, expressions and patterns the parser accepts
const MAX_DEPTH: u32 = 32;

/// Parser for script source code
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// `in` is not a binary operator while parsing a for-loop head
    no_in: bool,
    depth: u32,
}

/// An operator handled by the precedence climber
#[derive(Debug, Clone, Copy)]
enum Operator {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.token_type == TokenType::Eof) {
            let location = match tokens.last() {
                Some(last) => SourceLocation::new(
                    last.location.end,
                    last.location.end,
                    SourceSpan::new(last.location.span.end_offset, last.location.span.end_offset),
                ),
                None => SourceLocation::default(),
            };
            tokens.push(Token::eof(location));
        }

        Self {
            tokens,
            current: 0,
            no_in: false,
            depth: 0,
        }
    }

    /// Parse tokens into a program
    pub fn parse(&mut self) -> CheckResult<Program> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.statement()?);
        }

        let end = self.peek().location;
        Ok(Program {
            body,
            location: SourceLocation::new(
                SourcePosition::default(),
                end.end,
                SourceSpan::new(0, end.span.end_offset),
            ),
        })
    }

    // ===== Statements =====

    fn statement(&mut self) -> CheckResult<Stmt> {
        self.nested(Self::statement_kind)
    }

    fn statement_kind(&mut self) -> CheckResult<Stmt> {
        let start = self.peek().location;

        if self.check_declaration() {
            let mut decl = self.var_declaration()?;
            self.consume_semicolon()?;
            decl.location = self.finish(start);
            Ok(Stmt::VarDecl(decl))
        } else if self.check_keyword(Keyword::Function) {
            Ok(Stmt::FunctionDecl(self.function(false, start, true)?))
        } else if self.check_async_function() {
            self.advance();
            Ok(Stmt::FunctionDecl(self.function(true, start, true)?))
        } else if self.match_keyword(Keyword::If) {
            self.if_statement(start)
        } else if self.match_keyword(Keyword::While) {
            self.while_statement(start)
        } else if self.match_keyword(Keyword::Do) {
            self.do_while_statement(start)
        } else if self.match_keyword(Keyword::For) {
            self.for_statement(start)
        } else if self.match_keyword(Keyword::Return) {
            self.return_statement(start)
        } else if self.match_keyword(Keyword::Break) {
            self.skip_label();
            self.consume_semicolon()?;
            Ok(Stmt::Break {
                location: self.finish(start),
            })
        } else if self.match_keyword(Keyword::Continue) {
            self.skip_label();
            self.consume_semicolon()?;
            Ok(Stmt::Continue {
                location: self.finish(start),
            })
        } else if self.match_keyword(Keyword::Throw) {
            let value = self.expression()?;
            self.consume_semicolon()?;
            Ok(Stmt::Throw {
                value,
                location: self.finish(start),
            })
        } else if self.match_keyword(Keyword::Try) {
            self.try_statement(start)
        } else if self.match_keyword(Keyword::Switch) {
            self.switch_statement(start)
        } else if self.check(TokenType::LeftBrace) {
            Ok(Stmt::Block(self.block()?))
        } else if self.match_token(TokenType::Semicolon) {
            Ok(Stmt::Empty { location: start })
        } else if self.check(TokenType::Identifier) && self.peek_at(1).token_type == TokenType::Colon {
            // Labels are not tracked; parse the labelled statement on its own
            self.advance();
            self.advance();
            self.statement()
        } else {
            self.expression_statement(start)
        }
    }

    fn var_declaration(&mut self) -> CheckResult<VarDecl> {
        let keyword = self.advance().clone();
        let kind = match keyword.token_type {
            TokenType::Keyword(Keyword::Var) => DeclKind::Var,
            TokenType::Keyword(Keyword::Const) => DeclKind::Const,
            _ => DeclKind::Let,
        };

        let mut declarators = Vec::new();
        loop {
            let target = self.binding_target()?;
            let init = if self.match_token(TokenType::Assign) {
                Some(self.assignment()?)
            } else {
                None
            };
            let location = self.finish(*target.location());
            declarators.push(Declarator {
                target,
                init,
                location,
            });

            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        Ok(VarDecl {
            kind,
            declarators,
            location: self.finish(keyword.location),
        })
    }

    /// `function name(params) { body }`; the `async` prefix is already consumed
    fn function(&mut self, is_async: bool, start: SourceLocation, require_name: bool) -> CheckResult<Function> {
        self.consume_keyword(Keyword::Function, "Expected 'function'")?;
        // Generators parse like plain functions
        self.match_token(TokenType::Star);

        let name = if self.check(TokenType::Identifier) {
            Some(self.consume_identifier("Expected function name")?)
        } else if require_name {
            return Err(self.error("Expected function name"));
        } else {
            None
        };

        let params = self.parameters()?;
        let body = self.function_body()?;

        Ok(Function {
            name,
            params,
            body,
            is_async,
            location: self.finish(start),
        })
    }

    fn parameters(&mut self) -> CheckResult<Vec<Pattern>> {
        self.consume(TokenType::LeftParen, "Expected '(' before parameters")?;

        let mut params = Vec::new();
        loop {
            if self.match_token(TokenType::RightParen) {
                break;
            }

            let param = if self.check(TokenType::Ellipsis) {
                self.rest_pattern()?
            } else {
                self.binding_element()?
            };
            params.push(param);

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightParen, "Expected ')' after parameters")?;
                break;
            }
        }

        Ok(params)
    }

    fn function_body(&mut self) -> CheckResult<Block> {
        self.allow_in(|parser| parser.block())
    }

    fn if_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let condition = self.parenthesized("if")?;
        let consequent = Box::new(self.statement()?);

        let alternate = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            consequent,
            alternate,
            location: self.finish(start),
        })
    }

    fn while_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let condition = self.parenthesized("while")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location: self.finish(start),
        })
    }

    fn do_while_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let body = Box::new(self.statement()?);
        self.consume_keyword(Keyword::While, "Expected 'while' after do body")?;
        let condition = self.parenthesized("while")?;
        self.match_token(TokenType::Semicolon);

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: self.finish(start),
        })
    }

    fn for_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expected '(' after 'for'")?;

        // Initializer, or the left side of for-in / for-of
        let init = if self.check(TokenType::Semicolon) {
            None
        } else if self.check_declaration() {
            self.no_in = true;
            let decl = self.var_declaration()?;
            self.no_in = false;
            Some(ForInit::VarDecl(decl))
        } else {
            self.no_in = true;
            let expr = self.expression()?;
            self.no_in = false;
            Some(ForInit::Expr(expr))
        };

        if let Some(left) = init {
            let kind = if self.match_keyword(Keyword::In) {
                Some(ForEachKind::In)
            } else if self.check_lexeme("of") {
                self.advance();
                Some(ForEachKind::Of)
            } else {
                None
            };

            if let Some(kind) = kind {
                let right = match kind {
                    ForEachKind::In => self.expression()?,
                    ForEachKind::Of => self.assignment()?,
                };
                self.consume(TokenType::RightParen, "Expected ')' after for-each clause")?;
                let body = Box::new(self.statement()?);
                return Ok(Stmt::ForEach {
                    kind,
                    left,
                    right,
                    body,
                    location: self.finish(start),
                });
            }

            return self.for_rest(Some(left), start);
        }

        self.for_rest(None, start)
    }

    /// The `; condition; update) body` part of a C-style for loop
    fn for_rest(&mut self, init: Option<ForInit>, start: SourceLocation) -> CheckResult<Stmt> {
        self.consume(TokenType::Semicolon, "Expected ';' after for initializer")?;

        let condition = if !self.check(TokenType::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::Semicolon, "Expected ';' after for condition")?;

        let update = if !self.check(TokenType::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RightParen, "Expected ')' after for clauses")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
            location: self.finish(start),
        })
    }

    fn return_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let value = if self.check(TokenType::Semicolon)
            || self.check(TokenType::RightBrace)
            || self.is_at_end()
            || self.peek().newline_before
        {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume_semicolon()?;

        Ok(Stmt::Return {
            value,
            location: self.finish(start),
        })
    }

    fn try_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let block = self.block()?;

        let handler = if self.check_keyword(Keyword::Catch) {
            let catch_start = self.advance().location;
            let param = if self.match_token(TokenType::LeftParen) {
                let param = self.binding_target()?;
                self.consume(TokenType::RightParen, "Expected ')' after catch parameter")?;
                Some(param)
            } else {
                None
            };
            let body = self.block()?;
            Some(CatchClause {
                param,
                body,
                location: self.finish(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.match_keyword(Keyword::Finally) {
            Some(self.block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("Expected 'catch' or 'finally' after try block"));
        }

        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
            location: self.finish(start),
        })
    }

    fn switch_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let discriminant = self.parenthesized("switch")?;
        self.consume(TokenType::LeftBrace, "Expected '{' before switch cases")?;

        let mut cases = Vec::new();
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            let case_start = self.peek().location;
            let test = if self.match_keyword(Keyword::Case) {
                Some(self.expression()?)
            } else if self.match_keyword(Keyword::Default) {
                None
            } else {
                return Err(self.error("Expected 'case' or 'default'"));
            };
            self.consume(TokenType::Colon, "Expected ':' after case")?;

            let mut consequent = Vec::new();
            while !self.check_keyword(Keyword::Case)
                && !self.check_keyword(Keyword::Default)
                && !self.check(TokenType::RightBrace)
                && !self.is_at_end()
            {
                consequent.push(self.statement()?);
            }

            cases.push(SwitchCase {
                test,
                consequent,
                location: self.finish(case_start),
            });
        }

        self.consume(TokenType::RightBrace, "Expected '}' after switch cases")?;

        Ok(Stmt::Switch {
            discriminant,
            cases,
            location: self.finish(start),
        })
    }

    fn expression_statement(&mut self, start: SourceLocation) -> CheckResult<Stmt> {
        let expr = self.expression()?;
        self.consume_semicolon()?;
        Ok(Stmt::Expression {
            expr,
            location: self.finish(start),
        })
    }

    fn block(&mut self) -> CheckResult<Block> {
        let start = self.consume(TokenType::LeftBrace, "Expected '{'")?.location;
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(TokenType::RightBrace, "Expected '}' after block")?;
        Ok(Block {
            statements,
            location: self.finish(start),
        })
    }

    /// `( expression )` after `keyword`
    fn parenthesized(&mut self, keyword: &str) -> CheckResult<Expr> {
        self.consume(TokenType::LeftParen, &format!("Expected '(' after '{}'", keyword))?;
        let expr = self.allow_in(|parser| parser.expression())?;
        self.consume(TokenType::RightParen, &format!("Expected ')' after {} condition", keyword))?;
        Ok(expr)
    }

    // ===== Patterns =====

    /// Identifier, array pattern or object pattern
    fn binding_target(&mut self) -> CheckResult<Pattern> {
        if self.check(TokenType::LeftBracket) {
            self.nested(Self::array_pattern)
        } else if self.check(TokenType::LeftBrace) {
            self.nested(Self::object_pattern)
        } else {
            Ok(Pattern::Identifier(self.consume_identifier("Expected variable name")?))
        }
    }

    /// A binding target with an optional `= default`
    fn binding_element(&mut self) -> CheckResult<Pattern> {
        let target = self.binding_target()?;

        if self.match_token(TokenType::Assign) {
            let default = self.allow_in(|parser| parser.assignment())?;
            let location = self.finish(*target.location());
            Ok(Pattern::Assign {
                target: Box::new(target),
                default: Box::new(default),
                location,
            })
        } else {
            Ok(target)
        }
    }

    fn rest_pattern(&mut self) -> CheckResult<Pattern> {
        let start = self.consume(TokenType::Ellipsis, "Expected '...'")?.location;
        let argument = Box::new(self.binding_target()?);
        Ok(Pattern::Rest {
            argument,
            location: self.finish(start),
        })
    }

    fn array_pattern(&mut self) -> CheckResult<Pattern> {
        let start = self.consume(TokenType::LeftBracket, "Expected '['")?.location;
        let mut elements = Vec::new();

        loop {
            if self.match_token(TokenType::RightBracket) {
                break;
            }
            if self.match_token(TokenType::Comma) {
                elements.push(None);
                continue;
            }

            let element = if self.check(TokenType::Ellipsis) {
                self.rest_pattern()?
            } else {
                self.binding_element()?
            };
            elements.push(Some(element));

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightBracket, "Expected ']' after array pattern")?;
                break;
            }
        }

        Ok(Pattern::Array {
            elements,
            location: self.finish(start),
        })
    }

    fn object_pattern(&mut self) -> CheckResult<Pattern> {
        let start = self.consume(TokenType::LeftBrace, "Expected '{'")?.location;
        let mut properties = Vec::new();

        loop {
            if self.match_token(TokenType::RightBrace) {
                break;
            }

            if self.check(TokenType::Ellipsis) {
                properties.push(PatternProperty::Rest(self.rest_pattern()?));
            } else {
                let property_start = self.peek().location;
                let is_shorthand_candidate = self.check(TokenType::Identifier);
                let key = self.property_key()?;

                let value = if self.match_token(TokenType::Colon) {
                    self.binding_element()?
                } else {
                    let PropertyKey::Static { name, location } = &key else {
                        return Err(self.error("Expected ':' after computed key"));
                    };
                    if !is_shorthand_candidate {
                        return Err(self.error("Expected ':' after property name"));
                    }
                    let target = Pattern::Identifier(Identifier {
                        name: name.clone(),
                        location: *location,
                    });
                    if self.match_token(TokenType::Assign) {
                        let default = self.allow_in(|parser| parser.assignment())?;
                        Pattern::Assign {
                            target: Box::new(target),
                            default: Box::new(default),
                            location: self.finish(property_start),
                        }
                    } else {
                        target
                    }
                };

                properties.push(PatternProperty::KeyValue {
                    key,
                    value,
                    location: self.finish(property_start),
                });
            }

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightBrace, "Expected '}' after object pattern")?;
                break;
            }
        }

        Ok(Pattern::Object {
            properties,
            location: self.finish(start),
        })
    }

    // ===== Expressions =====

    fn expression(&mut self) -> CheckResult<Expr> {
        let first = self.assignment()?;
        if !self.check(TokenType::Comma) {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.match_token(TokenType::Comma) {
            expressions.push(self.assignment()?);
        }

        let location = expressions[0].location().to(expressions[expressions.len() - 1].location());
        Ok(Expr::Sequence {
            expressions,
            location,
        })
    }

    fn assignment(&mut self) -> CheckResult<Expr> {
        self.nested(Self::assignment_or_arrow)
    }

    fn assignment_or_arrow(&mut self) -> CheckResult<Expr> {
        if let Some(is_async) = self.arrow_ahead() {
            return self.arrow_function(is_async);
        }

        let expr = self.conditional()?;

        if self.check(TokenType::Assign) || self.check(TokenType::CompoundAssign) {
            let operator_token = self.peek().clone();

            if !matches!(
                expr,
                Expr::Identifier(_) | Expr::Member { .. } | Expr::Array { .. } | Expr::Object { .. }
            ) {
                return Err(CheckError::parse_error(
                    "Invalid assignment target",
                    operator_token.location.start,
                ));
            }

            self.advance();
            let value = self.assignment()?;
            let location = expr.location().to(value.location());
            return Ok(Expr::Assign {
                target: Box::new(expr),
                operator: operator_token.lexeme,
                value: Box::new(value),
                location,
            });
        }

        Ok(expr)
    }

    /// Detect `x =>`, `(…) =>` and their `async` forms; `Some(is_async)` on a match
    fn arrow_ahead(&self) -> Option<bool> {
        let arrow_after_params = |at: usize| -> bool {
            match self.peek_at(at).token_type {
                TokenType::Identifier => self.peek_at(at + 1).token_type == TokenType::FatArrow,
                TokenType::LeftParen => self
                    .matching_paren(self.current + at)
                    .is_some_and(|close| self.token_at(close + 1).token_type == TokenType::FatArrow),
                _ => false,
            }
        };

        if self.check_lexeme("async")
            && !self.peek_at(1).newline_before
            && self.peek_at(1).token_type != TokenType::FatArrow
            && arrow_after_params(1)
        {
            Some(true)
        } else if arrow_after_params(0) {
            Some(false)
        } else {
            None
        }
    }

    fn arrow_function(&mut self, is_async: bool) -> CheckResult<Expr> {
        let start = self.peek().location;
        if is_async {
            self.advance();
        }

        let params = if self.check(TokenType::Identifier) {
            vec![Pattern::Identifier(self.consume_identifier("Expected parameter name")?)]
        } else {
            self.parameters()?
        };

        self.consume(TokenType::FatArrow, "Expected '=>' after arrow parameters")?;

        let body = if self.check(TokenType::LeftBrace) {
            ArrowBody::Block(self.function_body()?)
        } else {
            ArrowBody::Expr(Box::new(self.assignment()?))
        };

        Ok(Expr::Arrow(Box::new(ArrowFunction {
            params,
            body,
            is_async,
            location: self.finish(start),
        })))
    }

    fn conditional(&mut self) -> CheckResult<Expr> {
        let test = self.binary(1)?;

        if !self.match_token(TokenType::Question) {
            return Ok(test);
        }

        let consequent = self.allow_in(|parser| parser.assignment())?;
        self.consume(TokenType::Colon, "Expected ':' in conditional expression")?;
        let alternate = self.assignment()?;

        let location = test.location().to(alternate.location());
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            location,
        })
    }

    /// Precedence climbing over the left-associative binary operators
    fn binary(&mut self, min_precedence: u8) -> CheckResult<Expr> {
        let mut left = self.exponent()?;

        while let Some((precedence, operator)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let right = self.binary(precedence + 1)?;
            let location = left.location().to(right.location());
            left = match operator {
                Operator::Binary(operator) => Expr::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    location,
                },
                Operator::Logical(operator) => Expr::Logical {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    location,
                },
            };
        }

        Ok(left)
    }

    fn binary_operator(&self) -> Option<(u8, Operator)> {
        use Operator::{Binary, Logical};

        let entry = match &self.peek().token_type {
            TokenType::OrOr => (1, Logical(LogicalOp::Or)),
            TokenType::Nullish => (1, Logical(LogicalOp::Nullish)),
            TokenType::AndAnd => (2, Logical(LogicalOp::And)),
            TokenType::Pipe => (3, Binary(BinaryOp::BitOr)),
            TokenType::Caret => (4, Binary(BinaryOp::BitXor)),
            TokenType::Ampersand => (5, Binary(BinaryOp::BitAnd)),
            TokenType::Equal => (6, Binary(BinaryOp::Equal)),
            TokenType::NotEqual => (6, Binary(BinaryOp::NotEqual)),
            TokenType::StrictEqual => (6, Binary(BinaryOp::StrictEqual)),
            TokenType::StrictNotEqual => (6, Binary(BinaryOp::StrictNotEqual)),
            TokenType::Less => (7, Binary(BinaryOp::Less)),
            TokenType::LessEqual => (7, Binary(BinaryOp::LessEqual)),
            TokenType::Greater => (7, Binary(BinaryOp::Greater)),
            TokenType::GreaterEqual => (7, Binary(BinaryOp::GreaterEqual)),
            TokenType::Keyword(Keyword::Instanceof) => (7, Binary(BinaryOp::Instanceof)),
            TokenType::Keyword(Keyword::In) if !self.no_in => (7, Binary(BinaryOp::In)),
            TokenType::ShiftLeft => (8, Binary(BinaryOp::ShiftLeft)),
            TokenType::ShiftRight => (8, Binary(BinaryOp::ShiftRight)),
            TokenType::UShiftRight => (8, Binary(BinaryOp::UnsignedShiftRight)),
            TokenType::Plus => (9, Binary(BinaryOp::Add)),
            TokenType::Minus => (9, Binary(BinaryOp::Subtract)),
            TokenType::Star => (10, Binary(BinaryOp::Multiply)),
            TokenType::Slash => (10, Binary(BinaryOp::Divide)),
            TokenType::Percent => (10, Binary(BinaryOp::Modulo)),
            _ => return None,
        };
        Some(entry)
    }

    /// `**` is right-associative and binds tighter than `*`
    fn exponent(&mut self) -> CheckResult<Expr> {
        let base = self.unary()?;

        if self.match_token(TokenType::StarStar) {
            let power = self.nested(Self::exponent)?;
            let location = base.location().to(power.location());
            return Ok(Expr::Binary {
                left: Box::new(base),
                operator: BinaryOp::Exponent,
                right: Box::new(power),
                location,
            });
        }

        Ok(base)
    }

    fn unary(&mut self) -> CheckResult<Expr> {
        let start = self.peek().location;

        let operator = match &self.peek().token_type {
            TokenType::Bang => Some(UnaryOp::Not),
            TokenType::Minus => Some(UnaryOp::Negate),
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::Tilde => Some(UnaryOp::BitNot),
            TokenType::Keyword(Keyword::Typeof) => Some(UnaryOp::Typeof),
            TokenType::Keyword(Keyword::Void) => Some(UnaryOp::Void),
            TokenType::Keyword(Keyword::Delete) => Some(UnaryOp::Delete),
            _ => None,
        };

        if let Some(operator) = operator {
            self.advance();
            let operand = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Unary {
                operator,
                operand,
                location: self.finish(start),
            });
        }

        if self.check(TokenType::PlusPlus) || self.check(TokenType::MinusMinus) {
            let operator = if self.advance().token_type == TokenType::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let operand = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Update {
                operator,
                prefix: true,
                operand,
                location: self.finish(start),
            });
        }

        if self.check_lexeme("await") && starts_expression(self.peek_at(1)) {
            self.advance();
            let argument = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Await {
                argument,
                location: self.finish(start),
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> CheckResult<Expr> {
        let expr = self.call()?;

        if (self.check(TokenType::PlusPlus) || self.check(TokenType::MinusMinus))
            && !self.peek().newline_before
        {
            let operator = if self.advance().token_type == TokenType::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            let location = self.finish(*expr.location());
            return Ok(Expr::Update {
                operator,
                prefix: false,
                operand: Box::new(expr),
                location,
            });
        }

        Ok(expr)
    }

    fn call(&mut self) -> CheckResult<Expr> {
        let mut expr = if self.check_keyword(Keyword::New) {
            self.new_expression()?
        } else {
            self.primary()?
        };

        loop {
            let start = *expr.location();

            if self.match_token(TokenType::LeftParen) {
                let arguments = self.arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    arguments,
                    optional: false,
                    location: self.finish(start),
                };
            } else if self.match_token(TokenType::Dot) {
                let property = self.property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: MemberProperty::Named(property),
                    optional: false,
                    location: self.finish(start),
                };
            } else if self.match_token(TokenType::QuestionDot) {
                expr = if self.match_token(TokenType::LeftParen) {
                    let arguments = self.arguments()?;
                    Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                        optional: true,
                        location: self.finish(start),
                    }
                } else if self.match_token(TokenType::LeftBracket) {
                    let key = self.allow_in(|parser| parser.expression())?;
                    self.consume(TokenType::RightBracket, "Expected ']' after computed member")?;
                    Expr::Member {
                        object: Box::new(expr),
                        property: MemberProperty::Computed(Box::new(key)),
                        optional: true,
                        location: self.finish(start),
                    }
                } else {
                    let property = self.property_name()?;
                    Expr::Member {
                        object: Box::new(expr),
                        property: MemberProperty::Named(property),
                        optional: true,
                        location: self.finish(start),
                    }
                };
            } else if self.match_token(TokenType::LeftBracket) {
                let key = self.allow_in(|parser| parser.expression())?;
                self.consume(TokenType::RightBracket, "Expected ']' after computed member")?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: MemberProperty::Computed(Box::new(key)),
                    optional: false,
                    location: self.finish(start),
                };
            } else if matches!(self.peek().token_type, TokenType::Template(_)) {
                let quasi = self.template()?;
                expr = Expr::TaggedTemplate {
                    tag: Box::new(expr),
                    quasi: Box::new(quasi),
                    location: self.finish(start),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn new_expression(&mut self) -> CheckResult<Expr> {
        let start = self.consume_keyword(Keyword::New, "Expected 'new'")?.location;

        let mut callee = if self.check_keyword(Keyword::New) {
            self.nested(Self::new_expression)?
        } else {
            self.primary()?
        };

        // Member accesses bind to the callee; the first call ends it
        loop {
            let callee_start = *callee.location();
            if self.match_token(TokenType::Dot) {
                let property = self.property_name()?;
                callee = Expr::Member {
                    object: Box::new(callee),
                    property: MemberProperty::Named(property),
                    optional: false,
                    location: self.finish(callee_start),
                };
            } else if self.match_token(TokenType::LeftBracket) {
                let key = self.allow_in(|parser| parser.expression())?;
                self.consume(TokenType::RightBracket, "Expected ']' after computed member")?;
                callee = Expr::Member {
                    object: Box::new(callee),
                    property: MemberProperty::Computed(Box::new(key)),
                    optional: false,
                    location: self.finish(callee_start),
                };
            } else {
                break;
            }
        }

        let arguments = if self.match_token(TokenType::LeftParen) {
            self.arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            arguments,
            location: self.finish(start),
        })
    }

    /// Call arguments; the `(` is already consumed
    fn arguments(&mut self) -> CheckResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        loop {
            if self.match_token(TokenType::RightParen) {
                break;
            }

            arguments.push(self.allow_in(|parser| parser.spread_or_assignment())?);

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightParen, "Expected ')' after arguments")?;
                break;
            }
        }

        Ok(arguments)
    }

    fn spread_or_assignment(&mut self) -> CheckResult<Expr> {
        if self.check(TokenType::Ellipsis) {
            let start = self.advance().location;
            let argument = Box::new(self.assignment()?);
            Ok(Expr::Spread {
                argument,
                location: self.finish(start),
            })
        } else {
            self.assignment()
        }
    }

    fn primary(&mut self) -> CheckResult<Expr> {
        let location = self.peek().location;

        // Literals
        if let TokenType::Literal(lit) = &self.peek().token_type {
            let value = match lit {
                TokenLiteral::Number(n) => Literal::Number(*n),
                TokenLiteral::String(s) => Literal::String(s.clone()),
            };
            self.advance();
            return Ok(Expr::Literal { value, location });
        }

        if matches!(self.peek().token_type, TokenType::Template(_)) {
            return self.template();
        }

        if self.match_keyword(Keyword::True) {
            return Ok(Expr::Literal {
                value: Literal::Boolean(true),
                location,
            });
        }

        if self.match_keyword(Keyword::False) {
            return Ok(Expr::Literal {
                value: Literal::Boolean(false),
                location,
            });
        }

        if self.match_keyword(Keyword::Null) {
            return Ok(Expr::Literal {
                value: Literal::Null,
                location,
            });
        }

        if self.match_keyword(Keyword::This) {
            return Ok(Expr::This { location });
        }

        // Function expressions
        if self.check_keyword(Keyword::Function) {
            let function = self.function(false, location, false)?;
            return Ok(Expr::Function(Box::new(function)));
        }

        if self.check_async_function() {
            self.advance();
            let function = self.function(true, location, false)?;
            return Ok(Expr::Function(Box::new(function)));
        }

        // Identifiers
        if self.check(TokenType::Identifier) {
            let ident = self.consume_identifier("Expected identifier")?;
            return Ok(Expr::Identifier(ident));
        }

        // Parenthesized expression
        if self.match_token(TokenType::LeftParen) {
            let expr = self.allow_in(|parser| parser.expression())?;
            self.consume(TokenType::RightParen, "Expected ')' after expression")?;
            return Ok(expr);
        }

        if self.match_token(TokenType::LeftBracket) {
            return self.array_literal(location);
        }

        if self.match_token(TokenType::LeftBrace) {
            return self.object_literal(location);
        }

        Err(self.error("Expected expression"))
    }

    fn array_literal(&mut self, start: SourceLocation) -> CheckResult<Expr> {
        let mut elements = Vec::new();

        loop {
            if self.match_token(TokenType::RightBracket) {
                break;
            }
            if self.match_token(TokenType::Comma) {
                elements.push(None);
                continue;
            }

            elements.push(Some(self.allow_in(|parser| parser.spread_or_assignment())?));

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightBracket, "Expected ']' after array elements")?;
                break;
            }
        }

        Ok(Expr::Array {
            elements,
            location: self.finish(start),
        })
    }

    fn object_literal(&mut self, start: SourceLocation) -> CheckResult<Expr> {
        let mut properties = Vec::new();

        loop {
            if self.match_token(TokenType::RightBrace) {
                break;
            }

            let property = self.allow_in(|parser| parser.object_property())?;
            properties.push(property);

            if !self.match_token(TokenType::Comma) {
                self.consume(TokenType::RightBrace, "Expected '}' after object literal")?;
                break;
            }
        }

        Ok(Expr::Object {
            properties,
            location: self.finish(start),
        })
    }

    fn object_property(&mut self) -> CheckResult<Property> {
        if self.match_token(TokenType::Ellipsis) {
            return Ok(Property::Spread(self.assignment()?));
        }

        let start = self.peek().location;

        // `get x() {}`, `set x(v) {}`, `async x() {}` and `*x() {}`
        let modifier = self.check_lexeme("get") || self.check_lexeme("set") || self.check_lexeme("async");
        let is_async = self.check_lexeme("async");
        if modifier && starts_property_key(self.peek_at(1)) {
            self.advance();
        }
        self.match_token(TokenType::Star);

        let is_shorthand_candidate = self.check(TokenType::Identifier);
        let key = self.property_key()?;

        if self.check(TokenType::LeftParen) {
            let params = self.parameters()?;
            let body = self.function_body()?;
            let location = self.finish(start);
            return Ok(Property::Method {
                key,
                function: Function {
                    name: None,
                    params,
                    body,
                    is_async: is_async && modifier,
                    location,
                },
                location,
            });
        }

        if self.match_token(TokenType::Colon) {
            let value = self.assignment()?;
            return Ok(Property::KeyValue {
                key,
                value,
                shorthand: false,
                location: self.finish(start),
            });
        }

        match key {
            PropertyKey::Static { name, location } if is_shorthand_candidate => Ok(Property::KeyValue {
                key: PropertyKey::Static {
                    name: name.clone(),
                    location,
                },
                value: Expr::Identifier(Identifier { name, location }),
                shorthand: true,
                location: self.finish(start),
            }),
            _ => Err(self.error("Expected ':' after property name")),
        }
    }

    fn property_key(&mut self) -> CheckResult<PropertyKey> {
        let location = self.peek().location;

        if self.match_token(TokenType::LeftBracket) {
            let key = self.allow_in(|parser| parser.assignment())?;
            self.consume(TokenType::RightBracket, "Expected ']' after computed key")?;
            return Ok(PropertyKey::Computed(Box::new(key)));
        }

        let name = match &self.peek().token_type {
            TokenType::Identifier | TokenType::Keyword(_) => self.peek().lexeme.clone(),
            TokenType::Literal(TokenLiteral::String(value)) => value.clone(),
            TokenType::Literal(TokenLiteral::Number(_)) => self.peek().lexeme.clone(),
            _ => return Err(self.error("Expected property name")),
        };
        self.advance();

        Ok(PropertyKey::Static { name, location })
    }

    /// Name after `.`: any identifier or reserved word
    fn property_name(&mut self) -> CheckResult<Identifier> {
        if self.check(TokenType::Identifier) || matches!(self.peek().token_type, TokenType::Keyword(_)) {
            let token = self.advance();
            Ok(Identifier {
                name: token.lexeme.clone(),
                location: token.location,
            })
        } else {
            Err(self.error("Expected property name after '.'"))
        }
    }

    /// Template literal; each substitution is parsed from its own tokens
    fn template(&mut self) -> CheckResult<Expr> {
        let token = self.advance().clone();
        let TokenType::Template(TemplateToken {
            quasis,
            substitutions,
        }) = token.token_type
        else {
            return Err(CheckError::parse_error(
                "Expected template literal",
                token.location.start,
            ));
        };

        let mut expressions = Vec::with_capacity(substitutions.len());
        for tokens in substitutions {
            let mut parser = Parser::new(tokens);
            parser.depth = self.depth;
            let expr = parser.expression()?;
            if !parser.is_at_end() {
                return Err(parser.error("Expected '}' after template substitution"));
            }
            expressions.push(expr);
        }

        Ok(Expr::Template {
            quasis,
            expressions,
            location: token.location,
        })
    }

    // ===== Helper Methods =====

    /// Run `parse` with `in` re-enabled as an operator
    fn allow_in<T>(&mut self, parse: impl FnOnce(&mut Self) -> CheckResult<T>) -> CheckResult<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = parse(self);
        self.no_in = saved;
        result
    }

    /// Run `parse` one level deeper, failing once nesting passes `MAX_DEPTH`
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> CheckResult<T>) -> CheckResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("Nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Location from `start` through the last consumed token
    fn finish(&self, start: SourceLocation) -> SourceLocation {
        start.to(&self.previous().location)
    }

    /// Automatic semicolon insertion: a `;`, a `}`, end of input or a line break
    fn consume_semicolon(&mut self) -> CheckResult<()> {
        if self.match_token(TokenType::Semicolon)
            || self.check(TokenType::RightBrace)
            || self.is_at_end()
            || self.peek().newline_before
        {
            return Ok(());
        }

        Err(self.error(&format!(
            "Expected ';' but found {}",
            describe(self.peek())
        )))
    }

    fn skip_label(&mut self) {
        if self.check(TokenType::Identifier) && !self.peek().newline_before {
            self.advance();
        }
    }

    fn check_declaration(&self) -> bool {
        self.check_keyword(Keyword::Var) || self.check_keyword(Keyword::Const) || self.check_let()
    }

    /// `let` only starts a declaration when a binding follows it
    fn check_let(&self) -> bool {
        self.check_lexeme("let")
            && matches!(
                self.peek_at(1).token_type,
                TokenType::Identifier | TokenType::LeftBracket | TokenType::LeftBrace
            )
    }

    fn check_async_function(&self) -> bool {
        self.check_lexeme("async")
            && self.peek_at(1).token_type == TokenType::Keyword(Keyword::Function)
            && !self.peek_at(1).newline_before
    }

    fn check_lexeme(&self, lexeme: &str) -> bool {
        self.check(TokenType::Identifier) && self.peek().lexeme == lexeme
    }

    /// Index of the `)` matching the `(` at `open`
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(open) {
            match token.token_type {
                TokenType::LeftParen => depth += 1,
                TokenType::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                TokenType::Eof => return None,
                _ => {}
            }
        }
        None
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(&token_type)
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        if self.is_at_end() {
            false
        } else {
            matches!(&self.peek().token_type, TokenType::Keyword(k) if k == &keyword)
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::Eof)
    }

    fn peek(&self) -> &Token {
        self.token_at(self.current)
    }

    fn peek_at(&self, distance: usize) -> &Token {
        self.token_at(self.current + distance)
    }

    /// Token at `index`, clamped to the trailing EOF
    fn token_at(&self, index: usize) -> &Token {
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> CheckResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword, message: &str) -> CheckResult<&Token> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> CheckResult<Identifier> {
        if self.check(TokenType::Identifier) {
            let token = self.advance();
            Ok(Identifier {
                name: token.lexeme.clone(),
                location: token.location,
            })
        } else {
            Err(self.error(message))
        }
    }

    /// Parse error at the current token
    fn error(&self, message: &str) -> CheckError {
        CheckError::parse_error(message, self.peek().location.start)
    }
}

fn describe(token: &Token) -> String {
    match token.token_type {
        TokenType::Identifier => format!("identifier '{}'", token.lexeme),
        TokenType::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

/// Whether `token` can begin an operand; decides if `await` is an operator
fn starts_expression(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::Identifier
            | TokenType::Literal(_)
            | TokenType::Template(_)
            | TokenType::LeftParen
            | TokenType::LeftBracket
            | TokenType::LeftBrace
            | TokenType::Bang
            | TokenType::Tilde
            | TokenType::PlusPlus
            | TokenType::MinusMinus
            | TokenType::Keyword(
                Keyword::This
                    | Keyword::New
                    | Keyword::Function
                    | Keyword::True
                    | Keyword::False
                    | Keyword::Null
                    | Keyword::Typeof
                    | Keyword::Void
                    | Keyword::Delete
            )
    )
}

fn starts_property_key(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::Identifier
            | TokenType::Keyword(_)
            | TokenType::Literal(_)
            | TokenType::LeftBracket
            | TokenType::Star
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> CheckResult<Program> {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(tokens).parse()
    }

    fn parse_ok(source: &str) -> Program {
        match parse(source) {
            Ok(program) => program,
            Err(err) => panic!("failed to parse {:?}: {}", source, err),
        }
    }

    fn single_expr(source: &str) -> Expr {
        let mut program = parse_ok(source);
        match program.body.remove(0) {
            Stmt::Expression { expr, .. } => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_ok("").body.is_empty());
        assert!(parse_ok("// only a comment\n").body.is_empty());
    }

    #[test]
    fn test_declarator_locations() {
        let program = parse_ok("const x = 1, y;");
        let Stmt::VarDecl(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.kind, DeclKind::Const);
        assert_eq!(decl.declarators.len(), 2);
        // `x = 1`
        assert_eq!(decl.declarators[0].location.span, SourceSpan::new(6, 11));
        // `y`
        assert_eq!(decl.declarators[1].location.span, SourceSpan::new(13, 14));
        assert_eq!(decl.location.span, SourceSpan::new(0, 15));
    }

    #[test]
    fn test_function_declaration() {
        let program = parse_ok(r#"function greet(name, greeting = "hi", ...rest) { return greeting + name; }"#);
        let Stmt::FunctionDecl(function) = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(function.name.as_ref().map(|n| n.name.as_str()), Some("greet"));
        assert_eq!(function.params.len(), 3);
        let names: Vec<&str> = function
            .params
            .iter()
            .filter_map(|p| p.simple_name())
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "greeting", "rest"]);
        assert_eq!(function.body.statements.len(), 1);
    }

    #[test]
    fn test_asi_on_newlines() {
        let program = parse_ok(indoc! {"
            let a = 1
            let b = a
            a++
            b
        "});
        assert_eq!(program.body.len(), 4);
    }

    #[test]
    fn test_return_with_newline_returns_nothing() {
        let program = parse_ok("function f() {\n  return\n  42\n}");
        let Stmt::FunctionDecl(function) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(matches!(function.body.statements[0], Stmt::Return { value: None, .. }));
        assert_eq!(function.body.statements.len(), 2);
    }

    #[test]
    fn test_missing_semicolon_on_same_line() {
        let err = parse("let a = 1 let b = 2").unwrap_err();
        assert_eq!(err.position(), Some(SourcePosition::new(1, 11)));
        assert!(err.message().contains("Expected ';'"));
    }

    #[test]
    fn test_arrow_functions() {
        let expr = single_expr("(a, b = 2) => a + b;");
        let Expr::Arrow(arrow) = expr else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params.len(), 2);
        assert!(matches!(arrow.body, ArrowBody::Expr(_)));

        let expr = single_expr("x => { return x; };");
        assert!(matches!(expr, Expr::Arrow(ref arrow) if matches!(arrow.body, ArrowBody::Block(_))));

        let expr = single_expr("async (item) => await item;");
        let Expr::Arrow(arrow) = expr else {
            panic!("expected arrow");
        };
        assert!(arrow.is_async);
        assert!(matches!(arrow.body, ArrowBody::Expr(ref body) if matches!(**body, Expr::Await { .. })));
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let expr = single_expr("(a + b) * c;");
        assert!(matches!(
            expr,
            Expr::Binary {
                operator: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_precedence() {
        let expr = single_expr("a || b && c + d * e ** f ** g;");
        let Expr::Logical {
            operator: LogicalOp::Or,
            right,
            ..
        } = expr
        else {
            panic!("expected ||");
        };
        let Expr::Logical {
            operator: LogicalOp::And,
            right,
            ..
        } = *right
        else {
            panic!("expected &&");
        };
        let Expr::Binary {
            operator: BinaryOp::Add,
            right,
            ..
        } = *right
        else {
            panic!("expected +");
        };
        let Expr::Binary {
            operator: BinaryOp::Multiply,
            right,
            ..
        } = *right
        else {
            panic!("expected *");
        };
        // right-associative: e ** (f ** g)
        let Expr::Binary {
            operator: BinaryOp::Exponent,
            right,
            ..
        } = *right
        else {
            panic!("expected **");
        };
        assert!(matches!(
            *right,
            Expr::Binary {
                operator: BinaryOp::Exponent,
                ..
            }
        ));
    }

    #[test]
    fn test_member_and_calls() {
        let expr = single_expr("console.log(items[0], ...rest);");
        let Expr::Call { callee, arguments, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(arguments[1], Expr::Spread { .. }));
        let Expr::Member { property, .. } = *callee else {
            panic!("expected member");
        };
        assert!(matches!(property, MemberProperty::Named(ref name) if name.name == "log"));
    }

    #[test]
    fn test_optional_chaining_and_keywords_as_properties() {
        let expr = single_expr("user?.profile?.[key]?.(1).default;");
        assert!(matches!(expr, Expr::Member { property: MemberProperty::Named(ref n), .. } if n.name == "default"));
    }

    #[test]
    fn test_new_expression() {
        let expr = single_expr("new Map(entries).get(k);");
        let Expr::Call { callee, .. } = expr else {
            panic!("expected call");
        };
        let Expr::Member { object, .. } = *callee else {
            panic!("expected member");
        };
        assert!(matches!(*object, Expr::New { ref arguments, .. } if arguments.len() == 1));
    }

    #[test]
    fn test_object_literal_forms() {
        let expr = single_expr("({ a, b: 1, [k]: 2, 'q': 3, m() { return 1; }, get g() { return 2; }, ...rest });");
        let Expr::Object { properties, .. } = expr else {
            panic!("expected object");
        };
        assert_eq!(properties.len(), 7);
        assert!(matches!(properties[0], Property::KeyValue { shorthand: true, .. }));
        assert!(matches!(properties[1], Property::KeyValue { shorthand: false, .. }));
        assert!(matches!(
            properties[2],
            Property::KeyValue {
                key: PropertyKey::Computed(_),
                ..
            }
        ));
        assert!(matches!(properties[4], Property::Method { .. }));
        assert!(matches!(properties[5], Property::Method { ref key, .. } if matches!(key, PropertyKey::Static { name, .. } if name == "g")));
        assert!(matches!(properties[6], Property::Spread(_)));
    }

    #[test]
    fn test_destructuring_declarations() {
        let program = parse_ok("const { a, b: [c, , d = 1], ...e } = obj;");
        let Stmt::VarDecl(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        let Pattern::Object { properties, .. } = &decl.declarators[0].target else {
            panic!("expected object pattern");
        };
        assert_eq!(properties.len(), 3);
        assert!(matches!(properties[2], PatternProperty::Rest(_)));
        let PatternProperty::KeyValue {
            value: Pattern::Array { elements, .. },
            ..
        } = &properties[1]
        else {
            panic!("expected array pattern");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].is_none());
    }

    #[test]
    fn test_loops() {
        let program = parse_ok(indoc! {"
            for (let i = 0; i < n; i++) {}
            for (const key in obj) {}
            for (const item of list) {}
            for (;;) break;
            while (x) x--;
            do { y(); } while (y)
        "});
        assert!(matches!(program.body[0], Stmt::For { init: Some(ForInit::VarDecl(_)), .. }));
        assert!(matches!(program.body[1], Stmt::ForEach { kind: ForEachKind::In, .. }));
        assert!(matches!(program.body[2], Stmt::ForEach { kind: ForEachKind::Of, .. }));
        assert!(matches!(program.body[3], Stmt::For { init: None, condition: None, .. }));
        assert!(matches!(program.body[4], Stmt::While { .. }));
        assert!(matches!(program.body[5], Stmt::DoWhile { .. }));
    }

    #[test]
    fn test_in_operator_inside_for_head_parens() {
        let program = parse_ok("for (let ok = ('a' in obj); ok; ) {}");
        assert!(matches!(program.body[0], Stmt::For { .. }));
    }

    #[test]
    fn test_try_and_switch() {
        let program = parse_ok(indoc! {"
            try { risky(); } catch (err) { report(err); } finally { done(); }
            switch (kind) {
                case 1:
                case 2: handle(); break;
                default: fallback();
            }
        "});
        let Stmt::Try { handler, finalizer, .. } = &program.body[0] else {
            panic!("expected try");
        };
        assert!(matches!(handler, Some(CatchClause { param: Some(_), .. })));
        assert!(finalizer.is_some());

        let Stmt::Switch { cases, .. } = &program.body[1] else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 3);
        assert!(cases[2].test.is_none());
        assert_eq!(cases[1].consequent.len(), 2);
    }

    #[test]
    fn test_template_substitutions() {
        let expr = single_expr("`Hello, ${first + last}!`;");
        let Expr::Template {
            quasis,
            expressions,
            ..
        } = expr
        else {
            panic!("expected template");
        };
        assert_eq!(quasis.len(), 2);
        let Expr::Binary { left, .. } = &expressions[0] else {
            panic!("expected binary");
        };
        let Expr::Identifier(first) = left.as_ref() else {
            panic!("expected identifier");
        };
        assert_eq!(first.location.start, SourcePosition::new(1, 11));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse("a + b = c;").unwrap_err();
        assert!(err.message().contains("Invalid assignment target"));
    }

    #[test]
    fn test_unclosed_block_reports_end_of_input() {
        let err = parse("function f() {\n  let x = 1;\n").unwrap_err();
        assert!(matches!(err, CheckError::Parse { .. }));
        assert_eq!(err.position(), Some(SourcePosition::new(3, 1)));
    }

    #[test]
    fn test_let_is_contextual() {
        let program = parse_ok("var let = 1;\nlet x = let;\nlet;");
        assert_eq!(program.body.len(), 3);

        let Stmt::VarDecl(first) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(first.kind, DeclKind::Var);
        assert_eq!(first.declarators[0].target.simple_name().map(|id| id.name.as_str()), Some("let"));

        let Stmt::VarDecl(second) = &program.body[1] else {
            panic!("expected declaration");
        };
        assert_eq!(second.kind, DeclKind::Let);
        assert!(matches!(&second.declarators[0].init, Some(Expr::Identifier(id)) if id.name == "let"));

        assert!(matches!(
            &program.body[2],
            Stmt::Expression { expr: Expr::Identifier(id), .. } if id.name == "let"
        ));
    }

    #[test]
    fn test_let_destructuring_and_for_head() {
        let program = parse_ok("let [a, b] = pair;\nfor (let i of items) {}");
        assert!(matches!(&program.body[0], Stmt::VarDecl(decl) if decl.kind == DeclKind::Let));
        assert!(matches!(
            &program.body[1],
            Stmt::ForEach { left: ForInit::VarDecl(decl), .. } if decl.kind == DeclKind::Let
        ));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let depth = 500;
        let sources = [
            format!("{}x{};", "(".repeat(depth), ")".repeat(depth)),
            format!("{}x{};", "[".repeat(depth), "]".repeat(depth)),
            format!("{}x;", "!".repeat(depth)),
            format!("{}{}", "{".repeat(depth), "}".repeat(depth)),
            format!("x = {}1;", "y => ".repeat(depth)),
            format!("var {}a{} = b;", "[".repeat(depth), "]".repeat(depth)),
            format!("{}x;", "new ".repeat(depth)),
        ];

        for source in &sources {
            let err = parse(source).unwrap_err();
            assert!(matches!(err, CheckError::Parse { .. }), "{:?}", err);
            assert_eq!(err.message(), "Nested too deeply");
        }
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let depth = 20;
        parse_ok(&format!("{}x{};", "(".repeat(depth), ")".repeat(depth)));
        parse_ok(&format!("{}{}", "{".repeat(depth), "}".repeat(depth)));
        parse_ok(&format!("f({}1{});", "[".repeat(depth), "]".repeat(depth)));
    }
}
