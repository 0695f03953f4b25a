// ABOUTME: Recursive-descent parser turning a token stream into a list of statement nodes

use crate::ast::{Expr, FunctionDecl, IdGen, Stmt};
use crate::error::Diagnostics;
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;
use std::rc::Rc;

const MAX_ARGS: usize = 255;

/// Signals that a parse error was already reported through `Diagnostics` and the parser should
/// synchronize to the next statement boundary. Carries no message of its own.
#[derive(Debug)]
struct ParseError;

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    diagnostics: &'a Diagnostics,
    ids: &'a IdGen,
}

/// Parses a full program (REPL line or script) into a list of statements. `ids` must be the
/// same `IdGen` used across the whole process so `Variable`/`Assign` node ids never collide
/// with those embedded in earlier, still-live closures (see `ast::IdGen`).
pub fn parse(tokens: &[Token], diagnostics: &Diagnostics, ids: &IdGen) -> Vec<Stmt> {
    let mut parser = Parser {
        tokens,
        current: 0,
        diagnostics,
        ids,
    };
    let mut statements = Vec::new();
    while !parser.is_at_end() {
        if let Some(stmt) = parser.declaration() {
            statements.push(stmt);
        }
    }
    statements
}

impl<'a> Parser<'a> {
    // ===== declarations =====

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.check(TokenKind::Var) {
            self.advance();
            self.var_declaration()
        } else if self.check(TokenKind::Fun) {
            self.advance();
            self.function_declaration("function")
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.advance_if(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn function_declaration(&mut self, kind: &str) -> Result<Stmt, ParseError> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {} name.", kind))?;
        self.consume(TokenKind::LeftParen, &format!("Expect '(' after {} name.", kind))?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    let token = self.peek().clone();
                    self.diagnostics
                        .error_token(&token, "Can't have more than 255 parameters.");
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.advance_if(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenKind::LeftBrace, &format!("Expect '{{' before {} body.", kind))?;
        let body = self.block()?;
        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    // ===== statements =====

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.advance_if(TokenKind::Print) {
            return self.print_statement();
        }
        if self.advance_if(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }
        if self.advance_if(TokenKind::If) {
            return self.if_statement();
        }
        if self.advance_if(TokenKind::While) {
            return self.while_statement();
        }
        if self.advance_if(TokenKind::For) {
            return self.for_statement();
        }
        if self.check(TokenKind::Break) {
            let keyword = self.advance().clone();
            self.consume(TokenKind::Semicolon, "Expect ';' after 'break'.")?;
            return Ok(Stmt::Break(keyword));
        }
        if self.check(TokenKind::Return) {
            return self.return_statement();
        }
        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance().clone();
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.advance_if(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    /// Desugars directly into `Block{[init, While{cond, Block{[body, increment]}}]}`.
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.advance_if(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Var) {
            self.advance();
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expr::Literal {
            value: Value::Bool(true),
        });
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    // ===== expressions =====

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.or()?;

        if self.check(TokenKind::Equal) {
            let equals = self.advance().clone();
            let value = self.assignment()?;

            if let Expr::Variable { name, .. } = expr {
                let id = self.ids.next();
                return Ok(Expr::Assign {
                    id,
                    name,
                    value: Box::new(value),
                });
            }

            self.diagnostics
                .error_token(&equals, "Invalid assignment target.");
            return Ok(expr);
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.and()?;
        while self.check(TokenKind::Or) {
            let operator = self.advance().clone();
            let right = self.and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;
        while self.check(TokenKind::And) {
            let operator = self.advance().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        self.binary_left_assoc(
            Self::comparison,
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
        )
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        self.binary_left_assoc(
            Self::term,
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
        )
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        self.binary_left_assoc(Self::factor, &[TokenKind::Minus, TokenKind::Plus])
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        self.binary_left_assoc(Self::unary, &[TokenKind::Slash, TokenKind::Star])
    }

    fn binary_left_assoc(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        kinds: &[TokenKind],
    ) -> Result<Expr, ParseError> {
        let mut expr = operand(self)?;
        while kinds.contains(&self.peek().kind) {
            let operator = self.advance().clone();
            let right = operand(self)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek().kind, TokenKind::Bang | TokenKind::Minus) {
            let operator = self.advance().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            if self.advance_if(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    let token = self.peek().clone();
                    self.diagnostics
                        .error_token(&token, "Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.advance_if(TokenKind::Comma) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.advance_if(TokenKind::False) {
            return Ok(Expr::Literal {
                value: Value::Bool(false),
            });
        }
        if self.advance_if(TokenKind::True) {
            return Ok(Expr::Literal {
                value: Value::Bool(true),
            });
        }
        if self.advance_if(TokenKind::Nil) {
            return Ok(Expr::Literal { value: Value::Nil });
        }
        if self.check(TokenKind::Number) {
            let token = self.advance();
            let n = match &token.literal {
                Literal::Number(n) => *n,
                _ => unreachable!("scanner always attaches Literal::Number to a NUMBER token"),
            };
            return Ok(Expr::Literal {
                value: Value::Number(n),
            });
        }
        if self.check(TokenKind::String) {
            let token = self.advance();
            let s = match &token.literal {
                Literal::Str(s) => s.clone(),
                _ => unreachable!("scanner always attaches Literal::Str to a STRING token"),
            };
            return Ok(Expr::Literal {
                value: Value::String(s),
            });
        }
        if self.check(TokenKind::Identifier) {
            let name = self.advance().clone();
            let id = self.ids.next();
            return Ok(Expr::Variable { id, name });
        }
        if self.advance_if(TokenKind::LeftParen) {
            let expression = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping {
                expression: Box::new(expression),
            });
        }

        let token = self.peek().clone();
        self.diagnostics
            .error_token(&token, "Expect expression.");
        Err(ParseError)
    }

    // ===== token-stream plumbing =====

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let token = self.peek().clone();
        self.diagnostics.error_token(&token, message);
        Err(ParseError)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Discards tokens until a `;` is consumed or the next token begins a new statement.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
