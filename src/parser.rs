use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{KError, Span};
use crate::lexer::{Token, TokenType};
use crate::value::Value;

/// Recursive-descent parser for the restricted expression grammar.
/// Precedence, loosest first: xor, additive, multiplicative, unary, call.
/// Comparison and assignment tokens are recognized by the lexer but
/// rejected here, so the whitelist is enforced before evaluation.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Expr, KError> {
        let expr = self.expression()?;

        if !self.is_at_end() {
            let token = self.peek().clone();
            return Err(KError::eval_error(
                token.span,
                format!("Unexpected token '{}' after expression", token.lexeme),
            ));
        }

        Ok(expr)
    }

    fn expression(&mut self) -> Result<Expr, KError> {
        let expr = self.xor()?;

        // Equality and assignment are not part of the expression subset
        if matches!(
            self.peek().token_type,
            TokenType::Equal | TokenType::EqualEqual | TokenType::BangEqual
        ) {
            let token = self.peek().clone();
            return Err(KError::unsupported_error(
                token.span,
                format!(
                    "The '{}' operator is not supported in expressions",
                    token.lexeme
                ),
            ));
        }

        Ok(expr)
    }

    fn xor(&mut self) -> Result<Expr, KError> {
        let mut expr = self.term()?;

        while self.match_types(&[TokenType::Caret]) {
            let operator_token = self.previous().clone();
            let start = expr.span().start;
            let right = self.term().map_err(|_| {
                KError::eval_error(
                    operator_token.span.clone(),
                    "Expected expression after '^'".to_string(),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator: BinaryOp::Xor,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, KError> {
        let mut expr = self.factor()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Minus => BinaryOp::Subtract,
                TokenType::Plus => BinaryOp::Add,
                _ => unreachable!(),
            };

            let start = expr.span().start;
            let right = self.factor().map_err(|_| {
                KError::eval_error(
                    operator_token.span.clone(),
                    format!("Expected expression after '{}'", operator_token.lexeme),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, KError> {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star, TokenType::Percent]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Slash => BinaryOp::Divide,
                TokenType::Star => BinaryOp::Multiply,
                TokenType::Percent => BinaryOp::Modulo,
                _ => unreachable!(),
            };

            let start = expr.span().start;
            let right = self.unary().map_err(|_| {
                KError::eval_error(
                    operator_token.span.clone(),
                    format!("Expected expression after '{}'", operator_token.lexeme),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, KError> {
        if self.match_types(&[TokenType::Minus, TokenType::Plus, TokenType::Bang]) {
            let operator = match self.previous().token_type {
                TokenType::Minus => UnaryOp::Negate,
                TokenType::Plus => UnaryOp::Plus,
                TokenType::Bang => UnaryOp::Invert,
                _ => unreachable!(),
            };

            let start = self.previous().span.start;
            let right = self.unary()?;
            let end = right.span().end;

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(right),
                span: Span::new(start, end),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr, KError> {
        let expr = self.primary()?;

        // Calls only attach to a bare identifier; the builtin whitelist is
        // checked by the evaluator.
        if let Expr::Variable { name, span } = &expr {
            if self.match_types(&[TokenType::LeftParen]) {
                return self.finish_call(name.clone(), span.clone());
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, name: String, name_span: Span) -> Result<Expr, KError> {
        let mut args = Vec::new();

        if !self.check(&TokenType::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_types(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenType::RightParen, "Expected ')' after arguments")?;

        Ok(Expr::Call {
            name,
            args,
            span: Span::new(name_span.start, paren.span.end),
        })
    }

    fn primary(&mut self) -> Result<Expr, KError> {
        if self.is_at_end() {
            return Err(KError::eval_error(
                self.peek().span.clone(),
                "Unexpected end of expression".to_string(),
            ));
        }

        let token = self.advance().clone();

        match token.token_type {
            TokenType::Integer => {
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    KError::eval_error(token.span.clone(), "Invalid integer".to_string())
                })?;
                Ok(Expr::Literal {
                    value: Value::Int(value),
                    span: token.span,
                })
            }
            TokenType::Float => {
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    KError::eval_error(token.span.clone(), "Invalid float".to_string())
                })?;
                Ok(Expr::Literal {
                    value: Value::Float(value),
                    span: token.span,
                })
            }
            TokenType::String => Ok(Expr::Literal {
                value: Value::Str(token.lexeme),
                span: token.span,
            }),
            TokenType::Identifier => {
                // 'true' and 'false' are boolean literals, case-insensitively
                if token.lexeme.eq_ignore_ascii_case("true") {
                    Ok(Expr::Literal {
                        value: Value::Bool(true),
                        span: token.span,
                    })
                } else if token.lexeme.eq_ignore_ascii_case("false") {
                    Ok(Expr::Literal {
                        value: Value::Bool(false),
                        span: token.span,
                    })
                } else {
                    Ok(Expr::Variable {
                        name: token.lexeme,
                        span: token.span,
                    })
                }
            }
            TokenType::LeftParen => {
                let start_span = token.span.clone();

                if self.check(&TokenType::RightParen) {
                    return Err(KError::eval_error(
                        Span::new(start_span.start, self.peek().span.end),
                        "Empty parentheses are not allowed".to_string(),
                    ));
                }

                let expr = self.expression()?;
                let end_token =
                    self.consume(TokenType::RightParen, "Expected ')' after expression")?;
                Ok(Expr::Grouping {
                    expr: Box::new(expr),
                    span: Span::new(start_span.start, end_token.span.end),
                })
            }
            _ => {
                let help_msg = match token.token_type {
                    TokenType::RightParen => {
                        "Found ')' without matching '('. Check for unbalanced parentheses."
                    }
                    TokenType::Eof => "Reached end of input while expecting an expression.",
                    _ => "Expected a literal value, variable, or parenthesized expression here.",
                };

                Err(KError::eval_error_with_help(
                    token.span,
                    format!("Expected expression, found '{}'", token.lexeme),
                    help_msg.to_string(),
                ))
            }
        }
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, KError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            let error_span = if self.is_at_end() {
                if self.current > 0 {
                    let last_token = &self.tokens[self.current - 1];
                    Span::single(last_token.span.end)
                } else {
                    self.peek().span.clone()
                }
            } else {
                self.peek().span.clone()
            };

            Err(KError::eval_error(error_span, message.to_string()))
        }
    }
}
