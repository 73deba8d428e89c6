use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{KError, Span};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::scope::ScopeStack;
use crate::value::Value;

/// Lex, parse, and evaluate one expression string against the given scope
/// state. Pure: same expression and same scopes always yield the same value.
pub fn evaluate_str(source: &str, scopes: &ScopeStack) -> Result<Value, KError> {
    let mut lexer = Lexer::new(source.to_string());
    let tokens = lexer.scan_tokens()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse()?;
    Evaluator::new(scopes).evaluate(&expr)
}

/// Structural-recursion evaluator over the closed expression AST. Reads
/// variables through the scope stack but never mutates it.
pub struct Evaluator<'a> {
    scopes: &'a ScopeStack,
}

impl<'a> Evaluator<'a> {
    pub fn new(scopes: &'a ScopeStack) -> Self {
        Self { scopes }
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, KError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { name, span } => match self.scopes.resolve(name) {
                Some(variable) => Ok(variable.value.clone()),
                None => Err(KError::undefined_error(
                    span.clone(),
                    format!("Undefined variable '{}'", name),
                )),
            },
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                self.evaluate_binary_op(operator, left_val, right_val, span)
            }
            Expr::Unary {
                operator,
                operand,
                span,
            } => {
                let operand_val = self.evaluate(operand)?;
                self.evaluate_unary_op(operator, operand_val, span)
            }
            Expr::Call { name, args, span } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg)?);
                }
                self.call_builtin(name, arg_values, span)
            }
            Expr::Grouping { expr, .. } => self.evaluate(expr),
        }
    }

    fn evaluate_binary_op(
        &self,
        operator: &BinaryOp,
        left: Value,
        right: Value,
        span: &Span,
    ) -> Result<Value, KError> {
        match operator {
            BinaryOp::Add => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => {
                    l.checked_add(r).map(Value::Int).ok_or_else(|| {
                        KError::eval_error(span.clone(), "Integer overflow".to_string())
                    })
                }
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l + r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 + r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l + r as f64)),
                (Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot add {} and {}", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Subtract => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => {
                    l.checked_sub(r).map(Value::Int).ok_or_else(|| {
                        KError::eval_error(span.clone(), "Integer overflow".to_string())
                    })
                }
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l - r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 - r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l - r as f64)),
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot subtract {} and {}", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Multiply => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => {
                    l.checked_mul(r).map(Value::Int).ok_or_else(|| {
                        KError::eval_error(span.clone(), "Integer overflow".to_string())
                    })
                }
                (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l * r)),
                (Value::Int(l), Value::Float(r)) => Ok(Value::Float(l as f64 * r)),
                (Value::Float(l), Value::Int(r)) => Ok(Value::Float(l * r as f64)),
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot multiply {} and {}", l.type_name(), r.type_name()),
                )),
            },
            // Division always yields a float
            BinaryOp::Divide => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(KError::eval_error(span.clone(), "Division by zero".to_string()))
                    } else {
                        Ok(Value::Float(l as f64 / r as f64))
                    }
                }
                (Value::Float(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(KError::eval_error(span.clone(), "Division by zero".to_string()))
                    } else {
                        Ok(Value::Float(l / r))
                    }
                }
                (Value::Int(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(KError::eval_error(span.clone(), "Division by zero".to_string()))
                    } else {
                        Ok(Value::Float(l as f64 / r))
                    }
                }
                (Value::Float(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(KError::eval_error(span.clone(), "Division by zero".to_string()))
                    } else {
                        Ok(Value::Float(l / r as f64))
                    }
                }
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot divide {} and {}", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Modulo => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(KError::eval_error(span.clone(), "Modulo by zero".to_string()))
                    } else {
                        // i64::MIN % -1 overflows; checked_rem covers it
                        l.checked_rem(r).map(Value::Int).ok_or_else(|| {
                            KError::eval_error(span.clone(), "Integer overflow".to_string())
                        })
                    }
                }
                (Value::Float(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(KError::eval_error(span.clone(), "Modulo by zero".to_string()))
                    } else {
                        Ok(Value::Float(l % r))
                    }
                }
                (Value::Int(l), Value::Float(r)) => {
                    if r == 0.0 {
                        Err(KError::eval_error(span.clone(), "Modulo by zero".to_string()))
                    } else {
                        Ok(Value::Float(l as f64 % r))
                    }
                }
                (Value::Float(l), Value::Int(r)) => {
                    if r == 0 {
                        Err(KError::eval_error(span.clone(), "Modulo by zero".to_string()))
                    } else {
                        Ok(Value::Float(l % r as f64))
                    }
                }
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!(
                        "Cannot take modulo of {} and {}",
                        l.type_name(),
                        r.type_name()
                    ),
                )),
            },
            // '^' is bitwise xor on integers, logical xor on booleans
            BinaryOp::Xor => match (widen(left), widen(right)) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l ^ r)),
                (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(l ^ r)),
                (l, r) => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot xor {} and {}", l.type_name(), r.type_name()),
                )),
            },
        }
    }

    fn evaluate_unary_op(
        &self,
        operator: &UnaryOp,
        operand: Value,
        span: &Span,
    ) -> Result<Value, KError> {
        match operator {
            UnaryOp::Negate => match widen(operand) {
                Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
                    KError::eval_error(span.clone(), "Integer overflow".to_string())
                }),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot negate {}", other.type_name()),
                )),
            },
            UnaryOp::Plus => match widen(operand) {
                value @ (Value::Int(_) | Value::Float(_)) => Ok(value),
                other => Err(KError::eval_error(
                    span.clone(),
                    format!("Cannot apply unary '+' to {}", other.type_name()),
                )),
            },
            UnaryOp::Invert => invert_value(operand, span),
        }
    }

    fn call_builtin(&self, name: &str, args: Vec<Value>, span: &Span) -> Result<Value, KError> {
        match name {
            "type" => {
                if args.len() != 1 {
                    return Err(KError::eval_error_with_help(
                        span.clone(),
                        format!("type() takes exactly 1 argument, got {}", args.len()),
                        "Usage: type(value) returns the type name as a string.".to_string(),
                    ));
                }
                Ok(Value::Str(args[0].type_name().to_string()))
            }
            "invert" => {
                if args.len() != 1 {
                    return Err(KError::eval_error_with_help(
                        span.clone(),
                        format!("invert() takes exactly 1 argument, got {}", args.len()),
                        "Usage: invert(value) negates booleans and numbers and flips a char's code point.".to_string(),
                    ));
                }
                invert_value(args.into_iter().next().unwrap_or(Value::Int(0)), span)
            }
            other => Err(KError::unsupported_error(
                span.clone(),
                format!("Unsupported function: '{}'", other),
            )),
        }
    }
}

/// Bytes behave as integers and chars as one-character strings inside
/// arithmetic; the declared-type view only matters for binding and print
/// formatting.
fn widen(value: Value) -> Value {
    match value {
        Value::Byte(b) => Value::Int(b as i64),
        Value::Char(c) => Value::Str(c.to_string()),
        other => other,
    }
}

/// Inversion semantics shared by the '!' prefix operator and the invert()
/// builtin: logical not for booleans, arithmetic negation for numbers, and
/// for a char the code point is negated, masked to 8 bits, and mapped back.
pub fn invert_value(value: Value, span: &Span) -> Result<Value, KError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
            KError::eval_error(span.clone(), "Integer overflow".to_string())
        }),
        Value::Float(n) => Ok(Value::Float(-n)),
        Value::Byte(b) => Ok(Value::Int(-(b as i64))),
        Value::Char(c) => Ok(Value::Char(invert_char(c))),
        Value::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(invert_char(c))),
                _ => Err(KError::type_error(
                    span.clone(),
                    "Cannot invert type 'string'.".to_string(),
                )),
            }
        }
    }
}

fn invert_char(c: char) -> char {
    let masked = ((-(c as i64)) & 0xFF) as u8;
    char::from(masked)
}
