use crate::error::Span;
use crate::value::Value;

/// Closed expression AST for the sandboxed evaluator. There are no
/// statement forms: blocks, declarations, and print are line-level
/// constructs handled by the dispatcher, so an expression can never
/// perform a host-level side effect.

#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        value: Value,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// Built-in call: only `type` and `invert` are accepted at evaluation.
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Grouping {
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. } => span,
            Expr::Variable { span, .. } => span,
            Expr::Binary { span, .. } => span,
            Expr::Unary { span, .. } => span,
            Expr::Call { span, .. } => span,
            Expr::Grouping { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Xor,
}

#[derive(Debug, Clone)]
pub enum UnaryOp {
    Negate,
    Plus,
    Invert,
}
