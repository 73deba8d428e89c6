// K Language Interpreter Library
//
// This is the core library for the K language interpreter: a line-oriented
// scripting language with optional type annotations, block scoping,
// private/const modifiers, and a restricted sandboxed expression grammar.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod scope;
pub mod types;
pub mod value;

// Re-export commonly used items
pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{ErrorKind, KError, Span};
pub use evaluator::Evaluator;
pub use interpreter::{interpret, Interpreter, LineResult};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::Parser;
pub use scope::{BindTarget, ScopeStack, Variable};
pub use types::TypeTag;
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
