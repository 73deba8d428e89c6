use crate::error::{KError, Span};
use crate::evaluator;
use crate::scope::{BindTarget, ScopeStack, Variable};
use crate::types::{self, TypeTag};
use crate::value::Value;

/// Interpret a full K script and return its output text: the line-tagged
/// results joined with newlines, or an empty string when no line produced
/// output. A fresh interpreter is constructed per call so independent runs
/// can never leak bindings into each other.
pub fn interpret(script: &str) -> String {
    let mut interpreter = Interpreter::new();
    let results = interpreter.run(script);
    results
        .iter()
        .map(LineResult::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of one executed line. Diagnostics keep the structured error so a
/// front end can render it against the source; `render` flattens either
/// form into the plain output text.
#[derive(Debug)]
pub enum LineResult {
    Output { line: usize, text: String },
    Diagnostic { line: usize, error: KError },
}

impl LineResult {
    pub fn render(&self) -> String {
        match self {
            LineResult::Output { text, .. } => text.clone(),
            LineResult::Diagnostic { line, error } => {
                format!("Line {}: {}: {}", line, error.category(), error)
            }
        }
    }
}

/// The K interpreter: a line dispatcher over one scope stack. State lives
/// for one script run; hosts wanting isolation between runs construct a
/// fresh instance per run (the `interpret` entry point does).
#[derive(Debug, Default)]
pub struct Interpreter {
    scopes: ScopeStack,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open blocks.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Evaluate a bare expression against the current scope state.
    pub fn eval_expr(&self, expr: &str) -> Result<Value, KError> {
        evaluator::evaluate_str(expr, &self.scopes)
    }

    /// Execute every line of the script in order. Errors never halt the
    /// run: each one is downgraded to a line-tagged diagnostic.
    pub fn run(&mut self, script: &str) -> Vec<LineResult> {
        let mut results = Vec::new();
        let mut offset = 0usize;

        for (index, raw) in script.split('\n').enumerate() {
            let line_number = index + 1;
            let line_offset = offset;
            offset += raw.len() + 1;

            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            // Absolute span of the trimmed line within the script
            let column = line.as_ptr() as usize - raw.as_ptr() as usize;
            let span = Span::new(line_offset + column, line_offset + column + line.len());

            if line == "{" {
                self.scopes.push_scope();
                continue;
            }
            if line == "}" {
                if self.scopes.pop_scope().is_err() {
                    results.push(LineResult::Diagnostic {
                        line: line_number,
                        error: KError::syntax_error(
                            span,
                            "Unmatched closing brace '}'.".to_string(),
                        ),
                    });
                }
                continue;
            }

            match self.execute_line(line, span) {
                Ok(Some(text)) => results.push(LineResult::Output {
                    line: line_number,
                    text,
                }),
                Ok(None) => {}
                Err(error) => results.push(LineResult::Diagnostic {
                    line: line_number,
                    error,
                }),
            }
        }

        results
    }

    /// Classify and execute one cleaned, non-empty, non-brace line.
    /// `span` is the line's absolute location in the script.
    pub fn execute_line(&mut self, line: &str, span: Span) -> Result<Option<String>, KError> {
        if let Some(rest) = print_argument(line) {
            return self.handle_print(line, rest, span).map(Some);
        }
        if let Some(eq) = top_level_assign(line) {
            return self.handle_declaration(line, eq, span);
        }
        Err(KError::unknown_command(span, line.to_string()))
    }

    /// `[private] [const] [<type>] <name> = <expression>` — declaration when
    /// the name is unbound anywhere, reassignment otherwise. `eq` is the
    /// byte index of the '=' within `line`.
    fn handle_declaration(
        &mut self,
        line: &str,
        eq: usize,
        span: Span,
    ) -> Result<Option<String>, KError> {
        let words: Vec<&str> = line[..eq].split_whitespace().collect();

        let mut index = 0;
        let is_private = words.first() == Some(&"private");
        if is_private {
            index += 1;
        }
        let is_const = words.get(index) == Some(&"const");
        if is_const {
            index += 1;
        }

        let (type_word, name) = match &words[index..] {
            [name] => (None, *name),
            [type_word, name] => (Some(*type_word), *name),
            _ => {
                return Err(KError::syntax_error(
                    span,
                    "Invalid variable declaration.".to_string(),
                ))
            }
        };

        if !is_identifier(name) {
            return Err(KError::syntax_error(
                span,
                "Invalid variable declaration.".to_string(),
            ));
        }

        let expr = line[eq + 1..].trim();
        if expr.is_empty() {
            return Err(KError::syntax_error(
                span,
                "Invalid variable declaration.".to_string(),
            ));
        }
        let expr_base = span.start + (expr.as_ptr() as usize - line.as_ptr() as usize);

        // The name resolving anywhere in the scope chain makes this a
        // reassignment; a fresh declaration otherwise.
        if let Some(existing) = self.scopes.resolve(name) {
            if is_private || is_const {
                let modifier = if is_const { "const" } else { "private" };
                return Err(KError::syntax_error(
                    span,
                    format!(
                        "Cannot redeclare variable '{}' with modifier '{}'.",
                        name, modifier
                    ),
                ));
            }
            if existing.is_const {
                return Err(KError::type_error(
                    span,
                    format!("Cannot reassign to constant variable '{}'.", name),
                ));
            }
            if type_word.is_some() {
                return Err(KError::syntax_error(
                    span,
                    format!("Cannot change the type of an existing variable '{}'.", name),
                ));
            }

            let existing_type = existing.ty;
            let value = self.eval(expr, expr_base)?;
            let value = types::validate_and_coerce(existing_type, value, &span)?;
            if let Some(variable) = self.scopes.resolve_mut(name) {
                variable.value = value;
            }
            return Ok(None);
        }

        let value = self.eval(expr, expr_base)?;
        let (ty, value) = match type_word {
            None => types::infer(value),
            Some(word) => match TypeTag::from_keyword(word) {
                Some(tag) => (tag, types::validate_and_coerce(tag, value, &span)?),
                None => {
                    return Err(KError::type_error_with_help(
                        span,
                        format!("Unsupported type '{}'.", word),
                        "Supported types are: int, float, string, char, bool, byte.".to_string(),
                    ))
                }
            },
        };

        let target = if is_private {
            BindTarget::Local
        } else {
            BindTarget::Global
        };
        self.scopes.bind(
            Variable {
                name: name.to_string(),
                ty,
                value,
                is_const,
                is_private,
            },
            target,
        );
        Ok(None)
    }

    /// Format a print statement's comma-separated arguments. A failing
    /// argument renders its error text in place; siblings still print.
    fn handle_print(&self, line: &str, rest: &str, span: Span) -> Result<String, KError> {
        let mut args = rest.trim();
        if args.is_empty() {
            return Err(KError::syntax_error(
                span,
                "Missing expression in print statement.".to_string(),
            ));
        }

        if let Some(inner) = strip_outer_parens(args) {
            args = inner.trim();
            if args.is_empty() {
                return Err(KError::syntax_error(
                    span,
                    "Missing expression in print statement.".to_string(),
                ));
            }
        }

        let abs = |piece: &str| span.start + (piece.as_ptr() as usize - line.as_ptr() as usize);

        let mut parts = Vec::new();
        for piece in split_arguments(args) {
            let piece = piece.trim();

            // A bare variable name formats by its declared type
            if let Some(variable) = self.scopes.resolve(piece) {
                let text = match (&variable.ty, &variable.value) {
                    (TypeTag::Byte, Value::Byte(b)) => format!("{:08b}", b),
                    (_, value) => value.to_string(),
                };
                parts.push(text);
                continue;
            }

            match self.eval(piece, abs(piece)) {
                Ok(value) => parts.push(value.to_string()),
                Err(error) => parts.push(format!("{}: {}", error.category(), error)),
            }
        }

        Ok(parts.join(" "))
    }

    fn eval(&self, expr: &str, base: usize) -> Result<Value, KError> {
        evaluator::evaluate_str(expr, &self.scopes).map_err(|error| error.offset(base))
    }
}

/// Strip an inline comment: '#' to end of line, ignoring markers inside
/// quoted literals.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return &line[..i],
            None => {}
        }
    }
    line
}

/// Recognize a print statement: the `print` keyword followed by nothing,
/// whitespace, or a non-identifier character such as '('. Returns the
/// argument text after the keyword.
fn print_argument(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("print")?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if !c.is_alphanumeric() && c != '_' => Some(rest),
        _ => None,
    }
}

/// Byte index of the first top-level '=' that is an assignment, skipping
/// '==', '!=', and anything inside quoted literals.
fn top_level_assign(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut previous = '\0';
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '=' => {
                let next = chars.peek().map(|&(_, n)| n);
                if previous != '!' && previous != '=' && next != Some('=') {
                    return Some(i);
                }
            }
            None => {}
        }
        previous = c;
    }
    None
}

fn is_identifier(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Strip one enclosing parenthesis pair, but only when the opening paren's
/// match is the final character; `(1), (2)` must stay untouched.
fn strip_outer_parens(args: &str) -> Option<&str> {
    if !args.starts_with('(') {
        return None;
    }
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, c) in args.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '(' => depth += 1,
            None if c == ')' => {
                depth -= 1;
                if depth == 0 {
                    return if i + c.len_utf8() == args.len() {
                        Some(&args[1..i])
                    } else {
                        None
                    };
                }
            }
            None => {}
        }
    }
    None
}

/// Split print arguments on top-level commas; commas nested in parentheses
/// or inside quoted literals are not split points. An empty trailing piece
/// after a final comma is dropped.
fn split_arguments(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, c) in args.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    parts.push(&args[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    let tail = &args[start..];
    if !tail.trim().is_empty() || parts.is_empty() {
        parts.push(tail);
    }
    parts
}
