use crate::error::{KError, Span};
use crate::value::Value;
use std::fmt;

/// Declared (or inferred) type of a variable. Once bound, a variable's tag
/// never changes for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Float,
    Bool,
    Char,
    Str,
    Byte,
}

impl TypeTag {
    /// Parse a type annotation keyword from a declaration line.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(TypeTag::Int),
            "float" => Some(TypeTag::Float),
            "bool" => Some(TypeTag::Bool),
            "char" => Some(TypeTag::Char),
            "string" => Some(TypeTag::Str),
            "byte" => Some(TypeTag::Byte),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Char => "char",
            TypeTag::Str => "string",
            TypeTag::Byte => "byte",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Infer a type tag for an untyped declaration. Precedence: int, float,
/// bool, then one-character strings become char and everything else string.
/// The closed value union makes every runtime shape inferable, so this is
/// total; a length-1 string is rewritten to its char form.
pub fn infer(value: Value) -> (TypeTag, Value) {
    match value {
        Value::Int(_) => (TypeTag::Int, value),
        Value::Float(_) => (TypeTag::Float, value),
        Value::Bool(_) => (TypeTag::Bool, value),
        Value::Char(_) => (TypeTag::Char, value),
        Value::Byte(_) => (TypeTag::Byte, value),
        Value::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => (TypeTag::Char, Value::Char(c)),
                _ => (TypeTag::Str, Value::Str(s)),
            }
        }
    }
}

/// Check an evaluated value against a declared type, applying the bounded
/// coercions of the language: "true"/"false" strings cast to bool, length-1
/// strings become chars, integers in [0, 255] become bytes. Int, float, and
/// string declarations accept any value unchanged.
pub fn validate_and_coerce(tag: TypeTag, value: Value, span: &Span) -> Result<Value, KError> {
    match tag {
        TypeTag::Bool => match value {
            Value::Bool(_) => Ok(value),
            Value::Str(s) => {
                if s.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(KError::type_error(
                        span.clone(),
                        format!("Cannot cast string '{}' to bool.", s),
                    ))
                }
            }
            other => Err(KError::type_error(
                span.clone(),
                format!("Cannot cast value '{}' to bool.", other),
            )),
        },
        TypeTag::Char => match value {
            Value::Char(_) => Ok(value),
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(KError::type_error(
                        span.clone(),
                        "'char' type must be a single character.".to_string(),
                    )),
                }
            }
            _ => Err(KError::type_error(
                span.clone(),
                "Cannot assign non-string value to 'char' type.".to_string(),
            )),
        },
        TypeTag::Byte => match value {
            Value::Byte(_) => Ok(value),
            Value::Int(n) => {
                if (0..=255).contains(&n) {
                    Ok(Value::Byte(n as u8))
                } else {
                    Err(KError::type_error(
                        span.clone(),
                        "'byte' type must be an integer between 0 and 255.".to_string(),
                    ))
                }
            }
            _ => Err(KError::type_error(
                span.clone(),
                "'byte' type must be assigned an integer value.".to_string(),
            )),
        },
        // Only bool, char, and byte carry validation rules
        TypeTag::Int | TypeTag::Float | TypeTag::Str => Ok(value),
    }
}
