use std::fmt;

/// Runtime value of the K language: a closed union over the six supported
/// types. Byte is range-checked at every construction site; Char is always
/// a single character.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Byte(u8),
}

impl Value {
    /// Type name as reported by the `type()` builtin. A one-character
    /// string reports as "char", matching declared-type inference.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Str(s) => {
                if s.chars().count() == 1 {
                    "char"
                } else {
                    "string"
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                // Always show at least one decimal place for floats
                if n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            // Booleans render as capitalized words in script output
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Byte(b) => write!(f, "{}", b),
        }
    }
}
