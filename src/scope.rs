use crate::error::{KError, Span};
use crate::types::TypeTag;
use crate::value::Value;
use std::collections::HashMap;

/// A declared variable. The type tag and the const/private flags are fixed
/// at declaration; reassignment only replaces the value.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: TypeTag,
    pub value: Value,
    pub is_const: bool,
    pub is_private: bool,
}

/// Where a new binding lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindTarget {
    Global,
    Local,
}

/// Global bindings plus a stack of block-local scopes. Pure bookkeeping;
/// no evaluation logic lives here.
#[derive(Debug, Default)]
pub struct ScopeStack {
    globals: HashMap<String, Variable>,
    locals: Vec<HashMap<String, Variable>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.locals.push(HashMap::new());
    }

    /// Pop the innermost local scope, destroying its variables. Fails when
    /// no local scope is active.
    pub fn pop_scope(&mut self) -> Result<(), KError> {
        if self.locals.pop().is_some() {
            Ok(())
        } else {
            Err(KError::scope_error(
                Span::new(0, 0),
                "No local scope is active.".to_string(),
            ))
        }
    }

    /// Number of active local scopes.
    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    /// Resolve a name to the nearest enclosing scope that binds it:
    /// innermost local first, then outward, then global.
    pub fn resolve(&self, name: &str) -> Option<&Variable> {
        for scope in self.locals.iter().rev() {
            if let Some(var) = scope.get(name) {
                return Some(var);
            }
        }
        self.globals.get(name)
    }

    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Variable> {
        for scope in self.locals.iter_mut().rev() {
            if scope.contains_key(name) {
                return scope.get_mut(name);
            }
        }
        self.globals.get_mut(name)
    }

    /// Bind a variable. A `Local` target with no active local scope falls
    /// back to global, so out-of-block `private` declarations silently
    /// globalize.
    pub fn bind(&mut self, variable: Variable, target: BindTarget) {
        let scope = match target {
            BindTarget::Local => self.locals.last_mut().unwrap_or(&mut self.globals),
            BindTarget::Global => &mut self.globals,
        };
        scope.insert(variable.name.clone(), variable);
    }
}
