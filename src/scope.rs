//! A bounded stack of typemap scopes (spec.md §4.2).
//!
//! Per the Design Notes in spec.md §9 ("Global stack"), this is owned state
//! threaded explicitly through `engine::Engine` rather than a process-wide
//! singleton -- the original's `static Hash *typemaps[MAX_SCOPE]` becomes a
//! plain `Vec<Scope>` here.

use crate::error::{Result, TypemapError};
use crate::registry::Scope;

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    max_scope: usize,
}

impl ScopeStack {
    /// `init()` -- resets the stack and installs scope 0.
    pub fn new(max_scope: usize) -> Self {
        ScopeStack {
            scopes: vec![Scope::default()],
            max_scope,
        }
    }

    pub fn init(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::default());
    }

    /// `push()` -- fails if depth would exceed `MAX_SCOPE`.
    pub fn push(&mut self) -> Result<()> {
        if self.scopes.len() >= self.max_scope {
            return Err(TypemapError::ScopeOverflow { max: self.max_scope });
        }
        self.scopes.push(Scope::default());
        tracing::trace!(depth = self.scopes.len(), "pushed typemap scope");
        Ok(())
    }

    /// `pop()` -- scope 0 is never popped.
    pub fn pop(&mut self) -> Result<Scope> {
        if self.scopes.len() <= 1 {
            return Err(TypemapError::PopRootScope);
        }
        let popped = self.scopes.pop().expect("checked len above");
        tracing::trace!(depth = self.scopes.len(), "popped typemap scope");
        Ok(popped)
    }

    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("scope 0 always exists")
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope 0 always exists")
    }

    pub fn scope_at(&self, ts: usize) -> &Scope {
        &self.scopes[ts]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current scope index, i.e. `len() - 1`.
    pub fn current_index(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn all(&self) -> &[Scope] {
        &self.scopes
    }
}
