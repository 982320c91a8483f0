//! The `%except` sidecar (spec.md §4.9).
//!
//! `except` code is stored per scope, like a typemap, but looked up
//! differently: `except_lookup` always reads the top-of-stack scope,
//! regardless of which scope actually holds a registered exception handler.
//! This mirrors the original implementation's behaviour exactly -- a
//! vestigial loop that was clearly meant to walk the stack looking for the
//! nearest enclosing handler but, since it never advances past the top
//! frame, never does. spec.md documents this as observable behaviour to
//! preserve, not a bug to fix.

use crate::scope::ScopeStack;

pub fn except_register(stack: &mut ScopeStack, code: String) {
    stack.current_mut().except = Some(code);
}

pub fn except_clear(stack: &mut ScopeStack) {
    stack.current_mut().except = None;
}

pub fn except_lookup(stack: &ScopeStack) -> Option<&str> {
    stack.current().except.as_deref()
}
