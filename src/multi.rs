//! `search_multi(op, parms)` -- matching a run of parameters against
//! multi-argument typemaps (spec.md §4.5).
//!
//! Recursive, the same shape as `Swig_typemap_search_multi`: at each
//! parameter position it runs the real fallback matcher ([`crate::matcher`])
//! against that parameter's type -- exact match, array-stripped match,
//! qualifier stripping, typedef resolution, default-type fallback, the same
//! hierarchy a single-argument `search` walks -- then tries to extend the
//! match one parameter deeper by folding the current parameter's type/name
//! into the op-key and recursing on the rest of the window. A deeper match
//! wins over the shallower one it was reached from; the number of consumed
//! parameters is the recursion depth that actually carried code.

use crate::ctype::TypeSystem;
use crate::key::OpKey;
use crate::matcher::search_with_key;
use crate::param::Param;
use crate::registry::TypemapEntry;
use crate::scope::ScopeStack;

/// Tries to match the longest possible run of `parms`, starting at index 0,
/// against a registered multi-argument typemap for `op`. On success, returns
/// the matching entry and how many leading parameters it consumed.
///
/// `parms` must be non-empty.
pub fn search_multi<T: TypeSystem>(
    stack: &ScopeStack,
    types: &T,
    op: &str,
    parms: &[Param],
) -> Option<(TypemapEntry, usize)> {
    assert!(!parms.is_empty(), "search_multi requires at least one parameter");
    search_multi_at(stack, types, &OpKey::new(op), parms)
}

fn search_multi_at<T: TypeSystem>(
    stack: &ScopeStack,
    types: &T,
    op_key: &OpKey,
    parms: &[Param],
) -> Option<(TypemapEntry, usize)> {
    let (first, rest) = parms.split_first()?;
    let ty = types.parse_type(&first.ty);
    let tm = search_with_key(stack, types, op_key, &ty, first.name.as_ref())?;

    if rest.is_empty() {
        return if tm.has_code() { Some((tm, 1)) } else { None };
    }

    let deeper_key = op_key.extended(&first.ty, first.name.as_ref());
    let chosen = match search_multi_at(stack, types, &deeper_key, rest) {
        Some((deeper_entry, deeper_len)) => Some((deeper_entry, deeper_len + 1)),
        None if tm.has_code() => Some((tm, 1)),
        None => None,
    };

    if let Some((_, len)) = &chosen {
        tracing::trace!(op = %op_key.op, len, "matched multi-argument typemap");
    }
    chosen
}
