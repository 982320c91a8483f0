//! `search(op, type, name?)` -- the fallback hierarchy over C types
//! (spec.md §4.4).

use crate::ctype::TypeSystem;
use crate::ident::Ident;
use crate::key::OpKey;
use crate::registry::TypemapEntry;
use crate::scope::ScopeStack;

/// Returns the most specific entry carrying `code`. Falls back to the most
/// specific entry seen *without* code (a "this typemap exists but was
/// cleared" signal, spec.md §9 Design Notes) if no code-carrying entry
/// exists anywhere in the scope stack.
pub fn search<T: TypeSystem>(
    stack: &ScopeStack,
    types: &T,
    op: &str,
    ty: &T::Type,
    name: Option<&Ident>,
) -> Option<TypemapEntry> {
    search_with_key(stack, types, &OpKey::new(op), ty, name)
}

/// As [`search`], but matching against a full [`OpKey`] (used by
/// [`crate::multi`] for multi-argument typemaps, whose op-key carries a
/// prefix of the preceding parameters' types/names).
pub fn search_with_key<T: TypeSystem>(
    stack: &ScopeStack,
    types: &T,
    op_key: &OpKey,
    ty: &T::Type,
    name: Option<&Ident>,
) -> Option<TypemapEntry> {
    let op = op_key.op.as_str();
    let mut backup: Option<TypemapEntry> = None;
    let is_array = types.isarray(ty);

    for ts in (0..stack.len()).rev() {
        let scope = stack.scope_at(ts);
        let mut ctype = ty.clone();

        loop {
            let ctype_str = types.str(&ctype);
            if let Some(hit) = lookup_rung(scope, &ctype_str, name, op_key) {
                if hit.has_code() {
                    return Some(hit);
                }
                backup = Some(hit);
            }

            if is_array {
                let noarrays = strip_arrays(types, &ctype);
                let noarrays_str = types.str(&noarrays);
                if let Some(hit) = lookup_rung(scope, &noarrays_str, name, op_key) {
                    if hit.has_code() {
                        return Some(hit);
                    }
                    backup = Some(hit);
                }
            }

            if let Some(stripped) = types.strip_qualifiers(&ctype) {
                ctype = stripped;
                continue;
            }
            match types.typedef_resolve(&ctype) {
                Some(next) => {
                    ctype = next;
                    continue;
                }
                None => break,
            }
        }

        // Default-type fallback. Per the original implementation (see
        // DESIGN.md's Open Question on this), a default-type hit is
        // returned immediately regardless of whether it carries code --
        // unlike every rung above, it does not go through the backup path.
        let default_ty = types.default_type();
        let default_str = types.str(&default_ty);
        if let Some(hit) = lookup_rung(scope, &default_str, name, op_key) {
            tracing::trace!(op, ty = %default_str, "matched via default type");
            return Some(hit);
        }
    }

    backup
}

fn lookup_rung(
    scope: &crate::registry::Scope,
    ty_str: &str,
    name: Option<&Ident>,
    op_key: &OpKey,
) -> Option<TypemapEntry> {
    let buckets = scope.name_buckets(ty_str)?;
    if let Some(n) = name {
        if let Some(bucket) = buckets.bucket(Some(n)) {
            if let Some(entry) = bucket.0.get(op_key) {
                return Some(entry.clone());
            }
        }
    }
    if let Some(bucket) = buckets.bucket(None) {
        if let Some(entry) = bucket.0.get(op_key) {
            return Some(entry.clone());
        }
    }
    None
}

fn strip_arrays<T: TypeSystem>(types: &T, ty: &T::Type) -> T::Type {
    let ndim = types.array_ndim(ty);
    let dims = vec!["ANY".to_string(); ndim];
    types.array_setdim(ty, &dims)
}
