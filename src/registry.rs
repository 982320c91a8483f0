//! The nested `type -> (name? -> op -> entry)` mapping and the
//! register/copy/clear/apply/clear_apply operators over it (spec.md §4.3).

use std::collections::HashMap;

use crate::ident::Ident;
use crate::key::OpKey;
use crate::param::{KwArg, Param};
use crate::scope::ScopeStack;

/// A stored typemap. `code` is `None` after `clear` removes it, leaving the
/// entry shell (and its `typemap`/`pname` metadata) in place -- this is how
/// the matcher tells "never registered" apart from "registered, then
/// cleared" (spec.md §9 Design Notes, "Backup entry in `search`").
#[derive(Debug, Clone, Default)]
pub struct TypemapEntry {
    pub code: Option<String>,
    pub ty: String,
    pub pname: Option<Ident>,
    pub typemap: Option<String>,
    pub locals: Vec<Param>,
    pub kwargs: Vec<KwArg>,
}

impl TypemapEntry {
    pub fn has_code(&self) -> bool {
        self.code.is_some()
    }
}

/// All typemaps registered at one `(scope, type, name?)` slot, keyed by
/// op-key.
#[derive(Debug, Clone, Default)]
pub struct OpBucket(pub HashMap<OpKey, TypemapEntry>);

impl OpBucket {
    fn entry_mut(&mut self, key: OpKey) -> &mut TypemapEntry {
        self.0.entry(key).or_default()
    }
}

/// The `NameBuckets = { ByName: map<Id, OpBuckets>, default: OpBuckets }`
/// tagged variant from spec.md §9 Design Notes, replacing a node that used
/// to be sometimes a name table, sometimes a bucket directly.
#[derive(Debug, Clone, Default)]
pub struct NameBuckets {
    pub by_name: HashMap<Ident, OpBucket>,
    pub default: OpBucket,
}

impl NameBuckets {
    pub fn bucket(&self, name: Option<&Ident>) -> Option<&OpBucket> {
        match name {
            Some(n) => self.by_name.get(n),
            None => Some(&self.default),
        }
    }

    pub(crate) fn bucket_mut(&mut self, name: Option<&Ident>) -> &mut OpBucket {
        match name {
            Some(n) => self.by_name.entry(n.clone()).or_default(),
            None => &mut self.default,
        }
    }
}

/// One lexical scope's typemap table, plus the `%except` side slot it
/// shares the scoping rules with (spec.md §4.9).
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub types: HashMap<String, NameBuckets>,
    pub except: Option<String>,
}

impl Scope {
    pub fn name_buckets(&self, ty: &str) -> Option<&NameBuckets> {
        self.types.get(ty)
    }

    pub(crate) fn name_buckets_mut(&mut self, ty: &str) -> &mut NameBuckets {
        self.types.entry(ty.to_string()).or_default()
    }
}

/// Splits a parameter list into the `(prefix, last)` shape every registry
/// operation walks: the first `k - 1` parameters contribute to the op-key
/// prefix, the last one owns the slot the entry is stored or looked up at.
fn split_last(parms: &[Param]) -> (&[Param], &Param) {
    let (last, prefix) = parms.split_last().expect("parms must be non-empty");
    (prefix, last)
}

fn op_key_for(op: &str, prefix: &[Param]) -> OpKey {
    let mut key = OpKey::new(op);
    for p in prefix {
        key = key.extended(&p.ty, p.name.as_ref());
    }
    key
}

/// `register(op, parms, code, locals, kwargs)` -- spec.md §4.3.
///
/// `parms` must be non-empty. Re-registering the same `(op, parms)` key
/// replaces the previous entry's `code`/`locals`/`kwargs` in place.
pub fn register(
    scope: &mut Scope,
    op: &str,
    parms: &[Param],
    code: String,
    locals: Vec<Param>,
    kwargs: Vec<KwArg>,
) {
    let (prefix, last) = split_last(parms);

    // Every parameter that precedes the last one gets a code-less entry
    // shell at its own (type, name) slot, keyed by the op-key accumulated
    // up to that point. Without this, a multi-argument typemap with no
    // accompanying single-argument registration for its leading parameters
    // would leave the matcher nothing to find at those positions, and
    // search_multi's recursive descent (which delegates to the real matcher
    // at every level) could never reach the terminal entry.
    let mut key = OpKey::new(op);
    for p in prefix {
        scope
            .name_buckets_mut(&p.ty)
            .bucket_mut(p.name.as_ref())
            .entry_mut(key.clone());
        key = key.extended(&p.ty, p.name.as_ref());
    }

    let human = format!(
        "typemap({}) {} {}",
        op,
        last.ty,
        last.name.as_ref().map(Ident::as_str).unwrap_or("")
    );
    let buckets = scope.name_buckets_mut(&last.ty);
    let bucket = buckets.bucket_mut(last.name.as_ref());
    let entry = bucket.entry_mut(key);
    entry.code = Some(code);
    entry.ty = last.ty.clone();
    entry.pname = last.name.clone();
    entry.typemap = Some(human);
    entry.locals = locals;
    entry.kwargs = kwargs;
}

/// `clear(op, parms)` -- spec.md §4.3. Strips `code`/`locals`/`kwargs` from
/// the terminal bucket if the chain exists; silently does nothing otherwise.
pub fn clear(scope: &mut Scope, op: &str, parms: &[Param]) {
    let (prefix, last) = split_last(parms);
    let key = op_key_for(op, prefix);
    if let Some(buckets) = scope.types.get_mut(&last.ty) {
        let bucket = buckets.bucket_mut(last.name.as_ref());
        if let Some(entry) = bucket.0.get_mut(&key) {
            entry.code = None;
            entry.locals.clear();
            entry.kwargs.clear();
        }
    }
}

/// `copy(op, srcparms, destparms)` -- spec.md §4.3.
///
/// Walks scopes from current down to 0 looking for an entry registered
/// against `srcparms`; the first one found is re-registered against
/// `destparms` in the *current* scope. Returns `false` if no scope had a
/// match (the "not-found" outcome; arity mismatch is checked by the caller,
/// see `engine::Engine::copy`).
pub fn copy(stack: &mut ScopeStack, op: &str, srcparms: &[Param], destparms: &[Param]) -> bool {
    let (src_prefix, src_last) = split_last(srcparms);
    let key = op_key_for(op, src_prefix);
    for ts in (0..stack.len()).rev() {
        let found = stack
            .scope_at(ts)
            .name_buckets(&src_last.ty)
            .and_then(|b| b.bucket(src_last.name.as_ref()))
            .and_then(|bucket| bucket.0.get(&key))
            .cloned();
        if let Some(entry) = found {
            register(
                stack.current_mut(),
                op,
                destparms,
                entry.code.unwrap_or_default(),
                entry.locals,
                entry.kwargs,
            );
            return true;
        }
    }
    false
}

/// `apply(src, dest)` -- spec.md §4.3. Bulk-copies every typemap registered
/// against `src`, in any scope, over to `dest`, preserving each op's
/// per-parameter tail and never overwriting an already-populated
/// destination slot.
pub fn apply(stack: &mut ScopeStack, src: &[Param], dest: &[Param]) {
    let (src_prefix, src_last) = split_last(src);
    let (dest_prefix, dest_last) = split_last(dest);

    // Ensure a container exists at the destination slot, per spec.md's
    // resolution of the "uninitialised `type` variable" open question:
    // use `lastDest`'s type, not whatever the original happened to read.
    stack
        .current_mut()
        .name_buckets_mut(&dest_last.ty)
        .bucket_mut(dest_last.name.as_ref());

    let mut to_register: Vec<(OpKey, TypemapEntry)> = Vec::new();
    for ts in (0..stack.len()).rev() {
        let Some(src_bucket) = stack
            .scope_at(ts)
            .name_buckets(&src_last.ty)
            .and_then(|b| b.bucket(src_last.name.as_ref()))
        else {
            continue;
        };
        for (k, entry) in &src_bucket.0 {
            if entry.code.is_none() {
                continue;
            }
            if k.arity() != src_prefix.len() || k.prefix != prefix_sig(src_prefix) {
                continue;
            }
            let new_key = OpKey::with_prefix(k.op.clone(), prefix_sig(dest_prefix));
            to_register.push((new_key, entry.clone()));
        }
    }

    let dest_buckets = stack.current_mut().name_buckets_mut(&dest_last.ty);
    let dest_bucket = dest_buckets.bucket_mut(dest_last.name.as_ref());
    for (key, entry) in to_register {
        if dest_bucket.0.contains_key(&key) {
            continue;
        }
        let mut new_entry = entry;
        new_entry.ty = dest_last.ty.clone();
        new_entry.pname = dest_last.name.clone();
        new_entry.typemap = Some(format!(
            "typemap({}) {} {}",
            key.op,
            dest_last.ty,
            dest_last.name.as_ref().map(Ident::as_str).unwrap_or("")
        ));
        dest_bucket.0.insert(key, new_entry);
    }
}

/// `clear_apply(parms)` -- spec.md §4.3. Strips every entry on the last
/// parameter's slot (in the current scope only) whose arity and prefix
/// match `parms`, regardless of which operation it belongs to.
pub fn clear_apply(stack: &mut ScopeStack, parms: &[Param]) {
    let (prefix, last) = split_last(parms);
    let want_prefix = prefix_sig(prefix);
    let want_arity = prefix.len();
    let Some(buckets) = stack.current_mut().types.get_mut(&last.ty) else {
        return;
    };
    let bucket = buckets.bucket_mut(last.name.as_ref());
    for (key, entry) in bucket.0.iter_mut() {
        if key.arity() == want_arity && key.prefix == want_prefix {
            entry.code = None;
            entry.locals.clear();
            entry.kwargs.clear();
        }
    }
}

fn prefix_sig(parms: &[Param]) -> Vec<(String, Option<Ident>)> {
    parms.iter().map(|p| (p.ty.clone(), p.name.clone())).collect()
}
