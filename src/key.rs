//! The compact signature strings used to key multi-argument typemaps.
//!
//! A multi-argument typemap stores its code on the *last* parameter's slot,
//! with an op-key that encodes the types (and names) of the parameters that
//! precede it. `OpKey` keeps that encoding as a structured value -- see
//! DESIGN.md for why this replaces the original's plain substring-keyed
//! strings -- but `encode` still renders the classic textual form, which is
//! what `Engine::debug()` and the `copy`/`apply` scenarios in spec.md §8
//! talk about.

use crate::ident::Ident;

/// The op-key for a (possibly multi-argument) typemap slot: the bare
/// operation name plus the type/name signature of every parameter that
/// precedes the one this bucket lives on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKey {
    pub op: String,
    pub prefix: Vec<(String, Option<Ident>)>,
}

impl OpKey {
    pub fn new(op: impl Into<String>) -> Self {
        OpKey {
            op: op.into(),
            prefix: Vec::new(),
        }
    }

    pub fn with_prefix(op: impl Into<String>, prefix: Vec<(String, Option<Ident>)>) -> Self {
        OpKey {
            op: op.into(),
            prefix,
        }
    }

    /// Returns a copy of this key with one more parameter appended to the
    /// prefix -- the key a typemap on the *next* parameter would be stored
    /// under, continuing the chain described in spec.md §4.1/§4.3.
    pub fn extended(&self, ty: &str, name: Option<&Ident>) -> OpKey {
        let mut prefix = self.prefix.clone();
        prefix.push((ty.to_string(), name.cloned()));
        OpKey {
            op: self.op.clone(),
            prefix,
        }
    }

    /// Number of parameters encoded in this key's prefix, i.e. the arity of
    /// the multi-argument typemap minus one. Counting `+` characters in the
    /// textual encoding (spec.md §4.1) and counting prefix entries here are
    /// equivalent; we use the structural count directly.
    pub fn arity(&self) -> usize {
        self.prefix.len()
    }

    /// Render the classic `"tmap:<op>-T1+N1:-T2+N2:..."` textual form, used
    /// only for `debug()` output and test fixtures that assert against it.
    pub fn encode(&self) -> String {
        let mut s = op_key(&self.op);
        for (ty, name) in &self.prefix {
            s.push_str(&suffix(ty, name.as_ref().map(Ident::as_str)));
        }
        s
    }
}

/// `"tmap:" + op` -- the base textual key for an operation.
pub fn op_key(op: &str) -> String {
    format!("tmap:{}", op)
}

/// `"-" + T + "+" + N + ":"`, with `N` empty when no name is given.
pub fn suffix(ty: &str, name: Option<&str>) -> String {
    format!("-{}+{}:", ty, name.unwrap_or(""))
}

/// Number of `+` characters in a textual key -- the arity it encodes.
pub fn arity_of(encoded: &str) -> usize {
    encoded.matches('+').count()
}
