//! Parameter, local-variable and keyword-argument nodes.
//!
//! spec.md §3 describes `ParamNode` as a singly linked list (`next?:
//! ParamNode`). We represent a parameter list as a plain `Vec<Param>`
//! instead: every operation in §4 only ever walks a contiguous run of a
//! list from some starting index, which a slice does exactly as well as a
//! linked list while staying ordinary, indexable Rust.

use std::collections::HashMap;

use crate::ident::Ident;

/// One parameter of the signature a typemap is matched or registered
/// against.
#[derive(Debug, Clone)]
pub struct Param {
    pub ty: String,
    pub name: Option<Ident>,
    /// The local variable name the wrapper emitter assigned this parameter,
    /// used by `$n` substitution (spec.md §4.6) and independent of `name`
    /// (the *source*-language parameter name).
    pub lname: Option<Ident>,
    pub attrs: HashMap<String, AttrValue>,
}

impl Param {
    pub fn new(ty: impl Into<String>) -> Self {
        Param {
            ty: ty.into(),
            name: None,
            lname: None,
            attrs: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<Ident>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_lname(mut self, lname: impl Into<Ident>) -> Self {
        self.lname = Some(lname.into());
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }
}

/// A keyword argument declared alongside a typemap, e.g.
/// `%typemap(in, noblock=1) ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KwArg {
    pub name: String,
    pub value: String,
}

/// The attribute bag `attach_parms` (spec.md §4.8) writes onto a consumed
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `op-key(op) -> code`: the substituted code fragment.
    Code(String),
    /// `op-key(op + ":next") -> p`: the index of the parameter just past
    /// the window this typemap consumed, or `None` if it was the last one.
    NextIndex(Option<usize>),
    /// `op-key(op + ":" + kw.name) -> kw.value`.
    KwArg(String),
}
