//! The capabilities the engine borrows from the (out of scope) C-type module.
//!
//! spec.md §1 lists these as external collaborators whose interfaces only
//! are referenced. `TypeSystem` is that interface, modelled the way
//! `core_lang::type_engine::TypeEngine` models its own external-ish
//! operations: a trait with an associated representation type and a set of
//! pure queries over it.

use std::fmt::Debug;
use std::hash::Hash;

/// Operations the matcher and substituter need from a C-type representation.
///
/// Implementations own whatever internal AST they like; the engine only
/// ever calls these methods and compares/hashes `Self::Type` values (keying
/// the registry by their `str()` form).
pub trait TypeSystem {
    type Type: Clone + Eq + Hash + Debug;

    fn isarray(&self, ty: &Self::Type) -> bool;
    fn array_ndim(&self, ty: &Self::Type) -> usize;
    fn array_getdim(&self, ty: &Self::Type, k: usize) -> String;
    /// Returns a copy of `ty` with every array dimension replaced by `dims`
    /// (one entry per dimension, in order). Used internally by the matcher
    /// to build the `int[ANY]` wildcard form for array fallback.
    fn array_setdim(&self, ty: &Self::Type, dims: &[String]) -> Self::Type;

    /// `None` if `ty` is not a pointer type.
    fn del_pointer(&self, ty: &Self::Type) -> Option<Self::Type>;
    fn add_pointer(&self, ty: &Self::Type) -> Self::Type;
    fn ispointer(&self, ty: &Self::Type) -> bool;

    fn base(&self, ty: &Self::Type) -> Self::Type;
    fn ltype(&self, ty: &Self::Type) -> Self::Type;
    fn manglestr(&self, ty: &Self::Type) -> String;
    /// Canonical textual form -- this is also what the registry uses as its
    /// map key (the `TypeString` entity in spec.md §3).
    fn str(&self, ty: &Self::Type) -> String;

    /// Parses a type's canonical textual form (as produced by `str`, and as
    /// stored on `Param::ty`) back into `Self::Type`. The multi-argument
    /// matcher needs this to hand a real type value to `search_with_key` for
    /// every parameter in the window, not just the first.
    fn parse_type(&self, s: &str) -> Self::Type;

    /// One level of typedef resolution. `None` if `ty` is not a typedef, or
    /// resolving it further would not change it.
    fn typedef_resolve(&self, ty: &Self::Type) -> Option<Self::Type>;
    /// Strip one layer of qualifiers (`const`, `volatile`, ...). `None` if
    /// `ty` carries no qualifiers to strip.
    fn strip_qualifiers(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// The catch-all sentinel type (e.g. `SWIGTYPE`) used as a last-resort
    /// match target.
    fn default_type(&self) -> Self::Type;

    /// Record that `ty` was referenced via a `$descriptor`-family
    /// placeholder and must have a runtime type-info record emitted for it.
    /// Called at most once per substitution per type, and only when a
    /// descriptor placeholder actually matched something in the code (see
    /// `subst::substitute`).
    fn remember(&mut self, ty: &Self::Type);
}
