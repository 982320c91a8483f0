//! `Engine<T>` -- the façade exposing exactly the operation table of
//! spec.md §6 over the scope stack, registry, matcher and exception hook.

use std::marker::PhantomData;

use crate::ctype::TypeSystem;
use crate::error::Result;
use crate::ident::Ident;
use crate::param::{KwArg, Param};
use crate::registry;
use crate::scope::ScopeStack;
use crate::wrapper::LocalSink;
use crate::{except, matcher, multi, attach};

use crate::error::TypemapError;

/// The whole of this engine's configuration surface: how deep the scope
/// stack is allowed to grow before `new_scope` starts refusing pushes.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub max_scope: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { max_scope: 32 }
    }
}

pub struct Engine<T: TypeSystem> {
    stack: ScopeStack,
    _types: PhantomData<T>,
}

impl<T: TypeSystem> Engine<T> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            stack: ScopeStack::new(config.max_scope),
            _types: PhantomData,
        }
    }

    /// Resets the engine to a single, empty root scope.
    pub fn init(&mut self) {
        self.stack.init();
    }

    pub fn new_scope(&mut self) -> Result<()> {
        self.stack.push()
    }

    pub fn pop_scope(&mut self) -> Result<()> {
        self.stack.pop().map(|_| ())
    }

    pub fn register(&mut self, op: &str, parms: &[Param], code: String, locals: Vec<Param>, kwargs: Vec<KwArg>) {
        registry::register(self.stack.current_mut(), op, parms, code, locals, kwargs);
    }

    pub fn clear(&mut self, op: &str, parms: &[Param]) {
        registry::clear(self.stack.current_mut(), op, parms);
    }

    /// Fails with [`TypemapError::ArityMismatch`] if `srcparms` and
    /// `destparms` have different lengths; otherwise returns whether a
    /// matching source entry was found and copied.
    pub fn copy(&mut self, op: &str, srcparms: &[Param], destparms: &[Param]) -> Result<bool> {
        if srcparms.len() != destparms.len() {
            return Err(TypemapError::ArityMismatch {
                src_len: srcparms.len(),
                dest_len: destparms.len(),
            });
        }
        Ok(registry::copy(&mut self.stack, op, srcparms, destparms))
    }

    pub fn apply(&mut self, src: &[Param], dest: &[Param]) {
        registry::apply(&mut self.stack, src, dest);
    }

    pub fn clear_apply(&mut self, parms: &[Param]) {
        registry::clear_apply(&mut self.stack, parms);
    }

    pub fn search(&self, types: &T, op: &str, ty: &T::Type, name: Option<&Ident>) -> Option<registry::TypemapEntry> {
        matcher::search(&self.stack, types, op, ty, name)
    }

    pub fn search_multi(&self, types: &T, op: &str, parms: &[Param]) -> Option<(registry::TypemapEntry, usize)> {
        multi::search_multi(&self.stack, types, op, parms)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn lookup(
        &self,
        types: &mut T,
        op: &str,
        ty: &T::Type,
        pname: Option<&Ident>,
        lname: Option<&Ident>,
        source: &str,
        target: &str,
        f: Option<&mut dyn LocalSink>,
    ) -> Option<String> {
        attach::lookup(&self.stack, types, op, ty, pname, lname, source, target, f)
    }

    pub fn attach_parms(&self, types: &mut T, sink: &mut dyn LocalSink, op: &str, parms: &mut [Param]) {
        attach::attach_parms(&self.stack, types, sink, op, parms);
    }

    pub fn except_register(&mut self, code: String) {
        except::except_register(&mut self.stack, code);
    }

    pub fn except_clear(&mut self) {
        except::except_clear(&mut self.stack);
    }

    pub fn except_lookup(&self) -> Option<&str> {
        except::except_lookup(&self.stack)
    }

    /// Dumps every scope's registered typemaps via `tracing::debug!`.
    pub fn debug(&self) {
        for (depth, scope) in self.stack.all().iter().enumerate() {
            for (ty, buckets) in &scope.types {
                for (name, bucket) in std::iter::once((None, &buckets.default))
                    .chain(buckets.by_name.iter().map(|(n, b)| (Some(n), b)))
                {
                    for (key, entry) in &bucket.0 {
                        tracing::debug!(
                            depth,
                            ty = %ty,
                            name = name.map(Ident::as_str).unwrap_or(""),
                            key = %key.encode(),
                            has_code = entry.has_code(),
                            "typemap entry"
                        );
                    }
                }
            }
        }
    }
}

impl<T: TypeSystem> Default for Engine<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::CType;

    #[test]
    fn copy_rejects_arity_mismatch() {
        let mut engine: Engine<CType> = Engine::new();
        let src = [Param::new("int").with_name(Ident::new("x"))];
        let dest = [
            Param::new("int").with_name(Ident::new("a")),
            Param::new("int").with_name(Ident::new("b")),
        ];
        assert!(matches!(
            engine.copy("in", &src, &dest),
            Err(TypemapError::ArityMismatch { src_len: 1, dest_len: 2 })
        ));
    }

    #[test]
    fn new_scope_then_pop_restores_visibility() {
        let mut engine: Engine<CType> = Engine::new();
        let types = CType::default();
        let parm = Param::new("int").with_name(Ident::new("x"));
        engine.register("in", &[parm.clone()], "code".into(), vec![], vec![]);

        engine.new_scope().unwrap();
        let ty = types.parse("int");
        assert!(engine.search(&types, "in", &ty, Some(&Ident::new("x"))).is_some());
        engine.pop_scope().unwrap();
        assert!(engine.search(&types, "in", &ty, Some(&Ident::new("x"))).is_some());
    }

    #[test]
    fn pop_scope_past_root_errors() {
        let mut engine: Engine<CType> = Engine::new();
        assert!(matches!(engine.pop_scope(), Err(TypemapError::PopRootScope)));
    }
}
