//! The `attach_parms`/`lookup` façades that tie matching and substitution
//! together (spec.md §4.8).

use crate::ctype::TypeSystem;
use crate::ident::Ident;
use crate::matcher::search;
use crate::multi::search_multi;
use crate::param::{AttrValue, Param};
use crate::scope::ScopeStack;
use crate::subst::substitute;
use crate::wrapper::LocalSink;

/// Walks `parms` left to right, attaching `op`'s typemap (if any) to every
/// window of parameters it consumes. A parameter that a multi-argument
/// typemap consumed as part of an earlier window is skipped, not matched
/// again on its own.
///
/// On each consumed window, the *first* parameter in the window receives:
/// - `op` -> the substituted code
/// - `op + ":next"` -> the index just past the window (`None` at the end)
/// - `op + ":" + kw.name` for every keyword argument the typemap declared
pub fn attach_parms<T: TypeSystem>(
    stack: &ScopeStack,
    types: &mut T,
    sink: &mut dyn LocalSink,
    op: &str,
    parms: &mut [Param],
) {
    let mut i = 0;
    while i < parms.len() {
        let window = &parms[i..];
        let Some((entry, consumed)) = search_multi(stack, types, op, window) else {
            i += 1;
            continue;
        };
        let Some(code) = entry.code.clone() else {
            i += consumed.max(1);
            continue;
        };

        let window_parms: Vec<Param> = parms[i..i + consumed].to_vec();
        let expansion = substitute(&code, &window_parms, None);
        remember_descriptors(types, &expansion.descriptors);

        let rewritten = crate::locals::materialize_locals(sink, &expansion.text, &entry.locals);
        let argnum = i + 1;
        let rewritten = rewritten.replace("$argnum", &argnum.to_string());

        let next_index = if i + consumed < parms.len() {
            Some(i + consumed)
        } else {
            None
        };

        let first = &mut parms[i];
        first.attrs.insert(op.to_string(), AttrValue::Code(rewritten));
        first
            .attrs
            .insert(format!("{}:next", op), AttrValue::NextIndex(next_index));
        for kw in &entry.kwargs {
            first.attrs.insert(
                format!("{}:{}", op, kw.name),
                AttrValue::KwArg(kw.value.clone()),
            );
        }

        i += consumed;
    }
}

/// A single-parameter lookup and substitution, without touching the
/// parameter's attribute bag -- the simpler cousin of `attach_parms` used
/// when a caller just wants one typemap's expanded code (spec.md §4.8).
///
/// Beyond `substitute`'s own placeholders, this also expands `$source`,
/// `$target` and `$typemap` (the entry's human-readable name) as a literal
/// pass over the already-substituted text -- the same order the code this
/// is grounded on applies them in, `$parmname` having already been handled
/// by `substitute`'s own bare-form rule.
#[allow(clippy::too_many_arguments)]
pub fn lookup<T: TypeSystem>(
    stack: &ScopeStack,
    types: &mut T,
    op: &str,
    ty: &T::Type,
    pname: Option<&Ident>,
    lname: Option<&Ident>,
    source: &str,
    target: &str,
    f: Option<&mut dyn LocalSink>,
) -> Option<String> {
    let entry = search(stack, types, op, ty, pname)?;
    let code = entry.code.clone()?;

    let mut parm = Param::new(types.str(ty));
    parm.name = pname.cloned();
    parm.lname = lname.cloned();
    let window = [parm];

    let expansion = substitute(&code, &window, None);
    remember_descriptors(types, &expansion.descriptors);

    let text = match f {
        Some(sink) if !entry.locals.is_empty() => {
            crate::locals::materialize_locals(sink, &expansion.text, &entry.locals)
        }
        _ => expansion.text,
    };

    let human = entry.typemap.as_deref().unwrap_or("");
    let text = text.replace("$source", source).replace("$target", target).replace("$typemap", human);
    Some(text)
}

fn remember_descriptors<T: TypeSystem>(types: &mut T, descriptors: &[String]) {
    for d in descriptors {
        let ty = types.parse_type(d);
        types.remember(&ty);
    }
}
