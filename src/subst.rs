//! `$`-placeholder expansion inside a typemap's code template (spec.md §4.6).
//!
//! A placeholder addresses one parameter by its 1-based position (`$1`,
//! `$2`, ...) or the pseudo-parameter `$result`, then optionally selects a
//! derived form of that parameter's type (`$1_type`, `$1_ltype`,
//! `$*1_type`, `$&1_type`, `$1_descriptor`, `$1_mangle`, `$1_basetype`) or
//! one of its array dimensions (`$1_dim0`, `$1_dim1`, ...). `$input` and
//! `$n` with no suffix both resolve to the parameter's local variable name
//! (`lname`), matching what the wrapper emitter actually substitutes in for
//! the variable the generated code reads from.

use crate::param::Param;

/// Result of expanding a template: the expanded text, plus every type
/// referenced through a `$..._descriptor` form. The caller (which holds the
/// actual `TypeSystem::Type` values these strings were rendered from) is
/// responsible for calling `TypeSystem::remember` on the matching types --
/// the substituter only ever sees their already-rendered string form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expansion {
    pub text: String,
    pub descriptors: Vec<String>,
}

/// `parms` is 1-indexed by `$n` placeholders (`parms[0]` is `$1`). `result`
/// stands in for `$result`.
pub fn substitute(code: &str, parms: &[Param], result: Option<&Param>) -> Expansion {
    let mut out = String::with_capacity(code.len());
    let mut descriptors = Vec::new();
    let bytes = code.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            out.push(bytes[i] as char);
            i += 1;
            continue;
        }

        let rest = &code[i + 1..];
        if let Some(stripped) = rest.strip_prefix("input") {
            if let Some(p) = parms.first() {
                out.push_str(lname_of(p));
            }
            i += 1 + (rest.len() - stripped.len());
            continue;
        }

        let (sigil, after_sigil) = match rest.as_bytes().first() {
            Some(b'*') => (Sigil::Deref, &rest[1..]),
            Some(b'&') => (Sigil::Ref, &rest[1..]),
            _ => (Sigil::Plain, rest),
        };

        if let Some(after_result) = after_sigil.strip_prefix("result") {
            if let Some(p) = result {
                let (text, descriptor, suffix_len) = render(p, after_result, sigil);
                out.push_str(&text);
                if let Some(d) = descriptor {
                    descriptors.push(d);
                }
                let consumed = "result".len() + suffix_len;
                i += 1 + sigil_len(sigil) + consumed;
                continue;
            }
        }

        if let Some((n, remainder)) = leading_number(after_sigil) {
            if n >= 1 && n as usize <= parms.len() {
                let p = &parms[n as usize - 1];
                let (text, descriptor, suffix_len) = render(p, remainder, sigil);
                out.push_str(&text);
                if let Some(d) = descriptor {
                    descriptors.push(d);
                }
                let digit_len = after_sigil.len() - remainder.len();
                let consumed = digit_len + suffix_len + sigil_len(sigil);
                i += 1 + consumed;
                continue;
            }
        }

        // Bare forms (`$type`, `$descriptor`, `$parmname`, ...) implicitly
        // address parms[0] -- they're only meaningful for i == 1, and since
        // this pass substitutes the whole window in one go, parms[0] *is*
        // the i == 1 parameter.
        if let Some(p) = parms.first() {
            if let Some((text, descriptor, suffix_len)) = render_bare(p, after_sigil, sigil) {
                out.push_str(&text);
                if let Some(d) = descriptor {
                    descriptors.push(d);
                }
                i += 1 + sigil_len(sigil) + suffix_len;
                continue;
            }
        }

        // Not a placeholder we recognise -- emit the `$` literally and move on.
        out.push('$');
        i += 1;
    }

    Expansion {
        text: out,
        descriptors,
    }
}

#[derive(Clone, Copy)]
enum Sigil {
    Plain,
    Deref,
    Ref,
}

fn sigil_len(sigil: Sigil) -> usize {
    match sigil {
        Sigil::Plain => 0,
        Sigil::Deref | Sigil::Ref => 1,
    }
}

fn lname_of(p: &Param) -> &str {
    p.lname
        .as_ref()
        .or(p.name.as_ref())
        .map(|i| i.as_str())
        .unwrap_or("")
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
    let digit_count = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count == 0 {
        return None;
    }
    s[..digit_count].parse().ok().map(|n| (n, &s[digit_count..]))
}

/// Renders one parameter reference, given the suffix text following `$n`
/// (e.g. `_type`, `_descriptor`, `_dim0`) and whether it was written with a
/// `$*`/`$&` sigil. Returns the rendered text, the type string referenced by
/// a `_descriptor` form (if any), and how many bytes of `suffix` were
/// consumed (0 for the bare `$n` / `$result` form).
fn render(p: &Param, suffix: &str, sigil: Sigil) -> (String, Option<String>, usize) {
    let adjusted_type = || match sigil {
        Sigil::Plain => p.ty.clone(),
        Sigil::Deref => strip_one_pointer(&p.ty).unwrap_or_else(|| p.ty.clone()),
        Sigil::Ref => add_one_pointer(&p.ty),
    };

    if suffix.starts_with("_type") {
        return (adjusted_type(), None, "_type".len());
    }
    if suffix.starts_with("_ltype") {
        return (adjusted_type(), None, "_ltype".len());
    }
    if suffix.starts_with("_basetype") {
        return (base_type(&p.ty), None, "_basetype".len());
    }
    if suffix.starts_with("_mangle") {
        return (mangle(&adjusted_type()), None, "_mangle".len());
    }
    if suffix.starts_with("_descriptor") {
        let ty = adjusted_type();
        return (
            format!("SWIGTYPE_{}", mangle(&ty)),
            Some(ty),
            "_descriptor".len(),
        );
    }
    if suffix.starts_with("_name") {
        let text = p.name.as_ref().map(|i| i.to_string()).unwrap_or_default();
        return (text, None, "_name".len());
    }
    if let Some(idx) = suffix.strip_prefix("_dim") {
        let digit_count = idx.chars().take_while(|c| c.is_ascii_digit()).count();
        if digit_count > 0 {
            if let Ok(k) = idx[..digit_count].parse::<usize>() {
                return (
                    array_dim(&p.ty, k).unwrap_or_default(),
                    None,
                    "_dim".len() + digit_count,
                );
            }
        }
    }

    (lname_of(p).to_string(), None, 0)
}

/// Renders a bare (unindexed) placeholder -- `$type`, `$descriptor`,
/// `$parmname`, ... -- against `p`, which must be `parms[0]`. `None` if
/// `suffix` doesn't start with any recognised bare keyword, so the caller
/// falls back to emitting the `$` literally.
fn render_bare(p: &Param, suffix: &str, sigil: Sigil) -> Option<(String, Option<String>, usize)> {
    let adjusted_type = || match sigil {
        Sigil::Plain => p.ty.clone(),
        Sigil::Deref => strip_one_pointer(&p.ty).unwrap_or_else(|| p.ty.clone()),
        Sigil::Ref => add_one_pointer(&p.ty),
    };

    if suffix.starts_with("basemangle") {
        return Some((mangle(&base_type(&p.ty)), None, "basemangle".len()));
    }
    if suffix.starts_with("basetype") {
        return Some((base_type(&p.ty), None, "basetype".len()));
    }
    if suffix.starts_with("ltype") {
        return Some((adjusted_type(), None, "ltype".len()));
    }
    if suffix.starts_with("type") {
        return Some((adjusted_type(), None, "type".len()));
    }
    if suffix.starts_with("mangle") {
        return Some((mangle(&adjusted_type()), None, "mangle".len()));
    }
    if suffix.starts_with("descriptor") {
        let ty = adjusted_type();
        return Some((
            format!("SWIGTYPE_{}", mangle(&ty)),
            Some(ty),
            "descriptor".len(),
        ));
    }
    if suffix.starts_with("parmname") {
        let text = p
            .name
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_else(|| lname_of(p).to_string());
        return Some((text, None, "parmname".len()));
    }
    if let Some(idx) = suffix.strip_prefix("dim") {
        let digit_count = idx.chars().take_while(|c| c.is_ascii_digit()).count();
        if digit_count > 0 {
            if let Ok(k) = idx[..digit_count].parse::<usize>() {
                return Some((
                    array_dim(&p.ty, k).unwrap_or_default(),
                    None,
                    "dim".len() + digit_count,
                ));
            }
        }
    }

    None
}

fn strip_one_pointer(ty: &str) -> Option<String> {
    let trimmed = ty.trim_end();
    trimmed
        .strip_suffix('*')
        .map(|s| s.trim_end().to_string())
}

fn add_one_pointer(ty: &str) -> String {
    format!("{} *", ty.trim_end())
}

fn base_type(ty: &str) -> String {
    ty.trim_end_matches('*')
        .trim_end()
        .split('[')
        .next()
        .unwrap_or(ty)
        .trim()
        .to_string()
}

fn mangle(ty: &str) -> String {
    ty.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn array_dim(ty: &str, k: usize) -> Option<String> {
    ty.match_indices('[')
        .nth(k)
        .and_then(|(start, _)| ty[start + 1..].find(']').map(|end| ty[start + 1..start + 1 + end].to_string()))
}
