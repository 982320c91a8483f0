//! Local-variable materialisation (spec.md §4.7).
//!
//! A typemap's `locals` list declares variable names (`SWIGTYPE *newobj;`,
//! `int res;` ...) it wants the wrapper emitter to allocate fresh storage
//! for, then every whole-word occurrence of the declared name inside the
//! typemap's already-substituted code is rewritten to the emitter-chosen
//! name. "Whole word" matters: a local named `res` must not touch `res2` or
//! `prefix_res`.

use std::collections::HashMap;

use crate::param::Param;
use crate::wrapper::LocalSink;

/// Asks `sink` to materialise each of `locals`, then rewrites `code` so
/// every identifier-bounded occurrence of a local's declared name reads the
/// name the sink actually chose for it. Returns the rewritten code.
pub fn materialize_locals(sink: &mut dyn LocalSink, code: &str, locals: &[Param]) -> String {
    if locals.is_empty() {
        return code.to_string();
    }

    let mut renames: HashMap<&str, String> = HashMap::new();
    for local in locals {
        let declared = local
            .name
            .as_ref()
            .map(|i| i.as_str())
            .unwrap_or_default();
        if declared.is_empty() {
            continue;
        }
        let init = local.get_attr("init").and_then(|v| match v {
            crate::param::AttrValue::KwArg(s) => Some(s.as_str()),
            _ => None,
        });
        let chosen = sink.new_localv(declared, &local.ty, init);
        renames.insert(declared, chosen);
    }

    rewrite_identifiers(code, &renames)
}

fn rewrite_identifiers(code: &str, renames: &HashMap<&str, String>) -> String {
    if renames.is_empty() {
        return code.to_string();
    }

    let mut out = String::with_capacity(code.len());
    let chars: Vec<char> = code.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if is_ident_start(chars[i]) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            match renames.get(word.as_str()) {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(&word),
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Ident;

    struct CountingSink {
        next: usize,
    }

    impl LocalSink for CountingSink {
        fn new_localv(&mut self, preferred_name: &str, _decl_type: &str, _init: Option<&str>) -> String {
            self.next += 1;
            format!("{}{}", preferred_name, self.next)
        }
    }

    #[test]
    fn rewrites_whole_word_occurrences_only() {
        let mut sink = CountingSink { next: 0 };
        let locals = vec![Param::new("int").with_name(Ident::new("res"))];
        let out = materialize_locals(&mut sink, "res = res2 + prefix_res + res;", &locals);
        assert_eq!(out, "res1 = res2 + prefix_res + res1;");
    }

    #[test]
    fn no_locals_is_a_no_op() {
        let mut sink = CountingSink { next: 0 };
        let out = materialize_locals(&mut sink, "unchanged", &[]);
        assert_eq!(out, "unchanged");
    }
}
