//! A toy C-type representation shared by the integration tests -- enough of
//! a C type (base name, pointer depth, array dimensions, one layer of
//! qualifiers, one level of typedef) to drive every rung of the matcher.

use std::cell::RefCell;
use std::collections::HashMap;

use hll_typemap::TypeSystem;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TyRepr {
    pub base: String,
    pub pointer: usize,
    pub array_dims: Vec<String>,
    pub qualifiers: Vec<String>,
}

impl TyRepr {
    fn encode(&self) -> String {
        let mut s = String::new();
        for q in &self.qualifiers {
            s.push_str("q(");
            s.push_str(q);
            s.push_str(").");
        }
        for _ in 0..self.pointer {
            s.push_str("p.");
        }
        s.push_str(&self.base);
        for d in &self.array_dims {
            s.push('[');
            s.push_str(d);
            s.push(']');
        }
        s
    }
}

#[derive(Default)]
pub struct CType {
    typedefs: RefCell<HashMap<String, TyRepr>>,
    remembered: RefCell<Vec<TyRepr>>,
}

impl CType {
    pub fn add_typedef(&mut self, name: &str, target: &str) {
        let resolved = self.parse(target);
        self.typedefs.borrow_mut().insert(name.to_string(), resolved);
    }

    pub fn parse(&self, spec: &str) -> TyRepr {
        let mut s = spec.trim().to_string();
        let mut pointer = 0;
        while s.trim_end().ends_with('*') {
            s = s.trim_end().to_string();
            s.pop();
            pointer += 1;
        }

        let mut array_dims = Vec::new();
        while let Some(open) = s.find('[') {
            let close = s.find(']').expect("unterminated array dim");
            array_dims.push(s[open + 1..close].to_string());
            s = format!("{}{}", &s[..open], &s[close + 1..]);
        }

        let mut qualifiers = Vec::new();
        let base: Vec<&str> = s
            .split_whitespace()
            .filter(|w| {
                if *w == "const" || *w == "volatile" {
                    qualifiers.push((*w).to_string());
                    false
                } else {
                    true
                }
            })
            .collect();

        TyRepr {
            base: base.join(" "),
            pointer,
            array_dims,
            qualifiers,
        }
    }

    pub fn remembered_types(&self) -> Vec<String> {
        self.remembered.borrow().iter().map(|t| self.str(t)).collect()
    }
}

impl TypeSystem for CType {
    type Type = TyRepr;

    fn isarray(&self, ty: &TyRepr) -> bool {
        !ty.array_dims.is_empty()
    }

    fn array_ndim(&self, ty: &TyRepr) -> usize {
        ty.array_dims.len()
    }

    fn array_getdim(&self, ty: &TyRepr, k: usize) -> String {
        ty.array_dims.get(k).cloned().unwrap_or_default()
    }

    fn array_setdim(&self, ty: &TyRepr, dims: &[String]) -> TyRepr {
        let mut new_ty = ty.clone();
        new_ty.array_dims = dims.to_vec();
        new_ty
    }

    fn del_pointer(&self, ty: &TyRepr) -> Option<TyRepr> {
        if ty.pointer == 0 {
            None
        } else {
            let mut new_ty = ty.clone();
            new_ty.pointer -= 1;
            Some(new_ty)
        }
    }

    fn add_pointer(&self, ty: &TyRepr) -> TyRepr {
        let mut new_ty = ty.clone();
        new_ty.pointer += 1;
        new_ty
    }

    fn ispointer(&self, ty: &TyRepr) -> bool {
        ty.pointer > 0
    }

    fn base(&self, ty: &TyRepr) -> TyRepr {
        TyRepr {
            base: ty.base.clone(),
            pointer: 0,
            array_dims: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    fn ltype(&self, ty: &TyRepr) -> TyRepr {
        ty.clone()
    }

    fn manglestr(&self, ty: &TyRepr) -> String {
        self.str(ty)
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    fn str(&self, ty: &TyRepr) -> String {
        ty.encode()
    }

    fn parse_type(&self, s: &str) -> TyRepr {
        self.parse(s)
    }

    fn typedef_resolve(&self, ty: &TyRepr) -> Option<TyRepr> {
        if ty.pointer != 0 || !ty.array_dims.is_empty() || !ty.qualifiers.is_empty() {
            return None;
        }
        self.typedefs.borrow().get(&ty.base).cloned()
    }

    fn strip_qualifiers(&self, ty: &TyRepr) -> Option<TyRepr> {
        if ty.qualifiers.is_empty() {
            None
        } else {
            let mut new_ty = ty.clone();
            new_ty.qualifiers.clear();
            Some(new_ty)
        }
    }

    fn default_type(&self) -> TyRepr {
        TyRepr {
            base: "SWIGTYPE".to_string(),
            pointer: 0,
            array_dims: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    fn remember(&mut self, ty: &TyRepr) {
        self.remembered.borrow_mut().push(ty.clone());
    }
}
