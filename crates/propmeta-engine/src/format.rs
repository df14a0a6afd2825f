//! Human-readable type rendering for logs and test assertions.

use crate::def::DefId;
use crate::reflect::TypeReflection;
use crate::types::{TypeData, TypeId};
use propmeta_common::limits::MAX_TYPE_RESOLUTION_DEPTH;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Renders `TypeId`s in source syntax:
/// `Box<String>`, `T`, `String[]`, `? extends Number`, `Outer<String>.Inner<int>`.
pub struct TypeFormatter<'a> {
    reflect: &'a dyn TypeReflection,
    names: FxHashMap<DefId, Arc<str>>,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(reflect: &'a dyn TypeReflection) -> Self {
        Self {
            reflect,
            names: FxHashMap::default(),
        }
    }

    pub fn format(&mut self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(ty, &mut out, 0);
        out
    }

    fn write(&mut self, ty: TypeId, out: &mut String, depth: u32) {
        if depth > MAX_TYPE_RESOLUTION_DEPTH {
            out.push_str("...");
            return;
        }
        let Some(data) = self.reflect.types().lookup(ty) else {
            out.push_str(&format!("<unknown #{}>", ty.0));
            return;
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Class(def) => out.push_str(&self.class_name(def)),
            TypeData::Parameterized(app) => {
                match app.owner {
                    Some(owner) => {
                        self.write(owner, out, depth + 1);
                        out.push('.');
                        let name = self.class_name(app.base);
                        out.push_str(name.rsplit('.').next().unwrap_or(&*name));
                    }
                    None => out.push_str(&self.class_name(app.base)),
                }
                if !app.args.is_empty() {
                    out.push('<');
                    for (i, &arg) in app.args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write(arg, out, depth + 1);
                    }
                    out.push('>');
                }
            }
            TypeData::TypeParameter(info) => out.push_str(&info.name),
            TypeData::Array(component) => {
                self.write(component, out, depth + 1);
                out.push_str("[]");
            }
            TypeData::Wildcard { upper, lower } => {
                out.push('?');
                if let Some(upper) = upper {
                    out.push_str(" extends ");
                    self.write(upper, out, depth + 1);
                } else if let Some(lower) = lower {
                    out.push_str(" super ");
                    self.write(lower, out, depth + 1);
                }
            }
        }
    }

    fn class_name(&mut self, def: DefId) -> Arc<str> {
        if let Some(name) = self.names.get(&def) {
            return Arc::clone(name);
        }
        let name = self
            .reflect
            .type_name(def)
            .unwrap_or_else(|| Arc::from(format!("#{}", def.0)));
        self.names.insert(def, Arc::clone(&name));
        name
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
