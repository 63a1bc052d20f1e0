//! Lowers a `cpg_ast` type-expression text into an interned, package-qualified
//! `TypeIdx` (`spec.md` §4.1).
//!
//! `cpg_ir::parse_type_text` only knows the bare grammar; it interns
//! identifiers exactly as written. Qualification against the current
//! module/package happens here, as a post-pass over the freshly-parsed
//! type tree: every `ObjectType` whose name is not a built-in and carries
//! no path/package separator already gets the current file's import path
//! prepended.

use cpg_ir::{is_builtin_type_name, parse_type_text, Ty, TypeIdx, TypeRegistry};

/// Parse `text` and qualify any bare identifier against `import_path`.
/// Malformed text still yields `UnknownType` rather than propagating a
/// parse error — type lowering is never fatal for the file.
pub fn lower_type_text(text: &str, import_path: &str, reg: &mut TypeRegistry) -> TypeIdx {
    match parse_type_text(text, reg) {
        Ok(ty) => qualify(reg, ty, import_path),
        Err(_) => reg.unknown(),
    }
}

fn qualify(reg: &mut TypeRegistry, ty: TypeIdx, import_path: &str) -> TypeIdx {
    match reg.get(ty).clone() {
        Ty::Object(obj) => {
            let generics: Vec<TypeIdx> = obj.generics.iter().map(|g| qualify(reg, *g, import_path)).collect();
            let needs_qualifying = !is_builtin_type_name(&obj.name)
                && obj.name.as_ref() != "map"
                && obj.name.as_ref() != "chan"
                && !obj.name.contains('.')
                && !obj.name.contains('/');
            if needs_qualifying {
                reg.intern_object(&format!("{import_path}.{}", obj.name), generics)
            } else {
                reg.intern_object(&obj.name, generics)
            }
        }
        Ty::Pointer(p) => {
            let element = qualify(reg, p.element, import_path);
            reg.intern_pointer(element, p.origin)
        }
        Ty::Function(f) => {
            let params: Vec<TypeIdx> = f.params.iter().map(|p| qualify(reg, *p, import_path)).collect();
            let returns: Vec<TypeIdx> = f.returns.iter().map(|r| qualify(reg, *r, import_path)).collect();
            reg.intern_function(params, returns)
        }
        Ty::Tuple(t) => {
            let elements: Vec<TypeIdx> = t.elements.iter().map(|e| qualify(reg, *e, import_path)).collect();
            reg.intern_tuple(elements)
        }
        Ty::Unknown => reg.unknown(),
        Ty::Missing => reg.missing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_not_qualified() {
        let mut reg = TypeRegistry::new();
        let ty = lower_type_text("int", "example.com/mod/pkg", &mut reg);
        assert_eq!(reg.display(ty), "int");
    }

    #[test]
    fn bare_identifier_is_qualified_with_import_path() {
        let mut reg = TypeRegistry::new();
        let ty = lower_type_text("Widget", "example.com/mod/pkg", &mut reg);
        assert_eq!(reg.display(ty), "example.com/mod/pkg.Widget");
    }

    #[test]
    fn already_qualified_identifier_is_left_alone() {
        let mut reg = TypeRegistry::new();
        let ty = lower_type_text("other/pkg.Gadget", "example.com/mod/pkg", &mut reg);
        assert_eq!(reg.display(ty), "other/pkg.Gadget");
    }

    #[test]
    fn qualification_recurses_through_pointer_and_map() {
        let mut reg = TypeRegistry::new();
        let ty = lower_type_text("map[string]*Widget", "example.com/mod/pkg", &mut reg);
        assert_eq!(reg.display(ty), "map[string,*example.com/mod/pkg.Widget]");
    }

    #[test]
    fn malformed_text_yields_unknown() {
        let mut reg = TypeRegistry::new();
        let ty = lower_type_text("func(", "example.com/mod/pkg", &mut reg);
        assert_eq!(ty, reg.unknown());
    }
}
