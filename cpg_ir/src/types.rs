//! The type value model and the textual type-expression grammar.
//!
//! `T ::= id | *T | []T | map[T]T | chan T | func(T,...) | func(T,...) T | func(T,...) (T,...)`

use std::fmt::Write as _;

use crate::type_registry::TypeRegistry;

/// Interned handle to a [`Ty`] in a [`TypeRegistry`].
///
/// `Copy`, index-compared — two handles are equal iff they name the same
/// interned type, per the data-model invariant that equal types are
/// identical instances.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct TypeIdx(pub(crate) u32);

impl TypeIdx {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Origin of a [`Ty::Pointer`] — distinguishes `*T` from `[]T`/slice-of-`T`,
/// which share a representation (one element type) but differ semantically.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PointerOrigin {
    Pointer,
    Array,
}

/// A named type, optionally generic (`pkg.Name`, `map` with `[K, V]`, `chan`
/// with `[T]`, or a bare built-in like `int`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectType {
    pub name: Box<str>,
    pub generics: Vec<TypeIdx>,
}

/// `*T` (origin = Pointer) or `[]T`/slice (origin = Array).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PointerType {
    pub element: TypeIdx,
    pub origin: PointerOrigin,
}

/// `func(P1, ...) R` / `func(P1, ...) (R1, ...)`.
///
/// `canonical_name` is the single source of truth for equality (data-model
/// invariant 3): two `FunctionType`s are equal iff their canonical names are
/// equal, computed once by [`function_canonical_name`] at construction time.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionType {
    pub params: Vec<TypeIdx>,
    pub returns: Vec<TypeIdx>,
    pub canonical_name: Box<str>,
}

/// An ordered tuple of element types (the type of a multi-valued return
/// before it is destructured).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TupleType {
    pub elements: Vec<TypeIdx>,
}

/// The value-compared, interned type representation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ty {
    Object(ObjectType),
    Pointer(PointerType),
    Function(FunctionType),
    Tuple(TupleType),
    /// A type expression that could not be resolved or parsed.
    Unknown,
    /// No type information is expected at all (e.g. a `Problem` node).
    Missing,
}

/// Built-in identifier names recognised by the source-language frontend
/// (`spec.md` §4.1). A bare identifier matching one of these yields an
/// `ObjectType` for the built-in directly; anything else is package-qualified.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "bool", "byte", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "float32", "float64", "complex64", "complex128", "rune", "string",
    "uintptr", "error",
];

pub fn is_builtin_type_name(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

/// Compute the canonical name of a function type per data-model invariant 3:
/// `func(<comma-joined-parameter-type-names>)` optionally suffixed with
/// ` T` (single return) or ` (T1, T2, ...)` (multiple returns).
pub fn function_canonical_name(registry: &TypeRegistry, params: &[TypeIdx], returns: &[TypeIdx]) -> String {
    let mut out = String::from("func(");
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}", registry.display(*p));
    }
    out.push(')');
    match returns.len() {
        0 => {}
        1 => {
            out.push(' ');
            let _ = write!(out, "{}", registry.display(returns[0]));
        }
        _ => {
            out.push_str(" (");
            for (i, r) in returns.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}", registry.display(*r));
            }
            out.push(')');
        }
    }
    out
}

/// Render a [`Ty`] back to the textual grammar, used both for diagnostics
/// and to support the `parse(render(parse(s))) == parse(s)` idempotence
/// property.
pub fn display(registry: &TypeRegistry, idx: TypeIdx) -> String {
    match registry.get(idx) {
        Ty::Object(obj) => {
            if obj.generics.is_empty() {
                obj.name.to_string()
            } else {
                let args: Vec<String> = obj.generics.iter().map(|g| display(registry, *g)).collect();
                format!("{}[{}]", obj.name, args.join(","))
            }
        }
        Ty::Pointer(p) => match p.origin {
            PointerOrigin::Pointer => format!("*{}", display(registry, p.element)),
            PointerOrigin::Array => format!("[]{}", display(registry, p.element)),
        },
        Ty::Function(f) => f.canonical_name.to_string(),
        Ty::Tuple(t) => {
            let parts: Vec<String> = t.elements.iter().map(|e| display(registry, *e)).collect();
            format!("({})", parts.join(", "))
        }
        Ty::Unknown => "<unknown>".to_string(),
        Ty::Missing => "<missing>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_registry::TypeRegistry;

    #[test]
    fn builtin_names_recognised() {
        assert!(is_builtin_type_name("int"));
        assert!(is_builtin_type_name("error"));
        assert!(!is_builtin_type_name("MyStruct"));
    }

    #[test]
    fn function_canonical_name_single_return() {
        let mut reg = TypeRegistry::new();
        let int_ty = reg.intern_object("int", vec![]);
        let str_ty = reg.intern_object("string", vec![]);
        let name = function_canonical_name(&reg, &[int_ty], &[str_ty]);
        assert_eq!(name, "func(int) string");
    }

    #[test]
    fn function_canonical_name_multi_return() {
        let mut reg = TypeRegistry::new();
        let int_ty = reg.intern_object("int", vec![]);
        let err_ty = reg.intern_object("error", vec![]);
        let name = function_canonical_name(&reg, &[], &[int_ty, err_ty]);
        assert_eq!(name, "func() (int, error)");
    }

    #[test]
    fn function_canonical_name_no_return() {
        let mut reg = TypeRegistry::new();
        let name = function_canonical_name(&reg, &[], &[]);
        assert_eq!(name, "func()");
    }
}
