//! Interning registry for [`Ty`] values.
//!
//! One registry per project run. Mutation only ever happens through the
//! `intern_*` constructors below — nothing hands out a mutable `&mut Ty`,
//! so the invariant that equal types share one instance cannot be broken by
//! a caller mutating a type after the fact.

use rustc_hash::FxHashMap;

use crate::arena_id::to_u32;
use crate::types::{
    display, function_canonical_name, ObjectType, PointerOrigin, PointerType, Ty, TypeIdx,
};

#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: Vec<Ty>,
    by_key: FxHashMap<Box<str>, TypeIdx>,
    unknown: TypeIdx,
    missing: TypeIdx,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut reg = TypeRegistry {
            types: Vec::new(),
            by_key: FxHashMap::default(),
            unknown: TypeIdx(0),
            missing: TypeIdx(0),
        };
        reg.unknown = reg.push_unkeyed(Ty::Unknown);
        reg.missing = reg.push_unkeyed(Ty::Missing);
        reg
    }

    fn push_unkeyed(&mut self, ty: Ty) -> TypeIdx {
        let idx = TypeIdx(to_u32(self.types.len(), "TypeRegistry"));
        self.types.push(ty);
        idx
    }

    fn intern_keyed(&mut self, key: String, ty: Ty) -> TypeIdx {
        if let Some(idx) = self.by_key.get(key.as_str()) {
            return *idx;
        }
        let idx = self.push_unkeyed(ty);
        self.by_key.insert(key.into_boxed_str(), idx);
        idx
    }

    pub fn get(&self, idx: TypeIdx) -> &Ty {
        &self.types[idx.0 as usize]
    }

    pub fn display(&self, idx: TypeIdx) -> String {
        display(self, idx)
    }

    pub fn unknown(&self) -> TypeIdx {
        self.unknown
    }

    pub fn missing(&self) -> TypeIdx {
        self.missing
    }

    /// Intern a named type (built-in or FQN-qualified); `name` must already
    /// be the final identifier the graph should carry (qualification against
    /// module/package happens in the frontend, before this call).
    pub fn intern_object(&mut self, name: &str, generics: Vec<TypeIdx>) -> TypeIdx {
        let key = if generics.is_empty() {
            name.to_string()
        } else {
            let args: Vec<String> = generics.iter().map(|g| self.display(*g)).collect();
            format!("{name}[{}]", args.join(","))
        };
        self.intern_keyed(
            key,
            Ty::Object(ObjectType {
                name: name.into(),
                generics,
            }),
        )
    }

    pub fn intern_pointer(&mut self, element: TypeIdx, origin: PointerOrigin) -> TypeIdx {
        let prefix = match origin {
            PointerOrigin::Pointer => "*",
            PointerOrigin::Array => "[]",
        };
        let key = format!("{prefix}{}", self.display(element));
        self.intern_keyed(key, Ty::Pointer(PointerType { element, origin }))
    }

    pub fn intern_function(&mut self, params: Vec<TypeIdx>, returns: Vec<TypeIdx>) -> TypeIdx {
        let canonical_name = function_canonical_name(self, &params, &returns);
        let key = canonical_name.clone();
        self.intern_keyed(
            key,
            Ty::Function(crate::types::FunctionType {
                params,
                returns,
                canonical_name: canonical_name.into_boxed_str(),
            }),
        )
    }

    pub fn intern_tuple(&mut self, elements: Vec<TypeIdx>) -> TypeIdx {
        let parts: Vec<String> = elements.iter().map(|e| self.display(*e)).collect();
        let key = format!("({})", parts.join(", "));
        self.intern_keyed(key, Ty::Tuple(crate::types::TupleType { elements }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent_for_equal_objects() {
        let mut reg = TypeRegistry::new();
        let a = reg.intern_object("int", vec![]);
        let b = reg.intern_object("int", vec![]);
        assert_eq!(a, b);
    }

    #[test]
    fn pointer_and_array_origin_are_distinct() {
        let mut reg = TypeRegistry::new();
        let int_ty = reg.intern_object("int", vec![]);
        let ptr = reg.intern_pointer(int_ty, PointerOrigin::Pointer);
        let arr = reg.intern_pointer(int_ty, PointerOrigin::Array);
        assert_ne!(ptr, arr);
        assert_eq!(reg.display(ptr), "*int");
        assert_eq!(reg.display(arr), "[]int");
    }

    #[test]
    fn function_types_equal_iff_canonical_names_equal() {
        let mut reg = TypeRegistry::new();
        let int_ty = reg.intern_object("int", vec![]);
        let string_ty = reg.intern_object("string", vec![]);
        let f1 = reg.intern_function(vec![int_ty], vec![string_ty]);
        let f2 = reg.intern_function(vec![int_ty], vec![string_ty]);
        assert_eq!(f1, f2);
        let f3 = reg.intern_function(vec![string_ty], vec![string_ty]);
        assert_ne!(f1, f3);
    }

    #[test]
    fn map_and_chan_are_generic_objects() {
        let mut reg = TypeRegistry::new();
        let k = reg.intern_object("string", vec![]);
        let v = reg.intern_object("int", vec![]);
        let map_ty = reg.intern_object("map", vec![k, v]);
        assert_eq!(reg.display(map_ty), "map[string,int]");
        let chan_ty = reg.intern_object("chan", vec![v]);
        assert_eq!(reg.display(chan_ty), "chan[int]");
    }

    #[test]
    fn unknown_and_missing_are_stable_singletons() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.unknown(), reg.unknown());
        assert_ne!(reg.unknown(), reg.missing());
    }
}
