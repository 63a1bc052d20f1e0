//! String interner backing [`crate::Name`].

use rustc_hash::FxHashMap;

use crate::arena_id::to_u32;
use crate::name::Name;

/// Interns simple identifier strings into compact [`Name`] handles.
///
/// One interner per project run, owned by the frontend's per-project driver
/// and shared (by reference) with the scope manager and resolver, which only
/// ever read it back via [`StringInterner::resolve`].
#[derive(Clone, Debug, Default)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    by_value: FxHashMap<Box<str>, Name>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut this = Self::default();
        let empty = this.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        this
    }

    /// Intern `s`, returning the existing handle if already present.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(name) = self.by_value.get(s) {
            return *name;
        }
        let id = Name::from_raw(to_u32(self.strings.len(), "StringInterner"));
        let boxed: Box<str> = s.into();
        self.by_value.insert(boxed.clone(), id);
        self.strings.push(boxed);
        id
    }

    /// Resolve a previously interned handle back to its string.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut interner = StringInterner::new();
        let a = interner.intern("MyStruct");
        let b = interner.intern("MyStruct");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "MyStruct");
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut interner = StringInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_string_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.resolve(Name::EMPTY), "");
    }
}
