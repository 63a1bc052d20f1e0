//! Scope kinds and the value/structure/global declaration categories that
//! drive where `add_declaration` files a new declaration.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Global,
    /// A namespace/package/record name, deduplicated by FQN across files.
    NameScope,
    Function,
    Block,
    Loop,
    Switch,
    Try,
    Template,
    Record,
    ValueDeclaration,
}

/// Which of a scope's three declaration maps a given declaration node files
/// into, derived from the declaration's `NodeKind`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclCategory {
    Value,
    Structure,
    /// Problem and Include nodes always land in the global scope.
    Global,
}

impl ScopeKind {
    /// Whether a scope of this kind is an eligible destination for a
    /// value declaration reached via "nearest `ValueDeclarationScope`".
    ///
    /// `Record` is deliberately excluded: a method's receiver scope is
    /// entered only while lowering that method, so filing a value
    /// declaration there would make the method invisible to every lookup
    /// that isn't already inside its own receiver scope. Walking past
    /// `Record` lets a method land in the same enclosing scope an ordinary
    /// function does, so it stays reachable by simple name from package
    /// scope (`spec.md`'s "M is also reachable as a value-declaration in
    /// R's enclosing name scope" invariant).
    pub fn accepts_value_declarations(self) -> bool {
        matches!(
            self,
            ScopeKind::Function
                | ScopeKind::Block
                | ScopeKind::Loop
                | ScopeKind::Switch
                | ScopeKind::Try
                | ScopeKind::Template
                | ScopeKind::ValueDeclaration
                | ScopeKind::Global
        )
    }

    /// Whether a scope of this kind is an eligible destination for a
    /// structure declaration reached via "nearest `StructureDeclarationScope`".
    pub fn accepts_structure_declarations(self) -> bool {
        matches!(self, ScopeKind::NameScope | ScopeKind::Global)
    }
}
