//! The scope manager: a persistent tree of [`Scope`]s plus a cursor
//! (`current`) that `enter_scope`/`leave_scope` move up and down it.
//! Scopes are never discarded — `enter_scope` reactivates an existing scope
//! for a node (or, for `NameScope`s, for a matching FQN) rather than
//! creating a sibling, which is what lets a package's scope be shared
//! across every file that declares into it.

use cpg_diagnostic::DiagnosticBag;
use cpg_ir::{Graph, Name, NodeId, NodeKind, Ty, TypeIdx};
use rustc_hash::FxHashMap;

use crate::kind::{DeclCategory, ScopeKind};
use crate::scope::{Scope, ScopeId};

pub struct ScopeManager {
    scopes: Vec<Scope>,
    global: ScopeId,
    current: ScopeId,
    node_to_scope: FxHashMap<NodeId, ScopeId>,
    name_scope_by_fqn: FxHashMap<String, ScopeId>,
    /// Scopes entered since the last `reset_to_global`, innermost last, so
    /// `leave_scope` can assert it is unwinding the correct one.
    stack: Vec<(NodeId, ScopeId)>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    pub fn new() -> Self {
        let global_scope = Scope::new(ScopeKind::Global, None, None, None);
        ScopeManager {
            scopes: vec![global_scope],
            global: ScopeId(0),
            current: ScopeId(0),
            node_to_scope: FxHashMap::default(),
            name_scope_by_fqn: FxHashMap::default(),
            stack: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0 as usize].parent
    }

    /// Enter the scope for `node`, reactivating a previously-created one
    /// when it exists. For `NameScope`s with a given `fqn`, reactivation is
    /// keyed by FQN rather than node identity, per the key invariant: a
    /// `NameScope` with a given FQN exists at most once per manager.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn enter_scope(&mut self, node: NodeId, kind: ScopeKind, fqn: Option<String>) -> ScopeId {
        if kind == ScopeKind::NameScope {
            if let Some(f) = fqn.as_deref() {
                if let Some(&existing) = self.name_scope_by_fqn.get(f) {
                    self.node_to_scope.insert(node, existing);
                    self.stack.push((node, existing));
                    self.current = existing;
                    return existing;
                }
            }
        } else if let Some(&existing) = self.node_to_scope.get(&node) {
            self.stack.push((node, existing));
            self.current = existing;
            return existing;
        }

        let parent = self.current;
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(parent), Some(node), fqn.clone()));
        self.scopes[parent.0 as usize].children.push(id);
        self.node_to_scope.insert(node, id);
        if kind == ScopeKind::NameScope {
            if let Some(f) = fqn {
                self.name_scope_by_fqn.insert(f, id);
            }
        }
        self.stack.push((node, id));
        self.current = id;
        id
    }

    /// Leave the innermost entered scope. A leave for a node that is not
    /// the innermost entered scope (or when nothing is entered) is a no-op,
    /// logged as a warning rather than a panic.
    pub fn leave_scope(&mut self, node: NodeId, diagnostics: &mut DiagnosticBag) {
        match self.stack.last() {
            Some(&(innermost, _)) if innermost == node => {
                let (_, id) = self.stack.pop().expect("checked non-empty above");
                self.current = self.parent_of(id).unwrap_or(self.global);
            }
            _ => {
                diagnostics.warning(
                    format!("leave_scope called for a node that is not the innermost scope: {node:?}"),
                    None,
                );
            }
        }
    }

    /// Reattach the global scope to `translation_unit` and make it current,
    /// clearing any dangling per-file entry stack.
    pub fn reset_to_global(&mut self, translation_unit: NodeId) {
        self.node_to_scope.insert(translation_unit, self.global);
        self.current = self.global;
        self.stack.clear();
    }

    fn nearest(&self, mut predicate: impl FnMut(ScopeKind) -> bool) -> ScopeId {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            if predicate(self.scopes[id.0 as usize].kind) {
                return id;
            }
            cursor = self.parent_of(id);
        }
        self.global
    }

    fn category_of(kind: &NodeKind) -> DeclCategory {
        match kind {
            NodeKind::Variable { .. } | NodeKind::ParamVariable { .. } | NodeKind::Function { .. } | NodeKind::Field { .. } => {
                DeclCategory::Value
            }
            NodeKind::Record { .. } | NodeKind::Namespace { .. } => DeclCategory::Structure,
            NodeKind::Problem { .. } | NodeKind::Include { .. } => DeclCategory::Global,
            other => {
                debug_assert!(false, "add_declaration called with a non-declaration node: {other:?}");
                DeclCategory::Value
            }
        }
    }

    /// File `decl` into the nearest eligible scope's lookup map, and, when
    /// `add_to_ast` is true, also append it to the owning AST node's
    /// matching child list.
    ///
    /// The AST-attachment parent is found separately from the
    /// value/structure filing target: a method is filed as a value
    /// declaration in its enclosing package scope (see
    /// [`ScopeKind::accepts_value_declarations`]) but still attaches to its
    /// receiver record's own `methods` list, so the two walks can land on
    /// different scopes for the same declaration.
    pub fn add_declaration(&mut self, graph: &mut Graph, decl: NodeId, add_to_ast: bool) {
        let simple_name = graph.header(decl).name.clone();
        let category = Self::category_of(graph.kind(decl));

        let target = match category {
            DeclCategory::Global => self.global,
            DeclCategory::Value => self.nearest(ScopeKind::accepts_value_declarations),
            DeclCategory::Structure => self.nearest(ScopeKind::accepts_structure_declarations),
        };

        match category {
            DeclCategory::Value => {
                self.scopes[target.0 as usize]
                    .value_declarations
                    .entry(simple_name)
                    .or_default()
                    .push(decl);
            }
            DeclCategory::Structure | DeclCategory::Global => {
                self.scopes[target.0 as usize].structure_declarations.insert(simple_name, decl);
            }
        }

        if add_to_ast {
            // A method (a `Function` with a receiver) attaches to its
            // receiver record's own `methods` list even though it files as
            // a value declaration past `Record`, in the enclosing package
            // scope. Anything else (locals, params, plain functions) uses
            // the value/structure target computed above, even while lexically
            // nested inside a method body whose ancestor chain passes
            // through that same Record scope.
            let is_method = matches!(graph.kind(decl), NodeKind::Function { receiver: Some(_), .. });
            let attach_target = if is_method {
                let record_scope = self.nearest(|k| matches!(k, ScopeKind::Record));
                if self.scope(record_scope).kind == ScopeKind::Record { record_scope } else { target }
            } else {
                target
            };
            if let Some(parent) = self.scopes[attach_target.0 as usize].ast_node {
                attach_ast_child(graph, parent, decl);
            }
        }
    }

    /// Resolve a `DeclaredReference` to at most one value declaration,
    /// walking outward from `current`. When the reference's type is a
    /// function-pointer type, candidates are narrowed to functions whose
    /// interned type equals the reference's (parameter/return types are
    /// compared structurally by the type registry at intern time, so type
    /// equality already is signature equality).
    pub fn resolve_reference(&self, graph: &Graph, reference: NodeId) -> Option<NodeId> {
        let (simple_name, ref_ty) = match graph.kind(reference) {
            NodeKind::DeclaredReference { ty, .. } => (graph.header(reference).name.clone(), *ty),
            _ => return None,
        };
        let is_function_pointer = matches!(graph.types().get(ref_ty), Ty::Function(_));

        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            if let Some(candidates) = self.scopes[id.0 as usize].value_declarations.get(&simple_name) {
                if is_function_pointer {
                    for &cand in candidates {
                        if let NodeKind::Function { ty, .. } = graph.kind(cand) {
                            if *ty == ref_ty {
                                return Some(cand);
                            }
                        }
                    }
                } else if let Some(&first) = candidates.first() {
                    return Some(first);
                }
            }
            cursor = self.parent_of(id);
        }
        None
    }

    /// Resolve a call's callee to every matching function declaration. When
    /// `namespace_fqn` is given, jump straight into that `NameScope` (or
    /// `current` when the namespace is unknown); otherwise walk outward
    /// from `current`. Stops at the first scope with any same-named
    /// candidate and returns the subset matching `arg_types` element-wise
    /// (an overload set does not bleed across scope levels).
    pub fn resolve_function(&self, graph: &Graph, simple_name: &str, namespace_fqn: Option<&str>, arg_types: &[TypeIdx]) -> Vec<NodeId> {
        let start = match namespace_fqn {
            Some(fqn) => self.name_scope_by_fqn.get(fqn).copied().unwrap_or(self.current),
            None => self.current,
        };

        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if let Some(candidates) = self.scopes[id.0 as usize].value_declarations.get(simple_name) {
                let matches: Vec<NodeId> = candidates
                    .iter()
                    .copied()
                    .filter(|&cand| match graph.kind(cand) {
                        NodeKind::Function { ty, .. } => match graph.types().get(*ty) {
                            Ty::Function(f) => f.params == arg_types,
                            _ => false,
                        },
                        _ => false,
                    })
                    .collect();
                if !matches.is_empty() || !candidates.is_empty() {
                    return matches;
                }
            }
            cursor = self.parent_of(id);
        }
        Vec::new()
    }

    /// Walk outward from `scope` for a `Record` declaration named `name`.
    pub fn get_record_for_name(&self, graph: &Graph, scope: ScopeId, name: &str) -> Option<NodeId> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            if let Some(&node) = self.scopes[id.0 as usize].structure_declarations.get(name) {
                if graph.kind(node).is_record() {
                    return Some(node);
                }
            }
            cursor = self.parent_of(id);
        }
        None
    }

    /// Merge another manager's `NameScope`s into this one by FQN, folding
    /// foreign declarations and typedefs into the local scope. Used when
    /// per-file scope managers are combined into one project-wide manager;
    /// the project driver instead shares a single manager across files and
    /// relies on `enter_scope`'s FQN reactivation, so this mainly serves
    /// callers that parallelized Phase A across files.
    pub fn merge_from(&mut self, other: &ScopeManager) {
        for (fqn, &foreign_id) in &other.name_scope_by_fqn {
            let foreign = &other.scopes[foreign_id.0 as usize];
            let local_id = *self
                .name_scope_by_fqn
                .entry(fqn.clone())
                .or_insert_with(|| {
                    let id = ScopeId(self.scopes.len() as u32);
                    self.scopes.push(Scope::new(ScopeKind::NameScope, Some(self.global), foreign.ast_node, Some(fqn.clone())));
                    self.scopes[self.global.0 as usize].children.push(id);
                    id
                });

            let local = &mut self.scopes[local_id.0 as usize];
            for (name, decls) in &foreign.value_declarations {
                local.value_declarations.entry(name.clone()).or_default().extend(decls.iter().copied());
            }
            for (name, &decl) in &foreign.structure_declarations {
                local.structure_declarations.entry(name.clone()).or_insert(decl);
            }
            for (name, &ty) in &foreign.typedefs {
                local.typedefs.entry(name.clone()).or_insert(ty);
            }
        }
    }

    /// The AST node of the already-registered `NameScope` for `fqn`, if one
    /// exists — lets a caller reuse one canonical namespace node per
    /// package across the files that declare into it, instead of creating
    /// a fresh node (and orphaning it) on every file.
    pub fn name_scope_ast_node(&self, fqn: &str) -> Option<NodeId> {
        let id = *self.name_scope_by_fqn.get(fqn)?;
        self.scopes[id.0 as usize].ast_node
    }

    pub fn add_typedef(&mut self, scope: ScopeId, name: Name, ty: TypeIdx, reg: &cpg_ir::StringInterner) {
        let key = reg.resolve(name).to_string();
        self.scopes[scope.0 as usize].typedefs.insert(key, ty);
    }
}

fn attach_ast_child(graph: &mut Graph, parent: NodeId, child: NodeId) {
    let child_is_include = matches!(graph.kind(child), NodeKind::Include { .. });
    let child_is_namespace = matches!(graph.kind(child), NodeKind::Namespace { .. });
    let child_is_method = matches!(graph.kind(child), NodeKind::Function { receiver: Some(_), .. });

    match graph.kind_mut(parent) {
        NodeKind::TranslationUnit { namespaces, includes } => {
            if child_is_include {
                includes.push(child);
            } else if child_is_namespace {
                namespaces.push(child);
            }
        }
        NodeKind::Namespace { declarations } => declarations.push(child),
        NodeKind::Record { fields, methods, .. } => {
            if child_is_method {
                methods.push(child);
            } else {
                fields.push(child);
            }
        }
        NodeKind::Function { params, .. } => params.push(child),
        NodeKind::Compound { statements } => statements.push(child),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use cpg_ir::{Language, NodeHeader};

    use super::*;

    fn push_node(graph: &mut Graph, name: &str, kind: NodeKind) -> NodeId {
        graph.add_node(
            |id| NodeHeader {
                id,
                name: name.to_string(),
                location: None,
                comment: None,
                language: Language::GO,
            },
            kind,
        )
    }

    #[test]
    fn name_scope_is_reactivated_by_fqn_not_node_identity() {
        let mut mgr = ScopeManager::new();
        let mut graph = Graph::new();
        let ns_file_a = push_node(&mut graph, "pkg", NodeKind::Namespace { declarations: vec![] });
        let ns_file_b = push_node(&mut graph, "pkg", NodeKind::Namespace { declarations: vec![] });

        let first = mgr.enter_scope(ns_file_a, ScopeKind::NameScope, Some("pkg".to_string()));
        let mut diags = DiagnosticBag::new();
        mgr.leave_scope(ns_file_a, &mut diags);
        mgr.reset_to_global(ns_file_a);

        let second = mgr.enter_scope(ns_file_b, ScopeKind::NameScope, Some("pkg".to_string()));
        assert_eq!(first, second, "same FQN must reactivate the existing NameScope");
        assert!(diags.is_empty());
    }

    #[test]
    fn leave_scope_on_wrong_node_is_a_logged_no_op() {
        let mut mgr = ScopeManager::new();
        let mut graph = Graph::new();
        let node = push_node(&mut graph, "f", NodeKind::Compound { statements: vec![] });
        let other = push_node(&mut graph, "g", NodeKind::Compound { statements: vec![] });
        mgr.enter_scope(node, ScopeKind::Function, None);
        let mut diags = DiagnosticBag::new();
        mgr.leave_scope(other, &mut diags);
        assert!(!diags.is_empty());
        assert_ne!(mgr.current(), mgr.global());
    }

    #[test]
    fn add_declaration_files_value_decl_into_nearest_function_scope() {
        let mut mgr = ScopeManager::new();
        let mut graph = Graph::new();
        let func_node = push_node(
            &mut graph,
            "DoThing",
            NodeKind::Function {
                params: vec![],
                receiver: None,
                return_types: vec![],
                body: None,
                ty: graph.types().unknown(),
                is_inferred: false,
            },
        );
        mgr.enter_scope(func_node, ScopeKind::Function, None);

        let ty = graph.types_mut().unknown();
        let var = push_node(&mut graph, "x", NodeKind::Variable { ty, initializer: None });
        mgr.add_declaration(&mut graph, var, false);

        let reference = push_node(&mut graph, "x", NodeKind::DeclaredReference { ty, fqn: None, refers_to: None });
        assert_eq!(mgr.resolve_reference(&graph, reference), Some(var));
    }

    #[test]
    fn get_record_for_name_walks_outward_past_non_record_shadowing() {
        let mut mgr = ScopeManager::new();
        let mut graph = Graph::new();
        let record = push_node(
            &mut graph,
            "S",
            NodeKind::Record {
                kind: cpg_ir::RecordKind::Struct,
                fields: vec![],
                methods: vec![],
                super_types: vec![],
                implemented_interfaces: vec![],
                alias_target: None,
                is_inferred: false,
            },
        );
        mgr.add_declaration(&mut graph, record, false);

        let func_node = push_node(
            &mut graph,
            "f",
            NodeKind::Function {
                params: vec![],
                receiver: None,
                return_types: vec![],
                body: None,
                ty: graph.types().unknown(),
                is_inferred: false,
            },
        );
        mgr.enter_scope(func_node, ScopeKind::Function, None);

        assert_eq!(mgr.get_record_for_name(&graph, mgr.current(), "S"), Some(record));
    }
}
