//! A single scope node: parent/children pointers, the AST node it mirrors,
//! and its three declaration maps.

use cpg_ir::{NodeId, TypeIdx};
use rustc_hash::FxHashMap;

use crate::kind::ScopeKind;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(pub(crate) u32);

#[derive(Clone, Debug)]
pub struct Scope {
    pub(crate) kind: ScopeKind,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: Vec<ScopeId>,
    pub(crate) ast_node: Option<NodeId>,
    pub(crate) fqn: Option<String>,
    pub(crate) value_declarations: FxHashMap<String, Vec<NodeId>>,
    pub(crate) structure_declarations: FxHashMap<String, NodeId>,
    pub(crate) typedefs: FxHashMap<String, TypeIdx>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, parent: Option<ScopeId>, ast_node: Option<NodeId>, fqn: Option<String>) -> Self {
        Scope {
            kind,
            parent,
            children: Vec::new(),
            ast_node,
            fqn,
            value_declarations: FxHashMap::default(),
            structure_declarations: FxHashMap::default(),
            typedefs: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn fqn(&self) -> Option<&str> {
        self.fqn.as_deref()
    }

    pub fn ast_node(&self) -> Option<NodeId> {
        self.ast_node
    }
}
