//! The assembled graph: node arena plus the out-of-band relations that are
//! allowed to cycle (DFG, `refers-to` widening via `possibleSubTypes`,
//! `implements`, `super-classes`/structural subtyping).

use rustc_hash::FxHashMap;

use crate::arena_id::to_u32;
use crate::node::{NodeHeader, NodeId, NodeKind};
use crate::type_registry::TypeRegistry;
use crate::types::TypeIdx;

struct NodeEntry {
    header: NodeHeader,
    kind: NodeKind,
}

/// The in-memory CPG produced by a run. Nodes are appended and mutated in
/// place; nothing is ever deleted (data-model lifecycle rule).
pub struct Graph {
    nodes: Vec<NodeEntry>,
    types: TypeRegistry,

    /// Forward DFG adjacency: producer -> consumers.
    dfg_forward: FxHashMap<NodeId, Vec<NodeId>>,
    /// Reverse DFG adjacency: consumer -> producers (needed for Pass 5's
    /// backward worklist traversal).
    dfg_backward: FxHashMap<NodeId, Vec<NodeId>>,

    /// Record -> interfaces it structurally implements (Pass 1 output).
    implements: FxHashMap<NodeId, Vec<TypeIdx>>,
    /// Interface type -> struct types discovered to implement it (Pass 1
    /// side index, consumed by the post-Pass-3 widening step).
    subtypes: FxHashMap<TypeIdx, Vec<TypeIdx>>,
    /// Per-node widened `possibleSubTypes` (typed nodes only).
    possible_sub_types: FxHashMap<NodeId, Vec<TypeIdx>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            types: TypeRegistry::new(),
            dfg_forward: FxHashMap::default(),
            dfg_backward: FxHashMap::default(),
            implements: FxHashMap::default(),
            subtypes: FxHashMap::default(),
            possible_sub_types: FxHashMap::default(),
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn add_node(&mut self, header_without_id: impl FnOnce(NodeId) -> NodeHeader, kind: NodeKind) -> NodeId {
        let id = NodeId(to_u32(self.nodes.len(), "Graph"));
        let header = header_without_id(id);
        self.nodes.push(NodeEntry { header, kind });
        id
    }

    pub fn header(&self, id: NodeId) -> &NodeHeader {
        &self.nodes[id.0 as usize].header
    }

    pub fn header_mut(&mut self, id: NodeId) -> &mut NodeHeader {
        &mut self.nodes[id.0 as usize].header
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0 as usize].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0 as usize].kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    pub fn ast_children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).ast_children()
    }

    // ---- refers-to ----

    /// Set the `refersTo` edge on a `DeclaredReference` or `Member` node.
    /// No-op (with a debug assertion) on any other node kind, since only
    /// those two carry a `refers_to` slot.
    pub fn set_refers_to(&mut self, reference: NodeId, target: NodeId) {
        match self.kind_mut(reference) {
            NodeKind::DeclaredReference { refers_to, .. } | NodeKind::Member { refers_to, .. } => {
                *refers_to = Some(target);
            }
            other => debug_assert!(false, "set_refers_to on non-reference node: {other:?}"),
        }
    }

    pub fn refers_to(&self, reference: NodeId) -> Option<NodeId> {
        match self.kind(reference) {
            NodeKind::DeclaredReference { refers_to, .. } | NodeKind::Member { refers_to, .. } => *refers_to,
            _ => None,
        }
    }

    // ---- DFG ----

    pub fn add_dfg_edge(&mut self, from: NodeId, to: NodeId) {
        let fwd = self.dfg_forward.entry(from).or_default();
        if !fwd.contains(&to) {
            fwd.push(to);
        }
        let bwd = self.dfg_backward.entry(to).or_default();
        if !bwd.contains(&from) {
            bwd.push(from);
        }
    }

    pub fn dfg_successors(&self, node: NodeId) -> &[NodeId] {
        self.dfg_forward.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn dfg_predecessors(&self, node: NodeId) -> &[NodeId] {
        self.dfg_backward.get(&node).map_or(&[], Vec::as_slice)
    }

    // ---- implements / subtypes ----

    pub fn add_implements(&mut self, record: NodeId, interface_ty: TypeIdx) {
        let v = self.implements.entry(record).or_default();
        if !v.contains(&interface_ty) {
            v.push(interface_ty);
        }
        if let NodeKind::Record { implemented_interfaces, .. } = self.kind_mut(record) {
            if !implemented_interfaces.contains(&interface_ty) {
                implemented_interfaces.push(interface_ty);
            }
        }
    }

    pub fn implemented_interfaces(&self, record: NodeId) -> &[TypeIdx] {
        self.implements.get(&record).map_or(&[], Vec::as_slice)
    }

    pub fn add_subtype(&mut self, interface_ty: TypeIdx, struct_ty: TypeIdx) {
        let v = self.subtypes.entry(interface_ty).or_default();
        if !v.contains(&struct_ty) {
            v.push(struct_ty);
        }
    }

    pub fn subtypes_of(&self, interface_ty: TypeIdx) -> &[TypeIdx] {
        self.subtypes.get(&interface_ty).map_or(&[], Vec::as_slice)
    }

    pub fn widen_possible_sub_types(&mut self, node: NodeId, additions: &[TypeIdx]) {
        let v = self.possible_sub_types.entry(node).or_default();
        for t in additions {
            if !v.contains(t) {
                v.push(*t);
            }
        }
    }

    pub fn possible_sub_types(&self, node: NodeId) -> &[TypeIdx] {
        self.possible_sub_types.get(&node).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Language, LiteralValue};

    fn push_literal(graph: &mut Graph, name: &str) -> NodeId {
        let ty = graph.types_mut().unknown();
        graph.add_node(
            |id| NodeHeader {
                id,
                name: name.to_string(),
                location: None,
                comment: None,
                language: Language::GO,
            },
            NodeKind::Literal { ty, value: LiteralValue::Int(1) },
        )
    }

    #[test]
    fn dfg_edges_are_bidirectionally_indexed_and_deduped() {
        let mut graph = Graph::new();
        let a = push_literal(&mut graph, "a");
        let b = push_literal(&mut graph, "b");
        graph.add_dfg_edge(a, b);
        graph.add_dfg_edge(a, b);
        assert_eq!(graph.dfg_successors(a), &[b]);
        assert_eq!(graph.dfg_predecessors(b), &[a]);
    }

    #[test]
    fn dfg_cycles_are_representable() {
        let mut graph = Graph::new();
        let a = push_literal(&mut graph, "a");
        let b = push_literal(&mut graph, "b");
        graph.add_dfg_edge(a, b);
        graph.add_dfg_edge(b, a);
        assert_eq!(graph.dfg_successors(a), &[b]);
        assert_eq!(graph.dfg_successors(b), &[a]);
    }

    #[test]
    fn implements_and_subtypes_are_reciprocal_indices() {
        use crate::node::RecordKind;

        let mut graph = Graph::new();
        let record = graph.add_node(
            |id| NodeHeader {
                id,
                name: "S".to_string(),
                location: None,
                comment: None,
                language: Language::GO,
            },
            NodeKind::Record {
                kind: RecordKind::Struct,
                fields: vec![],
                methods: vec![],
                super_types: vec![],
                implemented_interfaces: vec![],
                alias_target: None,
                is_inferred: false,
            },
        );
        let iface_ty = graph.types_mut().intern_object("I", vec![]);
        let struct_ty = graph.types_mut().intern_object("S", vec![]);
        graph.add_implements(record, iface_ty);
        graph.add_subtype(iface_ty, struct_ty);
        assert_eq!(graph.implemented_interfaces(record), &[iface_ty]);
        assert_eq!(graph.subtypes_of(iface_ty), &[struct_ty]);
        match graph.kind(record) {
            NodeKind::Record { implemented_interfaces, .. } => {
                assert_eq!(implemented_interfaces, &[iface_ty]);
            }
            _ => unreachable!(),
        }
    }
}
