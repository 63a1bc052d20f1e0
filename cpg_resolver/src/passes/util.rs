//! Shared helpers used by more than one pass.

use cpg_ir::{Graph, NodeId, NodeKind, PointerOrigin, Ty, TypeIdx};

use crate::pass::RecordIndex;

/// A node's static type, read from whichever field the node kind carries
/// one in. `Unknown` for node kinds with no type slot at all.
pub(crate) fn ty_of(graph: &Graph, node: NodeId) -> TypeIdx {
    match graph.kind(node) {
        NodeKind::Literal { ty, .. }
        | NodeKind::DeclaredReference { ty, .. }
        | NodeKind::Member { ty, .. }
        | NodeKind::MemberCall { ty, .. }
        | NodeKind::Call { ty, .. }
        | NodeKind::Binary { ty, .. }
        | NodeKind::Unary { ty, .. }
        | NodeKind::Construct { ty, .. }
        | NodeKind::InitializerList { ty, .. }
        | NodeKind::Variable { ty, .. }
        | NodeKind::ParamVariable { ty }
        | NodeKind::Field { ty, .. } => *ty,
        NodeKind::Cast { cast_type, .. } => *cast_type,
        NodeKind::TypeAssert { asserted_type, .. } => *asserted_type,
        NodeKind::New { target_type, .. } => *target_type,
        NodeKind::ArrayCreation { element_type, .. } => *element_type,
        _ => graph.types().unknown(),
    }
}

/// Strip at most one level of pointer indirection, so `*Widget` and
/// `Widget` both resolve to the `Widget` record.
fn strip_pointer(graph: &Graph, ty: TypeIdx) -> TypeIdx {
    match graph.types().get(ty) {
        Ty::Pointer(p) if p.origin == PointerOrigin::Pointer => p.element,
        _ => ty,
    }
}

/// The record declaration that `ty` (or `*ty`) names, if any.
pub(crate) fn record_of_ty(graph: &Graph, records: &RecordIndex, ty: TypeIdx) -> Option<NodeId> {
    records.record_of(strip_pointer(graph, ty))
}

/// The record a node's static type points at.
pub(crate) fn static_record(graph: &Graph, records: &RecordIndex, node: NodeId) -> Option<NodeId> {
    record_of_ty(graph, records, ty_of(graph, node))
}

/// Walk `record`'s own fields, then its embedded super-types' fields
/// transitively, for a field named `name`. `visited` guards against an
/// embedding cycle.
pub(crate) fn find_field(graph: &Graph, records: &RecordIndex, record: NodeId, name: &str, visited: &mut rustc_hash::FxHashSet<NodeId>) -> Option<NodeId> {
    if !visited.insert(record) {
        return None;
    }
    let NodeKind::Record { fields, super_types, .. } = graph.kind(record) else { return None };
    if let Some(&field) = fields.iter().find(|&&f| graph.header(f).name == name) {
        return Some(field);
    }
    for &super_ty in super_types.clone().iter() {
        if let Some(super_record) = record_of_ty(graph, records, super_ty) {
            if let Some(found) = find_field(graph, records, super_record, name, visited) {
                return Some(found);
            }
        }
    }
    None
}
