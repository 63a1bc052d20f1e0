//! Pass 2 — ResolveEmbeddedMembers (`spec.md` §4.4): when a member-call's
//! base record has no matching method but does have an embedded field
//! whose type does, rewrite the call's base to go through that field.

use cpg_ir::{NodeId, NodeKind, TypeIdx};
use rustc_hash::FxHashSet;

use crate::pass::{Pass, PassContext};
use crate::passes::util::{record_of_ty, static_record};

pub struct ResolveEmbeddedMembers;

impl Pass for ResolveEmbeddedMembers {
    fn name(&self) -> &'static str {
        "ResolveEmbeddedMembers"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["ResolveInterfaceImplementations"]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        let member_calls: Vec<NodeId> = ctx
            .graph
            .node_ids()
            .filter(|&id| matches!(ctx.graph.kind(id), NodeKind::MemberCall { .. }))
            .collect();

        for call in member_calls {
            let (base, method_name) = match ctx.graph.kind(call) {
                NodeKind::MemberCall { base, method_name, .. } => (*base, method_name.clone()),
                _ => continue,
            };
            let Some(record) = static_record(ctx.graph, ctx.records, base) else { continue };
            if has_method(ctx.graph, record, &method_name) {
                continue;
            }
            let mut visited = FxHashSet::default();
            if let Some(embedded_field) = find_embedding_with_method(ctx, record, &method_name, &mut visited) {
                if let NodeKind::MemberCall { base: base_slot, .. } = ctx.graph.kind_mut(call) {
                    *base_slot = embedded_field;
                }
            }
        }
    }
}

fn has_method(graph: &cpg_ir::Graph, record: NodeId, name: &str) -> bool {
    matches!(graph.kind(record), NodeKind::Record { methods, .. } if methods.iter().any(|&m| graph.header(m).name == name))
}

/// Depth-first search over the record's embedded fields for one whose
/// (pointer-stripped) type has a method named `name`. Returns the *field*
/// node the call's base should be rewritten to (`base.embedded`), per the
/// "rewrite the call's base as `base.embedded`" contract.
fn find_embedding_with_method(ctx: &PassContext<'_>, record: NodeId, name: &str, visited: &mut FxHashSet<NodeId>) -> Option<NodeId> {
    if !visited.insert(record) {
        return None;
    }
    let NodeKind::Record { fields, .. } = ctx.graph.kind(record) else { return None };
    for &field in fields {
        let NodeKind::Field { ty, embedded, .. } = ctx.graph.kind(field) else { continue };
        if !embedded {
            continue;
        }
        let field_ty: TypeIdx = *ty;
        let Some(embedded_record) = record_of_ty(ctx.graph, ctx.records, field_ty) else { continue };
        if has_method(ctx.graph, embedded_record, name) {
            return Some(field);
        }
        if find_embedding_with_method(ctx, embedded_record, name, visited).is_some() {
            return Some(field);
        }
    }
    None
}
