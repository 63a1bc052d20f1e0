//! Pass 3 — Variable/Field resolution, plus the post-Pass-3 interface
//! subtyping widening step (`spec.md` §4.4).

use cpg_ir::{NodeId, NodeKind, Ty};
use rustc_hash::FxHashSet;

use crate::pass::{Pass, PassContext};
use crate::passes::util::{self, find_field};

pub struct ResolveReferences;

impl Pass for ResolveReferences {
    fn name(&self) -> &'static str {
        "ResolveReferences"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["ResolveEmbeddedMembers"]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        resolve_declared_references(ctx);
        resolve_members(ctx);
    }
}

/// Every `DeclaredReference` not used as a call's callee (unless it carries
/// a function-pointer type, in which case ordinary value lookup still
/// applies) is resolved through the scope manager. A function-pointer-typed
/// reference that scope lookup can't place is matched instead against
/// enclosing-namespace functions with an equal signature.
fn resolve_declared_references(ctx: &mut PassContext<'_>) {
    let non_function_pointer_callees: FxHashSet<NodeId> = ctx
        .graph
        .node_ids()
        .filter_map(|id| match ctx.graph.kind(id) {
            NodeKind::Call { callee, .. } => Some(*callee),
            _ => None,
        })
        .filter(|&callee| !matches!(ctx.graph.types().get(util::ty_of(ctx.graph, callee)), Ty::Function(_)))
        .collect();

    let refs: Vec<NodeId> = ctx.graph.node_ids().filter(|&id| matches!(ctx.graph.kind(id), NodeKind::DeclaredReference { .. })).collect();
    for reference in refs {
        if ctx.graph.refers_to(reference).is_some() || non_function_pointer_callees.contains(&reference) {
            continue;
        }
        if let Some(target) = ctx.scope.resolve_reference(ctx.graph, reference) {
            ctx.graph.set_refers_to(reference, target);
            continue;
        }
        let ty = util::ty_of(ctx.graph, reference);
        if let Ty::Function(f) = ctx.graph.types().get(ty).clone() {
            let name = ctx.graph.header(reference).name.clone();
            if let Some(&target) = ctx.scope.resolve_function(ctx.graph, &name, None, &f.params).first() {
                ctx.graph.set_refers_to(reference, target);
            }
        }
    }
}

/// Member expressions resolve by walking the base's static-type record for
/// a matching field, falling back to an inferred field when configured to.
/// Bases whose type is still `Unknown` are requeued — each base appears in
/// the queue at most once, and the worklist terminates the first round it
/// makes no further progress, since nothing in this pass narrows a base's
/// type mid-run.
fn resolve_members(ctx: &mut PassContext<'_>) {
    let mut pending: Vec<NodeId> = ctx.graph.node_ids().filter(|&id| matches!(ctx.graph.kind(id), NodeKind::Member { .. })).collect();

    loop {
        if pending.is_empty() {
            return;
        }
        let previous_len = pending.len();
        let mut still_deferred = Vec::new();
        for member in pending {
            if !try_resolve_member(ctx, member) {
                still_deferred.push(member);
            }
        }
        if still_deferred.len() == previous_len {
            for &member in &still_deferred {
                if let NodeKind::Member { member_name, .. } = ctx.graph.kind(member) {
                    ctx.diagnostics.warning(format!("member `{member_name}` has an unresolvable base type"), None);
                }
            }
            return;
        }
        pending = still_deferred;
    }
}

/// Returns `true` once `member` is settled (resolved, inferred, or given
/// up on for a non-record base) and `false` when its base is still
/// `Unknown` and it should stay in the queue.
fn try_resolve_member(ctx: &mut PassContext<'_>, member: NodeId) -> bool {
    let (base, member_name) = match ctx.graph.kind(member) {
        NodeKind::Member { base, member_name, refers_to, .. } if refers_to.is_none() => (*base, member_name.clone()),
        _ => return true,
    };

    let base_ty = util::ty_of(ctx.graph, base);
    if matches!(ctx.graph.types().get(base_ty), Ty::Unknown) {
        return false;
    }

    let Some(record) = util::record_of_ty(ctx.graph, ctx.records, base_ty) else {
        ctx.diagnostics.warning(format!("member `{member_name}` has a non-record base"), None);
        return true;
    };

    let mut visited = FxHashSet::default();
    if let Some(field) = find_field(ctx.graph, ctx.records, record, &member_name, &mut visited) {
        ctx.graph.set_refers_to(member, field);
        return true;
    }

    if ctx.config.infer_unresolved_members {
        let ty = ctx.graph.types().unknown();
        let inferred = ctx.graph.add_node(
            |id| cpg_ir::NodeHeader {
                id,
                name: member_name.clone(),
                location: None,
                comment: None,
                language: cpg_ir::Language::GO,
            },
            NodeKind::Field { ty, embedded: false, is_inferred: true },
        );
        if let NodeKind::Record { fields, .. } = ctx.graph.kind_mut(record) {
            fields.push(inferred);
        }
        ctx.graph.set_refers_to(member, inferred);
    } else {
        ctx.diagnostics.warning(format!("unresolved member `{member_name}`"), None);
    }
    true
}

/// Pass 3.5: for every typed node whose type is an interface with subtypes
/// discovered in Pass 1, widen `possibleSubTypes` by that set.
pub struct WidenInterfaceSubtypes;

impl Pass for WidenInterfaceSubtypes {
    fn name(&self) -> &'static str {
        "WidenInterfaceSubtypes"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["ResolveReferences"]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        let unknown = ctx.graph.types().unknown();
        let missing = ctx.graph.types().missing();
        let typed_nodes: Vec<(NodeId, cpg_ir::TypeIdx)> = ctx
            .graph
            .node_ids()
            .map(|id| (id, util::ty_of(ctx.graph, id)))
            .filter(|&(_, ty)| ty != unknown && ty != missing)
            .collect();

        for (node, ty) in typed_nodes {
            let subtypes = ctx.graph.subtypes_of(ty).to_vec();
            if !subtypes.is_empty() {
                ctx.graph.widen_possible_sub_types(node, &subtypes);
            }
        }
    }
}
