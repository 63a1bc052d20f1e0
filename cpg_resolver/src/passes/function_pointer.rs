//! Pass 5 — FunctionPointerCall (`spec.md` §4.4): bind a call through a
//! function-pointer value by walking the DFG backward from the callee to
//! whatever function declarations feed it, abandoning the bind above the
//! configured ambiguity cap.

use cpg_ir::{NodeId, NodeKind, Ty};
use rustc_hash::FxHashSet;

use crate::pass::{Pass, PassContext};
use crate::passes::util;

pub struct ResolveFunctionPointerCalls;

impl Pass for ResolveFunctionPointerCalls {
    fn name(&self) -> &'static str {
        "FunctionPointerCall"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["InitializerListDfg"]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        let calls: Vec<NodeId> = ctx.graph.node_ids().filter(|&id| matches!(ctx.graph.kind(id), NodeKind::Call { .. })).collect();

        for call in calls {
            let (callee, args) = match ctx.graph.kind(call) {
                NodeKind::Call { callee, args, .. } => (*callee, args.clone()),
                _ => continue,
            };

            if resolves_directly_to_a_function(ctx, callee) {
                continue;
            }

            let callee_ty = util::ty_of(ctx.graph, callee);
            if !matches!(ctx.graph.types().get(callee_ty), Ty::Function(_)) {
                continue;
            }

            let candidates = backward_function_candidates(ctx, callee, callee_ty);
            if candidates.len() > ctx.config.function_pointer_ambiguity_cap {
                ctx.diagnostics.warning(
                    format!("function-pointer call has {} candidates, above the ambiguity cap of {}; leaving unbound", candidates.len(), ctx.config.function_pointer_ambiguity_cap),
                    None,
                );
                continue;
            }
            if candidates.is_empty() {
                continue;
            }

            if let NodeKind::Call { invokes, .. } = ctx.graph.kind_mut(call) {
                *invokes = candidates.clone();
            }

            for &function in &candidates {
                if let NodeKind::Function { params, .. } = ctx.graph.kind(function) {
                    let params = params.clone();
                    for (&param, &arg) in params.iter().zip(args.iter()) {
                        ctx.graph.add_dfg_edge(arg, param);
                    }
                }
                ctx.graph.add_dfg_edge(function, call);
            }
        }
    }
}

/// A callee that already refers straight to a `Function` declaration (an
/// ordinary named call) needs no pointer-binding work here.
fn resolves_directly_to_a_function(ctx: &PassContext<'_>, callee: NodeId) -> bool {
    matches!(ctx.graph.refers_to(callee), Some(target) if ctx.graph.kind(target).is_function())
}

/// Backward DFG worklist from `callee`, collecting every `Function`
/// declaration reachable (through `DeclaredReference`s that refer to one)
/// whose type equals `pointer_ty`.
fn backward_function_candidates(ctx: &PassContext<'_>, callee: NodeId, pointer_ty: cpg_ir::TypeIdx) -> Vec<NodeId> {
    let mut visited = FxHashSet::default();
    let mut worklist = vec![callee];
    let mut candidates = Vec::new();

    while let Some(node) = worklist.pop() {
        if !visited.insert(node) {
            continue;
        }
        match ctx.graph.kind(node) {
            NodeKind::Function { ty, .. } if *ty == pointer_ty => {
                if !candidates.contains(&node) {
                    candidates.push(node);
                }
            }
            NodeKind::DeclaredReference { refers_to: Some(target), .. } => {
                worklist.push(*target);
            }
            _ => {}
        }
        worklist.extend(ctx.graph.dfg_predecessors(node));
    }

    candidates
}
