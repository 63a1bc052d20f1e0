//! Pass 4 — InitializerList DFG (`spec.md` §4.4): a composite literal's
//! `key: value` pairs with a literal string key matching a field name get a
//! DFG edge from `value` to that field's definition.

use cpg_ir::{LiteralValue, NodeId, NodeKind};
use rustc_hash::FxHashSet;

use crate::pass::{Pass, PassContext};
use crate::passes::util::{find_field, record_of_ty};

pub struct InitializerListDfg;

impl Pass for InitializerListDfg {
    fn name(&self) -> &'static str {
        "InitializerListDfg"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["ResolveReferences"]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        let lists: Vec<NodeId> = ctx.graph.node_ids().filter(|&id| matches!(ctx.graph.kind(id), NodeKind::InitializerList { .. })).collect();

        for list in lists {
            let (ty, elements) = match ctx.graph.kind(list) {
                NodeKind::InitializerList { ty, elements } => (*ty, elements.clone()),
                _ => continue,
            };
            let Some(record) = record_of_ty(ctx.graph, ctx.records, ty) else { continue };

            for element in elements {
                let (key, value) = match ctx.graph.kind(element) {
                    NodeKind::KeyValue { key, value } => (*key, *value),
                    _ => continue,
                };
                let field_name = match ctx.graph.kind(key) {
                    NodeKind::Literal { value: LiteralValue::Str(s), .. } => s.clone(),
                    _ => continue,
                };
                let mut visited = FxHashSet::default();
                if let Some(field) = find_field(ctx.graph, ctx.records, record, &field_name, &mut visited) {
                    ctx.graph.add_dfg_edge(value, field);
                }
            }
        }
    }
}
