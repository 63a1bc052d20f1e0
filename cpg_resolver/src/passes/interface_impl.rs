//! Pass 1 — ResolveInterfaceImplementations (`spec.md` §4.4).

use cpg_ir::{NodeId, NodeKind, RecordKind, TypeIdx};
use rustc_hash::FxHashSet;

use crate::pass::{Pass, PassContext};

pub struct ResolveInterfaceImplementations;

impl Pass for ResolveInterfaceImplementations {
    fn name(&self) -> &'static str {
        "ResolveInterfaceImplementations"
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) {
        let record_ids: Vec<NodeId> = ctx.graph.node_ids().filter(|&id| ctx.graph.kind(id).is_record()).collect();
        let interfaces: Vec<NodeId> = record_ids
            .iter()
            .copied()
            .filter(|&id| matches!(ctx.graph.kind(id), NodeKind::Record { kind: RecordKind::Interface, .. }))
            .collect();
        let structs: Vec<NodeId> = record_ids
            .iter()
            .copied()
            .filter(|&id| matches!(ctx.graph.kind(id), NodeKind::Record { kind: RecordKind::Struct, .. }))
            .collect();

        for &iface in &interfaces {
            let Some(iface_ty) = ctx.records.type_of(iface) else { continue };
            let mut visited = FxHashSet::default();
            let required = required_signatures(ctx, iface, &mut visited);
            if required.is_empty() {
                continue;
            }

            for &st in &structs {
                let Some(struct_ty) = ctx.records.type_of(st) else { continue };
                let matched = required.iter().filter(|(name, ty)| has_matching_method(ctx, st, name, *ty)).count();
                if matched == required.len() {
                    ctx.graph.add_implements(st, iface_ty);
                    ctx.graph.add_subtype(iface_ty, struct_ty);
                }
            }
        }
    }
}

/// The interface's own method signatures plus, transitively, those of
/// every interface it embeds. `visited` guards against an embedding cycle
/// re-entering the same interface.
fn required_signatures(ctx: &PassContext<'_>, iface: NodeId, visited: &mut FxHashSet<NodeId>) -> Vec<(String, TypeIdx)> {
    if !visited.insert(iface) {
        return Vec::new();
    }
    let NodeKind::Record { methods, super_types, .. } = ctx.graph.kind(iface) else { return Vec::new() };

    let mut sigs: Vec<(String, TypeIdx)> = methods
        .iter()
        .map(|&m| {
            let name = ctx.graph.header(m).name.clone();
            let ty = match ctx.graph.kind(m) {
                NodeKind::Function { ty, .. } => *ty,
                _ => ctx.graph.types().unknown(),
            };
            (name, ty)
        })
        .collect();

    for &super_ty in super_types.clone().iter() {
        if let Some(embedded) = ctx.records.record_of(super_ty) {
            sigs.extend(required_signatures(ctx, embedded, visited));
        }
    }
    sigs
}

fn has_matching_method(ctx: &PassContext<'_>, record: NodeId, name: &str, ty: TypeIdx) -> bool {
    let NodeKind::Record { methods, .. } = ctx.graph.kind(record) else { return false };
    methods
        .iter()
        .any(|&m| ctx.graph.header(m).name == name && matches!(ctx.graph.kind(m), NodeKind::Function { ty: mty, .. } if *mty == ty))
}

#[cfg(test)]
mod tests {
    use cpg_diagnostic::DiagnosticBag;
    use cpg_ir::{Graph, Language, NodeHeader};
    use cpg_scope::ScopeManager;

    use super::*;
    use crate::pass::{PipelineConfig, RecordIndex};

    fn push(graph: &mut Graph, name: &str, kind: NodeKind) -> NodeId {
        graph.add_node(
            |id| NodeHeader { id, name: name.to_string(), location: None, comment: None, language: Language::GO },
            kind,
        )
    }

    fn method(graph: &mut Graph, name: &str, ty: TypeIdx) -> NodeId {
        push(graph, name, NodeKind::Function { params: vec![], receiver: None, return_types: vec![], body: None, ty, is_inferred: false })
    }

    #[test]
    fn struct_implementing_every_required_method_is_recorded_as_implementing() {
        let mut graph = Graph::new();
        let sig = graph.types_mut().intern_function(vec![], vec![]);

        let iface_method = method(&mut graph, "Speak", sig);
        let iface = push(
            &mut graph,
            "Speaker",
            NodeKind::Record { kind: RecordKind::Interface, fields: vec![], methods: vec![iface_method], super_types: vec![], implemented_interfaces: vec![], alias_target: None, is_inferred: false },
        );

        let struct_method = method(&mut graph, "Speak", sig);
        let dog = push(
            &mut graph,
            "Dog",
            NodeKind::Record { kind: RecordKind::Struct, fields: vec![], methods: vec![struct_method], super_types: vec![], implemented_interfaces: vec![], alias_target: None, is_inferred: false },
        );

        let iface_ty = graph.types_mut().intern_object("pkg.Speaker", vec![]);
        let dog_ty = graph.types_mut().intern_object("pkg.Dog", vec![]);
        let mut records = RecordIndex::default();
        records.insert(iface, iface_ty);
        records.insert(dog, dog_ty);

        let scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();
        let mut ctx = PassContext { graph: &mut graph, scope: &scope, diagnostics: &mut diagnostics, records: &records, config: PipelineConfig::default() };

        ResolveInterfaceImplementations.run(&mut ctx);

        assert_eq!(ctx.graph.implemented_interfaces(dog), &[iface_ty]);
        assert_eq!(ctx.graph.subtypes_of(iface_ty), &[dog_ty]);
    }

    #[test]
    fn struct_missing_a_required_method_does_not_implement() {
        let mut graph = Graph::new();
        let sig = graph.types_mut().intern_function(vec![], vec![]);
        let iface_method = method(&mut graph, "Speak", sig);
        let iface = push(
            &mut graph,
            "Speaker",
            NodeKind::Record { kind: RecordKind::Interface, fields: vec![], methods: vec![iface_method], super_types: vec![], implemented_interfaces: vec![], alias_target: None, is_inferred: false },
        );
        let rock = push(
            &mut graph,
            "Rock",
            NodeKind::Record { kind: RecordKind::Struct, fields: vec![], methods: vec![], super_types: vec![], implemented_interfaces: vec![], alias_target: None, is_inferred: false },
        );

        let iface_ty = graph.types_mut().intern_object("pkg.Speaker", vec![]);
        let rock_ty = graph.types_mut().intern_object("pkg.Rock", vec![]);
        let mut records = RecordIndex::default();
        records.insert(iface, iface_ty);
        records.insert(rock, rock_ty);

        let scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();
        let mut ctx = PassContext { graph: &mut graph, scope: &scope, diagnostics: &mut diagnostics, records: &records, config: PipelineConfig::default() };

        ResolveInterfaceImplementations.run(&mut ctx);

        assert!(ctx.graph.implemented_interfaces(rock).is_empty());
    }
}
