//! The `Pass` trait and the context threaded through every pass run.

use cpg_diagnostic::DiagnosticBag;
use cpg_ir::{Graph, NodeId, TypeIdx};
use cpg_scope::ScopeManager;
use rustc_hash::FxHashMap;

/// Maps every record declaration to its fully-qualified `TypeIdx` and back.
/// Built by the project driver right after Phase A, when the import path
/// for each file (and so each record's qualified name) is still known —
/// the resolver itself never sees import paths, only already-qualified
/// types.
#[derive(Default, Debug)]
pub struct RecordIndex {
    by_node: FxHashMap<NodeId, TypeIdx>,
    by_type: FxHashMap<TypeIdx, NodeId>,
}

impl RecordIndex {
    pub fn insert(&mut self, record: NodeId, ty: TypeIdx) {
        self.by_node.insert(record, ty);
        self.by_type.insert(ty, record);
    }

    pub fn type_of(&self, record: NodeId) -> Option<TypeIdx> {
        self.by_node.get(&record).copied()
    }

    pub fn record_of(&self, ty: TypeIdx) -> Option<NodeId> {
        self.by_type.get(&ty).copied()
    }
}

/// Knobs read by the pipeline; `cpg::Config` maps its own fields into one
/// of these once per run rather than the resolver depending on the driver
/// crate's config type.
#[derive(Copy, Clone, Debug)]
pub struct PipelineConfig {
    /// Open Question resolution: the function-pointer candidate set size
    /// above which Pass 5 abandons binding rather than guess. Default 3.
    pub function_pointer_ambiguity_cap: usize,
    /// Whether Pass 3 may synthesize an inferred `Field` for a record
    /// member expression that resolves to nothing.
    pub infer_unresolved_members: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            function_pointer_ambiguity_cap: 3,
            infer_unresolved_members: true,
        }
    }
}

pub struct PassContext<'a> {
    pub graph: &'a mut Graph,
    pub scope: &'a ScopeManager,
    pub diagnostics: &'a mut DiagnosticBag,
    pub records: &'a RecordIndex,
    pub config: PipelineConfig,
}

/// A single resolver stage. Implementors declare their name and the names
/// of passes they depend on; `crate::pipeline::run` topologically sorts the
/// registered set before executing any of them.
pub trait Pass {
    fn name(&self) -> &'static str;

    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    fn run(&mut self, ctx: &mut PassContext<'_>);
}
