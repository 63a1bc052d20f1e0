//! AST → CPG lowering, split one file per syntactic category (mirrors the
//! teacher's canonical-IR lowerer split) rather than one giant match:
//! `decl.rs` (top-level declarations and record skeletons), `stmt.rs`
//! (statements), `expr.rs` (expressions).

mod decl;
mod expr;
mod stmt;

use cpg_ast::{AstNodeKey, CommentMap, SourceFile, TypeInfoOracle};
use cpg_diagnostic::DiagnosticBag;
use cpg_ir::{Graph, Language, Location, Name, NodeHeader, NodeId, NodeKind, StringInterner, TypeIdx};
use cpg_scope::ScopeManager;

use crate::type_lower::lower_type_text;

/// Per-file lowering state. Holds `&mut` borrows of the shared graph and
/// scope manager, so only one `Lowerer` is ever alive at a time — the
/// per-project driver constructs one per phase call and lets it drop.
pub struct Lowerer<'f> {
    file: &'f SourceFile,
    oracle: &'f dyn TypeInfoOracle,
    comments: &'f CommentMap,
    interner: &'f StringInterner,
    import_path: &'f str,
    graph: &'f mut Graph,
    scope: &'f mut ScopeManager,
    diagnostics: &'f mut DiagnosticBag,
}

/// Arguments threaded into every `Lowerer` call, grouped so the phase
/// entry points don't each take eight positional parameters.
pub struct LowerInputs<'f> {
    pub file: &'f SourceFile,
    pub oracle: &'f dyn TypeInfoOracle,
    pub comments: &'f CommentMap,
    pub interner: &'f StringInterner,
    pub import_path: &'f str,
}

/// Phase A: create a `TranslationUnit`, emit `Include`s, create or
/// reactivate the package `NameScope`, and emit record skeletons for every
/// top-level type declaration. Non-type declarations are skipped.
#[tracing::instrument(level = "debug", skip_all, fields(import_path = inputs.import_path))]
pub fn lower_phase_a(inputs: LowerInputs<'_>, graph: &mut Graph, scope: &mut ScopeManager, diagnostics: &mut DiagnosticBag) -> NodeId {
    let mut lowerer = Lowerer {
        file: inputs.file,
        oracle: inputs.oracle,
        comments: inputs.comments,
        interner: inputs.interner,
        import_path: inputs.import_path,
        graph,
        scope,
        diagnostics,
    };
    cpg_stack::ensure_sufficient_stack(move || lowerer.run_phase_a())
}

/// Phase B: re-enter the package scope and walk every non-type top-level
/// declaration's body, emitting statements/expressions and attaching
/// comments.
#[tracing::instrument(level = "debug", skip_all, fields(import_path = inputs.import_path))]
pub fn lower_phase_b(inputs: LowerInputs<'_>, translation_unit: NodeId, graph: &mut Graph, scope: &mut ScopeManager, diagnostics: &mut DiagnosticBag) {
    let mut lowerer = Lowerer {
        file: inputs.file,
        oracle: inputs.oracle,
        comments: inputs.comments,
        interner: inputs.interner,
        import_path: inputs.import_path,
        graph,
        scope,
        diagnostics,
    };
    cpg_stack::ensure_sufficient_stack(move || lowerer.run_phase_b(translation_unit));
}

impl Lowerer<'_> {
    fn push_node(&mut self, name: impl Into<String>, location: Option<Location>, kind: NodeKind) -> NodeId {
        self.graph.add_node(
            |id| NodeHeader {
                id,
                name: name.into(),
                location,
                comment: None,
                language: Language::GO,
            },
            kind,
        )
    }

    fn attach_comment(&mut self, key: AstNodeKey, node: NodeId) {
        if let Some(comment) = self.comments.get(key) {
            let comment = comment.to_string();
            self.graph.header_mut(node).comment = Some(comment);
        }
    }

    fn resolve_name(&self, name: Name) -> String {
        self.interner.resolve(name).to_string()
    }

    fn lower_type(&mut self, type_expr: cpg_ast::TypeExprId) -> TypeIdx {
        let text = self.file.type_expr_text(type_expr).to_string();
        lower_type_text(&text, self.import_path, self.graph.types_mut())
    }

    /// A lowered expression node's static type, for declarations whose own
    /// type is inferred from an initializer rather than written out
    /// (`x := foo()`). Falls back to `Unknown` for node kinds that don't
    /// carry a `ty`/equivalent field (statements, declarations).
    fn ty_of(&self, node: NodeId) -> TypeIdx {
        match self.graph.kind(node) {
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
            _ => self.graph.types().unknown(),
        }
    }

    /// The type-expression text's final identifier segment, used as a
    /// field's simple name when an embedded field has no explicit name.
    fn last_segment(text: &str) -> &str {
        text.trim_start_matches('*').rsplit(['.', '/']).next().unwrap_or(text)
    }
}
