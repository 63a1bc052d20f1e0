//! The project driver: Phase A over every file (so every record skeleton
//! exists before any body is lowered), then Phase B over every file, then
//! the resolver pipeline. One shared `Graph`, `ScopeManager`, and
//! `DiagnosticBag` for the whole run (`spec.md` §5 — single-threaded,
//! sequential, no internal concurrency to cancel).

use cpg_ast::{ModuleDescriptorLoader, TypeInfoOracle};
use cpg_diagnostic::DiagnosticBag;
use cpg_frontend_go::{lower_phase_a, lower_phase_b, LowerInputs};
use cpg_ir::{Graph, NodeId, NodeKind};
use cpg_resolver::{PassContext, RecordIndex};
use cpg_scope::ScopeManager;
use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::error::CoreError;
use crate::input::ProjectInput;

/// The three things a caller needs out of a build (`spec.md` §6): every
/// file's translation unit, a fully-qualified-name lookup over top-level
/// declarations, and every node the frontend/resolver inferred rather than
/// read off the input directly.
pub struct BuildOutput {
    pub translation_units: Vec<NodeId>,
    pub fqn_index: FxHashMap<Box<str>, NodeId>,
    pub inferred: Vec<NodeId>,
}

/// Module discovery first, then path-based naming (`spec.md` §9's adopted
/// Open-Question resolution): try the caller's loader, and on its absence
/// or failure fall back rather than propagate. A load failure (`spec.md`
/// §7 kind 2) is the one `Result::Err` the driver itself ever sees from a
/// caller-supplied dependency; it is downgraded to a warning here.
pub fn resolve_module_prefix(loader: &dyn ModuleDescriptorLoader, project_root: &str, diagnostics: &mut DiagnosticBag) -> Option<String> {
    let result: Result<Option<String>, CoreError> = loader
        .load(project_root)
        .map(|descriptor| descriptor.map(|d| d.canonical_prefix))
        .map_err(CoreError::ModuleDescriptor);

    match result {
        Ok(prefix) => prefix,
        Err(err) => {
            diagnostics.warning(format!("{err}; falling back to path-based package naming"), None);
            None
        }
    }
}

/// With a module prefix, a file's import path is `prefix/dir1/dir2`; with
/// none, the file's own directory path stands in for the prefix, dot-joined
/// (`spec.md` §9). A file at the project root (no directory component)
/// uses the prefix itself, or `"main"` in the no-prefix fallback case.
pub fn import_path_for(module_prefix: Option<&str>, relative_path: &str) -> String {
    let dir_segments: Vec<&str> = match relative_path.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    match module_prefix {
        Some(prefix) if dir_segments.is_empty() => prefix.to_string(),
        Some(prefix) => format!("{prefix}/{}", dir_segments.join("/")),
        None if dir_segments.is_empty() => "main".to_string(),
        None => dir_segments.join("."),
    }
}

#[tracing::instrument(level = "info", skip_all, fields(project_root = %input.root, files = input.files.len()))]
pub fn build_graph(input: ProjectInput, module_loader: &dyn ModuleDescriptorLoader, config: Config) -> (Graph, BuildOutput, DiagnosticBag) {
    let mut graph = Graph::new();
    let mut scope = ScopeManager::new();
    let mut diagnostics = DiagnosticBag::new();

    let module_prefix = resolve_module_prefix(module_loader, &input.root, &mut diagnostics);
    let import_paths: Vec<String> = input.files.iter().map(|f| import_path_for(module_prefix.as_deref(), &f.relative_path)).collect();

    let mut translation_units = Vec::with_capacity(input.files.len());
    for (file, import_path) in input.files.iter().zip(&import_paths) {
        let lower_inputs = LowerInputs {
            file: &file.file,
            oracle: file.oracle.as_ref(),
            comments: &file.comments,
            interner: &input.interner,
            import_path,
        };
        translation_units.push(lower_phase_a(lower_inputs, &mut graph, &mut scope, &mut diagnostics));
    }

    let mut records = RecordIndex::default();
    for (&tu, import_path) in translation_units.iter().zip(&import_paths) {
        index_records(&mut graph, tu, import_path, &mut records);
    }

    for ((file, import_path), &tu) in input.files.iter().zip(&import_paths).zip(&translation_units) {
        let lower_inputs = LowerInputs {
            file: &file.file,
            oracle: file.oracle.as_ref(),
            comments: &file.comments,
            interner: &input.interner,
            import_path,
        };
        lower_phase_b(lower_inputs, tu, &mut graph, &mut scope, &mut diagnostics);
    }

    let mut pass_ctx = PassContext {
        graph: &mut graph,
        scope: &scope,
        diagnostics: &mut diagnostics,
        records: &records,
        config: config.into(),
    };
    cpg_resolver::run(&mut pass_ctx, cpg_resolver::default_passes());

    let fqn_index = build_fqn_index(&graph, &translation_units, &import_paths);
    let inferred = collect_inferred(&graph);

    (graph, BuildOutput { translation_units, fqn_index, inferred }, diagnostics)
}

/// Records a `TranslationUnit`'s package declares, keyed by the same
/// `import_path.SimpleName` scheme `cpg_frontend_go::type_lower` uses to
/// qualify a type expression referencing them.
fn index_records(graph: &mut Graph, translation_unit: NodeId, import_path: &str, records: &mut RecordIndex) {
    for decl in top_level_declarations(graph, translation_unit) {
        if graph.kind(decl).is_record() {
            let simple_name = graph.header(decl).name.clone();
            let ty = graph.types_mut().intern_object(&format!("{import_path}.{simple_name}"), vec![]);
            records.insert(decl, ty);
        }
    }
}

fn top_level_declarations(graph: &Graph, translation_unit: NodeId) -> Vec<NodeId> {
    let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(translation_unit) else { return Vec::new() };
    namespaces
        .iter()
        .flat_map(|&ns| match graph.kind(ns) {
            NodeKind::Namespace { declarations } => declarations.clone(),
            _ => Vec::new(),
        })
        .collect()
}

fn build_fqn_index(graph: &Graph, translation_units: &[NodeId], import_paths: &[String]) -> FxHashMap<Box<str>, NodeId> {
    let mut index = FxHashMap::default();
    for (&tu, import_path) in translation_units.iter().zip(import_paths) {
        for decl in top_level_declarations(graph, tu) {
            let simple_name = &graph.header(decl).name;
            index.insert(format!("{import_path}.{simple_name}").into_boxed_str(), decl);
        }
    }
    index
}

fn collect_inferred(graph: &Graph) -> Vec<NodeId> {
    graph
        .node_ids()
        .filter(|&id| match graph.kind(id) {
            NodeKind::Record { is_inferred, .. } | NodeKind::Function { is_inferred, .. } | NodeKind::Field { is_inferred, .. } => *is_inferred,
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use cpg_ast::{CommentMap, FuncDecl, InterfaceMethodSpec, NoModuleDescriptor, NoTypeInfo, ReceiverSpec, SourceFile, Stmt, StmtKind, TopLevelDecl, TypeDecl, TypeSpec};
    use cpg_ir::StringInterner;

    use super::*;
    use crate::input::{ProjectFile, ProjectInput};

    /// Two files in the same package, one declaring an interface and the
    /// other a struct whose method satisfies it, exercise the corrected
    /// single-shared-`ScopeManager` design: both files' declarations must
    /// land in the same canonical namespace for `Dog`'s `Speak` method to
    /// be visible to Pass 1 at all.
    #[test]
    fn struct_in_one_file_implements_interface_declared_in_another() {
        let mut interner = StringInterner::new();
        let package = interner.intern("animals");

        let mut iface_file = SourceFile::new(package);
        let speak_result = iface_file.push_type_expr("string");
        iface_file.decls.push(TopLevelDecl::Type(TypeDecl {
            name: interner.intern("Speaker"),
            spec: TypeSpec::Interface {
                methods: vec![InterfaceMethodSpec { name: interner.intern("Speak"), params: vec![], results: vec![speak_result] }],
                embeds: vec![],
            },
            location: None,
        }));

        let mut dog_file = SourceFile::new(package);
        dog_file.decls.push(TopLevelDecl::Type(TypeDecl {
            name: interner.intern("Dog"),
            spec: TypeSpec::Struct { fields: vec![] },
            location: None,
        }));
        let dog_receiver_ty = dog_file.push_type_expr("*Dog");
        let dog_result_ty = dog_file.push_type_expr("string");
        let body = dog_file.push_stmt(Stmt { kind: StmtKind::Block(vec![]), location: None });
        dog_file.decls.push(TopLevelDecl::Function(FuncDecl {
            name: interner.intern("Speak"),
            receiver: Some(ReceiverSpec { name: Some(interner.intern("d")), type_expr: dog_receiver_ty }),
            params: vec![],
            results: vec![dog_result_ty],
            body: Some(body),
            location: None,
        }));

        let input = ProjectInput {
            root: "/project".to_string(),
            interner,
            files: vec![
                ProjectFile { relative_path: "speaker.go".to_string(), file: iface_file, comments: CommentMap::new(), oracle: Box::new(NoTypeInfo) },
                ProjectFile { relative_path: "dog.go".to_string(), file: dog_file, comments: CommentMap::new(), oracle: Box::new(NoTypeInfo) },
            ],
        };

        let (graph, output, diagnostics) = build_graph(input, &NoModuleDescriptor, Config::default());
        assert!(!diagnostics.has_errors(), "unexpected errors: {:?}", diagnostics.iter().collect::<Vec<_>>());

        let dog = *output.fqn_index.get("main.Dog").expect("Dog indexed under its fqn");
        let speaker = *output.fqn_index.get("main.Speaker").expect("Speaker indexed under its fqn");

        let implemented = graph.implemented_interfaces(dog);
        assert_eq!(implemented.len(), 1);

        let speaker_simple_name = &graph.header(speaker).name;
        assert_eq!(speaker_simple_name, "Speaker");
    }
}
