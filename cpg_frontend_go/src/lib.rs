//! Two-phase Go frontend (`spec.md` §4): lowers a `cpg_ast::SourceFile`
//! produced by an external parser/type-checker oracle into graph nodes.
//! Phase A emits record skeletons so cross-file type references resolve
//! before any function body is lowered; Phase B lowers bodies.

mod lower;
mod type_lower;

pub use lower::{lower_phase_a, lower_phase_b, LowerInputs};
pub use type_lower::lower_type_text;

#[cfg(test)]
mod tests {
    use cpg_ast::{AssignToken, CommentMap, ExprKind, FieldSpec, FuncDecl, ImportSpec, NoTypeInfo, SourceFile, StmtKind, TopLevelDecl, TypeDecl, TypeSpec};
    use cpg_diagnostic::DiagnosticBag;
    use cpg_ir::{Graph, LiteralValue, NodeKind, StringInterner};
    use cpg_scope::ScopeManager;

    use super::*;

    fn build_struct_with_method_fixture() -> (SourceFile, StringInterner) {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("widgets"));

        let int_ty = file.push_type_expr("int");
        let string_ty = file.push_type_expr("string");
        let widget_ty = file.push_type_expr("*widgets.Widget");

        let name_field = FieldSpec { name: Some(interner.intern("Name")), type_expr: string_ty, embedded: false, location: None };
        let count_field = FieldSpec { name: Some(interner.intern("Count")), type_expr: int_ty, embedded: false, location: None };
        file.decls.push(TopLevelDecl::Type(TypeDecl {
            name: interner.intern("Widget"),
            spec: TypeSpec::Struct { fields: vec![name_field, count_field] },
            location: None,
        }));

        let body_block = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Block(vec![]), location: None });
        file.decls.push(TopLevelDecl::Function(FuncDecl {
            name: interner.intern("Describe"),
            receiver: Some(cpg_ast::ReceiverSpec { name: Some(interner.intern("w")), type_expr: widget_ty }),
            params: vec![],
            results: vec![string_ty],
            body: Some(body_block),
            location: None,
        }));

        (file, interner)
    }

    #[test]
    fn struct_and_method_lower_into_a_record_with_a_filed_method() {
        let (file, interner) = build_struct_with_method_fixture();
        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "widgets" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "widgets" };
        lower_phase_b(inputs, tu, &mut graph, &mut scope, &mut diagnostics);

        assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics.iter().collect::<Vec<_>>());

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!("expected translation unit") };
        let namespace = namespaces[0];
        let NodeKind::Namespace { declarations } = graph.kind(namespace) else { panic!("expected namespace") };
        assert_eq!(declarations.len(), 1, "only the record should attach directly to the namespace");

        let record = declarations[0];
        let NodeKind::Record { fields, methods, .. } = graph.kind(record) else { panic!("expected record") };
        assert_eq!(fields.len(), 2);
        assert_eq!(methods.len(), 1);
        assert_eq!(graph.header(methods[0]).name, "Describe");
    }

    #[test]
    fn method_is_resolvable_by_simple_name_from_package_scope() {
        let (file, interner) = build_struct_with_method_fixture();
        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "widgets" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);
        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "widgets" };
        lower_phase_b(inputs, tu, &mut graph, &mut scope, &mut diagnostics);
        assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics.iter().collect::<Vec<_>>());

        // Phase B leaves the namespace scope it entered; resolving from the
        // manager's resting position (global) must still find the method by
        // its simple name, the same way an ordinary top-level function would.
        let ty = graph.types().unknown();
        let reference = graph.add_node(
            |id| cpg_ir::NodeHeader { id, name: "Describe".to_string(), location: None, comment: None, language: cpg_ir::Language::GO },
            NodeKind::DeclaredReference { ty, fqn: None, refers_to: None },
        );
        let resolved = scope.resolve_reference(&graph, reference).expect("method should resolve by simple name from package scope");
        assert_eq!(graph.header(resolved).name, "Describe");

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!() };
        let NodeKind::Namespace { declarations } = graph.kind(namespaces[0]) else { panic!() };
        let record = declarations[0];
        let NodeKind::Record { methods, .. } = graph.kind(record) else { panic!("expected record") };
        assert_eq!(methods[0], resolved, "the method still attaches to its record's own methods list");
    }

    #[test]
    fn interface_embedding_widens_super_types() {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("shapes"));
        let embedded_ty = file.push_type_expr("shapes.Sized");

        file.decls.push(TopLevelDecl::Type(TypeDecl {
            name: interner.intern("Sized"),
            spec: TypeSpec::Interface { methods: vec![], embeds: vec![] },
            location: None,
        }));
        file.decls.push(TopLevelDecl::Type(TypeDecl {
            name: interner.intern("Shape"),
            spec: TypeSpec::Interface { methods: vec![], embeds: vec![embedded_ty] },
            location: None,
        }));

        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "shapes" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!() };
        let NodeKind::Namespace { declarations } = graph.kind(namespaces[0]) else { panic!() };
        let shape = declarations.iter().copied().find(|&d| graph.header(d).name == "Shape").unwrap();
        let NodeKind::Record { super_types, .. } = graph.kind(shape) else { panic!() };
        assert_eq!(super_types.len(), 1);
    }

    #[test]
    fn multi_return_destructure_produces_one_destructure_tuple_per_target() {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("main"));

        let call_callee = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("parseTwo")), location: None });
        let call = file.push_expr(cpg_ast::Expr { kind: ExprKind::Call { callee: call_callee, args: vec![] }, location: None });
        let lhs_a = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("a")), location: None });
        let lhs_b = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("b")), location: None });
        let assign = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Assign { token: AssignToken::Define, lhs: vec![lhs_a, lhs_b], rhs: vec![call] }, location: None });
        let body = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Block(vec![assign]), location: None });

        file.decls.push(TopLevelDecl::Function(FuncDecl {
            name: interner.intern("run"),
            receiver: None,
            params: vec![],
            results: vec![],
            body: Some(body),
            location: None,
        }));

        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);
        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        lower_phase_b(inputs, tu, &mut graph, &mut scope, &mut diagnostics);

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!() };
        let NodeKind::Namespace { declarations } = graph.kind(namespaces[0]) else { panic!() };
        let run_fn = declarations[0];
        let NodeKind::Function { body: Some(body), .. } = graph.kind(run_fn) else { panic!() };
        let NodeKind::Compound { statements } = graph.kind(*body) else { panic!() };
        let NodeKind::DeclarationStatement { declarations } = graph.kind(statements[0]) else { panic!("expected a decl statement for the destructure") };
        assert_eq!(declarations.len(), 2);
        for &decl in declarations {
            let NodeKind::Variable { initializer: Some(init), .. } = graph.kind(decl) else { panic!() };
            assert!(matches!(graph.kind(*init), NodeKind::DestructureTuple { .. }));
        }
    }

    #[test]
    fn elementwise_multi_assign_does_not_destructure() {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("main"));

        let one = file.push_expr(cpg_ast::Expr { kind: ExprKind::Literal(LiteralValue::Int(1)), location: None });
        let two = file.push_expr(cpg_ast::Expr { kind: ExprKind::Literal(LiteralValue::Int(2)), location: None });
        let lhs_x = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("x")), location: None });
        let lhs_y = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("y")), location: None });
        let assign = file.push_stmt(cpg_ast::Stmt {
            kind: StmtKind::Assign { token: AssignToken::Define, lhs: vec![lhs_x, lhs_y], rhs: vec![one, two] },
            location: None,
        });
        let body = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Block(vec![assign]), location: None });

        file.decls.push(TopLevelDecl::Function(FuncDecl {
            name: interner.intern("run"),
            receiver: None,
            params: vec![],
            results: vec![],
            body: Some(body),
            location: None,
        }));

        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);
        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        lower_phase_b(inputs, tu, &mut graph, &mut scope, &mut diagnostics);

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!() };
        let NodeKind::Namespace { declarations } = graph.kind(namespaces[0]) else { panic!() };
        let run_fn = declarations[0];
        let NodeKind::Function { body: Some(body), .. } = graph.kind(run_fn) else { panic!() };
        let NodeKind::Compound { statements } = graph.kind(*body) else { panic!() };
        let NodeKind::DeclarationStatement { declarations } = graph.kind(statements[0]) else { panic!() };
        assert_eq!(declarations.len(), 2);
        for &decl in declarations {
            let NodeKind::Variable { initializer: Some(init), .. } = graph.kind(decl) else { panic!() };
            assert!(!matches!(graph.kind(*init), NodeKind::DestructureTuple { .. }));
        }
    }

    #[test]
    fn multi_value_return_wraps_results_in_a_tuple_node() {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("main"));

        let a = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("a")), location: None });
        let b = file.push_expr(cpg_ast::Expr { kind: ExprKind::Ident(interner.intern("b")), location: None });
        let ret = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Return(vec![a, b]), location: None });
        let body = file.push_stmt(cpg_ast::Stmt { kind: StmtKind::Block(vec![ret]), location: None });

        file.decls.push(TopLevelDecl::Function(FuncDecl {
            name: interner.intern("two"),
            receiver: None,
            params: vec![],
            results: vec![],
            body: Some(body),
            location: None,
        }));

        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);
        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        lower_phase_b(inputs, tu, &mut graph, &mut scope, &mut diagnostics);

        let NodeKind::TranslationUnit { namespaces, .. } = graph.kind(tu) else { panic!() };
        let NodeKind::Namespace { declarations } = graph.kind(namespaces[0]) else { panic!() };
        let two_fn = declarations[0];
        let NodeKind::Function { body: Some(body), .. } = graph.kind(two_fn) else { panic!() };
        let NodeKind::Compound { statements } = graph.kind(*body) else { panic!() };
        let NodeKind::Return { values } = graph.kind(statements[0]) else { panic!("expected a return statement") };
        assert_eq!(values.len(), 1, "a multi-valued return stores one Tuple node, not a raw Vec of results");
        let NodeKind::Tuple { elements } = graph.kind(values[0]) else { panic!("expected a Tuple node wrapping the results") };
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn include_name_prefers_alias_over_hint_over_last_segment() {
        let mut interner = StringInterner::new();
        let mut file = SourceFile::new(interner.intern("main"));
        file.imports.push(ImportSpec { path: "example.com/widgets".to_string(), alias: Some(interner.intern("w")), package_name_hint: None });

        let comments = CommentMap::new();
        let oracle = NoTypeInfo;
        let mut graph = Graph::new();
        let mut scope = ScopeManager::new();
        let mut diagnostics = DiagnosticBag::new();

        let inputs = LowerInputs { file: &file, oracle: &oracle, comments: &comments, interner: &interner, import_path: "main" };
        let tu = lower_phase_a(inputs, &mut graph, &mut scope, &mut diagnostics);

        let NodeKind::TranslationUnit { includes, .. } = graph.kind(tu) else { panic!() };
        assert_eq!(graph.header(includes[0]).name, "w");
    }
}
