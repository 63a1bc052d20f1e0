//! Top-level declarations: Phase A record skeletons, Phase B bodies.

use cpg_ast::{AstNodeKey, FieldSpec, FuncDecl, TopLevelDecl, TopLevelVarDecl, TypeDecl, TypeSpec};
use cpg_ir::{NodeId, NodeKind, RecordKind};
use cpg_scope::ScopeKind;

use super::Lowerer;

impl Lowerer<'_> {
    pub(super) fn run_phase_a(&mut self) -> NodeId {
        let tu = self.push_node("translation-unit", None, NodeKind::TranslationUnit { namespaces: vec![], includes: vec![] });
        self.scope.reset_to_global(tu);

        for import in &self.file.imports {
            let include_name = import
                .alias
                .map(|n| self.resolve_name(n))
                .or_else(|| import.package_name_hint.map(|n| self.resolve_name(n)))
                .unwrap_or_else(|| Self::last_segment(&import.path).to_string());
            let include = self.push_node(include_name, None, NodeKind::Include { import_path: import.path.clone() });
            self.scope.add_declaration(self.graph, include, false);
            if let NodeKind::TranslationUnit { includes, .. } = self.graph.kind_mut(tu) {
                includes.push(include);
            }
        }

        let package_name = self.resolve_name(self.file.package_name);
        let namespace = if let Some(existing) = self.scope.name_scope_ast_node(self.import_path) {
            existing
        } else {
            let ns = self.push_node(package_name, None, NodeKind::Namespace { declarations: vec![] });
            self.scope.add_declaration(self.graph, ns, false);
            ns
        };
        if let NodeKind::TranslationUnit { namespaces, .. } = self.graph.kind_mut(tu) {
            namespaces.push(namespace);
        }

        self.scope.enter_scope(namespace, ScopeKind::NameScope, Some(self.import_path.to_string()));

        for (idx, decl) in self.file.decls.iter().enumerate() {
            if let TopLevelDecl::Type(type_decl) = decl {
                let record = self.lower_record_skeleton(type_decl);
                self.attach_comment(AstNodeKey::TopLevel(idx), record);
                self.scope.add_declaration(self.graph, record, true);
            }
        }

        self.scope.leave_scope(namespace, self.diagnostics);
        tu
    }

    pub(super) fn run_phase_b(&mut self, translation_unit: NodeId) {
        let namespace = match self.graph.kind(translation_unit) {
            NodeKind::TranslationUnit { namespaces, .. } => namespaces.first().copied(),
            _ => None,
        };
        let Some(namespace) = namespace else { return };

        self.scope.enter_scope(namespace, ScopeKind::NameScope, Some(self.import_path.to_string()));

        for (idx, decl) in self.file.decls.iter().enumerate() {
            match decl {
                TopLevelDecl::Type(_) => {}
                TopLevelDecl::Function(func_decl) => {
                    let node = self.lower_function_decl(func_decl);
                    self.attach_comment(AstNodeKey::TopLevel(idx), node);
                }
                TopLevelDecl::Var(var_decl) | TopLevelDecl::Const(var_decl) => {
                    let node = self.lower_top_level_var(var_decl);
                    self.attach_comment(AstNodeKey::TopLevel(idx), node);
                }
            }
        }

        self.scope.leave_scope(namespace, self.diagnostics);
    }

    fn lower_record_skeleton(&mut self, decl: &TypeDecl) -> NodeId {
        let name = self.resolve_name(decl.name);
        match &decl.spec {
            TypeSpec::Struct { fields } => {
                let mut field_nodes = Vec::with_capacity(fields.len());
                let mut super_types = Vec::new();
                for field in fields {
                    let (node, embedded_ty) = self.lower_field(field);
                    field_nodes.push(node);
                    if let Some(ty) = embedded_ty {
                        super_types.push(ty);
                    }
                }
                self.push_node(
                    name,
                    decl.location,
                    NodeKind::Record {
                        kind: RecordKind::Struct,
                        fields: field_nodes,
                        methods: vec![],
                        super_types,
                        implemented_interfaces: vec![],
                        alias_target: None,
                        is_inferred: false,
                    },
                )
            }
            TypeSpec::Interface { methods, embeds } => {
                let super_types: Vec<_> = embeds.iter().map(|&e| self.lower_type(e)).collect();
                let method_nodes: Vec<_> = methods
                    .iter()
                    .map(|m| {
                        let params: Vec<_> = m.params.iter().map(|&p| self.lower_type(p)).collect();
                        let returns: Vec<_> = m.results.iter().map(|&r| self.lower_type(r)).collect();
                        let ty = self.graph.types_mut().intern_function(params.clone(), returns.clone());
                        self.push_node(
                            self.resolve_name(m.name),
                            None,
                            NodeKind::Function {
                                params: vec![],
                                receiver: None,
                                return_types: returns,
                                body: None,
                                ty,
                                is_inferred: false,
                            },
                        )
                    })
                    .collect();
                self.push_node(
                    name,
                    decl.location,
                    NodeKind::Record {
                        kind: RecordKind::Interface,
                        fields: vec![],
                        methods: method_nodes,
                        super_types,
                        implemented_interfaces: vec![],
                        alias_target: None,
                        is_inferred: false,
                    },
                )
            }
            TypeSpec::Alias { target } => {
                let ty = self.lower_type(*target);
                self.push_node(
                    name,
                    decl.location,
                    NodeKind::Record {
                        kind: RecordKind::TypeAlias,
                        fields: vec![],
                        methods: vec![],
                        super_types: vec![],
                        implemented_interfaces: vec![],
                        alias_target: Some(ty),
                        is_inferred: false,
                    },
                )
            }
        }
    }

    /// Returns the field node and, for an embedded field, its type (to be
    /// folded into the owning record's `super_types`).
    fn lower_field(&mut self, field: &FieldSpec) -> (NodeId, Option<cpg_ir::TypeIdx>) {
        let ty = self.lower_type(field.type_expr);
        let name = match field.name {
            Some(n) => self.resolve_name(n),
            None => Self::last_segment(self.file.type_expr_text(field.type_expr)).to_string(),
        };
        let node = self.push_node(
            name,
            field.location,
            NodeKind::Field {
                ty,
                embedded: field.embedded,
                is_inferred: false,
            },
        );
        (node, if field.embedded { Some(ty) } else { None })
    }

    fn lower_function_decl(&mut self, decl: &FuncDecl) -> NodeId {
        let name = self.resolve_name(decl.name);
        let param_types: Vec<_> = decl.params.iter().map(|p| self.lower_type(p.type_expr)).collect();
        let return_types: Vec<_> = decl.results.iter().map(|&r| self.lower_type(r)).collect();
        let fn_ty = self.graph.types_mut().intern_function(param_types.clone(), return_types.clone());

        let receiver_scope = decl.receiver.as_ref().and_then(|recv| {
            let receiver_type_text = self.file.type_expr_text(recv.type_expr);
            let simple_name = super::Lowerer::last_segment(receiver_type_text).to_string();
            self.scope.get_record_for_name(self.graph, self.scope.current(), &simple_name)
        });

        if let Some(record) = receiver_scope {
            self.scope.enter_scope(record, ScopeKind::Record, None);
        } else if decl.receiver.is_some() {
            self.diagnostics.warning(format!("method {name} declared on an unresolved receiver record"), decl.location);
        }

        let receiver_node = decl.receiver.as_ref().map(|recv| {
            let ty = self.lower_type(recv.type_expr);
            let rname = recv.name.map(|n| self.resolve_name(n)).unwrap_or_default();
            self.push_node(rname, None, NodeKind::ParamVariable { ty })
        });

        let param_nodes: Vec<_> = decl
            .params
            .iter()
            .zip(param_types.iter())
            .map(|(p, &ty)| {
                let pname = p.name.map(|n| self.resolve_name(n)).unwrap_or_default();
                self.push_node(pname, None, NodeKind::ParamVariable { ty })
            })
            .collect();

        let body = decl.body.map(|b| self.lower_stmt(b));

        let func = self.push_node(
            name,
            decl.location,
            NodeKind::Function {
                params: param_nodes,
                receiver: receiver_node,
                return_types,
                body,
                ty: fn_ty,
                is_inferred: false,
            },
        );

        self.scope.add_declaration(self.graph, func, true);
        if let Some(record) = receiver_scope {
            self.scope.leave_scope(record, self.diagnostics);
        }
        func
    }

    fn lower_top_level_var(&mut self, decl: &TopLevelVarDecl) -> NodeId {
        let explicit_ty = decl.type_expr.map(|t| self.lower_type(t));
        if decl.names.len() > 1 {
            let declarations: Vec<_> = decl
                .names
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    let initializer = decl.values.get(i).map(|&v| self.lower_expr(v));
                    let ty = explicit_ty.unwrap_or_else(|| initializer.map_or_else(|| self.graph.types().unknown(), |init| self.ty_of(init)));
                    let var = self.push_node(self.resolve_name(n), decl.location, NodeKind::Variable { ty, initializer });
                    self.scope.add_declaration(self.graph, var, true);
                    var
                })
                .collect();
            self.push_node("decl", decl.location, NodeKind::DeclarationStatement { declarations })
        } else {
            let name = decl.names.first().map(|&n| self.resolve_name(n)).unwrap_or_default();
            let initializer = decl.values.first().map(|&v| self.lower_expr(v));
            let ty = explicit_ty.unwrap_or_else(|| initializer.map_or_else(|| self.graph.types().unknown(), |init| self.ty_of(init)));
            let var = self.push_node(name, decl.location, NodeKind::Variable { ty, initializer });
            self.scope.add_declaration(self.graph, var, true);
            var
        }
    }
}
