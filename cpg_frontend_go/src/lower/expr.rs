//! Expression lowering (`spec.md` §4.1, §4.4): literals, references,
//! selectors (package-qualified vs. member access), calls, `new`/`make`,
//! type assertions, composite literals, and function literals.

use cpg_ast::{AstExprId, CompositeElement, ExprKind, FuncLit, TypeDescriptor};
use cpg_ir::{NodeId, NodeKind, TypeIdx};
use cpg_scope::ScopeKind;

use super::Lowerer;

impl Lowerer<'_> {
    /// The oracle's reported static type for `id`, lowered and qualified
    /// the same way a type expression is (`spec.md` §6: `Unknown` is a
    /// legitimate answer, widened to `TypeRegistry::unknown()`).
    fn oracle_ty(&mut self, id: AstExprId) -> TypeIdx {
        match self.oracle.type_of(id) {
            TypeDescriptor::Known(text) => crate::type_lower::lower_type_text(&text, self.import_path, self.graph.types_mut()),
            TypeDescriptor::Unknown => self.graph.types().unknown(),
        }
    }

    pub(super) fn lower_expr(&mut self, id: AstExprId) -> NodeId {
        let expr = self.file.expr(id);
        let location = expr.location;
        match expr.kind.clone() {
            ExprKind::Literal(value) => {
                let ty = self.oracle_ty(id);
                self.push_node("literal", location, NodeKind::Literal { ty, value })
            }
            ExprKind::Ident(name) => {
                let ty = self.oracle_ty(id);
                let simple_name = self.resolve_name(name);
                let node = self.push_node(simple_name.clone(), location, NodeKind::DeclaredReference { ty, fqn: None, refers_to: None });
                if let Some(refers_to) = self.scope.resolve_reference(self.graph, node) {
                    self.graph.set_refers_to(node, refers_to);
                }
                node
            }
            ExprKind::Selector { base, name } => self.lower_selector(id, base, name, location),
            // No dedicated index/subscript node kind exists; indexing is
            // modeled as a synthetic single-argument MemberCall so slice,
            // array, and map indexing all share one DFG-friendly shape.
            ExprKind::Index { base, index } => {
                let ty = self.oracle_ty(id);
                let base = self.lower_expr(base);
                let index = self.lower_expr(index);
                self.push_node("index", location, NodeKind::MemberCall { base, method_name: "index".to_string(), args: vec![index], ty, invokes: vec![] })
            }
            ExprKind::Call { callee, args } => self.lower_call(id, callee, &args, location),
            ExprKind::Binary { op, lhs, rhs } => {
                let ty = self.oracle_ty(id);
                let lhs = self.lower_expr(lhs);
                let rhs = self.lower_expr(rhs);
                self.push_node("binary", location, NodeKind::Binary { op, lhs, rhs, ty })
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.oracle_ty(id);
                let operand = self.lower_expr(operand);
                self.push_node("unary", location, NodeKind::Unary { op, operand, ty })
            }
            ExprKind::New { type_expr } => {
                let target_type = self.lower_type(type_expr);
                let initializer = self.push_node("new-init", location, NodeKind::Construct { ty: target_type, args: vec![] });
                self.push_node("new", location, NodeKind::New { target_type, initializer })
            }
            ExprKind::Make { type_expr, args } => self.lower_make(type_expr, &args, location),
            ExprKind::TypeAssert { expr, type_expr } => {
                let inner = self.lower_expr(expr);
                let asserted_type = self.lower_type(type_expr);
                self.push_node("type-assert", location, NodeKind::TypeAssert { asserted_type, inner })
            }
            ExprKind::CompositeLit { type_expr, elements } => self.lower_composite_lit(type_expr, &elements, location),
            ExprKind::FuncLit(func_lit) => self.lower_func_lit(&func_lit, location),
        }
    }

    /// `base.name`: a package-qualified reference when `base` is a bare
    /// identifier matching one of the file's imports, a member access
    /// otherwise.
    fn lower_selector(&mut self, id: AstExprId, base: AstExprId, name: cpg_ir::Name, location: Option<cpg_ir::Location>) -> NodeId {
        let ty = self.oracle_ty(id);
        let package_match = match &self.file.expr(base).kind {
            ExprKind::Ident(ident) => {
                let base_text = self.resolve_name(*ident);
                self.file.imports.iter().find_map(|import| {
                    let matches = import
                        .alias
                        .map(|a| self.resolve_name(a) == base_text)
                        .or_else(|| import.package_name_hint.map(|h| self.resolve_name(h) == base_text))
                        .unwrap_or_else(|| Self::last_segment(&import.path) == base_text);
                    matches.then(|| import.path.clone())
                })
            }
            _ => None,
        };

        let member_name = self.resolve_name(name);
        if let Some(import_path) = package_match {
            let fqn = format!("{import_path}.{member_name}");
            let node = self.push_node(member_name, location, NodeKind::DeclaredReference { ty, fqn: Some(fqn), refers_to: None });
            if let Some(refers_to) = self.scope.resolve_reference(self.graph, node) {
                self.graph.set_refers_to(node, refers_to);
            }
            node
        } else {
            let base = self.lower_expr(base);
            self.push_node(member_name.clone(), location, NodeKind::Member { base, member_name, ty, refers_to: None })
        }
    }

    fn lower_call(&mut self, id: AstExprId, callee: AstExprId, args: &[AstExprId], location: Option<cpg_ir::Location>) -> NodeId {
        let ty = self.oracle_ty(id);
        let lowered_args: Vec<_> = args.iter().map(|&a| self.lower_expr(a)).collect();

        if let ExprKind::Selector { base, name } = self.file.expr(callee).kind.clone() {
            let is_package_qualified = matches!(&self.file.expr(base).kind, ExprKind::Ident(ident) if {
                let base_text = self.resolve_name(*ident);
                self.file.imports.iter().any(|import| {
                    import.alias.map(|a| self.resolve_name(a) == base_text).unwrap_or(false)
                        || import.package_name_hint.map(|h| self.resolve_name(h) == base_text).unwrap_or(false)
                        || Self::last_segment(&import.path) == base_text
                })
            });

            if !is_package_qualified {
                let base = self.lower_expr(base);
                let method_name = self.resolve_name(name);
                return self.push_node("member-call", location, NodeKind::MemberCall { base, method_name, args: lowered_args, ty, invokes: vec![] });
            }
        }

        let callee = self.lower_expr(callee);
        self.push_node("call", location, NodeKind::Call { callee, args: lowered_args, ty, invokes: vec![] })
    }

    /// `make(T, args...)`: an `ArrayCreation` when `T` is a slice/array/map
    /// text form, a `Construct` (e.g. `make(chan int)`) otherwise. The
    /// first argument is the element count/dimension; any remainder is
    /// dropped (capacity arguments carry no CPG-visible effect).
    fn lower_make(&mut self, type_expr: cpg_ast::TypeExprId, args: &[AstExprId], location: Option<cpg_ir::Location>) -> NodeId {
        let text = self.file.type_expr_text(type_expr).to_string();
        let ty = self.lower_type(type_expr);
        let is_collection = text.starts_with('[') || text.starts_with("map[");

        if is_collection {
            let dimensions: Vec<_> = args.iter().map(|&a| self.lower_expr(a)).collect();
            self.push_node("make", location, NodeKind::ArrayCreation { element_type: ty, dimensions })
        } else {
            let ctor_args: Vec<_> = args.iter().map(|&a| self.lower_expr(a)).collect();
            self.push_node("make", location, NodeKind::Construct { ty, args: ctor_args })
        }
    }

    fn lower_composite_lit(&mut self, type_expr: Option<cpg_ast::TypeExprId>, elements: &[CompositeElement], location: Option<cpg_ir::Location>) -> NodeId {
        let ty = type_expr.map(|t| self.lower_type(t)).unwrap_or_else(|| self.graph.types().unknown());

        let element_nodes: Vec<_> = elements
            .iter()
            .map(|element| match element {
                CompositeElement::Positional(value) => self.lower_expr(*value),
                CompositeElement::KeyValue { key, value } => {
                    let key_node = match &self.file.expr(*key).kind {
                        ExprKind::Ident(name) => {
                            let literal_ty = self.graph.types().unknown();
                            let text = self.resolve_name(*name);
                            self.push_node("key", None, NodeKind::Literal { ty: literal_ty, value: cpg_ir::LiteralValue::Str(text) })
                        }
                        _ => self.lower_expr(*key),
                    };
                    let value_node = self.lower_expr(*value);
                    self.push_node("key-value", None, NodeKind::KeyValue { key: key_node, value: value_node })
                }
            })
            .collect();

        let initializer = self.push_node("initializer-list", location, NodeKind::InitializerList { ty, elements: element_nodes });
        self.push_node("composite-lit", location, NodeKind::Construct { ty, args: vec![initializer] })
    }

    fn lower_func_lit(&mut self, func_lit: &FuncLit, location: Option<cpg_ir::Location>) -> NodeId {
        let param_types: Vec<_> = func_lit.params.iter().map(|p| self.lower_type(p.type_expr)).collect();
        let return_types: Vec<_> = func_lit.results.iter().map(|&r| self.lower_type(r)).collect();
        let fn_ty = self.graph.types_mut().intern_function(param_types.clone(), return_types.clone());

        let placeholder = self.push_node("func-lit-body-placeholder", None, NodeKind::Compound { statements: vec![] });
        let func = self.push_node(
            "func-lit",
            location,
            NodeKind::Function { params: vec![], receiver: None, return_types: return_types.clone(), body: Some(placeholder), ty: fn_ty, is_inferred: false },
        );
        self.scope.enter_scope(func, ScopeKind::Function, None);

        let param_nodes: Vec<_> = func_lit
            .params
            .iter()
            .zip(param_types.iter())
            .map(|(p, &ty)| {
                let name = p.name.map(|n| self.resolve_name(n)).unwrap_or_default();
                let node = self.push_node(name, None, NodeKind::ParamVariable { ty });
                self.scope.add_declaration(self.graph, node, false);
                node
            })
            .collect();

        let body = self.lower_stmt(func_lit.body);

        if let NodeKind::Function { params, body: b, .. } = self.graph.kind_mut(func) {
            *params = param_nodes;
            *b = Some(body);
        }
        self.scope.leave_scope(func, self.diagnostics);

        self.push_node("lambda", location, NodeKind::Lambda { function: func })
    }
}

