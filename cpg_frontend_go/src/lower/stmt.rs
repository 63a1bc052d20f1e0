//! Statement lowering (`spec.md` §4.3), including the multi-valued
//! assignment / destructure-tuple distinction: a `:=`/`=` with more than one
//! name on the left and exactly one expression on the right is a genuine
//! multi-return destructure (`DestructureTuple` per target); anything else
//! is elementwise, no destructuring involved.

use cpg_ast::{AssignToken, AstStmtId, ExprKind, LocalVarDecl, StmtKind};
use cpg_ir::{BinaryOperator, NodeId, NodeKind};
use cpg_scope::ScopeKind;

use super::Lowerer;

impl Lowerer<'_> {
    pub(super) fn lower_stmt(&mut self, id: AstStmtId) -> NodeId {
        let stmt = self.file.stmt(id);
        let location = stmt.location;
        match stmt.kind.clone() {
            StmtKind::Block(stmts) => {
                let compound = self.push_node("block", location, NodeKind::Compound { statements: vec![] });
                self.scope.enter_scope(compound, ScopeKind::Block, None);
                let lowered: Vec<_> = stmts.into_iter().map(|s| self.lower_stmt(s)).collect();
                if let NodeKind::Compound { statements } = self.graph.kind_mut(compound) {
                    *statements = lowered;
                }
                self.scope.leave_scope(compound, self.diagnostics);
                compound
            }
            StmtKind::ExprStmt(expr) => self.lower_expr(expr),
            StmtKind::DeclStmt(decls) => {
                let declarations: Vec<_> = decls.iter().flat_map(|d| self.lower_local_var_decl(d)).collect();
                if declarations.len() == 1 {
                    declarations[0]
                } else {
                    self.push_node("decl", location, NodeKind::DeclarationStatement { declarations })
                }
            }
            StmtKind::Assign { token, lhs, rhs } => self.lower_assign(token, &lhs, &rhs, location),
            StmtKind::If { condition, then_branch, else_branch } => {
                let condition = self.lower_expr(condition);
                let then_branch = self.lower_stmt(then_branch);
                let else_branch = else_branch.map(|e| self.lower_stmt(e));
                self.push_node("if", location, NodeKind::If { condition, then_branch, else_branch })
            }
            StmtKind::For { init, condition, post, body } => {
                let placeholder = self.push_node("for-body-placeholder", None, NodeKind::Compound { statements: vec![] });
                let for_node = self.push_node("for", location, NodeKind::For { init: None, condition: None, post: None, body: placeholder });
                self.scope.enter_scope(for_node, ScopeKind::Loop, None);
                let init = init.map(|i| self.lower_stmt(i));
                let condition = condition.map(|c| self.lower_expr(c));
                let post = post.map(|p| self.lower_stmt(p));
                let body = self.lower_stmt(body);
                if let NodeKind::For { init: i, condition: c, post: p, body: b } = self.graph.kind_mut(for_node) {
                    *i = init;
                    *c = condition;
                    *p = post;
                    *b = body;
                }
                self.scope.leave_scope(for_node, self.diagnostics);
                for_node
            }
            StmtKind::ForRange { token, key, value, iterable, body } => self.lower_for_range(token, key, value, iterable, body, location),
            StmtKind::Switch { tag, cases } => {
                let tag = tag.map(|t| self.lower_expr(t));
                let switch_node = self.push_node("switch", location, NodeKind::Switch { tag, cases: vec![] });
                self.scope.enter_scope(switch_node, ScopeKind::Switch, None);
                let case_nodes: Vec<_> = cases
                    .iter()
                    .map(|case| {
                        let body: Vec<_> = case.body.iter().map(|&s| self.lower_stmt(s)).collect();
                        if case.values.is_empty() {
                            self.push_node("default", None, NodeKind::Default { body })
                        } else {
                            let values: Vec<_> = case.values.iter().map(|&v| self.lower_expr(v)).collect();
                            self.push_node("case", None, NodeKind::Case { values, body })
                        }
                    })
                    .collect();
                if let NodeKind::Switch { cases, .. } = self.graph.kind_mut(switch_node) {
                    *cases = case_nodes;
                }
                self.scope.leave_scope(switch_node, self.diagnostics);
                switch_node
            }
            StmtKind::Return(values) => {
                let values: Vec<_> = values.iter().map(|&v| self.lower_expr(v)).collect();
                let values = if values.len() > 1 {
                    let tuple = self.push_node("tuple", location, NodeKind::Tuple { elements: values });
                    vec![tuple]
                } else {
                    values
                };
                self.push_node("return", location, NodeKind::Return { values })
            }
            StmtKind::Go(expr) => self.lower_expr(expr),
            StmtKind::Break(label) => {
                let label = label.map(|n| self.resolve_name(n));
                self.push_node("break", location, NodeKind::Break { label })
            }
            StmtKind::Continue(label) => {
                let label = label.map(|n| self.resolve_name(n));
                self.push_node("continue", location, NodeKind::Continue { label })
            }
            StmtKind::Labeled { label, stmt } => {
                let statement = self.lower_stmt(stmt);
                let name = self.resolve_name(label);
                self.push_node(name, location, NodeKind::Label { statement })
            }
        }
    }

    fn lower_local_var_decl(&mut self, decl: &LocalVarDecl) -> Vec<NodeId> {
        let explicit_ty = decl.type_expr.map(|t| self.lower_type(t));
        decl.names
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let initializer = decl.values.get(i).map(|&v| self.lower_expr(v));
                let ty = explicit_ty.unwrap_or_else(|| initializer.map_or_else(|| self.graph.types().unknown(), |init| self.ty_of(init)));
                let var = self.push_node(self.resolve_name(n), None, NodeKind::Variable { ty, initializer });
                self.scope.add_declaration(self.graph, var, true);
                var
            })
            .collect()
    }

    /// `lhs.len() > 1 && rhs.len() == 1` is a genuine multi-return
    /// destructure: each target becomes a `DestructureTuple` over the single
    /// call. Anything else (including `x, y := 1, 2`) is elementwise.
    fn lower_assign(&mut self, token: AssignToken, lhs: &[cpg_ast::AstExprId], rhs: &[cpg_ast::AstExprId], location: Option<cpg_ir::Location>) -> NodeId {
        let is_destructure = lhs.len() > 1 && rhs.len() == 1;

        if is_destructure {
            let tuple_expr = self.lower_expr(rhs[0]);
            let ty = self.graph.types().unknown();
            if token == AssignToken::Define {
                let declarations: Vec<_> = lhs
                    .iter()
                    .enumerate()
                    .map(|(index, &target)| {
                        let name = self.ident_name(target);
                        let destructure = self.push_node("destructure", location, NodeKind::DestructureTuple { index: index as u32, tuple_expr });
                        let var = self.push_node(name, location, NodeKind::Variable { ty, initializer: Some(destructure) });
                        self.scope.add_declaration(self.graph, var, true);
                        var
                    })
                    .collect();
                return self.push_node("decl", location, NodeKind::DeclarationStatement { declarations });
            }
            let assigns: Vec<_> = lhs
                .iter()
                .enumerate()
                .map(|(index, &target)| {
                    let lhs_node = self.lower_expr(target);
                    let destructure = self.push_node("destructure", location, NodeKind::DestructureTuple { index: index as u32, tuple_expr });
                    self.push_node("assign", location, NodeKind::Binary { op: BinaryOperator::Assign, lhs: lhs_node, rhs: destructure, ty })
                })
                .collect();
            return self.push_node("block", location, NodeKind::Compound { statements: assigns });
        }

        if token == AssignToken::Define {
            let declarations: Vec<_> = lhs
                .iter()
                .zip(rhs.iter())
                .map(|(&target, &value)| {
                    let name = self.ident_name(target);
                    let value_node = self.lower_expr(value);
                    let ty = self.ty_of(value_node);
                    let var = self.push_node(name, location, NodeKind::Variable { ty, initializer: Some(value_node) });
                    self.scope.add_declaration(self.graph, var, true);
                    var
                })
                .collect();
            return if declarations.len() == 1 {
                declarations[0]
            } else {
                self.push_node("decl", location, NodeKind::DeclarationStatement { declarations })
            };
        }

        let ty = self.graph.types().unknown();
        let assigns: Vec<_> = lhs
            .iter()
            .zip(rhs.iter())
            .map(|(&target, &value)| {
                let lhs_node = self.lower_expr(target);
                let rhs_node = self.lower_expr(value);
                self.push_node("assign", location, NodeKind::Binary { op: BinaryOperator::Assign, lhs: lhs_node, rhs: rhs_node, ty })
            })
            .collect();
        if assigns.len() == 1 {
            assigns[0]
        } else {
            self.push_node("block", location, NodeKind::Compound { statements: assigns })
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn lower_for_range(
        &mut self,
        token: AssignToken,
        key: Option<cpg_ast::AstExprId>,
        value: Option<cpg_ast::AstExprId>,
        iterable: cpg_ast::AstExprId,
        body: AstStmtId,
        location: Option<cpg_ir::Location>,
    ) -> NodeId {
        let iterable = self.lower_expr(iterable);
        let placeholder = self.push_node("for-range-body-placeholder", None, NodeKind::Compound { statements: vec![] });
        let for_node = self.push_node("for-range", location, NodeKind::ForEach { key: None, value: None, iterable, body: placeholder });
        self.scope.enter_scope(for_node, ScopeKind::Loop, None);
        let ty = self.graph.types().unknown();

        let key_node = key.map(|k| self.lower_range_binding(token, k, ty));
        let value_node = value.map(|v| self.lower_range_binding(token, v, ty));
        let body_node = self.lower_stmt(body);

        if let NodeKind::ForEach { key, value, body, .. } = self.graph.kind_mut(for_node) {
            *key = key_node;
            *value = value_node;
            *body = body_node;
        }
        self.scope.leave_scope(for_node, self.diagnostics);
        for_node
    }

    fn lower_range_binding(&mut self, token: AssignToken, expr: cpg_ast::AstExprId, ty: cpg_ir::TypeIdx) -> NodeId {
        if token == AssignToken::Define {
            let name = self.ident_name(expr);
            let var = self.push_node(name, None, NodeKind::Variable { ty, initializer: None });
            self.scope.add_declaration(self.graph, var, true);
            var
        } else {
            self.lower_expr(expr)
        }
    }

    /// The bare identifier name of a `:=` target. Go guarantees the parser
    /// only ever hands an `Ident` here; a non-ident target is a malformed
    /// input the oracle should never produce, so it degrades to an empty
    /// name rather than panicking.
    fn ident_name(&self, expr: cpg_ast::AstExprId) -> String {
        match &self.file.expr(expr).kind {
            ExprKind::Ident(n) => self.resolve_name(*n),
            _ => String::new(),
        }
    }
}
