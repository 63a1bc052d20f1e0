//! The abstract parse tree for one source file: `SourceFile { package_name,
//! imports, decls }` per the external parser-oracle contract, plus the
//! expression/statement/type-expression arenas the rest of this crate's ids
//! index into.

use cpg_ir::Name;

use crate::decl::TopLevelDecl;
use crate::expr::Expr;
use crate::ids::{AstExprId, AstStmtId, TypeExprId};
use crate::stmt::Stmt;

/// How a package was named in an `import` clause, in the priority order the
/// frontend applies when it needs a display/include name for the import:
/// local alias, then the imported package's own self-reported name, then the
/// last path segment (computed by the frontend, not stored here).
#[derive(Clone, Debug)]
pub struct ImportSpec {
    pub path: String,
    pub alias: Option<Name>,
    /// The imported package's own declared name, when the oracle already
    /// knows it (it parsed that package too). `None` for packages outside
    /// the project the oracle hasn't resolved.
    pub package_name_hint: Option<Name>,
}

/// One parsed translation unit, built by a caller's parser and type-checker
/// and handed to the frontend. Hand-built directly in tests; produced by a
/// real parser in production.
#[derive(Clone, Debug, Default)]
pub struct SourceFile {
    pub package_name: Name,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<TopLevelDecl>,

    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    type_exprs: Vec<String>,
}

impl SourceFile {
    pub fn new(package_name: Name) -> Self {
        SourceFile {
            package_name,
            imports: Vec::new(),
            decls: Vec::new(),
            exprs: Vec::new(),
            stmts: Vec::new(),
            type_exprs: Vec::new(),
        }
    }

    pub fn push_expr(&mut self, expr: Expr) -> AstExprId {
        let id = AstExprId(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn push_stmt(&mut self, stmt: Stmt) -> AstStmtId {
        let id = AstStmtId(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    /// Intern a type expression's source text. The frontend parses this
    /// text via `cpg_ir::parse_type_text` rather than walking a second
    /// type-syntax tree.
    pub fn push_type_expr(&mut self, text: impl Into<String>) -> TypeExprId {
        let id = TypeExprId(self.type_exprs.len() as u32);
        self.type_exprs.push(text.into());
        id
    }

    pub fn expr(&self, id: AstExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn stmt(&self, id: AstStmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn type_expr_text(&self, id: TypeExprId) -> &str {
        &self.type_exprs[id.0 as usize]
    }
}
