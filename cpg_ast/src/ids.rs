//! Arena indices into a [`crate::SourceFile`]'s expression/statement/type
//! tables. Mirrors the id-indexed style the graph itself uses
//! (`cpg_ir::NodeId`) rather than `Box`-ed trees, so a hand-built fixture and
//! a production parser's output look the same to the frontend.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct AstExprId(pub u32);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct AstStmtId(pub u32);

/// Index into [`crate::SourceFile::type_exprs`]. The grammar behind the
/// stored text is the textual type-expression form `cpg_ir::type_parser`
/// already parses, so the frontend lowers a type expression by handing the
/// text straight to `cpg_ir::parse_type_text` rather than re-walking a
/// second type-syntax tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct TypeExprId(pub u32);

/// Key for [`crate::CommentMap`] lookups; a node may be an expression, a
/// statement, or a top-level declaration (by its index in
/// `SourceFile::decls`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AstNodeKey {
    Expr(AstExprId),
    Stmt(AstStmtId),
    TopLevel(usize),
}
