//! Statement AST consumed by `cpg_frontend_go::lower::stmt`.

use cpg_ir::Name;

use crate::ids::{AstExprId, AstStmtId, TypeExprId};

/// Whether a binding form introduces new names (`:=`) or targets existing
/// ones (`=`). Drives the multi-valued-assignment and `for`-range lowering
/// contracts, which differ only in whether the targets are fresh
/// declarations or references.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignToken {
    Define,
    Assign,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Block(Vec<AstStmtId>),
    ExprStmt(AstExprId),
    /// A local variable/constant declaration group (`var x, y T = ...`).
    DeclStmt(Vec<LocalVarDecl>),
    Assign {
        token: AssignToken,
        lhs: Vec<AstExprId>,
        rhs: Vec<AstExprId>,
    },
    If {
        condition: AstExprId,
        then_branch: AstStmtId,
        else_branch: Option<AstStmtId>,
    },
    For {
        init: Option<AstStmtId>,
        condition: Option<AstExprId>,
        post: Option<AstStmtId>,
        body: AstStmtId,
    },
    ForRange {
        token: AssignToken,
        key: Option<AstExprId>,
        value: Option<AstExprId>,
        iterable: AstExprId,
        body: AstStmtId,
    },
    Switch {
        tag: Option<AstExprId>,
        cases: Vec<SwitchCase>,
    },
    Return(Vec<AstExprId>),
    /// `go f(...)`. Lowered to the bare call; goroutine semantics are
    /// preserved structurally only.
    Go(AstExprId),
    Break(Option<Name>),
    Continue(Option<Name>),
    Labeled {
        label: Name,
        stmt: AstStmtId,
    },
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// Empty values marks the `default` case.
    pub values: Vec<AstExprId>,
    pub body: Vec<AstStmtId>,
}

#[derive(Clone, Debug)]
pub struct LocalVarDecl {
    pub names: Vec<Name>,
    pub type_expr: Option<TypeExprId>,
    pub values: Vec<AstExprId>,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: Option<cpg_ir::Location>,
}
