//! Expression AST consumed by `cpg_frontend_go::lower::expr`.

use cpg_ir::{BinaryOperator, LiteralValue, Name, UnaryOperator};

use crate::ids::{AstExprId, AstStmtId, TypeExprId};

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(LiteralValue),
    /// A bare identifier: a local variable, parameter, or top-level name.
    Ident(Name),
    /// `base.name` — the frontend decides at lowering time whether this is
    /// a package-qualified selector (`base` matches an import) or a member
    /// access, per the lowering contract.
    Selector {
        base: AstExprId,
        name: Name,
    },
    Index {
        base: AstExprId,
        index: AstExprId,
    },
    Call {
        callee: AstExprId,
        args: Vec<AstExprId>,
    },
    Binary {
        op: BinaryOperator,
        lhs: AstExprId,
        rhs: AstExprId,
    },
    Unary {
        op: UnaryOperator,
        operand: AstExprId,
    },
    /// `new(T)`.
    New {
        type_expr: TypeExprId,
    },
    /// `make(T, args...)`.
    Make {
        type_expr: TypeExprId,
        args: Vec<AstExprId>,
    },
    /// `expr.(T)`.
    TypeAssert {
        expr: AstExprId,
        type_expr: TypeExprId,
    },
    /// A composite literal, e.g. `T{a: 1, b: 2}` or `[]int{1, 2, 3}`. A
    /// missing `type_expr` means the element type is inferred from context
    /// (an elided literal nested inside another composite literal).
    CompositeLit {
        type_expr: Option<TypeExprId>,
        elements: Vec<CompositeElement>,
    },
    /// A function literal, lowered as an anonymous `Function` wrapped in a
    /// `Lambda` expression.
    FuncLit(FuncLit),
}

#[derive(Clone, Debug)]
pub enum CompositeElement {
    Positional(AstExprId),
    KeyValue { key: AstExprId, value: AstExprId },
}

#[derive(Clone, Debug)]
pub struct FuncLit {
    pub params: Vec<ParamSpec>,
    pub results: Vec<TypeExprId>,
    pub body: AstStmtId,
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: Option<Name>,
    pub type_expr: TypeExprId,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Option<cpg_ir::Location>,
}
