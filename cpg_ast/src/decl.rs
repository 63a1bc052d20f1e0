//! Top-level declaration AST consumed by `cpg_frontend_go::lower::decl`.

use cpg_ir::Name;

use crate::ids::{AstExprId, AstStmtId, TypeExprId};

#[derive(Clone, Debug)]
pub enum TopLevelDecl {
    Function(FuncDecl),
    Type(TypeDecl),
    Var(TopLevelVarDecl),
    Const(TopLevelVarDecl),
}

#[derive(Clone, Debug)]
pub struct ReceiverSpec {
    pub name: Option<Name>,
    pub type_expr: TypeExprId,
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: Option<Name>,
    pub type_expr: TypeExprId,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Name,
    /// `Some` makes this a method declaration; absent, a free function.
    pub receiver: Option<ReceiverSpec>,
    pub params: Vec<ParamSpec>,
    pub results: Vec<TypeExprId>,
    /// Absent for an external/forward-declared function.
    pub body: Option<AstStmtId>,
    pub location: Option<cpg_ir::Location>,
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    /// `None` marks an embedded field: the field's simple name is derived
    /// from its type by the frontend.
    pub name: Option<Name>,
    pub type_expr: TypeExprId,
    pub embedded: bool,
    pub location: Option<cpg_ir::Location>,
}

#[derive(Clone, Debug)]
pub struct InterfaceMethodSpec {
    pub name: Name,
    pub params: Vec<TypeExprId>,
    pub results: Vec<TypeExprId>,
}

#[derive(Clone, Debug)]
pub enum TypeSpec {
    Struct {
        fields: Vec<FieldSpec>,
    },
    Interface {
        methods: Vec<InterfaceMethodSpec>,
        /// Embedded interfaces, contributing their required methods.
        embeds: Vec<TypeExprId>,
    },
    Alias {
        target: TypeExprId,
    },
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Name,
    pub spec: TypeSpec,
    pub location: Option<cpg_ir::Location>,
}

#[derive(Clone, Debug)]
pub struct TopLevelVarDecl {
    pub names: Vec<Name>,
    pub type_expr: Option<TypeExprId>,
    pub values: Vec<AstExprId>,
    pub location: Option<cpg_ir::Location>,
}
