//! The external parser/type-checker contract the frontend consumes.
//!
//! This crate does not parse anything. It defines the shape a caller's
//! parser must hand to `cpg_frontend_go`: an abstract [`SourceFile`] tree,
//! a [`CommentMap`], a [`oracle::TypeInfoOracle`], and a
//! [`module::ModuleDescriptorLoader`]. Tests elsewhere in this workspace
//! build `SourceFile`s by hand with the arena API below; a production
//! caller plugs in a real tree-sitter/pest/hand-rolled parser instead.

mod comment;
mod decl;
mod expr;
mod ids;
mod module;
mod oracle;
mod source_file;
mod stmt;

pub use comment::CommentMap;
pub use decl::{
    FieldSpec, FuncDecl, InterfaceMethodSpec, ParamSpec as DeclParamSpec, ReceiverSpec,
    TopLevelDecl, TopLevelVarDecl, TypeDecl, TypeSpec,
};
pub use expr::{CompositeElement, Expr, ExprKind, FuncLit, ParamSpec};
pub use ids::{AstExprId, AstNodeKey, AstStmtId, TypeExprId};
pub use module::{ModuleDescriptor, ModuleDescriptorError, ModuleDescriptorLoader, NoModuleDescriptor};
pub use oracle::{NoTypeInfo, TypeDescriptor, TypeInfoOracle};
pub use source_file::{ImportSpec, SourceFile};
pub use stmt::{AssignToken, LocalVarDecl, Stmt, StmtKind, SwitchCase};

#[cfg(test)]
mod tests {
    use cpg_ir::{LiteralValue, Name};

    use super::*;

    #[test]
    fn hand_built_fixture_round_trips_through_the_arena() {
        let mut file = SourceFile::new(Name::EMPTY);
        let one = file.push_expr(Expr {
            kind: ExprKind::Literal(LiteralValue::Int(1)),
            location: None,
        });
        let ret = file.push_stmt(Stmt {
            kind: StmtKind::Return(vec![one]),
            location: None,
        });
        let int_ty = file.push_type_expr("int");

        match file.expr(one).kind {
            ExprKind::Literal(LiteralValue::Int(1)) => {}
            _ => unreachable!(),
        }
        match &file.stmt(ret).kind {
            StmtKind::Return(values) => assert_eq!(values, &[one]),
            _ => unreachable!(),
        }
        assert_eq!(file.type_expr_text(int_ty), "int");
    }

    #[test]
    fn no_type_info_oracle_reports_unknown() {
        let oracle = NoTypeInfo;
        assert_eq!(oracle.type_of(AstExprId(0)), TypeDescriptor::Unknown);
    }

    #[test]
    fn no_module_descriptor_forces_fallback() {
        let loader = NoModuleDescriptor;
        assert_eq!(loader.load("/project").unwrap(), None);
    }
}
