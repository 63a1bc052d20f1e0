//! The type-info half of the external parser/type-checker contract: the
//! frontend asks the oracle for an expression's static type instead of
//! inferring it itself (type inference/checking stays a Non-goal).

use crate::ids::AstExprId;

/// An expression's static type as reported by the caller's type checker,
/// in the textual form `cpg_ir::parse_type_text` accepts. `Unknown` is a
/// legitimate answer, not an error: the frontend widens it to
/// `cpg_ir::TypeRegistry::unknown()` and the resolver's deferred-queue
/// machinery takes it from there.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TypeDescriptor {
    Known(String),
    Unknown,
}

/// Per-file type information, supplied alongside a [`crate::SourceFile`].
/// Implemented by a caller's type checker; the frontend only ever calls
/// `type_of`.
pub trait TypeInfoOracle {
    fn type_of(&self, expr: AstExprId) -> TypeDescriptor;
}

/// An oracle with no type information at all — every expression is
/// `Unknown`. Useful for fixtures that only exercise structural lowering.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTypeInfo;

impl TypeInfoOracle for NoTypeInfo {
    fn type_of(&self, _expr: AstExprId) -> TypeDescriptor {
        TypeDescriptor::Unknown
    }
}
