//! Graph node model: a closed, tagged-variant algebra rather than a class
//! hierarchy, per the design note on polymorphism. Shared behaviour (naming,
//! location, comment, language) lives once in [`NodeHeader`]; everything
//! variant-specific lives in [`NodeKind`].

use crate::span::Location;
use crate::types::TypeIdx;

/// Arena index into [`crate::graph::Graph`]. Stable for the lifetime of a
/// run; nodes are never deleted, only appended and mutated in place.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The source language a node originated from. A multi-lingual engine tags
/// every node so downstream queries can filter by frontend.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Language(pub &'static str);

impl Language {
    pub const GO: Language = Language("go");
}

/// Header shared by every node: identity, name, location, comment, language.
#[derive(Clone, Debug)]
pub struct NodeHeader {
    pub id: NodeId,
    pub name: String,
    pub location: Option<Location>,
    pub comment: Option<String>,
    pub language: Language,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RecordKind {
    Struct,
    Interface,
    TypeAlias,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOperator {
    Neg,
    Not,
    BitNot,
    Deref,
    AddressOf,
    Recv,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LiteralValue {
    Int(i64),
    /// Bits of an f64, so the value hashes and equality-compares exactly.
    Float(u64),
    Bool(bool),
    Str(String),
    Rune(char),
    Nil,
}

/// Every declaration, statement, and expression variant named in `spec.md`
/// §3. Children are stored as [`NodeId`] lists/fields inline — there is no
/// separate AST-edge table; [`crate::graph::Graph::ast_children`] derives
/// the parent→child edge view from these fields on demand.
#[derive(Clone, Debug)]
pub enum NodeKind {
    // ---- Declarations ----
    TranslationUnit {
        namespaces: Vec<NodeId>,
        includes: Vec<NodeId>,
    },
    Namespace {
        declarations: Vec<NodeId>,
    },
    Record {
        kind: RecordKind,
        fields: Vec<NodeId>,
        methods: Vec<NodeId>,
        super_types: Vec<TypeIdx>,
        implemented_interfaces: Vec<TypeIdx>,
        /// Only meaningful when `kind == TypeAlias`.
        alias_target: Option<TypeIdx>,
        is_inferred: bool,
    },
    Function {
        params: Vec<NodeId>,
        /// `Some` makes this node a Method (a Function with a Receiver
        /// variable), per the data-model invariant that Method is a
        /// Function variant rather than a separate node kind.
        receiver: Option<NodeId>,
        return_types: Vec<TypeIdx>,
        body: Option<NodeId>,
        ty: TypeIdx,
        is_inferred: bool,
    },
    ParamVariable {
        ty: TypeIdx,
    },
    Variable {
        ty: TypeIdx,
        initializer: Option<NodeId>,
    },
    Field {
        ty: TypeIdx,
        embedded: bool,
        is_inferred: bool,
    },
    Include {
        import_path: String,
    },
    Problem {
        message: String,
    },

    // ---- Statements ----
    Compound {
        statements: Vec<NodeId>,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        condition: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    ForEach {
        key: Option<NodeId>,
        value: Option<NodeId>,
        iterable: NodeId,
        body: NodeId,
    },
    Switch {
        tag: Option<NodeId>,
        cases: Vec<NodeId>,
    },
    Case {
        values: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    Default {
        body: Vec<NodeId>,
    },
    Return {
        values: Vec<NodeId>,
    },
    DeclarationStatement {
        declarations: Vec<NodeId>,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Label {
        statement: NodeId,
    },

    // ---- Expressions ----
    Literal {
        ty: TypeIdx,
        value: LiteralValue,
    },
    DeclaredReference {
        ty: TypeIdx,
        fqn: Option<String>,
        refers_to: Option<NodeId>,
    },
    Member {
        base: NodeId,
        member_name: String,
        ty: TypeIdx,
        refers_to: Option<NodeId>,
    },
    MemberCall {
        base: NodeId,
        method_name: String,
        args: Vec<NodeId>,
        ty: TypeIdx,
        invokes: Vec<NodeId>,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
        ty: TypeIdx,
        invokes: Vec<NodeId>,
    },
    Binary {
        op: BinaryOperator,
        lhs: NodeId,
        rhs: NodeId,
        ty: TypeIdx,
    },
    Unary {
        op: UnaryOperator,
        operand: NodeId,
        ty: TypeIdx,
    },
    Cast {
        cast_type: TypeIdx,
        inner: NodeId,
    },
    TypeAssert {
        asserted_type: TypeIdx,
        inner: NodeId,
    },
    New {
        target_type: TypeIdx,
        initializer: NodeId,
    },
    ArrayCreation {
        element_type: TypeIdx,
        dimensions: Vec<NodeId>,
    },
    Construct {
        ty: TypeIdx,
        args: Vec<NodeId>,
    },
    InitializerList {
        ty: TypeIdx,
        elements: Vec<NodeId>,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
    },
    Tuple {
        elements: Vec<NodeId>,
    },
    DestructureTuple {
        index: u32,
        tuple_expr: NodeId,
    },
    Lambda {
        function: NodeId,
    },
}

impl NodeKind {
    /// The AST parent→child view, derived on demand rather than stored
    /// redundantly (design note: "arena of nodes with stable indices plus
    /// adjacency stored as index vectors").
    pub fn ast_children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::TranslationUnit { namespaces, includes } => {
                let mut v = includes.clone();
                v.extend(namespaces.iter().copied());
                v
            }
            NodeKind::Namespace { declarations } => declarations.clone(),
            NodeKind::Record { fields, methods, .. } => {
                let mut v = fields.clone();
                v.extend(methods.iter().copied());
                v
            }
            NodeKind::Function { params, receiver, body, .. } => {
                let mut v = params.clone();
                v.extend(receiver.iter().copied());
                v.extend(body.iter().copied());
                v
            }
            NodeKind::ParamVariable { .. }
            | NodeKind::Field { .. }
            | NodeKind::Include { .. }
            | NodeKind::Problem { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Literal { .. }
            | NodeKind::DeclaredReference { .. } => Vec::new(),
            NodeKind::Variable { initializer, .. } => initializer.iter().copied().collect(),
            NodeKind::Compound { statements } => statements.clone(),
            NodeKind::If { condition, then_branch, else_branch } => {
                let mut v = vec![*condition, *then_branch];
                v.extend(else_branch.iter().copied());
                v
            }
            NodeKind::For { init, condition, post, body } => {
                let mut v = Vec::new();
                v.extend(init.iter().copied());
                v.extend(condition.iter().copied());
                v.extend(post.iter().copied());
                v.push(*body);
                v
            }
            NodeKind::ForEach { key, value, iterable, body } => {
                let mut v = Vec::new();
                v.extend(key.iter().copied());
                v.extend(value.iter().copied());
                v.push(*iterable);
                v.push(*body);
                v
            }
            NodeKind::Switch { tag, cases } => {
                let mut v = Vec::new();
                v.extend(tag.iter().copied());
                v.extend(cases.iter().copied());
                v
            }
            NodeKind::Case { values, body } => {
                let mut v = values.clone();
                v.extend(body.iter().copied());
                v
            }
            NodeKind::Default { body } => body.clone(),
            NodeKind::Return { values } => values.clone(),
            NodeKind::DeclarationStatement { declarations } => declarations.clone(),
            NodeKind::Label { statement } => vec![*statement],
            NodeKind::Member { base, .. } => vec![*base],
            NodeKind::MemberCall { base, args, .. } => {
                let mut v = vec![*base];
                v.extend(args.iter().copied());
                v
            }
            NodeKind::Call { callee, args, .. } => {
                let mut v = vec![*callee];
                v.extend(args.iter().copied());
                v
            }
            NodeKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Cast { inner, .. } | NodeKind::TypeAssert { inner, .. } => vec![*inner],
            NodeKind::New { initializer, .. } => vec![*initializer],
            NodeKind::ArrayCreation { dimensions, .. } => dimensions.clone(),
            NodeKind::Construct { args, .. } => args.clone(),
            NodeKind::InitializerList { elements, .. } => elements.clone(),
            NodeKind::KeyValue { key, value } => vec![*key, *value],
            NodeKind::Tuple { elements } => elements.clone(),
            NodeKind::DestructureTuple { tuple_expr, .. } => vec![*tuple_expr],
            NodeKind::Lambda { function } => vec![*function],
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, NodeKind::Record { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, NodeKind::Function { .. })
    }

    pub fn is_method(&self) -> bool {
        matches!(self, NodeKind::Function { receiver: Some(_), .. })
    }
}
