//! CPG IR — graph model, type system, and interning.
//!
//! This crate contains the core data structures for the graph the rest of
//! the engine assembles and resolves:
//! - Spans and file-qualified locations
//! - Interned simple names
//! - The type value model (`Ty`) and its interning registry
//! - The tagged-variant node algebra (declarations/statements/expressions)
//! - The graph itself, including the relations allowed to cycle (DFG,
//!   `implements`, structural subtyping, `possibleSubTypes` widening)
//!
//! # Design Philosophy
//!
//! - **Intern types, not nodes.** Types are value-compared and deduplicated
//!   through one registry per run; nodes are identity-compared and never
//!   deduplicated.
//! - **Flatten everything.** No `Box<Node>` — children are `NodeId` indices
//!   into one flat arena, so the graph can contain cycles (DFG, refers-to)
//!   without fighting the borrow checker.
//! - **Closed algebra.** Node kinds are a fixed `enum`, not a trait-object
//!   hierarchy — every consumer pattern-matches exhaustively.

mod arena_id;
mod graph;
mod interner;
mod name;
mod node;
mod span;
mod type_parser;
mod type_registry;
mod types;

pub use graph::Graph;
pub use interner::StringInterner;
pub use name::Name;
pub use node::{
    BinaryOperator, Language, LiteralValue, NodeHeader, NodeId, NodeKind, RecordKind,
    UnaryOperator,
};
pub use span::{FileId, FileTable, Location, Span};
pub use type_parser::{parse_type_text, TypeParseError};
pub use type_registry::TypeRegistry;
pub use types::{
    display as display_type, function_canonical_name, is_builtin_type_name, FunctionType,
    ObjectType, PointerOrigin, PointerType, Ty, TupleType, BUILTIN_TYPE_NAMES,
};
pub use types::TypeIdx;
