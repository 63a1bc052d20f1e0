//! Dependency-ordered resolver pipeline.
//!
//! Five named passes, run in an order topologically sorted from their own
//! declared dependencies rather than a hardcoded sequence (`spec.md` §4.4,
//! §9): interface implementation discovery, embedded-member call rewriting,
//! variable/field reference resolution (with a deferred-queue for members
//! whose base type is still unknown), interface-subtyping widening,
//! initializer-list data flow, and function-pointer call binding.

mod pass;
mod pipeline;
mod passes;

pub use pass::{PassContext, PipelineConfig, RecordIndex};
pub use passes::default_passes;
pub use pipeline::run;

pub use pass::Pass;
