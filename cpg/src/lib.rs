//! Project driver for the CPG construction engine.
//!
//! Wires the pieces the other crates provide — `cpg_frontend_go`'s
//! two-phase lowering, `cpg_resolver`'s pipeline — into one entry point,
//! `build_graph`, that turns a parsed project into a resolved graph.
//! Parsing, module/project discovery, a CLI, and logging sink configuration
//! all stay the caller's job; this crate only assembles what's already
//! been handed to it.

mod config;
mod driver;
mod error;
mod input;

pub use config::Config;
pub use driver::{build_graph, import_path_for, resolve_module_prefix, BuildOutput};
pub use error::CoreError;
pub use input::{ProjectFile, ProjectInput};
