//! The five named resolver passes plus the interface-subtyping widening
//! step that runs between Pass 3 and Pass 4.

mod embedded_members;
mod function_pointer;
mod initializer_dfg;
mod interface_impl;
mod resolve_refs;
mod util;

pub use embedded_members::ResolveEmbeddedMembers;
pub use function_pointer::ResolveFunctionPointerCalls;
pub use initializer_dfg::InitializerListDfg;
pub use interface_impl::ResolveInterfaceImplementations;
pub use resolve_refs::{ResolveReferences, WidenInterfaceSubtypes};

use crate::pass::Pass;

/// The passes run by a default project build, in registration order.
/// `crate::pipeline::run` sorts them topologically from their declared
/// `depends_on`, so this order only matters for readability.
pub fn default_passes() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(ResolveInterfaceImplementations),
        Box::new(ResolveEmbeddedMembers),
        Box::new(ResolveReferences),
        Box::new(WidenInterfaceSubtypes),
        Box::new(InitializerListDfg),
        Box::new(ResolveFunctionPointerCalls),
    ]
}
