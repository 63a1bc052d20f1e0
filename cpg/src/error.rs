//! The one error kind a caller can get back from the driver itself
//! (`spec.md` §7 kind 2); every other soft failure becomes a diagnostic
//! rather than a `Result::Err` (`spec.md` §4.5, §7).

use std::fmt;

use cpg_ast::ModuleDescriptorError;

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CoreError {
    ModuleDescriptor(ModuleDescriptorError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::ModuleDescriptor(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {}
