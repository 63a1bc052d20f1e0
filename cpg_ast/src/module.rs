//! Module-descriptor contract: finding and parsing the project's module
//! file (e.g. `go.mod`) is module-discovery territory and stays external;
//! the core only ever consumes the resulting `Option<ModuleDescriptor>`.

/// The canonical import-path prefix for the current project, as declared by
/// its module descriptor.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModuleDescriptor {
    pub canonical_prefix: String,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModuleDescriptorError(pub String);

impl std::fmt::Display for ModuleDescriptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module descriptor error: {}", self.0)
    }
}

impl std::error::Error for ModuleDescriptorError {}

/// Implemented by a caller that knows how to locate and parse a project's
/// module descriptor. The driver downgrades a load failure to a warning and
/// falls back to path-based naming rather than propagating it.
pub trait ModuleDescriptorLoader {
    fn load(&self, project_root: &str) -> Result<Option<ModuleDescriptor>, ModuleDescriptorError>;
}

/// A loader that never finds a descriptor, forcing the path-based-naming
/// fallback. Useful for fixtures and for languages with no module file.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoModuleDescriptor;

impl ModuleDescriptorLoader for NoModuleDescriptor {
    fn load(&self, _project_root: &str) -> Result<Option<ModuleDescriptor>, ModuleDescriptorError> {
        Ok(None)
    }
}
