//! The implementer-owned knobs `spec.md` §9's Open Questions left to the
//! core: the function-pointer ambiguity cap and whether unresolved member
//! expressions get an inferred field rather than a diagnostic.

use cpg_resolver::PipelineConfig;

#[derive(Copy, Clone, Debug)]
pub struct Config {
    /// `spec.md` §4.4 Pass 5: candidate sets above this size are abandoned
    /// rather than guessed at. Default 3.
    pub function_pointer_ambiguity_cap: usize,
    /// Whether Pass 3 synthesizes an inferred `Field` for a record member
    /// expression that otherwise resolves to nothing.
    pub infer_unresolved_members: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            function_pointer_ambiguity_cap: 3,
            infer_unresolved_members: true,
        }
    }
}

impl From<Config> for PipelineConfig {
    fn from(config: Config) -> Self {
        PipelineConfig {
            function_pointer_ambiguity_cap: config.function_pointer_ambiguity_cap,
            infer_unresolved_members: config.infer_unresolved_members,
        }
    }
}
