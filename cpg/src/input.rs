//! One project's worth of already-parsed files, handed to the driver.
//! Parsing itself (and per-expression type info) stays external — this is
//! just the bundle a caller's parser/type-checker produces per file.

use cpg_ast::{CommentMap, SourceFile, TypeInfoOracle};

/// One source file plus its comments and per-expression type oracle.
/// `relative_path` is slash-separated and relative to the project root
/// (e.g. `"widgets/widget.go"`); the driver derives the file's import path
/// from its directory component.
pub struct ProjectFile {
    pub relative_path: String,
    pub file: SourceFile,
    pub comments: CommentMap,
    pub oracle: Box<dyn TypeInfoOracle>,
}

/// A whole project: its root (passed to the module-descriptor loader) and
/// every file in it. `interner` is shared so a `Name` means the same thing
/// across every file's declarations.
pub struct ProjectInput {
    pub root: String,
    pub interner: cpg_ir::StringInterner,
    pub files: Vec<ProjectFile>,
}
