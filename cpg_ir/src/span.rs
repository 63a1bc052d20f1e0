//! Source location spans and file-qualified locations.

use std::fmt;

/// A byte-offset span within a single file.
///
/// Layout mirrors a flat 8-byte pair so it is cheap to copy and compare.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Interned identifier for a source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(transparent)]
pub struct FileId(pub u32);

/// A bidirectional table from file path to [`FileId`].
///
/// One table per project run, owned by whichever component first sees a
/// file path (the frontend's per-project driver).
#[derive(Clone, Debug, Default)]
pub struct FileTable {
    paths: Vec<String>,
    by_path: rustc_hash::FxHashMap<String, FileId>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, path: impl Into<String>) -> FileId {
        let path = path.into();
        if let Some(id) = self.by_path.get(&path) {
            return *id;
        }
        let id = FileId(crate::arena_id::to_u32(self.paths.len(), "FileTable"));
        self.by_path.insert(path.clone(), id);
        self.paths.push(path);
        id
    }

    pub fn path(&self, id: FileId) -> &str {
        &self.paths[id.0 as usize]
    }
}

/// A node's full source location: which file, which byte range, and the
/// line/column bounds a human-readable diagnostic would show.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub file: FileId,
    pub span: Span,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.0, self.start_line, self.start_col
        )
    }
}
