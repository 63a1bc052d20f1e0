//! Comment map: associates AST nodes with their surrounding comment groups,
//! already concatenated into one string per node by the oracle. The
//! frontend consults this once per node, at the point it creates the
//! matching graph node, and never re-derives comments from source text
//! itself.

use rustc_hash::FxHashMap;

use crate::ids::AstNodeKey;

#[derive(Clone, Debug, Default)]
pub struct CommentMap {
    comments: FxHashMap<AstNodeKey, String>,
}

impl CommentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AstNodeKey, comment: impl Into<String>) {
        self.comments.insert(key, comment.into());
    }

    pub fn get(&self, key: AstNodeKey) -> Option<&str> {
        self.comments.get(&key).map(String::as_str)
    }
}
