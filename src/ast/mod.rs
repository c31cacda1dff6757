//! Abstract syntax tree model (module A).
//!
//! A tagged tree of program constructs. The parser that builds trees of this
//! shape is not part of this crate (see `SPEC_FULL.md` §8); tests and the
//! CLI's `--ast` flag construct or deserialize `AstNode` values directly.

mod node;

pub use node::{
    AstNode, BinaryOp, DataType, NodeKind, UnaryOp,
};

/// Thin wrapper around the tree root, mirroring the rest of the pipeline's
/// convention of passing the whole program around as one value instead of a
/// bare node.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AbstractSyntaxTree {
    root: AstNode,
}

impl AbstractSyntaxTree {
    pub fn new(root: AstNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &AstNode {
        &self.root
    }

    pub fn into_root(self) -> AstNode {
        self.root
    }
}
