//! Go AST module (tree-sitter based).
//!
//! Files:
//! - `interface.rs`: `DeclarationExtractor` seam and the declaration records it yields.
//! - `lang.rs`: language handle for tree-sitter-go.
//! - `go.rs`: `GoAst`, the tree-sitter implementation of the seam.

pub use go::GoAst;
pub use interface::{DeclarationExtractor, SourceDecls, VarDecl};

mod go;
mod interface;
mod lang;
