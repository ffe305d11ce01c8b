//! Go source scanning: locate top-level `string` variables that should receive
//! build metadata through `go build -ldflags "-X ..."`.
//!
//! - [`TargetDictionary`] decides which variable names matter;
//! - [`Scanner`] classifies the declarations of a single file;
//! - [`scan_tree`] walks a whole tree concurrently and aggregates results.

mod ast;
pub mod dictionary;
pub mod errors;
pub mod scanner;
pub mod types;
pub mod walker;

pub use ast::{DeclarationExtractor, GoAst, SourceDecls, VarDecl};
pub use dictionary::{TargetDictionary, parse_mapping};
pub use errors::{Error, Result, ScanError, TreeScanError};
pub use scanner::Scanner;
pub use types::{GeneratorKind, Target};
pub use walker::{TreeScan, scan_tree};
