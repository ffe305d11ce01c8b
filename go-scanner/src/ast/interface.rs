use crate::errors::Result;

/// One declared variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    /// Source text of the explicit type, `None` when the type is inferred.
    pub declared_type: Option<String>,
    /// Declared at file scope rather than inside a function body.
    pub top_level: bool,
    /// Byte offset of the name in the source.
    pub offset: usize,
}

/// Everything the scanner needs from one parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDecls {
    /// Name from the file's `package` clause.
    pub package: String,
    /// Variable declarations in source order.
    pub vars: Vec<VarDecl>,
}

pub trait DeclarationExtractor: Send + Sync {
    /// Parse a single source file and list its variable declarations.
    fn extract(&self, code: &str) -> Result<SourceDecls>;
}
