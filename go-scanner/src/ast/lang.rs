//! Language hook for the Go grammar.

use tree_sitter::Language;

/// Return the Go language for tree-sitter.
/// The grammar crate exposes `LANGUAGE` convertible into `tree_sitter::Language`.
#[inline]
pub fn language() -> Language {
    let lang: Language = tree_sitter_go::LANGUAGE.into();
    lang
}
