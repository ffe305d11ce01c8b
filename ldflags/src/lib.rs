//! Turn scanned targets into a `go build -ldflags` argument.
//!
//! - [`package_path`] resolves the project's root package and rewrites target packages;
//! - [`assemble`] evaluates generators and joins `-X` tokens.

pub mod assemble;
pub mod errors;
pub mod package_path;

pub use assemble::{ValueGenerator, assemble_ldflags, flag_token};
pub use errors::{FlagsError, Result};
pub use package_path::{
    read_module_path, resolve_package, rewrite_targets, root_package, root_package_with,
};
