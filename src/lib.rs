//! `goxver`: generate a `go build -ldflags` argument with version
//! information taken from git.
//!
//! ```text
//! go build -ldflags "$(goxver)" .
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod telemetry;
