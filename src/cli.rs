//! Command line options.

use std::path::PathBuf;

use clap::Parser;

/// Generate the `go build -ldflags` value with version information from git.
///
/// Usage: go build -ldflags "$(goxver)" .
#[derive(Debug, Clone, Parser)]
#[command(name = "goxver", version, about)]
pub struct Cli {
    /// The root directory of the project
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub root_dir: PathBuf,

    /// The path to the configuration file
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    /// The mapping, `var=gen[,var=gen]...`
    #[arg(short = 'm', long = "map")]
    pub mapping: Option<String>,

    /// Double quote values
    #[arg(long = "qq", visible_alias = "double-quote")]
    pub double_quote: bool,

    /// Enable verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
