// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devwatch",
    version,
    about = "Run the test suite or rebuild docs whenever project sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Project root to watch.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Path to a config file (TOML).
    ///
    /// Default: `Devwatch.toml` in the project root, if it exists; otherwise
    /// the built-in `tests` / `docs` actions are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate the config, print the actions, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_valid() {
        let args = CliArgs::try_parse_from(["devwatch"]).unwrap();
        assert!(args.root.is_none());
        assert!(args.config.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::try_parse_from([
            "devwatch",
            "--root",
            "proj",
            "--config",
            "proj/dev.toml",
            "--log-level",
            "debug",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("proj")));
        assert_eq!(args.config, Some(PathBuf::from("proj/dev.toml")));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.dry_run);
    }
}
