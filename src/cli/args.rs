//! Command-line argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::core::Architecture;

/// jv - find, install and switch Java Development Kits
///
/// Detects installed JDKs, downloads new ones from a distributor and points
/// the system-wide JAVA_HOME at the one you pick.
#[derive(Parser, Debug)]
#[command(name = "jv")]
#[command(version)]
#[command(about = "Find, install and switch Java Development Kits", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // ═══════════════════════════════════════════════════════════════════════
    // SELECTION
    // ═══════════════════════════════════════════════════════════════════════
    /// List detected Java installations
    #[command(visible_alias = "ls")]
    List,

    /// Point JAVA_HOME at an installed Java version
    #[command(disable_version_flag = true)]
    Use {
        /// Version to use (exact, major, or part of a version); prompts if omitted
        version: Option<String>,
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Pick the Java version to use from a menu
    Switch,

    /// Show the Java version this shell uses
    Current,

    // ═══════════════════════════════════════════════════════════════════════
    // REGISTRY
    // ═══════════════════════════════════════════════════════════════════════
    /// Register a JDK directory that is not found automatically
    Add {
        /// JDK root (the directory containing bin/java)
        path: PathBuf,
    },

    /// Forget a registered JDK directory
    #[command(visible_alias = "rm")]
    Remove {
        /// Registered path; prompts if omitted
        path: Option<PathBuf>,
    },

    /// Add a directory to scan for JDKs
    AddPath {
        /// Directory whose subdirectories are JDKs
        path: PathBuf,
    },

    /// Stop scanning a directory
    RemovePath {
        /// Search directory; prompts if omitted
        path: Option<PathBuf>,
    },

    /// Show every directory that is scanned for JDKs
    ListPaths,

    // ═══════════════════════════════════════════════════════════════════════
    // INSTALLATION
    // ═══════════════════════════════════════════════════════════════════════
    /// Download and install a JDK
    #[command(visible_alias = "i")]
    #[command(disable_version_flag = true)]
    Install {
        /// Version to install (e.g. 21); prompts with the available versions if omitted
        version: Option<String>,
        /// Distributor id or menu number
        #[arg(short, long)]
        distributor: Option<String>,
        /// Target architecture (x64, aarch64, ...); defaults to this machine
        #[arg(long)]
        arch: Option<Architecture>,
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // DIAGNOSTICS
    // ═══════════════════════════════════════════════════════════════════════
    /// Check JAVA_HOME, PATH and the jv configuration
    Doctor,

    /// Fix the problems reported by `jv doctor`
    Repair {
        /// Fix everything without asking, using the first detected JDK
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn install_flags_parse() {
        let cli = Cli::try_parse_from(["jv", "install", "21", "--arch", "arm64", "-y"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Install {
                version, arch, yes, ..
            } => {
                assert_eq!(version.as_deref(), Some("21"));
                assert_eq!(arch, Some(Architecture::Aarch64));
                assert!(yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["jv", "list", "-vv"]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
