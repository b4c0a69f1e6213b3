//! CLI module for jv
//!
//! Argument parsing, command dispatch and the presentation layer. Prompts,
//! confirmation and formatted output live here; the library modules never
//! print.

use anyhow::Result;
use async_trait::async_trait;

mod args;
pub mod activate;
pub mod doctor;
pub mod install;
pub mod list;
pub mod manage;
pub mod style;
pub mod ui;

pub use args::{Cli, Commands};

use crate::config::{Registry, Settings};
use crate::runtimes::Detector;

/// Global context for CLI command execution
pub struct CliContext {
    pub verbose: u8,
    pub quiet: bool,
    pub settings: Settings,
}

impl CliContext {
    pub fn new(verbose: u8, quiet: bool) -> Result<Self> {
        Ok(Self {
            verbose,
            quiet,
            settings: Settings::load()?,
        })
    }

    /// Detector over `registry` with the configured roots and version query timeout
    #[must_use]
    pub fn detector<'a>(&self, registry: &'a Registry) -> Detector<'a> {
        Detector::new(registry, &self.settings)
    }

    /// Whether progress bars should be drawn
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && style::is_tty()
    }
}

/// A trait for modular CLI command execution
#[async_trait]
pub trait CommandRunner {
    /// Execute the command
    async fn execute(&self, ctx: &CliContext) -> Result<()>;
}

#[async_trait]
impl CommandRunner for Commands {
    async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            Commands::List => list::list(ctx),
            Commands::Use { version, yes } => activate::use_version(ctx, version.as_deref(), *yes),
            Commands::Switch => activate::use_version(ctx, None, false),
            Commands::Current => activate::current(ctx),
            Commands::Add { path } => manage::add(ctx, path),
            Commands::Remove { path } => manage::remove(path.as_deref()),
            Commands::AddPath { path } => manage::add_search_path(path),
            Commands::RemovePath { path } => manage::remove_search_path(path.as_deref()),
            Commands::ListPaths => manage::list_paths(ctx),
            Commands::Install {
                version,
                distributor,
                arch,
                yes,
            } => {
                let cmd = install::InstallCommand {
                    version: version.clone(),
                    distributor: distributor.clone(),
                    arch: *arch,
                    yes: *yes,
                };
                cmd.execute(ctx).await
            }
            Commands::Doctor => doctor::doctor(ctx),
            Commands::Repair { yes } => doctor::repair(ctx, *yes),
            Commands::Completions { shell } => {
                use clap::CommandFactory;
                clap_complete::generate(*shell, &mut Cli::command(), "jv", &mut std::io::stdout());
                Ok(())
            }
        }
    }
}
