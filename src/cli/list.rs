//! `jv list`

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{CliContext, style, ui};
use crate::config::Registry;
use crate::core::paths::same_path;
use crate::env::{EnvConfigurator, default_store};
use crate::runtimes::Installation;

/// `JAVA_HOME` of this process, if set
pub fn process_java_home() -> Option<PathBuf> {
    std::env::var_os("JAVA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Origin plus install scope, e.g. `custom, system-wide`
pub fn describe_origin(registry: &Registry, installation: &Installation) -> String {
    match registry.record_for(&installation.path) {
        Some(record) => format!("{}, {}", installation.origin.label(), record.scope.label()),
        None => installation.origin.label().to_string(),
    }
}

pub fn list(ctx: &CliContext) -> Result<()> {
    let registry = Registry::load()?;
    let installations = ctx.detector(&registry).find_all()?;

    println!("{}\n", style::header("Java installations"));

    if installations.is_empty() {
        println!("  {}", style::dim("No Java installations found"));
        ui::print_tip(&format!(
            "Install one with {} or register an existing JDK with {}",
            style::command("jv install"),
            style::command("jv add <path>")
        ));
        return Ok(());
    }

    let active = process_java_home();
    let width = installations
        .iter()
        .map(|i| i.version.len())
        .max()
        .unwrap_or(0);

    for installation in &installations {
        let is_active = active
            .as_deref()
            .is_some_and(|home| same_path(home, &installation.path));
        let marker = if is_active {
            style::icon("▶", "*")
        } else {
            " ".to_string()
        };
        let padded = format!("{:<width$}", installation.version);
        println!(
            "  {marker} {}  {}  {}",
            style::version(&padded),
            style::path(&installation.path.display().to_string()),
            style::dim(&format!("({})", describe_origin(&registry, installation)))
        );
    }

    if active.is_none() {
        let stored = EnvConfigurator::new(default_store().as_ref())
            .get_active_runtime()
            .ok()
            .flatten();
        match stored {
            Some(path) => ui::print_tip(&format!(
                "JAVA_HOME is set system-wide to {} but not in this shell; open a new terminal",
                path.display()
            )),
            None => ui::print_tip(&format!(
                "JAVA_HOME is not set; pick a version with {}",
                style::command("jv use <version>")
            )),
        }
    }

    Ok(())
}
