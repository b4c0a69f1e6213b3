//! `jv use`, `jv switch` and `jv current`

use std::path::Path;

use anyhow::{Result, bail};

use crate::cli::list::{describe_origin, process_java_home};
use crate::cli::{CliContext, style, ui};
use crate::config::Registry;
use crate::core::paths::same_path;
use crate::env::{
    EnvConfigurator, EnvStore, PathEntryStatus, default_store, is_privileged, require_privilege,
};
use crate::runtimes::{Installation, find_matching, get_version};

/// Set `JAVA_HOME` to `root` and report what changed
pub fn activate(store: &dyn EnvStore, root: &Path, privileged: bool) -> Result<()> {
    let configurator = EnvConfigurator::new(store);
    let report = configurator.set_active_runtime(root, privileged)?;
    let platform = configurator.platform();

    println!(
        "{}",
        style::success(&format!(
            "{} set to {}",
            platform.pointer_var,
            style::path(&report.pointer.display().to_string())
        ))
    );
    match &report.path_entry {
        PathEntryStatus::AlreadyPresent => {
            tracing::debug!("{} already on {}", platform.indirect_entry, platform.path_var);
        }
        PathEntryStatus::Updated => println!(
            "{}",
            style::success(&format!(
                "{} now resolves java through {}",
                platform.path_var, platform.indirect_entry
            ))
        ),
        PathEntryStatus::Failed(reason) => println!(
            "{}",
            style::warning(&format!(
                "{} was updated but {} was not: {reason}",
                platform.pointer_var, platform.path_var
            ))
        ),
    }

    ui::print_tip(&format!(
        "Changes are stored in {}; open a new terminal to pick them up",
        configurator.location()
    ));
    Ok(())
}

fn choose_installation<'a>(
    registry: &Registry,
    installations: &'a [Installation],
) -> Result<Option<&'a Installation>> {
    let active = process_java_home();
    let default = active
        .as_deref()
        .and_then(|home| installations.iter().position(|i| same_path(home, &i.path)))
        .unwrap_or(0);
    let items: Vec<String> = installations
        .iter()
        .map(|i| {
            format!(
                "{}  {}  ({})",
                i.version,
                i.path.display(),
                describe_origin(registry, i)
            )
        })
        .collect();

    Ok(ui::select("Java version to use", &items, default)?.map(|idx| &installations[idx]))
}

pub fn use_version(ctx: &CliContext, version: Option<&str>, yes: bool) -> Result<()> {
    let privileged = is_privileged();
    require_privilege(privileged)?;

    let registry = Registry::load()?;
    let installations = ctx.detector(&registry).find_all()?;
    if installations.is_empty() {
        bail!("No Java installations found. Install one with: jv install");
    }

    let selected = match version {
        Some(query) => match find_matching(&installations, query) {
            Some(installation) => installation,
            None => bail!("No installed Java matches '{query}'. See: jv list"),
        },
        None => match choose_installation(&registry, &installations)? {
            Some(installation) => installation,
            None => {
                println!("{}", style::dim("Cancelled"));
                return Ok(());
            }
        },
    };

    let prompt = format!(
        "Set JAVA_HOME to Java {} at {}?",
        selected.version,
        selected.path.display()
    );
    if !ui::confirm(&prompt, yes)? {
        println!("{}", style::dim("Cancelled"));
        return Ok(());
    }

    activate(default_store().as_ref(), &selected.path, privileged)
}

pub fn current(_ctx: &CliContext) -> Result<()> {
    let store = default_store();
    let stored = EnvConfigurator::new(store.as_ref()).get_active_runtime()?;

    match process_java_home() {
        Some(home) => {
            let version = get_version(&home);
            ui::print_kv("JAVA_HOME", style::path(&home.display().to_string()));
            ui::print_kv("version", style::version(&version));
            if let Some(stored) = stored.filter(|s| !same_path(s, &home)) {
                println!(
                    "\n{}",
                    style::info(&format!(
                        "System-wide JAVA_HOME is {}; open a new terminal to use it",
                        stored.display()
                    ))
                );
            }
        }
        None => {
            println!("{}", style::warning("JAVA_HOME is not set in this shell"));
            match stored {
                Some(stored) => println!(
                    "{}",
                    style::info(&format!(
                        "System-wide JAVA_HOME is {}; open a new terminal to use it",
                        stored.display()
                    ))
                ),
                None => ui::print_tip(&format!(
                    "Pick a version with {}",
                    style::command("jv use <version>")
                )),
            }
        }
    }
    Ok(())
}
