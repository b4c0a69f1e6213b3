//! Registry management: custom JDK paths and search directories

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use comfy_table::{Cell, Color};

use crate::cli::{CliContext, style, ui};
use crate::config::Registry;
use crate::core::paths::normalize_path;
use crate::runtimes::detect::{builtin_search_roots, resolve_installation_root};
use crate::runtimes::{get_version, is_valid_search_path};

/// Absolute form of a user-supplied path
fn absolute(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&path)
}

fn save(registry: &Registry) -> Result<()> {
    registry.save()?;
    tracing::debug!("Saved {}", registry.file_path().display());
    Ok(())
}

/// Pick a path from `choices` when none was given
fn path_or_prompt(path: Option<&Path>, choices: &[PathBuf], what: &str) -> Result<Option<PathBuf>> {
    if let Some(path) = path {
        return Ok(Some(absolute(path)));
    }
    if choices.is_empty() {
        println!("{}", style::dim(&format!("No {what} registered")));
        return Ok(None);
    }
    let items: Vec<String> = choices.iter().map(|p| p.display().to_string()).collect();
    Ok(ui::select(&format!("Select the {what} to remove"), &items, 0)?
        .map(|idx| choices[idx].clone()))
}

pub fn add(_ctx: &CliContext, path: &Path) -> Result<()> {
    let candidate = absolute(path);
    let Some(root) = resolve_installation_root(&candidate) else {
        bail!(
            "{} is not a JDK (no bin/{} inside)",
            candidate.display(),
            crate::runtimes::common::java_executable()
        );
    };

    let mut registry = Registry::load()?;
    if !registry.add_custom_path(&root) {
        println!(
            "{}",
            style::info(&format!("{} is already registered", root.display()))
        );
        return Ok(());
    }
    save(&registry)?;

    println!(
        "{}",
        style::success(&format!(
            "Added Java {} at {}",
            style::version(&get_version(&root)),
            style::path(&root.display().to_string())
        ))
    );
    Ok(())
}

pub fn remove(path: Option<&Path>) -> Result<()> {
    let mut registry = Registry::load()?;
    let Some(target) = path_or_prompt(path, registry.custom_paths(), "JDK path")? else {
        return Ok(());
    };

    if !registry.remove_custom_path(&target) {
        println!(
            "{}",
            style::warning(&format!("{} is not registered", target.display()))
        );
        return Ok(());
    }
    save(&registry)?;

    println!(
        "{}",
        style::success(&format!("Removed {}", target.display()))
    );
    println!(
        "  {}",
        style::dim("The files stay on disk; JDKs under a scanned directory are still detected")
    );
    Ok(())
}

pub fn add_search_path(path: &Path) -> Result<()> {
    let dir = absolute(path);
    if !is_valid_search_path(&dir) {
        bail!("{} is not a directory", dir.display());
    }

    let mut registry = Registry::load()?;
    if !registry.add_search_path(&dir) {
        println!(
            "{}",
            style::info(&format!("{} is already scanned", dir.display()))
        );
        return Ok(());
    }
    save(&registry)?;

    let found = std::fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| resolve_installation_root(&e.path()).is_some())
                .count()
        })
        .unwrap_or(0);
    println!(
        "{}",
        style::success(&format!(
            "Added search path {} ({} JDK(s) found)",
            style::path(&dir.display().to_string()),
            style::count(found)
        ))
    );
    Ok(())
}

pub fn remove_search_path(path: Option<&Path>) -> Result<()> {
    let mut registry = Registry::load()?;
    let Some(target) = path_or_prompt(path, registry.search_paths(), "search path")? else {
        return Ok(());
    };

    if !registry.remove_search_path(&target) {
        println!(
            "{}",
            style::warning(&format!("{} is not a search path", target.display()))
        );
        return Ok(());
    }
    save(&registry)?;

    println!(
        "{}",
        style::success(&format!("Removed search path {}", target.display()))
    );
    Ok(())
}

pub fn list_paths(ctx: &CliContext) -> Result<()> {
    let registry = Registry::load()?;

    let mut table = ui::new_table();
    table.set_header(vec!["Directory", "Source", "Exists"]);

    let rows = builtin_search_roots(&ctx.settings)
        .into_iter()
        .map(|p| (p, "built-in"))
        .chain(registry.search_paths().iter().cloned().map(|p| (p, "search path")))
        .chain(registry.custom_paths().iter().cloned().map(|p| (p, "custom JDK")));

    for (path, source) in rows {
        let exists = path.exists();
        let exists_cell = if style::colors_enabled() {
            Cell::new(if exists { "yes" } else { "no" }).fg(if exists {
                Color::Green
            } else {
                Color::DarkGrey
            })
        } else {
            Cell::new(if exists { "yes" } else { "no" })
        };
        table.add_row(vec![
            Cell::new(path.display().to_string()),
            Cell::new(source),
            exists_cell,
        ]);
    }

    println!("{}\n", style::header("Search locations"));
    println!("{table}");
    Ok(())
}
