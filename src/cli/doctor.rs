//! `jv doctor` and `jv repair`

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::activate::activate;
use crate::cli::{CliContext, style, ui};
use crate::config::Registry;
use crate::core::{JvError, is_privileged};
use crate::env::{EnvConfigurator, EnvStore, default_store, require_privilege};
use crate::runtimes::{Installation, is_valid_installation};

/// A problem `jv doctor` can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    PointerUnset,
    PointerInvalid(PathBuf),
    PathMissingEntry,
    NoInstallations,
    RegistryUnreadable(String),
    EnvUnreadable(String),
}

impl Issue {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::PointerUnset => "JAVA_HOME is not set".to_string(),
            Self::PointerInvalid(path) => {
                format!("JAVA_HOME points to {}, which is not a JDK", path.display())
            }
            Self::PathMissingEntry => "PATH does not resolve java through JAVA_HOME".to_string(),
            Self::NoInstallations => "No Java installations found".to_string(),
            Self::RegistryUnreadable(e) => format!("Configuration is unreadable: {e}"),
            Self::EnvUnreadable(e) => format!("Environment settings are unreadable: {e}"),
        }
    }

    /// Whether `jv repair` knows a fix
    #[must_use]
    pub const fn is_fixable(&self) -> bool {
        !matches!(self, Self::NoInstallations | Self::EnvUnreadable(_))
    }

    const fn needs_privilege(&self) -> bool {
        matches!(
            self,
            Self::PointerUnset | Self::PointerInvalid(_) | Self::PathMissingEntry
        )
    }
}

/// Everything the checks found out
pub struct Diagnosis {
    pub issues: Vec<Issue>,
    pub pointer: Option<PathBuf>,
    pub installations: Vec<Installation>,
}

/// Run the checks against the stored environment and the registry
pub fn diagnose(ctx: &CliContext, store: &dyn EnvStore) -> Diagnosis {
    let mut issues = Vec::new();
    let configurator = EnvConfigurator::new(store);

    let pointer = match configurator.get_active_runtime() {
        Ok(None) => {
            issues.push(Issue::PointerUnset);
            None
        }
        Ok(Some(path)) => {
            if !is_valid_installation(&path) {
                issues.push(Issue::PointerInvalid(path.clone()));
            }
            Some(path)
        }
        Err(e) => {
            issues.push(Issue::EnvUnreadable(e.to_string()));
            None
        }
    };

    if !matches!(configurator.path_references_pointer(), Ok(true)) {
        issues.push(Issue::PathMissingEntry);
    }

    let registry = match Registry::load() {
        Ok(registry) => registry,
        Err(e) => {
            issues.push(Issue::RegistryUnreadable(e.to_string()));
            Registry::empty_at(crate::core::paths::registry_path())
        }
    };

    let installations = ctx.detector(&registry).find_all().unwrap_or_else(|e| {
        tracing::warn!("{e}");
        Vec::new()
    });
    if installations.is_empty() {
        issues.push(Issue::NoInstallations);
    }

    Diagnosis {
        issues,
        pointer,
        installations,
    }
}

fn check_line(ok: bool, ok_msg: &str, issue: Option<&Issue>) {
    match issue {
        Some(issue) if issue.is_fixable() => println!("  {}", style::error(&issue.describe())),
        Some(issue) => println!("  {}", style::warning(&issue.describe())),
        None if ok => println!("  {}", style::success(ok_msg)),
        None => {}
    }
}

pub fn doctor(ctx: &CliContext) -> Result<()> {
    println!("{}\n", style::header("jv doctor"));

    let store = default_store();
    let diagnosis = diagnose(ctx, store.as_ref());
    let find = |pred: fn(&Issue) -> bool| diagnosis.issues.iter().find(|i| pred(i));

    let pointer_issue = find(|i| {
        matches!(
            i,
            Issue::PointerUnset | Issue::PointerInvalid(_) | Issue::EnvUnreadable(_)
        )
    });
    let pointer_msg = diagnosis
        .pointer
        .as_ref()
        .map(|p| format!("JAVA_HOME is {}", p.display()))
        .unwrap_or_default();
    check_line(true, &pointer_msg, pointer_issue);
    check_line(
        true,
        "PATH resolves java through JAVA_HOME",
        find(|i| matches!(i, Issue::PathMissingEntry)),
    );
    check_line(
        true,
        &format!(
            "{} Java installation(s) found",
            diagnosis.installations.len()
        ),
        find(|i| matches!(i, Issue::NoInstallations)),
    );
    check_line(
        true,
        "Configuration is readable",
        find(|i| matches!(i, Issue::RegistryUnreadable(_))),
    );

    if is_privileged() {
        println!("  {}", style::success("Running with administrator privileges"));
    } else {
        println!(
            "  {}",
            style::info("Not running as administrator; jv use and jv repair will need it")
        );
    }

    match which::which("java") {
        Ok(java) => println!(
            "  {}",
            style::success(&format!("java on PATH: {}", java.display()))
        ),
        Err(_) => println!("  {}", style::warning("java is not on this shell's PATH")),
    }

    println!();
    let fixable = diagnosis.issues.iter().filter(|i| i.is_fixable()).count();
    if diagnosis.issues.is_empty() {
        println!("{}", style::success("Everything looks good"));
    } else if fixable > 0 {
        println!(
            "{}",
            style::warning(&format!(
                "{} issue(s) found; fix them with {}",
                style::count(diagnosis.issues.len()),
                style::command("jv repair")
            ))
        );
    } else {
        println!(
            "{}",
            style::warning(&format!(
                "{} issue(s) found",
                style::count(diagnosis.issues.len())
            ))
        );
    }
    Ok(())
}

/// Move an unreadable registry aside and write an empty one
fn reset_registry() -> Result<()> {
    let file = crate::core::paths::registry_path();
    let backup = file.with_extension("json.bak");
    std::fs::rename(&file, &backup)
        .map_err(|e| JvError::registry(&file, format!("cannot back up: {e}")))?;
    Registry::empty_at(&file).save()?;
    println!(
        "  {}",
        style::success(&format!(
            "Reset the configuration (old file kept as {})",
            backup.display()
        ))
    );
    Ok(())
}

pub fn repair(ctx: &CliContext, yes: bool) -> Result<()> {
    println!("{}\n", style::header("jv repair"));

    let store = default_store();
    let diagnosis = diagnose(ctx, store.as_ref());
    let fixable: Vec<&Issue> = diagnosis.issues.iter().filter(|i| i.is_fixable()).collect();

    for issue in diagnosis.issues.iter().filter(|i| !i.is_fixable()) {
        println!("  {}", style::warning(&issue.describe()));
    }
    if fixable.is_empty() {
        println!("{}", style::success("Nothing to repair"));
        return Ok(());
    }

    let selected: Vec<&Issue> = if yes {
        fixable
    } else {
        let items: Vec<String> = fixable.iter().map(|i| i.describe()).collect();
        ui::multi_select("Issues to fix", &items)?
            .into_iter()
            .map(|idx| fixable[idx])
            .collect()
    };
    if selected.is_empty() {
        println!("{}", style::dim("Nothing selected"));
        return Ok(());
    }

    let privileged = is_privileged();
    if selected.iter().any(|i| i.needs_privilege()) {
        require_privilege(privileged)?;
    }

    if selected
        .iter()
        .any(|i| matches!(i, Issue::RegistryUnreadable(_)))
    {
        reset_registry()?;
    }

    let pointer_broken = selected
        .iter()
        .any(|i| matches!(i, Issue::PointerUnset | Issue::PointerInvalid(_)));
    let path_broken = selected.iter().any(|i| matches!(i, Issue::PathMissingEntry));

    let target = if pointer_broken {
        pick_installation(&diagnosis.installations, yes)?
    } else if path_broken {
        diagnosis.pointer.clone()
    } else {
        None
    };

    match target {
        Some(root) => activate(store.as_ref(), &root, privileged)?,
        None if pointer_broken => println!(
            "  {}",
            style::warning("No JDK to point JAVA_HOME at; install one with jv install")
        ),
        None => {}
    }
    Ok(())
}

fn pick_installation(installations: &[Installation], yes: bool) -> Result<Option<PathBuf>> {
    if installations.is_empty() {
        return Ok(None);
    }
    if yes {
        return Ok(Some(installations[0].path.clone()));
    }
    let items: Vec<String> = installations
        .iter()
        .map(|i| format!("{}  {}", i.version, i.path.display()))
        .collect();
    Ok(ui::select("JDK to use for JAVA_HOME", &items, 0)?
        .map(|idx| installations[idx].path.clone()))
}
