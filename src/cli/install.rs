//! `jv install`

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;

use crate::cli::activate::activate;
use crate::cli::list::process_java_home;
use crate::cli::{CliContext, CommandRunner, style, ui};
use crate::config::Registry;
use crate::core::{Architecture, is_privileged};
use crate::env::default_store;
use crate::runtimes::distributors::list_versions_or_empty;
use crate::runtimes::{Distributor, Distributors, Installer, Release};

pub struct InstallCommand {
    pub version: Option<String>,
    pub distributor: Option<String>,
    pub arch: Option<Architecture>,
    pub yes: bool,
}

/// LTS releases first, newest first within each group
fn menu_order(mut releases: Vec<Release>) -> Vec<Release> {
    releases.sort_by(|a, b| {
        b.lts
            .cmp(&a.lts)
            .then_with(|| crate::runtimes::common::version_cmp(&b.version, &a.version))
    });
    releases
}

fn release_label(release: &Release, installed_majors: &HashSet<u32>) -> String {
    let mut label = release.version.clone();
    if release.lts {
        label.push_str(" (LTS)");
    }
    let installed = crate::runtimes::common::major_version(&release.version)
        .is_some_and(|m| installed_majors.contains(&m));
    if installed {
        label.push_str(" [installed]");
    }
    label
}

async fn choose_version(
    ctx: &CliContext,
    distributor: &dyn Distributor,
    registry: &Registry,
) -> Result<Option<String>> {
    let spinner = (!ctx.quiet).then(|| {
        style::spinner(&format!("Fetching versions from {}...", distributor.name()))
    });
    let releases = menu_order(list_versions_or_empty(distributor).await);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if releases.is_empty() {
        println!(
            "{}",
            style::warning(&format!(
                "Could not list versions from {}; enter one manually",
                distributor.name()
            ))
        );
        let version = ui::input("Java version to install (e.g. 21)")?;
        return Ok(Some(version.trim().to_string()).filter(|v| !v.is_empty()));
    }

    let installed_majors: HashSet<u32> = ctx
        .detector(registry)
        .find_all()
        .map(|found| found.iter().filter_map(|i| i.major()).collect())
        .unwrap_or_default();
    let items: Vec<String> = releases
        .iter()
        .map(|r| release_label(r, &installed_majors))
        .collect();

    Ok(ui::select("Java version to install", &items, 0)?.map(|idx| releases[idx].version.clone()))
}

#[async_trait]
impl CommandRunner for InstallCommand {
    async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let distributors = Distributors::builtin();
        let key = self
            .distributor
            .as_deref()
            .unwrap_or(&ctx.settings.default_distributor);
        let distributor = distributors.get(key).ok_or_else(|| {
            anyhow!(
                "Unknown distributor '{key}'. Available: {}",
                distributors.ids().join(", ")
            )
        })?;

        let Some(arch) = self.arch.or_else(|| ctx.settings.target_architecture()) else {
            bail!(
                "No JDK builds exist for {}; pass --arch explicitly",
                std::env::consts::ARCH
            );
        };

        let mut registry = Registry::load()?;
        let version = match &self.version {
            Some(version) => version.trim().to_string(),
            None => match choose_version(ctx, distributor, &registry).await? {
                Some(version) => version,
                None => {
                    println!("{}", style::dim("Cancelled"));
                    return Ok(());
                }
            },
        };

        let privileged = is_privileged();
        let mut installer = Installer::new(&mut registry, &ctx.settings);
        let destination = installer.destination(distributor.id(), &version, privileged);

        let prompt = format!(
            "Install {} Java {version} ({arch}) into {}?",
            distributor.name(),
            destination.display()
        );
        if !ui::confirm(&prompt, self.yes)? {
            println!("{}", style::dim("Cancelled"));
            return Ok(());
        }

        if !ctx.quiet {
            println!(
                "{}",
                style::header(&format!("Installing Java {version} from {}", distributor.name()))
            );
        }
        installer = installer.show_progress(ctx.show_progress());
        let record = installer
            .install(distributor, &version, arch, privileged)
            .await
            .with_context(|| format!("Installing Java {version} failed"))?;

        println!(
            "{}",
            style::success(&format!(
                "Installed Java {} ({}) at {}",
                style::version(&record.version),
                record.scope.label(),
                style::path(&record.path.display().to_string())
            ))
        );

        if process_java_home().is_none() && privileged {
            activate(default_store().as_ref(), &record.path, privileged)?;
        } else {
            ui::print_tip(&format!(
                "Make it the default with {}",
                style::command(&format!("jv use {version}"))
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(version: &str, lts: bool) -> Release {
        Release {
            version: version.to_string(),
            lts,
        }
    }

    #[test]
    fn lts_releases_come_first() {
        let ordered = menu_order(vec![
            release("23", false),
            release("17", true),
            release("22", false),
            release("21", true),
        ]);
        let versions: Vec<_> = ordered.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, ["21", "17", "23", "22"]);
    }

    #[test]
    fn labels_mark_lts_and_installed() {
        let installed: HashSet<u32> = [17].into_iter().collect();
        assert_eq!(release_label(&release("17", true), &installed), "17 (LTS) [installed]");
        assert_eq!(release_label(&release("23", false), &installed), "23");
    }
}
