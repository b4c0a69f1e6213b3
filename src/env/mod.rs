//! Environment configurator
//!
//! Owns the active-runtime pointer (`JAVA_HOME`) and the search-path entry
//! that resolves `java` through it. The search path never holds a literal
//! JDK path, only the indirect `$JAVA_HOME/bin` (`%JAVA_HOME%\bin` on
//! Windows), so switching runtimes rewrites the pointer alone.
//!
//! Both values go to the store in one batch. The profile store commits the
//! batch in a single file replace; stores that write one value at a time may
//! keep the pointer when the search path fails, and the report says so
//! ([`PathEntryStatus::Failed`]).

mod store;

use std::path::{Path, PathBuf};

use crate::core::{JvError, Result};

pub use crate::core::is_privileged;

#[cfg(windows)]
pub use store::RegistryEnvStore;
pub use store::{EnvStore, ProfileEnvStore, default_store};

/// Variable names and syntax of the platform environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvPlatform {
    pub pointer_var: &'static str,
    pub path_var: &'static str,
    pub separator: char,
    pub indirect_entry: &'static str,
    pub case_insensitive: bool,
}

impl EnvPlatform {
    pub const UNIX: Self = Self {
        pointer_var: "JAVA_HOME",
        path_var: "PATH",
        separator: ':',
        indirect_entry: "$JAVA_HOME/bin",
        case_insensitive: false,
    };

    pub const WINDOWS: Self = Self {
        pointer_var: "JAVA_HOME",
        path_var: "Path",
        separator: ';',
        indirect_entry: r"%JAVA_HOME%\bin",
        case_insensitive: true,
    };

    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::WINDOWS } else { Self::UNIX }
    }

    /// Canonical spelling of an entry for comparison
    fn canonical_entry(&self, entry: &str) -> String {
        let entry = entry
            .trim()
            .trim_end_matches(['/', '\\'])
            .replace("${JAVA_HOME}", "$JAVA_HOME");
        if self.case_insensitive {
            entry.to_lowercase()
        } else {
            entry
        }
    }

    fn is_indirect_entry(&self, entry: &str) -> bool {
        self.canonical_entry(entry) == self.canonical_entry(self.indirect_entry)
    }
}

/// Fail with a permission error unless the caller is privileged
pub fn require_privilege(is_privileged: bool) -> Result<()> {
    if is_privileged {
        Ok(())
    } else {
        Err(JvError::PermissionDenied(
            "changing the system-wide Java requires administrator privileges".to_string(),
        ))
    }
}

/// Outcome of the search-path half of an activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntryStatus {
    /// Exactly one indirect entry was already there
    AlreadyPresent,
    /// The entry was added, or duplicates of it were collapsed
    Updated,
    /// The pointer was written but the search path could not be
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub pointer: PathBuf,
    pub path_entry: PathEntryStatus,
}

impl ActivationReport {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self.path_entry, PathEntryStatus::Failed(_))
    }
}

/// Search path with exactly one indirect entry, placed first.
///
/// Returns `None` when `current` already satisfies that.
fn with_single_indirect_entry(platform: &EnvPlatform, current: &str) -> Option<String> {
    let entries: Vec<&str> = current
        .split(platform.separator)
        .filter(|e| !e.trim().is_empty())
        .collect();
    let indirect = entries
        .iter()
        .filter(|e| platform.is_indirect_entry(e))
        .count();
    if indirect == 1 {
        return None;
    }

    let mut rebuilt = vec![platform.indirect_entry];
    rebuilt.extend(entries.into_iter().filter(|e| !platform.is_indirect_entry(e)));
    Some(rebuilt.join(&platform.separator.to_string()))
}

pub struct EnvConfigurator<'a> {
    store: &'a dyn EnvStore,
    platform: EnvPlatform,
}

impl<'a> EnvConfigurator<'a> {
    #[must_use]
    pub fn new(store: &'a dyn EnvStore) -> Self {
        Self::with_platform(store, EnvPlatform::current())
    }

    #[must_use]
    pub fn with_platform(store: &'a dyn EnvStore, platform: EnvPlatform) -> Self {
        Self { store, platform }
    }

    #[must_use]
    pub fn platform(&self) -> &EnvPlatform {
        &self.platform
    }

    #[must_use]
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Point `JAVA_HOME` at `root` and make sure the search path resolves
    /// `java` through it.
    pub fn set_active_runtime(&self, root: &Path, is_privileged: bool) -> Result<ActivationReport> {
        require_privilege(is_privileged)?;

        let pointer = root.to_string_lossy();
        let pointer_var = self.platform.pointer_var;
        let path_var = self.platform.path_var;

        let path_entry = match self.store.read_var(path_var) {
            Ok(current) => {
                match with_single_indirect_entry(&self.platform, &current.unwrap_or_default()) {
                    None => {
                        self.store.write_var(pointer_var, &pointer)?;
                        PathEntryStatus::AlreadyPresent
                    }
                    Some(updated) => {
                        match self
                            .store
                            .write_vars(&[(pointer_var, &*pointer), (path_var, updated.as_str())])
                        {
                            Ok(()) => PathEntryStatus::Updated,
                            Err(e) if self.pointer_is(&pointer) => self.path_failed(&e),
                            Err(e) => return Err(e),
                        }
                    }
                }
            }
            Err(e) => {
                self.store.write_var(pointer_var, &pointer)?;
                self.path_failed(&e)
            }
        };
        tracing::info!("{pointer_var} set to {pointer}");

        Ok(ActivationReport {
            pointer: root.to_path_buf(),
            path_entry,
        })
    }

    fn pointer_is(&self, value: &str) -> bool {
        matches!(
            self.store.read_var(self.platform.pointer_var),
            Ok(Some(stored)) if stored == value
        )
    }

    fn path_failed(&self, e: &JvError) -> PathEntryStatus {
        tracing::warn!(
            "{} updated but {} was not: {e}",
            self.platform.pointer_var,
            self.platform.path_var
        );
        PathEntryStatus::Failed(e.to_string())
    }

    /// Stored pointer value; needs no privilege
    pub fn get_active_runtime(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .store
            .read_var(self.platform.pointer_var)?
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from))
    }

    /// Whether the stored search path references the pointer
    pub fn path_references_pointer(&self) -> Result<bool> {
        Ok(self
            .store
            .read_var(self.platform.path_var)?
            .is_some_and(|path| {
                path.split(self.platform.separator)
                    .any(|e| self.platform.is_indirect_entry(e))
            }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryEnvStore;

    #[test]
    fn scenario_unprivileged_activation_changes_nothing() {
        let store = MemoryEnvStore::new().with_var("JAVA_HOME", "/opt/old");
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let err = configurator
            .set_active_runtime(Path::new("/opt/new"), false)
            .unwrap_err();

        assert!(matches!(err, JvError::PermissionDenied(_)));
        assert_eq!(store.get("JAVA_HOME").as_deref(), Some("/opt/old"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn activation_sets_pointer_and_single_entry() {
        let store = MemoryEnvStore::new().with_var("PATH", "/usr/bin:/bin");
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let report = configurator
            .set_active_runtime(Path::new("/opt/jv/adoptium-21"), true)
            .unwrap();

        assert_eq!(report.path_entry, PathEntryStatus::Updated);
        assert_eq!(
            store.get("JAVA_HOME").as_deref(),
            Some("/opt/jv/adoptium-21")
        );
        assert_eq!(
            store.get("PATH").as_deref(),
            Some("$JAVA_HOME/bin:/usr/bin:/bin")
        );
        assert_eq!(
            configurator.get_active_runtime().unwrap(),
            Some(PathBuf::from("/opt/jv/adoptium-21"))
        );
        assert!(configurator.path_references_pointer().unwrap());
    }

    #[test]
    fn second_activation_leaves_search_path_alone() {
        let store = MemoryEnvStore::new();
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        configurator
            .set_active_runtime(Path::new("/opt/a"), true)
            .unwrap();
        let path_after_first = store.get("PATH");
        let report = configurator
            .set_active_runtime(Path::new("/opt/b"), true)
            .unwrap();

        assert_eq!(report.path_entry, PathEntryStatus::AlreadyPresent);
        assert_eq!(store.get("PATH"), path_after_first);
        assert_eq!(store.get("JAVA_HOME").as_deref(), Some("/opt/b"));
    }

    #[test]
    fn duplicate_entries_collapse_to_one() {
        let store = MemoryEnvStore::new().with_var(
            "Path",
            r"C:\Windows;%java_home%\bin;C:\Tools;%JAVA_HOME%\bin\",
        );
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::WINDOWS);

        configurator
            .set_active_runtime(Path::new(r"C:\Program Files\jv\adoptium-21"), true)
            .unwrap();

        assert_eq!(
            store.get("Path").as_deref(),
            Some(r"%JAVA_HOME%\bin;C:\Windows;C:\Tools")
        );
    }

    #[test]
    fn failed_path_write_is_partial_success() {
        let store = MemoryEnvStore::new().failing_writes_for("PATH");
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let report = configurator
            .set_active_runtime(Path::new("/opt/jv/adoptium-21"), true)
            .unwrap();

        assert!(report.is_partial());
        assert_eq!(
            store.get("JAVA_HOME").as_deref(),
            Some("/opt/jv/adoptium-21")
        );
        assert_eq!(store.get("PATH"), None);
    }

    #[test]
    fn atomic_store_failure_keeps_previous_pointer() {
        let store = MemoryEnvStore::new()
            .with_var("JAVA_HOME", "/opt/old")
            .failing_writes_for("PATH")
            .with_atomic_batches();
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let err = configurator
            .set_active_runtime(Path::new("/opt/new"), true)
            .unwrap_err();

        assert!(matches!(err, JvError::Path(_)));
        assert_eq!(store.get("JAVA_HOME").as_deref(), Some("/opt/old"));
        assert_eq!(store.get("PATH"), None);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn activation_writes_profile_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = ProfileEnvStore::new(temp.path().join("jv.sh"));
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let report = configurator
            .set_active_runtime(Path::new("/opt/jv/adoptium-21"), true)
            .unwrap();

        assert_eq!(report.path_entry, PathEntryStatus::Updated);
        let content = std::fs::read_to_string(store.file()).unwrap();
        assert!(content.contains("export JAVA_HOME=\"/opt/jv/adoptium-21\"\n"));
        assert!(content.contains("export PATH=\"$JAVA_HOME/bin:$PATH\"\n"));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_pointer_write_is_path_error() {
        let store = MemoryEnvStore::new().failing_writes_for("JAVA_HOME");
        let configurator = EnvConfigurator::with_platform(&store, EnvPlatform::UNIX);

        let err = configurator
            .set_active_runtime(Path::new("/opt/x"), true)
            .unwrap_err();
        assert!(matches!(err, JvError::Path(_)));
        assert_eq!(store.get("PATH"), None);
    }

    #[test]
    fn braced_form_counts_as_indirect() {
        let platform = EnvPlatform::UNIX;
        assert!(with_single_indirect_entry(&platform, "${JAVA_HOME}/bin:/usr/bin").is_none());
        assert_eq!(
            with_single_indirect_entry(&platform, "").as_deref(),
            Some("$JAVA_HOME/bin")
        );
    }
}
