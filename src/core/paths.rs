//! Shared filesystem paths with test-friendly overrides.

use std::path::{Component, Path, PathBuf};

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn fallback_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Config directory: `JV_CONFIG_DIR`, then `$XDG_CONFIG_HOME/jv`, then `~/.config/jv`.
#[must_use]
pub fn config_dir() -> PathBuf {
    env_path("JV_CONFIG_DIR").unwrap_or_else(|| {
        env_path("XDG_CONFIG_HOME").map_or_else(
            || fallback_home_dir().join(".config").join("jv"),
            |d| d.join("jv"),
        )
    })
}

/// Registry file (default: `<config dir>/jv.json`).
#[must_use]
pub fn registry_path() -> PathBuf {
    config_dir().join("jv.json")
}

/// Settings file (default: `<config dir>/config.toml`).
#[must_use]
pub fn settings_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Data directory (default: XDG data dir or ~/.jv).
#[must_use]
pub fn data_dir() -> PathBuf {
    env_path("JV_DATA_DIR").unwrap_or_else(|| {
        dirs::data_dir()
            .map(|d| d.join("jv"))
            .unwrap_or_else(|| fallback_home_dir().join(".jv"))
    })
}

/// Base directory for user-only installs (default: `<data dir>/jdks`).
#[must_use]
pub fn user_install_dir() -> PathBuf {
    env_path("JV_USER_INSTALL_DIR").unwrap_or_else(|| data_dir().join("jdks"))
}

/// Base directory for machine-wide installs.
#[must_use]
pub fn system_install_dir() -> PathBuf {
    env_path("JV_SYSTEM_INSTALL_DIR").unwrap_or_else(default_system_install_dir)
}

#[cfg(windows)]
fn default_system_install_dir() -> PathBuf {
    env_path("ProgramFiles")
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
        .join("jv")
}

#[cfg(not(windows))]
fn default_system_install_dir() -> PathBuf {
    PathBuf::from("/opt/jv")
}

/// Profile script holding the machine-wide `JAVA_HOME` on Unix
/// (default: /etc/profile.d/jv.sh).
#[must_use]
pub fn env_file() -> PathBuf {
    env_path("JV_ENV_FILE").unwrap_or_else(|| PathBuf::from("/etc/profile.d/jv.sh"))
}

/// Lexically normalize a path: drop `.` components and trailing separators,
/// fold `..` into its parent where possible. Never touches the filesystem.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Whether the platform's default filesystems ignore case in names
pub const CASE_INSENSITIVE_PATHS: bool = cfg!(any(windows, target_os = "macos"));

/// Comparison key for path membership checks: normalized, and case-folded
/// where the platform ignores case.
#[must_use]
pub fn path_key(path: &Path) -> String {
    let key = normalize_path(path).to_string_lossy().into_owned();
    if CASE_INSENSITIVE_PATHS {
        key.to_lowercase()
    } else {
        key
    }
}

/// Equality on normalized paths, under the platform's case rules.
#[must_use]
pub fn same_path(a: &Path, b: &Path) -> bool {
    path_key(a) == path_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_separator_and_dots() {
        assert_eq!(
            normalize_path(Path::new("/opt/java/./jdk-17/")),
            PathBuf::from("/opt/java/jdk-17")
        );
        assert_eq!(
            normalize_path(Path::new("/opt/java/jdk-21/../jdk-17")),
            PathBuf::from("/opt/java/jdk-17")
        );
    }

    #[test]
    fn normalize_keeps_leading_parent_of_relative_path() {
        assert_eq!(
            normalize_path(Path::new("../jdks/./21")),
            PathBuf::from("../jdks/21")
        );
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn same_path_ignores_trailing_separator() {
        assert!(same_path(
            Path::new("/opt/java/jdk-17/"),
            Path::new("/opt/java/jdk-17")
        ));
        assert!(!same_path(Path::new("/opt/java/17"), Path::new("/opt/java/21")));
    }

    #[test]
    fn case_matters_only_where_the_platform_folds_it() {
        let upper = Path::new("/Opt/Java/JDK-17");
        let lower = Path::new("/opt/java/jdk-17");
        assert_eq!(same_path(upper, lower), CASE_INSENSITIVE_PATHS);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_keeps_case_distinct() {
        assert_ne!(
            path_key(Path::new("/opt/JDK")),
            path_key(Path::new("/opt/jdk"))
        );
    }

    #[test]
    fn config_dir_honors_overrides() {
        temp_env::with_vars(
            [
                ("JV_CONFIG_DIR", Some("/tmp/jv-config")),
                ("XDG_CONFIG_HOME", Some("/tmp/xdg")),
            ],
            || assert_eq!(config_dir(), PathBuf::from("/tmp/jv-config")),
        );
        temp_env::with_vars(
            [
                ("JV_CONFIG_DIR", None),
                ("XDG_CONFIG_HOME", Some("/tmp/xdg")),
            ],
            || {
                assert_eq!(config_dir(), PathBuf::from("/tmp/xdg/jv"));
                assert_eq!(registry_path(), PathBuf::from("/tmp/xdg/jv/jv.json"));
            },
        );
    }

    #[test]
    fn install_dirs_honor_overrides() {
        temp_env::with_vars(
            [
                ("JV_USER_INSTALL_DIR", Some("/tmp/user-jdks")),
                ("JV_SYSTEM_INSTALL_DIR", Some("/tmp/system-jdks")),
            ],
            || {
                assert_eq!(user_install_dir(), PathBuf::from("/tmp/user-jdks"));
                assert_eq!(system_install_dir(), PathBuf::from("/tmp/system-jdks"));
            },
        );
    }
}
