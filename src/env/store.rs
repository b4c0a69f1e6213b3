//! Persistence backends for machine-wide environment variables

use std::path::{Path, PathBuf};

use crate::core::safe_ops::atomic_write_file_sync;
use crate::core::{JvError, Result};

/// Storage layer behind the environment configurator
pub trait EnvStore: Send + Sync {
    /// Stored value of `name`, `None` if unset
    fn read_var(&self, name: &str) -> Result<Option<String>>;

    /// Persist `name=value`, replacing any previous value
    fn write_var(&self, name: &str, value: &str) -> Result<()>;

    /// Persist several variables in order.
    ///
    /// Stores that can commit them together override this; the default
    /// writes one at a time and stops at the first failure.
    fn write_vars(&self, vars: &[(&str, &str)]) -> Result<()> {
        for (name, value) in vars {
            self.write_var(name, value)?;
        }
        Ok(())
    }

    /// Where the values live, for messages
    fn location(&self) -> String;
}

const PROFILE_HEADER: &str = "# Managed by jv. Edits are overwritten by `jv use`.";

/// Shell profile script (`/etc/profile.d/jv.sh`) holding `export` lines.
///
/// The search-path variable keeps only jv's own prefix; it is written as
/// `export PATH="<prefix>:$PATH"` and read back without the `:$PATH` tail.
pub struct ProfileEnvStore {
    file: PathBuf,
    path_var: String,
}

impl ProfileEnvStore {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            path_var: "PATH".to_string(),
        }
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    fn path_error(&self, action: &str, e: &std::io::Error) -> JvError {
        JvError::Path(format!("failed to {action} {}: {e}", self.file.display()))
    }

    fn load(&self) -> Result<Vec<(String, String)>> {
        let content = match std::fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.path_error("read", &e)),
        };

        let tail = format!(":${}", self.path_var);
        Ok(content
            .lines()
            .filter_map(|line| {
                let (name, raw) = line.trim().strip_prefix("export ")?.split_once('=')?;
                let mut value = unquote(raw.trim());
                if name == self.path_var
                    && let Some(prefix) = value.strip_suffix(&tail)
                {
                    value = prefix.to_string();
                }
                Some((name.trim().to_string(), value))
            })
            .collect())
    }

    fn render(&self, vars: &[(String, String)]) -> String {
        let mut out = String::from(PROFILE_HEADER);
        out.push('\n');
        for (name, value) in vars {
            let rendered = if *name == self.path_var {
                format!("{}:${}", quote(value, true), self.path_var)
            } else {
                quote(value, false)
            };
            out.push_str(&format!("export {name}=\"{rendered}\"\n"));
        }
        out
    }
}

/// Escape for a double-quoted shell word; `$` stays live only when asked
fn quote(value: &str, expand: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '`' => out.push('\\'),
            '$' if !expand => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}

fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
        } else {
            out.push(c);
        }
    }
    out
}

impl EnvStore for ProfileEnvStore {
    fn read_var(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v))
    }

    fn write_var(&self, name: &str, value: &str) -> Result<()> {
        self.write_vars(&[(name, value)])
    }

    /// All values land in one atomic replace of the profile file
    fn write_vars(&self, updates: &[(&str, &str)]) -> Result<()> {
        let mut vars = self.load()?;
        for (name, value) in updates {
            match vars.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = (*value).to_string(),
                None => vars.push(((*name).to_string(), (*value).to_string())),
            }
        }

        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.path_error("create", &e))?;
        }
        atomic_write_file_sync(&self.file, self.render(&vars))
            .map_err(|e| self.path_error("write", &e))?;

        // Login shells of every user source this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.file, std::fs::Permissions::from_mode(0o644))
                .map_err(|e| self.path_error("chmod", &e))?;
        }
        let names: Vec<&str> = updates.iter().map(|(n, _)| *n).collect();
        tracing::debug!("Wrote {} to {}", names.join(", "), self.file.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.file.display().to_string()
    }
}

/// Machine environment in the Windows registry, edited through PowerShell
#[cfg(windows)]
pub struct RegistryEnvStore;

#[cfg(windows)]
impl RegistryEnvStore {
    const KEY: &'static str =
        r"HKLM:\SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

    fn powershell(script: &str, name: &str, value: Option<&str>) -> Result<String> {
        let mut cmd = std::process::Command::new("powershell");
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", script])
            .env("JV_NAME", name);
        if let Some(value) = value {
            cmd.env("JV_VALUE", value);
        }
        let output = cmd
            .output()
            .map_err(|e| JvError::Path(format!("failed to run powershell: {e}")))?;
        if !output.status.success() {
            return Err(JvError::Path(format!(
                "registry update for {name} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(windows)]
impl EnvStore for RegistryEnvStore {
    fn read_var(&self, name: &str) -> Result<Option<String>> {
        let script = format!(
            "(Get-Item '{}').GetValue($env:JV_NAME, $null, 'DoNotExpandEnvironmentNames')",
            Self::KEY
        );
        let value = Self::powershell(&script, name, None)?;
        Ok((!value.is_empty()).then_some(value))
    }

    fn write_var(&self, name: &str, value: &str) -> Result<()> {
        let script = format!(
            "Set-ItemProperty -Path '{}' -Name $env:JV_NAME -Value $env:JV_VALUE -Type ExpandString",
            Self::KEY
        );
        Self::powershell(&script, name, Some(value)).map(|_| ())
    }

    fn location(&self) -> String {
        "the machine environment (registry)".to_string()
    }
}

/// Store for the running platform
#[must_use]
pub fn default_store() -> Box<dyn EnvStore> {
    #[cfg(windows)]
    {
        Box::new(RegistryEnvStore)
    }
    #[cfg(not(windows))]
    {
        Box::new(ProfileEnvStore::new(crate::core::paths::env_file()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_profile_reads_as_unset() {
        let temp = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(temp.path().join("jv.sh"));
        assert_eq!(store.read_var("JAVA_HOME").unwrap(), None);
    }

    #[test]
    fn profile_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(temp.path().join("profile.d").join("jv.sh"));

        store.write_var("JAVA_HOME", "/opt/jv/adoptium-21").unwrap();
        store.write_var("PATH", "$JAVA_HOME/bin").unwrap();
        store.write_var("JAVA_HOME", "/opt/jv/adoptium-17").unwrap();

        let content = std::fs::read_to_string(store.file()).unwrap();
        assert!(content.contains("export JAVA_HOME=\"/opt/jv/adoptium-17\"\n"));
        assert!(content.contains("export PATH=\"$JAVA_HOME/bin:$PATH\"\n"));
        assert_eq!(content.matches("JAVA_HOME=").count(), 1);

        assert_eq!(
            store.read_var("JAVA_HOME").unwrap().as_deref(),
            Some("/opt/jv/adoptium-17")
        );
        assert_eq!(
            store.read_var("PATH").unwrap().as_deref(),
            Some("$JAVA_HOME/bin")
        );
    }

    #[test]
    fn batch_lands_in_one_file_version() {
        let temp = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(temp.path().join("jv.sh"));
        store.write_var("EDITOR", "vi").unwrap();

        store
            .write_vars(&[("JAVA_HOME", "/opt/jv/adoptium-21"), ("PATH", "$JAVA_HOME/bin")])
            .unwrap();

        let content = std::fs::read_to_string(store.file()).unwrap();
        assert_eq!(
            content,
            format!(
                "{PROFILE_HEADER}\nexport EDITOR=\"vi\"\n\
                 export JAVA_HOME=\"/opt/jv/adoptium-21\"\n\
                 export PATH=\"$JAVA_HOME/bin:$PATH\"\n"
            )
        );
        // Only the final file remains, no leftover temporaries
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn special_characters_survive() {
        let temp = TempDir::new().unwrap();
        let store = ProfileEnvStore::new(temp.path().join("jv.sh"));
        let odd = r#"/opt/my "jdk" $HOME\x"#;

        store.write_var("JAVA_HOME", odd).unwrap();
        assert_eq!(store.read_var("JAVA_HOME").unwrap().as_deref(), Some(odd));
        let content = std::fs::read_to_string(store.file()).unwrap();
        assert!(content.contains(r"\$HOME"));
    }

    #[test]
    fn unreadable_location_is_path_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be
        let store = ProfileEnvStore::new(temp.path());
        assert!(matches!(store.read_var("JAVA_HOME"), Err(JvError::Path(_))));
        assert!(matches!(
            store.write_var("JAVA_HOME", "/x"),
            Err(JvError::Path(_))
        ));
    }
}
