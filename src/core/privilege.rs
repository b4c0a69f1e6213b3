//! Privilege probing
//!
//! Machine-wide installs and `JAVA_HOME` changes need root (Unix) or an
//! elevated Administrator token (Windows). jv never elevates on its own; it
//! asks once and threads the answer through as a plain `bool`.

/// Check if we're running as root
#[cfg(unix)]
#[must_use]
pub fn is_root() -> bool {
    rustix::process::geteuid().is_root()
}

/// Check if the process holds an elevated Administrator token.
///
/// `net session` only succeeds for elevated processes.
#[cfg(windows)]
#[must_use]
pub fn is_root() -> bool {
    std::process::Command::new("net")
        .arg("session")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(not(any(unix, windows)))]
#[must_use]
pub fn is_root() -> bool {
    false
}

/// Capability check used by the environment configurator and installer.
///
/// `JV_ASSUME_PRIVILEGED=0|1` pins the answer (used by hermetic tests).
#[must_use]
pub fn is_privileged() -> bool {
    match std::env::var("JV_ASSUME_PRIVILEGED").as_deref() {
        Ok("1" | "true") => true,
        Ok("0" | "false") => false,
        _ => is_root(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_root() {
        // Only checks that it does not panic
        let _ = is_root();
    }

    #[test]
    fn override_pins_answer() {
        temp_env::with_var("JV_ASSUME_PRIVILEGED", Some("1"), || {
            assert!(is_privileged());
        });
        temp_env::with_var("JV_ASSUME_PRIVILEGED", Some("0"), || {
            assert!(!is_privileged());
        });
    }
}
