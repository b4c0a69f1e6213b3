//! Common utilities for JDK handling
//!
//! Version parsing shared by the detector (local installs) and the
//! distributors (remote releases).

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{JvError, Result};

/// Version reported when an installation's version cannot be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// Name of the Java launcher inside `<root>/bin`
#[must_use]
pub const fn java_executable() -> &'static str {
    if cfg!(windows) { "java.exe" } else { "java" }
}

static QUOTED_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"version\s+"([^"]+)""#).expect("valid regex")
});

static DOTTED_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^\d+(?:\.\d+)*").expect("valid regex")
});

/// Leading dotted numeric part of a raw version (`"1.8.0_392"` -> `"1.8.0"`)
#[must_use]
pub fn dotted_numeric(raw: &str) -> Option<String> {
    DOTTED_NUMERIC
        .find(raw.trim())
        .map(|m| m.as_str().to_string())
}

/// Parse `JAVA_VERSION="17.0.9"` out of a JDK `release` manifest
#[must_use]
pub fn parse_release_file(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("JAVA_VERSION=")?;
        dotted_numeric(value.trim().trim_matches('"'))
    })
}

/// Parse the banner printed by `java -version`
/// (`openjdk version "21.0.5" 2024-10-15`)
#[must_use]
pub fn parse_version_output(output: &str) -> Option<String> {
    QUOTED_VERSION
        .captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| dotted_numeric(m.as_str()))
}

/// Major version: the first dot-delimited component
#[must_use]
pub fn major_version(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}

/// Compare dotted version strings numerically
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<u32> = a
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|p| p.parse().ok())
        .collect();
    let b_parts: Vec<u32> = b
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|p| p.parse().ok())
        .collect();

    for i in 0..a_parts.len().max(b_parts.len()) {
        let a_part = a_parts.get(i).unwrap_or(&0);
        let b_part = b_parts.get(i).unwrap_or(&0);
        if a_part != b_part {
            return a_part.cmp(b_part);
        }
    }

    Ordering::Equal
}

/// Reject version strings that are unsafe to embed in a directory name
pub fn validate_version(version: &str) -> Result<()> {
    let ok = !version.is_empty()
        && version.len() <= 64
        && version.starts_with(|c: char| c.is_ascii_digit())
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(JvError::InvalidInput(format!(
            "'{version}' is not a valid Java version (expected e.g. 21 or 17.0.9)"
        )))
    }
}
