//! Common types used throughout jv

use serde::{Deserialize, Serialize};

/// Where an installation (or an environment change) applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    System,
    User,
}

impl Scope {
    /// Scope implied by the caller's privilege level
    #[must_use]
    pub const fn for_privilege(is_privileged: bool) -> Self {
        if is_privileged { Self::System } else { Self::User }
    }

    /// Label used in listings
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::System => "system-wide",
            Self::User => "user-only",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
        }
    }
}

/// CPU architectures JDK vendors publish builds for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X64,
    X32,
    Aarch64,
    Arm,
    Ppc64le,
    S390x,
}

impl Architecture {
    /// Architecture of the running binary, if a JDK exists for it
    #[must_use]
    pub fn current() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86_64" => Some(Self::X64),
            "x86" => Some(Self::X32),
            "aarch64" => Some(Self::Aarch64),
            "arm" => Some(Self::Arm),
            "powerpc64" if cfg!(target_endian = "little") => Some(Self::Ppc64le),
            "s390x" => Some(Self::S390x),
            _ => None,
        }
    }

    /// Get all supported architectures
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::X64,
            Self::X32,
            Self::Aarch64,
            Self::Arm,
            Self::Ppc64le,
            Self::S390x,
        ]
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X64 => write!(f, "x64"),
            Self::X32 => write!(f, "x32"),
            Self::Aarch64 => write!(f, "aarch64"),
            Self::Arm => write!(f, "arm"),
            Self::Ppc64le => write!(f, "ppc64le"),
            Self::S390x => write!(f, "s390x"),
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x64" | "amd64" | "x86_64" | "x86-64" => Ok(Self::X64),
            "x32" | "x86" | "386" | "i386" | "i686" => Ok(Self::X32),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            "arm" | "armv7" | "arm32" => Ok(Self::Arm),
            "ppc64le" => Ok(Self::Ppc64le),
            "s390x" => Ok(Self::S390x),
            other => Err(format!(
                "unsupported architecture '{other}' (expected one of: x64, x32, aarch64, arm, ppc64le, s390x)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_aliases() {
        assert_eq!("amd64".parse::<Architecture>(), Ok(Architecture::X64));
        assert_eq!("x86_64".parse::<Architecture>(), Ok(Architecture::X64));
        assert_eq!("ARM64".parse::<Architecture>(), Ok(Architecture::Aarch64));
        assert_eq!("386".parse::<Architecture>(), Ok(Architecture::X32));
        assert!("mips".parse::<Architecture>().is_err());
    }

    #[test]
    fn architecture_display_round_trips() {
        for arch in Architecture::all() {
            assert_eq!(arch.to_string().parse::<Architecture>(), Ok(*arch));
        }
    }

    #[test]
    fn scope_follows_privilege() {
        assert_eq!(Scope::for_privilege(true), Scope::System);
        assert_eq!(Scope::for_privilege(false), Scope::User);
        assert_eq!(Scope::System.label(), "system-wide");
    }

    #[test]
    fn scope_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scope::User).unwrap(), "\"user\"");
    }
}
