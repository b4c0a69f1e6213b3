//! Consistent styling utilities for jv output
//!
//! All output should use these helpers for consistent UX.
//! Respects the [NO_COLOR standard](https://no-color.org/) and `JV_COLORS`.

use std::env;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use supports_color::Stream;

// ═══════════════════════════════════════════════════════════════════════════
// COLOR DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Detect if colors should be enabled
#[must_use]
pub fn colors_enabled() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if let Ok(val) = env::var("JV_COLORS") {
        if val == "never" || val == "0" || val == "false" {
            return false;
        }
        if val == "always" || val == "1" || val == "true" {
            return true;
        }
    }

    supports_color::on(Stream::Stdout).is_some_and(|level| level.has_basic)
}

/// Check if a user is at the terminal (prompts are allowed)
#[must_use]
pub fn is_tty() -> bool {
    console::user_attended()
}

/// Check if unicode icons should be used
#[must_use]
pub fn use_unicode() -> bool {
    if let Ok(val) = env::var("JV_UNICODE") {
        return val != "0" && val != "false";
    }
    colors_enabled()
}

// ═══════════════════════════════════════════════════════════════════════════
// CONDITIONAL STYLING HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Apply color only if colors are enabled
#[inline]
#[must_use]
pub fn maybe_color(text: &str, f: impl Fn(&str) -> String) -> String {
    if colors_enabled() {
        f(text)
    } else {
        text.to_string()
    }
}

/// Get an icon (unicode or ASCII fallback)
#[inline]
#[must_use]
pub fn icon(unicode: &str, ascii: &str) -> String {
    if use_unicode() {
        unicode.to_string()
    } else {
        ascii.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TEXT FORMATTING
// ═══════════════════════════════════════════════════════════════════════════

/// Header with arrow prefix (e.g., "==> Java installations")
#[must_use]
pub fn header(msg: &str) -> String {
    if colors_enabled() {
        format!("{} {}", "==>".magenta().bold(), msg.bold())
    } else {
        format!("==> {msg}")
    }
}

/// Icon prefix, painted only when colors are enabled
fn prefixed(mark: &str, msg: &str, paint: impl Fn(&str) -> String) -> String {
    if colors_enabled() {
        format!("{} {msg}", paint(mark))
    } else {
        format!("{mark} {msg}")
    }
}

/// Success message with checkmark
#[must_use]
pub fn success(msg: &str) -> String {
    prefixed(&icon("✓", "OK"), msg, |m| m.green().bold().to_string())
}

/// Error message with X
#[must_use]
pub fn error(msg: &str) -> String {
    prefixed(&icon("✗", "X"), msg, |m| m.red().bold().to_string())
}

/// Info message with i
#[must_use]
pub fn info(msg: &str) -> String {
    prefixed(&icon("ℹ", "i"), msg, |m| m.blue().bold().to_string())
}

/// Warning message with triangle
#[must_use]
pub fn warning(msg: &str) -> String {
    prefixed(&icon("⚠", "!"), msg, |m| m.yellow().bold().to_string())
}

/// Dimmed/muted text
#[must_use]
pub fn dim(msg: &str) -> String {
    maybe_color(msg, |m| m.dimmed().to_string())
}

/// Inline command formatting
#[must_use]
pub fn command(cmd: &str) -> String {
    maybe_color(cmd, |c| format!("`{}`", c.cyan()))
}

/// Version string (green)
#[must_use]
pub fn version(ver: &str) -> String {
    maybe_color(ver, |v| v.green().to_string())
}

/// File path (yellow)
#[must_use]
pub fn path(p: &str) -> String {
    maybe_color(p, |path| path.yellow().to_string())
}

/// Count/number formatting (bold)
#[must_use]
pub fn count(n: usize) -> String {
    maybe_color(&n.to_string(), |s| s.bold().to_string())
}

// ═══════════════════════════════════════════════════════════════════════════
// PROGRESS INDICATORS
// ═══════════════════════════════════════════════════════════════════════════

/// Create a spinner for indeterminate progress
#[must_use]
#[allow(clippy::literal_string_with_formatting_args)] // indicatif template syntax
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    let tick_chars = if use_unicode() {
        "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"
    } else {
        "-\\|/"
    };
    let template = if colors_enabled() {
        "{spinner:.cyan} {msg}"
    } else {
        "{spinner} {msg}"
    };

    pb.set_style(
        ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(tick_chars),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_no_color_disables_colors() {
        temp_env::with_var("NO_COLOR", Some("1"), || {
            assert!(!colors_enabled());
        });
    }

    #[test]
    #[serial]
    fn test_jv_colors_always_enables() {
        temp_env::with_vars(
            [("NO_COLOR", None::<&str>), ("JV_COLORS", Some("always"))],
            || {
                assert!(colors_enabled());
            },
        );
    }

    #[test]
    #[serial]
    fn test_unicode_icons() {
        temp_env::with_var("JV_UNICODE", Some("1"), || {
            assert_eq!(icon("✓", "OK"), "✓");
        });
        temp_env::with_var("JV_UNICODE", Some("0"), || {
            assert_eq!(icon("✓", "OK"), "OK");
        });
    }

    #[test]
    #[serial]
    fn test_plain_output_keeps_icon() {
        temp_env::with_vars(
            [("NO_COLOR", Some("1")), ("JV_UNICODE", Some("0"))],
            || {
                assert_eq!(success("done"), "OK done");
                assert_eq!(warning("careful"), "! careful");
                assert_eq!(header("Java"), "==> Java");
            },
        );
    }
}
