//! Prompt and layout primitives shared by the commands

use std::fmt::Display;

use anyhow::{Result, bail};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use owo_colors::OwoColorize;

use crate::cli::style;

/// A short instructional tip
pub fn print_tip(msg: &str) {
    if style::colors_enabled() {
        println!("\n  {} {}", "Tip:".dimmed().italic().bold(), msg.dimmed().italic());
    } else {
        println!("\n  Tip: {msg}");
    }
}

/// A key-value pair with consistent alignment
pub fn print_kv(key: &str, value: impl Display) {
    println!("  {:>12}: {value}", style::dim(key));
}

/// Themed `ColorfulTheme` for dialoguer prompts
pub fn prompt_theme() -> dialoguer::theme::ColorfulTheme {
    use dialoguer::theme::ColorfulTheme;
    ColorfulTheme {
        defaults_style: console::Style::new().dim(),
        prompt_style: console::Style::new().bold(),
        prompt_prefix: console::style("  ?".to_string()).cyan().bold(),
        success_prefix: console::style("  ✓".to_string()).green().bold(),
        active_item_style: console::Style::new().cyan().bold(),
        active_item_prefix: console::style("  ❯".to_string()).cyan().bold(),
        inactive_item_prefix: console::style("   ".to_string()),
        ..ColorfulTheme::default()
    }
}

fn require_terminal(what: &str) -> Result<()> {
    if !style::is_tty() {
        bail!("{what} needs an interactive terminal");
    }
    Ok(())
}

/// Ask for confirmation unless `assume_yes`
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    require_terminal("Confirmation (pass --yes to skip it)")?;
    Ok(Confirm::with_theme(&prompt_theme())
        .with_prompt(prompt)
        .default(true)
        .interact()?)
}

/// Pick one item; `None` when the user cancels with Esc
pub fn select<T: Display>(prompt: &str, items: &[T], default: usize) -> Result<Option<usize>> {
    require_terminal("Selection")?;
    Ok(Select::with_theme(&prompt_theme())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?)
}

/// Pick any number of items, all preselected
pub fn multi_select<T: Display>(prompt: &str, items: &[T]) -> Result<Vec<usize>> {
    require_terminal("Selection")?;
    let defaults = vec![true; items.len()];
    Ok(MultiSelect::with_theme(&prompt_theme())
        .with_prompt(prompt)
        .items(items)
        .defaults(&defaults)
        .interact()?)
}

/// Free-form text entry
pub fn input(prompt: &str) -> Result<String> {
    require_terminal("Input")?;
    Ok(Input::<String>::with_theme(&prompt_theme())
        .with_prompt(prompt)
        .interact_text()?)
}

/// Table with jv styling: UTF-8 borders when unicode is on, ASCII otherwise
pub fn new_table() -> comfy_table::Table {
    use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    if style::use_unicode() {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_FULL);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}
