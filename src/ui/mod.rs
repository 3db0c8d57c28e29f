//! Terminal presentation layer
//!
//! This module handles:
//! - Styled status lines printed to stdout
//! - Interactive prompts behind the [`Prompter`] trait, so orchestrators can
//!   be driven by scripted answers in tests

pub mod prompt;

pub use prompt::{Prompter, TerminalPrompter};

use console::Style;

/// Print the TuxSync banner
pub fn banner() {
    let style = Style::new().blue().bold();
    println!(
        "{}",
        style.apply_to(format!(
            "══ TuxSync v{} ══  Profile Sync for Linux Users",
            env!("CARGO_PKG_VERSION")
        ))
    );
    println!();
}

/// Section heading
pub fn heading(text: &str) {
    println!("{}", Style::new().bold().apply_to(text));
}

/// Neutral progress line
pub fn step(text: &str) {
    println!("{}", Style::new().blue().apply_to(text));
}

pub fn success(text: &str) {
    println!("{} {}", Style::new().green().apply_to("✓"), text);
}

pub fn warn(text: &str) {
    println!("{} {}", Style::new().yellow().apply_to("⚠"), text);
}

pub fn failure(text: &str) {
    println!("{} {}", Style::new().red().bold().apply_to("✗"), text);
}

/// Secondary, dimmed hint
pub fn hint(text: &str) {
    println!("{}", Style::new().dim().apply_to(text));
}

/// Indented `label value` pair
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", Style::new().bold().apply_to(label), value);
}

/// Bulleted list item
pub fn item(text: &str) {
    println!("  • {text}");
}
