//! Terminal styling for CLI output

use crate::health::Readiness;
use crate::widgets::RiskBand;
use colored::Colorize;
use crossterm::style::Color;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Dimmed hint on stderr
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// One-line progress update (health watch, uploads)
pub fn status(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Label-value pair, indented for summaries
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Readiness word coloured like the dashboard indicator.
pub fn readiness(value: Readiness) -> String {
    match value {
        Readiness::Pending => "pending".dimmed().to_string(),
        Readiness::Online => "online".green().bold().to_string(),
        Readiness::Warning => "warning".yellow().bold().to_string(),
    }
}

pub fn band(value: RiskBand) -> String {
    match value {
        RiskBand::Critical => value.as_str().red().bold().to_string(),
        RiskBand::Elevated => value.as_str().bright_red().to_string(),
        RiskBand::Normal => value.as_str().yellow().to_string(),
    }
}

pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Render markdown with termimad on a TTY, or write it unchanged to pipes and files.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    write_markdown(markdown, output, is_terminal())
}

fn write_markdown(markdown: &str, output: &mut dyn Write, styled: bool) -> io::Result<()> {
    if styled {
        let skin = create_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        write!(output, "{}", markdown)
    }
}

fn create_skin() -> termimad::MadSkin {
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    // Account ids are rendered as inline code.
    skin.inline_code.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Magenta);
    skin.horizontal_rule = StyledChar::from_fg_char(Color::DarkGrey, '─');
    skin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_markdown_keeps_text() {
        let mut out = Vec::new();
        write_markdown("# Suspects\n\n`0xA` is **critical**\n", &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Suspects"));
        assert!(text.contains("0xA"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn test_plain_markdown_is_verbatim() {
        let mut out = Vec::new();
        write_markdown("# Suspects\n", &mut out, false).unwrap();
        assert_eq!(out, b"# Suspects\n");
    }
}
