use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::{Confirm, Password};
use enhancer_core::history::HistoryItem;

/// File name used when the result is downloaded without an explicit path.
pub const DOWNLOAD_FILE_NAME: &str = "enhanced-prompt.txt";

/// Writes `content` to `path` as plain text.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Default download target in the working directory.
pub fn download_path() -> PathBuf {
    PathBuf::from(DOWNLOAD_FILE_NAME)
}

/// Asks a yes/no question. Refuses when stdin is not a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("Confirmation required; pass --yes to skip it in non-interactive use");
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Prompts for a password without echo.
pub fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Prompts for a new password twice.
pub fn prompt_new_password() -> Result<String> {
    Ok(Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match.")
        .interact()?)
}

/// First line of `text`, shortened to `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    let mut shortened: String = first_line.chars().take(max_chars).collect();
    if first_line.chars().count() > max_chars || text.trim().lines().count() > 1 {
        shortened.push('…');
    }
    shortened
}

/// Prints one history row: id, time and a preview of the raw prompt.
pub fn print_history_row(item: &HistoryItem) {
    let when = item
        .created_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| item.timestamp.clone());
    println!(
        "{}  {}  {}",
        item.id.bright_black(),
        when.cyan(),
        preview(&item.raw_prompt, 60)
    );
}

/// Prints both sides of a history entry.
pub fn print_history_item(item: &HistoryItem) {
    println!("{} {}", "id:".bright_black(), item.id);
    println!("{} {}", "time:".bright_black(), item.timestamp);
    println!("{}", "--- raw prompt ---".bright_magenta());
    println!("{}", item.raw_prompt);
    println!("{}", "--- enhanced prompt ---".bright_magenta());
    println!("{}", item.modified_prompt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghijkl", 5), "abcde…");
        assert_eq!(preview("\nfirst\nsecond", 20), "first…");
        assert_eq!(preview("", 5), "");
    }

    #[test]
    fn test_write_text_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join(DOWNLOAD_FILE_NAME);

        write_text_file(&path, "Explain AI.").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Explain AI.");
    }
}
