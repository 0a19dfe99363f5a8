use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::app::App;

/// Prints file locations and the effective settings. Never prints the key.
pub fn show(app: &App) -> Result<()> {
    println!("{}", "Paths".bright_magenta().bold());
    println!("  config:  {}", location(app.paths.config_file()));
    println!("  secrets: {}", location(app.paths.secret_file()));
    println!("  store:   {}", location(app.paths.store_dir()));
    println!("  logs:    {}", location(app.paths.logs_dir()));

    println!("{}", "Settings".bright_magenta().bold());
    println!("  model:    {}", app.enhancer.model());
    println!("  base_url: {}", app.config.base_url);
    println!("  history:  {}", if app.history.is_enabled() { "on" } else { "off" });
    println!("  user:     {}", app.scope_label());
    Ok(())
}

fn location<E: std::fmt::Display>(result: std::result::Result<PathBuf, E>) -> String {
    match result {
        Ok(path) => path.display().to_string(),
        Err(e) => format!("<{}>", e),
    }
}
