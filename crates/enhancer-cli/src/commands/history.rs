use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::app::App;
use crate::commands::utils::{confirm, print_history_item, print_history_row};

pub fn list(app: &App) -> Result<()> {
    let items = app.history.list(&app.session);
    if items.is_empty() {
        println!("{}", format!("No history ({}).", app.scope_label()).bright_black());
        return Ok(());
    }

    println!("{}", format!("History ({})", app.scope_label()).bright_magenta().bold());
    for item in items {
        print_history_row(item);
    }
    Ok(())
}

pub fn show(app: &App, id: &str) -> Result<()> {
    let item = app
        .history
        .get(&app.session, id)
        .ok_or_else(|| anyhow!("No history entry with id {}", id))?;
    print_history_item(item);
    Ok(())
}

/// Clears the active list after confirmation (skipped with `yes`).
pub fn clear(app: &mut App, yes: bool) -> Result<()> {
    let count = app.history.list(&app.session).len();
    if count == 0 {
        println!("{}", "History is already empty.".bright_black());
        return Ok(());
    }

    let prompt = format!(
        "Delete all {} history item(s) for {}? This cannot be undone.",
        count,
        app.scope_label()
    );
    if !yes && !confirm(&prompt)? {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    app.history.clear(&mut app.session);
    println!("{}", "History cleared.".green());
    Ok(())
}
