//! Interactive shell with a raw pane and an output pane.
//!
//! Plain lines are appended to the raw pane; slash commands act on the panes,
//! history and session. `/enhance` is awaited before the next line is read,
//! so at most one enhancement runs at a time.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::app::App;
use crate::commands::utils::{
    confirm, download_path, print_history_item, print_history_row, prompt_new_password,
    prompt_password, write_text_file,
};

/// Slash commands offered for completion and hints.
const COMMANDS: &[&str] = &[
    "/enhance",
    "/raw",
    "/output",
    "/clear",
    "/copy",
    "/download",
    "/history",
    "/use",
    "/clear-history",
    "/signup",
    "/login",
    "/social",
    "/logout",
    "/whoami",
    "/help",
    "/quit",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Which pane(s) `/clear` empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaneTarget {
    Raw,
    Output,
    All,
}

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Enhance,
    ShowRaw,
    ShowOutput,
    Clear(PaneTarget),
    Copy,
    Download(Option<PathBuf>),
    History,
    Use(String),
    ClearHistory,
    Signup(String),
    Login(String),
    Social(String),
    Logout,
    WhoAmI,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses a line starting with `/`. `Err` carries a usage message.
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or("");
        let arg = words.next();
        let rest = words.next();
        // Everything after the command name, spaces included
        let tail = line
            .trim()
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail.trim())
            .filter(|tail| !tail.is_empty());

        let required = |usage: &str| -> Result<String, String> {
            match (arg, rest) {
                (Some(value), None) => Ok(value.to_string()),
                _ => Err(format!("Usage: {usage}")),
            }
        };

        match name {
            "/enhance" => Ok(ReplCommand::Enhance),
            "/raw" => Ok(ReplCommand::ShowRaw),
            "/output" => Ok(ReplCommand::ShowOutput),
            "/clear" => match arg.unwrap_or("all") {
                "raw" => Ok(ReplCommand::Clear(PaneTarget::Raw)),
                "output" => Ok(ReplCommand::Clear(PaneTarget::Output)),
                "all" => Ok(ReplCommand::Clear(PaneTarget::All)),
                _ => Err("Usage: /clear [raw|output|all]".to_string()),
            },
            "/copy" => Ok(ReplCommand::Copy),
            "/download" => Ok(ReplCommand::Download(tail.map(PathBuf::from))),
            "/history" => Ok(ReplCommand::History),
            "/use" => required("/use <ID>").map(ReplCommand::Use),
            "/clear-history" => Ok(ReplCommand::ClearHistory),
            "/signup" => required("/signup <EMAIL>").map(ReplCommand::Signup),
            "/login" => required("/login <EMAIL>").map(ReplCommand::Login),
            "/social" => required("/social <EMAIL>").map(ReplCommand::Social),
            "/logout" => Ok(ReplCommand::Logout),
            "/whoami" => Ok(ReplCommand::WhoAmI),
            "/help" => Ok(ReplCommand::Help),
            "/quit" | "/exit" => Ok(ReplCommand::Quit),
            other => Err(format!("Unknown command: {other} (try /help)")),
        }
    }
}

/// The two working panes plus the last error banner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Panes {
    raw: String,
    output: String,
    error: Option<String>,
}

impl Panes {
    fn append_raw(&mut self, line: &str) {
        if !self.raw.is_empty() {
            self.raw.push('\n');
        }
        self.raw.push_str(line);
    }

    fn clear(&mut self, target: PaneTarget) {
        match target {
            PaneTarget::Raw => self.raw.clear(),
            PaneTarget::Output => self.output.clear(),
            PaneTarget::All => {
                self.raw.clear();
                self.output.clear();
            }
        }
        self.error = None;
    }

    /// State while a request is in flight: output and banner are cleared.
    fn begin_enhance(&mut self) {
        self.output.clear();
        self.error = None;
    }

    fn finish_enhance(&mut self, result: Result<String, String>) {
        match result {
            Ok(output) => self.output = output,
            Err(message) => self.error = Some(message),
        }
    }

    fn load(&mut self, raw: &str, output: &str) {
        self.raw = raw.to_string();
        self.output = output.to_string();
        self.error = None;
    }
}

/// Runs the REPL until `/quit` or end of input.
pub async fn run(app: &mut App) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Prompt Enhancer ===".bright_magenta().bold());
    println!(
        "{}",
        "Type your prompt (multiple lines are fine), then /enhance. /help lists commands."
            .bright_black()
    );
    if let Some(user) = app.session.current_user() {
        println!("{}", format!("Logged in as {}", user.email).bright_black());
    }
    println!();

    let mut panes = Panes::default();

    loop {
        let prompt = if panes.raw.is_empty() { ">> " } else { ".. " };
        match rl.readline(prompt) {
            Ok(line) => {
                if !line.trim_start().starts_with('/') {
                    panes.append_raw(&line);
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());
                let command = match ReplCommand::parse(line.trim()) {
                    Ok(command) => command,
                    Err(usage) => {
                        println!("{}", usage.yellow());
                        continue;
                    }
                };

                if command == ReplCommand::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if let Err(e) = execute(app, &mut panes, command).await {
                    eprintln!("{}", format!("Error: {}", e).red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn execute(app: &mut App, panes: &mut Panes, command: ReplCommand) -> Result<()> {
    match command {
        ReplCommand::Enhance => enhance(app, panes).await,
        ReplCommand::ShowRaw => print_pane("Raw prompt", &panes.raw),
        ReplCommand::ShowOutput => print_pane("Enhanced prompt", &panes.output),
        ReplCommand::Clear(target) => {
            panes.clear(target);
            println!("{}", "Cleared.".bright_black());
        }
        ReplCommand::Copy => {
            if panes.output.is_empty() {
                println!("{}", "Nothing to copy.".bright_black());
            } else {
                println!("{}", panes.output);
            }
        }
        ReplCommand::Download(path) => {
            if panes.output.is_empty() {
                println!("{}", "Nothing to download.".bright_black());
            } else {
                let path = path.unwrap_or_else(download_path);
                write_text_file(&path, &panes.output)?;
                println!("{}", format!("Downloaded {}", path.display()).green());
            }
        }
        ReplCommand::History => {
            let items = app.history.list(&app.session);
            if items.is_empty() {
                println!("{}", "No history yet.".bright_black());
            }
            for item in items {
                print_history_row(item);
            }
        }
        ReplCommand::Use(id) => match app.history.get(&app.session, &id) {
            Some(item) => {
                panes.load(&item.raw_prompt, &item.modified_prompt);
                print_history_item(item);
            }
            None => println!("{}", format!("No history entry with id {}", id).yellow()),
        },
        ReplCommand::ClearHistory => {
            if app.history.list(&app.session).is_empty() {
                println!("{}", "History is already empty.".bright_black());
            } else if confirm("Clear all history? This cannot be undone.")? {
                app.history.clear(&mut app.session);
                println!("{}", "History cleared.".green());
            }
        }
        ReplCommand::Signup(email) => {
            let password = prompt_new_password()?;
            match app.auth.signup(&mut app.session, &email, &password) {
                Ok(user) => println!("{}", format!("Signed up as {}.", user.email).green()),
                Err(e) => println!("{}", e.to_string().yellow()),
            }
        }
        ReplCommand::Login(email) => {
            let password = prompt_password("Password")?;
            login(app, &email, Some(&password));
        }
        ReplCommand::Social(email) => login(app, &email, None),
        ReplCommand::Logout => match app.auth.current_user(&app.session).cloned() {
            Some(user) => {
                app.auth.logout(&mut app.session);
                println!("{}", format!("Logged out {}.", user.email).green());
            }
            None => println!("{}", "Not logged in.".bright_black()),
        },
        ReplCommand::WhoAmI => println!("{}", app.scope_label()),
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
    Ok(())
}

async fn enhance(app: &mut App, panes: &mut Panes) {
    panes.begin_enhance();
    println!("{}", "Evaluating and revising prompt...".bright_black());

    let result = app
        .enhancer
        .enhance(&panes.raw)
        .await
        .map_err(|e| e.to_string());
    panes.finish_enhance(result);

    match &panes.error {
        Some(message) => eprintln!("{}", format!("✗ {}", message).red().bold()),
        None => {
            print_pane("Enhanced prompt", &panes.output);
            app.history.add(&mut app.session, &panes.raw, &panes.output);
        }
    }
}

fn login(app: &mut App, email: &str, password: Option<&str>) {
    match app.auth.login(&mut app.session, email, password) {
        Ok(user) => {
            let count = app.history.list(&app.session).len();
            println!(
                "{}",
                format!("Logged in as {} ({} history item(s)).", user.email, count).green()
            );
        }
        Err(e) => println!("{}", e.to_string().yellow()),
    }
}

fn print_pane(title: &str, content: &str) {
    println!("{}", format!("--- {} ---", title).bright_magenta());
    if content.is_empty() {
        println!("{}", "(empty)".bright_black());
    } else {
        for line in content.lines() {
            println!("{}", line.bright_blue());
        }
    }
}

fn print_help() {
    let rows = [
        ("/enhance", "Evaluate and revise the raw prompt"),
        ("/raw, /output", "Show a pane"),
        ("/clear [raw|output|all]", "Empty one or both panes"),
        ("/copy", "Print the output pane without decoration"),
        ("/download [PATH]", "Save the output pane (default enhanced-prompt.txt)"),
        ("/history", "List saved enhancements"),
        ("/use <ID>", "Load a history entry into both panes"),
        ("/clear-history", "Delete all history for the active scope"),
        ("/signup <EMAIL>", "Create a mock account"),
        ("/login <EMAIL>", "Log in with a password"),
        ("/social <EMAIL>", "Simulated social login (no password)"),
        ("/logout, /whoami", "End or show the session"),
        ("/quit", "Exit"),
    ];
    for (command, description) in rows {
        println!("  {:<26} {}", command.bright_cyan(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/enhance"), Ok(ReplCommand::Enhance));
        assert_eq!(
            ReplCommand::parse("/clear raw"),
            Ok(ReplCommand::Clear(PaneTarget::Raw))
        );
        assert_eq!(
            ReplCommand::parse("/clear"),
            Ok(ReplCommand::Clear(PaneTarget::All))
        );
        assert_eq!(
            ReplCommand::parse("/download out/p.txt"),
            Ok(ReplCommand::Download(Some(PathBuf::from("out/p.txt"))))
        );
        assert_eq!(
            ReplCommand::parse("/use 1700000000123"),
            Ok(ReplCommand::Use("1700000000123".into()))
        );
        assert_eq!(ReplCommand::parse("/exit"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_download_takes_rest_of_line() {
        assert_eq!(
            ReplCommand::parse("/download  my prompts/final draft.txt "),
            Ok(ReplCommand::Download(Some(PathBuf::from("my prompts/final draft.txt"))))
        );
        assert_eq!(ReplCommand::parse("/download"), Ok(ReplCommand::Download(None)));
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        assert!(ReplCommand::parse("/use").is_err());
        assert!(ReplCommand::parse("/login a@b.c extra").is_err());
        assert!(ReplCommand::parse("/clear everything").is_err());
        assert!(ReplCommand::parse("/nope").is_err());
    }

    #[test]
    fn test_every_listed_command_parses() {
        for command in COMMANDS {
            let line = match *command {
                "/use" | "/signup" | "/login" | "/social" => format!("{command} x"),
                _ => command.to_string(),
            };
            assert!(ReplCommand::parse(&line).is_ok(), "{line}");
        }
    }

    #[test]
    fn test_panes_append_and_clear() {
        let mut panes = Panes::default();
        panes.append_raw("line one");
        panes.append_raw("line two");
        assert_eq!(panes.raw, "line one\nline two");

        panes.output = "out".into();
        panes.clear(PaneTarget::Output);
        assert_eq!(panes.raw, "line one\nline two");
        assert!(panes.output.is_empty());

        panes.clear(PaneTarget::All);
        assert_eq!(panes, Panes::default());
    }

    #[test]
    fn test_failed_enhance_keeps_raw_and_clears_output() {
        let mut panes = Panes::default();
        panes.append_raw("Tell me about AI");
        panes.output = "previous result".into();

        panes.begin_enhance();
        panes.finish_enhance(Err("Prompt cannot be empty.".into()));

        assert_eq!(panes.raw, "Tell me about AI");
        assert!(panes.output.is_empty());
        assert_eq!(panes.error.as_deref(), Some("Prompt cannot be empty."));

        // A retry dismisses the banner
        panes.begin_enhance();
        panes.finish_enhance(Ok("better prompt".into()));
        assert_eq!(panes.error, None);
        assert_eq!(panes.output, "better prompt");
    }

    #[test]
    fn test_helper_hint_completes_command() {
        let helper = CliHelper::new();
        let history = rustyline::history::DefaultHistory::new();
        let ctx = Context::new(&history);
        assert_eq!(helper.hint("/enh", 4, &ctx), Some("ance".to_string()));
        assert_eq!(helper.hint("hello", 5, &ctx), None);
    }
}
