use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use crate::app::App;
use crate::commands::utils::{download_path, write_text_file};

/// Arguments of `prompt-enhancer enhance`.
#[derive(Args, Debug, Clone, Default)]
pub struct EnhanceArgs {
    /// Prompt text (read from --file or stdin when omitted)
    pub prompt: Option<String>,
    /// Read the prompt from a file
    #[arg(long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,
    /// Also write the result to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Also write the result to ./enhanced-prompt.txt
    #[arg(long)]
    pub download: bool,
    /// Do not record this run in history
    #[arg(long)]
    pub no_history: bool,
}

/// Runs the pipeline once and prints the enhanced prompt to stdout.
pub async fn run(app: &mut App, args: EnhanceArgs) -> Result<()> {
    let raw_prompt = read_raw_prompt(&args)?;

    eprintln!("{}", "Evaluating and revising prompt...".bright_black());
    let enhanced = app.enhancer.enhance(&raw_prompt).await?;

    if !args.no_history {
        app.history.add(&mut app.session, &raw_prompt, &enhanced);
    }

    println!("{}", enhanced);

    if let Some(path) = &args.output {
        write_text_file(path, &enhanced)?;
        eprintln!("{}", format!("Saved to {}", path.display()).green());
    }
    if args.download {
        let path = download_path();
        write_text_file(&path, &enhanced)?;
        eprintln!("{}", format!("Downloaded {}", path.display()).green());
    }

    Ok(())
}

/// Prompt text from the argument, `--file`, or piped stdin, in that order.
fn read_raw_prompt(args: &EnhanceArgs) -> Result<String> {
    if let Some(prompt) = &args.prompt {
        return Ok(prompt.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No prompt given. Pass it as an argument, with --file, or on stdin.");
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer).context("Failed to read stdin")?;
    Ok(buffer)
}
