use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use enhancer_infrastructure::EnhancerPaths;

mod app;
mod commands;
mod logging;
mod repl;

use app::{App, GlobalOptions};
use commands::enhance::EnhanceArgs;

#[derive(Parser)]
#[command(name = "prompt-enhancer")]
#[command(version)]
#[command(about = "Prompt Enhancer - evaluate a prompt against a rubric, then rewrite it", long_about = None)]
struct Cli {
    /// Root directory for config, secrets, logs and stored state
    #[arg(long, global = true, env = "PROMPT_ENHANCER_HOME", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY, API_KEY and secret.json)
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Keep history and sessions in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance a prompt and print the result
    Enhance(EnhanceArgs),
    /// Browse or clear prompt history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Mock sign-in (not a security mechanism)
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show file locations and effective settings
    Config,
    /// Interactive shell (default)
    Repl,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List entries, newest first
    List,
    /// Show one entry in full
    Show { id: String },
    /// Delete all entries for the active user (or local history)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create an account and log in
    Signup {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in with a password, or with --social to skip it
    Login {
        email: String,
        #[arg(long, conflicts_with = "social")]
        password: Option<String>,
        /// Simulated social login; creates the account if needed
        #[arg(long)]
        social: bool,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = GlobalOptions {
        data_dir: cli.data_dir,
        api_key: cli.api_key,
        ephemeral: cli.ephemeral,
    };

    let paths = EnhancerPaths::new(options.data_dir.as_deref());
    app::load_dotenv(&paths);
    let config = app::load_config(&paths, options.ephemeral);

    let logs_dir = if options.ephemeral {
        None
    } else {
        paths.logs_dir().ok()
    };
    let _log_guard = logging::init_logging(logs_dir.as_deref(), &config.log_level);
    tracing::debug!("[Main] Starting with data dir {:?}", options.data_dir);

    let mut app = App::build(paths, config, &options).await?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Enhance(args) => commands::enhance::run(&mut app, args).await?,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list(&app)?,
            HistoryAction::Show { id } => commands::history::show(&app, &id)?,
            HistoryAction::Clear { yes } => commands::history::clear(&mut app, yes)?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Signup { email, password } => {
                commands::auth::signup(&mut app, &email, password)?
            }
            AuthAction::Login {
                email,
                password,
                social,
            } => commands::auth::login(&mut app, &email, password, social)?,
            AuthAction::Logout => commands::auth::logout(&mut app)?,
            AuthAction::Whoami => commands::auth::whoami(&app)?,
        },
        Commands::Config => commands::config::show(&app)?,
        Commands::Repl => repl::run(&mut app).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_enhance_flags() {
        let cli = Cli::try_parse_from([
            "prompt-enhancer",
            "--ephemeral",
            "enhance",
            "Tell me about AI",
            "--download",
            "--no-history",
        ])
        .unwrap();

        assert!(cli.ephemeral);
        match cli.command {
            Some(Commands::Enhance(args)) => {
                assert_eq!(args.prompt.as_deref(), Some("Tell me about AI"));
                assert!(args.download);
                assert!(args.no_history);
            }
            _ => panic!("expected enhance"),
        }
    }

    #[test]
    fn test_login_password_conflicts_with_social() {
        let result = Cli::try_parse_from([
            "prompt-enhancer",
            "auth",
            "login",
            "a@b.c",
            "--password",
            "x",
            "--social",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["prompt-enhancer"]).unwrap();
        assert!(cli.command.is_none());
    }
}
