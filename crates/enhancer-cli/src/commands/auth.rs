use anyhow::Result;
use colored::Colorize;

use crate::app::App;
use crate::commands::utils::{prompt_new_password, prompt_password};

pub fn signup(app: &mut App, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_new_password()?,
    };

    let user = app.auth.signup(&mut app.session, email, &password)?;
    println!("{}", format!("Signed up and logged in as {}.", user.email).green());
    Ok(())
}

/// Logs in with a password, or through the simulated social flow.
pub fn login(app: &mut App, email: &str, password: Option<String>, social: bool) -> Result<()> {
    let password = if social {
        None
    } else {
        match password {
            Some(password) => Some(password),
            None => Some(prompt_password("Password")?),
        }
    };

    let user = app.auth.login(&mut app.session, email, password.as_deref())?;
    let count = app.history.list(&app.session).len();
    println!(
        "{}",
        format!("Logged in as {} ({} history item(s)).", user.email, count).green()
    );
    Ok(())
}

pub fn logout(app: &mut App) -> Result<()> {
    match app.auth.current_user(&app.session).cloned() {
        Some(user) => {
            app.auth.logout(&mut app.session);
            println!("{}", format!("Logged out {}.", user.email).green());
        }
        None => println!("{}", "Not logged in.".bright_black()),
    }
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    match app.auth.current_user(&app.session) {
        Some(user) => println!("{}", user.email),
        None => println!("{}", "Not logged in (using local history).".bright_black()),
    }
    Ok(())
}
