//! Login, logout and session status.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::Serialize;

use trackdash_core::auth::SESSION_TTL_HOURS;
use trackdash_core::{FileSessionStore, SessionStore};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Login ───────────────────────────────────────────────────────────

pub fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let gate = config::auth_gate(&cfg);
    gate.check_session();

    let username = match args.username {
        Some(u) => u,
        None => prompt_line("Username: ")?,
    };
    let password = match args.password {
        Some(p) => SecretString::from(p),
        None => SecretString::from(rpassword::prompt_password("Password: ")?),
    };

    if !gate.login(&username, &password) {
        return Err(CliError::AuthFailed { username });
    }

    output::print_status(
        &format!("Logged in as {username}"),
        global.quiet,
    );
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String, CliError> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_owned();
    if line.is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(line)
}

// ── Logout ──────────────────────────────────────────────────────────

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let gate = config::auth_gate(&cfg);
    gate.check_session();
    gate.logout();

    output::print_status("Logged out", global.quiet);
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SessionStatus {
    authenticated: bool,
    username: Option<String>,
    logged_in_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    session_file: String,
    api_url: String,
}

fn detail(s: &SessionStatus) -> String {
    let state = match (s.authenticated, s.username.as_deref()) {
        (true, Some(user)) => format!("logged in as {user}"),
        (true, None) => "logged in".into(),
        (false, _) => "not logged in".into(),
    };
    let mut lines = vec![format!("Status:        {state}")];
    if s.authenticated {
        lines.push(format!("Since:         {}", output::local_time(s.logged_in_at)));
        lines.push(format!("Expires:       {}", output::local_time(s.expires_at)));
    }
    lines.push(format!("Session file:  {}", s.session_file));
    lines.push(format!("Backend:       {}", s.api_url));
    lines.join("\n")
}

pub fn status(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let gate = config::auth_gate(&cfg);
    let state = gate.check_session();

    let session_file = cfg.session_file();
    let logged_in_at = if state.authenticated {
        FileSessionStore::new(&session_file)
            .load()
            .ok()
            .flatten()
            .map(|m| m.timestamp)
    } else {
        None
    };

    let status = SessionStatus {
        authenticated: state.authenticated,
        username: state.username,
        logged_in_at,
        expires_at: logged_in_at.map(|t| t + TimeDelta::hours(SESSION_TTL_HOURS)),
        session_file: session_file.display().to_string(),
        api_url: cfg.api.base_url.clone(),
    };

    let out = output::render_single(&global.output, &status, detail, |s| {
        if s.authenticated {
            s.username.clone().unwrap_or_else(|| "authenticated".into())
        } else {
            String::new()
        }
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
