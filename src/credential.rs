//! API key lookup: environment first, then a masked terminal prompt.

use crate::error::CredentialError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{IsTerminal, Write};

#[derive(Debug, PartialEq, Eq)]
enum PromptStep {
    Pending,
    Submit,
    Abort,
}

/// Resolve the API key from `var`, prompting on a terminal when it is unset
pub fn resolve_api_key(var: &str) -> Result<String, CredentialError> {
    if let Some(key) = from_env(var) {
        return Ok(key);
    }

    if !std::io::stdin().is_terminal() {
        return Err(CredentialError::Missing {
            var: var.to_string(),
        });
    }

    eprintln!("Authentication required");
    eprintln!("Please paste your API key ({}) below:", var);
    let key = prompt_masked("API Key: ")?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(key)
}

fn from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

fn prompt_masked(prompt: &str) -> Result<String, CredentialError> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    enable_raw_mode()?;
    let result = read_masked(&mut stderr);
    // Restore the terminal before reporting anything
    disable_raw_mode()?;
    writeln!(stderr)?;
    result
}

fn read_masked(out: &mut impl Write) -> Result<String, CredentialError> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let before = secret.chars().count();
        match apply_key(&mut secret, &key) {
            PromptStep::Submit => return Ok(secret),
            PromptStep::Abort => return Err(CredentialError::Aborted),
            PromptStep::Pending => {}
        }

        let after = secret.chars().count();
        if after > before {
            write!(out, "*")?;
        } else if after < before {
            write!(out, "\x08 \x08")?;
        }
        out.flush()?;
    }
}

fn apply_key(secret: &mut String, key: &KeyEvent) -> PromptStep {
    match key.code {
        KeyCode::Enter => PromptStep::Submit,
        KeyCode::Esc => PromptStep::Abort,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PromptStep::Abort,
        KeyCode::Backspace => {
            secret.pop();
            PromptStep::Pending
        }
        KeyCode::Char(c) => {
            secret.push(c);
            PromptStep::Pending
        }
        _ => PromptStep::Pending,
    }
}
