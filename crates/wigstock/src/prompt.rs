// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password and confirmation prompts.
//!
//! On a terminal the password is read without echo via `rpassword`. Otherwise
//! one line is read from stdin, so the binary can be scripted.

use std::io::{self, BufRead, IsTerminal, Write};

use secrecy::SecretString;

use crate::CliError;

/// Prompt for a password on stderr and read it.
pub fn read_password(label: &str) -> Result<SecretString, CliError> {
    let password = if io::stdin().is_terminal() {
        eprint!("{label}: ");
        rpassword::read_password().map_err(CliError::Prompt)?
    } else {
        read_line(&mut io::stdin().lock())?
    };

    if password.is_empty() {
        return Err(CliError::InvalidInput("password must not be empty".into()));
    }
    Ok(SecretString::from(password))
}

/// Prompt twice for a new password and require both entries to match.
pub fn read_new_password() -> Result<SecretString, CliError> {
    use secrecy::ExposeSecret;

    let first = read_password("Password")?;
    if !io::stdin().is_terminal() {
        return Ok(first);
    }
    let second = read_password("Confirm password")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(CliError::InvalidInput("passwords do not match".into()));
    }
    Ok(first)
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool, CliError> {
    eprint!("{question} [y/N] ");
    io::stderr().flush().map_err(CliError::Prompt)?;
    let answer = read_line(&mut io::stdin().lock())?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn read_line(input: &mut impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(CliError::Prompt)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn read_line_strips_only_the_line_ending() {
        let mut input = io::Cursor::new(" pass word \r\nnext\n");
        assert_eq!(read_line(&mut input).unwrap(), " pass word ");
        assert_eq!(read_line(&mut input).unwrap(), "next");
        assert_eq!(read_line(&mut input).unwrap(), "");
    }
}
