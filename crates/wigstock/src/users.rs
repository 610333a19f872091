// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wigstock register` and `wigstock login`, plus the login gate in front of
//! every inventory command.

use secrecy::ExposeSecret;
use tracing::info;
use wigstock_core::{NewUser, WigstockError};
use wigstock_storage::Gateway;

use crate::{CliError, prompt};

/// Run `wigstock register`.
pub fn run_register(gateway: &mut Gateway, email: &str, username: &str) -> Result<(), CliError> {
    validate_registration(email, username)?;
    let password = prompt::read_new_password()?;

    let user = NewUser::new(email.trim(), username.trim(), password.expose_secret());
    match gateway.add_user(&user) {
        Ok(()) => {
            info!(username = %user.username, "user registered");
            println!("Registered {}.", user.username);
            Ok(())
        }
        Err(WigstockError::Duplicate { .. }) => Err(CliError::InvalidInput(format!(
            "an account with email {} already exists",
            user.email
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Run `wigstock login`.
pub fn run_login(gateway: &mut Gateway, username: &str) -> Result<(), CliError> {
    require_login(gateway, username)?;
    println!("Welcome, {username}!");
    Ok(())
}

/// Prompt for `username`'s password and fail unless it matches.
pub fn require_login(gateway: &mut Gateway, username: &str) -> Result<(), CliError> {
    let password = prompt::read_password(&format!("Password for {username}"))?;
    if gateway.check_user_credentials(username, password.expose_secret()) {
        Ok(())
    } else {
        Err(CliError::AccessDenied)
    }
}

fn validate_registration(email: &str, username: &str) -> Result<(), CliError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(CliError::InvalidInput(format!(
            "`{email}` is not an email address"
        )));
    }
    if username.trim().is_empty() {
        return Err(CliError::InvalidInput("username must not be empty".into()));
    }
    Ok(())
}
