// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User registration and credential checks.

use wigstock_core::{NewUser, Value, WigstockError};

use crate::dialect::{Dialect, USERS_TABLE};
use crate::gateway::Gateway;

impl Gateway {
    /// Register an account. An email already on file yields
    /// [`WigstockError::Duplicate`].
    pub fn add_user(&mut self, user: &NewUser) -> Result<(), WigstockError> {
        let operation = format!("add_user(email={})", user.email);
        let params = [
            Value::from(user.email.as_str()),
            Value::from(user.username.as_str()),
            Value::from(user.password.as_str()),
        ];
        self.execute_as(&operation, &insert_sql(self.dialect()), &params)?;
        Ok(())
    }

    /// True if some account has exactly this username and password.
    ///
    /// Both values are compared byte for byte, so case matters. A failed
    /// lookup counts as no match.
    pub fn check_user_credentials(&mut self, username: &str, password: &str) -> bool {
        let operation = format!("check_user_credentials(username={username})");
        let params = [Value::from(username), Value::from(password)];
        !self
            .query_as(&operation, &credentials_sql(self.dialect()), &params)
            .is_empty()
    }
}

fn insert_sql(dialect: Dialect) -> String {
    let q = |ident: &str| dialect.quote(ident);
    format!(
        "INSERT INTO {} ({}, {}, {}) VALUES (?, ?, ?)",
        q(USERS_TABLE),
        q("email"),
        q("username"),
        q("password"),
    )
}

fn credentials_sql(dialect: Dialect) -> String {
    format!(
        "SELECT 1 AS {} FROM {} WHERE {} AND {} LIMIT 1",
        dialect.quote("matched"),
        dialect.quote(USERS_TABLE),
        dialect.exact_eq("username"),
        dialect.exact_eq("password"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_lookup_is_binary_on_mysql() {
        assert_eq!(
            credentials_sql(Dialect::MySql),
            "SELECT 1 AS `matched` FROM `users` WHERE BINARY `username` = ? AND BINARY `password` = ? LIMIT 1"
        );
    }

    #[test]
    fn credential_lookup_selects_no_user_columns() {
        let sql = credentials_sql(Dialect::Sqlite);
        let projection = &sql[..sql.find(" FROM ").unwrap()];
        assert!(!projection.contains("password"));
        assert!(!projection.contains("email"));
    }

    #[test]
    fn insert_names_all_three_columns() {
        assert_eq!(
            insert_sql(Dialect::Sqlite),
            "INSERT INTO \"users\" (\"email\", \"username\", \"password\") VALUES (?, ?, ?)"
        );
    }
}
