// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL text differences between the two engines.
//!
//! Both engines take `?` positional placeholders, so statement text differs
//! only in identifier quoting, column types, auto-increment syntax, and how a
//! case-sensitive comparison is spelled.

use wigstock_core::BackendKind;

/// Table holding products.
pub const PRODUCTS_TABLE: &str = "products";

/// Table holding user accounts.
pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    pub fn for_backend(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Sqlite => Dialect::Sqlite,
            BackendKind::MySql => Dialect::MySql,
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote(self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }

    /// Column definition for a store-generated integer primary key.
    pub fn auto_increment_pk(self) -> &'static str {
        match self {
            // AUTOINCREMENT keeps deleted ids from being handed out again.
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
            Dialect::MySql => "INT AUTO_INCREMENT PRIMARY KEY",
        }
    }

    /// Bounded text column type.
    pub fn varchar(self, max: u32) -> String {
        match self {
            Dialect::Sqlite => "TEXT".to_string(),
            Dialect::MySql => format!("VARCHAR({max})"),
        }
    }

    /// `column = ?`, compared byte for byte.
    ///
    /// MySQL's default collations ignore case and trailing spaces, so the
    /// column is compared as a binary string there.
    pub fn exact_eq(self, column: &str) -> String {
        match self {
            Dialect::Sqlite => format!("{} = ?", self.quote(column)),
            Dialect::MySql => format!("BINARY {} = ?", self.quote(column)),
        }
    }

    /// Column type holding a product's stock count.
    pub fn stock_type(self) -> &'static str {
        match self {
            Dialect::Sqlite => "INTEGER",
            // Covers the whole `u32` range of `Product::stock`.
            Dialect::MySql => "INT UNSIGNED",
        }
    }

    /// Table options appended after the closing parenthesis of `CREATE TABLE`.
    fn table_options(self) -> &'static str {
        match self {
            Dialect::Sqlite => "",
            // InnoDB is required for rollback on failed writes.
            Dialect::MySql => " ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statements for every table, in creation order.
    pub fn schema(self) -> Vec<String> {
        let q = |ident: &str| self.quote(ident);

        let products = format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             {id} {pk}, \
             {name} {name_type} NOT NULL, \
             {description} TEXT NULL, \
             {price} DECIMAL(10,2) NOT NULL, \
             {stock} {stock_type} NOT NULL DEFAULT 0 CHECK ({stock} >= 0)\
             ){options}",
            table = q(PRODUCTS_TABLE),
            id = q("id"),
            pk = self.auto_increment_pk(),
            name = q("name"),
            name_type = self.varchar(100),
            description = q("description"),
            price = q("price"),
            stock = q("stock"),
            stock_type = self.stock_type(),
            options = self.table_options(),
        );

        let users = match self {
            // The embedded store keys accounts on their email address.
            Dialect::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 {email} TEXT PRIMARY KEY, \
                 {username} TEXT NOT NULL, \
                 {password} TEXT NOT NULL\
                 )",
                table = q(USERS_TABLE),
                email = q("email"),
                username = q("username"),
                password = q("password"),
            ),
            Dialect::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 {id} {pk}, \
                 {email} VARCHAR(100) NOT NULL UNIQUE, \
                 {username} VARCHAR(100) NOT NULL, \
                 {password} VARCHAR(255) NOT NULL\
                 ){options}",
                table = q(USERS_TABLE),
                id = q("id"),
                pk = self.auto_increment_pk(),
                email = q("email"),
                username = q("username"),
                password = q("password"),
                options = self.table_options(),
            ),
        };

        vec![products, users]
    }
}
