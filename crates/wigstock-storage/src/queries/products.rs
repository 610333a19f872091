// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product CRUD operations and the stock ranking.

use wigstock_core::{NewProduct, Product, StockLevel, Value, WigstockError};

use crate::dialect::{Dialect, PRODUCTS_TABLE};
use crate::gateway::Gateway;

/// Number of entries returned by [`Gateway::get_sales_data`].
pub const SALES_RANKING_LIMIT: usize = 5;

const COLUMNS: [&str; 5] = ["id", "name", "description", "price", "stock"];

impl Gateway {
    /// Insert a product and return its generated id.
    pub fn add_product(&mut self, product: &NewProduct) -> Result<i64, WigstockError> {
        let operation = format!("add_product(name={})", product.name);
        let sql = insert_sql(self.dialect());
        let outcome = self.execute_as(&operation, &sql, &product_params(product))?;
        outcome.last_insert_id.ok_or_else(|| {
            self.report(
                &operation,
                WigstockError::Internal("insert did not report a generated id".into()),
            )
        })
    }

    /// All products, ordered by id.
    pub fn get_products(&mut self) -> Vec<Product> {
        let rows = self.query_as("get_products", &select_all_sql(self.dialect()), &[]);
        self.decode_all("get_products", &rows)
    }

    pub fn find_product(&mut self, id: i64) -> Option<Product> {
        let operation = format!("find_product(id={id})");
        let row = self
            .query_as(&operation, &select_one_sql(self.dialect()), &[Value::Integer(id)])
            .into_iter()
            .next()?;
        match Product::try_from(&row) {
            Ok(product) => Some(product),
            Err(e) => {
                self.report(&operation, e);
                None
            }
        }
    }

    /// Replace every mutable field of product `id`.
    ///
    /// Returns the number of rows changed; an unknown id is `Ok(0)`.
    pub fn update_product(&mut self, id: i64, product: &NewProduct) -> Result<u64, WigstockError> {
        let operation = format!("update_product(id={id})");
        let mut params = product_params(product);
        params.push(Value::Integer(id));
        let outcome = self.execute_as(&operation, &update_sql(self.dialect()), &params)?;
        Ok(outcome.rows_affected)
    }

    /// Delete product `id`. An unknown id is `Ok(0)`.
    pub fn delete_product(&mut self, id: i64) -> Result<u64, WigstockError> {
        let operation = format!("delete_product(id={id})");
        let outcome =
            self.execute_as(&operation, &delete_sql(self.dialect()), &[Value::Integer(id)])?;
        Ok(outcome.rows_affected)
    }

    /// The best-stocked products, highest stock first, ties broken by id.
    pub fn get_sales_data(&mut self) -> Vec<StockLevel> {
        let rows = self.query_as("get_sales_data", &top_stock_sql(self.dialect()), &[]);
        self.decode_all("get_sales_data", &rows)
    }
}

fn product_params(product: &NewProduct) -> Vec<Value> {
    vec![
        Value::from(product.name.as_str()),
        Value::from(product.description.clone()),
        Value::Real(round_cents(product.price)),
        Value::from(product.stock),
    ]
}

/// Prices are stored with two fractional digits.
fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

fn column_list(dialect: Dialect) -> String {
    COLUMNS
        .iter()
        .map(|c| dialect.quote(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql(dialect: Dialect) -> String {
    let q = |ident: &str| dialect.quote(ident);
    format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES (?, ?, ?, ?)",
        q(PRODUCTS_TABLE),
        q("name"),
        q("description"),
        q("price"),
        q("stock"),
    )
}

fn select_all_sql(dialect: Dialect) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} ASC",
        column_list(dialect),
        dialect.quote(PRODUCTS_TABLE),
        dialect.quote("id"),
    )
}

fn select_one_sql(dialect: Dialect) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(dialect),
        dialect.quote(PRODUCTS_TABLE),
        dialect.quote("id"),
    )
}

fn update_sql(dialect: Dialect) -> String {
    let q = |ident: &str| dialect.quote(ident);
    format!(
        "UPDATE {} SET {} = ?, {} = ?, {} = ?, {} = ? WHERE {} = ?",
        q(PRODUCTS_TABLE),
        q("name"),
        q("description"),
        q("price"),
        q("stock"),
        q("id"),
    )
}

fn delete_sql(dialect: Dialect) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?",
        dialect.quote(PRODUCTS_TABLE),
        dialect.quote("id"),
    )
}

fn top_stock_sql(dialect: Dialect) -> String {
    let q = |ident: &str| dialect.quote(ident);
    format!(
        "SELECT {}, {} FROM {} ORDER BY {} DESC, {} ASC LIMIT {SALES_RANKING_LIMIT}",
        q("name"),
        q("stock"),
        q(PRODUCTS_TABLE),
        q("stock"),
        q("id"),
    )
}
