// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway behavior against the embedded backend, plus opt-in MySQL checks.

use std::path::Path;
use std::sync::Arc;

use tempfile::{TempDir, tempdir};
use wigstock_core::{MemorySink, NewProduct, NewUser, Product, Value, WigstockError};
use wigstock_storage::{Gateway, SqliteBackend, SqliteOptions};

fn gateway_at(path: &Path) -> (Gateway, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let backend = Box::new(SqliteBackend::new(SqliteOptions::new(path)));
    (Gateway::new(backend, sink.clone()), sink)
}

/// A connected gateway with the schema in place, on a fresh temp file.
fn ready_gateway() -> (Gateway, Arc<MemorySink>, TempDir) {
    let dir = tempdir().unwrap();
    let (mut gateway, sink) = gateway_at(&dir.path().join("shop.db"));
    gateway.connect().unwrap();
    gateway.bootstrap_schema().unwrap();
    (gateway, sink, dir)
}

fn seed_stock(gateway: &mut Gateway, stocks: &[u32]) -> Vec<i64> {
    stocks
        .iter()
        .enumerate()
        .map(|(i, stock)| {
            gateway
                .add_product(&NewProduct::new(format!("Wig {i}"), 10.0, *stock))
                .unwrap()
        })
        .collect()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn bootstrap_is_idempotent_and_keeps_data() {
    let (mut gateway, sink, _dir) = ready_gateway();
    let id = gateway
        .add_product(&NewProduct::new("Lace Front", 120.0, 4))
        .unwrap();

    gateway.bootstrap_schema().unwrap();
    gateway.bootstrap_schema().unwrap();

    let products = gateway.get_products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, id);
    assert!(sink.is_empty(), "unexpected errors: {:?}", sink.messages());
}

#[test]
fn data_survives_reopening_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shop.db");

    {
        let (mut gateway, _sink) = gateway_at(&path);
        gateway.connect().unwrap();
        gateway.bootstrap_schema().unwrap();
        gateway
            .add_product(&NewProduct::new("Bob Cut", 45.5, 2))
            .unwrap();
        // Dropped without an explicit disconnect.
    }

    let (mut gateway, _sink) = gateway_at(&path);
    gateway.connect().unwrap();
    let products = gateway.get_products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Bob Cut");
}

#[test]
fn connect_failure_is_logged_and_leaves_gateway_disconnected() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"a file where a directory should be").unwrap();

    let (mut gateway, sink) = gateway_at(&blocker.join("shop.db"));
    let err = gateway.connect().unwrap_err();

    assert!(matches!(err, WigstockError::Connection { .. }));
    assert!(!gateway.is_connected());
    assert_eq!(sink.len(), 1);
    assert!(sink.last().unwrap().starts_with("connect(sqlite)"));
}

#[test]
fn disconnected_operations_fail_fast_and_are_logged() {
    let dir = tempdir().unwrap();
    let (mut gateway, sink) = gateway_at(&dir.path().join("shop.db"));

    let err = gateway
        .add_product(&NewProduct::new("Wig", 1.0, 1))
        .unwrap_err();
    assert!(matches!(err, WigstockError::NotConnected));
    assert!(gateway.get_products().is_empty());
    assert!(gateway.get_sales_data().is_empty());
    assert!(!gateway.check_user_credentials("ana", "pw"));

    assert!(!gateway.is_connected(), "operations must not auto-connect");
    assert_eq!(sink.len(), 4);
    assert!(sink.messages().iter().all(|m| m.contains("not connected")));
    assert!(!dir.path().join("shop.db").exists());
}

#[test]
fn disconnect_is_idempotent() {
    let (mut gateway, sink, _dir) = ready_gateway();

    gateway.disconnect();
    gateway.disconnect();
    assert!(!gateway.is_connected());
    assert!(sink.is_empty());

    let err = gateway.delete_product(1).unwrap_err();
    assert!(matches!(err, WigstockError::NotConnected));
}

// ============================================================================
// Products
// ============================================================================

#[test]
fn add_then_get_round_trips() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    let new = NewProduct::new("Curly Wig", 89.9, 12).with_description("Synthetic, shoulder length");

    let id = gateway.add_product(&new).unwrap();

    assert_eq!(
        gateway.get_products(),
        vec![Product {
            id,
            name: "Curly Wig".into(),
            description: Some("Synthetic, shoulder length".into()),
            price: 89.9,
            stock: 12,
        }]
    );
}

#[test]
fn whole_prices_and_missing_descriptions_decode() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    let id = gateway
        .add_product(&NewProduct::new("Plain", 20.0, 0))
        .unwrap();

    let product = gateway.find_product(id).unwrap();
    assert_eq!(product.price, 20.0);
    assert_eq!(product.description, None);
    assert_eq!(product.stock, 0);
}

#[test]
fn largest_stock_count_round_trips() {
    let (mut gateway, sink, _dir) = ready_gateway();
    let id = gateway
        .add_product(&NewProduct::new("Warehouse Lot", 1.0, u32::MAX))
        .unwrap();

    assert_eq!(gateway.find_product(id).unwrap().stock, u32::MAX);
    assert!(sink.is_empty(), "{:?}", sink.messages());
}

#[test]
fn products_are_listed_by_id() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    let ids = seed_stock(&mut gateway, &[5, 1, 9]);

    let listed: Vec<i64> = gateway.get_products().iter().map(|p| p.id).collect();
    assert_eq!(listed, ids);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn update_changes_only_the_target() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    let ids = seed_stock(&mut gateway, &[1, 2, 3]);
    let before = gateway.get_products();

    let changed = gateway
        .update_product(ids[1], &NewProduct::new("Renamed", 55.25, 40).with_description("New"))
        .unwrap();
    assert_eq!(changed, 1);

    let after = gateway.get_products();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(
        after[1],
        Product {
            id: ids[1],
            name: "Renamed".into(),
            description: Some("New".into()),
            price: 55.25,
            stock: 40,
        }
    );
}

#[test]
fn update_of_unknown_id_is_zero_rows() {
    let (mut gateway, sink, _dir) = ready_gateway();
    seed_stock(&mut gateway, &[1]);

    let changed = gateway
        .update_product(999, &NewProduct::new("Ghost", 1.0, 1))
        .unwrap();
    assert_eq!(changed, 0);
    assert!(sink.is_empty(), "zero rows is not an error");
}

#[test]
fn delete_then_delete_again() {
    let (mut gateway, sink, _dir) = ready_gateway();
    let ids = seed_stock(&mut gateway, &[1, 2]);

    assert_eq!(gateway.delete_product(ids[0]).unwrap(), 1);
    assert_eq!(gateway.delete_product(ids[0]).unwrap(), 0);
    assert!(gateway.find_product(ids[0]).is_none());
    assert_eq!(gateway.get_products().len(), 1);
    assert!(sink.is_empty());
}

#[test]
fn deleted_ids_are_not_reused() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    let ids = seed_stock(&mut gateway, &[1, 2]);
    gateway.delete_product(ids[1]).unwrap();

    let next = gateway.add_product(&NewProduct::new("Next", 1.0, 1)).unwrap();
    assert!(next > ids[1]);
}

#[test]
fn sales_data_ranks_top_five_by_stock() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    seed_stock(&mut gateway, &[3, 10, 7, 1, 5, 8]);

    let stocks: Vec<u32> = gateway.get_sales_data().iter().map(|s| s.stock).collect();
    assert_eq!(stocks, [10, 8, 7, 5, 3]);
}

#[test]
fn sales_ties_keep_insertion_order() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    seed_stock(&mut gateway, &[4, 4, 9]);

    let names: Vec<String> = gateway
        .get_sales_data()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Wig 2", "Wig 0", "Wig 1"]);
}

#[test]
fn wrong_arity_write_fails_and_leaves_data_untouched() {
    let (mut gateway, sink, _dir) = ready_gateway();
    seed_stock(&mut gateway, &[1, 2]);
    let before = gateway.get_products();

    let result = gateway.execute(
        "INSERT INTO products (name, price, stock) VALUES (?, ?, ?)",
        &[Value::from("Half a product")],
    );

    assert!(matches!(result, Err(WigstockError::Statement { .. })));
    assert_eq!(gateway.get_products(), before);
    assert_eq!(sink.len(), 1);
}

#[test]
fn malformed_query_returns_empty_and_logs() {
    let (mut gateway, sink, _dir) = ready_gateway();

    assert!(gateway.query_all("SELEC name FROM products", &[]).is_empty());
    assert!(gateway.query_one("SELECT nope FROM products", &[]).is_none());
    assert_eq!(sink.len(), 2);
}

// ============================================================================
// Users
// ============================================================================

#[test]
fn credentials_match_exactly() {
    let (mut gateway, _sink, _dir) = ready_gateway();
    gateway
        .add_user(&NewUser::new("ana@example.com", "ana", "Secret1"))
        .unwrap();

    assert!(gateway.check_user_credentials("ana", "Secret1"));
    assert!(!gateway.check_user_credentials("ana", "wrong"));
    assert!(!gateway.check_user_credentials("ANA", "Secret1"));
    assert!(!gateway.check_user_credentials("ana", "secret1"));
    assert!(!gateway.check_user_credentials("ana ", "Secret1"));
    assert!(!gateway.check_user_credentials("nobody", "Secret1"));
}

#[test]
fn duplicate_email_is_reported_as_duplicate() {
    let (mut gateway, sink, _dir) = ready_gateway();
    gateway
        .add_user(&NewUser::new("ana@example.com", "ana", "Secret1"))
        .unwrap();

    let err = gateway
        .add_user(&NewUser::new("ana@example.com", "other", "Another2"))
        .unwrap_err();

    assert!(err.is_duplicate(), "expected duplicate, got {err:?}");
    let logged = sink.last().unwrap();
    assert!(logged.contains("add_user(email=ana@example.com)"), "{logged}");
    // The first account is untouched.
    assert!(gateway.check_user_credentials("ana", "Secret1"));
    assert!(!gateway.check_user_credentials("other", "Another2"));
}

#[test]
fn no_password_reaches_the_error_log() {
    let dir = tempdir().unwrap();
    let (mut gateway, sink) = gateway_at(&dir.path().join("shop.db"));
    let password = "Tr0ub4dor&3";

    // Disconnected failures first, then constraint failures once connected.
    gateway.check_user_credentials("ana", password);
    let _ = gateway.add_user(&NewUser::new("ana@example.com", "ana", password));

    gateway.connect().unwrap();
    gateway.bootstrap_schema().unwrap();
    gateway
        .add_user(&NewUser::new("ana@example.com", "ana", password))
        .unwrap();
    let _ = gateway.add_user(&NewUser::new("ana@example.com", "ana", password));

    let messages = sink.messages();
    assert_eq!(messages.len(), 3);
    for message in messages {
        assert!(!message.contains(password), "password leaked: {message}");
    }
}

// ============================================================================
// MySQL (opt-in: needs a reachable server)
//
//   MYSQL_TEST_HOST=127.0.0.1 MYSQL_TEST_USER=root MYSQL_TEST_PASSWORD=... \
//     cargo test -p wigstock-storage -- --ignored
// ============================================================================

mod mysql {
    use super::*;
    use secrecy::SecretString;
    use serial_test::serial;
    use std::time::Duration;
    use wigstock_storage::{MySqlBackend, MySqlOptions};

    fn mysql_gateway() -> (Gateway, Arc<MemorySink>) {
        let options = MySqlOptions {
            host: std::env::var("MYSQL_TEST_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: std::env::var("MYSQL_TEST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3306),
            user: std::env::var("MYSQL_TEST_USER").unwrap_or_else(|_| "root".into()),
            password: SecretString::from(std::env::var("MYSQL_TEST_PASSWORD").unwrap_or_default()),
            database: "wigstock_test".into(),
            connect_timeout: Some(Duration::from_secs(5)),
        };
        let sink = Arc::new(MemorySink::new());
        let mut gateway = Gateway::new(Box::new(MySqlBackend::new(options)), sink.clone());
        gateway.connect().expect("MySQL test server should be reachable");
        gateway.bootstrap_schema().unwrap();
        gateway.execute("DELETE FROM `products`", &[]).unwrap();
        gateway.execute("DELETE FROM `users`", &[]).unwrap();
        (gateway, sink)
    }

    #[test]
    #[ignore = "requires a MySQL server"]
    #[serial]
    fn mysql_products_round_trip() {
        let (mut gateway, sink) = mysql_gateway();
        let id = gateway
            .add_product(&NewProduct::new("Curly Wig", 89.9, 12).with_description("Synthetic"))
            .unwrap();

        let product = gateway.find_product(id).unwrap();
        assert_eq!(product.price, 89.9);
        assert_eq!(product.description.as_deref(), Some("Synthetic"));
        assert_eq!(gateway.delete_product(id).unwrap(), 1);
        assert_eq!(gateway.delete_product(id).unwrap(), 0);
        assert!(sink.is_empty(), "{:?}", sink.messages());
    }

    #[test]
    #[ignore = "requires a MySQL server"]
    #[serial]
    fn mysql_stock_column_holds_full_u32_range() {
        let (mut gateway, sink) = mysql_gateway();
        let id = gateway
            .add_product(&NewProduct::new("Warehouse Lot", 1.0, u32::MAX))
            .unwrap();

        assert_eq!(gateway.find_product(id).unwrap().stock, u32::MAX);
        assert_eq!(gateway.delete_product(id).unwrap(), 1);
        assert!(sink.is_empty(), "{:?}", sink.messages());
    }

    #[test]
    #[ignore = "requires a MySQL server"]
    #[serial]
    fn mysql_ranking_and_case_sensitive_login() {
        let (mut gateway, _sink) = mysql_gateway();
        seed_stock(&mut gateway, &[3, 10, 7, 1, 5, 8]);
        let stocks: Vec<u32> = gateway.get_sales_data().iter().map(|s| s.stock).collect();
        assert_eq!(stocks, [10, 8, 7, 5, 3]);

        gateway
            .add_user(&NewUser::new("ana@example.com", "ana", "Secret1"))
            .unwrap();
        assert!(gateway.check_user_credentials("ana", "Secret1"));
        assert!(!gateway.check_user_credentials("ANA", "Secret1"));
        assert!(!gateway.check_user_credentials("ana", "secret1"));

        let err = gateway
            .add_user(&NewUser::new("ana@example.com", "ana2", "x"))
            .unwrap_err();
        assert!(err.is_duplicate());
    }
}
