// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wigstock products` command implementation.

use clap::{Args, Subcommand};
use colored::Colorize;
use tracing::info;
use wigstock_core::{NewProduct, Product};
use wigstock_storage::Gateway;

use crate::{CliError, prompt};

const NAME_WIDTH: usize = 15;
const DESCRIPTION_WIDTH: usize = 30;

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// List every product.
    List,
    /// Add a product.
    Add(AddArgs),
    /// Change fields of an existing product. Omitted fields keep their value.
    Update(UpdateArgs),
    /// Delete a product.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: f64,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    /// Remove the description.
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub stock: Option<u32>,
}

/// Run one `wigstock products` subcommand.
pub fn run_products(
    gateway: &mut Gateway,
    command: ProductsCommand,
    use_color: bool,
) -> Result<(), CliError> {
    match command {
        ProductsCommand::List => {
            print_products(&gateway.get_products(), use_color);
            Ok(())
        }
        ProductsCommand::Add(args) => add(gateway, args),
        ProductsCommand::Update(args) => update(gateway, args),
        ProductsCommand::Delete { id, yes } => delete(gateway, id, yes),
    }
}

fn add(gateway: &mut Gateway, args: AddArgs) -> Result<(), CliError> {
    let mut product = NewProduct::new(require_name(&args.name)?, validate_price(args.price)?, args.stock);
    product.description = args.description.filter(|d| !d.trim().is_empty());

    let id = gateway.add_product(&product)?;
    info!(id, name = %product.name, "product added");
    println!("Added product #{id}.");
    Ok(())
}

fn update(gateway: &mut Gateway, args: UpdateArgs) -> Result<(), CliError> {
    let current = gateway
        .find_product(args.id)
        .ok_or(CliError::NotFound(args.id))?;
    let product = merge_update(current, &args)?;

    if gateway.update_product(args.id, &product)? == 0 {
        return Err(CliError::NotFound(args.id));
    }
    info!(id = args.id, "product updated");
    println!("Updated product #{}.", args.id);
    Ok(())
}

fn delete(gateway: &mut Gateway, id: i64, yes: bool) -> Result<(), CliError> {
    if !yes && !prompt::confirm(&format!("Delete product #{id}?"))? {
        println!("Cancelled.");
        return Ok(());
    }
    if gateway.delete_product(id)? == 0 {
        return Err(CliError::NotFound(id));
    }
    info!(id, "product deleted");
    println!("Deleted product #{id}.");
    Ok(())
}

/// Apply the supplied fields over the stored product.
fn merge_update(current: Product, args: &UpdateArgs) -> Result<NewProduct, CliError> {
    let name = match &args.name {
        Some(name) => require_name(name)?,
        None => current.name,
    };
    let price = match args.price {
        Some(price) => validate_price(price)?,
        None => current.price,
    };
    let description = if args.clear_description {
        None
    } else {
        args.description.clone().or(current.description)
    };

    Ok(NewProduct {
        name,
        description,
        price,
        stock: args.stock.unwrap_or(current.stock),
    })
}

fn require_name(name: &str) -> Result<String, CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidInput("product name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Prices must be positive.
pub fn validate_price(price: f64) -> Result<f64, CliError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(CliError::InvalidInput(format!(
            "price must be greater than 0, got {price}"
        )))
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// One table row, without color.
fn product_line(product: &Product) -> String {
    format!(
        "  {:>5}  {:<name_w$}  {:>10}  {:>6}  {}",
        product.id,
        truncate(&product.name, NAME_WIDTH),
        format_price(product.price),
        product.stock,
        truncate(product.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
        name_w = NAME_WIDTH + 3,
    )
}

fn print_products(products: &[Product], use_color: bool) {
    if products.is_empty() {
        println!("No products yet. Add one with `wigstock products add`.");
        return;
    }

    let header = format!(
        "  {:>5}  {:<name_w$}  {:>10}  {:>6}  {}",
        "ID",
        "NAME",
        "PRICE",
        "STOCK",
        "DESCRIPTION",
        name_w = NAME_WIDTH + 3,
    );
    if use_color {
        println!("{}", header.bold());
    } else {
        println!("{header}");
    }
    println!("  {}", "-".repeat(80));

    for product in products {
        let line = product_line(product);
        if use_color && product.stock == 0 {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Product {
        Product {
            id: 7,
            name: "Lace Front".into(),
            description: Some("Human hair".into()),
            price: 120.0,
            stock: 3,
        }
    }

    fn update_args(id: i64) -> UpdateArgs {
        UpdateArgs {
            id,
            name: None,
            description: None,
            clear_description: false,
            price: None,
            stock: None,
        }
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Short", 15), "Short");
        assert_eq!(truncate("Exactly fifteen", 15), "Exactly fifteen");
        assert_eq!(truncate("Sixteen chars!!!", 15), "Sixteen chars!!...");
        assert_eq!(truncate("", 30), "");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Peruca Diferentona Ondulada", 15), "Peruca Diferent...");
        assert_eq!(truncate("ÁÉÍÓÚ", 3), "ÁÉÍ...");
    }

    #[test]
    fn prices_show_two_decimals() {
        assert_eq!(format_price(20.0), "20.00");
        assert_eq!(format_price(89.9), "89.90");
        assert_eq!(format_price(1234.5), "1234.50");
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-5.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut args = update_args(7);
        args.stock = Some(9);

        let merged = merge_update(stored(), &args).unwrap();
        assert_eq!(
            merged,
            NewProduct {
                name: "Lace Front".into(),
                description: Some("Human hair".into()),
                price: 120.0,
                stock: 9,
            }
        );
    }

    #[test]
    fn update_can_clear_the_description() {
        let mut args = update_args(7);
        args.clear_description = true;
        assert_eq!(merge_update(stored(), &args).unwrap().description, None);
    }

    #[test]
    fn update_rejects_bad_price_and_blank_name() {
        let mut args = update_args(7);
        args.price = Some(0.0);
        assert!(matches!(merge_update(stored(), &args), Err(CliError::InvalidInput(_))));

        let mut args = update_args(7);
        args.name = Some("   ".into());
        assert!(matches!(merge_update(stored(), &args), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn product_line_truncates_and_formats() {
        let product = Product {
            id: 1,
            name: "Extra Long Curly Wig".into(),
            description: Some("A very long description that keeps going".into()),
            price: 89.9,
            stock: 12,
        };
        let line = product_line(&product);
        assert!(line.contains("Extra Long Curl..."), "{line}");
        assert!(line.contains("89.90"));
        assert!(line.ends_with("A very long description that k..."), "{line}");
    }
}
