// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wigstock chart`: the stock ranking as a horizontal bar chart.

use colored::Colorize;
use wigstock_core::StockLevel;
use wigstock_storage::{Gateway, SALES_RANKING_LIMIT};

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

/// Run `wigstock chart`.
pub fn run_chart(gateway: &mut Gateway, use_color: bool) {
    let levels = gateway.get_sales_data();
    if levels.is_empty() {
        println!("No products to chart.");
        return;
    }

    println!();
    println!("  Top {SALES_RANKING_LIMIT} products by stock");
    println!("  {}", "-".repeat(35));
    for bar in bars(&levels, BAR_WIDTH) {
        let filled = BAR_CHAR.to_string().repeat(bar.len);
        let filled = if use_color {
            filled.purple().to_string()
        } else {
            filled
        };
        println!(
            "  {:<label_w$} | {filled} {}",
            bar.label,
            bar.stock,
            label_w = label_width(&levels)
        );
    }
    println!();
}

#[derive(Debug, PartialEq, Eq)]
struct Bar {
    label: String,
    stock: u32,
    len: usize,
}

/// Scale every stock level against the largest one.
///
/// The largest gets `width` cells; any non-zero stock gets at least one.
fn bars(levels: &[StockLevel], width: usize) -> Vec<Bar> {
    let max = levels.iter().map(|l| l.stock).max().unwrap_or(0);
    levels
        .iter()
        .map(|level| {
            let len = if max == 0 {
                0
            } else {
                let scaled = (f64::from(level.stock) * width as f64 / f64::from(max)).round() as usize;
                scaled.max(usize::from(level.stock > 0))
            };
            Bar {
                label: crate::products::truncate(&level.name, 15),
                stock: level.stock,
                len,
            }
        })
        .collect()
}

fn label_width(levels: &[StockLevel]) -> usize {
    levels
        .iter()
        .map(|l| crate::products::truncate(&l.name, 15).chars().count())
        .max()
        .unwrap_or(0)
}
