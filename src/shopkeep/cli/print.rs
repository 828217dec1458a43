use colored::Colorize;
use shopkeep::model::Product;
use shopkeep::service::InventoryStats;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 16;
const PRICE_WIDTH: usize = 10;
const QTY_WIDTH: usize = 6;
const SUPPLIER_WIDTH: usize = 18;

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

/// Warnings go to stderr so piped output stays clean.
pub(super) fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

pub(super) fn print_products(products: &[Product], threshold: i64) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    let header = format!(
        "{}{}{}{}{}  Supplier",
        fit("ID", ID_WIDTH),
        fit("Name", NAME_WIDTH),
        fit("Category", CATEGORY_WIDTH),
        fit_right("Price", PRICE_WIDTH),
        fit_right("Qty", QTY_WIDTH),
    );
    println!("{}", header.bold());
    println!("{}", "-".repeat(header.width()).dimmed());

    for product in products {
        let qty = fit_right(&product.quantity().to_string(), QTY_WIDTH);
        let qty = if product.is_low_stock(threshold) {
            qty.red()
        } else {
            qty.normal()
        };
        println!(
            "{}{}{}{}{}  {}",
            fit(product.id(), ID_WIDTH).yellow(),
            fit(product.name(), NAME_WIDTH),
            fit(product.category(), CATEGORY_WIDTH),
            fit_right(&format!("{:.2}", product.price()), PRICE_WIDTH),
            qty,
            truncate_to_width(product.supplier(), SUPPLIER_WIDTH).dimmed(),
        );
    }
    println!();
    println!("{} product(s)", products.len());
}

pub(super) fn print_product(product: &Product, threshold: i64) {
    println!("{} {}", product.id().yellow(), product.name().bold());
    println!("--------------------------------");
    println!("Category:    {}", product.category());
    println!("Price:       ${:.2}", product.price());
    let qty = product.quantity().to_string();
    if product.is_low_stock(threshold) {
        println!("Quantity:    {} {}", qty.red(), "(low stock)".red());
    } else {
        println!("Quantity:    {}", qty);
    }
    println!("Supplier:    {}", product.supplier());
    println!("Stock value: ${:.2}", product.total_value());
    println!("Added:       {}", product.date_added().dimmed());
}

pub(super) fn print_stats(stats: &InventoryStats) {
    println!("{}", "Inventory statistics".bold());
    println!("--------------------------------");
    println!("Products:       {}", stats.total_products);
    println!("Units in stock: {}", stats.total_quantity);
    println!("Stock value:    ${:.2}", stats.total_value);

    if !stats.categories.is_empty() {
        println!();
        println!("{}", "Categories".bold());
        for (category, count) in &stats.categories {
            println!("  {} {}", fit(category, CATEGORY_WIDTH), count);
        }
    }

    println!();
    let low = format!(
        "Low stock (< {}): {}",
        stats.low_stock_threshold, stats.low_stock_count
    );
    if stats.low_stock_count > 0 {
        println!("{}", low.red());
        for product in &stats.low_stock_products {
            println!("  {}", product.display_line());
        }
    } else {
        println!("{}", low);
    }
}

/// Truncates or pads `s` to exactly `width` display columns.
fn fit(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width.saturating_sub(1));
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(padding))
}

fn fit_right(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width);
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", " ".repeat(padding), cell)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
