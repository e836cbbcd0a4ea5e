//! Terminal rendering of products, carts, invoices and receipts.

use chrono::{DateTime, Local, Utc};
use tabled::{
    builder::Builder,
    settings::{
        object::{Columns, Rows},
        Alignment, Style,
    },
};

use crate::config::AppConfig;
use scanpos_core::cart::Cart;
use scanpos_core::{CartItem, Invoice, Money, Product};

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn line_total(config: &AppConfig, item: &CartItem) -> String {
    match item.line_total() {
        Some(total) => config.format_currency(total),
        None => "overflow".to_string(),
    }
}

/// Product list as a table, newest first unless sorted otherwise.
pub fn products_table(config: &AppConfig, products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Code", "Name", "Category", "Price", "Active", "Created"]);
    for p in products {
        builder.push_record([
            p.id.clone(),
            p.name.clone(),
            p.category.label().to_string(),
            config.format_currency(p.standard_price),
            if p.is_active { "yes" } else { "no" }.to_string(),
            local_time(p.date_created),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());
    format!("{table}\n{} product(s)", products.len())
}

/// All fields of one product.
pub fn product_detail(config: &AppConfig, product: &Product) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Code", product.id.as_str()]);
    builder.push_record(["Name", product.name.as_str()]);
    builder.push_record(["Category", product.category.label()]);
    builder.push_record([
        "Description",
        product.description.as_deref().unwrap_or("-"),
    ]);
    builder.push_record(["Image", product.image.as_deref().unwrap_or("-")]);
    builder.push_record([
        "Price".to_string(),
        config.format_currency(product.standard_price),
    ]);
    builder.push_record([
        "Cost".to_string(),
        config.format_currency(product.standard_cost),
    ]);
    builder.push_record(["Active", if product.is_active { "yes" } else { "no" }]);
    builder.push_record(["Created".to_string(), local_time(product.date_created)]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// The cart with line totals, the grand total and the quantity badge.
pub fn cart_table(config: &AppConfig, cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Code", "Name", "Qty", "Price", "Amount"]);
    for item in cart.items() {
        builder.push_record([
            item.id().to_string(),
            item.product.name.clone(),
            item.quantity.to_string(),
            config.format_currency(item.product.standard_price),
            line_total(config, item),
        ]);
    }
    let total = match cart.total() {
        Some(total) => config.format_currency(total),
        None => "overflow".to_string(),
    };
    builder.push_record([
        String::new(),
        "Total".to_string(),
        cart.total_quantity().to_string(),
        String::new(),
        total,
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Rows::last(), Alignment::right());
    format!("{table}\n[{} in cart]", cart.total_quantity())
}

/// Invoice history as a table.
pub fn invoices_table(config: &AppConfig, invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return "No invoices found.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Invoice", "Date", "Lines", "Qty", "Total"]);
    for invoice in invoices {
        builder.push_record([
            invoice.id.clone(),
            local_time(invoice.created_at),
            invoice.items.len().to_string(),
            invoice.total_quantity().to_string(),
            config.format_currency(invoice.total),
        ]);
    }
    let sum: Option<Money> = invoices
        .iter()
        .try_fold(Money::zero(), |acc, i| acc.checked_add(i.total));

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    match sum {
        Some(sum) => format!(
            "{table}\n{} invoice(s), {}",
            invoices.len(),
            config.format_currency(sum)
        ),
        None => format!("{table}\n{} invoice(s)", invoices.len()),
    }
}

/// Printed after a checkout.
pub fn receipt(config: &AppConfig, invoice: &Invoice) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Item", "Qty", "Price", "Amount"]);
    for item in &invoice.items {
        builder.push_record([
            item.product.name.clone(),
            item.quantity.to_string(),
            config.format_currency(item.product.standard_price),
            line_total(config, item),
        ]);
    }
    builder.push_record([
        "TOTAL".to_string(),
        invoice.total_quantity().to_string(),
        String::new(),
        config.format_currency(invoice.total),
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..4), Alignment::right());

    format!(
        "{}\n{}\n{}\n{table}",
        config.store_name,
        invoice.id,
        local_time(invoice.created_at)
    )
}
