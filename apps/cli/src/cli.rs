//! Command-line surface.
//!
//! ```text
//! scanpos [--config <file>] [--db <file>] <command>
//!
//!   product add <id> --name <name> --price <amount> [...]
//!   product show <id>
//!   product edit <id> [--name ..] [--price ..] [--active true|false] [...]
//!   product delete <id>
//!   product list [--search ..] [--category ..] [--sort ..] [--from ..] [--to ..]
//!   invoice list [--search ..] [--sort ..] [--from ..] [--to ..]
//!   invoice clear --yes
//!   session
//! ```

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use scanpos_core::listing::{DateRange, InvoiceQuery, InvoiceSort, ProductQuery, ProductSort};
use scanpos_core::validation::{parse_amount, ValidationResult};
use scanpos_core::{Category, Money, NewProduct, ProductPatch};

#[derive(Debug, Parser)]
#[command(name = "scanpos", version, about = "Scan-to-sell point of sale")]
pub struct Cli {
    /// Config file (default: scanpos.toml in the platform config directory)
    #[arg(long, global = true, env = "SCANPOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Browse or clear invoice history
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Scan codes from stdin into a cart and check out
    Session,
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Add a product under a scanned code
    Add(AddProductArgs),

    /// Show one product
    Show { id: String },

    /// Change fields of a product
    Edit(EditProductArgs),

    /// Delete a product
    Delete { id: String },

    /// List products
    List(ProductListArgs),
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// List invoices
    List(InvoiceListArgs),

    /// Delete every invoice
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

// =============================================================================
// Product Arguments
// =============================================================================

#[derive(Debug, Args)]
pub struct AddProductArgs {
    /// Scanned code
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Category slug (fmcg, food, ...)
    #[arg(long, default_value = "fmcg")]
    pub category: Category,

    /// Selling price, e.g. 25000 or 25,000
    #[arg(long)]
    pub price: Option<String>,

    /// Purchase cost
    #[arg(long)]
    pub cost: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Image URI
    #[arg(long)]
    pub image: Option<String>,

    /// Create the product as inactive
    #[arg(long)]
    pub inactive: bool,
}

impl AddProductArgs {
    /// Parses the amounts. Name, price and cost are required.
    pub fn into_new_product(self) -> ValidationResult<NewProduct> {
        Ok(NewProduct {
            standard_price: parse_amount("standard_price", self.price.as_deref().unwrap_or(""))?,
            standard_cost: parse_amount("standard_cost", self.cost.as_deref().unwrap_or(""))?,
            id: self.id,
            name: self.name.unwrap_or_default(),
            category: self.category,
            description: self.description,
            image: self.image,
            is_active: !self.inactive,
        })
    }
}

#[derive(Debug, Args)]
pub struct EditProductArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub cost: Option<String>,

    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    #[arg(long)]
    pub clear_description: bool,

    #[arg(long, conflicts_with = "clear_image")]
    pub image: Option<String>,

    #[arg(long)]
    pub clear_image: bool,

    /// true or false
    #[arg(long)]
    pub active: Option<bool>,
}

impl EditProductArgs {
    pub fn into_patch(self) -> ValidationResult<ProductPatch> {
        Ok(ProductPatch {
            name: self.name,
            category: self.category,
            description: optional_text(self.description, self.clear_description),
            image: optional_text(self.image, self.clear_image),
            is_active: self.active,
            standard_price: optional_amount("standard_price", self.price)?,
            standard_cost: optional_amount("standard_cost", self.cost)?,
        })
    }
}

fn optional_text(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        return Some(None);
    }
    value.map(|v| {
        let v = v.trim().to_string();
        (!v.is_empty()).then_some(v)
    })
}

fn optional_amount(field: &str, value: Option<String>) -> ValidationResult<Option<Money>> {
    value.map(|text| parse_amount(field, &text)).transpose()
}

#[derive(Debug, Args)]
pub struct ProductListArgs {
    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub category: Option<Category>,

    /// Only active (true) or inactive (false) products
    #[arg(long)]
    pub active: Option<bool>,

    /// Created at or after (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Created at or before (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    /// date_desc, name_asc, name_desc, price_asc or price_desc
    #[arg(long, default_value_t = ProductSort::default())]
    pub sort: ProductSort,
}

impl From<ProductListArgs> for ProductQuery {
    fn from(args: ProductListArgs) -> Self {
        ProductQuery {
            search: args.search,
            category: args.category,
            active: args.active,
            created: DateRange {
                from: args.from,
                to: args.to,
            },
            sort: args.sort,
        }
    }
}

// =============================================================================
// Invoice Arguments
// =============================================================================

#[derive(Debug, Args)]
pub struct InvoiceListArgs {
    /// Matches names of sold products
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    /// date_desc, date_asc, total_asc or total_desc
    #[arg(long, default_value_t = InvoiceSort::default())]
    pub sort: InvoiceSort,
}

impl From<InvoiceListArgs> for InvoiceQuery {
    fn from(args: InvoiceListArgs) -> Self {
        InvoiceQuery {
            search: args.search,
            created: DateRange {
                from: args.from,
                to: args.to,
            },
            sort: args.sort,
        }
    }
}
