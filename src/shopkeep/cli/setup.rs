use clap::{Parser, Subcommand, ValueEnum};
use shopkeep::commands::export::ExportFormat;
use shopkeep::commands::search::SearchField;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shopkeep", version)]
#[command(about = "Inventory manager for a small shop", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Shop home directory (defaults to $SHOPKEEP_HOME, then the user data dir)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Product table to use instead of the configured one
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a product
    #[command(alias = "a")]
    Add {
        name: String,
        category: String,
        /// Unit price
        price: String,
        /// Units in stock
        quantity: String,

        #[arg(short, long, default_value = "")]
        supplier: String,

        /// Explicit product id (assigned automatically if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List products
    #[command(alias = "ls")]
    List {
        /// Only products below the low-stock threshold
        #[arg(short, long)]
        low_stock: bool,

        /// Override the configured low-stock threshold
        #[arg(short, long)]
        threshold: Option<i64>,
    },

    /// Show one product in full
    #[command(alias = "v")]
    View { id: String },

    /// Change fields of a product; omitted fields are left alone
    #[command(alias = "u")]
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        quantity: Option<String>,

        #[arg(long)]
        supplier: Option<String>,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete { id: String },

    /// Add to or remove from stock (e.g. `stock 4 -3`)
    Stock {
        id: String,

        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Search products
    #[command(alias = "s")]
    Search {
        term: String,

        #[arg(long, value_enum, default_value_t = SearchBy::Name)]
        by: SearchBy,
    },

    /// List products from one supplier
    Supplier { name: String },

    /// Inventory statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the catalog
    Export {
        #[arg(value_enum)]
        format: FormatArg,

        /// Target file (defaults to the configured export file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchBy {
    Id,
    Name,
    Category,
}

impl From<SearchBy> for SearchField {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Id => SearchField::Id,
            SearchBy::Name => SearchField::Name,
            SearchBy::Category => SearchField::Category,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}
