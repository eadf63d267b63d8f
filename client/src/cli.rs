//! Command-line arguments for `invctl`

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use shared::{MovementReason, MovementType, StockOperation};

#[derive(Parser)]
#[command(name = "invctl", about = "Inventory console for the product and stock service", version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    pub json: bool,

    #[arg(long, global = true, env = "INVC__API__BASE_URL", help = "Inventory service URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand)]
    Auth(AuthCommands),
    #[command(subcommand)]
    Products(ProductCommands),
    #[command(subcommand)]
    Categories(CategoryCommands),
    #[command(subcommand)]
    Suppliers(SupplierCommands),
    #[command(subcommand)]
    Inventory(InventoryCommands),
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Subcommand)]
pub enum AuthCommands {
    Login(LoginArgs),
    Register(RegisterArgs),
    /// Show the logged-in user
    Whoami,
    Logout,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long, help = "Email address for the account")]
    pub email: String,
    #[arg(long, env = "INVC_PASSWORD", help = "Password for the account")]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long, env = "INVC_PASSWORD")]
    pub password: String,
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Seller,
    WarehouseKeeper,
}

// ============================================================================
// Products
// ============================================================================

#[derive(Subcommand)]
pub enum ProductCommands {
    List(ListProductsArgs),
    Get(IdArg),
    /// Look a product up by SKU
    Sku {
        sku: String,
    },
    /// Products below their minimum stock
    LowStock {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Create(CreateProductArgs),
    Update(UpdateProductArgs),
    Delete(DeleteProductArgs),
    /// Add, remove or set a product's stock
    Stock(StockArgs),
}

#[derive(Args)]
pub struct IdArg {
    pub id: i64,
}

#[derive(Args)]
pub struct ListProductsArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub supplier: Option<i64>,
    #[arg(long)]
    pub active: Option<bool>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub low_stock: bool,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
    #[arg(long, action = ArgAction::SetTrue, help = "Fetch every page")]
    pub all: bool,
}

#[derive(Args)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub supplier: Option<i64>,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long, default_value_t = 0)]
    pub stock_min: i64,
    #[arg(long)]
    pub cost: Decimal,
    #[arg(long)]
    pub price: Decimal,
}

#[derive(Args)]
pub struct UpdateProductArgs {
    pub id: i64,
    #[arg(long)]
    pub sku: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub supplier: Option<i64>,
    #[arg(long)]
    pub stock_min: Option<i64>,
    #[arg(long)]
    pub cost: Option<Decimal>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args)]
pub struct DeleteProductArgs {
    pub id: i64,
    #[arg(long, action = ArgAction::SetTrue, help = "Remove instead of deactivating")]
    pub hard: bool,
}

#[derive(Args)]
pub struct StockArgs {
    pub id: i64,
    #[arg(long, value_enum, default_value_t = OperationArg::Add)]
    pub operation: OperationArg,
    #[arg(long)]
    pub quantity: i64,
    #[arg(long, value_parser = parse_reason)]
    pub reason: Option<MovementReason>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Add,
    Remove,
    Set,
}

impl From<OperationArg> for StockOperation {
    fn from(op: OperationArg) -> Self {
        match op {
            OperationArg::Add => StockOperation::Add,
            OperationArg::Remove => StockOperation::Remove,
            OperationArg::Set => StockOperation::Set,
        }
    }
}

// ============================================================================
// Categories and suppliers
// ============================================================================

#[derive(Subcommand)]
pub enum CategoryCommands {
    List {
        #[arg(long, action = ArgAction::SetTrue)]
        counts: bool,
    },
    Get(IdArg),
    Create(CategoryArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CategoryUpdateArgs,
    },
    Delete(IdArg),
}

#[derive(Args)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct CategoryUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum SupplierCommands {
    List {
        #[arg(long)]
        active: Option<bool>,
        #[arg(long, action = ArgAction::SetTrue)]
        counts: bool,
    },
    Search {
        term: String,
    },
    Get(IdArg),
    Create(SupplierArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SupplierUpdateArgs,
    },
    /// Deactivate a supplier
    Delete(IdArg),
}

#[derive(Args)]
pub struct SupplierArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Args)]
pub struct SupplierUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

// ============================================================================
// Inventory
// ============================================================================

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// List movements
    Movements(ListMovementsArgs),
    /// Show one movement
    Movement(IdArg),
    /// Movement history of one product
    History {
        product_id: i64,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Record an entry, exit or adjustment
    Record(RecordArgs),
    /// Set a product's stock to an absolute level
    Adjust(AdjustArgs),
    /// Receive several products at once from a CSV file
    Batch(BatchArgs),
    /// Low-stock alert summary
    Alerts {
        #[arg(long, action = ArgAction::SetTrue, help = "Show every row instead of the first 10")]
        all: bool,
    },
    Stats,
    /// Check whether a quantity is available
    Check {
        product_id: i64,
        quantity: i64,
    },
}

#[derive(Args)]
pub struct ListMovementsArgs {
    #[arg(long)]
    pub product: Option<i64>,
    #[arg(long = "type", value_parser = parse_type)]
    pub movement_type: Option<MovementType>,
    #[arg(long, value_parser = parse_reason)]
    pub reason: Option<MovementReason>,
    #[arg(long)]
    pub user: Option<i64>,
    #[arg(long)]
    pub reference: Option<String>,
    #[arg(long, value_parser = parse_date, help = "YYYY-MM-DD or RFC 3339")]
    pub from: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_date, help = "YYYY-MM-DD or RFC 3339")]
    pub to: Option<DateTime<Utc>>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
}

#[derive(Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub product: i64,
    #[arg(long = "type", value_parser = parse_type)]
    pub movement_type: MovementType,
    #[arg(long, value_parser = parse_reason, help = "Defaults to the first reason of the type")]
    pub reason: Option<MovementReason>,
    #[arg(long)]
    pub quantity: i64,
    #[arg(long, default_value = "")]
    pub reference: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct AdjustArgs {
    #[arg(long)]
    pub product: i64,
    #[arg(long)]
    pub new_stock: i64,
    #[arg(long, value_parser = parse_reason)]
    pub reason: Option<MovementReason>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct BatchArgs {
    #[arg(long, help = "CSV with columns product_id,quantity[,notes]")]
    pub file: PathBuf,
    #[arg(long, value_parser = parse_reason)]
    pub reason: Option<MovementReason>,
    #[arg(long, default_value = "")]
    pub reference: String,
}

fn parse_type(raw: &str) -> Result<MovementType, String> {
    raw.parse()
}

fn parse_reason(raw: &str) -> Result<MovementReason, String> {
    raw.parse()
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {}", raw));
    }
    shared::timestamp::parse(raw).map_err(|e| format!("invalid date {}: {}", raw, e))
}
