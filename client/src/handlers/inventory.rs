//! `invctl inventory` handlers

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use inventory_console_client::services::inventory::HISTORY_LIMIT;
use inventory_console_client::services::InventoryService;
use inventory_console_client::InventoryConsole;
use shared::{
    AdjustmentDraft, AlertSummary, BatchDraft, BatchLineDraft, InventoryMovement, InventoryStats,
    MovementDraft, MovementFilter, MovementType, Notice, Pagination,
};

use super::{non_empty, CliContext};
use crate::cli::{AdjustArgs, BatchArgs, InventoryCommands, ListMovementsArgs, RecordArgs};
use crate::handlers::products::truncate;

pub async fn handle(context: &CliContext, command: InventoryCommands) -> Result<()> {
    let service = InventoryService::new(context.api.clone());
    match command {
        InventoryCommands::Movements(args) => list_movements(context, &service, args).await,
        InventoryCommands::Movement(args) => {
            let movement = service
                .get_movement(args.id)
                .await
                .with_context(|| format!("failed to load movement {}", args.id))?;
            context.render(&movement, |m| print_movements(std::slice::from_ref(m)))
        }
        InventoryCommands::History { product_id, limit } => {
            let limit = if limit == 0 { HISTORY_LIMIT } else { limit };
            let movements = service
                .product_movements(product_id, limit)
                .await
                .with_context(|| format!("failed to load history of product {}", product_id))?;
            context.render(&movements, |items| print_movements(items))
        }
        InventoryCommands::Record(args) => record(context, args).await,
        InventoryCommands::Adjust(args) => adjust(context, args).await,
        InventoryCommands::Batch(args) => batch(context, args).await,
        InventoryCommands::Alerts { all } => {
            let alert = service.low_stock_alerts().await?;
            let summary = AlertSummary::from_alert(&alert);
            context.render(&summary, |s| print_alerts(s, all))
        }
        InventoryCommands::Stats => {
            let stats = service.stats().await?;
            context.render(&stats, print_stats)
        }
        InventoryCommands::Check {
            product_id,
            quantity,
        } => {
            let check = service.check_stock(product_id, quantity).await?;
            context.render(&check, |c| {
                let verdict = if c.available { "available" } else { "not available" };
                println!(
                    "{} units of product {}: {}",
                    c.quantity_requested, c.product_id, verdict
                );
            })
        }
    }
}

async fn list_movements(
    context: &CliContext,
    service: &InventoryService,
    args: ListMovementsArgs,
) -> Result<()> {
    let filter = MovementFilter {
        product_id: args.product,
        movement_type: args.movement_type,
        reason: args.reason,
        user_id: args.user,
        reference: non_empty(args.reference),
        date_from: args.from,
        date_to: args.to,
    };
    let page = service
        .list_movements(Pagination::new(args.page, args.page_size), &filter)
        .await?;
    context.render(&page, |p| {
        print_movements(&p.items);
        println!("Page {} of {} ({} movements)", p.page, p.pages.max(1), p.total);
    })
}

/// Console with its product cache loaded, for the stock-aware mutations
async fn console(context: &CliContext) -> Result<InventoryConsole> {
    let mut console = InventoryConsole::new(context.api.clone());
    console
        .load_products()
        .await
        .context("failed to load products")?;
    Ok(console)
}

async fn record(context: &CliContext, args: RecordArgs) -> Result<()> {
    let mut console = console(context).await?;

    let mut draft = MovementDraft::for_product(args.product, args.movement_type);
    if let Some(reason) = args.reason {
        draft.reason = reason;
    }
    draft.quantity = args.quantity;
    draft.reference = args.reference;
    draft.notes = args.notes;

    let result = console.create_movement(&draft).await;
    print_notices(context, console.take_notices());
    let movement = result?;
    context.render(&movement, |m| print_movements(std::slice::from_ref(m)))
}

async fn adjust(context: &CliContext, args: AdjustArgs) -> Result<()> {
    let mut console = console(context).await?;
    let product = console
        .products()
        .get(args.product)
        .cloned()
        .with_context(|| format!("product {} not found", args.product))?;

    let mut draft = AdjustmentDraft::for_product(&product);
    draft.new_stock = args.new_stock;
    if let Some(reason) = args.reason {
        draft.reason = reason;
    }
    draft.notes = args.notes;
    let difference = draft.difference();

    let result = console.adjust_stock(&draft).await;
    print_notices(context, console.take_notices());
    let movement = result?;
    context.render(&movement, |m| {
        println!(
            "{}: {} -> {} ({:+})",
            product.sku, product.stock_current, m.stock_after, difference
        )
    })
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    product_id: Option<i64>,
    quantity: i64,
    #[serde(default)]
    notes: Option<String>,
}

fn read_batch_file(path: &Path, draft: &mut BatchDraft) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut first = true;
    for (index, row) in reader.deserialize::<BatchRow>().enumerate() {
        let row = row.with_context(|| format!("invalid row {} in {}", index + 2, path.display()))?;
        let line = BatchLineDraft {
            product_id: row.product_id,
            quantity: row.quantity,
            notes: row.notes.unwrap_or_default(),
        };
        if first {
            if let Some(slot) = draft.line_mut(0) {
                *slot = line;
            }
            first = false;
        } else {
            draft.push_line(line);
        }
    }
    Ok(())
}

async fn batch(context: &CliContext, args: BatchArgs) -> Result<()> {
    let mut draft = BatchDraft::new();
    if let Some(reason) = args.reason {
        draft.reason = reason;
    }
    draft.reference = args.reference;
    read_batch_file(&args.file, &mut draft)?;

    let dropped = draft.dropped_count();
    if dropped > 0 && !context.json {
        println!(
            "Skipping {} line(s) without a product or with a non-positive quantity",
            dropped
        );
    }

    let mut console = InventoryConsole::new(context.api.clone());
    let result = console.batch_entry(&draft).await;
    print_notices(context, console.take_notices());
    let movements = result?;
    context.render(&movements, |items| {
        print_movements(items);
        println!("{} units received", draft.total_units());
    })
}

fn print_notices(context: &CliContext, notices: Vec<Notice>) {
    if context.json {
        return;
    }
    for notice in notices {
        match notice {
            Notice::Success(message) => println!("{}", message),
            Notice::Invalid(_) | Notice::Error(_) => {}
        }
    }
}

fn print_movements(movements: &[InventoryMovement]) {
    println!(
        "{:>6}  {:<20} {:<24} {:<10} {:<16} {:>6} {:>13}  {}",
        "ID", "DATE", "PRODUCT", "TYPE", "REASON", "QTY", "STOCK", "REFERENCE"
    );
    for m in movements {
        let product = m
            .product
            .as_ref()
            .map(|p| format!("{} {}", p.sku, p.name))
            .unwrap_or_else(|| format!("#{}", m.product_id));
        let quantity = match m.movement_type {
            MovementType::Exit => format!("-{}", m.quantity),
            MovementType::Entry => format!("+{}", m.quantity),
            _ => format!("{:+}", m.stock_delta()),
        };
        println!(
            "{:>6}  {:<20} {:<24} {:<10} {:<16} {:>6} {:>13}  {}",
            m.id,
            m.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&product, 24),
            m.movement_type.label(),
            m.reason.label(),
            quantity,
            format!("{} -> {}", m.stock_before, m.stock_after),
            m.reference.as_deref().unwrap_or("")
        );
    }
}

fn print_alerts(summary: &AlertSummary, all: bool) {
    if summary.is_empty() {
        println!("No low-stock products");
        return;
    }
    println!(
        "{} out of stock, {} below minimum",
        summary.critical_count, summary.warning_count
    );
    let rows = if all {
        &summary.entries[..]
    } else {
        summary.visible()
    };
    println!(
        "{:<14} {:<32} {:>7} {:>5} {:>7}  {}",
        "SKU", "NAME", "STOCK", "MIN", "DEFICIT", "STATUS"
    );
    for entry in rows {
        println!(
            "{:<14} {:<32} {:>7} {:>5} {:>7}  {}",
            entry.sku,
            truncate(&entry.name, 32),
            entry.stock_current,
            entry.stock_min,
            entry.deficit,
            entry.status
        );
    }
    if !all && summary.hidden_count() > 0 {
        println!("+{} more", summary.hidden_count());
    }
}

fn print_stats(stats: &InventoryStats) {
    println!("Products:        {}", stats.total_products);
    println!("Inventory value: {}", stats.total_value);
    println!("Low stock:       {}", stats.low_stock_count);
    println!("Out of stock:    {}", stats.out_of_stock_count);
    println!(
        "Movements:       {} today, {} this week, {} this month",
        stats.movements_today, stats.movements_week, stats.movements_month
    );
}
