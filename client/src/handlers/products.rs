//! `invctl products` handlers

use anyhow::{Context, Result};

use inventory_console_client::services::ProductService;
use shared::{
    Pagination, Product, ProductCreate, ProductFilter, ProductUpdate, ProductWithRelations,
    StockUpdateDraft,
};

use super::{non_empty, CliContext};
use crate::cli::{
    CreateProductArgs, DeleteProductArgs, ListProductsArgs, ProductCommands, StockArgs,
    UpdateProductArgs,
};

pub async fn handle(context: &CliContext, command: ProductCommands) -> Result<()> {
    let service = ProductService::new(context.api.clone());
    match command {
        ProductCommands::List(args) => list(context, &service, args).await,
        ProductCommands::Get(args) => {
            let product = service
                .get(args.id)
                .await
                .with_context(|| format!("failed to load product {}", args.id))?;
            context.render(&product, print_product_detail)
        }
        ProductCommands::Sku { sku } => {
            let product = service
                .get_by_sku(&sku)
                .await
                .with_context(|| format!("failed to load product {}", sku))?;
            context.render(&product, |p| print_product_rows(std::slice::from_ref(p)))
        }
        ProductCommands::LowStock { limit } => {
            let products = service.low_stock(limit).await?;
            context.render(&products, |items| print_relation_rows(items))
        }
        ProductCommands::Create(args) => create(context, &service, args).await,
        ProductCommands::Update(args) => update(context, &service, args).await,
        ProductCommands::Delete(args) => delete(&service, args).await,
        ProductCommands::Stock(args) => stock(context, &service, args).await,
    }
}

async fn list(context: &CliContext, service: &ProductService, args: ListProductsArgs) -> Result<()> {
    let filter = ProductFilter {
        search: non_empty(args.search),
        category_id: args.category,
        supplier_id: args.supplier,
        is_active: args.active,
        low_stock_only: args.low_stock,
        min_price: args.min_price,
        max_price: args.max_price,
    };

    if args.all {
        let products = service.list_all(&filter).await?;
        return context.render(&products, |items| print_relation_rows(items));
    }

    let page = service
        .list(Pagination::new(args.page, args.page_size), &filter)
        .await?;
    context.render(&page, |p| {
        print_relation_rows(&p.items);
        println!("Page {} of {} ({} products)", p.page, p.pages.max(1), p.total);
    })
}

async fn create(context: &CliContext, service: &ProductService, args: CreateProductArgs) -> Result<()> {
    let data = ProductCreate {
        sku: args.sku,
        name: args.name,
        description: non_empty(args.description),
        category_id: args.category,
        supplier_id: args.supplier,
        stock_current: args.stock,
        stock_min: args.stock_min,
        cost: args.cost,
        price: args.price,
    };
    let product = service.create(data).await.context("failed to create product")?;
    context.render(&product, |p| {
        println!("Created product {} ({}) with id {}", p.name, p.sku, p.id)
    })
}

async fn update(context: &CliContext, service: &ProductService, args: UpdateProductArgs) -> Result<()> {
    let data = ProductUpdate {
        sku: non_empty(args.sku),
        name: non_empty(args.name),
        description: args.description,
        category_id: args.category,
        supplier_id: args.supplier,
        stock_min: args.stock_min,
        cost: args.cost,
        price: args.price,
        is_active: args.active,
    };
    if data.is_empty() {
        anyhow::bail!("nothing to update; pass at least one field");
    }
    let product = service
        .update(args.id, data)
        .await
        .with_context(|| format!("failed to update product {}", args.id))?;
    context.render(&product, |p| println!("Updated product {} ({})", p.name, p.sku))
}

async fn delete(service: &ProductService, args: DeleteProductArgs) -> Result<()> {
    service
        .delete(args.id, !args.hard)
        .await
        .with_context(|| format!("failed to delete product {}", args.id))?;
    if args.hard {
        println!("Deleted product {}", args.id);
    } else {
        println!("Deactivated product {}", args.id);
    }
    Ok(())
}

async fn stock(context: &CliContext, service: &ProductService, args: StockArgs) -> Result<()> {
    let current: Product = service
        .get(args.id)
        .await
        .with_context(|| format!("failed to load product {}", args.id))?
        .into();

    let mut draft = StockUpdateDraft::for_product(&current, args.operation.into(), args.quantity);
    draft.reason = args.reason;
    let preview = draft.preview();
    let update = draft.build()?;

    let product = service
        .update_stock(&update)
        .await
        .context("failed to update stock")?;
    context.render(&product, |p| {
        println!(
            "{}: {} -> {} (expected {}, reason {})",
            p.sku, current.stock_current, p.stock_current, preview, update.reason
        )
    })
}

fn print_product_rows(products: &[Product]) {
    println!(
        "{:>6}  {:<14} {:<32} {:>7} {:>5} {:>10} {:<12}",
        "ID", "SKU", "NAME", "STOCK", "MIN", "PRICE", "STATUS"
    );
    for p in products {
        println!(
            "{:>6}  {:<14} {:<32} {:>7} {:>5} {:>10} {:<12}",
            p.id,
            p.sku,
            truncate(&p.name, 32),
            p.stock_current,
            p.stock_min,
            p.price,
            p.stock_status()
        );
    }
}

fn print_relation_rows(products: &[ProductWithRelations]) {
    let rows: Vec<Product> = products.iter().map(|p| p.product.clone()).collect();
    print_product_rows(&rows);
}

fn print_product_detail(p: &ProductWithRelations) {
    let product = &p.product;
    println!("{} ({})", product.name, product.sku);
    if let Some(description) = &product.description {
        println!("  {}", description);
    }
    println!(
        "  Stock: {} (min {}) - {}",
        product.stock_current,
        product.stock_min,
        product.stock_status()
    );
    println!(
        "  Cost {}  Price {}  Margin {}%",
        product.cost,
        product.price,
        product.profit_margin()
    );
    if let Some(category) = &p.category {
        println!("  Category: {}", category.name);
    }
    if let Some(supplier) = &p.supplier {
        println!("  Supplier: {}", supplier.name);
    }
    println!("  Active: {}", product.is_active);
}

pub(crate) fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
