//! `invctl categories` handlers

use anyhow::{Context, Result};

use inventory_console_client::services::CategoryService;
use shared::{Category, CategoryCreate, CategoryUpdate};

use super::{non_empty, CliContext};
use crate::cli::CategoryCommands;

pub async fn handle(context: &CliContext, command: CategoryCommands) -> Result<()> {
    let service = CategoryService::new(context.api.clone());
    match command {
        CategoryCommands::List { counts } => {
            let categories = service.list(counts).await?;
            context.render(&categories, |items| print_rows(items))
        }
        CategoryCommands::Get(args) => {
            let category = service
                .get(args.id)
                .await
                .with_context(|| format!("failed to load category {}", args.id))?;
            context.render(&category, |c| print_rows(std::slice::from_ref(c)))
        }
        CategoryCommands::Create(args) => {
            let data = CategoryCreate {
                name: args.name,
                description: non_empty(args.description),
            };
            let category = service
                .create(&data)
                .await
                .context("failed to create category")?;
            context.render(&category, |c| {
                println!("Created category {} with id {}", c.name, c.id)
            })
        }
        CategoryCommands::Update { id, fields } => {
            if fields.name.is_none() && fields.description.is_none() {
                anyhow::bail!("nothing to update; pass --name or --description");
            }
            let data = CategoryUpdate {
                name: non_empty(fields.name),
                description: fields.description,
            };
            let category = service
                .update(id, &data)
                .await
                .with_context(|| format!("failed to update category {}", id))?;
            context.render(&category, |c| println!("Updated category {}", c.name))
        }
        CategoryCommands::Delete(args) => {
            service
                .delete(args.id)
                .await
                .with_context(|| format!("failed to delete category {}", args.id))?;
            println!("Deleted category {}", args.id);
            Ok(())
        }
    }
}

fn print_rows(categories: &[Category]) {
    println!("{:>6}  {:<28} {:>8}  {}", "ID", "NAME", "PRODUCTS", "DESCRIPTION");
    for c in categories {
        let count = c
            .product_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<28} {:>8}  {}",
            c.id,
            c.name,
            count,
            c.description.as_deref().unwrap_or("")
        );
    }
}
