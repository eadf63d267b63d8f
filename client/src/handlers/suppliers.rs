//! `invctl suppliers` handlers

use anyhow::{Context, Result};

use inventory_console_client::services::SupplierService;
use shared::{Supplier, SupplierCreate, SupplierUpdate};

use super::{non_empty, CliContext};
use crate::cli::{SupplierCommands, SupplierUpdateArgs};

pub async fn handle(context: &CliContext, command: SupplierCommands) -> Result<()> {
    let service = SupplierService::new(context.api.clone());
    match command {
        SupplierCommands::List { active, counts } => {
            let suppliers = service.list(active, counts).await?;
            context.render(&suppliers, |items| print_rows(items))
        }
        SupplierCommands::Search { term } => {
            let suppliers = service.search(&term).await?;
            context.render(&suppliers, |items| {
                if items.is_empty() {
                    println!("No suppliers match \"{}\"", term);
                } else {
                    print_rows(items);
                }
            })
        }
        SupplierCommands::Get(args) => {
            let supplier = service
                .get(args.id)
                .await
                .with_context(|| format!("failed to load supplier {}", args.id))?;
            context.render(&supplier, print_detail)
        }
        SupplierCommands::Create(args) => {
            let data = SupplierCreate {
                name: args.name,
                contact_person: non_empty(args.contact),
                email: non_empty(args.email),
                phone: non_empty(args.phone),
                address: non_empty(args.address),
            };
            let supplier = service
                .create(&data)
                .await
                .context("failed to create supplier")?;
            context.render(&supplier, |s| {
                println!("Created supplier {} with id {}", s.name, s.id)
            })
        }
        SupplierCommands::Update { id, fields } => {
            let data = update_payload(fields)?;
            let supplier = service
                .update(id, &data)
                .await
                .with_context(|| format!("failed to update supplier {}", id))?;
            context.render(&supplier, |s| println!("Updated supplier {}", s.name))
        }
        SupplierCommands::Delete(args) => {
            service
                .delete(args.id)
                .await
                .with_context(|| format!("failed to deactivate supplier {}", args.id))?;
            println!("Deactivated supplier {}", args.id);
            Ok(())
        }
    }
}

fn update_payload(fields: SupplierUpdateArgs) -> Result<SupplierUpdate> {
    let data = SupplierUpdate {
        name: non_empty(fields.name),
        contact_person: fields.contact,
        email: non_empty(fields.email),
        phone: fields.phone,
        address: fields.address,
        is_active: fields.active,
    };
    let untouched = data.name.is_none()
        && data.contact_person.is_none()
        && data.email.is_none()
        && data.phone.is_none()
        && data.address.is_none()
        && data.is_active.is_none();
    if untouched {
        anyhow::bail!("nothing to update; pass at least one field");
    }
    Ok(data)
}

fn print_rows(suppliers: &[Supplier]) {
    println!(
        "{:>6}  {:<28} {:<22} {:<28} {:>8}  {}",
        "ID", "NAME", "CONTACT", "EMAIL", "PRODUCTS", "ACTIVE"
    );
    for s in suppliers {
        let count = s
            .product_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<28} {:<22} {:<28} {:>8}  {}",
            s.id,
            s.name,
            s.contact_person.as_deref().unwrap_or(""),
            s.email.as_deref().unwrap_or(""),
            count,
            if s.is_active { "yes" } else { "no" }
        );
    }
}

fn print_detail(s: &Supplier) {
    println!("{} (id {})", s.name, s.id);
    for (label, value) in [
        ("Contact", &s.contact_person),
        ("Email", &s.email),
        ("Phone", &s.phone),
        ("Address", &s.address),
    ] {
        if let Some(value) = value {
            println!("  {}: {}", label, value);
        }
    }
    println!("  Active: {}", s.is_active);
}
