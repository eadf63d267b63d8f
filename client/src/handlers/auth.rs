//! `invctl auth` handlers

use anyhow::{Context, Result};

use inventory_console_client::services::AuthService;
use shared::{LoginCredentials, RegisterData, Role};

use super::CliContext;
use crate::cli::{AuthCommands, LoginArgs, RegisterArgs, RoleArg};

pub async fn handle(context: &CliContext, command: AuthCommands) -> Result<()> {
    let service = AuthService::new(context.api.clone());
    match command {
        AuthCommands::Login(args) => login(context, &service, args).await,
        AuthCommands::Register(args) => register(context, &service, args).await,
        AuthCommands::Whoami => {
            let user = service
                .current_user()
                .await
                .context("failed to load the current user")?;
            context.render(&user, |u| {
                println!("{} <{}>", u.full_name, u.email);
                println!("Role: {}", u.role);
                println!("Active: {}", u.is_active);
            })
        }
        AuthCommands::Logout => {
            service.logout()?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn login(context: &CliContext, service: &AuthService, args: LoginArgs) -> Result<()> {
    let credentials = LoginCredentials {
        email: args.email,
        password: args.password,
    };
    let token = service
        .login(&credentials)
        .await
        .context("failed to authenticate")?;
    context.render(&token, |_| println!("Logged in as {}", credentials.email))
}

async fn register(context: &CliContext, service: &AuthService, args: RegisterArgs) -> Result<()> {
    let data = RegisterData {
        email: args.email,
        full_name: args.full_name,
        password: args.password,
        role: args.role.map(|r| match r {
            RoleArg::Admin => Role::Admin,
            RoleArg::Seller => Role::Seller,
            RoleArg::WarehouseKeeper => Role::WarehouseKeeper,
        }),
    };
    let user = service.register(&data).await.context("failed to register")?;
    context.render(&user, |u| {
        println!("Registered {} (id {}, role {})", u.email, u.id, u.role)
    })
}
