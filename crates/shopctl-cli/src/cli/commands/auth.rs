//! Auth command handlers: login, logout, register, whoami, status, and the
//! password flows.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use shopctl_core::session::{CredentialStore, Navigation, SessionContext};
use shopctl_types::User;

pub async fn login(context: &mut SessionContext, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    let user = context.login(email, &password).await?;
    println!("Logged in as {} ({})", user.email, user.name);
    if context.take_navigation() == Some(Navigation::Dashboard) {
        println!("Admin session ready.");
    }
    Ok(())
}

pub async fn logout(context: &mut SessionContext) -> Result<()> {
    context.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn register(
    context: &mut SessionContext,
    name: &str,
    email: &str,
    password: Option<String>,
    phone: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    let user = context.register(name, email, &password, phone).await?;
    println!("Registered and logged in as {}", user.email);
    Ok(())
}

pub async fn whoami(context: &mut SessionContext) -> Result<()> {
    context.bootstrap().await;

    match context.user() {
        Some(user) => {
            print_user(user);
            Ok(())
        }
        None => anyhow::bail!("Not logged in. Run `shopctl login` first."),
    }
}

/// Local-only status report; does not contact the backend.
pub fn status(context: &SessionContext) -> Result<()> {
    let manager = context.manager();
    let store = manager.store();

    println!("authenticated: {}", manager.is_authenticated());
    println!("admin:         {}", manager.is_admin());
    match store.access_token() {
        Some(token) => println!("access token:  {}", CredentialStore::mask_token(&token)),
        None => println!("access token:  (none)"),
    }
    match store.refresh_token() {
        Some(token) => println!("refresh token: {}", CredentialStore::mask_token(&token)),
        None => println!("refresh token: (none)"),
    }
    Ok(())
}

pub async fn forgot_password(context: &SessionContext, email: &str) -> Result<()> {
    let ack = context.manager().forgot_password(email).await?;
    println!("{ack}");
    Ok(())
}

pub async fn reset_password(context: &SessionContext, token: &str, password: &str) -> Result<()> {
    let ack = context.manager().reset_password(token, password).await?;
    println!("{ack}");
    Ok(())
}

fn print_user(user: &User) {
    println!("id:      {}", user.id);
    println!("email:   {}", user.email);
    println!("name:    {}", user.name);
    println!("role:    {:?}", user.role);
    if let Some(phone) = user.phone.as_deref() {
        println!("phone:   {phone}");
    }
    if let Some(address) = user.address.as_deref() {
        println!("address: {address}");
    }
}

/// Reads a password from stdin. Plain read, not a hidden prompt; piping a
/// password in is the scripted path and `--password` covers the rest.
fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("empty password");
    }
    Ok(password)
}
