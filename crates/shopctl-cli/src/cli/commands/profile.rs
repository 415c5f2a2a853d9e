//! Profile command handlers.

use anyhow::Result;
use shopctl_core::session::SessionContext;
use shopctl_types::UserUpdate;

pub async fn update(
    context: &mut SessionContext,
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<()> {
    let update = UserUpdate {
        name,
        phone,
        address,
    };
    if update.is_empty() {
        anyhow::bail!("nothing to update; pass at least one of --name, --phone, --address");
    }

    context.bootstrap().await;
    if !context.is_authenticated() {
        anyhow::bail!("Not logged in. Run `shopctl login` first.");
    }

    let user = context.update_profile(&update).await?;
    println!("Profile updated for {}", user.email);
    Ok(())
}
