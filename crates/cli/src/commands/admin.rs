use std::sync::Arc;

use anyhow::Result;
use contact_identity_service::IdentityService;

use crate::open_storage;

async fn service() -> Result<IdentityService> {
    Ok(IdentityService::new(Arc::new(open_storage().await?)))
}

pub(crate) async fn run_clear() -> Result<()> {
    let deleted = service().await?.clear_all().await?;
    println!("{}", serde_json::json!({ "deleted": deleted }));
    Ok(())
}

pub(crate) async fn run_check() -> Result<()> {
    let violations = service().await?.verify_integrity().await?;
    println!("{}", serde_json::to_string_pretty(&violations)?);
    if !violations.is_empty() {
        anyhow::bail!("{} integrity violation(s) found", violations.len());
    }
    Ok(())
}
