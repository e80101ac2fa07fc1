use std::sync::Arc;

use anyhow::Result;
use contact_identity_core::{ContactAttributes, IdentifyResponse};
use contact_identity_service::IdentityService;

use crate::open_storage;

pub(crate) async fn run(email: Option<String>, phone: Option<String>) -> Result<()> {
    let attrs = ContactAttributes::new(email, phone)?;
    let service = IdentityService::new(Arc::new(open_storage().await?));
    let view = service.identify(&attrs).await?;
    println!("{}", serde_json::to_string_pretty(&IdentifyResponse::from(view))?);
    Ok(())
}
