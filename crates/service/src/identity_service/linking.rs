//! Matching, linking and merging of contacts inside one transaction.

use std::collections::BTreeSet;

use contact_identity_core::{
    Contact, ContactAttributes, ContactId, ContactUpdate, IdentityView, NewContact,
};
use contact_identity_storage::traits::ContactTransaction;

use crate::ServiceError;

pub(super) async fn resolve<T: ContactTransaction>(
    tx: &mut T,
    attrs: &ContactAttributes,
) -> Result<IdentityView, ServiceError> {
    let matched = tx.find_by_email_or_phone(attrs.email(), attrs.phone_number()).await?;
    tracing::debug!(matched = matched.len(), "matched existing contacts");

    if matched.is_empty() {
        let new = NewContact::primary(owned(attrs.email()), owned(attrs.phone_number()));
        let created = tx.create(new).await?;
        tracing::info!(contact_id = %created.id, "created primary contact");
        return Ok(IdentityView::singleton(&created));
    }

    if let Some(exact) = matched.iter().find(|c| attrs.matches_exactly(c)) {
        let primary_id = owning_primary(exact)?;
        tracing::debug!(contact_id = %exact.id, %primary_id, "exact match, nothing to link");
        return compose(tx, primary_id).await;
    }

    let anchor = resolve_anchor(tx, &matched).await?;
    let members = tx.find_members_of_identity(anchor).await?;
    if attrs.introduces_new_information(&members) {
        let new = NewContact::secondary(owned(attrs.email()), owned(attrs.phone_number()), anchor);
        let created = tx.create(new).await?;
        tracing::info!(contact_id = %created.id, anchor_id = %anchor, "linked secondary contact");
    }

    compose(tx, anchor).await
}

/// Pick the primary that survives this request. Every identity touched by the
/// match, directly through its primary or through one of its secondaries,
/// takes part; more than one means a merge.
async fn resolve_anchor<T: ContactTransaction>(
    tx: &mut T,
    matched: &[Contact],
) -> Result<ContactId, ServiceError> {
    let mut primaries: Vec<Contact> = matched.iter().filter(|c| c.is_primary()).cloned().collect();

    let mut referenced = BTreeSet::new();
    for contact in matched.iter().filter(|c| !c.is_primary()) {
        referenced.insert(owning_primary(contact)?);
    }
    for id in referenced {
        if primaries.iter().any(|p| p.id == id) {
            continue;
        }
        primaries.push(live_primary(tx, id).await?);
    }

    match primaries.as_slice() {
        [] => Err(ServiceError::integrity("no contacts to derive an anchor from")),
        [only] => Ok(only.id),
        _ => merge(tx, &primaries).await,
    }
}

/// Load the primary a secondary links to; a missing target or a link onto
/// another secondary is corruption.
async fn live_primary<T: ContactTransaction>(
    tx: &mut T,
    id: ContactId,
) -> Result<Contact, ServiceError> {
    match tx.find_by_id(id).await? {
        Some(primary) if primary.is_primary() => Ok(primary),
        Some(_) => Err(ServiceError::integrity(format!(
            "contact {id} is referenced as a primary but is a secondary"
        ))),
        None => Err(ServiceError::integrity(format!("primary contact {id} does not exist"))),
    }
}

/// Keep the oldest primary, demote the rest and flatten their secondaries
/// onto the survivor.
async fn merge<T: ContactTransaction>(
    tx: &mut T,
    primaries: &[Contact],
) -> Result<ContactId, ServiceError> {
    let anchor = primaries
        .iter()
        .min_by_key(|c| c.creation_key())
        .map(|c| c.id)
        .ok_or_else(|| ServiceError::integrity("merge requires at least one primary"))?;

    for demoted in primaries.iter().filter(|c| c.id != anchor) {
        tx.update(demoted.id, ContactUpdate::demote_to(anchor)).await?;
        let moved = tx.reassign_secondaries(demoted.id, anchor).await?;
        tracing::info!(anchor_id = %anchor, demoted = %demoted.id, moved, "merged identity");
    }
    Ok(anchor)
}

/// Re-read the identity rooted at `primary_id` and build its view.
async fn compose<T: ContactTransaction>(
    tx: &mut T,
    primary_id: ContactId,
) -> Result<IdentityView, ServiceError> {
    let members = tx.find_members_of_identity(primary_id).await?;
    let primary = members.iter().find(|c| c.id == primary_id).ok_or_else(|| {
        ServiceError::integrity(format!("primary contact {primary_id} does not exist"))
    })?;
    if !primary.is_primary() {
        return Err(ServiceError::integrity(format!(
            "contact {primary_id} is referenced as a primary but is a secondary"
        )));
    }
    Ok(IdentityView::compose(primary, &members))
}

fn owning_primary(contact: &Contact) -> Result<ContactId, ServiceError> {
    contact.primary_id().ok_or_else(|| {
        ServiceError::integrity(format!("secondary contact {} has no linked primary", contact.id))
    })
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}
