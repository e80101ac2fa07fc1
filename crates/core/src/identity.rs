//! The unified view of one identity returned by `identify`.

use serde::{Deserialize, Serialize};

use crate::{Contact, ContactId};

/// One identity: its primary plus every attribute and secondary linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    pub primary_contact_id: ContactId,
    /// Primary's email first, then secondaries' in creation order, deduplicated.
    pub emails: Vec<String>,
    /// Same ordering rule as `emails`.
    pub phone_numbers: Vec<String>,
    /// Secondary ids in creation order.
    pub secondary_contact_ids: Vec<ContactId>,
}

impl IdentityView {
    /// Build the view for `primary` from its identity members.
    ///
    /// `members` may or may not contain the primary itself; every other
    /// member is treated as a secondary. Members are ordered by creation
    /// before their values are collected.
    #[must_use]
    pub fn compose(primary: &Contact, members: &[Contact]) -> Self {
        let mut secondaries: Vec<&Contact> = members.iter().filter(|c| c.id != primary.id).collect();
        secondaries.sort_by_key(|c| c.creation_key());

        let mut emails = Vec::new();
        let mut phone_numbers = Vec::new();
        for contact in std::iter::once(primary).chain(secondaries.iter().copied()) {
            push_unique(&mut emails, contact.email.as_deref());
            push_unique(&mut phone_numbers, contact.phone_number.as_deref());
        }

        Self {
            primary_contact_id: primary.id,
            emails,
            phone_numbers,
            secondary_contact_ids: secondaries.iter().map(|c| c.id).collect(),
        }
    }

    /// View of a primary with no secondaries.
    #[must_use]
    pub fn singleton(primary: &Contact) -> Self {
        Self::compose(primary, &[])
    }
}

fn push_unique(values: &mut Vec<String>, value: Option<&str>) {
    if let Some(v) = value {
        if !values.iter().any(|existing| existing == v) {
            values.push(v.to_owned());
        }
    }
}

/// Response body of `POST /identify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub contact: IdentityView,
}

impl From<IdentityView> for IdentifyResponse {
    fn from(contact: IdentityView) -> Self {
        Self { contact }
    }
}
