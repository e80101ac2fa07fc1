//! Audit of the primary/secondary link graph.

use std::collections::HashMap;
use std::fmt;

use contact_identity_core::{Contact, ContactId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    PrimaryWithLink,
    UnlinkedSecondary,
    DanglingLink,
    LinkChain,
    SecondaryOlderThanPrimary,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PrimaryWithLink => "primary_with_link",
            Self::UnlinkedSecondary => "unlinked_secondary",
            Self::DanglingLink => "dangling_link",
            Self::LinkChain => "link_chain",
            Self::SecondaryOlderThanPrimary => "secondary_older_than_primary",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityViolation {
    pub contact_id: ContactId,
    pub kind: ViolationKind,
    pub detail: String,
}

impl IntegrityViolation {
    fn new(contact_id: ContactId, kind: ViolationKind, detail: String) -> Self {
        Self { contact_id, kind, detail }
    }
}

/// Check every live contact against the link rules. Empty means consistent.
pub(super) fn audit(contacts: &[Contact]) -> Vec<IntegrityViolation> {
    let by_id: HashMap<ContactId, &Contact> = contacts.iter().map(|c| (c.id, c)).collect();
    let mut violations = Vec::new();

    for contact in contacts {
        if contact.is_primary() {
            if let Some(linked) = contact.linked_id {
                violations.push(IntegrityViolation::new(
                    contact.id,
                    ViolationKind::PrimaryWithLink,
                    format!("primary links to {linked}"),
                ));
            }
            continue;
        }

        let Some(linked) = contact.linked_id else {
            violations.push(IntegrityViolation::new(
                contact.id,
                ViolationKind::UnlinkedSecondary,
                "secondary has no linked primary".to_owned(),
            ));
            continue;
        };
        let Some(target) = by_id.get(&linked) else {
            violations.push(IntegrityViolation::new(
                contact.id,
                ViolationKind::DanglingLink,
                format!("linked contact {linked} does not exist"),
            ));
            continue;
        };
        if target.is_secondary() {
            violations.push(IntegrityViolation::new(
                contact.id,
                ViolationKind::LinkChain,
                format!("linked contact {linked} is itself a secondary"),
            ));
        } else if contact.creation_key() < target.creation_key() {
            violations.push(IntegrityViolation::new(
                contact.id,
                ViolationKind::SecondaryOlderThanPrimary,
                format!("created before its primary {linked}"),
            ));
        }
    }

    violations
}
