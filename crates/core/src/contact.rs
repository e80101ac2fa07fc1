//! The `Contact` record and its link graph roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InvalidLinkPrecedence;

/// Store-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Role of a contact within its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
    Primary,
    Secondary,
}

impl LinkPrecedence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for LinkPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkPrecedence {
    type Err = InvalidLinkPrecedence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            other => Err(InvalidLinkPrecedence(other.to_owned())),
        }
    }
}

/// A stored contact row.
///
/// `linked_id` is set exactly when `link_precedence` is `Secondary` and
/// always names a primary. Rows with `deleted_at` set are invisible to every
/// store query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<ContactId>,
    pub link_precedence: LinkPrecedence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Contact {
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.link_precedence == LinkPrecedence::Primary
    }

    #[must_use]
    pub fn is_secondary(&self) -> bool {
        self.link_precedence == LinkPrecedence::Secondary
    }

    /// Id of the primary this contact belongs to.
    ///
    /// `None` only for a secondary with no `linked_id`, which is corrupt data.
    #[must_use]
    pub fn primary_id(&self) -> Option<ContactId> {
        match self.link_precedence {
            LinkPrecedence::Primary => Some(self.id),
            LinkPrecedence::Secondary => self.linked_id,
        }
    }

    /// Creation order key: `created_at`, ties broken by `id`.
    #[must_use]
    pub fn creation_key(&self) -> (DateTime<Utc>, ContactId) {
        (self.created_at, self.id)
    }
}

/// Fields for a contact about to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<ContactId>,
    pub link_precedence: LinkPrecedence,
}

impl NewContact {
    #[must_use]
    pub fn primary(email: Option<String>, phone_number: Option<String>) -> Self {
        Self { email, phone_number, linked_id: None, link_precedence: LinkPrecedence::Primary }
    }

    #[must_use]
    pub fn secondary(
        email: Option<String>,
        phone_number: Option<String>,
        primary_id: ContactId,
    ) -> Self {
        Self {
            email,
            phone_number,
            linked_id: Some(primary_id),
            link_precedence: LinkPrecedence::Secondary,
        }
    }
}

/// Partial update of a contact's link fields. `None` leaves the column as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub link_precedence: Option<LinkPrecedence>,
    pub linked_id: Option<ContactId>,
}

impl ContactUpdate {
    /// Demote a primary to a secondary of `anchor`.
    #[must_use]
    pub const fn demote_to(anchor: ContactId) -> Self {
        Self { link_precedence: Some(LinkPrecedence::Secondary), linked_id: Some(anchor) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_precedence_round_trips_through_str() {
        for p in [LinkPrecedence::Primary, LinkPrecedence::Secondary] {
            assert_eq!(p.as_str().parse::<LinkPrecedence>(), Ok(p));
        }
        assert_eq!(
            "Primary".parse::<LinkPrecedence>(),
            Err(InvalidLinkPrecedence("Primary".to_owned()))
        );
    }

    #[test]
    fn primary_id_follows_link() {
        let now = Utc::now();
        let mut c = Contact {
            id: ContactId(7),
            email: Some("a@x.com".to_owned()),
            phone_number: None,
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        assert_eq!(c.primary_id(), Some(ContactId(7)));

        c.link_precedence = LinkPrecedence::Secondary;
        assert_eq!(c.primary_id(), None);

        c.linked_id = Some(ContactId(3));
        assert_eq!(c.primary_id(), Some(ContactId(3)));
    }

    #[test]
    fn contact_serializes_camel_case() {
        let now = Utc::now();
        let c = Contact {
            id: ContactId(1),
            email: None,
            phone_number: Some("123".to_owned()),
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["phoneNumber"], "123");
        assert_eq!(json["linkPrecedence"], "primary");
        assert_eq!(json["id"], 1);
        assert!(json["linkedId"].is_null());
    }
}
