//! Identify request parsing and validation.
//!
//! `IdentifyRequest` is the raw wire shape. `ContactAttributes` can only be
//! built through validation, so everything past the API boundary can rely on
//! at least one well-formed attribute being present.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Contact, FieldError, MAX_EMAIL_LEN, MAX_PHONE_LEN, ValidationErrors};

/// Local part, `@`, one or more dot-terminated labels, alphabetic TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

const MISSING_ATTRIBUTES: &str = "Either email or phoneNumber must be provided";

/// Body of `POST /identify`. Missing and `null` fields are both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl IdentifyRequest {
    #[must_use]
    pub fn new(email: Option<String>, phone_number: Option<String>) -> Self {
        Self { email, phone_number }
    }

    /// Validate into attributes the resolver accepts.
    pub fn validate(self) -> Result<ContactAttributes, ValidationErrors> {
        ContactAttributes::new(self.email, self.phone_number)
    }
}

/// A validated `(email, phoneNumber)` observation with at least one value present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAttributes {
    email: Option<String>,
    phone_number: Option<String>,
}

impl ContactAttributes {
    pub fn new(
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        if let Some(email) = email.as_deref() {
            if utf16_len(email) > MAX_EMAIL_LEN {
                errors.push(FieldError::new(
                    "email",
                    format!("must be at most {MAX_EMAIL_LEN} characters"),
                ));
            } else if !is_valid_email(email) {
                errors.push(FieldError::new("email", "Invalid email"));
            }
        }

        if let Some(phone) = phone_number.as_deref() {
            let len = utf16_len(phone);
            if len == 0 {
                errors.push(FieldError::new("phoneNumber", "must not be empty"));
            } else if len > MAX_PHONE_LEN {
                errors.push(FieldError::new(
                    "phoneNumber",
                    format!("must be at most {MAX_PHONE_LEN} characters"),
                ));
            }
        }

        if email.is_none() && phone_number.is_none() {
            errors.push(FieldError::new("email", MISSING_ATTRIBUTES));
            errors.push(FieldError::new("phoneNumber", MISSING_ATTRIBUTES));
        }

        if errors.is_empty() {
            Ok(Self { email, phone_number })
        } else {
            Err(ValidationErrors(errors))
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Whether `contact` carries exactly these attributes.
    ///
    /// An absent attribute does not constrain the match, so `(email only)`
    /// matches any contact with that email whatever its phone number.
    #[must_use]
    pub fn matches_exactly(&self, contact: &Contact) -> bool {
        let email_ok = self.email.is_none() || self.email == contact.email;
        let phone_ok = self.phone_number.is_none() || self.phone_number == contact.phone_number;
        email_ok && phone_ok
    }

    /// Whether a supplied value is missing from every member's values.
    ///
    /// Comparison is exact and case-sensitive.
    #[must_use]
    pub fn introduces_new_information(&self, members: &[Contact]) -> bool {
        let new_email = self
            .email
            .as_ref()
            .is_some_and(|e| !members.iter().any(|c| c.email.as_ref() == Some(e)));
        let new_phone = self
            .phone_number
            .as_ref()
            .is_some_and(|p| !members.iter().any(|c| c.phone_number.as_ref() == Some(p)));
        new_email || new_phone
    }
}

/// Lengths are measured the way JSON clients measure strings.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{ContactId, LinkPrecedence};

    fn contact(id: i64, email: Option<&str>, phone: Option<&str>) -> Contact {
        let now = Utc::now();
        Contact {
            id: ContactId(id),
            email: email.map(str::to_owned),
            phone_number: phone.map(str::to_owned),
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn attrs(email: Option<&str>, phone: Option<&str>) -> ContactAttributes {
        ContactAttributes::new(email.map(str::to_owned), phone.map(str::to_owned)).unwrap()
    }

    #[test]
    fn accepts_email_only_phone_only_and_both() {
        assert!(attrs(Some("lorraine@hillvalley.edu"), None).email().is_some());
        assert!(attrs(None, Some("123456")).phone_number().is_some());
        let both = attrs(Some("mcfly@hillvalley.edu"), Some("123456"));
        assert_eq!(both.email(), Some("mcfly@hillvalley.edu"));
        assert_eq!(both.phone_number(), Some("123456"));
    }

    #[test]
    fn rejects_missing_attributes_on_both_fields() {
        let err = IdentifyRequest::default().validate().unwrap_err();
        assert!(err.has_field("email"));
        assert!(err.has_field("phoneNumber"));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "plain", "a@b", "@x.com", ".a@x.com", "a..b@x.com", "a.@x.com", "a@x.c"] {
            let err = ContactAttributes::new(Some(bad.to_owned()), None).unwrap_err();
            assert!(err.has_field("email"), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn accepts_common_email_shapes() {
        for good in ["a@x.com", "first.last+tag@mail.example.org", "o'neil@x.io", "A_B-c@x-y.co"] {
            assert!(
                ContactAttributes::new(Some(good.to_owned()), None).is_ok(),
                "expected {good:?} to be accepted"
            );
        }
    }

    #[test]
    fn enforces_length_bounds() {
        let long_email = format!("{}@x.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(ContactAttributes::new(Some(long_email), None).unwrap_err().has_field("email"));

        let long_phone = "1".repeat(MAX_PHONE_LEN + 1);
        let err = ContactAttributes::new(None, Some(long_phone)).unwrap_err();
        assert!(err.has_field("phoneNumber"));

        assert!(ContactAttributes::new(None, Some("1".repeat(MAX_PHONE_LEN))).is_ok());
        let err = ContactAttributes::new(None, Some(String::new())).unwrap_err();
        assert!(err.has_field("phoneNumber"));
    }

    #[test]
    fn length_counts_utf16_code_units() {
        // 600 astral characters are 1200 code units
        let wide_email = format!("{}@x.com", "\u{1F600}".repeat(600));
        let err = ContactAttributes::new(Some(wide_email), None).unwrap_err();
        assert!(err.errors()[0].message.contains("at most"));

        let wide_phone = "\u{1F600}".repeat(MAX_PHONE_LEN / 2 + 1);
        let err = ContactAttributes::new(None, Some(wide_phone)).unwrap_err();
        assert!(err.has_field("phoneNumber"));
        assert!(ContactAttributes::new(None, Some("\u{1F600}".repeat(MAX_PHONE_LEN / 2))).is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let err = ContactAttributes::new(Some("nope".to_owned()), Some(String::new())).unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert!(err.to_string().contains("email: Invalid email"));
    }

    #[test]
    fn deserializes_null_and_missing_as_absent() {
        let req: IdentifyRequest =
            serde_json::from_str(r#"{"email": null, "phoneNumber": "123"}"#).unwrap();
        assert_eq!(req, IdentifyRequest::new(None, Some("123".to_owned())));

        let req: IdentifyRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, IdentifyRequest::default());
    }

    #[test]
    fn absent_fields_do_not_constrain_exact_match() {
        let stored = contact(1, Some("a@x.com"), Some("123"));
        assert!(attrs(Some("a@x.com"), None).matches_exactly(&stored));
        assert!(attrs(None, Some("123")).matches_exactly(&stored));
        assert!(attrs(Some("a@x.com"), Some("123")).matches_exactly(&stored));
        assert!(!attrs(Some("a@x.com"), Some("999")).matches_exactly(&stored));

        let email_only = contact(2, Some("a@x.com"), None);
        assert!(!attrs(Some("a@x.com"), Some("123")).matches_exactly(&email_only));
    }

    #[test]
    fn new_information_is_case_sensitive_union() {
        let members =
            vec![contact(1, Some("a@x.com"), None), contact(2, None, Some("123"))];
        assert!(!attrs(Some("a@x.com"), Some("123")).introduces_new_information(&members));
        assert!(!attrs(None, Some("123")).introduces_new_information(&members));
        assert!(attrs(Some("A@x.com"), None).introduces_new_information(&members));
        assert!(attrs(Some("a@x.com"), Some("456")).introduces_new_information(&members));
        assert!(attrs(Some("b@x.com"), None).introduces_new_information(&[]));
    }
}
