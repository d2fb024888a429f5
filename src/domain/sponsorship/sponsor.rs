//! Sponsor identity - who is paying for a sponsorship.
//!
//! A sponsor is either a registered account (`user`) or an anonymous donor
//! (`guest`). Guests are identified by their normalized contact tuple so that
//! repeat donations from the same person land on one sponsor row.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{GenderId, SponsorId, Timestamp, UserId, ValidationError};

/// Kind of sponsoring identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorKind {
    User,
    Guest,
}

impl SponsorKind {
    /// Parses request input, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_lowercase().as_str() {
            "user" => Ok(SponsorKind::User),
            "guest" => Ok(SponsorKind::Guest),
            "" => Err(ValidationError::empty_field("sponsor.kind")),
            _ => Err(ValidationError::invalid_format(
                "sponsor.kind",
                "must be user or guest",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorKind::User => "user",
            SponsorKind::Guest => "guest",
        }
    }
}

impl fmt::Display for SponsorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional contact fields stored on a sponsor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender_id: Option<GenderId>,
}

/// The exact tuple guest sponsors are deduplicated on.
///
/// Names are trimmed; email and phone are trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuestIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Sponsor fields as received from a request, before validation.
#[derive(Debug, Clone, Default)]
pub struct SponsorInput {
    pub kind: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender_id: Option<GenderId>,
}

/// Validated sponsor lookup key plus the fields to store if it is new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SponsorRequest {
    User {
        account: UserId,
        contact: ContactDetails,
    },
    Guest {
        identity: GuestIdentity,
        title: Option<String>,
        gender_id: Option<GenderId>,
    },
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lowered(value: &Option<String>) -> Option<String> {
    trimmed(value).map(|v| v.to_lowercase())
}

impl SponsorInput {
    /// Validates the input shape without touching storage.
    ///
    /// For `user` sponsors the session account wins over the `user_id` field.
    /// For `guest` sponsors every missing contact field is reported at once.
    pub fn validate(&self, session_account: Option<&UserId>) -> Result<SponsorRequest, ValidationError> {
        match SponsorKind::parse(&self.kind)? {
            SponsorKind::User => {
                let account = match session_account {
                    Some(account) => account.clone(),
                    None => trimmed(&self.user_id)
                        .map(UserId::new)
                        .transpose()?
                        .ok_or_else(|| ValidationError::empty_field("sponsor.user_id"))?,
                };
                Ok(SponsorRequest::User {
                    account,
                    contact: ContactDetails {
                        title: trimmed(&self.title),
                        first_name: trimmed(&self.first_name),
                        last_name: trimmed(&self.last_name),
                        email: lowered(&self.email),
                        phone: lowered(&self.phone),
                        gender_id: self.gender_id,
                    },
                })
            }
            SponsorKind::Guest => {
                let first_name = trimmed(&self.first_name);
                let last_name = trimmed(&self.last_name);
                let email = lowered(&self.email);
                let phone = lowered(&self.phone);

                let missing: Vec<&str> = [
                    ("first_name", first_name.is_none()),
                    ("last_name", last_name.is_none()),
                    ("email", email.is_none()),
                    ("phone", phone.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();

                match (first_name, last_name, email, phone) {
                    (Some(first_name), Some(last_name), Some(email), Some(phone)) => {
                        Ok(SponsorRequest::Guest {
                            identity: GuestIdentity {
                                first_name,
                                last_name,
                                email,
                                phone,
                            },
                            title: trimmed(&self.title),
                            gender_id: self.gender_id,
                        })
                    }
                    _ => Err(ValidationError::invalid_format(
                        "sponsor",
                        format!("guest sponsor requires {}", missing.join(", ")),
                    )),
                }
            }
        }
    }
}

/// Fields for inserting a sponsor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSponsor {
    pub kind: SponsorKind,
    pub user_id: Option<UserId>,
    pub contact: ContactDetails,
}

impl From<SponsorRequest> for NewSponsor {
    fn from(request: SponsorRequest) -> Self {
        match request {
            SponsorRequest::User { account, contact } => NewSponsor {
                kind: SponsorKind::User,
                user_id: Some(account),
                contact,
            },
            SponsorRequest::Guest {
                identity,
                title,
                gender_id,
            } => NewSponsor {
                kind: SponsorKind::Guest,
                user_id: None,
                contact: ContactDetails {
                    title,
                    first_name: Some(identity.first_name),
                    last_name: Some(identity.last_name),
                    email: Some(identity.email),
                    phone: Some(identity.phone),
                    gender_id,
                },
            },
        }
    }
}

/// A persisted sponsoring identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsor {
    pub id: SponsorId,
    pub kind: SponsorKind,
    /// Registered account, set only for `user` sponsors.
    pub user_id: Option<UserId>,
    pub contact: ContactDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Sponsor {
    /// Whether this sponsor belongs to the given account.
    pub fn is_owned_by(&self, account: &UserId) -> bool {
        self.kind == SponsorKind::User && self.user_id.as_ref() == Some(account)
    }

    /// Whether this guest sponsor matches the identity tuple exactly.
    pub fn matches_guest(&self, identity: &GuestIdentity) -> bool {
        self.kind == SponsorKind::Guest
            && self.contact.first_name.as_deref() == Some(identity.first_name.as_str())
            && self.contact.last_name.as_deref() == Some(identity.last_name.as_str())
            && self.contact.email.as_deref() == Some(identity.email.as_str())
            && self.contact.phone.as_deref() == Some(identity.phone.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest_input() -> SponsorInput {
        SponsorInput {
            kind: " Guest ".to_string(),
            first_name: Some("  Ada ".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some(" Ada@Example.COM ".to_string()),
            phone: Some("0812345678".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn guest_input_is_normalized() {
        let request = guest_input().validate(None).unwrap();
        match request {
            SponsorRequest::Guest { identity, .. } => {
                assert_eq!(identity.first_name, "Ada");
                assert_eq!(identity.email, "ada@example.com");
            }
            other => panic!("expected guest, got {:?}", other),
        }
    }

    #[test]
    fn guest_missing_fields_are_all_listed() {
        let input = SponsorInput {
            kind: "guest".to_string(),
            first_name: Some("Ada".to_string()),
            phone: Some("   ".to_string()),
            ..Default::default()
        };
        let err = input.validate(None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("last_name"));
        assert!(message.contains("email"));
        assert!(message.contains("phone"));
        assert!(!message.contains("first_name"));
    }

    #[test]
    fn user_kind_prefers_session_account() {
        let input = SponsorInput {
            kind: "USER".to_string(),
            user_id: Some("99".to_string()),
            ..Default::default()
        };
        let session = UserId::new("7").unwrap();
        match input.validate(Some(&session)).unwrap() {
            SponsorRequest::User { account, .. } => assert_eq!(account.as_str(), "7"),
            other => panic!("expected user, got {:?}", other),
        }
    }

    #[test]
    fn user_kind_falls_back_to_explicit_user_id() {
        let input = SponsorInput {
            kind: "user".to_string(),
            user_id: Some(" 12 ".to_string()),
            ..Default::default()
        };
        match input.validate(None).unwrap() {
            SponsorRequest::User { account, .. } => assert_eq!(account.as_str(), "12"),
            other => panic!("expected user, got {:?}", other),
        }
    }

    #[test]
    fn user_kind_without_any_account_is_rejected() {
        let input = SponsorInput {
            kind: "user".to_string(),
            ..Default::default()
        };
        assert!(input.validate(None).is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let input = SponsorInput {
            kind: "company".to_string(),
            ..Default::default()
        };
        assert!(input.validate(None).is_err());
    }

    #[test]
    fn new_guest_sponsor_copies_identity() {
        let sponsor: NewSponsor = guest_input().validate(None).unwrap().into();
        assert_eq!(sponsor.kind, SponsorKind::Guest);
        assert!(sponsor.user_id.is_none());
        assert_eq!(sponsor.contact.phone.as_deref(), Some("0812345678"));
    }
}
