//! Sponsorship entity - one commitment toward one dog.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DogId, SponsorId, SponsorshipId, Timestamp, UserId, ValidationError,
};

use super::{PlanType, SponsorshipStatus};

/// Channel used to send sponsorship updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Line,
}

impl NotificationChannel {
    /// Unknown values yield `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "email" => Some(NotificationChannel::Email),
            "sms" => Some(NotificationChannel::Sms),
            "line" => Some(NotificationChannel::Line),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
            NotificationChannel::Line => "line",
        }
    }
}

/// How often sponsorship updates are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl NotificationFrequency {
    /// Unknown values yield `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "weekly" => Some(NotificationFrequency::Weekly),
            "biweekly" => Some(NotificationFrequency::Biweekly),
            "monthly" => Some(NotificationFrequency::Monthly),
            "quarterly" => Some(NotificationFrequency::Quarterly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFrequency::Weekly => "weekly",
            NotificationFrequency::Biweekly => "biweekly",
            NotificationFrequency::Monthly => "monthly",
            NotificationFrequency::Quarterly => "quarterly",
        }
    }
}

/// Update notification preferences, independent of the plan type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub channel: Option<NotificationChannel>,
    pub frequency: Option<NotificationFrequency>,
}

impl NotificationPreferences {
    /// Builds preferences from loose request values.
    pub fn from_request(enabled: Option<bool>, channel: Option<&str>, frequency: Option<&str>) -> Self {
        Self {
            enabled: enabled.unwrap_or(false),
            channel: channel.and_then(NotificationChannel::parse),
            frequency: frequency.and_then(NotificationFrequency::parse),
        }
    }
}

/// Amount in minor currency units, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(minor_units: i64) -> Result<Self, ValidationError> {
        if minor_units <= 0 {
            return Err(ValidationError::too_small("amount", 1, minor_units));
        }
        Ok(Self(minor_units))
    }

    pub(crate) fn from_row(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Fields for inserting a sponsorship row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSponsorship {
    pub sponsor_id: SponsorId,
    pub dog_id: DogId,
    pub plan_type: PlanType,
    pub amount: Amount,
    pub status: SponsorshipStatus,
    pub note: Option<String>,
    pub notifications: NotificationPreferences,
}

/// A persisted sponsorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsorship {
    pub id: SponsorshipId,
    pub sponsor_id: SponsorId,
    pub dog_id: DogId,
    /// Immutable after creation.
    pub plan_type: PlanType,
    /// Immutable after creation.
    pub amount: Amount,
    pub status: SponsorshipStatus,
    pub note: Option<String>,
    pub notifications: NotificationPreferences,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Set when a staff member soft-deletes the sponsorship.
    pub deleted_at: Option<Timestamp>,
    pub deleted_by_staff_id: Option<UserId>,
}

impl Sponsorship {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Mirrors a subscription status change.
    pub fn mirror(&mut self, status: SponsorshipStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
    }

    /// Marks the sponsorship as deleted by a staff member.
    pub fn soft_delete(&mut self, staff_id: UserId, now: Timestamp) {
        self.deleted_at = Some(now);
        self.deleted_by_staff_id = Some(staff_id);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_channel_and_frequency_become_none() {
        let prefs = NotificationPreferences::from_request(Some(true), Some("pigeon"), Some("daily"));
        assert!(prefs.enabled);
        assert_eq!(prefs.channel, None);
        assert_eq!(prefs.frequency, None);
    }

    #[test]
    fn known_channel_and_frequency_are_case_insensitive() {
        let prefs = NotificationPreferences::from_request(None, Some(" SMS "), Some("BiWeekly"));
        assert!(!prefs.enabled);
        assert_eq!(prefs.channel, Some(NotificationChannel::Sms));
        assert_eq!(prefs.frequency, Some(NotificationFrequency::Biweekly));
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(Amount::new(0).is_err());
        assert!(Amount::new(-5).is_err());
        assert_eq!(Amount::new(500).unwrap().as_i64(), 500);
    }
}
