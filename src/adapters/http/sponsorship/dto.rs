//! HTTP DTOs (Data Transfer Objects) for sponsorship endpoints.
//!
//! These types define the JSON request/response structure for the sponsorship
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::sponsorship::{
    AdminSponsorshipItem, CancelSubscriptionResult, CreateOneTimeSponsorshipResult,
    CreateSubscriptionSponsorshipResult, DeleteSponsorshipResult, GetMySponsorshipsResult,
    ListAllSponsorshipsResult, MySponsorshipItem, ReactivateSubscriptionResult,
    SponsorshipDraftInput, SubscriptionView,
};
use crate::domain::foundation::{GenderId, Timestamp, ValidationError};
use crate::domain::sponsorship::{
    BillingInterval, NotificationChannel, NotificationFrequency, NotificationPreferences,
    Payment, PaymentStatus, PlanType, Sponsor, SponsorInput, SponsorKind, SponsorshipStatus,
    SponsorshipTotals, Subscription, SubscriptionStatus,
};
use crate::ports::DogSummary;

fn rfc3339(at: &Timestamp) -> String {
    at.as_datetime().to_rfc3339()
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// An account id sent either as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    fn into_string(self) -> String {
        match self {
            LooseId::Number(n) => n.to_string(),
            LooseId::Text(s) => s,
        }
    }
}

/// Who is sponsoring.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SponsorDataRequest {
    /// `user` or `guest`.
    pub kind: String,
    /// Ignored when the request carries a user session.
    pub user_id: Option<LooseId>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender_id: Option<i64>,
}

impl SponsorDataRequest {
    fn into_input(self) -> Result<SponsorInput, ValidationError> {
        Ok(SponsorInput {
            kind: self.kind,
            user_id: self.user_id.map(LooseId::into_string),
            title: self.title,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            gender_id: self.gender_id.map(GenderId::new).transpose()?,
        })
    }
}

/// Update notification preferences for one sponsorship.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationPreferencesRequest {
    pub enabled: Option<bool>,
    pub channel: Option<String>,
    pub frequency: Option<String>,
}

/// Request to create a one-time or subscription sponsorship.
///
/// Missing numeric fields default to zero so that the application layer
/// reports them as field-level validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSponsorshipRequest {
    pub sponsor_data: SponsorDataRequest,
    /// `one-time` or `subscription`.
    pub plan_type: String,
    pub dog_id: i64,
    pub amount: i64,
    /// Optional status override, normalized by the server.
    pub status: Option<String>,
    pub payment_method_id: i64,
    /// Billing interval for subscriptions.
    pub frequency: Option<String>,
    pub note: Option<String>,
    /// Notification preferences.
    pub update: Option<NotificationPreferencesRequest>,
}

impl CreateSponsorshipRequest {
    /// Splits the request into the plan type, the billing interval and the
    /// shared draft.
    pub fn into_parts(self) -> Result<(String, Option<String>, SponsorshipDraftInput), ValidationError> {
        let notifications = self
            .update
            .map(|u| {
                NotificationPreferences::from_request(
                    u.enabled,
                    u.channel.as_deref(),
                    u.frequency.as_deref(),
                )
            })
            .unwrap_or_default();

        let draft = SponsorshipDraftInput {
            dog_id: self.dog_id,
            payment_method_id: self.payment_method_id,
            amount: self.amount,
            status: self.status,
            sponsor: self.sponsor_data.into_input()?,
            note: self.note,
            notifications,
        };
        Ok((self.plan_type, self.frequency, draft))
    }
}

/// Body of the cancel and reactivate endpoints. An empty body is allowed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionChangeRequest {
    pub cancel_at_period_end: Option<bool>,
    pub status: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateOneTimeSponsorshipResponse {
    pub sponsorship_id: i64,
    pub payment_id: i64,
}

impl From<CreateOneTimeSponsorshipResult> for CreateOneTimeSponsorshipResponse {
    fn from(result: CreateOneTimeSponsorshipResult) -> Self {
        Self {
            sponsorship_id: result.sponsorship_id.as_i64(),
            payment_id: result.payment_id.as_i64(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubscriptionSponsorshipResponse {
    pub sponsorship_id: i64,
    pub subscription_id: i64,
    pub payment_id: i64,
}

impl From<CreateSubscriptionSponsorshipResult> for CreateSubscriptionSponsorshipResponse {
    fn from(result: CreateSubscriptionSponsorshipResult) -> Self {
        Self {
            sponsorship_id: result.sponsorship_id.as_i64(),
            subscription_id: result.subscription_id.as_i64(),
            payment_id: result.payment_id.as_i64(),
        }
    }
}

/// Subscription state after a cancel or reactivate.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStateResponse {
    pub id: i64,
    pub status: SubscriptionStatus,
    pub current_period_end: String,
    pub cancel_at_period_end: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_at: Option<String>,
}

impl SubscriptionStateResponse {
    fn new(subscription: &Subscription, current_period_end: &Timestamp) -> Self {
        Self {
            id: subscription.id.as_i64(),
            status: subscription.status,
            current_period_end: rfc3339(current_period_end),
            cancel_at_period_end: subscription.cancel_at_period_end,
            next_payment_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionChangeResponse {
    pub success: bool,
    pub subscription: SubscriptionStateResponse,
}

impl From<CancelSubscriptionResult> for SubscriptionChangeResponse {
    fn from(result: CancelSubscriptionResult) -> Self {
        Self {
            success: true,
            subscription: SubscriptionStateResponse::new(
                &result.subscription,
                &result.current_period_end,
            ),
        }
    }
}

impl From<ReactivateSubscriptionResult> for SubscriptionChangeResponse {
    fn from(result: ReactivateSubscriptionResult) -> Self {
        let mut subscription =
            SubscriptionStateResponse::new(&result.subscription, &result.current_period_end);
        subscription.next_payment_at = Some(rfc3339(&result.next_payment_at));
        Self {
            success: true,
            subscription,
        }
    }
}

/// A ledger row.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub amount: i64,
    pub status: PaymentStatus,
    pub payment_method_id: i64,
    pub transaction_ref: String,
    pub created_at: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.as_i64(),
            amount: payment.amount.as_i64(),
            status: payment.status,
            payment_method_id: payment.payment_method_id.as_i64(),
            transaction_ref: payment.transaction_ref.as_str().to_string(),
            created_at: rfc3339(&payment.created_at),
        }
    }
}

/// A subscription with its derived billing dates.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionSummaryResponse {
    pub id: i64,
    pub interval: BillingInterval,
    pub status: SubscriptionStatus,
    pub cancel_at_period_end: bool,
    pub current_period_end: String,
    /// Omitted once the subscription is cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_at: Option<String>,
}

impl From<&SubscriptionView> for SubscriptionSummaryResponse {
    fn from(view: &SubscriptionView) -> Self {
        Self {
            id: view.subscription.id.as_i64(),
            interval: view.subscription.interval,
            status: view.subscription.status,
            cancel_at_period_end: view.subscription.cancel_at_period_end,
            current_period_end: rfc3339(&view.current_period_end),
            next_payment_at: view.next_payment_at.as_ref().map(rfc3339),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    pub total_one_time: i64,
    pub total_subscription: i64,
    pub total_all: i64,
}

impl From<SponsorshipTotals> for TotalsResponse {
    fn from(totals: SponsorshipTotals) -> Self {
        Self {
            total_one_time: totals.total_one_time,
            total_subscription: totals.total_subscription,
            total_all: totals.total_all,
        }
    }
}

/// One row of the sponsor's own listing.
#[derive(Debug, Clone, Serialize)]
pub struct MySponsorshipItemResponse {
    pub id: i64,
    pub dog_id: i64,
    pub dog_name: Option<String>,
    pub photo_url: Option<String>,
    pub plan_type: PlanType,
    pub amount: i64,
    pub status: SponsorshipStatus,
    pub enabled: bool,
    pub channel: Option<NotificationChannel>,
    pub frequency: Option<NotificationFrequency>,
    pub created_at: String,
    pub payment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment: Option<PaymentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSummaryResponse>,
}

impl From<MySponsorshipItem> for MySponsorshipItemResponse {
    fn from(item: MySponsorshipItem) -> Self {
        let sponsorship = item.sponsorship;
        Self {
            id: sponsorship.id.as_i64(),
            dog_id: sponsorship.dog_id.as_i64(),
            dog_name: item.dog.as_ref().map(|d| d.name.clone()),
            photo_url: item.dog.and_then(|d| d.photo_url),
            plan_type: sponsorship.plan_type,
            amount: sponsorship.amount.as_i64(),
            status: sponsorship.status,
            enabled: sponsorship.notifications.enabled,
            channel: sponsorship.notifications.channel,
            frequency: sponsorship.notifications.frequency,
            created_at: rfc3339(&sponsorship.created_at),
            payment_count: item.payment_count,
            last_payment: item.last_payment.as_ref().map(PaymentResponse::from),
            subscription: item.subscription.as_ref().map(SubscriptionSummaryResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MySponsorshipsResponse {
    pub items: Vec<MySponsorshipItemResponse>,
    pub summary: TotalsResponse,
}

impl From<GetMySponsorshipsResult> for MySponsorshipsResponse {
    fn from(result: GetMySponsorshipsResult) -> Self {
        Self {
            items: result.items.into_iter().map(Into::into).collect(),
            summary: result.summary.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSponsorResponse {
    pub id: i64,
    pub kind: SponsorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<Sponsor> for AdminSponsorResponse {
    fn from(sponsor: Sponsor) -> Self {
        Self {
            id: sponsor.id.as_i64(),
            kind: sponsor.kind,
            first_name: sponsor.contact.first_name,
            last_name: sponsor.contact.last_name,
            email: sponsor.contact.email,
            phone: sponsor.contact.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDogResponse {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<DogSummary> for AdminDogResponse {
    fn from(dog: DogSummary) -> Self {
        Self {
            id: dog.id.as_i64(),
            name: dog.name,
            photo_url: dog.photo_url,
        }
    }
}

/// One row of the staff listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSponsorshipItemResponse {
    pub id: i64,
    pub created_at: String,
    pub plan_type: PlanType,
    pub amount: i64,
    pub status: SponsorshipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub sponsor: AdminSponsorResponse,
    /// Null when the dog record is gone.
    pub dog: Option<AdminDogResponse>,
    pub enabled: bool,
    pub channel: Option<NotificationChannel>,
    pub frequency: Option<NotificationFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSummaryResponse>,
    pub sponsorship_payments: Vec<PaymentResponse>,
}

impl From<AdminSponsorshipItem> for AdminSponsorshipItemResponse {
    fn from(item: AdminSponsorshipItem) -> Self {
        let sponsorship = item.sponsorship;
        Self {
            id: sponsorship.id.as_i64(),
            created_at: rfc3339(&sponsorship.created_at),
            plan_type: sponsorship.plan_type,
            amount: sponsorship.amount.as_i64(),
            status: sponsorship.status,
            note: sponsorship.note,
            sponsor: item.sponsor.into(),
            dog: item.dog.map(Into::into),
            enabled: sponsorship.notifications.enabled,
            channel: sponsorship.notifications.channel,
            frequency: sponsorship.notifications.frequency,
            subscription: item.subscription.as_ref().map(SubscriptionSummaryResponse::from),
            sponsorship_payments: item.payments.iter().map(PaymentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSponsorshipListResponse {
    pub items: Vec<AdminSponsorshipItemResponse>,
}

impl From<ListAllSponsorshipsResult> for AdminSponsorshipListResponse {
    fn from(result: ListAllSponsorshipsResult) -> Self {
        Self {
            items: result.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSponsorshipResponse {
    pub success: bool,
    pub id: i64,
    pub deleted_by_staff_id: String,
}

impl From<DeleteSponsorshipResult> for DeleteSponsorshipResponse {
    fn from(result: DeleteSponsorshipResult) -> Self {
        Self {
            success: true,
            id: result.sponsorship_id.as_i64(),
            deleted_by_staff_id: result.deleted_by_staff_id.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_accepts_numeric_user_id_and_preferences() {
        let request: CreateSponsorshipRequest = serde_json::from_value(json!({
            "sponsor_data": { "kind": "user", "user_id": 12, "gender_id": 2 },
            "plan_type": "subscription",
            "dog_id": 5,
            "amount": 300,
            "payment_method_id": 1,
            "frequency": "monthly",
            "update": { "enabled": true, "channel": "line", "frequency": "weekly" }
        }))
        .unwrap();

        let (plan_type, interval, draft) = request.into_parts().unwrap();

        assert_eq!(plan_type, "subscription");
        assert_eq!(interval.as_deref(), Some("monthly"));
        assert_eq!(draft.sponsor.user_id.as_deref(), Some("12"));
        assert_eq!(draft.sponsor.gender_id.map(|g| g.as_i64()), Some(2));
        assert!(draft.notifications.enabled);
        assert_eq!(draft.notifications.channel, Some(NotificationChannel::Line));
        assert_eq!(draft.notifications.frequency, Some(NotificationFrequency::Weekly));
    }

    #[test]
    fn missing_fields_default_for_later_validation() {
        let request: CreateSponsorshipRequest =
            serde_json::from_value(json!({ "sponsor_data": { "kind": "guest" } })).unwrap();

        let (_, interval, draft) = request.into_parts().unwrap();

        assert!(interval.is_none());
        assert_eq!(draft.amount, 0);
        assert_eq!(draft.dog_id, 0);
        assert!(!draft.notifications.enabled);
    }

    #[test]
    fn invalid_gender_id_is_a_validation_error() {
        let request: CreateSponsorshipRequest = serde_json::from_value(json!({
            "sponsor_data": { "kind": "guest", "gender_id": 0 }
        }))
        .unwrap();

        let err = request.into_parts().unwrap_err();

        assert_eq!(err.field(), "gender_id");
    }

    #[test]
    fn empty_change_request_has_no_overrides() {
        let request: SubscriptionChangeRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.cancel_at_period_end.is_none());
        assert!(request.status.is_none());
    }
}
