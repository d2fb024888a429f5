//! Sponsorship module - commitments toward shelter dogs and their billing.
//!
//! # Module Structure
//!
//! - `sponsor` - Sponsoring identity (registered user or guest)
//! - `sponsorship` - One commitment toward one dog
//! - `subscription` - Recurring side of a sponsorship
//! - `payment` - Append-only ledger rows and transaction references
//! - `billing_period` - Period boundary arithmetic
//! - `totals` - Settled payment rollups
//! - `plan` / `status` - Closed enums with boundary normalization
//! - `errors` - Sponsorship-specific errors

mod billing_period;
mod errors;
mod payment;
mod plan;
mod sponsor;
#[allow(clippy::module_inception)]
mod sponsorship;
mod status;
pub(crate) mod subscription;
mod totals;

pub use billing_period::{add_interval, current_period_end, period_anchor, BillingPeriod};
pub use errors::SponsorshipError;
pub use payment::{NewPayment, Payment, RefPrefix, TransactionRef};
pub use plan::{BillingInterval, PlanType};
pub use sponsor::{
    ContactDetails, GuestIdentity, NewSponsor, Sponsor, SponsorInput, SponsorKind,
    SponsorRequest,
};
pub use sponsorship::{
    Amount, NewSponsorship, NotificationChannel, NotificationFrequency,
    NotificationPreferences, Sponsorship,
};
pub use status::{PaymentStatus, SponsorshipStatus, SubscriptionStatus};
pub use subscription::{NewSubscription, Subscription};
pub use totals::SponsorshipTotals;
