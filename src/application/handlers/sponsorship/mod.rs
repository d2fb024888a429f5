//! Sponsorship handlers.
//!
//! ## Commands
//! - Creating one-time and subscription sponsorships
//! - Cancelling and reactivating subscriptions
//! - Soft-deleting sponsorships (staff)
//!
//! ## Queries
//! - The sponsor's own sponsorships and totals
//! - Every sponsorship (staff)

mod cancel_subscription;
mod create_one_time_sponsorship;
mod create_subscription_sponsorship;
mod delete_sponsorship;
mod factory;
mod get_my_sponsorships;
mod list_all_sponsorships;
mod owned_subscription;
mod payment_ledger;
mod reactivate_subscription;
mod sponsor_resolver;
mod views;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use create_one_time_sponsorship::{
    CreateOneTimeSponsorshipCommand, CreateOneTimeSponsorshipHandler,
    CreateOneTimeSponsorshipResult,
};
pub use create_subscription_sponsorship::{
    CreateSubscriptionSponsorshipCommand, CreateSubscriptionSponsorshipHandler,
    CreateSubscriptionSponsorshipResult,
};
pub use delete_sponsorship::{
    DeleteSponsorshipCommand, DeleteSponsorshipHandler, DeleteSponsorshipResult,
};
pub use reactivate_subscription::{
    ReactivateSubscriptionCommand, ReactivateSubscriptionHandler, ReactivateSubscriptionResult,
};

// Queries
pub use get_my_sponsorships::{
    GetMySponsorshipsHandler, GetMySponsorshipsQuery, GetMySponsorshipsResult, MySponsorshipItem,
};
pub use list_all_sponsorships::{
    AdminSponsorshipItem, ListAllSponsorshipsHandler, ListAllSponsorshipsQuery,
    ListAllSponsorshipsResult,
};

// Shared building blocks
pub use factory::SponsorshipDraftInput;
pub use payment_ledger::{record_payment, LedgerEntry, MAX_REFERENCE_ATTEMPTS};
pub use sponsor_resolver::resolve_sponsor;
pub use views::SubscriptionView;
