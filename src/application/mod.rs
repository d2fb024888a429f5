//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write through a `UnitOfWork`; query handlers read
//! through a `SponsorshipReader`.

pub mod handlers;

pub use handlers::sponsorship::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
    CreateOneTimeSponsorshipCommand, CreateOneTimeSponsorshipHandler,
    CreateOneTimeSponsorshipResult, CreateSubscriptionSponsorshipCommand,
    CreateSubscriptionSponsorshipHandler, CreateSubscriptionSponsorshipResult,
    DeleteSponsorshipCommand, DeleteSponsorshipHandler, DeleteSponsorshipResult,
    GetMySponsorshipsHandler, GetMySponsorshipsQuery, GetMySponsorshipsResult,
    ListAllSponsorshipsHandler, ListAllSponsorshipsQuery, ListAllSponsorshipsResult,
    ReactivateSubscriptionCommand, ReactivateSubscriptionHandler, ReactivateSubscriptionResult,
};
