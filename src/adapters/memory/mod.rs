//! In-memory adapters for tests.

mod sponsorship_store;

pub use sponsorship_store::{InMemorySponsorshipStore, InMemoryTransaction};
