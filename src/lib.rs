//! Shelter Sponsorships - Sponsorship and recurring billing for shelter dogs.
//!
//! Registered users and guests sponsor dogs with one-time donations or
//! recurring subscriptions. Every accepted sponsorship writes a payment to an
//! append-only ledger; subscriptions can be cancelled and reactivated within
//! their paid billing period.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
