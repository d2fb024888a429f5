//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `UnitOfWork` / `SponsorshipTransaction` - Atomic multi-row writes
//! - `SponsorshipReader` - Joined read models for listings and totals
//! - `SessionValidator` - Bearer token validation
//! - `Clock` - Current time

mod clock;
mod session_validator;
mod sponsorship_reader;
mod unit_of_work;

pub use clock::Clock;
pub use session_validator::SessionValidator;
pub use sponsorship_reader::{DogSummary, SponsorshipReader, SponsorshipRecord};
pub use unit_of_work::{in_transaction, SponsorshipTransaction, UnitOfWork};
