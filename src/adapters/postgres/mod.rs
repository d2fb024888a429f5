//! PostgreSQL adapters - Database implementations for the sponsorship ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresUnitOfWork` - Transactional writes behind `UnitOfWork`
//! - `PostgresSponsorshipReader` - Joined read models for listings and totals

mod rows;
mod sponsorship_reader;
mod unit_of_work;

pub use sponsorship_reader::PostgresSponsorshipReader;
pub use unit_of_work::{PostgresTransaction, PostgresUnitOfWork};
