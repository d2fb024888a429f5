//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validation (HS256 tokens, mock)
//! - `clock` - System and manual clocks
//! - `http` - axum REST API
//! - `memory` - In-memory store for tests
//! - `postgres` - PostgreSQL persistence

pub mod auth;
pub mod clock;
pub mod http;
pub mod memory;
pub mod postgres;
