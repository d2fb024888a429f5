//! HTTP adapter for sponsorship endpoints.
//!
//! Exposes the sponsorship domain via REST API:
//! - `POST /api/sponsorships/one-time` - One-time sponsorship (guests allowed)
//! - `POST /api/sponsorships/subscriptions` - Recurring sponsorship (user session)
//! - `POST /api/subscriptions/:id/cancel` - Cancel a subscription
//! - `POST /api/subscriptions/:id/reactivate` - Reactivate within the paid period
//! - `GET /api/me/sponsorships` - Own sponsorships and totals
//! - `GET /api/admin/sponsorships` - Every sponsorship (staff)
//! - `DELETE /api/admin/sponsorships/:id` - Soft-delete a sponsorship (staff)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{SponsorshipApiError, SponsorshipAppState};
pub use routes::sponsorship_routes;
