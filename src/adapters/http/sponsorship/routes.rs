//! Axum router configuration for sponsorship endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, create_one_time_sponsorship, create_subscription_sponsorship,
    delete_sponsorship, get_my_sponsorships, list_all_sponsorships, reactivate_subscription,
    SponsorshipAppState,
};

/// Create the sponsorship API router.
///
/// # Routes
///
/// ## Open Endpoints (guests allowed)
/// - `POST /sponsorships/one-time` - One-time sponsorship
///
/// ## User Endpoints (require a user session)
/// - `POST /sponsorships/subscriptions` - Start a recurring sponsorship
/// - `POST /subscriptions/:id/cancel` - Cancel a subscription
/// - `POST /subscriptions/:id/reactivate` - Reactivate within the paid period
/// - `GET /me/sponsorships` - Own sponsorships and totals
///
/// ## Staff Endpoints
/// - `GET /admin/sponsorships` - Every sponsorship
/// - `DELETE /admin/sponsorships/:id` - Soft-delete a sponsorship
pub fn sponsorship_routes() -> Router<SponsorshipAppState> {
    Router::new()
        .route("/sponsorships/one-time", post(create_one_time_sponsorship))
        .route(
            "/sponsorships/subscriptions",
            post(create_subscription_sponsorship),
        )
        .route("/subscriptions/:id/cancel", post(cancel_subscription))
        .route("/subscriptions/:id/reactivate", post(reactivate_subscription))
        .route("/me/sponsorships", get(get_my_sponsorships))
        .route("/admin/sponsorships", get(list_all_sponsorships))
        .route("/admin/sponsorships/:id", delete(delete_sponsorship))
}
