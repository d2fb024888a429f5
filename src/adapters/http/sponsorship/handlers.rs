//! HTTP handlers for sponsorship endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::dto::ErrorResponse;
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::sponsorship::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreateOneTimeSponsorshipCommand,
    CreateOneTimeSponsorshipHandler, CreateSubscriptionSponsorshipCommand,
    CreateSubscriptionSponsorshipHandler, DeleteSponsorshipCommand, DeleteSponsorshipHandler,
    GetMySponsorshipsHandler, GetMySponsorshipsQuery, ListAllSponsorshipsHandler,
    ListAllSponsorshipsQuery, ReactivateSubscriptionCommand, ReactivateSubscriptionHandler,
};
use crate::domain::foundation::{
    AuthenticatedUser, SponsorshipId, SubscriptionId, UserId, ValidationError,
};
use crate::domain::sponsorship::SponsorshipError;
use crate::ports::{Clock, SponsorshipReader, UnitOfWork};

use super::dto::{
    AdminSponsorshipListResponse, CreateOneTimeSponsorshipResponse, CreateSponsorshipRequest,
    CreateSubscriptionSponsorshipResponse, DeleteSponsorshipResponse, MySponsorshipsResponse,
    SubscriptionChangeRequest, SubscriptionChangeResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the sponsorship endpoints.
#[derive(Clone)]
pub struct SponsorshipAppState {
    pub unit_of_work: Arc<dyn UnitOfWork>,
    pub reader: Arc<dyn SponsorshipReader>,
    pub clock: Arc<dyn Clock>,
}

impl SponsorshipAppState {
    pub fn create_one_time_handler(&self) -> CreateOneTimeSponsorshipHandler {
        CreateOneTimeSponsorshipHandler::new(self.unit_of_work.clone(), self.clock.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionSponsorshipHandler {
        CreateSubscriptionSponsorshipHandler::new(self.unit_of_work.clone(), self.clock.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.unit_of_work.clone(), self.clock.clone())
    }

    pub fn reactivate_subscription_handler(&self) -> ReactivateSubscriptionHandler {
        ReactivateSubscriptionHandler::new(self.unit_of_work.clone(), self.clock.clone())
    }

    pub fn my_sponsorships_handler(&self) -> GetMySponsorshipsHandler {
        GetMySponsorshipsHandler::new(self.reader.clone())
    }

    pub fn list_all_handler(&self) -> ListAllSponsorshipsHandler {
        ListAllSponsorshipsHandler::new(self.reader.clone())
    }

    pub fn delete_sponsorship_handler(&self) -> DeleteSponsorshipHandler {
        DeleteSponsorshipHandler::new(self.unit_of_work.clone(), self.clock.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════════

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, SponsorshipError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| SponsorshipError::validation("body", rejection.body_text()))
}

/// Cancel and reactivate accept an empty body.
fn change_body(body: &Bytes) -> Result<SubscriptionChangeRequest, SponsorshipError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubscriptionChangeRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| SponsorshipError::validation("body", e.to_string()))
}

/// Sponsorships are owned by user accounts; staff sessions own none.
fn require_account(user: &AuthenticatedUser) -> Result<UserId, SponsorshipError> {
    user.account_id()
        .cloned()
        .ok_or_else(|| SponsorshipError::forbidden("A user account is required"))
}

fn session_account(user: &Option<AuthenticatedUser>) -> Option<UserId> {
    user.as_ref().and_then(|u| u.account_id().cloned())
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/sponsorships/one-time - Create a one-time sponsorship
pub async fn create_one_time_sponsorship(
    State(state): State<SponsorshipAppState>,
    OptionalAuth(user): OptionalAuth,
    payload: Result<Json<CreateSponsorshipRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let (plan_type, _, draft) = json_body(payload)?.into_parts()?;

    let cmd = CreateOneTimeSponsorshipCommand {
        session_account: session_account(&user),
        plan_type,
        draft,
    };
    let result = state.create_one_time_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOneTimeSponsorshipResponse::from(result)),
    ))
}

/// POST /api/sponsorships/subscriptions - Start a recurring sponsorship
pub async fn create_subscription_sponsorship(
    State(state): State<SponsorshipAppState>,
    OptionalAuth(user): OptionalAuth,
    payload: Result<Json<CreateSponsorshipRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let (plan_type, interval, draft) = json_body(payload)?.into_parts()?;

    let cmd = CreateSubscriptionSponsorshipCommand {
        session_account: session_account(&user),
        plan_type,
        interval: interval.unwrap_or_default(),
        draft,
    };
    let result = state.create_subscription_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionSponsorshipResponse::from(result)),
    ))
}

/// POST /api/subscriptions/:id/cancel - Cancel a subscription
pub async fn cancel_subscription(
    State(state): State<SponsorshipAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let subscription_id: SubscriptionId = id.parse()?;
    let request = change_body(&body)?;

    let cmd = CancelSubscriptionCommand {
        subscription_id,
        account: require_account(&user)?,
        cancel_at_period_end: request.cancel_at_period_end,
        status: request.status,
    };
    let result = state.cancel_subscription_handler().handle(cmd).await?;

    Ok(Json(SubscriptionChangeResponse::from(result)))
}

/// POST /api/subscriptions/:id/reactivate - Resume a cancelled subscription
pub async fn reactivate_subscription(
    State(state): State<SponsorshipAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let subscription_id: SubscriptionId = id.parse()?;
    let request = change_body(&body)?;

    let cmd = ReactivateSubscriptionCommand {
        subscription_id,
        account: require_account(&user)?,
        cancel_at_period_end: request.cancel_at_period_end,
        status: request.status,
    };
    let result = state.reactivate_subscription_handler().handle(cmd).await?;

    Ok(Json(SubscriptionChangeResponse::from(result)))
}

/// DELETE /api/admin/sponsorships/:id - Soft-delete a sponsorship (staff)
pub async fn delete_sponsorship(
    State(state): State<SponsorshipAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let sponsorship_id: SponsorshipId = id.parse()?;

    let cmd = DeleteSponsorshipCommand {
        sponsorship_id,
        caller: user,
    };
    let result = state.delete_sponsorship_handler().handle(cmd).await?;

    Ok(Json(DeleteSponsorshipResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/me/sponsorships - The caller's sponsorships and totals
pub async fn get_my_sponsorships(
    State(state): State<SponsorshipAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let query = GetMySponsorshipsQuery {
        account: require_account(&user)?,
    };
    let result = state.my_sponsorships_handler().handle(query).await?;

    Ok(Json(MySponsorshipsResponse::from(result)))
}

/// GET /api/admin/sponsorships - Every sponsorship (staff)
pub async fn list_all_sponsorships(
    State(state): State<SponsorshipAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, SponsorshipApiError> {
    let query = ListAllSponsorshipsQuery { caller: user };
    let result = state.list_all_handler().handle(query).await?;

    Ok(Json(AdminSponsorshipListResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct SponsorshipApiError(SponsorshipError);

impl From<SponsorshipError> for SponsorshipApiError {
    fn from(err: SponsorshipError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for SponsorshipApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for SponsorshipApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            SponsorshipError::ValidationFailed { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "VALIDATION_FAILED",
                    message.clone(),
                    serde_json::json!({ "field": field }),
                ),
            ),
            SponsorshipError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", self.0.to_string()),
            ),
            SponsorshipError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", message.clone()),
            ),
            SponsorshipError::PeriodEnded { period_end, .. } => (
                StatusCode::CONFLICT,
                ErrorResponse::with_details(
                    "PERIOD_ENDED",
                    self.0.to_string(),
                    serde_json::json!({
                        "current_period_end": period_end.as_datetime().to_rfc3339()
                    }),
                ),
            ),
            SponsorshipError::ConcurrentModification(_) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("CONFLICT", "The record was changed by another request"),
            ),
            SponsorshipError::Infrastructure(message) => {
                tracing::error!(error = %message, "sponsorship request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn status_of(err: SponsorshipError) -> StatusCode {
        SponsorshipApiError::from(err).into_response().status()
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            status_of(SponsorshipError::validation("amount", "too small")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SponsorshipError::not_found("dog", 9)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(SponsorshipError::forbidden("no")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(SponsorshipError::period_ended(
                SubscriptionId::new(1).unwrap(),
                Timestamp::now()
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(SponsorshipError::ConcurrentModification("v".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(SponsorshipError::infrastructure("connection reset")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn infrastructure_detail_is_not_leaked() {
        let response =
            SponsorshipApiError::from(SponsorshipError::infrastructure("password=hunter2"))
                .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(!body.contains("hunter2"));
        assert!(body.contains("INTERNAL_ERROR"));
    }

    #[test]
    fn path_parse_errors_become_validation_failures() {
        let err: SponsorshipApiError = "abc".parse::<SubscriptionId>().unwrap_err().into();
        assert!(matches!(err.0, SponsorshipError::ValidationFailed { .. }));

        let err: SponsorshipApiError = ValidationError::empty_field("x").into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_change_body_uses_defaults() {
        let request = change_body(&Bytes::from_static(b"  \n")).unwrap();
        assert!(request.cancel_at_period_end.is_none());

        let request = change_body(&Bytes::from_static(b"{\"cancel_at_period_end\":false}")).unwrap();
        assert_eq!(request.cancel_at_period_end, Some(false));

        assert!(change_body(&Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn staff_sessions_have_no_sponsoring_account() {
        let staff = AuthenticatedUser::staff(UserId::new("99").unwrap());
        assert!(matches!(
            require_account(&staff),
            Err(SponsorshipError::Forbidden(_))
        ));
        assert!(session_account(&Some(staff)).is_none());
    }
}
