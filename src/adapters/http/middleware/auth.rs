//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects the principal into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//!
//! # Architecture
//!
//! The middleware uses the `SessionValidator` port, keeping it provider-agnostic.
//! Whether using the HS256 validator or a mock for testing, the middleware doesn't change.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Authentication middleware that validates Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting (guests may donate)
/// 5. On invalid token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    match token {
        Some(token) => match validator.validate(token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Auth service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (status, Json(ErrorResponse::new("AUTH_ERROR", message))).into_response()
            }
        },
        // No token: continue anonymously, RequireAuth enforces where needed
        None => next.run(request).await,
    }
}

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized when the auth middleware did not inject a
/// principal.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor for optional authentication.
///
/// `None` for anonymous callers, `Some(user)` when a valid token was sent.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts.extensions.get::<AuthenticatedUser>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("UNAUTHENTICATED", "Authentication required")),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::UserId;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::user(UserId::new("7").unwrap())
    }

    async fn whoami(OptionalAuth(user): OptionalAuth) -> String {
        match user {
            Some(u) if u.is_staff() => format!("staff:{}", u.id),
            Some(u) => format!("user:{}", u.id),
            None => "anonymous".to_string(),
        }
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_header_continues_anonymously() {
        let (status, body) = call(app(MockSessionValidator::new()), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_injects_principal() {
        let validator = MockSessionValidator::new()
            .with_test_user("user-token", "7")
            .with_staff("staff-token", "99");

        let (_, body) = call(app(validator), Some("Bearer user-token")).await;
        assert_eq!(body, "user:7");

        let validator = MockSessionValidator::new().with_staff("staff-token", "99");
        let (_, body) = call(app(validator), Some("Bearer staff-token")).await;
        assert_eq!(body, "staff:99");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_with_401() {
        let (status, body) = call(app(MockSessionValidator::new()), Some("Bearer nope")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "AUTH_ERROR");
        assert_eq!(json["message"], "Invalid token");
    }

    #[tokio::test]
    async fn unavailable_validator_returns_503() {
        let validator = MockSessionValidator::new()
            .with_error(AuthError::service_unavailable("down"));

        let (status, _) = call(app(validator), Some("Bearer anything")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_extracts_user_from_extensions() {
        use axum::extract::FromRequestParts;

        let mut request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_user());
        let (mut parts, _body) = request.into_parts();

        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user.id.as_str(), "7");
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        use axum::extract::FromRequestParts;

        let request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAuth, AuthRejection> =
            RequireAuth::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[test]
    fn auth_rejection_returns_401() {
        let response = AuthRejection::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
        assert_send_sync::<RequireAuth>();
        assert_send_sync::<OptionalAuth>();
    }
}
