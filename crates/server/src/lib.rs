use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use serde::Serialize;

pub use identity::{Identity, IdentityError, IdentityProvider};
pub use rates::{RateClient, RateError};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod expenses;
mod groups;
mod identity;
mod memberships;
mod rates;
mod server;
mod totals;

pub enum ServerError {
    Engine(EngineError),
    Unauthorized,
    Upstream(String),
    UpstreamTimeout(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        // Data store details are for the logs, never for clients.
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "invalid or missing credentials".to_string(),
            ),
            ServerError::Upstream(err) => (StatusCode::BAD_GATEWAY, err),
            ServerError::UpstreamTimeout(err) => (StatusCode::GATEWAY_TIMEOUT, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<IdentityError> for ServerError {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::Unauthorized => Self::Unauthorized,
            IdentityError::Timeout(msg) => Self::UpstreamTimeout(msg),
            IdentityError::Upstream(msg) => Self::Upstream(msg),
        }
    }
}

impl From<RateError> for ServerError {
    fn from(value: RateError) -> Self {
        match value {
            RateError::UnknownCurrency(code) => {
                Self::Generic(format!("unsupported display currency: {code}"))
            }
            RateError::Timeout(msg) => Self::UpstreamTimeout(msg),
            RateError::Upstream(msg) => Self::Upstream(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        let res = ServerError::Upstream("down".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let res = ServerError::UpstreamTimeout("slow".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
