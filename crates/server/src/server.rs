use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{
    ServerError, expenses, groups, identity::IdentityProvider, memberships, rates::RateClient,
    totals,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub identity: Arc<IdentityProvider>,
    /// Absent when no rate quote service is configured; the totals endpoint
    /// then serves base-unit totals only.
    pub rates: Option<Arc<RateClient>>,
}

/// Resolves the caller's identity on every request.
///
/// The bearer token is verified against the identity provider and the
/// resolved identity is what every handler authorizes against — a user id
/// found in a request body or path is never trusted. The caller's profile
/// row is created the first time the provider vouches for them.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(auth_header) = auth_header else {
        return Err(ServerError::Unauthorized);
    };

    let identity = state.identity.verify(auth_header.token()).await?;
    state
        .engine
        .ensure_profile(
            &identity.user_id,
            &identity.email,
            identity.full_name.as_deref(),
        )
        .await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", post(groups::create).get(groups::list))
        .route("/groups/{group_id}", get(groups::get_one))
        .route("/groups/{group_id}/invite", post(memberships::invite))
        .route("/groups/{group_id}/members", get(memberships::list))
        .route(
            "/groups/{group_id}/members/{user_id}",
            delete(memberships::remove),
        )
        .route(
            "/groups/{group_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route("/groups/{group_id}/totals", get(totals::get_totals))
        .route(
            "/expenses/{expense_id}",
            put(expenses::update).delete(expenses::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
