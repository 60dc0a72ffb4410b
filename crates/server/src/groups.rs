//! Group API endpoints

use api_types::group::{GroupNew, GroupView, GroupsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{Identity, ServerError, server::ServerState};

fn view(group: engine::Group) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        admin_id: group.admin_id,
    }
}

/// Handle requests for creating a new group.
///
/// The caller becomes the admin; the admin id is taken from the session, not
/// from the body.
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .new_group(
            &payload.name,
            payload.description.as_deref().unwrap_or(""),
            &identity.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(group))))
}

/// Handle requests for listing the caller's groups.
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state.engine.groups_for_user(&identity.user_id).await?;

    Ok(Json(GroupsResponse {
        groups: groups.into_iter().map(view).collect(),
    }))
}

/// Handle requests for a single group.
pub async fn get_one(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state
        .engine
        .group_by_id(&group_id, &identity.user_id)
        .await?;

    Ok(Json(view(group)))
}
