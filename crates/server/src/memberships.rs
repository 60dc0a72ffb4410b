//! Membership management endpoints (admin-only writes).

use api_types::MessageResponse;
use api_types::membership::{InviteNew, MemberView, MembersResponse, MembershipRole};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{Identity, ServerError, server::ServerState};

/// Handle requests for inviting a registered user by email.
pub async fn invite(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<InviteNew>,
) -> Result<Json<MessageResponse>, ServerError> {
    let email = payload.email.trim().to_string();
    state
        .engine
        .invite_member(&group_id, &email, &identity.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: format!("{email} invited successfully!"),
    }))
}

/// Handle requests for listing a group's members.
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .list_members(&group_id, &identity.user_id)
        .await?
        .into_iter()
        .map(|member| MemberView {
            user_id: member.user_id,
            email: member.email,
            full_name: member.full_name,
            role: match member.role {
                engine::MemberRole::Admin => MembershipRole::Admin,
                engine::MemberRole::Member => MembershipRole::Member,
            },
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

/// Handle requests for removing a member from a group.
pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path((group_id, user_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ServerError> {
    state
        .engine
        .remove_member(&group_id, &user_id, &identity.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "User removed".to_string(),
    }))
}
