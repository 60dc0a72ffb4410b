use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, memberships, memberships::Member, memberships::MemberRole, profiles,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Invite a registered user to a group (admin-only).
    ///
    /// The email must resolve to an existing profile; invitation is immediate
    /// membership, there is no pending state. Returns the invited user's id.
    pub async fn invite_member(
        &self,
        group_id: &str,
        email: &str,
        user_id: &str,
    ) -> ResultEngine<String> {
        let email = normalize_required_text(email, "email")?;
        with_tx!(self, |db_tx| {
            self.require_group_admin(&db_tx, group_id, user_id).await?;
            let profile = self.require_profile_by_email(&db_tx, &email).await?;

            let existing =
                memberships::Entity::find_by_id((group_id.to_string(), profile.id.clone()))
                    .one(&db_tx)
                    .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!(
                    "{email} is already a member of this group"
                )));
            }

            let membership = memberships::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(profile.id.clone()),
                role: ActiveValue::Set(MemberRole::Member.as_str().to_string()),
            };
            membership.insert(&db_tx).await?;

            tracing::info!(group_id = %group_id, member_id = %profile.id, "member invited");
            Ok(profile.id)
        })
    }

    /// Remove a member (admin-only; the admin cannot remove themself).
    pub async fn remove_member(
        &self,
        group_id: &str,
        member_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let group = self.require_group_admin(&db_tx, group_id, user_id).await?;
            if member_id == group.admin_id {
                return Err(EngineError::Forbidden(
                    "the group admin cannot be removed".to_string(),
                ));
            }

            let existing =
                memberships::Entity::find_by_id((group_id.to_string(), member_id.to_string()))
                    .one(&db_tx)
                    .await?;
            if existing.is_none() {
                return Err(EngineError::NotFound("membership not found".to_string()));
            }

            memberships::Entity::delete_by_id((group_id.to_string(), member_id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List members with their profile details (member-gated).
    pub async fn list_members(&self, group_id: &str, user_id: &str) -> ResultEngine<Vec<Member>> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let rows: Vec<(memberships::Model, Option<profiles::Model>)> =
                memberships::Entity::find()
                    .filter(memberships::Column::GroupId.eq(group_id.to_string()))
                    .find_also_related(profiles::Entity)
                    .all(&db_tx)
                    .await?;

            let mut members = Vec::with_capacity(rows.len());
            for (membership, profile) in rows {
                let role = MemberRole::try_from(membership.role.as_str())?;
                let (email, full_name) = match profile {
                    Some(profile) => (profile.email, profile.full_name),
                    None => (String::new(), None),
                };
                members.push(Member {
                    user_id: membership.user_id,
                    role,
                    email,
                    full_name,
                });
            }
            members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
            Ok(members)
        })
    }
}
