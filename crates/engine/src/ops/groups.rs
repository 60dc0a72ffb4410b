use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{Group, ResultEngine, groups, memberships, memberships::MemberRole};

use super::{Engine, normalize_required_text, normalize_text, with_tx};

impl Engine {
    /// Create a group owned by the caller.
    ///
    /// The group row and the caller's admin membership are written in the
    /// same DB transaction, so a group is never observable without its admin
    /// member.
    pub async fn new_group(
        &self,
        name: &str,
        description: &str,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = normalize_required_text(name, "group name")?;
        let description = normalize_text(description);

        let group = Group::new(name, description, user_id);
        let group_entry: groups::ActiveModel = (&group).into();
        with_tx!(self, |db_tx| {
            group_entry.insert(&db_tx).await?;

            let membership = memberships::ActiveModel {
                group_id: ActiveValue::Set(group.id.clone()),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(MemberRole::Admin.as_str().to_string()),
            };
            membership.insert(&db_tx).await?;

            Ok(group)
        })
    }

    /// List the groups the caller holds a membership in.
    pub async fn groups_for_user(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let rows: Vec<(memberships::Model, Option<groups::Model>)> =
                memberships::Entity::find()
                    .filter(memberships::Column::UserId.eq(user_id.to_string()))
                    .find_also_related(groups::Entity)
                    .all(&db_tx)
                    .await?;

            let mut out: Vec<Group> = rows
                .into_iter()
                .filter_map(|(_, group)| group)
                .map(Group::from)
                .collect();
            out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            Ok(out)
        })
    }

    /// Return a single group (member-gated).
    pub async fn group_by_id(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let model = self.require_group_member(&db_tx, group_id, user_id).await?;
            Ok(Group::from(model))
        })
    }
}
