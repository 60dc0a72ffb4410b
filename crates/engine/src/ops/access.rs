use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{
    EngineError, ResultEngine, expenses, groups, memberships, memberships::MemberRole, profiles,
};

use super::Engine;

impl Engine {
    pub(super) async fn find_group_by_id(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<Option<groups::Model>> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn membership_role(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<MemberRole>> {
        let row = memberships::Entity::find_by_id((group_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref()
            .map(|m| MemberRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Loads a group and checks the caller holds a membership in it.
    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let model = self
            .find_group_by_id(db, group_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("group not found".to_string()))?;
        if self.membership_role(db, group_id, user_id).await?.is_none() {
            return Err(EngineError::Forbidden(
                "caller is not a member of this group".to_string(),
            ));
        }
        Ok(model)
    }

    /// Loads a group and checks the caller is its admin.
    pub(super) async fn require_group_admin(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let model = self
            .find_group_by_id(db, group_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("group not found".to_string()))?;
        if model.admin_id != user_id {
            return Err(EngineError::Forbidden(
                "only the group admin may manage members".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn require_profile_by_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<profiles::Model> {
        profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(format!("{email} is not registered in the system"))
            })
    }

    pub(super) async fn require_expense(
        &self,
        db: &DatabaseTransaction,
        expense_id: &str,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("expense not found".to_string()))
    }

    /// Expense writes are owner-only; the group admin has no override.
    pub(super) fn require_expense_owner(
        expense: &expenses::Model,
        user_id: &str,
    ) -> ResultEngine<()> {
        if expense.user_id != user_id {
            return Err(EngineError::Forbidden(
                "only the expense owner may modify it".to_string(),
            ));
        }
        Ok(())
    }
}
