use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpensePatch, Money, ResultEngine, expenses};

use super::{Engine, normalize_text, with_tx};

impl Engine {
    /// Record an expense against a group.
    ///
    /// The caller must hold a membership in the group and becomes the owner
    /// of the record; ownership is permanent and non-transferable.
    pub async fn add_expense(
        &self,
        group_id: &str,
        description: &str,
        amount: Money,
        category: &str,
        date: NaiveDate,
        user_id: &str,
    ) -> ResultEngine<Expense> {
        let description = normalize_text(description);
        let category = normalize_text(category);
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let expense = Expense::new(
                group_id.to_string(),
                user_id.to_string(),
                description,
                amount,
                category,
                date,
            )?;
            let entry: expenses::ActiveModel = (&expense).into();
            entry.insert(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Update an expense (owner-only).
    ///
    /// Fields left `None` keep their stored value; the whole patch is applied
    /// in one statement, never partially.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        patch: ExpensePatch,
        user_id: &str,
    ) -> ResultEngine<Expense> {
        if let Some(amount) = patch.amount
            && amount.is_negative()
        {
            return Err(EngineError::Validation(
                "amount must not be negative".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_expense(&db_tx, expense_id).await?;
            Engine::require_expense_owner(&model, user_id)?;

            let updated = if patch.is_empty() {
                model
            } else {
                let mut active = expenses::ActiveModel {
                    id: ActiveValue::Set(model.id.clone()),
                    ..Default::default()
                };
                if let Some(description) = patch.description.as_deref() {
                    active.description = ActiveValue::Set(normalize_text(description));
                }
                if let Some(amount) = patch.amount {
                    active.amount_minor = ActiveValue::Set(amount.minor_units());
                }
                if let Some(category) = patch.category.as_deref() {
                    active.category = ActiveValue::Set(normalize_text(category));
                }
                if let Some(date) = patch.date {
                    active.date = ActiveValue::Set(date);
                }
                active.update(&db_tx).await?
            };
            Ok(Expense::from(updated))
        })
    }

    /// Delete an expense (owner-only).
    pub async fn delete_expense(&self, expense_id: &str, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_expense(&db_tx, expense_id).await?;
            Engine::require_expense_owner(&model, user_id)?;

            expenses::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List a group's expenses (member-gated).
    ///
    /// Ordered by `date` ascending, then `id`, so repeated reads are stable.
    pub async fn list_expenses(&self, group_id: &str, user_id: &str) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .order_by_asc(expenses::Column::Date)
                .order_by_asc(expenses::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Expense::from).collect())
        })
    }
}
