//! Expense primitives.
//!
//! An `Expense` is a single spending record attributed to one group and one
//! payer. The payer owns the record: only they may update or delete it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub description: String,
    pub amount: Money,
    pub category: String,
    /// Calendar date of the expense, not of its entry.
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        group_id: String,
        user_id: String,
        description: String,
        amount: Money,
        category: String,
        date: NaiveDate,
    ) -> ResultEngine<Self> {
        if amount.is_negative() {
            return Err(EngineError::Validation(
                "amount must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            user_id,
            description,
            amount,
            category,
            date,
        })
    }
}

/// Partial update for an expense. `None` fields keep their current value;
/// `id`, `group_id` and `user_id` are immutable after creation.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    /// `true` when no field is set; applying such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub category: String,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.clone()),
            group_id: ActiveValue::Set(expense.group_id.clone()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.minor_units()),
            category: ActiveValue::Set(expense.category.clone()),
            date: ActiveValue::Set(expense.date),
        }
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            user_id: model.user_id,
            description: model.description,
            amount: Money::new(model.amount_minor),
            category: model.category,
            date: model.date,
        }
    }
}
