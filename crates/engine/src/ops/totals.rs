//! Derived aggregates over the expense ledger.
//!
//! Totals are recomputed from a fresh read on every call; nothing here is
//! stored or cached, since no invalidation protocol exists.

use std::collections::BTreeMap;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{Money, ResultEngine, expenses, memberships};

use super::{Engine, with_tx};

/// Totals derived from a group's expense ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupTotals {
    pub group_total: Money,
    /// One entry per current member (0 if they paid nothing), plus one per
    /// past member that still owns expenses in the group.
    pub members: Vec<MemberTotal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberTotal {
    pub user_id: String,
    pub total: Money,
}

impl Engine {
    /// Compute the group total and per-member totals (member-gated).
    ///
    /// A row that cannot be accumulated (negative or overflowing amount) is
    /// counted as 0 and logged as a data-quality issue; one bad row must not
    /// fail the whole aggregate.
    pub async fn group_totals(&self, group_id: &str, user_id: &str) -> ResultEngine<GroupTotals> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let membership_rows = memberships::Entity::find()
                .filter(memberships::Column::GroupId.eq(group_id.to_string()))
                .all(&db_tx)
                .await?;
            let mut per_member: BTreeMap<String, Money> = membership_rows
                .into_iter()
                .map(|m| (m.user_id, Money::ZERO))
                .collect();

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .all(&db_tx)
                .await?;

            let mut group_total = Money::ZERO;
            for row in expense_rows {
                let amount = Money::new(row.amount_minor);
                if amount.is_negative() {
                    tracing::warn!(
                        expense_id = %row.id,
                        amount_minor = row.amount_minor,
                        "negative amount in ledger, counted as 0"
                    );
                    continue;
                }
                let Some(next_total) = group_total.checked_add(amount) else {
                    tracing::warn!(
                        expense_id = %row.id,
                        "group total would overflow, amount counted as 0"
                    );
                    continue;
                };
                group_total = next_total;
                // A per-member total is bounded by the group total, so this
                // add cannot overflow once the one above succeeded.
                *per_member.entry(row.user_id).or_insert(Money::ZERO) += amount;
            }

            let members = per_member
                .into_iter()
                .map(|(user_id, total)| MemberTotal { user_id, total })
                .collect();
            Ok(GroupTotals {
                group_total,
                members,
            })
        })
    }
}
