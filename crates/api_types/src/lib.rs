use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of simple confirmation responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub description: String,
        /// The owner's profile id, fixed at creation.
        pub admin_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user in a group.
    ///
    /// - `admin`: the group owner; the only one who manages members.
    /// - `member`: may read the group and log expenses.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MembershipRole {
        Admin,
        Member,
    }

    impl MembershipRole {
        /// Returns the canonical role string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "admin",
                Self::Member => "member",
            }
        }
    }

    /// Request body for inviting a registered user by email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InviteNew {
        pub email: String,
    }

    /// A member with their profile details for presentation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub user_id: String,
        pub email: String,
        pub full_name: Option<String>,
        pub role: MembershipRole,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        /// Amount in minor units of the group's base currency.
        pub amount_minor: i64,
        pub category: String,
        /// Calendar date of the expense (`YYYY-MM-DD`).
        pub date: NaiveDate,
    }

    /// Partial update; absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub group_id: String,
        /// The payer; fixed at creation and the only one allowed to modify
        /// the record.
        pub user_id: String,
        pub description: String,
        pub amount_minor: i64,
        pub category: String,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod totals {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TotalsQuery {
        /// Display currency code (e.g. `USD`). Without it the response
        /// carries base-unit totals only.
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberTotalView {
        pub user_id: String,
        pub total_minor: i64,
    }

    /// Display-currency conversion of the final aggregate, when requested.
    ///
    /// Stored amounts are never converted; this block is a read-time
    /// transform of the group total.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConversionView {
        pub currency: String,
        /// Multiplicative factor from the base unit.
        pub rate: f64,
        pub group_total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TotalsResponse {
        pub group_total_minor: i64,
        pub members: Vec<MemberTotalView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub conversion: Option<ConversionView>,
    }
}
