//! Expense API endpoints

use api_types::MessageResponse;
use api_types::expense::{ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{ExpensePatch, Money};

use crate::{Identity, ServerError, server::ServerState};

fn view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        group_id: expense.group_id,
        user_id: expense.user_id,
        description: expense.description,
        amount_minor: expense.amount.minor_units(),
        category: expense.category,
        date: expense.date,
    }
}

/// Handle requests for logging a new expense.
///
/// The payer is the authenticated caller; a `user_id` in the body would not
/// be trusted and is not accepted.
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .add_expense(
            &group_id,
            &payload.description,
            Money::new(payload.amount_minor),
            &payload.category,
            payload.date,
            &identity.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(expense))))
}

/// Handle requests for listing a group's expenses.
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(&group_id, &identity.user_id)
        .await?;

    Ok(Json(ExpensesResponse {
        expenses: expenses.into_iter().map(view).collect(),
    }))
}

/// Handle requests for updating an expense (owner-only).
pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let patch = ExpensePatch {
        description: payload.description,
        amount: payload.amount_minor.map(Money::new),
        category: payload.category,
        date: payload.date,
    };
    let expense = state
        .engine
        .update_expense(&expense_id, patch, &identity.user_id)
        .await?;

    Ok(Json(view(expense)))
}

/// Handle requests for deleting an expense (owner-only).
pub async fn remove(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    state
        .engine
        .delete_expense(&expense_id, &identity.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}
