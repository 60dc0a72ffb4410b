//! Aggregate totals endpoint.

use api_types::totals::{ConversionView, MemberTotalView, TotalsQuery, TotalsResponse};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{Identity, ServerError, server::ServerState};

/// Handle requests for a group's totals.
///
/// The per-member and group totals are recomputed from a fresh read. When a
/// display currency is requested, the quote factor is applied to the final
/// group aggregate only; stored amounts stay in the base unit.
pub async fn get_totals(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Query(query): Query<TotalsQuery>,
) -> Result<Json<TotalsResponse>, ServerError> {
    let totals = state
        .engine
        .group_totals(&group_id, &identity.user_id)
        .await?;

    let conversion = match query.currency {
        Some(code) => {
            let rates = state.rates.as_ref().ok_or_else(|| {
                ServerError::Upstream("no rate quote service is configured".to_string())
            })?;
            let rate = rates.rate_for(&code).await?;
            Some(ConversionView {
                currency: code.trim().to_ascii_uppercase(),
                rate,
                group_total: totals.group_total.to_major() * rate,
            })
        }
        None => None,
    };

    Ok(Json(TotalsResponse {
        group_total_minor: totals.group_total.minor_units(),
        members: totals
            .members
            .into_iter()
            .map(|member| MemberTotalView {
                user_id: member.user_id,
                total_minor: member.total.minor_units(),
            })
            .collect(),
        conversion,
    }))
}
