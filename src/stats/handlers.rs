use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::{auth::AuthUser, dates, state::AppState};

use super::dto::{DailyQuery, DayTotalsResponse, RingQuery, RingResponse, WeeklyQuery};
use super::ring::ring_geometry;
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats/daily", get(daily))
        .route("/stats/weekly", get(weekly))
        .route("/stats/ring", get(ring))
}

#[instrument(skip(state))]
pub async fn daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<DailyQuery>,
) -> Result<Json<DayTotalsResponse>, (StatusCode, String)> {
    let totals = services::daily_totals(&state, user_id, p.date)
        .await
        .map_err(internal)?;
    Ok(Json(DayTotalsResponse {
        date: p.date,
        totals,
    }))
}

#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<WeeklyQuery>,
) -> Result<Json<Vec<DayTotalsResponse>>, (StatusCode, String)> {
    let days = services::weekly_totals(&state, user_id, p.end)
        .await
        .map_err(internal)?;
    Ok(Json(
        days.into_iter()
            .map(|(date, totals)| DayTotalsResponse { date, totals })
            .collect(),
    ))
}

/// Today's (or the queried day's) totals projected onto the progress ring.
/// The calorie target comes from the caller; computing it is the profile
/// feature's business.
#[instrument(skip(state))]
pub async fn ring(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<RingQuery>,
) -> Result<Json<RingResponse>, (StatusCode, String)> {
    let date = p
        .date
        .unwrap_or_else(|| dates::utc_date(OffsetDateTime::now_utc()));
    let totals = services::daily_totals(&state, user_id, date)
        .await
        .map_err(internal)?;
    let ring = ring_geometry(
        totals.kcal as f64,
        p.target,
        totals.carb_g as f64,
        totals.protein_g as f64,
        totals.fat_g as f64,
    );
    Ok(Json(RingResponse {
        date,
        target: p.target,
        totals,
        ring,
    }))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "stats load error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
