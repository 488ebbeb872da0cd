use anyhow::Context;
use futures::future::{join_all, try_join_all};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::foods::repo::FoodItem;
use crate::{dates, nutrition, state::AppState};

use super::draft::{DraftItem, MealDraft};
use super::dto::CommitRequest;
use super::repo::{Meal, MealItem, NewMeal, NewMealItem};
use super::sessions::PendingCommit;

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("draft session not found")]
    UnknownSession,
    #[error("draft has no items")]
    EmptyDraft,
    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),
    #[error("food reference {0} no longer exists")]
    FoodNotFound(Uuid),
    #[error("meal {meal_id} was only partially written; retry the commit to complete it")]
    Partial {
        meal_id: Uuid,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum MealsError {
    #[error("meal not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Turn a draft into durable rows: one meal header, then one line item per
/// draft entry.
///
/// The commit is two-phase. The header create is recorded on the session as
/// a pending commit before any line item is written, so a failed attempt
/// leaves a retryable session instead of silent orphans: a retry reuses the
/// header and only writes the line items that are still missing. Nothing is
/// rolled back on partial failure; discarding the session cleans the
/// half-written meal up instead.
///
/// Line-item values are computed from the food reference as it exists *now*
/// (refetch-is-truth), not from the per-100g snapshot shown while composing.
/// A reference deleted since add-time fails the commit before any line item
/// is written.
pub async fn commit_draft(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
    req: &CommitRequest,
) -> Result<Meal, CommitError> {
    let session = state
        .drafts
        .get(session_id, user_id)
        .ok_or(CommitError::UnknownSession)?;
    if session.draft.items.is_empty() {
        return Err(CommitError::EmptyDraft);
    }
    let occurred_at = dates::today_at(&req.time_of_day, OffsetDateTime::now_utc())
        .ok_or_else(|| CommitError::InvalidTime(req.time_of_day.clone()))?;

    // Phase 1: the header. A retry after a partial failure reuses the one
    // recorded on the session.
    let (meal, already_written) = match &session.pending {
        Some(pending) => {
            let meal = Meal::get(&state.db, user_id, pending.meal_id)
                .await?
                .context("pending meal header is gone")?;
            (meal, pending.written.clone())
        }
        None => {
            let name = match session.draft.meal_name.trim() {
                "" => "Meal".to_string(),
                trimmed => trimmed.to_string(),
            };
            let meal = Meal::create(
                &state.db,
                NewMeal {
                    user_id,
                    name,
                    meal_type: req.meal_type,
                    occurred_at,
                    notes: req.notes.clone(),
                },
            )
            .await?;
            state
                .drafts
                .with_session(session_id, user_id, |s| {
                    s.pending = Some(PendingCommit {
                        meal_id: meal.id,
                        written: Vec::new(),
                    });
                })
                .ok_or(CommitError::UnknownSession)?;
            (meal, Vec::new())
        }
    };

    // Phase 2: resolve every remaining reference up front so a deleted food
    // fails the commit before any line item is written.
    let remaining: Vec<DraftItem> = session
        .draft
        .items
        .iter()
        .filter(|i| !already_written.contains(&i.food_id))
        .cloned()
        .collect();
    let foods = try_join_all(remaining.iter().map(|i| FoodItem::get(&state.db, i.food_id))).await?;
    let mut resolved = Vec::with_capacity(remaining.len());
    for (item, food) in remaining.into_iter().zip(foods) {
        let food = food.ok_or(CommitError::FoodNotFound(item.food_id))?;
        resolved.push((item, food));
    }

    // Phase 3: line items. Independent writes, issued concurrently; each
    // success is recorded so a retry skips it.
    let creates = resolved.into_iter().map(|(item, food)| {
        let db = state.db.clone();
        let meal_id = meal.id;
        async move {
            let result = MealItem::create(
                &db,
                NewMealItem {
                    meal_id,
                    food_id: item.food_id,
                    amount_g: item.amount_g,
                    kcal: nutrition::scale(food.kcal_per_100g, item.amount_g),
                    carb_g: nutrition::scale(food.carb_per_100g, item.amount_g),
                    fat_g: nutrition::scale(food.fat_per_100g, item.amount_g),
                    protein_g: nutrition::scale(food.protein_per_100g, item.amount_g),
                },
            )
            .await;
            (item.food_id, result)
        }
    });
    let mut failure: Option<anyhow::Error> = None;
    let mut newly_written = Vec::new();
    for (food_id, result) in join_all(creates).await {
        match result {
            Ok(_) => newly_written.push(food_id),
            Err(e) => failure = failure.or(Some(e)),
        }
    }
    state.drafts.with_session(session_id, user_id, |s| {
        if let Some(pending) = s.pending.as_mut() {
            pending.written.extend(newly_written.iter().copied());
        }
    });

    if let Some(source) = failure {
        warn!(meal_id = %meal.id, "meal committed partially");
        return Err(CommitError::Partial {
            meal_id: meal.id,
            source,
        });
    }

    // Phase 4: everything landed. Reset the draft; the session stays open
    // for the next composition.
    state.drafts.with_session(session_id, user_id, |s| {
        s.pending = None;
        s.draft = MealDraft::default();
    });
    info!(meal_id = %meal.id, user_id = %user_id, "meal committed");
    Ok(meal)
}

/// Delete a meal and its line items: items first, header second, so no
/// orphaned line items can survive a failure in between.
pub async fn delete_meal(state: &AppState, user_id: Uuid, meal_id: Uuid) -> Result<(), MealsError> {
    let meal = Meal::get(&state.db, user_id, meal_id)
        .await?
        .ok_or(MealsError::NotFound)?;
    MealItem::delete_by_meal(&state.db, meal.id).await?;
    Meal::delete(&state.db, meal.id).await?;
    info!(%meal_id, "meal deleted");
    Ok(())
}

/// Discard a composition session. A half-written meal from an earlier
/// partial commit is abandoned: cascade-deleted before the session goes
/// away. The session survives a failed cleanup so the discard can be
/// retried.
pub async fn discard_session(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<bool, MealsError> {
    let Some(session) = state.drafts.get(session_id, user_id) else {
        return Ok(false);
    };
    if let Some(pending) = session.pending {
        MealItem::delete_by_meal(&state.db, pending.meal_id).await?;
        Meal::delete(&state.db, pending.meal_id).await?;
        info!(meal_id = %pending.meal_id, "abandoned half-written meal");
    }
    state.drafts.close(session_id, user_id);
    Ok(true)
}
