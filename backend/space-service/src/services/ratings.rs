/// Space ratings and the derived average.
///
/// The average is never adjusted incrementally: a re-rating replaces
/// the user's previous contribution in place, so after every mutation
/// the aggregate is re-derived from a full scan of active ratings and
/// written unconditionally. Stale concurrent writes self-correct on
/// the next mutation (last writer wins).
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::models::{Rating, Role};
use crate::error::{AppError, Result};
use crate::repository::{RatingRepository, SpaceRepository};

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;
pub const MAX_COMMENT_LEN: usize = 500;

/// Mean of the active scores, rounded to one decimal place, half away
/// from zero. Empty input yields exactly 0.
pub fn average_score(scores: &[i16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|&s| s as i64).sum();
    let mean = sum as f64 / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

pub struct RatingService {
    ratings: RatingRepository,
    spaces: SpaceRepository,
    clock: Arc<dyn Clock>,
}

impl RatingService {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            ratings: RatingRepository::new(pool.clone()),
            spaces: SpaceRepository::new(pool),
            clock,
        }
    }

    /// Create or overwrite the requester's rating for a space.
    ///
    /// A user holds at most one active rating per space: if one exists
    /// it is overwritten (score, comment, timestamp), otherwise a new
    /// row is inserted. Returns the rating, the recomputed average and
    /// whether the rating was newly created.
    pub async fn upsert_rating(
        &self,
        user_id: Uuid,
        space_id: Uuid,
        score: i16,
        comment: Option<String>,
    ) -> Result<(Rating, f64, bool)> {
        let comment = validate(score, comment)?;

        if !self.spaces.exists(space_id).await? {
            return Err(AppError::NotFound(format!("space {space_id}")));
        }

        let now = self.clock.now();
        let (rating, created) = match self
            .ratings
            .find_active_by_user_and_space(user_id, space_id)
            .await?
        {
            Some(existing) => {
                let rating = self
                    .ratings
                    .overwrite(existing.id, score, &comment, now)
                    .await?
                    .ok_or_else(|| {
                        AppError::Conflict("rating was removed concurrently".to_string())
                    })?;
                (rating, false)
            }
            None => {
                let rating = self
                    .ratings
                    .insert(user_id, space_id, score, &comment, now)
                    .await?;
                (rating, true)
            }
        };

        let average = self.recompute_average(space_id).await?;

        tracing::info!(
            rating_id = %rating.id,
            %user_id,
            %space_id,
            score,
            created,
            average,
            "rating upserted"
        );

        Ok((rating, average, created))
    }

    /// Partially update an active rating. Owner or admin only.
    pub async fn update_rating(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        rating_id: Uuid,
        score: Option<i16>,
        comment: Option<String>,
    ) -> Result<(Rating, f64)> {
        let existing = self
            .ratings
            .find_active_by_id(rating_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("rating {rating_id}")))?;

        check_permission(&existing, requester_id, requester_role)?;

        let new_score = score.unwrap_or(existing.score);
        let new_comment = match comment {
            Some(c) => validate(new_score, Some(c))?,
            None => {
                validate(new_score, None)?;
                existing.comment.clone()
            }
        };

        let now = self.clock.now();
        let rating = self
            .ratings
            .overwrite(rating_id, new_score, &new_comment, now)
            .await?
            .ok_or_else(|| AppError::Conflict("rating was removed concurrently".to_string()))?;

        let average = self.recompute_average(rating.space_id).await?;

        Ok((rating, average))
    }

    /// Soft-delete an active rating and return the recomputed average.
    /// Owner or admin only.
    pub async fn delete_rating(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        rating_id: Uuid,
    ) -> Result<f64> {
        let existing = self
            .ratings
            .find_active_by_id(rating_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("rating {rating_id}")))?;

        check_permission(&existing, requester_id, requester_role)?;

        let deleted = self.ratings.soft_delete(rating_id, self.clock.now()).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("rating {rating_id}")));
        }

        let average = self.recompute_average(existing.space_id).await?;

        tracing::info!(%rating_id, space_id = %existing.space_id, average, "rating soft-deleted");

        Ok(average)
    }

    /// Active ratings for a space, newest first
    pub async fn list_by_space(&self, space_id: Uuid) -> Result<Vec<Rating>> {
        self.ratings.list_active_by_space(space_id).await
    }

    /// Active ratings left by a user, newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        self.ratings.list_active_by_user(user_id).await
    }

    /// All ratings, for the admin moderation screen
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Rating>> {
        self.ratings.list_all(limit, offset).await
    }

    /// Re-derive the space's average from the current active set and
    /// overwrite it unconditionally.
    pub async fn recompute_average(&self, space_id: Uuid) -> Result<f64> {
        let scores = self.ratings.list_active_scores(space_id).await?;
        let average = average_score(&scores);

        let updated = self.spaces.update_average_rating(space_id, average).await?;
        if !updated {
            tracing::warn!(%space_id, "aggregate write skipped: space no longer exists");
        }

        Ok(average)
    }
}

fn check_permission(rating: &Rating, requester_id: Uuid, requester_role: Role) -> Result<()> {
    if rating.user_id != requester_id && !requester_role.is_admin() {
        return Err(AppError::Forbidden(
            "only the rating owner or an admin may modify it".to_string(),
        ));
    }
    Ok(())
}

fn validate(score: i16, comment: Option<String>) -> Result<String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    let comment = comment.unwrap_or_default();
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "comment may not exceed {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(comment)
}
