use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::Rating;
use crate::error::Result;

const RATING_COLUMNS: &str =
    "id, space_id, user_id, score, comment, status, created_at, updated_at";

/// Repository for Rating operations
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user's active rating for a space, if any
    pub async fn find_active_by_user_and_space(
        &self,
        user_id: Uuid,
        space_id: Uuid,
    ) -> Result<Option<Rating>> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM ratings
            WHERE user_id = $1 AND space_id = $2 AND status = 'active'
            "#
        ))
        .bind(user_id)
        .bind(space_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating)
    }

    /// Find an active rating by its id
    pub async fn find_active_by_id(&self, rating_id: Uuid) -> Result<Option<Rating>> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM ratings
            WHERE id = $1 AND status = 'active'
            "#
        ))
        .bind(rating_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating)
    }

    /// Create a new active rating
    pub async fn insert(
        &self,
        user_id: Uuid,
        space_id: Uuid,
        score: i16,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<Rating> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            r#"
            INSERT INTO ratings (id, space_id, user_id, score, comment, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $6)
            RETURNING {RATING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(space_id)
        .bind(user_id)
        .bind(score)
        .bind(comment)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    /// Overwrite score/comment of an existing rating in place.
    /// Returns `None` if the rating is gone or no longer active.
    pub async fn overwrite(
        &self,
        rating_id: Uuid,
        score: i16,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Rating>> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            r#"
            UPDATE ratings
            SET score = $2, comment = $3, updated_at = $4
            WHERE id = $1 AND status = 'active'
            RETURNING {RATING_COLUMNS}
            "#
        ))
        .bind(rating_id)
        .bind(score)
        .bind(comment)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating)
    }

    /// Soft delete: flip status to inactive. Returns false if the
    /// rating was not active.
    pub async fn soft_delete(&self, rating_id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ratings
            SET status = 'inactive', updated_at = $2
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(rating_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active ratings for a space, newest first
    pub async fn list_active_by_space(&self, space_id: Uuid) -> Result<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(&format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM ratings
            WHERE space_id = $1 AND status = 'active'
            ORDER BY updated_at DESC
            "#
        ))
        .bind(space_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    /// Active ratings left by a user, newest first
    pub async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(&format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM ratings
            WHERE user_id = $1 AND status = 'active'
            ORDER BY updated_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    /// All ratings regardless of status, newest first. Admin surface
    /// for the moderation screen.
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(&format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM ratings
            ORDER BY updated_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    /// Scores of all active ratings for a space; input to the
    /// aggregate recompute
    pub async fn list_active_scores(&self, space_id: Uuid) -> Result<Vec<i16>> {
        let scores: Vec<i16> = sqlx::query_scalar(
            r#"
            SELECT score
            FROM ratings
            WHERE space_id = $1 AND status = 'active'
            "#,
        )
        .bind(space_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }
}
