use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Repository for the aggregate slice of the space entity
#[derive(Clone)]
pub struct SpaceRepository {
    pool: PgPool,
}

impl SpaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a space exists
    pub async fn exists(&self, space_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM spaces
                WHERE id = $1
            )
            "#,
        )
        .bind(space_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Overwrite the derived average rating. Always writes, even when
    /// the value is unchanged; recomputation is idempotent and last
    /// writer wins. Returns false for unknown spaces.
    pub async fn update_average_rating(&self, space_id: Uuid, average: f64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE spaces
            SET average_rating = $2
            WHERE id = $1
            "#,
        )
        .bind(space_id)
        .bind(average)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
