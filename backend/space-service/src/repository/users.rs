/// Persistence for the user's report-state slice.
///
/// Every function runs inside the caller's transaction: the submit flow
/// is a read-modify-write against one user row, and the `FOR UPDATE`
/// lock taken here serializes concurrent submissions from the same
/// user so both rate-limit gates see consistent counters.
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::models::UserReportState;
use crate::error::Result;

/// Load a user's report state, locking the user row for the duration
/// of the transaction. Returns `None` for unknown users; row creation
/// belongs to the identity system.
pub async fn lock_report_state(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Option<UserReportState>> {
    let row: Option<(i32, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT reports_today, last_daily_reset_at
        FROM users
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some((reports_today, last_daily_reset_at)) = row else {
        return Ok(None);
    };

    let entries: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT space_id, last_report_at
        FROM user_space_reports
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(Some(UserReportState {
        user_id,
        reports_today,
        last_daily_reset_at,
        last_report_by_space: entries.into_iter().collect(),
    }))
}

/// Persist the daily counter and reset stamp.
pub async fn save_daily_counters(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    reports_today: i32,
    last_daily_reset_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET reports_today = $2, last_daily_reset_at = $3
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(reports_today)
    .bind(last_daily_reset_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Record the instant of an accepted report for `(user, space)`.
pub async fn touch_space_report(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    space_id: Uuid,
    reported_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_space_reports (user_id, space_id, last_report_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, space_id) DO UPDATE
        SET last_report_at = EXCLUDED.last_report_at
        "#,
    )
    .bind(user_id)
    .bind(space_id)
    .bind(reported_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Drop cooldown-map entries that can no longer deny anything.
pub async fn prune_space_reports(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    older_than: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM user_space_reports
        WHERE user_id = $1 AND last_report_at < $2
        "#,
    )
    .bind(user_id)
    .bind(older_than)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}
