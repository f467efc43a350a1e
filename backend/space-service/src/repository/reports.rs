/// Insert-only store for occupancy reports.
use sqlx::{Postgres, Transaction};

use crate::domain::models::OccupancyReport;
use crate::error::Result;

/// Persist a new report inside the submit transaction. Reports are
/// immutable; there is no update or delete path.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    report: &OccupancyReport,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO occupancy_reports (id, user_id, space_id, occupancy_level, submitted_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(report.id)
    .bind(report.user_id)
    .bind(report.space_id)
    .bind(report.occupancy_level)
    .bind(report.submitted_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
