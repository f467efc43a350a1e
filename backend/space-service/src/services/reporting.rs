/// Occupancy report submission.
///
/// One submission is a read-modify-write against the user's rate-limit
/// state plus an insert into the report log, executed inside a single
/// transaction with the user row locked. Two overlapping submissions
/// from the same user therefore serialize: the second one re-reads the
/// counters the first one wrote.
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::ReportLimits;
use crate::domain::models::{OccupancyLevel, OccupancyReport};
use crate::error::{AppError, Result};
use crate::repository::{reports, users};
use crate::services::abuse_guard::{self, SpaceDecision};

/// Cooldown-map entries older than this can never deny again and are
/// pruned on successful submission.
const COOLDOWN_MAP_HORIZON_HOURS: i64 = 24;

pub struct ReportingService {
    pool: PgPool,
    limits: ReportLimits,
    clock: Arc<dyn Clock>,
}

impl ReportingService {
    pub fn new(pool: PgPool, limits: ReportLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            limits,
            clock,
        }
    }

    /// Submit one occupancy report.
    ///
    /// Gate order is fixed: daily quota first, per-space cooldown
    /// second, so a capped user always sees the daily denial. A denial
    /// rolls the transaction back; no counter moves and no report row
    /// is written.
    pub async fn submit_report(
        &self,
        user_id: Uuid,
        space_id: Uuid,
        occupancy_level: OccupancyLevel,
    ) -> Result<OccupancyReport> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;

        let Some(mut state) = users::lock_report_state(&mut tx, user_id).await? else {
            return Err(AppError::NotFound(format!("user {user_id}")));
        };

        // Lazy daily reset; persisted only if the submission succeeds.
        if abuse_guard::needs_daily_reset(state.last_daily_reset_at, now) {
            state.reports_today = 0;
            state.last_daily_reset_at = now;
        }

        if !abuse_guard::can_report_today(
            state.reports_today,
            state.last_daily_reset_at,
            now,
            self.limits.daily_limit,
        ) {
            tracing::info!(%user_id, "report denied: daily limit reached");
            return Err(AppError::DailyLimitExceeded {
                limit: self.limits.daily_limit,
            });
        }

        if let SpaceDecision::Cooldown { retry_after_minutes } = abuse_guard::can_report_space(
            space_id,
            &state.last_report_by_space,
            now,
            self.limits.cooldown_minutes,
        ) {
            tracing::info!(%user_id, %space_id, retry_after_minutes, "report denied: cooldown");
            return Err(AppError::CooldownActive { retry_after_minutes });
        }

        let report = OccupancyReport {
            id: Uuid::new_v4(),
            user_id,
            space_id,
            occupancy_level,
            submitted_at: now,
        };
        reports::insert(&mut tx, &report).await?;

        users::save_daily_counters(
            &mut tx,
            user_id,
            state.reports_today + 1,
            state.last_daily_reset_at,
        )
        .await?;
        users::touch_space_report(&mut tx, user_id, space_id, now).await?;
        users::prune_space_reports(
            &mut tx,
            user_id,
            now - Duration::hours(COOLDOWN_MAP_HORIZON_HOURS),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            report_id = %report.id,
            %user_id,
            %space_id,
            level = ?occupancy_level,
            "occupancy report accepted"
        );

        Ok(report)
    }
}
