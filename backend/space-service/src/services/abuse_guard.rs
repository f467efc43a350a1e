/// Abuse control for occupancy reports: pure decision rules, no I/O.
///
/// Two independent gates protect the report stream:
/// - a per-(user, space) cooldown: the same space cannot be re-reported
///   within the cooldown window, but other spaces are never affected;
/// - a per-user daily quota counted per calendar day (UTC midnight
///   boundary, not a rolling 24h window).
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Outcome of the per-space cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceDecision {
    Allowed,
    /// Blocked; wait `retry_after_minutes` (ceiling of the remaining
    /// window) before reporting this space again
    Cooldown { retry_after_minutes: i64 },
}

impl SpaceDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SpaceDecision::Allowed)
    }
}

/// Decide whether `space_id` may be reported at `now`, given the
/// user's most recent report instant per space.
pub fn can_report_space(
    space_id: Uuid,
    last_report_by_space: &HashMap<Uuid, DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_minutes: i64,
) -> SpaceDecision {
    let Some(&last_report_at) = last_report_by_space.get(&space_id) else {
        return SpaceDecision::Allowed;
    };

    let cooldown = Duration::minutes(cooldown_minutes);
    let elapsed = now - last_report_at;

    if elapsed < cooldown {
        let remaining_ms = (cooldown - elapsed).num_milliseconds();
        // Ceiling in whole minutes; a 1ms remainder still costs a minute.
        let retry_after_minutes = (remaining_ms + 59_999) / 60_000;
        SpaceDecision::Cooldown { retry_after_minutes }
    } else {
        SpaceDecision::Allowed
    }
}

/// True when `now` falls on a later calendar day than the last daily
/// reset, i.e. the counter is stale and must be zeroed before use.
pub fn needs_daily_reset(last_daily_reset_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.date_naive() > last_daily_reset_at.date_naive()
}

/// Daily-quota gate. A stale counter conceptually resets to zero for
/// the purpose of this check; the actual mutation is the caller's job.
pub fn can_report_today(
    reports_today: i32,
    last_daily_reset_at: DateTime<Utc>,
    now: DateTime<Utc>,
    daily_limit: i32,
) -> bool {
    if needs_daily_reset(last_daily_reset_at, now) {
        return true;
    }
    reports_today < daily_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const COOLDOWN: i64 = 15;
    const DAILY_LIMIT: i32 = 10;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, min, sec).unwrap()
    }

    #[test]
    fn never_reported_space_is_allowed() {
        let history = HashMap::new();
        let decision = can_report_space(Uuid::new_v4(), &history, at(12, 0, 0), COOLDOWN);
        assert!(decision.is_allowed());
    }

    #[test]
    fn report_older_than_cooldown_is_allowed() {
        let space = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(space, at(11, 40, 0)); // 20 minutes ago

        assert!(can_report_space(space, &history, at(12, 0, 0), COOLDOWN).is_allowed());
    }

    #[test]
    fn recent_report_is_blocked_with_wait_time() {
        let space = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(space, at(11, 55, 0)); // 5 minutes ago

        let decision = can_report_space(space, &history, at(12, 0, 0), COOLDOWN);
        assert_eq!(
            decision,
            SpaceDecision::Cooldown {
                retry_after_minutes: 10
            }
        );
    }

    #[test]
    fn retry_after_decreases_as_time_passes() {
        let space = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(space, at(12, 0, 0));

        let mut previous = i64::MAX;
        for elapsed_min in [1u32, 4, 8, 12, 14] {
            match can_report_space(space, &history, at(12, elapsed_min, 0), COOLDOWN) {
                SpaceDecision::Cooldown { retry_after_minutes } => {
                    assert!(retry_after_minutes < previous);
                    assert!(retry_after_minutes >= 1);
                    previous = retry_after_minutes;
                }
                SpaceDecision::Allowed => panic!("expected cooldown at {elapsed_min}min"),
            }
        }
    }

    #[test]
    fn allowed_exactly_at_cooldown_boundary() {
        let space = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(space, at(12, 0, 0));

        assert!(can_report_space(space, &history, at(12, 15, 0), COOLDOWN).is_allowed());
    }

    #[test]
    fn one_millisecond_short_of_boundary_still_blocks() {
        let space = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(space, at(12, 0, 0));

        let now = at(12, 14, 59) + Duration::milliseconds(999);
        let decision = can_report_space(space, &history, now, COOLDOWN);
        assert_eq!(
            decision,
            SpaceDecision::Cooldown {
                retry_after_minutes: 1
            }
        );
    }

    #[test]
    fn cooldown_is_scoped_per_space() {
        let reported = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut history = HashMap::new();
        history.insert(reported, at(11, 58, 0)); // 2 minutes ago

        assert!(can_report_space(other, &history, at(12, 0, 0), COOLDOWN).is_allowed());
    }

    #[test]
    fn under_daily_limit_is_allowed() {
        assert!(can_report_today(9, at(8, 0, 0), at(12, 0, 0), DAILY_LIMIT));
    }

    #[test]
    fn at_daily_limit_is_blocked() {
        assert!(!can_report_today(10, at(8, 0, 0), at(12, 0, 0), DAILY_LIMIT));
    }

    #[test]
    fn day_boundary_resets_even_from_the_cap() {
        let yesterday = Utc.with_ymd_and_hms(2025, 6, 9, 23, 59, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2025, 6, 10, 0, 1, 0).unwrap();

        assert!(needs_daily_reset(yesterday, today));
        assert!(can_report_today(10, yesterday, today, DAILY_LIMIT));
    }

    #[test]
    fn same_day_is_not_a_reset() {
        assert!(!needs_daily_reset(at(0, 0, 1), at(23, 59, 59)));
    }
}
