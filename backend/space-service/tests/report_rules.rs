//! End-to-end exercise of the report rate-limit rules through the
//! public API, driving a user's report state the same way the submit
//! flow does (reset, daily gate, cooldown gate, counter update) at
//! fixed instants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use space_service::domain::models::UserReportState;
use space_service::services::abuse_guard::{self, SpaceDecision};

const COOLDOWN_MINUTES: i64 = 15;
const DAILY_LIMIT: i32 = 10;

#[derive(Debug, PartialEq)]
enum Outcome {
    Accepted,
    DailyLimit,
    Cooldown { retry_after_minutes: i64 },
}

/// The submit sequence from ReportingService, minus persistence:
/// lazy reset, daily gate, cooldown gate, then counter bookkeeping.
fn submit(state: &mut UserReportState, space_id: Uuid, now: DateTime<Utc>) -> Outcome {
    if abuse_guard::needs_daily_reset(state.last_daily_reset_at, now) {
        state.reports_today = 0;
        state.last_daily_reset_at = now;
    }

    if !abuse_guard::can_report_today(
        state.reports_today,
        state.last_daily_reset_at,
        now,
        DAILY_LIMIT,
    ) {
        return Outcome::DailyLimit;
    }

    match abuse_guard::can_report_space(
        space_id,
        &state.last_report_by_space,
        now,
        COOLDOWN_MINUTES,
    ) {
        SpaceDecision::Cooldown { retry_after_minutes } => {
            Outcome::Cooldown { retry_after_minutes }
        }
        SpaceDecision::Allowed => {
            state.last_report_by_space.insert(space_id, now);
            state.reports_today += 1;
            Outcome::Accepted
        }
    }
}

fn fresh_state(at: DateTime<Utc>) -> UserReportState {
    UserReportState {
        user_id: Uuid::new_v4(),
        reports_today: 0,
        last_daily_reset_at: at,
        last_report_by_space: Default::default(),
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap()
}

#[test]
fn report_then_retry_then_wait_out_the_cooldown() {
    let space = Uuid::new_v4();
    let mut state = fresh_state(t0());

    // t=0: accepted, counters move
    assert_eq!(submit(&mut state, space, t0()), Outcome::Accepted);
    assert_eq!(state.reports_today, 1);
    assert_eq!(state.last_report_by_space[&space], t0());

    // t=5min: denied, 10 minutes left
    assert_eq!(
        submit(&mut state, space, t0() + Duration::minutes(5)),
        Outcome::Cooldown {
            retry_after_minutes: 10
        }
    );
    // denial left the counters untouched
    assert_eq!(state.reports_today, 1);

    // t=16min: accepted again
    assert_eq!(
        submit(&mut state, space, t0() + Duration::minutes(16)),
        Outcome::Accepted
    );
    assert_eq!(state.reports_today, 2);
}

#[test]
fn cooldown_on_one_space_never_blocks_another() {
    let library = Uuid::new_v4();
    let cafeteria = Uuid::new_v4();
    let mut state = fresh_state(t0());

    assert_eq!(submit(&mut state, library, t0()), Outcome::Accepted);
    assert_eq!(
        submit(&mut state, cafeteria, t0() + Duration::minutes(2)),
        Outcome::Accepted
    );
}

#[test]
fn tenth_report_of_the_day_is_the_last() {
    let mut state = fresh_state(t0());

    for i in 0..DAILY_LIMIT {
        let outcome = submit(
            &mut state,
            Uuid::new_v4(), // distinct spaces, so only the daily gate applies
            t0() + Duration::minutes(i as i64),
        );
        assert_eq!(outcome, Outcome::Accepted);
    }
    assert_eq!(state.reports_today, DAILY_LIMIT);

    assert_eq!(
        submit(
            &mut state,
            Uuid::new_v4(),
            t0() + Duration::minutes(DAILY_LIMIT as i64)
        ),
        Outcome::DailyLimit
    );
}

#[test]
fn daily_gate_is_checked_before_the_cooldown_gate() {
    let space = Uuid::new_v4();
    let mut state = fresh_state(t0());
    state.reports_today = DAILY_LIMIT;
    state.last_report_by_space.insert(space, t0());

    // both gates would deny; the daily one wins
    assert_eq!(
        submit(&mut state, space, t0() + Duration::minutes(1)),
        Outcome::DailyLimit
    );
}

#[test]
fn capped_user_reports_again_after_midnight() {
    let space = Uuid::new_v4();
    let late_evening = Utc.with_ymd_and_hms(2025, 6, 10, 23, 50, 0).unwrap();
    let past_midnight = Utc.with_ymd_and_hms(2025, 6, 11, 0, 10, 0).unwrap();

    let mut state = fresh_state(late_evening);
    state.reports_today = DAILY_LIMIT;

    assert_eq!(submit(&mut state, space, late_evening), Outcome::DailyLimit);

    assert_eq!(submit(&mut state, space, past_midnight), Outcome::Accepted);
    assert_eq!(state.reports_today, 1);
    assert_eq!(state.last_daily_reset_at, past_midnight);
}
