use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// How full a space currently is, as reported by users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum OccupancyLevel {
    Empty,
    Low,
    Medium,
    High,
    Full,
}

/// Rating lifecycle state; deletion flips to Inactive instead of
/// removing the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum RatingStatus {
    Active,
    Inactive,
}

/// Requester role forwarded by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// One occupancy submission. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OccupancyReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub space_id: Uuid,
    pub occupancy_level: OccupancyLevel,
    pub submitted_at: DateTime<Utc>,
}

/// A user's rating of a space. At most one active rating exists per
/// (user, space); re-rating overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub space_id: Uuid,
    pub user_id: Uuid,
    pub score: i16,
    pub comment: String,
    pub status: RatingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The rate-limit bookkeeping slice of a user record.
///
/// `last_report_by_space` holds this user's most recent report instant
/// per space; `reports_today` counts accepted reports since the
/// calendar day of `last_daily_reset_at` began.
#[derive(Debug, Clone)]
pub struct UserReportState {
    pub user_id: Uuid,
    pub reports_today: i32,
    pub last_daily_reset_at: DateTime<Utc>,
    pub last_report_by_space: HashMap<Uuid, DateTime<Utc>>,
}

/// The aggregate slice of a space record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpaceAggregate {
    pub id: Uuid,
    pub name: String,
    pub average_rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_level_serializes_lowercase() {
        let json = serde_json::to_string(&OccupancyLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");

        let parsed: OccupancyLevel = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(parsed, OccupancyLevel::Full);
    }

    #[test]
    fn unknown_occupancy_level_is_rejected() {
        let parsed: std::result::Result<OccupancyLevel, _> =
            serde_json::from_str("\"packed\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn role_defaults_and_parses() {
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(admin.is_admin());

        let user: Role = serde_json::from_str("\"user\"").unwrap();
        assert!(!user.is_admin());
    }
}
