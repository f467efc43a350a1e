/// Occupancy report handlers - HTTP endpoints for report submission
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::models::OccupancyLevel;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::ReportingService;

/// Request body for submitting an occupancy report
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub space_id: Uuid,
    pub occupancy_level: OccupancyLevel,
}

/// Submit an occupancy report for a space
pub async fn submit_report(
    service: web::Data<ReportingService>,
    requester: AuthenticatedUser,
    req: web::Json<SubmitReportRequest>,
) -> Result<HttpResponse> {
    let report = service
        .submit_report(requester.id, req.space_id, req.occupancy_level)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Report submitted",
        "report": report,
    })))
}
