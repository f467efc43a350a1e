/// Rating handlers - HTTP endpoints for space ratings
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::services::RatingService;

/// Request body for creating or overwriting a rating
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub score: i16,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Request body for partially updating a rating
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub score: Option<i16>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create or overwrite the requester's rating for a space
pub async fn upsert_rating(
    service: web::Data<RatingService>,
    space_id: web::Path<Uuid>,
    requester: AuthenticatedUser,
    req: web::Json<UpsertRatingRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (rating, average_rating, created) = service
        .upsert_rating(requester.id, *space_id, req.score, req.comment.clone())
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": if created { "Rating created" } else { "Rating updated" },
        "rating": rating,
        "average_rating": average_rating,
        "created": created,
    })))
}

/// Update a rating's score and/or comment
pub async fn update_rating(
    service: web::Data<RatingService>,
    rating_id: web::Path<Uuid>,
    requester: AuthenticatedUser,
    req: web::Json<UpdateRatingRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (rating, average_rating) = service
        .update_rating(
            requester.id,
            requester.role,
            *rating_id,
            req.score,
            req.comment.clone(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Rating updated",
        "rating": rating,
        "average_rating": average_rating,
    })))
}

/// Soft-delete a rating
pub async fn delete_rating(
    service: web::Data<RatingService>,
    rating_id: web::Path<Uuid>,
    requester: AuthenticatedUser,
) -> Result<HttpResponse> {
    let average_rating = service
        .delete_rating(requester.id, requester.role, *rating_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Rating deleted",
        "average_rating": average_rating,
    })))
}

/// Active ratings for a space, newest first
pub async fn list_space_ratings(
    service: web::Data<RatingService>,
    space_id: web::Path<Uuid>,
    _requester: AuthenticatedUser,
) -> Result<HttpResponse> {
    let ratings = service.list_by_space(*space_id).await?;
    Ok(HttpResponse::Ok().json(ratings))
}

/// Active ratings left by a user, newest first
pub async fn list_user_ratings(
    service: web::Data<RatingService>,
    user_id: web::Path<Uuid>,
    _requester: AuthenticatedUser,
) -> Result<HttpResponse> {
    let ratings = service.list_by_user(*user_id).await?;
    Ok(HttpResponse::Ok().json(ratings))
}

/// All ratings regardless of status. Admin only.
pub async fn list_all_ratings(
    service: web::Data<RatingService>,
    requester: AuthenticatedUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    if !requester.role.is_admin() {
        return Err(AppError::Forbidden(
            "listing all ratings requires the admin role".to_string(),
        ));
    }

    let ratings = service.list_all(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(ratings))
}
