//! Review handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fleet_core::domain::Review;
use fleet_core::service::ReviewUpdate;
use fleet_shared::dto::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn review_response(review: &Review) -> ReviewResponse {
    ReviewResponse {
        id: review.id,
        user_id: review.user_id,
        booking_id: review.booking_id,
        vehicle_id: review.vehicle_id,
        rating: review.rating,
        comment: review.comment.clone(),
        created_at: review.created_at.to_rfc3339(),
    }
}

/// POST /api/reviews - only the booking holder may review it.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateReviewRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let review = state
        .reviews
        .create(
            identity.user_id,
            req.booking_id,
            req.vehicle_id,
            req.rating,
            req.comment,
        )
        .await?;

    Ok(HttpResponse::Created().json(review_response(&review)))
}

/// GET /api/reviews/vehicle/{vehicle_id} - public.
pub async fn list_for_vehicle(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let reviews = state.reviews.list_for_vehicle(path.into_inner()).await?;

    let body: Vec<ReviewResponse> = reviews.iter().map(review_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/reviews/{id} - author only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReviewRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let review = state
        .reviews
        .update(
            identity.user_id,
            path.into_inner(),
            ReviewUpdate {
                rating: req.rating,
                comment: req.comment,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(review_response(&review)))
}

/// DELETE /api/reviews/{id} - author, or an admin.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .reviews
        .delete(identity.user_id, identity.role, path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
