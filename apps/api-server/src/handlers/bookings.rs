//! Booking lifecycle handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fleet_core::domain::Booking;
use fleet_shared::dto::{BookingResponse, CreateBookingRequest, UpdateBookingRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn booking_response(booking: &Booking) -> BookingResponse {
    BookingResponse {
        id: booking.id,
        vehicle_id: booking.vehicle_id,
        user_id: booking.user_id,
        duration_days: booking.duration_days,
        booked_at: booking.booked_at.to_rfc3339(),
        end_time: booking.end_time.to_rfc3339(),
        completed: booking.completed,
    }
}

/// POST /api/bookings
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBookingRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let booking = state
        .bookings
        .create(req.vehicle_id, identity.user_id, req.duration_days)
        .await?;

    Ok(HttpResponse::Created().json(booking_response(&booking)))
}

/// GET /api/bookings - the caller's bookings.
pub async fn list_mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let bookings = state.bookings.list_for_user(identity.user_id).await?;

    let body: Vec<BookingResponse> = bookings.iter().map(booking_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/bookings/all - admin only.
pub async fn list_all(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    if !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    let bookings = state.bookings.list_all().await?;

    let body: Vec<BookingResponse> = bookings.iter().map(booking_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/bookings/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let booking = state.bookings.get(path.into_inner()).await?;
    if booking.user_id != identity.user_id && !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(booking_response(&booking)))
}

/// PUT /api/bookings/{id} - change the duration; the end time is
/// recomputed from the original booking instant.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBookingRequest>,
) -> AppResult<HttpResponse> {
    let booking = state
        .bookings
        .update(path.into_inner(), identity.user_id, body.duration_days)
        .await?;

    Ok(HttpResponse::Ok().json(booking_response(&booking)))
}

/// DELETE /api/bookings/{id} - cancel; the vehicle becomes available again.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .bookings
        .delete(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
