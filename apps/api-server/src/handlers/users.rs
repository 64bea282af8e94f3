//! User directory handlers. Responses never include credential material.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fleet_core::domain::User;
use fleet_shared::dto::UserResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(super) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        location: user.location.clone(),
        phone: user.phone.clone(),
        role: user.role.as_str().to_string(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// GET /api/users - admin only.
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    if !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    let users = state.auth.list_users().await?;

    let body: Vec<UserResponse> = users.iter().map(user_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/{id} - self, or an admin.
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if id != identity.user_id && !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    let user = state.auth.get_user(id).await?;
    Ok(HttpResponse::Ok().json(user_response(&user)))
}
