//! Authentication handlers: registration and the two-step OTP login.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use fleet_core::ports::TokenService;
use fleet_core::service::NewUser;
use fleet_shared::dto::{
    AuthResponse, LoginRequest, RegisterRequest, ToggleRoleRequest, VerifyOtpRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::users::user_response;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if req.phone.is_empty() {
        return Err(AppError::BadRequest("Phone is required".to_string()));
    }

    let user = state
        .auth
        .register(NewUser {
            email: req.email,
            password: req.password,
            name: req.name,
            location: req.location,
            phone: req.phone,
        })
        .await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// POST /api/auth/login - first step; dispatches a one-time code.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state.auth.initiate_login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Code sent. Submit it to complete the login."
    })))
}

/// POST /api/auth/verify-otp - second step; returns the session token.
pub async fn verify_otp(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<VerifyOtpRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let token = state.auth.complete_login(&req.email, req.code).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/auth/toggle-role - password-gated user/host switch.
pub async fn toggle_role(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<ToggleRoleRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let token = state.auth.toggle_role(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}
