use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::AuthResponse,
    },
};

#[post("/api/auth/register")]
pub async fn register(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;
    let token = state.jwt_service.create_token(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user_name: user.user_name,
    }))
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.authenticate(request.into_inner()).await?;
    let token = state.jwt_service.create_token(&user)?;

    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_name: user.user_name,
    }))
}
