use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{AnswerRequest, CreateSessionParams},
        response::CreatedSessionResponse,
    },
};

#[post("/api/sessions")]
pub async fn create_session(
    state: web::Data<Arc<AppState>>,
    params: web::Query<CreateSessionParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_id = auth.user_id()?;
    let session = state
        .test_session_service
        .create_session(user_id, params.include_integers)
        .await?;

    Ok(HttpResponse::Created().json(CreatedSessionResponse::from(&session)))
}

#[get("/api/sessions/{session_id}/problems/{idx}")]
pub async fn get_problem(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(i64, i64)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (session_id, idx) = path.into_inner();
    let problem = state
        .test_session_service
        .fetch_problem_at_index(session_id, idx, auth.user_id()?)
        .await?;

    Ok(HttpResponse::Ok().json(problem))
}

#[post("/api/sessions/{session_id}/problems/{idx}/answer")]
pub async fn submit_answer(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(i64, i64)>,
    request: web::Json<AnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (session_id, idx) = path.into_inner();
    state
        .test_session_service
        .submit_answer(session_id, idx, auth.user_id()?, request.selected_choice_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
