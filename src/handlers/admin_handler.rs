use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{AdminLoginRequest, AdminTopicQuery},
        response::{AdminLoginResponse, MessageResponse},
    },
};

#[post("/api/admin/login")]
pub async fn admin_login(
    state: web::Data<AppState>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .admin_service
        .login(&request.email, &request.password)?;
    Ok(HttpResponse::Ok().json(AdminLoginResponse { success: true }))
}

#[get("/api/admin/stats")]
pub async fn admin_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.admin_service.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/api/admin/roadmaps")]
pub async fn admin_roadmaps(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let roadmaps = state.admin_service.roadmaps().await?;
    Ok(HttpResponse::Ok().json(roadmaps))
}

#[get("/api/admin/feedback")]
pub async fn admin_feedback(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let feedback = state.admin_service.feedback().await?;
    Ok(HttpResponse::Ok().json(feedback))
}

#[get("/api/admin/users")]
pub async fn admin_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.admin_service.users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[delete("/api/admin/delete_roadmap")]
pub async fn admin_delete_roadmap(
    state: web::Data<AppState>,
    query: web::Query<AdminTopicQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let deleted = state.admin_service.delete_roadmap(&query.topic).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Deleted {} roadmap(s)",
        deleted
    ))))
}
