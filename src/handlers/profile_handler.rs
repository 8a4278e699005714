use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{
            DeleteResourceQuery, DeleteRoadmapQuery, SaveResourceRequest, SaveRoadmapRequest,
            SubmitProgressRequest, SyncGuestDataRequest, UserQuery,
        },
        response::MessageResponse,
    },
};

#[post("/api/save_roadmap")]
pub async fn save_roadmap(
    state: web::Data<AppState>,
    request: web::Json<SaveRoadmapRequest>,
) -> Result<HttpResponse, AppError> {
    state.library_service.save_roadmap(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Roadmap saved")))
}

#[post("/api/save_resource")]
pub async fn save_resource(
    state: web::Data<AppState>,
    request: web::Json<SaveResourceRequest>,
) -> Result<HttpResponse, AppError> {
    state.library_service.save_resource(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Resource saved")))
}

#[post("/api/submit_progress")]
pub async fn submit_progress(
    state: web::Data<AppState>,
    request: web::Json<SubmitProgressRequest>,
) -> Result<HttpResponse, AppError> {
    state.progress_service.submit_progress(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Score Saved")))
}

#[get("/api/leaderboard")]
pub async fn leaderboard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let entries = state.progress_service.leaderboard().await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/api/recommendations")]
pub async fn recommendations(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let recommendations = state.library_service.recommendations(&query.user_id).await?;
    Ok(HttpResponse::Ok().json(recommendations))
}

#[get("/api/my_roadmaps")]
pub async fn my_roadmaps(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let roadmaps = state.library_service.list_roadmaps(&query.user_id).await?;
    Ok(HttpResponse::Ok().json(roadmaps))
}

#[get("/api/saved_resources")]
pub async fn saved_resources(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let resources = state.library_service.list_saved_resources(&query.user_id).await?;
    Ok(HttpResponse::Ok().json(resources))
}

#[delete("/api/delete_roadmap")]
pub async fn delete_roadmap(
    state: web::Data<AppState>,
    query: web::Query<DeleteRoadmapQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    state
        .library_service
        .delete_roadmap(&query.user_id, &query.topic)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Roadmap deleted")))
}

#[delete("/api/delete_resource")]
pub async fn delete_resource(
    state: web::Data<AppState>,
    query: web::Query<DeleteResourceQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    state.library_service.delete_resource(&query.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Resource deleted")))
}

#[post("/api/sync_guest_data")]
pub async fn sync_guest_data(
    state: web::Data<AppState>,
    request: web::Json<SyncGuestDataRequest>,
) -> Result<HttpResponse, AppError> {
    let summary = state.library_service.sync_guest_data(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
