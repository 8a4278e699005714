use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::RoadmapMode,
        dto::{
            request::{ChatNodeRequest, QuizQuery, ResourcesQuery, RoadmapQuery},
            response::ChatReply,
        },
    },
};

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(value)
}

#[get("/api/roadmap")]
pub async fn get_roadmap(
    state: web::Data<AppState>,
    query: web::Query<RoadmapQuery>,
) -> Result<HttpResponse, AppError> {
    let raw = required(&query.topic, "topic")?;
    let topic = state.topic_service.resolve(raw).await;
    let mode = RoadmapMode::parse(query.mode.as_deref());

    let roadmap = state.roadmap_service.get_roadmap(&topic, mode).await;
    Ok(HttpResponse::Ok().json(roadmap))
}

#[get("/api/quiz")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    query: web::Query<QuizQuery>,
) -> Result<HttpResponse, AppError> {
    let sub_topic = required(&query.sub_topic, "sub_topic")?;
    let main_topic = match query.main_topic.trim() {
        "" => sub_topic,
        main => main,
    };

    let questions = state
        .quiz_service
        .get_quiz(main_topic, sub_topic, query.num, &query.prior_topics())
        .await;
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/api/resources")]
pub async fn get_resources(
    state: web::Data<AppState>,
    query: web::Query<ResourcesQuery>,
) -> Result<HttpResponse, AppError> {
    let raw = required(&query.topic, "topic")?;
    let topic = state.topic_service.resolve(raw).await;
    let mode = RoadmapMode::parse(query.mode.as_deref());

    let bundle = state.resource_service.get_resources(&topic, mode).await;
    Ok(HttpResponse::Ok().json(bundle))
}

#[post("/api/chat_node")]
pub async fn chat_node(
    state: web::Data<AppState>,
    request: web::Json<ChatNodeRequest>,
) -> Result<HttpResponse, AppError> {
    let reply = state.tutor_service.chat_node(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ChatReply { reply }))
}
