use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{dev::ServiceResponse, http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use studymate_server::{
    app_state::{AppState, Collaborators, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    handlers,
    services::{
        model_service::{CompletionClient, CompletionRequest},
        search_client::{SearchHit, WebSearchClient},
        youtube_client::{VideoDetails, VideoSearchClient},
    },
};

/// Replies with a fixed text, or fails when `reply` is `None`.
struct ScriptedModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedModel {
    async fn complete(&self, _request: CompletionRequest) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AppError::Upstream("model unavailable".to_string()))
    }
}

struct NoVideos;

#[async_trait]
impl VideoSearchClient for NoVideos {
    async fn search_ids(&self, _query: &str, _max_results: u32) -> AppResult<Vec<String>> {
        Err(AppError::Upstream("quota exceeded".to_string()))
    }

    async fn video_details(&self, _ids: &[String]) -> AppResult<Vec<VideoDetails>> {
        Ok(Vec::new())
    }
}

struct StaticSearch;

#[async_trait]
impl WebSearchClient for StaticSearch {
    async fn search(&self, query: &str, _max_results: usize) -> AppResult<Vec<SearchHit>> {
        let url = if query.contains("filetype:pdf") {
            "https://notes.example.edu/handout.pdf"
        } else {
            "https://www.geeksforgeeks.org/intro/"
        };
        Ok(vec![SearchHit {
            title: format!("Result for {}", query),
            url: url.to_string(),
            snippet: String::new(),
        }])
    }
}

fn state_with(model: Arc<ScriptedModel>) -> AppState {
    AppState::from_parts(
        Config::test_config(),
        Repositories::in_memory(),
        Collaborators {
            completion: model,
            videos: Arc::new(NoVideos),
            search: Arc::new(StaticSearch),
        },
        None,
    )
}

async fn json_body(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn roadmap_falls_back_when_model_fails() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::get()
        .uri("/api/roadmap?topic=quantum%20computing")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    assert_eq!(body["topic"], "Quantum Computing");
    assert_eq!(body["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(body["nodes"][0]["label"], "Quantum Computing Basics");
}

#[actix_web::test]
async fn saved_generated_roadmap_is_served_from_store() {
    let model = ScriptedModel::replying(r#"{"nodes": [{"id": "1", "label": "Ownership"}]}"#);
    let app = app!(state_with(model.clone()));

    for topic in ["rust", "%20%20RUST%20"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/roadmap?topic={}", topic))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["nodes"][0]["label"], "Ownership");
    }

    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn missing_topic_is_reported_in_error_body() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::get().uri("/api/roadmap").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("topic is required"));
}

#[actix_web::test]
async fn quiz_is_never_empty() {
    let app = app!(state_with(ScriptedModel::replying("no json here")));

    let req = test::TestRequest::get()
        .uri("/api/quiz?main_topic=Python&sub_topic=Loops&history=Variables,Types")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    let questions = body.as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert!(questions[0]["options"].as_array().unwrap().len() >= 2);
}

#[actix_web::test]
async fn resources_survive_video_outage() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::get()
        .uri("/api/resources?topic=sql")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    assert_eq!(body["videos"], json!([]));
    assert_eq!(body["articles"][0]["type"], "article");
    assert_eq!(body["pdfs"][0]["url"], "https://notes.example.edu/handout.pdf");
}

#[actix_web::test]
async fn progress_accumulates_on_leaderboard() {
    let app = app!(state_with(ScriptedModel::failing()));

    for score in [5, 7] {
        let req = test::TestRequest::post()
            .uri("/api/submit_progress")
            .set_json(json!({
                "user_id": "u1",
                "topic": "sql",
                "node_label": "Joins",
                "score": score,
                "feedback": "really helpful",
                "username": "Ada"
            }))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["message"], "Score Saved");
    }

    let req = test::TestRequest::get().uri("/api/leaderboard").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body[0]["user_id"], "u1");
    assert_eq!(body[0]["full_name"], "Ada");
    assert_eq!(body[0]["score"], 12);
}

#[actix_web::test]
async fn malformed_json_body_uses_error_shape() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::post()
        .uri("/api/save_roadmap")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_body(resp).await.get("error").is_some());
}

#[actix_web::test]
async fn saved_library_round_trip() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::post()
        .uri("/api/save_roadmap")
        .set_json(json!({
            "user_id": "u1",
            "topic": "rust",
            "graph_data": {"nodes": [{"id": "1", "label": "Ownership"}]}
        }))
        .to_request();
    assert_eq!(json_body(test::call_service(&app, req).await).await["message"], "Roadmap saved");

    let req = test::TestRequest::post()
        .uri("/api/save_resource")
        .set_json(json!({
            "user_id": "u1",
            "roadmap_topic": "rust",
            "node_label": "Ownership",
            "resource_type": "video",
            "title": "Ownership explained",
            "url": "https://www.youtube.com/watch?v=abc"
        }))
        .to_request();
    assert_eq!(json_body(test::call_service(&app, req).await).await["message"], "Resource saved");

    let req = test::TestRequest::get().uri("/api/my_roadmaps?user_id=u1").to_request();
    let roadmaps = json_body(test::call_service(&app, req).await).await;
    assert_eq!(roadmaps[0]["topic"], "Rust");

    let req = test::TestRequest::get().uri("/api/saved_resources?user_id=u1").to_request();
    let resources = json_body(test::call_service(&app, req).await).await;
    let id = resources[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/delete_resource?id={}", id))
        .to_request();
    assert_eq!(json_body(test::call_service(&app, req).await).await["message"], "Resource deleted");

    let req = test::TestRequest::delete()
        .uri("/api/delete_roadmap?user_id=u1&topic=rust")
        .to_request();
    assert_eq!(json_body(test::call_service(&app, req).await).await["message"], "Roadmap deleted");

    let req = test::TestRequest::delete()
        .uri("/api/delete_roadmap?user_id=u1&topic=rust")
        .to_request();
    assert!(json_body(test::call_service(&app, req).await).await.get("error").is_some());
}

#[actix_web::test]
async fn recommendations_skip_callers_own_urls() {
    let app = app!(state_with(ScriptedModel::failing()));

    for (user, url) in [
        ("me", "https://shared.dev"),
        ("peer", "https://shared.dev"),
        ("peer", "https://new.dev"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/save_resource")
            .set_json(json!({
                "user_id": user,
                "roadmap_topic": "rust",
                "node_label": "Traits",
                "resource_type": "article",
                "title": url,
                "url": url
            }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/recommendations?user_id=me").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    let urls: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["url"].as_str())
        .collect();
    assert_eq!(urls, vec!["https://new.dev"]);
}

#[actix_web::test]
async fn admin_login_rejects_bad_credentials_with_401() {
    let app = app!(state_with(ScriptedModel::failing()));
    let email = Config::test_config().admin_email;

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({"email": email, "password": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(json_body(resp).await.get("error").is_some());

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({"email": email, "password": "test-admin-password"}))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn admin_stats_and_topic_delete() {
    let model = ScriptedModel::replying(r#"{"nodes": [{"id": "1", "label": "Intro"}]}"#);
    let app = app!(state_with(model));

    let req = test::TestRequest::get().uri("/api/roadmap?topic=go").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
    let stats = json_body(test::call_service(&app, req).await).await;
    assert_eq!(stats["roadmaps"], 1);

    let req = test::TestRequest::delete()
        .uri("/api/admin/delete_roadmap?topic=go")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["message"], "Deleted 1 roadmap(s)");

    let req = test::TestRequest::get().uri("/api/admin/roadmaps").to_request();
    assert_eq!(json_body(test::call_service(&app, req).await).await, json!([]));
}

#[actix_web::test]
async fn tutor_chat_falls_back_gracefully() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::post()
        .uri("/api/chat_node")
        .set_json(json!({
            "topic": "Rust",
            "node_label": "Lifetimes",
            "message": "Why do I need 'a here?",
            "history": []
        }))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert!(body["reply"].as_str().unwrap().contains("try again"));
}

#[actix_web::test]
async fn readiness_reports_memory_storage() {
    let app = app!(state_with(ScriptedModel::failing()));

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["dependencies"]["storage"], "memory");
}
