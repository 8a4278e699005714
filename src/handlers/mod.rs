pub mod admin_handler;
pub mod health_handler;
pub mod learning_handler;
pub mod profile_handler;

use actix_web::web;

use crate::errors::AppError;

pub use admin_handler::{
    admin_delete_roadmap, admin_feedback, admin_login, admin_roadmaps, admin_stats, admin_users,
};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use learning_handler::{chat_node, get_quiz, get_resources, get_roadmap};
pub use profile_handler::{
    delete_resource, delete_roadmap, leaderboard, my_roadmaps, recommendations, save_resource,
    save_roadmap, saved_resources, submit_progress, sync_guest_data,
};

/// Registers every route. Malformed query strings and bodies are reported in
/// the same `{error}` shape as service failures.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(health_check)
    .service(health_check_ready)
    .service(health_check_live)
    .service(get_roadmap)
    .service(get_quiz)
    .service(get_resources)
    .service(chat_node)
    .service(save_roadmap)
    .service(save_resource)
    .service(submit_progress)
    .service(leaderboard)
    .service(recommendations)
    .service(my_roadmaps)
    .service(saved_resources)
    .service(delete_roadmap)
    .service(delete_resource)
    .service(sync_guest_data)
    .service(admin_login)
    .service(admin_stats)
    .service(admin_roadmaps)
    .service(admin_feedback)
    .service(admin_users)
    .service(admin_delete_roadmap);
}
