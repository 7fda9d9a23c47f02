use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{categories, events, health_check, questions, users};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route("/users", get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_profile).patch(users::update_profile),
        )
        .route("/organizers", get(users::list_organizers))
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/search/:query", get(events::search_events))
        .route(
            "/events/organizer/:organizer_id",
            get(events::list_events_by_organizer),
        )
        // Questions
        .route(
            "/events/:id/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/questions/:id",
            patch(questions::update_question).delete(questions::delete_question),
        )
        .route(
            "/questions/:id/upvote",
            post(questions::upvote_question).delete(questions::remove_vote),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}
