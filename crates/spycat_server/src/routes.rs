//! Route table.

use crate::handlers;
use crate::middleware::log_requests;
use crate::state::SharedState;
use axum::routing::{get, post, put};
use axum::Router;

pub fn router(state: SharedState) -> Router {
    let cats = Router::new()
        .route("/", get(handlers::list_cats))
        .route("/breeds", get(handlers::list_breeds))
        .route("/:id", get(handlers::get_cat));

    let agency = Router::new()
        .route("/cats", post(handlers::create_cat))
        .route("/cats/:id", axum::routing::delete(handlers::delete_cat))
        .route("/cats/:id/salary", put(handlers::update_salary))
        .route(
            "/missions",
            post(handlers::create_mission).get(handlers::list_missions),
        )
        .route("/missions/free-cats", get(handlers::free_cats))
        .route(
            "/missions/:id",
            get(handlers::get_mission).delete(handlers::delete_mission),
        )
        .route("/missions/:id/assign", post(handlers::assign_cat))
        .route("/missions/:id/unassign", post(handlers::unassign_cat))
        .route("/missions/:id/targets", post(handlers::add_target))
        .route(
            "/missions/:id/targets/:target_id",
            axum::routing::delete(handlers::delete_target),
        );

    let spy_cats = Router::new()
        .route("/:cat_id/mission", get(handlers::cat_mission))
        .route(
            "/:cat_id/mission/targets/:target_id/status",
            put(handlers::update_target_status),
        )
        .route(
            "/:cat_id/mission/targets/:target_id/notes",
            put(handlers::update_target_notes),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1/cats", cats)
        .nest("/api/v1/agency", agency)
        .nest("/api/v1/spy-cats", spy_cats)
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}
