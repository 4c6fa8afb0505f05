use crate::api::handlers::{auth, tasks};
use crate::auth::middleware::auth_middleware;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route(
            "/api/v1/todo",
            post(tasks::create_task)
                .get(tasks::list_tasks)
                .put(tasks::update_task),
        )
        .route(
            "/api/v1/todo/{id}",
            get(tasks::get_task).delete(tasks::delete_task),
        )
        .route("/api/v1/me", get(tasks::me))
        .layer(middleware::from_fn_with_state(
            state.token_codec.clone(),
            auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
