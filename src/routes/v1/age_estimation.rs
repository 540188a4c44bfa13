use axum::extract::DefaultBodyLimit;
use axum::Router;
use axum::routing::post;
use crate::state::age_state::AgeState;
use tower_http::limit::RequestBodyLimitLayer;
use crate::handler::age_handler::{estimate_age, preflight};

pub fn new_age_estimation_route() -> Router<AgeState> {

    let router = Router::new()
        .route("/estimate-age", post(estimate_age).options(preflight))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            250 * 1024 * 1024, /* 250mb */
        ));
    router
}
