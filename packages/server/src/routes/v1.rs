use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/productions", production_routes())
}

fn production_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::production::create_production,
            handlers::production::list_productions
        ))
        .routes(routes!(handlers::production::get_production))
        .routes(routes!(handlers::build::build_feed))
        .routes(routes!(
            handlers::resource::create_resource,
            handlers::resource::update_resource,
            handlers::resource::get_resource
        ))
}

/// Internal task endpoints, driven by the queue runner rather than clients.
pub fn task_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::import::run_import))
}
