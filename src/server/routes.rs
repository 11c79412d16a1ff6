use axum::{
    extract::{RawQuery, State},
    routing::{any, get},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::domain::model::SourceId;

pub fn scrape_path(source: SourceId) -> String {
    format!("/scraper/scrape/{}", source.slug())
}

/// 建立主路由（啟動時建立一次）
pub fn create_router(state: AppState) -> Router {
    let sources: Vec<SourceId> = state.dispatcher.sources().collect();

    let mut router: Router<AppState> = Router::new().route("/", get(handlers::index));

    // 每個已註冊的來源一條 GET 路由
    for source in sources {
        router = router.route(
            &scrape_path(source),
            get(move |State(state): State<AppState>, RawQuery(query): RawQuery| {
                handlers::scrape(state, source, query)
            }),
        );
    }

    router
        // Overpass 透傳，接受任何 method
        .route("/overpass/*path", any(handlers::overpass_proxy))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
