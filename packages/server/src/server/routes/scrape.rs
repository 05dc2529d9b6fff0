use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    Json,
};

use crate::common::HandlerResponse;
use crate::domains::notifications::NotificationKind;
use crate::domains::scraping::actions::{
    check_song_status, start_scrape, SongStatusQuery, StartScrapeRequest,
};
use crate::server::app::AppState;

/// POST /scrape-suno-song
///
/// An unreadable body is handled like any other start failure: operators
/// are emailed and the caller gets the `{error}` shape.
pub async fn scrape_suno_song_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<StartScrapeRequest>, JsonRejection>,
) -> HandlerResponse {
    match body {
        Ok(Json(request)) => start_scrape(&state.deps, request).await,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(error = %message, "Unreadable start request body");
            state
                .deps
                .notifier
                .notify(NotificationKind::ScrapeSong, &message, None, None)
                .await;
            HandlerResponse::error(message)
        }
    }
}

/// GET /check-song-status
pub async fn check_song_status_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<SongStatusQuery>,
) -> HandlerResponse {
    check_song_status(&state.deps, query).await
}
