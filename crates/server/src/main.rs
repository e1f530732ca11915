use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use scorebook::export::EXPORT_FILENAME;
use serde::Deserialize;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        MatchEvent, MatchSnapshot, RecordActionRequest, SetLog, TaxonomyCategory, TeamsView,
        UpdateTeamsRequest,
    },
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{build_session, load_settings};

const MAX_REQUEST_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

#[derive(Debug, Deserialize)]
struct SetLogQuery {
    set: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let session = build_session(&settings)?;
    info!(match_id = %session.match_id().0, "match session ready");

    let app = build_router(Arc::new(AppState::new(session)));

    let addr = parse_bind_addr(&settings.server_bind)?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_bind_addr(raw: &str) -> anyhow::Result<SocketAddr> {
    raw.parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/taxonomy", get(http_taxonomy))
        .route("/match", get(http_snapshot))
        .route("/match/log", get(http_set_log))
        .route("/match/actions", post(http_record_action))
        .route("/match/undo", post(http_undo))
        .route("/match/sets/end", post(http_end_set))
        .route("/match/teams", get(http_teams).put(http_update_teams))
        .route("/match/export.csv", get(http_export))
        .route("/ws", get(ws_handler))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state)
}

fn http_error(error: ApiError) -> HttpError {
    let status = match error.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_taxonomy(State(state): State<Arc<AppState>>) -> Json<Vec<TaxonomyCategory>> {
    let session = state.session.lock().await;
    Json(session.taxonomy().listing())
}

async fn http_snapshot(State(state): State<Arc<AppState>>) -> Json<MatchSnapshot> {
    let session = state.session.lock().await;
    Json(session.snapshot())
}

async fn http_set_log(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SetLogQuery>,
) -> Result<Json<SetLog>, HttpError> {
    let session = state.session.lock().await;
    let log = session
        .set_log(q.set)
        .map_err(|e| http_error(e.into()))?;
    Ok(Json(log))
}

async fn http_record_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordActionRequest>,
) -> Result<Json<MatchEvent>, HttpError> {
    let event = {
        let mut session = state.session.lock().await;
        scorebook::record_action(&mut session, &req).map_err(http_error)?
    };
    state.publish(&event);
    Ok(Json(event))
}

async fn http_undo(State(state): State<Arc<AppState>>) -> Result<Json<MatchEvent>, HttpError> {
    let event = {
        let mut session = state.session.lock().await;
        scorebook::undo_last(&mut session).map_err(http_error)?
    };
    state.publish(&event);
    Ok(Json(event))
}

async fn http_end_set(State(state): State<Arc<AppState>>) -> Json<MatchEvent> {
    let event = {
        let mut session = state.session.lock().await;
        scorebook::end_set(&mut session)
    };
    state.publish(&event);
    Json(event)
}

async fn http_teams(State(state): State<Arc<AppState>>) -> Json<TeamsView> {
    let session = state.session.lock().await;
    Json(session.teams().view())
}

async fn http_update_teams(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateTeamsRequest>,
) -> Result<Json<MatchEvent>, HttpError> {
    let event = {
        let mut session = state.session.lock().await;
        scorebook::update_teams(&mut session, &req).map_err(http_error)?
    };
    state.publish(&event);
    Ok(Json(event))
}

async fn http_export(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, HttpError> {
    let csv = {
        let session = state.session.lock().await;
        session.export_csv().map_err(|e| http_error(e.into()))?
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{EXPORT_FILENAME}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((StatusCode::OK, headers, csv))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, socket: axum::extract::ws::WebSocket) {
    use axum::extract::ws::Message;
    use futures::{SinkExt, StreamExt};
    use tokio::sync::broadcast::error::RecvError;

    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.events.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            let event = match events_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
