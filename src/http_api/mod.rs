use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::exchange::INVALID_FILE_MESSAGE;
use crate::{
    ArchiveEntry, Grid, MemorySlotStore, StateRepository, TimeSlot, Timetable, TimetableConfig,
    TimetableDocument, TimetableError,
};

#[derive(Clone)]
pub struct AppState {
    timetable: Arc<RwLock<Timetable>>,
    repository: Arc<StateRepository>,
}

impl AppState {
    pub fn new(timetable: Timetable, repository: StateRepository) -> Self {
        Self {
            timetable: Arc::new(RwLock::new(timetable)),
            repository: Arc::new(repository),
        }
    }

    /// State backed by an in-process slot, for tests and throwaway servers.
    pub fn in_memory(timetable: Timetable) -> Self {
        let repository = StateRepository::new(
            Box::new(MemorySlotStore::new()),
            crate::config::DEFAULT_STORAGE_KEY,
        );
        Self::new(timetable, repository)
    }

    fn timetable(&self) -> Arc<RwLock<Timetable>> {
        self.timetable.clone()
    }

    // Saves are fire-and-forget: a failed write is logged, the request still succeeds.
    fn persist(&self, timetable: &Timetable) {
        if let Err(err) = self.repository.save(&timetable.to_state()) {
            error!(error = %err, "failed to persist timetable");
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<TimetableError> for ApiError {
    fn from(value: TimetableError) -> Self {
        match value {
            TimetableError::Archive(err) => ApiError::NotFound(err.to_string()),
            TimetableError::Grid(err) => ApiError::NotFound(err.to_string()),
            TimetableError::Exchange(_) => ApiError::Invalid(INVALID_FILE_MESSAGE.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimetableView {
    pub config: TimetableConfig,
    pub days: Vec<String>,
    pub times: Vec<TimeSlot>,
    pub grid: Grid,
    pub archived_weeks: usize,
}

impl From<&Timetable> for TimetableView {
    fn from(timetable: &Timetable) -> Self {
        Self {
            config: timetable.config().clone(),
            days: timetable.days().to_vec(),
            times: timetable.times().to_vec(),
            grid: timetable.grid().clone(),
            archived_weeks: timetable.archive().len(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CellPayload {
    day: String,
    time: TimeSlot,
    content: String,
}

#[derive(Debug, Deserialize)]
struct DayPayload {
    day: String,
}

#[derive(Debug, Deserialize)]
struct TimePayload {
    time: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/timetable", get(get_timetable))
        .route("/cells", put(update_cell))
        .route("/days", post(create_day))
        .route("/days/:day", delete(delete_day))
        .route("/times", post(create_time))
        .route("/config", put(update_config))
        .route("/weeks", post(start_new_week))
        .route("/archive", get(list_archive))
        .route("/archive/:index", delete(delete_archive_entry))
        .route("/archive/:index/restore", post(restore_archive_entry))
        .route("/export/json", get(export_json))
        .route("/export/csv", get(export_csv))
        .route("/import", post(import_json))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_timetable(State(state): State<AppState>) -> Json<TimetableView> {
    let timetable = state.timetable();
    let view = TimetableView::from(&*timetable.read());
    Json(view)
}

async fn update_cell(
    State(state): State<AppState>,
    Json(payload): Json<CellPayload>,
) -> Result<Json<TimetableView>, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    guard.set_cell(&payload.day, &payload.time, payload.content)?;
    state.persist(&guard);
    Ok(Json(TimetableView::from(&*guard)))
}

async fn create_day(
    State(state): State<AppState>,
    Json(payload): Json<DayPayload>,
) -> Result<(StatusCode, Json<TimetableView>), ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    if payload.day.trim().is_empty() {
        return Err(ApiError::invalid("day label must not be blank"));
    }
    if !guard.add_day(&payload.day) {
        return Err(ApiError::Conflict(format!(
            "day '{}' already exists",
            payload.day.trim()
        )));
    }
    state.persist(&guard);
    Ok((StatusCode::CREATED, Json(TimetableView::from(&*guard))))
}

async fn delete_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<StatusCode, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    if !guard.remove_day(&day) {
        return Err(ApiError::not_found(format!("day '{day}' not found")));
    }
    state.persist(&guard);
    Ok(StatusCode::NO_CONTENT)
}

async fn create_time(
    State(state): State<AppState>,
    Json(payload): Json<TimePayload>,
) -> Result<(StatusCode, Json<TimetableView>), ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    if !guard.add_time_slot(&payload.time)? {
        return Err(ApiError::Conflict(format!(
            "time slot {} already exists",
            payload.time.trim()
        )));
    }
    state.persist(&guard);
    Ok((StatusCode::CREATED, Json(TimetableView::from(&*guard))))
}

async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<TimetableConfig>,
) -> Result<Json<TimetableView>, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    guard.set_config(config)?;
    state.persist(&guard);
    Ok(Json(TimetableView::from(&*guard)))
}

async fn start_new_week(State(state): State<AppState>) -> (StatusCode, Json<ArchiveEntry>) {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    let entry = guard.new_week().clone();
    state.persist(&guard);
    (StatusCode::CREATED, Json(entry))
}

async fn list_archive(State(state): State<AppState>) -> Json<Vec<ArchiveEntry>> {
    let timetable = state.timetable();
    let entries = timetable.read().archive().entries().to_vec();
    Json(entries)
}

async fn restore_archive_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<TimetableView>, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    guard.restore_archive(index)?;
    state.persist(&guard);
    Ok(Json(TimetableView::from(&*guard)))
}

async fn delete_archive_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    guard.delete_archive(index)?;
    state.persist(&guard);
    Ok(StatusCode::NO_CONTENT)
}

async fn export_json(State(state): State<AppState>) -> Json<TimetableDocument> {
    let timetable = state.timetable();
    let document = timetable.read().document();
    Json(document)
}

async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let timetable = state.timetable();
    let table = timetable.read().export_table()?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], table).into_response())
}

async fn import_json(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<TimetableView>, ApiError> {
    let timetable = state.timetable();
    let mut guard = timetable.write();
    guard.import_document(&body)?;
    state.persist(&guard);
    Ok(Json(TimetableView::from(&*guard)))
}
