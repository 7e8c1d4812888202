#![cfg(not(tarpaulin_include))]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::audit::AuditLog;
use crate::config::AppConfig;
use crate::controller::{PageController, Screen};
use crate::loader::{self, DataLoader, SOURCE_SOLICITACOES, SOURCE_USUARIOS};
use crate::query::{Criterion, DateToken, SortDirection};
use crate::session;
use crate::status::{ServiceStatus, ALL_STATUSES};

pub struct AppState {
    loader: DataLoader,
    controllers: Mutex<HashMap<Screen, PageController>>,
    audit: AuditLog,
    config: AppConfig,
}

#[derive(Deserialize)]
struct RecordsQuery {
    page: Option<usize>,
    page_size: Option<usize>,
    sort: Option<String>,
    dir: Option<String>,
    /// Free-text client search.
    q: Option<String>,
    status: Option<String>,
    fotografo: Option<String>,
    /// Relative date token: today / tomorrow / this_week.
    period: Option<String>,
}

#[derive(Deserialize)]
struct StatusUpdate {
    screen: String,
    id: String,
    status: String,
    #[serde(default)]
    token: String,
}

#[derive(Deserialize)]
struct SelectionUpdate {
    screen: String,
    ids: Vec<String>,
    selected: bool,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LogoutRequest {
    token: String,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
    message: Option<String>,
}

impl ApiResponse {
    fn ok() -> Self {
        ApiResponse {
            status: "ok".to_string(),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

/// One entry of the status vocabulary as the filter inputs render it.
#[derive(Serialize)]
struct StatusInfo {
    value: &'static str,
    badge: &'static str,
    color: &'static str,
}

#[derive(Serialize)]
struct LoginResponse {
    status: String,
    token: Option<String>,
    name: Option<String>,
    role: Option<session::Role>,
    message: Option<String>,
}

/// Start the dashboard server.
///
/// # Arguments
/// * `config` - Application configuration; `bind_addr` picks the listen
///   address
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.bind_addr.clone();
    let audit = AuditLog::open(&config.audit_file);
    let loader = DataLoader::new(config.clone());

    let app_state = Arc::new(AppState {
        loader,
        controllers: Mutex::new(HashMap::new()),
        audit,
        config,
    });

    let app = Router::new()
        .route("/", get(serve_landing))
        .route("/api/:screen/records", get(get_records))
        .route("/api/:screen/selection", post(update_selection))
        .route("/api/record/:id", get(get_record))
        .route("/api/record/status", post(update_status))
        .route("/api/stats", get(get_stats))
        .route("/api/references", get(get_references))
        .route("/api/statuses", get(get_statuses))
        .route("/api/reload", post(reload))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("listening on http://{bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/landing.html"))
}

async fn get_records(
    Path(screen_slug): Path<String>,
    Query(params): Query<RecordsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let screen = match Screen::from_slug(&screen_slug) {
        Some(screen) => screen,
        None => {
            return (StatusCode::NOT_FOUND, Json(ApiResponse::error("unknown screen")))
                .into_response()
        }
    };

    let records = match state.loader.load(SOURCE_SOLICITACOES).await {
        Ok(records) => records,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(e.to_string())),
            )
                .into_response()
        }
    };

    let page_size = state.config.ui.items_per_page;
    let mut controllers = state.controllers.lock().unwrap();
    let ctrl = controllers
        .entry(screen)
        .or_insert_with(|| PageController::new(screen, page_size));
    ctrl.set_records(records);

    ctrl.clear_criteria();
    if let Some(q) = params.q.filter(|q| !q.is_empty()) {
        ctrl.set_criterion("Cliente", Criterion::Contains(q));
    }
    if let Some(status) = params.status.filter(|s| !s.is_empty()) {
        ctrl.set_criterion("Status", Criterion::Equals(status));
    }
    if let Some(fotografo) = params.fotografo.filter(|f| !f.is_empty()) {
        ctrl.set_criterion("Fotografo", Criterion::Equals(fotografo));
    }
    if let Some(token) = params.period.as_deref().and_then(DateToken::parse) {
        ctrl.set_criterion("Data do agendamento", Criterion::DateRange(token));
    }
    if let Some(sort_key) = params.sort.filter(|s| !s.is_empty()) {
        let dir = params
            .dir
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Asc);
        ctrl.set_sort(&sort_key, dir);
    }
    if let Some(size) = params.page_size {
        ctrl.set_page_size(size);
    }
    if let Some(page) = params.page {
        ctrl.set_page(page);
    }

    Json(ctrl.view()).into_response()
}

async fn get_record(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.loader.load(SOURCE_SOLICITACOES).await {
        Ok(records) => match records.iter().find(|r| r.id() == Some(id.as_str())) {
            Some(record) => Json(record.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StatusUpdate>,
) -> impl IntoResponse {
    let user = if state.config.auth.enabled {
        match session::validate(&payload.token) {
            Some(session) => session.user,
            None => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiResponse::error("invalid or expired session")),
                )
                    .into_response()
            }
        }
    } else {
        "anonimo".to_string()
    };

    let screen = match Screen::from_slug(&payload.screen) {
        Some(screen) => screen,
        None => {
            return (StatusCode::NOT_FOUND, Json(ApiResponse::error("unknown screen")))
                .into_response()
        }
    };
    let new_status = match ServiceStatus::parse(&payload.status) {
        Some(status) => status,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!(
                    "unknown status '{}'",
                    payload.status
                ))),
            )
                .into_response()
        }
    };

    // Make sure the controller has records before applying the change
    let records = match state.loader.load(SOURCE_SOLICITACOES).await {
        Ok(records) => records,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::error(e.to_string())),
            )
                .into_response()
        }
    };

    let page_size = state.config.ui.items_per_page;
    let mut controllers = state.controllers.lock().unwrap();
    let ctrl = controllers
        .entry(screen)
        .or_insert_with(|| PageController::new(screen, page_size));
    if ctrl.record_count() == 0 {
        ctrl.set_records(records);
    }

    match ctrl.apply_status(&payload.id, new_status, &user, &state.audit) {
        Ok(()) => Json(ApiResponse::ok()).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

async fn update_selection(
    Path(screen_slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectionUpdate>,
) -> impl IntoResponse {
    let screen = match Screen::from_slug(&screen_slug).or_else(|| Screen::from_slug(&payload.screen))
    {
        Some(screen) => screen,
        None => {
            return (StatusCode::NOT_FOUND, Json(ApiResponse::error("unknown screen")))
                .into_response()
        }
    };

    let page_size = state.config.ui.items_per_page;
    let mut controllers = state.controllers.lock().unwrap();
    let ctrl = controllers
        .entry(screen)
        .or_insert_with(|| PageController::new(screen, page_size));
    ctrl.set_selected(&payload.ids, payload.selected);

    Json(ApiResponse::ok()).into_response()
}

async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.loader.load(SOURCE_SOLICITACOES).await {
        Ok(records) => Json(loader::statistics(&records)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

/// The reference sets the screens cross-reference to populate selection
/// inputs (photographer pickers, client/broker/network dropdowns).
async fn get_references(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.loader.load_all().await {
        Ok(data) => Json(data).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

/// The status vocabulary with its badge classes and chip colors.
async fn get_statuses() -> impl IntoResponse {
    let statuses: Vec<StatusInfo> = ALL_STATUSES
        .iter()
        .map(|s| StatusInfo {
            value: s.label(),
            badge: s.badge(),
            color: s.hex_color(),
        })
        .collect();
    Json(statuses)
}

async fn reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.loader.clear_cache();
    Json(ApiResponse::ok())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    session::prune_expired();

    let users = match state.loader.load(SOURCE_USUARIOS).await {
        Ok(users) => users,
        Err(e) => {
            return (
                StatusCode::BAD_GATEWAY,
                Json(LoginResponse {
                    status: "error".to_string(),
                    token: None,
                    name: None,
                    role: None,
                    message: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    };

    match session::login(
        &users,
        &payload.email,
        &payload.password,
        state.config.session_ttl(),
    ) {
        Some((token, sess)) => Json(LoginResponse {
            status: "ok".to_string(),
            token: Some(token),
            name: Some(sess.name),
            role: Some(sess.role),
            message: None,
        })
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                status: "error".to_string(),
                token: None,
                name: None,
                role: None,
                message: Some("invalid credentials".to_string()),
            }),
        )
            .into_response(),
    }
}

async fn logout(Json(payload): Json<LogoutRequest>) -> impl IntoResponse {
    session::logout(&payload.token);
    Json(ApiResponse::ok())
}
