use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{EventForm, Mutation},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod demo;
mod page;

use app_state::AppState;
use config::{load_settings, load_template};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let template = load_template(&settings.template_path)?;
    let app = demo::advanced_maths(&settings.title, template)
        .map_err(|error| {
            error!(
                template_path = %settings.template_path.display(),
                %error,
                "template does not describe a usable app"
            );
            error
        })
        .context("failed to build app")?;
    info!(title = app.title(), widgets = app.widgets().len(), "app ready");

    let state = Arc::new(AppState::new(app));
    let router = build_router(state, settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(page_load).post(widget_event))
        .route(page::CLIENT_SCRIPT_ROUTE, get(client_script))
        .route("/healthz", get(healthz))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        page::CLIENT_SCRIPT,
    )
}

async fn page_load(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    render(&state)
}

/// Client events arrive as a form post; a post without `id_` asks for the
/// page, as the first request from a bare form would.
async fn widget_event(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EventForm>,
) -> ApiResult<Response> {
    let Some(widget_id) = form.id.as_deref() else {
        return render(&state).map(IntoResponse::into_response);
    };
    let event = form
        .event
        .as_deref()
        .ok_or_else(|| reject(ApiError::new(ErrorCode::Validation, "missing event name")))?;
    let props = form.decode_props().map_err(|e| {
        reject(ApiError::new(
            ErrorCode::Validation,
            format!("props must be a JSON object: {e}"),
        ))
    })?;

    let mutations: Vec<Mutation> = state
        .lock()
        .map_err(reject)?
        .handle_event(widget_id, event, props)
        .map_err(|e| reject(e.into()))?;
    Ok(Json(mutations).into_response())
}

fn render(state: &AppState) -> ApiResult<Html<String>> {
    let app = state.lock().map_err(reject)?;
    Ok(Html(page::render_page(app.title(), &app.handle_page_load())))
}

fn reject(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
