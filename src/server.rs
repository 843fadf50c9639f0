use crate::config::{AppConfig, MapConfig, SymbolConfig};
use crate::sequence::{SequenceEvent, Sequencer, SymbolSink};
use crate::types::{GeoBounds, RenderFrame};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub struct AppState {
    pub sequencer: RwLock<Sequencer>,
    pub meta: MapMeta,
}

/// Everything the frontend needs to instantiate the map before it asks for
/// the first frame. Styling and basemap settings pass through untouched.
#[derive(Clone, Serialize)]
pub struct MapMeta {
    pub attributes: Vec<String>,
    pub min_value: f64,
    pub symbols: SymbolConfig,
    pub map: MapConfig,
    pub bounds: Option<GeoBounds>,
}

#[derive(Deserialize)]
pub struct SequenceRequest {
    event: SequenceEvent,
}

#[derive(Serialize)]
pub struct SequenceResponse {
    /// Slider position after the transition; always equals `frame.index`.
    indicator: usize,
    frame: RenderFrame,
}

#[derive(Deserialize)]
pub struct PopupRequest {
    name: String,
    open: bool,
}

pub async fn start_server(
    config: AppConfig,
    sequencer: Sequencer,
    bounds: Option<GeoBounds>,
) -> Result<()> {
    let meta = MapMeta {
        attributes: sequencer.attributes().to_vec(),
        min_value: sequencer.scaling().min_value(),
        symbols: config.symbols.clone(),
        map: config.map.clone(),
        bounds,
    };

    let state = Arc::new(AppState {
        sequencer: RwLock::new(sequencer),
        meta,
    });

    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    info!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/meta", get(meta_handler))
        .route("/api/frame", get(frame_handler))
        .route("/api/sequence", post(sequence_handler))
        .route("/api/popup", post(popup_handler))
        .nest_service("/", ServeDir::new(&config.server.assets_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn meta_handler(State(state): State<Arc<AppState>>) -> Json<MapMeta> {
    Json(state.meta.clone())
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<RenderFrame> {
    Json(state.sequencer.read().frame())
}

/// Captures what the sequencer pushed during one transition so the response
/// carries exactly the rendered frame, not a second snapshot.
#[derive(Default)]
struct FrameSink {
    indicator: Option<usize>,
    frame: Option<RenderFrame>,
}

impl SymbolSink for FrameSink {
    fn set_indicator(&mut self, index: usize) {
        self.indicator = Some(index);
    }
    fn render(&mut self, frame: &RenderFrame) {
        self.frame = Some(frame.clone());
    }
}

async fn sequence_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<SequenceResponse>, StatusCode> {
    let mut sink = FrameSink::default();
    state.sequencer.write().apply(request.event, &mut sink);

    match (sink.indicator, sink.frame) {
        (Some(indicator), Some(frame)) => Ok(Json(SequenceResponse { indicator, frame })),
        // apply() always pushes both; anything else is a broken sink wiring
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn popup_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PopupRequest>,
) -> StatusCode {
    if state.sequencer.write().set_popup_open(&request.name, request.open) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
