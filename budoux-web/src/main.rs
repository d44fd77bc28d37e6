//! Servidor web Axum com WebSocket para visualização da segmentação em tempo real

mod config;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use askama::Template;
use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        FromRequest, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use budoux_core::{
    join_with, BoundaryDecision, Language, ModelLoader, SegmentEvent, Segmenter, Separator,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Estado compartilhado da aplicação.
///
/// `Segmenter` guarda o modelo num `Arc` e só expõe `&self`, então o estado
/// inteiro é `Send + Sync` sem nenhuma trava.
struct AppState {
    segmenters: HashMap<Language, Segmenter>,
    default_language: Language,
    ws_event_delay: std::time::Duration,
}

impl AppState {
    /// Resolve a tag pedida (ou o idioma padrão) para um segmentador carregado.
    ///
    /// A tag passa pelo mesmo `FromStr` de [`Language`], então `"JA"` e
    /// `"zh_Hans"` valem; tags desconhecidas e idiomas sem modelo dão 404.
    fn segmenter(&self, language: Option<&str>) -> Result<&Segmenter, ApiError> {
        let language = match language {
            Some(tag) => tag
                .parse::<Language>()
                .map_err(|_| ApiError::UnknownLanguage(tag.to_string()))?,
            None => self.default_language,
        };
        self.segmenters
            .get(&language)
            .ok_or(ApiError::LanguageUnavailable(language))
    }
}

/// Erros devolvidos pela API como `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Texto vazio")]
    EmptyText,
    #[error("Idioma desconhecido: {0}")]
    UnknownLanguage(String),
    #[error("Modelo não carregado para o idioma {0}")]
    LanguageUnavailable(Language),
    #[error("{}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),
    #[error("Mensagem inválida: {0}")]
    InvalidWsMessage(String),
    #[error("Erro interno")]
    Render(#[source] askama::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyText | ApiError::InvalidWsMessage(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownLanguage(_) | ApiError::LanguageUnavailable(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidJson(rejection) => rejection.status(),
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Render(err) = &self {
            error!(error = %err, "falha ao renderizar template");
        }
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// `Json` cuja rejeição (corpo malformado, `Content-Type` errado, campo
/// faltando) também sai como `{"error": "..."}`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

#[derive(Deserialize)]
struct SegmentRequest {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    separator: Option<Separator>,
}

#[derive(Serialize)]
struct SegmentResponse {
    phrases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    joined: Option<String>,
    total_chars: usize,
    processing_ms: u64,
}

#[derive(Deserialize)]
struct ExplainRequest {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Serialize)]
struct ExplainResponse {
    total_weight: i64,
    boundaries: Vec<BoundaryDecision>,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Serialize)]
struct LanguageStatus {
    tag: &'static str,
    resource: &'static str,
    loaded: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    languages: Vec<LanguageStatus>,
    default_language: &'static str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    let state = Arc::new(load_state(&config));
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.addr, error = %err, "não foi possível abrir a porta");
            std::process::exit(1);
        }
    };
    info!("🚀 Servidor de segmentação iniciado em http://{}", config.addr);
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "servidor encerrado com erro");
        std::process::exit(1);
    }
}

/// Carrega os modelos configurados. Idiomas cujo modelo falha são registrados e ignorados.
fn load_state(config: &ServerConfig) -> AppState {
    let loader = ModelLoader::new(&config.model_dir);
    let mut segmenters = HashMap::new();

    for &lang in &config.languages {
        match loader.load_language(lang) {
            Ok(model) => {
                info!(
                    language = %lang,
                    total_weight = model.total_weight(),
                    "modelo carregado"
                );
                segmenters.insert(lang, Segmenter::new(model));
            }
            Err(err) => warn!(language = %lang, error = %err, "modelo indisponível"),
        }
    }

    AppState {
        segmenters,
        default_language: config.default_language,
        ws_event_delay: config.ws_event_delay,
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/languages", get(languages_handler))
        .route("/segment", post(segment_handler))
        .route("/explain", post(explain_handler))
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn language_statuses(state: &AppState) -> Vec<LanguageStatus> {
    Language::ALL
        .iter()
        .map(|lang| LanguageStatus {
            tag: lang.tag(),
            resource: lang.resource_name(),
            loaded: state.segmenters.contains_key(lang),
        })
        .collect()
}

/// Retorna a página principal HTML
async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let page = IndexTemplate {
        languages: language_statuses(&state),
        default_language: state.default_language.tag(),
    };
    page.render().map(Html).map_err(ApiError::Render)
}

/// Lista os idiomas e se o modelo de cada um está carregado
async fn languages_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(language_statuses(&state))
}

/// Segmentação via HTTP POST (sem streaming)
async fn segment_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SegmentRequest>,
) -> Result<Json<SegmentResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }
    let segmenter = state.segmenter(req.language.as_deref())?;

    let start = Instant::now();
    let phrases = segmenter.segment(&req.text);
    let joined = req.separator.map(|sep| join_with(&phrases, &sep));

    Ok(Json(SegmentResponse {
        total_chars: req.text.chars().count(),
        processing_ms: start.elapsed().as_millis() as u64,
        phrases,
        joined,
    }))
}

/// Pontuação detalhada de cada fronteira
async fn explain_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }
    let segmenter = state.segmenter(req.language.as_deref())?;

    Ok(Json(ExplainResponse {
        total_weight: segmenter.model().total_weight(),
        boundaries: segmenter.explain(&req.text),
    }))
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, segmenta e envia os eventos passo a passo
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Texto vazio é ignorado; os demais erros viram um evento `Error`
                let resolved = parse_ws_request(&text)
                    .and_then(|req| {
                        let segmenter = state.segmenter(req.language.as_deref())?.clone();
                        Ok((req.text, segmenter))
                    })
                    .map_err(|err| match err {
                        ApiError::EmptyText => None,
                        err => {
                            warn!(error = %err, "pedido inválido via WebSocket");
                            Some(ws_error(&err))
                        }
                    });
                let (text, segmenter) = match resolved {
                    Ok(pair) => pair,
                    Err(None) => continue,
                    Err(Some(msg)) => {
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                info!(chars = text.chars().count(), "Segmentando via WebSocket");

                // A varredura é síncrona: roda fora do runtime e depois repassamos os eventos
                let (tx, rx) = std::sync::mpsc::channel::<SegmentEvent>();
                let handle = tokio::task::spawn_blocking(move || {
                    segmenter.segment_streaming(&text, tx);
                });
                if let Err(err) = handle.await {
                    error!(error = %err, "tarefa de segmentação falhou");
                    continue;
                }
                let events: Vec<SegmentEvent> = rx.try_iter().collect();

                for event in &events {
                    let Ok(json) = serde_json::to_string(event) else {
                        continue;
                    };
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        return; // cliente desconectou
                    }
                    if !state.ws_event_delay.is_zero() {
                        tokio::time::sleep(state.ws_event_delay).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Mensagens que parecem JSON precisam ser um `{text, language}` válido;
/// qualquer outra coisa é o próprio texto a segmentar.
fn parse_ws_request(raw: &str) -> Result<WsRequest, ApiError> {
    let req = if raw.trim_start().starts_with('{') {
        serde_json::from_str::<WsRequest>(raw)
            .map_err(|err| ApiError::InvalidWsMessage(err.to_string()))?
    } else {
        WsRequest {
            text: raw.to_string(),
            language: None,
        }
    };
    if req.text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }
    Ok(req)
}

/// Evento `{"type": "Error", "data": {"message": ...}}`, no mesmo formato de [`SegmentEvent`].
fn ws_error(err: &ApiError) -> String {
    serde_json::json!({
        "type": "Error",
        "data": { "message": err.to_string() }
    })
    .to_string()
}
