use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use lexdraft_core::{config::Config, db::Db, gateway::TextModel, session::ChatSessionStore};
use lexdraft_llm::{gemini::GeminiModel, ollama::OllamaModel};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;

mod drafts;
mod routes;

use drafts::DraftRegistry;
use routes::{
    analyse, append_entry, assist_draft, chat, clear_conversation, create_draft, delete_draft,
    export_draft, get_conversation, get_draft, health, list_documents, login, post_conversation,
    preview_draft, remove_entry, set_field, signup, update_entry,
};

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub db: Arc<Db>,
    pub store: ChatSessionStore,
    pub drafts: DraftRegistry,
    pub model: Arc<dyn TextModel>,
    pub start_time: Instant,
}

// ── main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexdraft_server=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = format!("{}/lexdraft.db", config.data_dir);
    let mut db = Db::open(&db_path)?;
    db.migrate()?;
    let db = Arc::new(db);

    // Select the LLM backend via LLM_BACKEND (gemini default, ollama for
    // fully local deployments).
    let model: Arc<dyn TextModel> = match config.llm_backend.as_str() {
        "ollama" => Arc::new(
            OllamaModel::new(&config.ollama_base_url, &config.ollama_model)
                .with_timeout(config.llm_timeout_s),
        ),
        _ => Arc::new(
            GeminiModel::new(&config.gemini_api_key, &config.gemini_base_url, &config.model)
                .with_timeout(config.llm_timeout_s),
        ),
    };
    info!(backend = %config.llm_backend, "LLM backend selected");

    let state = Arc::new(AppState {
        store: ChatSessionStore::new(Arc::clone(&db)),
        db,
        drafts: DraftRegistry::new(),
        model,
        start_time: Instant::now(),
    });

    let app = Router::new()
        // Health
        .route("/api/health", get(health))
        // Auth
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        // Chat history
        .route("/api/conversations/:user_id", get(get_conversation))
        .route("/api/conversations/:user_id", post(post_conversation))
        .route("/api/conversations/:user_id/clear", post(clear_conversation))
        // Chatbot
        .route("/api/chat/:user_id", post(chat))
        // Document types
        .route("/api/documents", get(list_documents))
        // Draft sessions
        .route("/api/drafts", post(create_draft))
        .route("/api/drafts/:id", get(get_draft))
        .route("/api/drafts/:id", delete(delete_draft))
        .route("/api/drafts/:id/fields", put(set_field))
        .route("/api/drafts/:id/lists/:field", post(append_entry))
        .route("/api/drafts/:id/lists/:field/:index", put(update_entry))
        .route("/api/drafts/:id/lists/:field/:index", delete(remove_entry))
        .route("/api/drafts/:id/preview", get(preview_draft))
        .route("/api/drafts/:id/assist", post(assist_draft))
        .route("/api/drafts/:id/export", get(export_draft))
        // Analyser
        .route("/api/analyse", post(analyse))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
