use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use lexdraft_core::{ChatMessage, ChatRole, SessionContext};
use lexdraft_docs::{
    doctypes,
    extract::{extract_text, mime_for_filename, ExtractError, MIME_TXT},
    export::export_pdf,
    FormError,
};
use lexdraft_llm::prompts;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::AppState;

// ── Error helpers ─────────────────────────────────────────────────────────

pub(crate) fn internal(e: impl std::fmt::Display) -> StatusCode {
    error!("internal error: {e}");
    StatusCode::INTERNAL_SERVER_ERROR
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "draft not found")
}

/// Map form-engine errors onto the HTTP surface. Refused removals are
/// conflicts; bad indices and unknown fields are caller errors.
fn form_error(e: FormError) -> ApiError {
    let status = match &e {
        FormError::MinimumSize { .. } => StatusCode::CONFLICT,
        FormError::TypeMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::UnknownField(_)
        | FormError::NotAList(_)
        | FormError::UnknownSubfield { .. }
        | FormError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
    };
    api_error(status, e)
}

// ── Request body types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct AuthBody {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub(crate) struct MessageBody {
    pub role: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub(crate) struct ConversationBody {
    pub messages: Vec<MessageBody>,
}

#[derive(Deserialize)]
pub(crate) struct ChatBody {
    pub message: String,
}

#[derive(Deserialize)]
pub(crate) struct CreateDraftBody {
    #[serde(rename = "docType")]
    pub doc_type: String,
}

#[derive(Deserialize)]
pub(crate) struct SetFieldBody {
    pub name: String,
    pub value: Value,
}

#[derive(Deserialize)]
pub(crate) struct UpdateEntryBody {
    pub key: String,
    pub value: String,
}

fn to_chat_message(body: MessageBody) -> ChatMessage {
    ChatMessage {
        role: if body.role == "assistant" {
            ChatRole::Assistant
        } else {
            ChatRole::User
        },
        content: body.content,
        timestamp: body.timestamp.unwrap_or_else(Utc::now),
    }
}

// ── Health ────────────────────────────────────────────────────────────────

pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_s": state.start_time.elapsed().as_secs(),
    }))
}

// ── Auth ──────────────────────────────────────────────────────────────────

pub(crate) async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "username and password are required",
        ));
    }
    if state.db.username_taken(username).map_err(|e| {
        api_error(internal(e), "signup failed")
    })? {
        return Err(api_error(StatusCode::CONFLICT, "Username already exists"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| api_error(internal(e), "signup failed"))?
        .to_string();

    let id = state
        .db
        .insert_user(username, &hash)
        .map_err(|e| api_error(internal(e), "signup failed"))?;
    info!(username, "account created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Signup successful", "userId": id.to_string() })),
    ))
}

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthBody>,
) -> Result<Json<Value>, ApiError> {
    let invalid = || api_error(StatusCode::UNAUTHORIZED, "Invalid username or password");

    let user = state
        .db
        .get_user_by_username(body.username.trim())
        .map_err(|e| api_error(internal(e), "login failed"))?
        .ok_or_else(invalid)?;

    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| api_error(internal(e), "login failed"))?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed)
        .map_err(|_| invalid())?;

    Ok(Json(json!({
        "message": "Login successful",
        "userId": user.id.to_string(),
    })))
}

// ── Conversations ─────────────────────────────────────────────────────────

pub(crate) async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, StatusCode> {
    let ctx = SessionContext::new(user_id);
    let messages = state.store.load(&ctx).map_err(internal)?;
    Ok(Json(messages))
}

pub(crate) async fn post_conversation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<ConversationBody>,
) -> Result<Json<Value>, StatusCode> {
    let ctx = SessionContext::new(user_id);
    let messages: Vec<ChatMessage> = body.messages.into_iter().map(to_chat_message).collect();
    state
        .store
        .replace(&ctx, &messages)
        .await
        .map_err(internal)?;
    Ok(Json(json!({ "saved": messages.len() })))
}

pub(crate) async fn clear_conversation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let ctx = SessionContext::new(user_id);
    state.store.clear(&ctx).await.map_err(internal)?;
    Ok(Json(json!({ "cleared": true })))
}

// ── Chatbot ───────────────────────────────────────────────────────────────

/// One conversational round trip: load history, call the model with the
/// full prior sequence, append the user and assistant turns, persist.
pub(crate) async fn chat(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, ApiError> {
    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message is required"));
    }

    let ctx = SessionContext::new(user_id);
    let history = state
        .store
        .load(&ctx)
        .map_err(|e| api_error(internal(e), "failed to load conversation"))?;

    let reply = state
        .model
        .complete_chat(prompts::LEGAL_ADVISOR_SYSTEM, &history, &message)
        .await
        .map_err(|e| {
            warn!("chat completion failed: {e:#}");
            api_error(StatusCode::BAD_GATEWAY, "Failed to get response from legal advisor")
        })?;

    let now = Utc::now();
    let turns = vec![
        ChatMessage::user(message, now),
        ChatMessage::assistant(reply.clone(), now),
    ];
    state
        .store
        .append_and_persist(&ctx, turns)
        .await
        .map_err(|e| api_error(internal(e), "failed to save conversation"))?;

    Ok(Json(json!({ "reply": reply })))
}

// ── Documents & drafts ────────────────────────────────────────────────────

pub(crate) async fn list_documents() -> Json<Value> {
    let docs: Vec<Value> = doctypes::all_schemas()
        .into_iter()
        .map(|s| json!({ "name": s.name, "label": s.label }))
        .collect();
    Json(json!(docs))
}

pub(crate) async fn create_draft(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDraftBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let schema = doctypes::get_schema(&body.doc_type).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("unknown document type: {}", body.doc_type),
        )
    })?;
    let (id, form) = state.drafts.create(schema).await;
    info!(draft_id = %id, doc_type = %body.doc_type, "draft session created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "state": form }))))
}

pub(crate) async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let session = session.lock().await;
    Ok(Json(json!({
        "id": id,
        "state": session.state,
        "assist": session.assist_result,
    })))
}

pub(crate) async fn delete_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.drafts.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

pub(crate) async fn set_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetFieldBody>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let mut session = session.lock().await;
    let schema = session.schema.clone();
    session
        .state
        .set_field(&schema, &body.name, &body.value)
        .map_err(form_error)?;
    Ok(Json(json!({ "state": session.state })))
}

pub(crate) async fn append_entry(
    State(state): State<Arc<AppState>>,
    Path((id, field)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let mut session = session.lock().await;
    let schema = session.schema.clone();
    let len = session
        .state
        .append(&schema, &field)
        .map_err(form_error)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "length": len, "state": session.state })),
    ))
}

pub(crate) async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path((id, field, index)): Path<(String, String, usize)>,
    Json(body): Json<UpdateEntryBody>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let mut session = session.lock().await;
    let schema = session.schema.clone();
    session
        .state
        .update_at(&schema, &field, index, &body.key, &body.value)
        .map_err(form_error)?;
    Ok(Json(json!({ "state": session.state })))
}

pub(crate) async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Path((id, field, index)): Path<(String, String, usize)>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let mut session = session.lock().await;
    let schema = session.schema.clone();
    session
        .state
        .remove_at(&schema, &field, index)
        .map_err(form_error)?;
    Ok(Json(json!({ "state": session.state })))
}

pub(crate) async fn preview_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let session = session.lock().await;
    let view = doctypes::render(&session.schema, &session.state);
    let text = view.to_text();
    Ok(Json(json!({
        "title": view.title,
        "subtitle": view.subtitle,
        "sections": view.sections,
        "text": text,
    })))
}

/// Drafting assistance: generate a full document from the assembled form
/// text, then markdown-normalise it. Guarded by the session's generation
/// counter so a stale in-flight response cannot overwrite a newer one.
pub(crate) async fn assist_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;

    let (label, form_text, my_seq) = {
        let mut session = session.lock().await;
        session.assist_seq += 1;
        let view = doctypes::render(&session.schema, &session.state);
        (session.schema.label.clone(), view.to_text(), session.assist_seq)
    };

    let document = prompts::draft_document(state.model.as_ref(), &label, &form_text)
        .await
        .map_err(|e| {
            warn!(draft_id = %id, "drafting assistance failed: {e:#}");
            api_error(StatusCode::BAD_GATEWAY, "Failed to generate document")
        })?;

    let mut session = session.lock().await;
    let stale = my_seq != session.assist_seq;
    if stale {
        info!(draft_id = %id, generation = my_seq, "discarding superseded assist response");
    } else {
        session.assist_result = Some(document.clone());
    }
    Ok(Json(json!({ "document": document, "stale": stale })))
}

pub(crate) async fn export_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.drafts.get(&id).await.ok_or_else(not_found)?;
    let session = session.lock().await;
    let view = doctypes::render(&session.schema, &session.state);
    let filename = doctypes::export_filename(&session.schema, &session.state);

    let bytes = export_pdf(&view).map_err(|e| {
        error!(draft_id = %id, "pdf export failed: {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate PDF")
    })?;

    info!(draft_id = %id, %filename, bytes = bytes.len(), "draft exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

// ── Document analyser ─────────────────────────────────────────────────────

/// Upload a PDF/DOCX/TXT document, extract its text, and run the analysis
/// prompt over it.
pub(crate) async fn analyse(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload: Option<(Option<String>, Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?
    {
        if field.name() == Some("document") {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
            upload = Some((filename, content_type, data.to_vec()));
        }
    }
    let (filename, content_type, bytes) = upload.ok_or_else(|| {
        api_error(StatusCode::BAD_REQUEST, "multipart field 'document' is required")
    })?;

    // Browsers sometimes send octet-stream; fall back to the extension.
    let mime = match content_type.as_deref() {
        Some(ct) if ct != "application/octet-stream" => ct.to_string(),
        _ => filename
            .as_deref()
            .and_then(mime_for_filename)
            .unwrap_or(MIME_TXT)
            .to_string(),
    };

    let text = extract_text(&bytes, &mime).map_err(|e| match e {
        ExtractError::Unsupported(_) => api_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, e),
        ExtractError::Empty => api_error(StatusCode::UNPROCESSABLE_ENTITY, e),
        ExtractError::Parse(_) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e),
    })?;

    let analysis = state
        .model
        .complete(&prompts::analysis_prompt(&text))
        .await
        .map_err(|e| {
            warn!("document analysis failed: {e:#}");
            api_error(StatusCode::BAD_GATEWAY, "Failed to analyze the document")
        })?;

    Ok(Json(json!({
        "extractedChars": text.len(),
        "analysis": analysis,
    })))
}
