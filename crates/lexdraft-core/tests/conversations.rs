use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lexdraft_core::{
    db::Db, session::ChatSessionStore, ChatMessage, ChatRole, SessionContext,
};

// ── helpers ──────────────────────────────────────────────────────────────

fn open_db() -> Db {
    let mut db = Db::open(":memory:").expect("open in-memory db");
    db.migrate().expect("migrate");
    db
}

fn msg(role: ChatRole, content: &str, minute: u32) -> ChatMessage {
    ChatMessage {
        role,
        content: content.to_string(),
        timestamp: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, minute, 0)
            .single()
            .expect("valid timestamp"),
    }
}

// ── users ────────────────────────────────────────────────────────────────

#[test]
fn signup_roundtrip_and_duplicate_detection() {
    let db = open_db();
    assert!(!db.username_taken("asha").expect("check"));

    let id = db.insert_user("asha", "$argon2id$stub").expect("insert");
    assert!(id > 0);
    assert!(db.username_taken("asha").expect("check"));

    let user = db
        .get_user_by_username("asha")
        .expect("query")
        .expect("user exists");
    assert_eq!(user.id, id);
    assert_eq!(user.password_hash, "$argon2id$stub");

    // UNIQUE constraint refuses a second account with the same name.
    assert!(db.insert_user("asha", "$argon2id$other").is_err());
}

#[test]
fn unknown_user_lookup_returns_none() {
    let db = open_db();
    assert!(db.get_user_by_username("ghost").expect("query").is_none());
}

// ── conversation persistence ─────────────────────────────────────────────

#[test]
fn conversation_roundtrip_preserves_order_and_content() {
    let db = open_db();
    let messages = vec![
        msg(ChatRole::User, "What are tenant rights in India?", 0),
        msg(ChatRole::Assistant, "As a legal advisor, ...", 1),
        msg(ChatRole::User, "And eviction notice periods?", 2),
        msg(ChatRole::Assistant, "Notice periods depend on ...", 3),
    ];

    db.replace_conversation("7", &messages).expect("persist");
    let loaded = db.get_conversation("7").expect("load");
    assert_eq!(loaded, messages);
}

#[test]
fn load_for_unknown_user_is_an_empty_sequence() {
    let db = open_db();
    assert!(db.get_conversation("nobody").expect("load").is_empty());
}

#[test]
fn replace_overwrites_the_whole_stored_sequence() {
    let db = open_db();
    db.replace_conversation("7", &[msg(ChatRole::User, "old", 0)])
        .expect("persist");
    let newer = vec![
        msg(ChatRole::User, "new question", 1),
        msg(ChatRole::Assistant, "new answer", 2),
    ];
    db.replace_conversation("7", &newer).expect("persist");
    assert_eq!(db.get_conversation("7").expect("load"), newer);
}

#[test]
fn conversations_are_isolated_per_user() {
    let db = open_db();
    db.replace_conversation("7", &[msg(ChatRole::User, "seven", 0)])
        .expect("persist");
    db.replace_conversation("8", &[msg(ChatRole::User, "eight", 0)])
        .expect("persist");

    db.clear_conversation("7").expect("clear");
    assert!(db.get_conversation("7").expect("load").is_empty());
    assert_eq!(db.get_conversation("8").expect("load").len(), 1);
}

// ── session store ────────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_persist_extends_the_stored_sequence() {
    let store = ChatSessionStore::new(Arc::new(open_db()));
    let ctx = SessionContext::new("7");

    let first = vec![
        msg(ChatRole::User, "first", 0),
        msg(ChatRole::Assistant, "first reply", 1),
    ];
    let total = store
        .append_and_persist(&ctx, first.clone())
        .await
        .expect("persist");
    assert_eq!(total, first);

    let second = vec![
        msg(ChatRole::User, "second", 2),
        msg(ChatRole::Assistant, "second reply", 3),
    ];
    let total = store
        .append_and_persist(&ctx, second)
        .await
        .expect("persist");
    assert_eq!(total.len(), 4);
    assert_eq!(total[0].content, "first");
    assert_eq!(total[3].content, "second reply");

    assert_eq!(store.load(&ctx).expect("load"), total);
}

#[tokio::test]
async fn clearing_then_loading_returns_the_empty_sequence() {
    let store = ChatSessionStore::new(Arc::new(open_db()));
    let ctx = SessionContext::new("7");

    store
        .append_and_persist(
            &ctx,
            vec![
                msg(ChatRole::User, "hello", 0),
                msg(ChatRole::Assistant, "hi", 1),
            ],
        )
        .await
        .expect("persist");
    assert_eq!(store.load(&ctx).expect("load").len(), 2);

    store.clear(&ctx).await.expect("clear");
    assert!(store.load(&ctx).expect("load").is_empty());
}
