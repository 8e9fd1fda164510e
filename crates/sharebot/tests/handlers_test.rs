//! Integration tests for the Telegram handlers against a mocked Bot API (wiremock).
//!
//! Each test drives the real handler functions and then inspects the requests
//! the bot made.
//!
//! Run with: cargo test --test handlers_test

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serial_test::serial;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use sharebot::telegram::delivery::extract_media;
use sharebot::telegram::handlers::callbacks::handle_upload_callback;
use sharebot::telegram::handlers::channel::handle_channel_post;
use sharebot::telegram::handlers::start::handle_start_command;
use sharebot::telegram::texts;
use sharebot::telegram::HandlerDeps;
use sharecore::core::expiry::ExpiryTimer;
use sharecore::storage::{AccessPayload, AccessStore, MediaKind, MembershipCache, SessionStore, StoredFile};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

const ADMIN: i64 = 1524529804;
const READER: i64 = 555;
const DATABASE_CHANNEL: i64 = -1001234567890;
const BACKUP_CHANNEL: &str = "backup";

/// Test harness: mock Bot API plus fresh stores
struct HandlerTest {
    mock_server: MockServer,
    bot: Bot,
    deps: HandlerDeps,
}

impl HandlerTest {
    async fn new() -> Self {
        // The admin list is read once per process; every test sets the same value.
        unsafe { std::env::set_var("ADMIN_IDS", ADMIN.to_string()) };

        let mock_server = MockServer::start().await;
        let bot = Bot::new("test_token_12345:ABCDEF").set_api_url(mock_server.uri().parse().unwrap());

        let deps = HandlerDeps::new(
            AccessStore::new(),
            MembershipCache::new(),
            SessionStore::new(),
            "share_bot".to_string(),
            ChatId(DATABASE_CHANNEL),
            BACKUP_CHANNEL.to_string(),
        );

        Self { mock_server, bot, deps }
    }

    /// Every message-returning method succeeds; mount failures before calling this.
    async fn mock_telegram_api(&self) {
        for api_method in ["sendMessage", "sendPhoto", "sendVideo", "sendDocument", "editMessageText"] {
            Mock::given(method("POST"))
                .and(path_regex(format!("(?i)/bot[^/]+/{}", api_method)))
                .respond_with(ResponseTemplate::new(200).set_body_json(message_response(42, READER)))
                .mount(&self.mock_server)
                .await;
        }

        Mock::given(method("POST"))
            .and(path_regex("(?i)/bot[^/]+/answerCallbackQuery"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": true})))
            .mount(&self.mock_server)
            .await;
    }

    /// `api_method` fails with a Bot API 400 for requests whose body contains `needle`.
    async fn mock_failure(&self, api_method: &str, needle: &str) {
        Mock::given(method("POST"))
            .and(path_regex(format!("(?i)/bot[^/]+/{}", api_method)))
            .and(body_string_contains(needle))
            .respond_with(ResponseTemplate::new(400).set_body_json(bad_request()))
            .mount(&self.mock_server)
            .await;
    }

    async fn requests_to(&self, api_method: &str) -> Vec<Request> {
        let suffix = format!("/{}", api_method.to_lowercase());
        self.mock_server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path().to_lowercase().ends_with(&suffix))
            .collect()
    }

    /// JSON body of the last `api_method` request.
    async fn last_json_body(&self, api_method: &str) -> Value {
        let requests = self.requests_to(api_method).await;
        let request = requests
            .last()
            .unwrap_or_else(|| panic!("no {} request was made", api_method));
        serde_json::from_slice(&request.body).unwrap()
    }
}

fn message_response(message_id: i32, chat_id: i64) -> Value {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "ShareBot"
            },
            "chat": {
                "id": chat_id,
                "type": "private"
            },
            "date": 1735992000,
            "text": "ok"
        }
    })
}

fn bad_request() -> Value {
    serde_json::json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: wrong file identifier/HTTP URL specified"
    })
}

fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

/// Private `/start` message from `user_id`
fn create_start_message(payload: &str, user_id: i64) -> Message {
    serde_json::from_value(serde_json::json!({
        "message_id": 1,
        "date": 1735992000,
        "chat": {
            "id": user_id,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test"
        },
        "text": format!("/start {}", payload)
    }))
    .unwrap()
}

/// Button press on the "File Added" message
fn create_callback(data: &str, user_id: i64) -> CallbackQuery {
    serde_json::from_value(serde_json::json!({
        "id": "callback-1",
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test"
        },
        "message": {
            "message_id": 42,
            "date": 1735992000,
            "chat": {
                "id": user_id,
                "type": "private"
            },
            "text": "File Added"
        },
        "chat_instance": "chat-instance-1",
        "data": data
    }))
    .unwrap()
}

/// Document posted into channel `chat_id`
fn create_channel_post(chat_id: i64, message_id: i32, file_id: &str) -> Message {
    serde_json::from_value(serde_json::json!({
        "message_id": message_id,
        "date": 1735992000,
        "chat": {
            "id": chat_id,
            "type": "channel",
            "title": "Storage"
        },
        "document": {
            "file_id": file_id,
            "file_unique_id": format!("{}-unique", file_id)
        }
    }))
    .unwrap()
}

/// Code carried by the link in a "Link Generated" reply.
fn code_from_link_text(text: &str, prefix: &str) -> String {
    let escaped_prefix = format!("start\\={}\\_", prefix);
    text.rsplit(escaped_prefix.as_str())
        .next()
        .unwrap()
        .replace('\\', "")
        .trim()
        .to_string()
}

// ==================== /start redemption ====================

#[tokio::test]
#[serial]
async fn test_batch_redeem_continues_after_failed_file() {
    let test = HandlerTest::new().await;
    test.mock_failure("sendDocument", "doc-broken").await;
    test.mock_telegram_api().await;

    let files = vec![
        StoredFile::new("doc-one", MediaKind::Document),
        StoredFile::new("doc-broken", MediaKind::Document),
        StoredFile::new("doc-three", MediaKind::Document),
    ];
    let record = test
        .deps
        .store
        .create(10, AccessPayload::Batch { files }, ExpiryTimer::DEFAULT, Utc::now())
        .await;

    let msg = create_start_message(&format!("batch_{}", record.code), ADMIN);
    let result = handle_start_command(&test.bot, &msg, &test.deps, &format!("batch_{}", record.code)).await;
    assert!(result.is_ok());

    let header = test.last_json_body("sendMessage").await;
    assert_eq!(header["text"], texts::batch_header(3));

    let sends = test.requests_to("sendDocument").await;
    assert_eq!(sends.len(), 3);
    assert!(body_text(&sends[1]).contains("doc-broken"));
    assert!(body_text(&sends[2]).contains("doc-three"));

    // admins skip the backup channel check
    assert!(test.requests_to("getChatMember").await.is_empty());
    assert!(!test.deps.membership.contains(ADMIN).await);
}

#[tokio::test]
#[serial]
async fn test_membership_error_denies_then_member_is_cached() {
    let test = HandlerTest::new().await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/getChatMember"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: member list is inaccessible"
        })))
        .up_to_n_times(1)
        .mount(&test.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/getChatMember"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {
                "user": {
                    "id": READER,
                    "is_bot": false,
                    "first_name": "Test"
                },
                "status": "member"
            }
        })))
        .mount(&test.mock_server)
        .await;
    test.mock_telegram_api().await;

    let record = test
        .deps
        .store
        .create(
            11,
            AccessPayload::Single(StoredFile::new("shared-photo", MediaKind::Photo)),
            ExpiryTimer::DEFAULT,
            Utc::now(),
        )
        .await;
    let payload = format!("media_{}", record.code);
    let msg = create_start_message(&payload, READER);

    // API error: treated as not joined, nothing cached
    handle_start_command(&test.bot, &msg, &test.deps, &payload).await.unwrap();
    let restricted = test.last_json_body("sendMessage").await;
    assert_eq!(restricted["text"], texts::access_restricted());
    assert_eq!(
        restricted["reply_markup"]["inline_keyboard"][0][0]["url"],
        "https://t.me/backup"
    );
    assert!(test.requests_to("sendPhoto").await.is_empty());
    assert!(!test.deps.membership.contains(READER).await);

    // member: file delivered and membership cached
    handle_start_command(&test.bot, &msg, &test.deps, &payload).await.unwrap();
    assert_eq!(test.requests_to("sendPhoto").await.len(), 1);
    assert!(test.deps.membership.contains(READER).await);

    // cached: no further membership lookups
    handle_start_command(&test.bot, &msg, &test.deps, &payload).await.unwrap();
    assert_eq!(test.requests_to("getChatMember").await.len(), 2);
    assert_eq!(test.requests_to("sendPhoto").await.len(), 2);

    let get_member: Value = serde_json::from_slice(&test.requests_to("getChatMember").await[0].body).unwrap();
    assert_eq!(get_member["chat_id"], "@backup");
    assert_eq!(get_member["user_id"], READER);
}

#[tokio::test]
#[serial]
async fn test_unknown_code_is_rejected() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    let msg = create_start_message("media_zzzzzz", READER);
    handle_start_command(&test.bot, &msg, &test.deps, "media_zzzzzz").await.unwrap();

    let reply = test.last_json_body("sendMessage").await;
    assert_eq!(reply["text"], texts::invalid_code());
    assert!(test.requests_to("getChatMember").await.is_empty());
}

// ==================== Upload buttons ====================

#[tokio::test]
#[serial]
async fn test_generate_single_stores_only_last_file() {
    let test = HandlerTest::new().await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendDocument"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response(77, DATABASE_CHANNEL)))
        .mount(&test.mock_server)
        .await;
    test.mock_telegram_api().await;

    test.deps
        .sessions
        .push_file(ADMIN, StoredFile::new("first-photo", MediaKind::Photo))
        .await;
    test.deps
        .sessions
        .push_file(ADMIN, StoredFile::new("last-doc", MediaKind::Document))
        .await;

    let q = create_callback("generate_single", ADMIN);
    handle_upload_callback(&test.bot, &q, &test.deps).await.unwrap();

    assert_eq!(test.requests_to("answerCallbackQuery").await.len(), 1);
    assert!(test.requests_to("sendPhoto").await.is_empty());
    let saved = test.requests_to("sendDocument").await;
    assert_eq!(saved.len(), 1);
    assert!(body_text(&saved[0]).contains("last-doc"));
    assert!(body_text(&saved[0]).contains(&DATABASE_CHANNEL.to_string()));

    assert_eq!(test.deps.store.len().await, 1);
    assert_eq!(test.deps.sessions.batch_len(ADMIN).await, 0);

    let edit = test.last_json_body("editMessageText").await;
    let text = edit["text"].as_str().unwrap();
    assert!(text.contains("Single File Link Generated"));

    let code = code_from_link_text(text, "media");
    let record = test.deps.store.redeem(&code, Utc::now()).await.unwrap();
    assert_eq!(record.message_id, 77);
    assert_eq!(
        record.payload,
        AccessPayload::Single(StoredFile::new("last-doc", MediaKind::Document))
    );
}

#[tokio::test]
#[serial]
async fn test_generate_batch_failure_clears_batch_and_stores_nothing() {
    let test = HandlerTest::new().await;
    test.mock_failure("sendPhoto", "batch-photo").await;
    test.mock_telegram_api().await;

    test.deps
        .sessions
        .push_file(ADMIN, StoredFile::new("batch-photo", MediaKind::Photo))
        .await;
    test.deps
        .sessions
        .push_file(ADMIN, StoredFile::new("batch-doc", MediaKind::Document))
        .await;

    let q = create_callback("generate_batch", ADMIN);
    handle_upload_callback(&test.bot, &q, &test.deps).await.unwrap();

    assert_eq!(test.requests_to("sendPhoto").await.len(), 1);
    assert!(test.deps.store.is_empty().await);
    assert_eq!(test.deps.sessions.batch_len(ADMIN).await, 0);

    let edit = test.last_json_body("editMessageText").await;
    assert_eq!(edit["text"], texts::link_failed(true));
}

#[tokio::test]
#[serial]
async fn test_upload_during_database_send_is_kept() {
    let test = HandlerTest::new().await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendVideo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_response(90, DATABASE_CHANNEL))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&test.mock_server)
        .await;
    test.mock_telegram_api().await;

    test.deps
        .sessions
        .push_file(ADMIN, StoredFile::new("slow-video", MediaKind::Video))
        .await;

    let bot = test.bot.clone();
    let deps = test.deps.clone();
    let q = create_callback("generate_batch", ADMIN);
    let press = tokio::spawn(async move { handle_upload_callback(&bot, &q, &deps).await });

    // wait until the database channel send is in flight
    for _ in 0..100 {
        if !test.requests_to("sendVideo").await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!press.is_finished());
    let pending = test
        .deps
        .sessions
        .push_file(ADMIN, StoredFile::new("late-photo", MediaKind::Photo))
        .await;
    assert_eq!(pending, 1);

    press.await.unwrap().unwrap();

    assert_eq!(test.deps.store.len().await, 1);
    assert_eq!(
        test.deps.sessions.take_batch(ADMIN).await,
        vec![StoredFile::new("late-photo", MediaKind::Photo)]
    );
}

#[tokio::test]
#[serial]
async fn test_empty_batch_reports_no_files() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    let q = create_callback("generate_single", ADMIN);
    handle_upload_callback(&test.bot, &q, &test.deps).await.unwrap();

    let edit = test.last_json_body("editMessageText").await;
    assert_eq!(edit["text"], texts::no_files());
    assert!(test.deps.store.is_empty().await);
}

#[tokio::test]
#[serial]
async fn test_add_more_keeps_batch() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    for id in ["a", "b"] {
        test.deps
            .sessions
            .push_file(ADMIN, StoredFile::new(id, MediaKind::Photo))
            .await;
    }

    let q = create_callback("add_more", ADMIN);
    handle_upload_callback(&test.bot, &q, &test.deps).await.unwrap();

    let edit = test.last_json_body("editMessageText").await;
    assert_eq!(edit["text"], texts::batch_mode_active(2));
    assert_eq!(test.deps.sessions.batch_len(ADMIN).await, 2);
}

#[tokio::test]
#[serial]
async fn test_non_admin_button_press_is_denied() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    test.deps
        .sessions
        .push_file(READER, StoredFile::new("x", MediaKind::Photo))
        .await;

    let q = create_callback("generate_batch", READER);
    handle_upload_callback(&test.bot, &q, &test.deps).await.unwrap();

    assert_eq!(test.requests_to("answerCallbackQuery").await.len(), 1);
    let edit = test.last_json_body("editMessageText").await;
    assert_eq!(edit["text"], texts::callback_denied());
    assert_eq!(test.deps.sessions.batch_len(READER).await, 1);
    assert!(test.deps.store.is_empty().await);
}

// ==================== Database channel posts ====================

#[tokio::test]
#[serial]
async fn test_database_channel_post_gets_link_reply() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    let post = create_channel_post(DATABASE_CHANNEL, 300, "channel-doc");
    let file = extract_media(&post).unwrap();
    handle_channel_post(&test.bot, &post, &test.deps, file).await.unwrap();

    assert_eq!(test.deps.store.len().await, 1);

    let reply = test.last_json_body("sendMessage").await;
    assert_eq!(reply["chat_id"], DATABASE_CHANNEL);
    assert_eq!(reply["reply_parameters"]["message_id"], 300);
    assert_eq!(reply["parse_mode"], "MarkdownV2");

    let text = reply["text"].as_str().unwrap();
    assert!(text.contains("Auto\\-Generated Link"));
    let code = code_from_link_text(text, "media");
    let record = test.deps.store.redeem(&code, Utc::now()).await.unwrap();
    assert_eq!(record.message_id, 300);
    assert_eq!(
        record.payload,
        AccessPayload::Single(StoredFile::new("channel-doc", MediaKind::Document))
    );
}

#[tokio::test]
#[serial]
async fn test_foreign_channel_post_is_ignored() {
    let test = HandlerTest::new().await;
    test.mock_telegram_api().await;

    let post = create_channel_post(-1009999999999, 301, "foreign-doc");
    let file = extract_media(&post).unwrap();
    handle_channel_post(&test.bot, &post, &test.deps, file).await.unwrap();

    assert!(test.deps.store.is_empty().await);
    assert!(test.mock_server.received_requests().await.unwrap().is_empty());
}
