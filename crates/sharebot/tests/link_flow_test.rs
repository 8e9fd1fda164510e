//! Admin command parsing and link texts working against the shared stores.

use chrono::Utc;
use pretty_assertions::assert_eq;
use sharebot::telegram::handlers::AdminAction;
use sharebot::telegram::keyboards::UploadAction;
use sharebot::telegram::texts;
use sharecore::core::expiry::ExpiryTimer;
use sharecore::core::links::{build_start_link, parse_start_payload};
use sharecore::storage::{AccessPayload, AccessStore, MediaKind, SessionStore, StoredFile};

#[tokio::test]
async fn timer_from_admin_command_applies_to_next_link() {
    let admin = 77;
    let sessions = SessionStore::new();

    match AdminAction::parse("timer 90") {
        AdminAction::SetTimer(Ok(timer)) => sessions.set_timer(admin, timer).await,
        other => panic!("unexpected action {:?}", other),
    }
    sessions.push_file(admin, StoredFile::new("photo-id", MediaKind::Photo)).await;

    let timer = sessions.timer(admin).await;
    assert_eq!(timer.to_string(), "1h 30m");

    let store = AccessStore::new();
    let file = sessions.take_batch(admin).await.pop().unwrap();
    let record = store.create(10, AccessPayload::Single(file), timer, Utc::now()).await;
    let link = build_start_link("share_bot", record.payload.link_kind(), &record.code);

    let reply = texts::single_link_generated(&link, timer);
    assert!(reply.contains("valid 1h 30m"));

    let code = parse_start_payload(&format!("media_{}", record.code)).unwrap();
    assert!(store.redeem(&code, Utc::now()).await.is_some());

    assert_eq!(AdminAction::parse("reset"), AdminAction::Reset);
    sessions.reset_timer(admin).await;
    assert_eq!(sessions.timer(admin).await, ExpiryTimer::DEFAULT);
}

#[test]
fn callback_data_round_trips_through_keyboard() {
    let keyboard = sharebot::telegram::keyboards::upload_actions_keyboard();
    let parsed: Vec<UploadAction> = keyboard
        .inline_keyboard
        .iter()
        .filter_map(|row| match &row[0].kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => data.parse().ok(),
            _ => None,
        })
        .collect();
    assert_eq!(
        parsed,
        vec![UploadAction::GenerateSingle, UploadAction::AddMore, UploadAction::GenerateBatch]
    );
}
