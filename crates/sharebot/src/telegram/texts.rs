//! User-facing message texts. Everything returned here is MarkdownV2 unless
//! noted otherwise.

use chrono::{DateTime, Utc};
use sharecore::core::config;
use sharecore::core::error::AppResult;
use sharecore::core::expiry::{format_expiry, ExpiryTimer};
use sharecore::storage::{AccessPayload, AccessRecord, MediaKind};

use crate::telegram::markdown::{bold, code, escape_markdown_v2 as esc};

pub fn invalid_code() -> String {
    esc("❌ Invalid or expired code.")
}

pub fn access_restricted() -> String {
    format!(
        "🔒 {}\n\n{}\n\n{}",
        bold("Access Restricted"),
        esc("To access shared media, you must first join our backup channel."),
        esc("After joining, try the link again:")
    )
}

pub fn batch_header(count: usize) -> String {
    format!("📦 {}", bold(&format!("Batch Media ({} files)", count)))
}

pub fn admin_welcome() -> String {
    format!(
        "{}\n\n{}\n⏰ Use {} to set custom expiration times\\.",
        esc("🎉 Welcome Admin!"),
        esc("📤 Send a file (document/photo/video) to generate a temporary link."),
        code("/admin timer <minutes>")
    )
}

pub fn public_welcome() -> String {
    format!(
        "{}\n\n{}\n\n{}",
        esc("🎉 Welcome to the Media Share Bot!"),
        esc("📤 Administrators can send files to generate temporary shareable links."),
        esc("💡 For important updates and backup access, please join our backup channel:")
    )
}

pub fn admin_panel_denied() -> String {
    format!(
        "🔒 {}\n\n{}",
        bold("Access Denied"),
        esc("Only administrators can access the admin panel.")
    )
}

pub fn upload_denied() -> String {
    format!(
        "🔒 {}\n\n{}",
        bold("Access Denied"),
        esc("Only administrators can upload files and generate sharing links.")
    )
}

/// `/admin` without arguments
pub fn admin_panel(channel_members: usize, timer: ExpiryTimer, database_channel_id: i64) -> String {
    format!(
        "🔧 {}\n\n📊 {}\n{}\n{}\n{}\n\n⚙️ {}\n• {} \\- Set custom timer\n• {} \\- View statistics\n• {} \\- Reset timer to default \\(2 days\\)",
        bold("Admin Control Panel"),
        bold("Statistics:"),
        esc(&format!("• Channel members: {}", channel_members)),
        esc(&format!("• Current timer: {}", timer)),
        esc(&format!("• Database Channel: {}", database_channel_id)),
        bold("Available Commands:"),
        code("/admin timer <minutes>"),
        code("/admin stats"),
        code("/admin reset"),
    )
}

pub fn timer_usage() -> String {
    format!(
        "⏰ {}\n\nUsage: {}\n\nExamples:\n• {} \\- Set 30 minutes\n• {} \\- Set 2 hours\n• {} \\- Set 24 hours",
        bold("Set Timer"),
        code("/admin timer <minutes>"),
        code("/admin timer 30"),
        code("/admin timer 120"),
        code("/admin timer 1440"),
    )
}

pub fn timer_updated(timer: ExpiryTimer) -> String {
    format!(
        "✅ {}\n\nNew expiration time: {}",
        bold("Timer Updated"),
        bold(&timer.to_string())
    )
}

pub fn admin_stats(channel_members: usize, timer: ExpiryTimer, backup_channel: &str, database_channel_id: i64) -> String {
    format!(
        "📊 {}\n\n{}\n{}\n{}\n{}",
        bold("Statistics"),
        esc(&format!("• Channel members: {}", channel_members)),
        esc(&format!("• Current timer: {} minutes", timer.minutes())),
        esc(&format!("• Backup channel: @{}", backup_channel)),
        esc(&format!("• Database channel: {}", database_channel_id)),
    )
}

pub fn timer_reset() -> String {
    format!(
        "🔄 {}\n\n{}",
        bold("Timer Reset"),
        esc("Timer has been reset to default (2 days).")
    )
}

pub fn unknown_admin_command() -> String {
    format!(
        "❌ {}\n\nUse {} to see available commands\\.",
        bold("Unknown Command"),
        code("/admin")
    )
}

pub fn file_added(count: usize) -> String {
    format!(
        "📁 {} \\({} total\\)\n\nChoose what to do:",
        bold("File Added"),
        count
    )
}

pub fn unsupported_media() -> String {
    esc("❌ Unsupported media. Send document, video, or photo.")
}

pub fn callback_denied() -> String {
    "🔒 Access Denied".to_string()
}

pub fn no_files() -> String {
    esc("❌ No files to process.")
}

pub fn single_link_generated(link: &str, timer: ExpiryTimer) -> String {
    format!(
        "✅ {}\n\n🔗 {}\n{}",
        bold("Single File Link Generated"),
        esc(&format!("Link (valid {}):", timer)),
        esc(link)
    )
}

pub fn batch_link_generated(count: usize, link: &str, timer: ExpiryTimer) -> String {
    format!(
        "✅ {} \\({} files\\)\n\n🔗 {}\n{}",
        bold("Batch Link Generated"),
        count,
        esc(&format!("Link (valid {}):", timer)),
        esc(link)
    )
}

pub fn link_failed(batch: bool) -> String {
    if batch {
        esc("❌ Failed to generate batch link. Please try again.")
    } else {
        esc("❌ Failed to generate link. Please try again.")
    }
}

pub fn batch_mode_active(count: usize) -> String {
    format!(
        "📦 {} \\({} files\\)\n\n{}",
        bold("Batch Mode Active"),
        count,
        esc("Send more files to add them to the batch.")
    )
}

/// Reply posted under a file uploaded straight into the database channel.
pub fn auto_generated_link(code_value: &str, kind: MediaKind, expires_at: DateTime<Utc>, link: &str) -> String {
    format!(
        "🔗 {}\n\nCode: {}\n{}\n{}\n\n{}",
        bold("Auto-Generated Link"),
        code(code_value),
        esc(&format!("Type: {}", kind)),
        esc(&format!("Expires: {}", format_expiry(expires_at))),
        esc(&format!("Link: {}", link)),
    )
}

/// Plain-text caption for the copy kept in the database channel, cut to the
/// Bot API caption limit.
pub fn database_caption(record: &AccessRecord) -> AppResult<String> {
    let header = match &record.payload {
        AccessPayload::Single(file) => format!(
            "🔗 Media Link\nCode: {}\nType: {}\nExpires: {}",
            record.code,
            file.kind,
            format_expiry(record.expires_at)
        ),
        AccessPayload::Batch { files } => format!(
            "🔗 Batch Media\nCode: {}\nFiles: {}\nExpires: {}",
            record.code,
            files.len(),
            format_expiry(record.expires_at)
        ),
    };
    let caption = format!("{}\n\nMetadata: {}", header, record.metadata_json()?);
    Ok(truncate_utf16(&caption, config::telegram::MAX_CAPTION_LENGTH))
}

/// Cuts `text` to at most `limit` UTF-16 code units, the unit Telegram counts in.
fn truncate_utf16(text: &str, limit: usize) -> String {
    let mut used = 0;
    let mut end = text.len();
    for (idx, c) in text.char_indices() {
        used += c.len_utf16();
        if used > limit {
            end = idx;
            break;
        }
    }
    text[..end].to_string()
}
