//! Inline keyboards and the callback data they carry

use strum::{AsRefStr, Display, EnumString};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use sharecore::core::links::channel_url;

/// Buttons offered after each admin upload. The serialized names are the callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum UploadAction {
    GenerateSingle,
    AddMore,
    GenerateBatch,
}

impl UploadAction {
    fn label(self) -> &'static str {
        match self {
            UploadAction::GenerateSingle => "📤 Generate Link Now",
            UploadAction::AddMore => "📦 Add More Files",
            UploadAction::GenerateBatch => "🔗 Generate Batch Link",
        }
    }
}

/// One button per row: generate now, add more, generate batch.
pub fn upload_actions_keyboard() -> InlineKeyboardMarkup {
    let rows = [UploadAction::GenerateSingle, UploadAction::AddMore, UploadAction::GenerateBatch]
        .into_iter()
        .map(|action| vec![InlineKeyboardButton::callback(action.label(), action.as_ref())])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

/// "📢 Join Backup Channel" URL button.
///
/// # Errors
/// Returns the parse error when the channel username does not form a valid URL.
pub fn join_backup_keyboard(backup_channel: &str) -> Result<InlineKeyboardMarkup, url::ParseError> {
    let url = Url::parse(&channel_url(backup_channel))?;
    Ok(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        "📢 Join Backup Channel",
        url,
    )]]))
}
