//! Deep links: `https://t.me/<bot>?start=<prefix><code>`

use strum::{Display, EnumString};

/// What a start payload points at. The prefix only tells the reader what to
/// expect; redemption looks the code up the same way for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LinkKind {
    Media,
    Batch,
}

impl LinkKind {
    pub fn prefix(self) -> &'static str {
        match self {
            LinkKind::Media => "media_",
            LinkKind::Batch => "batch_",
        }
    }
}

/// Builds the deep link a recipient opens to redeem `code`.
pub fn build_start_link(bot_username: &str, kind: LinkKind, code: &str) -> String {
    format!(
        "https://t.me/{}?start={}{}",
        bot_username.trim_start_matches('@'),
        kind.prefix(),
        code
    )
}

/// Extracts the access code from a `/start` payload.
///
/// One leading `media_` or `batch_` prefix is removed; a bare code is accepted
/// as well. Returns `None` for an empty payload.
pub fn parse_start_payload(payload: &str) -> Option<String> {
    let payload = payload.split_whitespace().next()?;
    let code = payload
        .strip_prefix(LinkKind::Media.prefix())
        .or_else(|| payload.strip_prefix(LinkKind::Batch.prefix()))
        .unwrap_or(payload);
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

/// Public URL of a channel given its username.
pub fn channel_url(username: &str) -> String {
    format!("https://t.me/{}", username.trim_start_matches('@'))
}
