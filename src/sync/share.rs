//! Sharing a game link.
//!
//! Tries the platform share sheet, then the async clipboard, then the legacy
//! copy command. If all three fail the link is shown in a notification so the
//! viewer can copy it by hand.

use crate::api::Transport;
use crate::api::wire::GameId;
use crate::client::Client;
use crate::view::notify::{Notifier, Severity};
use crate::view::transition::{Clock, Surface};

pub const SHARE_TITLE: &str = "Посмотри эту игру на Game Platform!";
pub const SHARE_TEXT: &str = "Я нашел крутую игру, посмотри!";
pub const SHARED: &str = "✅ Игра успешно опубликована!";
pub const COPIED: &str = "📋 Ссылка скопирована в буфер обмена!";
pub const LEGACY_COPIED: &str = "📋 Ссылка скопирована!";

/// Public link to a game: `{origin}/play/{id}`.
pub fn share_url(origin: &str, game_id: GameId) -> String {
    format!("{}/play/{}", origin.trim_end_matches('/'), game_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareRequest {
    pub fn for_game(origin: &str, game_id: GameId) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: SHARE_TEXT.to_string(),
            url: share_url(origin, game_id),
        }
    }
}

/// Browser sharing capabilities. Errors carry the platform's reason, which is
/// only logged.
#[allow(async_fn_in_trait)]
pub trait SharePlatform {
    fn can_share(&self) -> bool;
    async fn share(&self, request: &ShareRequest) -> Result<(), String>;
    fn can_write_clipboard(&self) -> bool;
    async fn write_clipboard(&self, text: &str) -> Result<(), String>;
    /// Synchronous copy through a temporary text field. `true` on success.
    fn legacy_copy(&self, text: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    LegacyCopied,
    /// Nothing worked; the link was shown instead.
    Unavailable,
}

impl<T: Transport, N: Notifier, C: Clock> Client<T, N, C> {
    /// Share the link of `game_id` from the clicked control `pressed`.
    pub async fn share_game<S, P>(&self, game_id: GameId, pressed: S, platform: &P) -> ShareOutcome
    where
        S: Surface + 'static,
        P: SharePlatform,
    {
        self.press(pressed);
        let request = ShareRequest::for_game(&self.config.origin, game_id);

        if platform.can_share() {
            match platform.share(&request).await {
                Ok(()) => {
                    self.notifier.notify(SHARED, Severity::Success);
                    return ShareOutcome::Shared;
                }
                // Includes the viewer closing the sheet.
                Err(reason) => log::info!("share sheet failed: {}", reason),
            }
        }
        self.copy_link(&request.url, platform).await
    }

    /// Copy `url` with the best clipboard the platform has.
    pub async fn copy_link<P: SharePlatform>(&self, url: &str, platform: &P) -> ShareOutcome {
        if platform.can_write_clipboard() {
            match platform.write_clipboard(url).await {
                Ok(()) => {
                    self.notifier.notify(COPIED, Severity::Success);
                    return ShareOutcome::Copied;
                }
                Err(reason) => log::warn!("clipboard write failed: {}", reason),
            }
        }

        if platform.legacy_copy(url) {
            self.notifier.notify(LEGACY_COPIED, Severity::Success);
            ShareOutcome::LegacyCopied
        } else {
            log::warn!("no way to copy {}", url);
            self.notifier.notify(url, Severity::Info);
            ShareOutcome::Unavailable
        }
    }
}
