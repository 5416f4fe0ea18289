//! Like toggling.
//!
//! Confirmation-only: nothing changes on screen until the server answers,
//! and then every like display of the game takes the server's numbers.
//! Overlapping toggles for one game are last-response-wins.

use crate::api::Transport;
use crate::api::wire::{GameId, LikeState};
use crate::client::Client;
use crate::error::ActionError;
use crate::sync::counter::CounterEvent;
use crate::view::notify::{Notifier, Severity, report};
use crate::view::transition::{Clock, Surface};

pub const SIGN_IN_TO_LIKE: &str = "Войдите в систему чтобы ставить лайки!";
pub const LIKED: &str = "❤️ Вы поставили лайк!";
pub const UNLIKED: &str = "💔 Вы убрали лайк";
pub const LIKE_FAILED: &str = "Ошибка при обновлении лайка";

impl<T: Transport, N: Notifier, C: Clock> Client<T, N, C> {
    /// Toggle the viewer's like on `game_id`. `pressed` is the control that
    /// was clicked; it gets press feedback whatever the outcome.
    pub async fn toggle_like<S: Surface + 'static>(
        &self,
        game_id: GameId,
        pressed: S,
    ) -> Result<LikeState, ActionError> {
        if !self.session.is_signed_in() {
            let err = ActionError::SignInRequired;
            report(&self.notifier, &err, SIGN_IN_TO_LIKE);
            return Err(err);
        }

        self.press(pressed);

        match self.api.toggle_like(game_id).await {
            Ok(state) => {
                let shown = self.board.publish(CounterEvent::Likes {
                    game_id,
                    likes: state.likes,
                    liked: state.liked,
                });
                log::debug!("game {} likes={} on {} displays", game_id, state.likes, shown);
                if state.liked {
                    self.notifier.notify(LIKED, Severity::Success);
                } else {
                    self.notifier.notify(UNLIKED, Severity::Info);
                }
                Ok(state)
            }
            Err(err) => {
                report(&self.notifier, &err, LIKE_FAILED);
                Err(err)
            }
        }
    }
}
