//! Comment modal: loading, posting and deleting comments.
//!
//! Comments have no dedicated fetch endpoint; the modal reads them out of
//! the full `/api/games` collection, and so does the badge refresh after a
//! post or delete. Badges always show the server's count, never a local
//! increment.

use std::cell::Cell;

use crate::api::Transport;
use crate::api::wire::{Comment, CommentId, GameId};
use crate::client::Client;
use crate::error::ActionError;
use crate::sync::counter::CounterEvent;
use crate::view::notify::{Notifier, Severity, report};
use crate::view::render::{self, EMPTY_PLACEHOLDER, ERROR_PLACEHOLDER, LOADING_PLACEHOLDER};
use crate::view::transition::{self, Clock, Surface};

pub const EMPTY_COMMENT: &str = "Введите текст комментария";
pub const COMMENT_ADDED: &str = "💬 Комментарий добавлен";
pub const SUBMIT_FAILED: &str = "Ошибка при отправке комментария";
pub const CONFIRM_DELETE: &str = "Удалить этот комментарий?";
pub const COMMENT_DELETED: &str = "🗑️ Комментарий удален";
pub const DELETE_FAILED: &str = "Ошибка при удалении комментария";

/// What the modal's comment list currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Idle,
    Loading,
    Populated,
    Empty,
    LoadError,
}

/// Modal state plus a load generation. Starting a load bumps the
/// generation; a load that finds a newer generation stops touching the list.
#[derive(Debug)]
pub struct CommentModal {
    state: Cell<ModalState>,
    generation: Cell<u64>,
}

impl Default for CommentModal {
    fn default() -> Self {
        Self {
            state: Cell::new(ModalState::Idle),
            generation: Cell::new(0),
        }
    }
}

impl CommentModal {
    pub fn state(&self) -> ModalState {
        self.state.get()
    }

    fn set(&self, state: ModalState) {
        self.state.set(state);
    }

    fn begin_load(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(ModalState::Loading);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Take the list over for a freshly posted comment. Any pending load is
    /// cancelled. Returns the state the list was in before.
    fn supersede(&self) -> ModalState {
        self.generation.set(self.generation.get() + 1);
        self.state.replace(ModalState::Populated)
    }
}

/// The modal's comment container.
pub trait CommentList {
    type Item: Surface + Clone + 'static;

    /// Replace the whole content with placeholder markup.
    fn show_placeholder(&self, html: &str);
    fn clear(&self);
    /// Append rendered comment markup; returns the inserted element.
    fn append(&self, comment_id: CommentId, html: &str) -> Option<Self::Item>;
    fn find(&self, comment_id: CommentId) -> Option<Self::Item>;
}

/// The comment input and its submit button.
pub trait CommentForm {
    fn text(&self) -> String;
    fn clear(&self);
    /// Disable the submit control while a post is in flight.
    fn set_busy(&self, busy: bool);
}

/// Blocking yes/no question to the viewer.
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The viewer answered no; nothing was sent.
    Declined,
}

impl<T: Transport, N: Notifier, C: Clock> Client<T, N, C> {
    /// Open the comment modal for `game_id` from `pressed` and fill it.
    pub async fn open_comments<S, L>(&self, game_id: GameId, pressed: S, list: &L) -> ModalState
    where
        S: Surface + 'static,
        L: CommentList,
    {
        self.press(pressed);
        self.load_comments(game_id, list).await
    }

    /// Fill `list` with the comments of `game_id`, one at a time.
    ///
    /// A later call supersedes this one: once a newer load has started, this
    /// one stops without touching the list again.
    pub async fn load_comments<L: CommentList>(&self, game_id: GameId, list: &L) -> ModalState {
        let generation = self.modal.begin_load();
        list.show_placeholder(LOADING_PLACEHOLDER);

        let comments = match self.api.comments_of(game_id).await {
            Ok(comments) => comments.unwrap_or_default(),
            Err(err) => {
                log::error!("loading comments of game {} failed: {}", game_id, err);
                if self.modal.is_current(generation) {
                    list.show_placeholder(ERROR_PLACEHOLDER);
                    self.modal.set(ModalState::LoadError);
                }
                return self.modal.state();
            }
        };

        if !self.modal.is_current(generation) {
            log::debug!("comment load for game {} superseded", game_id);
            return self.modal.state();
        }

        list.clear();
        if comments.is_empty() {
            list.show_placeholder(EMPTY_PLACEHOLDER);
            self.modal.set(ModalState::Empty);
            return ModalState::Empty;
        }
        self.modal.set(ModalState::Populated);

        let timings = &self.config.timings;
        let now = self.clock.now();
        let last = comments.len() - 1;
        for (index, comment) in comments.iter().enumerate() {
            let html = render::render_comment(comment, &self.session, game_id, &now);
            if let Some(item) = list.append(comment.id, &html) {
                transition::animate(&self.clock, transition::comment_enter(timings), item);
            }
            if index < last {
                self.clock.sleep(timings.comment_stagger_ms).await;
                if !self.modal.is_current(generation) {
                    log::debug!("comment load for game {} superseded", game_id);
                    return self.modal.state();
                }
            }
        }
        ModalState::Populated
    }

    /// Post the form's text as a new comment on `game_id`.
    pub async fn submit_comment<F, L>(
        &self,
        game_id: GameId,
        form: &F,
        list: &L,
    ) -> Result<Comment, ActionError>
    where
        F: CommentForm,
        L: CommentList,
    {
        let raw = form.text();
        let text = raw.trim();
        if text.is_empty() {
            let err = ActionError::EmptyComment;
            report(&self.notifier, &err, EMPTY_COMMENT);
            return Err(err);
        }

        form.set_busy(true);
        let result = self.post_comment(game_id, text, form, list).await;
        form.set_busy(false);
        result
    }

    async fn post_comment<F, L>(
        &self,
        game_id: GameId,
        text: &str,
        form: &F,
        list: &L,
    ) -> Result<Comment, ActionError>
    where
        F: CommentForm,
        L: CommentList,
    {
        let comment = match self.api.add_comment(game_id, text).await {
            Ok(comment) => comment,
            Err(err) => {
                report(&self.notifier, &err, SUBMIT_FAILED);
                return Err(err);
            }
        };

        if self.modal.supersede() != ModalState::Populated {
            list.clear();
        }
        let timings = &self.config.timings;
        let html = render::render_comment(&comment, &self.session, game_id, &self.clock.now());
        if let Some(item) = list.append(comment.id, &html) {
            transition::animate(&self.clock, transition::comment_enter(timings), item.clone());
            transition::animate(&self.clock, transition::reveal(timings), item);
        }
        form.clear();
        self.notifier.notify(COMMENT_ADDED, Severity::Success);

        if let Err(err) = self.refresh_comment_count(game_id).await {
            log::warn!("comment badge refresh for game {} failed: {}", game_id, err);
        }
        Ok(comment)
    }

    /// Ask, then delete `comment_id` from `game_id`.
    pub async fn delete_comment<P, L>(
        &self,
        game_id: GameId,
        comment_id: CommentId,
        prompt: &P,
        list: &L,
    ) -> Result<DeleteOutcome, ActionError>
    where
        P: Prompt,
        L: CommentList,
    {
        if !prompt.confirm(CONFIRM_DELETE) {
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.api.delete_comment(game_id, comment_id).await {
            report(&self.notifier, &err, DELETE_FAILED);
            return Err(err);
        }

        match list.find(comment_id) {
            Some(item) => transition::animate(
                &self.clock,
                transition::comment_exit(&self.config.timings),
                item,
            ),
            None => log::debug!("comment {} not in the list", comment_id),
        }
        self.notifier.notify(COMMENT_DELETED, Severity::Success);

        if let Err(err) = self.refresh_comment_count(game_id).await {
            log::warn!("comment badge refresh for game {} failed: {}", game_id, err);
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-read the comment count of `game_id` from the server and publish it.
    /// `None` if the collection no longer has the game.
    pub async fn refresh_comment_count(&self, game_id: GameId) -> Result<Option<u32>, ActionError> {
        let count = self
            .api
            .comments_of(game_id)
            .await?
            .map(|comments| comments.len() as u32);
        if let Some(count) = count {
            self.board.publish(CounterEvent::Comments { game_id, count });
        }
        Ok(count)
    }
}
