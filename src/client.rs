//! The page client: session, configuration, backend, notifier, clock and
//! counter board in one place.
//!
//! Built once at page init and shared by every event handler. The
//! synchronizers in `sync` are `impl` blocks on this type.

use crate::api::{GameApi, Transport};
use crate::config::ClientConfig;
use crate::session::Session;
use crate::sync::comments::{CommentModal, ModalState};
use crate::sync::counter::CounterBoard;
use crate::view::notify::Notifier;
use crate::view::transition::{self, Clock, Surface};

pub struct Client<T, N, C> {
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    pub(crate) api: GameApi<T>,
    pub(crate) notifier: N,
    pub(crate) clock: C,
    pub(crate) board: CounterBoard,
    pub(crate) modal: CommentModal,
}

impl<T: Transport, N: Notifier, C: Clock> Client<T, N, C> {
    pub fn new(session: Session, config: ClientConfig, transport: T, notifier: N, clock: C) -> Self {
        let api = GameApi::new(transport, config.api_base.clone());
        Self {
            session,
            config,
            api,
            notifier,
            clock,
            board: CounterBoard::new(),
            modal: CommentModal::default(),
        }
    }

    pub fn board(&self) -> &CounterBoard {
        &self.board
    }

    pub fn modal_state(&self) -> ModalState {
        self.modal.state()
    }

    /// Fire the press feedback on a clicked control.
    pub fn press<S: Surface + 'static>(&self, control: S) {
        transition::animate(&self.clock, transition::press(&self.config.timings), control);
    }
}
