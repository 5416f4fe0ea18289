//! Counter board: every rendered like/comment counter, keyed by game.
//!
//! The same game card can appear several times on a page (grid, detail
//! view, ...). Each copy registers a display here once at page init;
//! synchronizers publish a single event per confirmed mutation and the
//! board fans it out. Displays only ever show what the server last said.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::api::wire::GameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    Likes { game_id: GameId, likes: u32, liked: bool },
    Comments { game_id: GameId, count: u32 },
}

impl CounterEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            CounterEvent::Likes { game_id, .. } | CounterEvent::Comments { game_id, .. } => {
                *game_id
            }
        }
    }
}

/// A rendered counter. Implementations ignore events of the other kind.
pub trait CounterDisplay {
    fn apply(&self, event: &CounterEvent);
}

#[derive(Default)]
pub struct CounterBoard {
    displays: RefCell<HashMap<GameId, Vec<Rc<dyn CounterDisplay>>>>,
}

impl CounterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, game_id: GameId, display: Rc<dyn CounterDisplay>) {
        self.displays
            .borrow_mut()
            .entry(game_id)
            .or_default()
            .push(display);
    }

    pub fn display_count(&self, game_id: GameId) -> usize {
        self.displays
            .borrow()
            .get(&game_id)
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every display of its game. Returns how many got it.
    pub fn publish(&self, event: CounterEvent) -> usize {
        // Snapshot first: a display may register more displays while applying.
        let targets: Vec<Rc<dyn CounterDisplay>> = self
            .displays
            .borrow()
            .get(&event.game_id())
            .cloned()
            .unwrap_or_default();
        for display in &targets {
            display.apply(&event);
        }
        targets.len()
    }
}
