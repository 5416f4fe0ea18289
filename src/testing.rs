//! Test doubles: an in-memory backend, a manual clock and recording
//! stand-ins for every DOM seam.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use chrono::{DateTime, FixedOffset, TimeZone};
use futures::executor::block_on;
use serde_json::json;

use crate::api::wire::{Comment, CommentId, GameId, UserId};
use crate::api::{ApiRequest, Method, Transport};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::ActionError;
use crate::session::Session;
use crate::sync::comments::{CommentForm, CommentList, Prompt};
use crate::sync::counter::{CounterDisplay, CounterEvent};
use crate::sync::share::{SharePlatform, ShareRequest};
use crate::view::notify::{Notifier, Severity};
use crate::view::transition::{Clock, Surface};

pub const TEST_ORIGIN: &str = "https://games.example";

/// Timestamp the fake server stamps on new comments: 30 s before test "now".
pub const FAKE_TIMESTAMP: &str = "2026-10-16T11:59:30";

// ── Journal ────────────────────────────────────────────────────────

/// Ordered log shared by the clock and every recording surface.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

// ── Clock ──────────────────────────────────────────────────────────

/// Sleeps are journaled and yield once; spawned tasks wait in a queue until
/// `run_spawned`.
#[derive(Clone)]
pub struct TestClock {
    inner: Rc<ClockInner>,
}

struct ClockInner {
    journal: Journal,
    queue: RefCell<VecDeque<Pin<Box<dyn Future<Output = ()>>>>>,
    now: DateTime<FixedOffset>,
}

impl TestClock {
    pub fn new(journal: &Journal) -> Self {
        let now = FixedOffset::east_opt(3 * 3600)
            .and_then(|tz| tz.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).single())
            .unwrap();
        Self {
            inner: Rc::new(ClockInner {
                journal: journal.clone(),
                queue: RefCell::new(VecDeque::new()),
                now,
            }),
        }
    }

    /// Run queued tasks to completion, including ones they spawn.
    pub fn run_spawned(&self) {
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            match next {
                Some(task) => block_on(task),
                None => break,
            }
        }
    }
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

impl Clock for TestClock {
    async fn sleep(&self, ms: u32) {
        self.inner.journal.push(format!("wait {}", ms));
        YieldOnce(false).await;
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        self.inner.queue.borrow_mut().push_back(Box::pin(task));
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.inner.now
    }
}

// ── Surfaces ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RecordingSurface {
    inner: Rc<SurfaceInner>,
}

struct SurfaceInner {
    name: String,
    journal: Journal,
    styles: RefCell<HashMap<String, String>>,
    text: RefCell<String>,
    attached: Cell<bool>,
}

impl RecordingSurface {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            inner: Rc::new(SurfaceInner {
                name: name.into(),
                journal: journal.clone(),
                styles: RefCell::new(HashMap::new()),
                text: RefCell::new(String::new()),
                attached: Cell::new(true),
            }),
        }
    }

    pub fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.inner.styles.borrow().get(property).cloned()
    }

    /// Take the surface out of the document without journaling, as a
    /// viewer closing a toast by hand would.
    pub fn detach(&self) {
        self.inner.attached.set(false);
    }

    fn log(&self, what: String) {
        self.inner.journal.push(format!("{}: {}", self.inner.name, what));
    }
}

impl Surface for RecordingSurface {
    fn set_style(&self, property: &str, value: &str) {
        self.inner
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        self.log(format!("{}={}", property, value));
    }

    fn set_text(&self, text: &str) {
        *self.inner.text.borrow_mut() = text.to_string();
        self.log(format!("text={}", text));
    }

    fn scroll_into_view(&self) {
        self.log("scrolled".to_string());
    }

    fn remove(&self) {
        self.inner.attached.set(false);
        self.log("removed".to_string());
    }

    fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }
}

// ── Notifier and counters ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.sent.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.sent.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.sent.borrow_mut().push((message.to_string(), severity));
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    events: RefCell<Vec<CounterEvent>>,
}

impl RecordingDisplay {
    /// Last like state shown.
    pub fn likes(&self) -> Option<(u32, bool)> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            CounterEvent::Likes { likes, liked, .. } => Some((*likes, *liked)),
            _ => None,
        })
    }

    /// Last comment count shown.
    pub fn comments(&self) -> Option<u32> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            CounterEvent::Comments { count, .. } => Some(*count),
            _ => None,
        })
    }
}

impl CounterDisplay for RecordingDisplay {
    fn apply(&self, event: &CounterEvent) {
        self.events.borrow_mut().push(*event);
    }
}

// ── Comment modal ──────────────────────────────────────────────────

pub struct FakeCommentList {
    journal: Journal,
    placeholder: RefCell<Option<String>>,
    items: RefCell<Vec<(CommentId, String, RecordingSurface)>>,
}

impl FakeCommentList {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            placeholder: RefCell::new(None),
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn placeholder(&self) -> Option<String> {
        self.placeholder.borrow().clone()
    }

    /// Ids of items still in the list, in order.
    pub fn visible(&self) -> Vec<CommentId> {
        self.items
            .borrow()
            .iter()
            .filter(|(_, _, s)| s.is_attached())
            .map(|(id, _, _)| *id)
            .collect()
    }

    pub fn item(&self, comment_id: CommentId) -> Option<RecordingSurface> {
        self.items
            .borrow()
            .iter()
            .find(|(id, _, _)| *id == comment_id)
            .map(|(_, _, s)| s.clone())
    }

    pub fn html_of(&self, comment_id: CommentId) -> Option<String> {
        self.items
            .borrow()
            .iter()
            .find(|(id, _, _)| *id == comment_id)
            .map(|(_, html, _)| html.clone())
    }

    /// Comment bodies of the visible items.
    pub fn texts(&self) -> Vec<String> {
        const OPEN: &str = r#"<div class="text">"#;
        self.items
            .borrow()
            .iter()
            .filter(|(_, _, s)| s.is_attached())
            .filter_map(|(_, html, _)| {
                let start = html.find(OPEN)? + OPEN.len();
                let len = html[start..].find("</div>")?;
                Some(html[start..start + len].to_string())
            })
            .collect()
    }

    fn drop_items(&self) {
        for (_, _, surface) in self.items.borrow_mut().drain(..) {
            surface.detach();
        }
    }
}

impl CommentList for FakeCommentList {
    type Item = RecordingSurface;

    fn show_placeholder(&self, html: &str) {
        self.drop_items();
        *self.placeholder.borrow_mut() = Some(html.to_string());
    }

    fn clear(&self) {
        self.drop_items();
        *self.placeholder.borrow_mut() = None;
    }

    fn append(&self, comment_id: CommentId, html: &str) -> Option<RecordingSurface> {
        let surface = RecordingSurface::new(format!("comment-{}", comment_id), &self.journal);
        self.items
            .borrow_mut()
            .push((comment_id, html.to_string(), surface.clone()));
        Some(surface)
    }

    fn find(&self, comment_id: CommentId) -> Option<RecordingSurface> {
        self.items
            .borrow()
            .iter()
            .find(|(id, _, s)| *id == comment_id && s.is_attached())
            .map(|(_, _, s)| s.clone())
    }
}

pub struct FakeForm {
    text: RefCell<String>,
    busy: RefCell<Vec<bool>>,
    cleared: Cell<bool>,
}

impl FakeForm {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: RefCell::new(text.to_string()),
            busy: RefCell::new(Vec::new()),
            cleared: Cell::new(false),
        }
    }

    pub fn busy_history(&self) -> Vec<bool> {
        self.busy.borrow().clone()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared.get()
    }
}

impl CommentForm for FakeForm {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn clear(&self) {
        self.text.borrow_mut().clear();
        self.cleared.set(true);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.borrow_mut().push(busy);
    }
}

pub struct FixedPrompt {
    answer: bool,
    asked: RefCell<Vec<String>>,
}

impl FixedPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompt for FixedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answer
    }
}

// ── Share ──────────────────────────────────────────────────────────

/// A platform without any capability until configured.
#[derive(Default)]
pub struct FakeSharePlatform {
    share: Option<Result<(), String>>,
    clipboard: Option<Result<(), String>>,
    legacy: bool,
    shared: RefCell<Option<ShareRequest>>,
    copied: RefCell<Option<String>>,
    legacy_copied: RefCell<Option<String>>,
}

impl FakeSharePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_share(mut self, result: Result<(), String>) -> Self {
        self.share = Some(result);
        self
    }

    pub fn with_clipboard(mut self, result: Result<(), String>) -> Self {
        self.clipboard = Some(result);
        self
    }

    pub fn with_legacy(mut self, works: bool) -> Self {
        self.legacy = works;
        self
    }

    pub fn shared(&self) -> Option<ShareRequest> {
        self.shared.borrow().clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.copied.borrow().clone()
    }

    pub fn legacy_copied(&self) -> Option<String> {
        self.legacy_copied.borrow().clone()
    }
}

impl SharePlatform for FakeSharePlatform {
    fn can_share(&self) -> bool {
        self.share.is_some()
    }

    async fn share(&self, request: &ShareRequest) -> Result<(), String> {
        *self.shared.borrow_mut() = Some(request.clone());
        self.share.clone().unwrap_or(Err("unsupported".to_string()))
    }

    fn can_write_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), String> {
        let result = self.clipboard.clone().unwrap_or(Err("unsupported".to_string()));
        if result.is_ok() {
            *self.copied.borrow_mut() = Some(text.to_string());
        }
        result
    }

    fn legacy_copy(&self, text: &str) -> bool {
        if self.legacy {
            *self.legacy_copied.borrow_mut() = Some(text.to_string());
        }
        self.legacy
    }
}

// ── Backend ────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeGame {
    likes: u32,
    liked_by: Vec<UserId>,
    comments: Vec<Comment>,
}

/// Value of `key` in a form body, decoded.
pub fn form_value(body: &str, key: &str) -> Option<String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (form_decode(k) == key).then(|| form_decode(v))
        })
}

/// Undo form encoding. Broken escapes stay as written.
pub fn form_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = input
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.bytes().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escaped {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// In-memory backend with the same routes and replies as the real one.
/// Every request is recorded, including ones that fail.
pub struct FakeServer {
    viewer: Option<(UserId, String)>,
    games: RefCell<BTreeMap<GameId, FakeGame>>,
    requests: RefCell<Vec<ApiRequest>>,
    offline: Cell<bool>,
    listing_fails: Cell<bool>,
    listing_delay: Cell<u32>,
}

type Reply = (u16, String);

fn ok(body: serde_json::Value) -> Reply {
    (200, body.to_string())
}

fn refuse(error: &str) -> Reply {
    ok(json!({ "success": false, "error": error }))
}

impl FakeServer {
    fn build(viewer: Option<(UserId, String)>) -> Rc<Self> {
        Rc::new(Self {
            viewer,
            games: RefCell::new(BTreeMap::new()),
            requests: RefCell::new(Vec::new()),
            offline: Cell::new(false),
            listing_fails: Cell::new(false),
            listing_delay: Cell::new(0),
        })
    }

    /// Server session signed in as `id`.
    pub fn with_viewer(id: UserId, name: &str) -> Rc<Self> {
        Self::build(Some((id, name.to_string())))
    }

    /// Server session without a user.
    pub fn anonymous() -> Rc<Self> {
        Self::build(None)
    }

    pub fn add_game(&self, game_id: GameId) {
        self.games.borrow_mut().entry(game_id).or_default();
    }

    pub fn set_likes(&self, game_id: GameId, likes: u32) {
        self.games.borrow_mut().entry(game_id).or_default().likes = likes;
    }

    /// Store a comment directly, as if posted from another page.
    pub fn add_comment_to(&self, game_id: GameId, user_id: UserId, user: &str, text: &str) -> CommentId {
        let mut games = self.games.borrow_mut();
        let game = games.entry(game_id).or_default();
        let id = game.comments.len() as CommentId + 1;
        game.comments.push(Comment {
            id,
            user: user.to_string(),
            user_id,
            text: text.to_string(),
            timestamp: FAKE_TIMESTAMP.to_string(),
        });
        id
    }

    pub fn comment_count(&self, game_id: GameId) -> usize {
        self.games
            .borrow()
            .get(&game_id)
            .map_or(0, |g| g.comments.len())
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// Every request fails before reaching a route.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// `/api/games` answers 500.
    pub fn fail_listing(&self, fails: bool) {
        self.listing_fails.set(fails);
    }

    /// The next `/api/games` reply is computed at once but handed back only
    /// after `polls` extra polls.
    pub fn delay_listing(&self, polls: u32) {
        self.listing_delay.set(polls);
    }

    fn route(&self, request: &ApiRequest) -> Reply {
        let mut router = matchit::Router::new();
        router.insert("/like/{game_id}", "like").ok();
        router.insert("/api/games", "games").ok();
        router.insert("/comment/{game_id}", "comment").ok();
        router.insert("/delete_comment/{game_id}/{comment_id}", "delete_comment").ok();

        let Ok(matched) = router.at(&request.path) else {
            return (404, "Not Found".to_string());
        };
        let id = |name: &str| matched.params.get(name).and_then(|v| v.parse::<u64>().ok());

        match (*matched.value, request.method) {
            ("games", Method::Get) => self.list(),
            ("like", Method::Get) => match id("game_id") {
                Some(game_id) => self.like(game_id),
                None => (404, "Not Found".to_string()),
            },
            ("comment", Method::Post) => match id("game_id") {
                Some(game_id) => self.comment(game_id, request.body.as_deref().unwrap_or("")),
                None => (404, "Not Found".to_string()),
            },
            ("delete_comment", Method::Get) => match (id("game_id"), id("comment_id")) {
                (Some(game_id), Some(comment_id)) => self.delete(game_id, comment_id),
                _ => (404, "Not Found".to_string()),
            },
            _ => (405, "Method Not Allowed".to_string()),
        }
    }

    fn list(&self) -> Reply {
        if self.listing_fails.get() {
            return (500, "Internal Server Error".to_string());
        }
        let games: Vec<serde_json::Value> = self
            .games
            .borrow()
            .iter()
            .map(|(id, game)| {
                json!({
                    "id": id,
                    "title": format!("Игра {}", id),
                    "likes": game.likes,
                    "comments": game.comments,
                })
            })
            .collect();
        ok(serde_json::Value::Array(games))
    }

    fn like(&self, game_id: GameId) -> Reply {
        let Some((viewer_id, _)) = &self.viewer else {
            return refuse("Войдите в систему!");
        };
        let mut games = self.games.borrow_mut();
        let Some(game) = games.get_mut(&game_id) else {
            return refuse("Игра не найдена!");
        };
        let liked = match game.liked_by.iter().position(|id| id == viewer_id) {
            Some(pos) => {
                game.liked_by.remove(pos);
                game.likes = game.likes.saturating_sub(1);
                false
            }
            None => {
                game.liked_by.push(*viewer_id);
                game.likes += 1;
                true
            }
        };
        ok(json!({ "success": true, "likes": game.likes, "is_liked": liked }))
    }

    fn comment(&self, game_id: GameId, body: &str) -> Reply {
        let Some((viewer_id, viewer_name)) = &self.viewer else {
            return refuse("Войдите в систему!");
        };
        let text = form_value(body, "comment").unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return refuse("Комментарий не может быть пустым!");
        }
        if !self.games.borrow().contains_key(&game_id) {
            return refuse("Игра не найдена!");
        }
        let id = self.add_comment_to(game_id, *viewer_id, viewer_name, &text);
        let games = self.games.borrow();
        let comment = games
            .get(&game_id)
            .and_then(|g| g.comments.iter().find(|c| c.id == id));
        ok(json!({ "success": true, "comment": comment }))
    }

    fn delete(&self, game_id: GameId, comment_id: CommentId) -> Reply {
        let Some((viewer_id, _)) = &self.viewer else {
            return refuse("Войдите в систему!");
        };
        let mut games = self.games.borrow_mut();
        let Some(game) = games.get_mut(&game_id) else {
            return refuse("Игра не найдена!");
        };
        let Some(pos) = game.comments.iter().position(|c| c.id == comment_id) else {
            return refuse("Комментарий не найден!");
        };
        if game.comments[pos].user_id != *viewer_id {
            return refuse("Нет прав для удаления!");
        }
        game.comments.remove(pos);
        ok(json!({ "success": true }))
    }
}

impl Transport for FakeServer {
    async fn send(&self, request: ApiRequest) -> Result<String, ActionError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline.get() {
            return Err(ActionError::Network("connection refused".to_string()));
        }
        let (status, body) = self.route(&request);
        if request.path == "/api/games" {
            for _ in 0..self.listing_delay.replace(0) {
                YieldOnce(false).await;
            }
        }
        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(ActionError::Status(status))
        }
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub type TestClient = Client<Rc<FakeServer>, Rc<RecordingNotifier>, TestClock>;

/// A client wired to a fake server, a recording notifier and a test clock
/// that share one journal.
pub struct Harness {
    pub client: TestClient,
    pub server: Rc<FakeServer>,
    pub notifier: Rc<RecordingNotifier>,
    pub clock: TestClock,
    pub journal: Journal,
}

impl Harness {
    pub fn new(session: Session, server: Rc<FakeServer>) -> Self {
        let journal = Journal::default();
        let clock = TestClock::new(&journal);
        let notifier = Rc::new(RecordingNotifier::default());
        let client = Client::new(
            session,
            ClientConfig::new(TEST_ORIGIN),
            server.clone(),
            notifier.clone(),
            clock.clone(),
        );
        Self {
            client,
            server,
            notifier,
            clock,
            journal,
        }
    }
}
