//! Page wiring: reads the session and configuration off `<body>`, registers
//! every counter, attaches click and submit handlers, and plays the
//! entrance effects.
//!
//! Listeners live for the whole page and are forgotten on attach.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Window,
};

use crate::api::wire::GameId;
use crate::client::Client;
use crate::config::{ClientConfig, Timings};
use crate::session::Session;
use crate::view::entrance;
use crate::view::transition::{self, Surface};
use crate::web::dom::{
    CommentCounter, DomCommentForm, DomCommentList, DomSurface, LikeCounter, ToastNotifier,
    WebClock, WindowPrompt,
};
use crate::web::fetch::FetchTransport;
use crate::web::share::NavigatorShare;

pub type PageClient = Client<FetchTransport, ToastNotifier, WebClock>;

/// Initialize now, or on `DOMContentLoaded` if the document is still parsing.
pub fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if still_loading(&document) {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            if let Err(err) = init(&window) {
                log::error!("page init failed: {:?}", err);
            }
        })
        .forget();
        Ok(())
    } else {
        init(&window)
    }
}

fn still_loading(document: &Document) -> bool {
    Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .is_some_and(|state| state == "loading")
}

fn init(window: &Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let dataset = body.dataset();
    let session = Session::from_dataset(
        dataset.get("userId").as_deref(),
        dataset.get("username").as_deref(),
    );
    let config = ClientConfig::from_dataset(window.location().origin()?, |key| dataset.get(key));
    let timings = config.timings.clone();

    match session.viewer() {
        Some(viewer) => log::info!("game platform ready, viewer {} ({})", viewer.name, viewer.id),
        None => log::info!("game platform ready, anonymous viewer"),
    }

    let notifier = ToastNotifier::new(document.clone(), timings.clone());
    let client = Rc::new(Client::new(
        session,
        config,
        FetchTransport,
        notifier,
        WebClock,
    ));

    register_counters(&client, &document, &timings)?;
    wire_likes(&client, &document)?;
    wire_comments(&client, window, &document)?;
    wire_shares(&client, window, &document)?;

    play_card_entrance(&document, &timings)?;
    observe_game_cards(&document)?;
    track_parallax(window, &document)?;
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────────

fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn game_id_of(element: &Element) -> Option<GameId> {
    element.get_attribute("data-game-id")?.trim().parse().ok()
}

fn on_click<F>(target: &EventTarget, handler: F)
where
    F: FnMut(&Event) + 'static,
{
    EventListener::new_with_options(
        target,
        "click",
        EventListenerOptions::enable_prevent_default(),
        handler,
    )
    .forget();
}

// ── Counters and actions ───────────────────────────────────────────

fn register_counters(
    client: &PageClient,
    document: &Document,
    timings: &Timings,
) -> Result<(), JsValue> {
    for button in query_all(document, ".like-btn")? {
        if let Some(game_id) = game_id_of(&button) {
            client
                .board()
                .register(game_id, Rc::new(LikeCounter::new(button, timings.clone())));
        }
    }
    for button in query_all(document, ".comment-btn")? {
        let Some(game_id) = game_id_of(&button) else {
            continue;
        };
        if let Some(counter) = CommentCounter::find_in(&button, timings.clone()) {
            client.board().register(game_id, Rc::new(counter));
        }
    }
    Ok(())
}

fn wire_likes(client: &Rc<PageClient>, document: &Document) -> Result<(), JsValue> {
    for button in query_all(document, ".like-btn")? {
        let Some(game_id) = game_id_of(&button) else {
            log::warn!("like button without data-game-id");
            continue;
        };
        let client = client.clone();
        let pressed = button.clone();
        on_click(&button, move |event| {
            event.prevent_default();
            let Some(surface) = DomSurface::from_element(pressed.clone()) else {
                return;
            };
            let client = client.clone();
            spawn_local(async move {
                if let Err(err) = client.toggle_like(game_id, surface).await {
                    log::debug!("like on game {} not applied: {}", game_id, err);
                }
            });
        });
    }
    Ok(())
}

fn wire_shares(client: &Rc<PageClient>, window: &Window, document: &Document) -> Result<(), JsValue> {
    for button in query_all(document, ".share-btn")? {
        let Some(game_id) = game_id_of(&button) else {
            log::warn!("share button without data-game-id");
            continue;
        };
        let client = client.clone();
        let window = window.clone();
        let pressed = button.clone();
        on_click(&button, move |event| {
            event.prevent_default();
            let Some(surface) = DomSurface::from_element(pressed.clone()) else {
                return;
            };
            let client = client.clone();
            let platform = NavigatorShare::new(window.clone());
            spawn_local(async move {
                let outcome = client.share_game(game_id, surface, &platform).await;
                log::debug!("share of game {}: {:?}", game_id, outcome);
            });
        });
    }
    Ok(())
}

// ── Comment modal ──────────────────────────────────────────────────

fn wire_comments(client: &Rc<PageClient>, window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id("commentsList") else {
        log::debug!("no comment modal on this page");
        return Ok(());
    };
    let list = Rc::new(DomCommentList::new(container.clone()));
    let current = document
        .get_element_by_id("currentGameId")
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
    let modal = document.get_element_by_id("commentsModal");

    for button in query_all(document, ".comment-btn")? {
        let Some(game_id) = game_id_of(&button) else {
            log::warn!("comment button without data-game-id");
            continue;
        };
        let client = client.clone();
        let list = list.clone();
        let current = current.clone();
        let modal = modal.clone();
        let window = window.clone();
        let pressed = button.clone();
        on_click(&button, move |event| {
            event.prevent_default();
            if let Some(current) = &current {
                current.set_value(&game_id.to_string());
            }
            if let Some(modal) = &modal {
                if let Err(err) = show_modal(&window, modal) {
                    log::error!("opening comments modal failed: {:?}", err);
                }
            }
            let Some(surface) = DomSurface::from_element(pressed.clone()) else {
                return;
            };
            let client = client.clone();
            let list = list.clone();
            spawn_local(async move {
                let state = client.open_comments(game_id, surface, &*list).await;
                log::debug!("comments of game {}: {:?}", game_id, state);
            });
        });
    }

    if let Some(form) = document.get_element_by_id("commentForm") {
        let input = document.get_element_by_id("commentText");
        let submit = form
            .query_selector("button[type=\"submit\"]")?
            .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok());
        match (input, current.clone()) {
            (Some(input), Some(current)) => {
                let fields = Rc::new(DomCommentForm::new(input, submit));
                let client = client.clone();
                let list = list.clone();
                EventListener::new_with_options(
                    &form,
                    "submit",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        event.prevent_default();
                        let Ok(game_id) = current.value().trim().parse::<GameId>() else {
                            log::warn!("comment form submitted without a game");
                            return;
                        };
                        let client = client.clone();
                        let list = list.clone();
                        let fields = fields.clone();
                        spawn_local(async move {
                            if let Err(err) = client.submit_comment(game_id, &*fields, &*list).await {
                                log::debug!("comment on game {} not posted: {}", game_id, err);
                            }
                        });
                    },
                )
                .forget();
            }
            _ => log::warn!("comment form is missing #commentText or #currentGameId"),
        }
    }

    // Delete buttons are re-rendered with every load, so listen on the list.
    let client = client.clone();
    on_click(&container, move |event| {
        let Some(button) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|t| t.closest(".delete-comment-btn").ok().flatten())
        else {
            return;
        };
        event.prevent_default();
        let game_id = game_id_of(&button);
        let comment_id = button
            .get_attribute("data-comment-id")
            .and_then(|v| v.trim().parse().ok());
        let (Some(game_id), Some(comment_id)) = (game_id, comment_id) else {
            log::warn!("delete button without ids");
            return;
        };
        let client = client.clone();
        let list = list.clone();
        spawn_local(async move {
            if let Err(err) = client
                .delete_comment(game_id, comment_id, &WindowPrompt, &*list)
                .await
            {
                log::debug!("comment {} not deleted: {}", comment_id, err);
            }
        });
    });
    Ok(())
}

/// `bootstrap.Modal.getOrCreateInstance(modal).show()`.
fn show_modal(window: &Window, modal: &Element) -> Result<(), JsValue> {
    let bootstrap = Reflect::get(window, &JsValue::from_str("bootstrap"))?;
    let modal_class = Reflect::get(&bootstrap, &JsValue::from_str("Modal"))?;
    let get_instance: Function =
        Reflect::get(&modal_class, &JsValue::from_str("getOrCreateInstance"))?.dyn_into()?;
    let instance = get_instance.call1(&modal_class, modal)?;
    let show: Function = Reflect::get(&instance, &JsValue::from_str("show"))?.dyn_into()?;
    show.call0(&instance)?;
    Ok(())
}

// ── Entrance effects ───────────────────────────────────────────────

fn play_card_entrance(document: &Document, timings: &Timings) -> Result<(), JsValue> {
    let cards = query_all(document, ".card, .hero-section")?;
    for (index, card) in cards.into_iter().enumerate() {
        let Some(surface) = DomSurface::from_element(card) else {
            continue;
        };
        let rest = entrance::card_entrance(timings, index).apply_leading(&surface);
        transition::animate(&WebClock, rest, surface);
    }
    Ok(())
}

fn observe_game_cards(document: &Document) -> Result<(), JsValue> {
    let cards = query_all(document, ".game-card")?;
    if cards.is_empty() {
        return Ok(());
    }

    let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                if let Some(card) = DomSurface::from_element(entry.target()) {
                    entrance::scroll_shown().apply_leading(&card);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(entrance::REVEAL_THRESHOLD));
    options.set_root_margin(entrance::REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();

    for card in cards {
        if let Some(surface) = DomSurface::from_element(card.clone()) {
            entrance::scroll_hidden().apply_leading(&surface);
        }
        observer.observe(&card);
    }
    Ok(())
}

fn track_parallax(window: &Window, document: &Document) -> Result<(), JsValue> {
    let shapes: Vec<DomSurface> = query_all(document, ".shape")?
        .into_iter()
        .filter_map(DomSurface::from_element)
        .collect();
    if shapes.is_empty() {
        return Ok(());
    }

    let window = window.clone();
    EventListener::new(document, "mousemove", move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let x = f64::from(mouse.client_x()) / width;
        let y = f64::from(mouse.client_y()) / height;
        for (index, shape) in shapes.iter().enumerate() {
            shape.set_style("transform", &entrance::parallax_transform(index, x, y));
        }
    })
    .forget();
    Ok(())
}
