//! DOM adapter: builds the page scaffold (board, HUD, toast), owns the single
//! `GameSession` behind a thread-local cell and translates pointer / touch /
//! keyboard events plus the 1 Hz timer interval into core calls. Core events
//! flow back out through `present_events`, which is the only place gameplay
//! notifications turn into DOM mutation and sound.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    window, AddEventListenerOptions, AudioContext, Document, Element, HtmlElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent, Window,
};

use crate::audio::{self, Cue};
use crate::game::{
    format_elapsed, BoardBounds, Difficulty, GameConfig, GameEvent, GameSession, Phase, Point,
    Prng, TileId,
};
use crate::{CHARACTERS, MATCH_QUOTES};

// --- Scaffold constants -------------------------------------------------------

const BOARD_ID: &str = "sm-board";
const SCORE_ID: &str = "sm-score";
const MATCHES_ID: &str = "sm-matches";
const REMAINING_ID: &str = "sm-remaining";
const TIMER_ID: &str = "sm-timer";
const TOAST_ID: &str = "sm-toast";
const START_ID: &str = "sm-start";
const RESTART_ID: &str = "sm-restart";
const DIFFICULTY_ID: &str = "sm-difficulty";
const STYLE_ID: &str = "sm-style";

const TILE_SIZE: f64 = 90.0;
const DEFAULT_BOARD_W: f64 = 800.0;
const DEFAULT_BOARD_H: f64 = 520.0;

const STYLE_CSS: &str = "\
#sm-wrap { max-width: 860px; margin: 0 auto; font-family: 'Fira Code', monospace; color: #eee; }\
#sm-hud { display: flex; gap: 18px; align-items: center; padding: 8px 2px; font-size: 15px; }\
#sm-hud button, #sm-hud select { font: inherit; padding: 4px 12px; border-radius: 6px; border: 1px solid #444; background: #222; color: #ffd166; cursor: pointer; }\
#sm-hud button[disabled] { opacity: 0.45; cursor: default; }\
#sm-board { position: relative; width: 800px; height: 520px; max-width: 94vw; background: #181818; border: 2px solid #222; border-radius: 18px; overflow: hidden; touch-action: none; }\
#sm-board.game-over { filter: saturate(0.4) brightness(0.8); }\
.tile { position: absolute; border-radius: 12px; overflow: hidden; cursor: grab; user-select: none; box-shadow: 0 4px 14px rgba(0,0,0,0.35); }\
.tile img { width: 100%; height: 100%; object-fit: cover; pointer-events: none; }\
.tile.dragging { cursor: grabbing; box-shadow: 0 10px 26px rgba(0,0,0,0.5); }\
.tile.highlight { outline: 3px solid #ffd166; }\
.tile.match-animation { transition: transform 300ms ease, opacity 300ms ease; transform: scale(1.15); }\
.tile.matched { opacity: 0.25; pointer-events: none; }\
.quote-popup { position: absolute; left: 50%; top: 50%; transform: translate(-50%,-50%); z-index: 50; padding: 14px 20px; background: rgba(0,0,0,0.8); border: 1px solid #333; border-radius: 10px; text-align: center; pointer-events: none; }\
.quote-popup .quote-text { color: #ffd166; font-size: 16px; }\
.quote-popup .quote-points { color: #9be28b; font-size: 14px; margin-top: 6px; }\
.toast { position: fixed; bottom: 24px; left: 50%; transform: translateX(-50%); padding: 8px 16px; background: rgba(0,0,0,0.75); border: 1px solid #333; border-radius: 8px; color: #eee; opacity: 0; transition: opacity 200ms ease; pointer-events: none; z-index: 60; }\
.toast.show { opacity: 1; }\
.toast.success { border-color: #9be28b; }";

// --- State cell ---------------------------------------------------------------

/// Pointer anchor for the drag in progress: where the pointer went down and
/// where the tile origin was at that moment. Deltas against these give the
/// new origin, which the session then clamps.
struct DragGrip {
    tile: TileId,
    start_x: f64,
    start_y: f64,
    origin: Point,
}

struct UiState {
    session: GameSession,
    rng: Prng,
    timer_id: Option<i32>,
    audio: Option<AudioContext>,
    drag: Option<DragGrip>,
}

thread_local! {
    static STATE: RefCell<Option<UiState>> = RefCell::new(None);
}

// --- Boot ---------------------------------------------------------------------

pub fn boot() -> Result<(), JsValue> {
    if STATE.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    ensure_scaffold(&doc)?;

    let state = UiState {
        session: GameSession::new(GameConfig::default(), board_bounds(&doc)),
        rng: Prng::new(seed()),
        timer_id: None,
        audio: None,
        drag: None,
    };
    STATE.with(|cell| cell.replace(Some(state)));

    register_listeners(&win, &doc)?;
    update_hud_empty(&doc);
    Ok(())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    // Sub-millisecond bits of the timestamp are the entropy source here.
    (now_ms() * 1000.0) as u64
}

// --- Scaffold -----------------------------------------------------------------

/// Create the board, HUD, toast and stylesheet when the hosting page has not
/// provided them. Probes by element id so a page shipping its own markup wins.
fn ensure_scaffold(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(STYLE_ID).is_none() {
        let style = doc.create_element("style")?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(STYLE_CSS));
        if let Some(head) = doc.head() {
            head.append_child(&style)?;
        }
    }
    if doc.get_element_by_id(BOARD_ID).is_some() {
        return Ok(());
    }
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let wrap = doc.create_element("div")?;
    wrap.set_id("sm-wrap");

    let hud = doc.create_element("div")?;
    hud.set_id("sm-hud");
    hud.set_inner_html(&format!(
        "<span>Score: <span id=\"{SCORE_ID}\">0</span></span>\
         <span>Matches: <span id=\"{MATCHES_ID}\">0</span></span>\
         <span>Remaining: <span id=\"{REMAINING_ID}\">0</span></span>\
         <span>Time: <span id=\"{TIMER_ID}\">0:00</span></span>\
         <select id=\"{DIFFICULTY_ID}\">\
            <option value=\"easy\">Easy</option>\
            <option value=\"medium\" selected>Medium</option>\
            <option value=\"hard\">Hard</option>\
         </select>\
         <button id=\"{START_ID}\">Start</button>\
         <button id=\"{RESTART_ID}\" disabled>Restart</button>"
    ));
    wrap.append_child(&hud)?;

    let board = doc.create_element("div")?;
    board.set_id(BOARD_ID);
    wrap.append_child(&board)?;

    let toast = doc.create_element("div")?;
    toast.set_id(TOAST_ID);
    toast.set_class_name("toast");
    wrap.append_child(&toast)?;

    body.append_child(&wrap)?;
    Ok(())
}

fn board_el(doc: &Document) -> Option<HtmlElement> {
    doc.get_element_by_id(BOARD_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn board_bounds(doc: &Document) -> BoardBounds {
    match board_el(doc) {
        Some(el) => BoardBounds::new(
            el.offset_width() as f64,
            el.offset_height() as f64,
            TILE_SIZE,
        ),
        None => BoardBounds::new(DEFAULT_BOARD_W, DEFAULT_BOARD_H, TILE_SIZE),
    }
}

fn read_difficulty(doc: &Document) -> Difficulty {
    doc.get_element_by_id(DIFFICULTY_ID)
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        .and_then(|sel| Difficulty::from_name(&sel.value()))
        .unwrap_or(Difficulty::Medium)
}

// --- Tile elements ------------------------------------------------------------

fn tile_dom_id(id: TileId) -> String {
    format!("sm-tile-{}", id.0)
}

fn tile_el(doc: &Document, id: TileId) -> Option<HtmlElement> {
    doc.get_element_by_id(&tile_dom_id(id))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Drop all tile elements and rebuild them from the session's board.
fn rebuild_board_dom(doc: &Document, session: &GameSession) -> Result<(), JsValue> {
    let Some(board) = board_el(doc) else {
        return Ok(());
    };
    board.set_inner_html("");
    let _ = board.class_list().remove_1("game-over");
    for tile in session.tiles() {
        let el: HtmlElement = doc.create_element("div")?.dyn_into()?;
        el.set_id(&tile_dom_id(tile.id));
        el.set_class_name("tile");
        el.set_attribute("data-tile", &tile.id.0.to_string())?;
        let style = el.style();
        style.set_property("left", &format!("{}px", tile.pos.x))?;
        style.set_property("top", &format!("{}px", tile.pos.y))?;
        style.set_property("width", &format!("{TILE_SIZE}px"))?;
        style.set_property("height", &format!("{TILE_SIZE}px"))?;

        let character = &CHARACTERS[tile.character % CHARACTERS.len()];
        let img = doc.create_element("img")?;
        img.set_attribute("src", character.url)?;
        img.set_attribute("alt", character.name)?;
        img.set_attribute("draggable", "false")?;
        el.append_child(&img)?;

        board.append_child(&el)?;
    }
    Ok(())
}

fn sync_tile_pos(doc: &Document, session: &GameSession, id: TileId) {
    if let (Some(el), Some(tile)) = (tile_el(doc, id), session.tile(id)) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", tile.pos.x));
        let _ = style.set_property("top", &format!("{}px", tile.pos.y));
    }
}

// --- HUD / toast --------------------------------------------------------------

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_disabled(doc: &Document, id: &str, disabled: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        if disabled {
            let _ = el.set_attribute("disabled", "");
        } else {
            let _ = el.remove_attribute("disabled");
        }
    }
}

fn update_hud(doc: &Document, session: &GameSession) {
    set_text(doc, SCORE_ID, &session.score().to_string());
    set_text(doc, MATCHES_ID, &session.matched_pairs().to_string());
    set_text(doc, REMAINING_ID, &session.remaining_pairs().to_string());
}

fn update_hud_empty(doc: &Document) {
    set_text(doc, SCORE_ID, "0");
    set_text(doc, MATCHES_ID, "0");
    set_text(doc, REMAINING_ID, "0");
    set_text(doc, TIMER_ID, "0:00");
}

/// Status notification with auto-hide. Toasts are informational only; no
/// error states surface here.
fn show_toast(doc: &Document, message: &str, kind: &str) {
    let Some(el) = doc.get_element_by_id(TOAST_ID) else {
        return;
    };
    el.set_text_content(Some(message));
    el.set_class_name(&format!("toast show {kind}").trim().to_string());
    let hide = Closure::once_into_js(move || {
        if let Some(doc) = window().and_then(|w| w.document()) {
            if let Some(el) = doc.get_element_by_id(TOAST_ID) {
                let _ = el.class_list().remove_1("show");
            }
        }
    });
    if let Some(win) = window() {
        let _ = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), 3000);
    }
}

fn show_quote_popup(doc: &Document, quote: &str, points: u32) {
    let Some(board) = board_el(doc) else {
        return;
    };
    let Ok(popup) = doc.create_element("div") else {
        return;
    };
    popup.set_class_name("quote-popup");
    let text = doc.create_element("div").ok();
    let pts = doc.create_element("div").ok();
    if let (Some(text), Some(pts)) = (text, pts) {
        text.set_class_name("quote-text");
        text.set_text_content(Some(quote));
        pts.set_class_name("quote-points");
        pts.set_text_content(Some(&format!("+{points} points")));
        let _ = popup.append_child(&text);
        let _ = popup.append_child(&pts);
    }
    let _ = board.append_child(&popup);

    let doomed = popup.clone();
    let remove = Closure::once_into_js(move || doomed.remove());
    if let Some(win) = window() {
        let _ = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), 2500);
    }
}

// --- Timer --------------------------------------------------------------------

fn start_timer(state: &mut UiState, win: &Window) {
    stop_timer(state, win);
    let cb = Closure::wrap(Box::new(move || {
        STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if let Some(GameEvent::TimerTick { elapsed_secs }) = st.session.tick(now_ms()) {
                    if let Some(doc) = window().and_then(|w| w.document()) {
                        set_text(&doc, TIMER_ID, &format_elapsed(elapsed_secs));
                    }
                }
            }
        });
    }) as Box<dyn FnMut()>);
    if let Ok(id) =
        win.set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 1000)
    {
        state.timer_id = Some(id);
    }
    cb.forget();
}

/// Unconditional and idempotent; safe when no timer is active.
fn stop_timer(state: &mut UiState, win: &Window) {
    if let Some(id) = state.timer_id.take() {
        win.clear_interval_with_handle(id);
    }
}

// --- Event presentation -------------------------------------------------------

/// Apply core-emitted events to the page. This is the single seam between
/// gameplay notifications and presentation (DOM classes, popups, cues).
fn present_events(state: &mut UiState, doc: &Document, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Started { .. } => {
                update_hud(doc, &state.session);
                set_text(doc, TIMER_ID, "0:00");
            }
            GameEvent::MatchFound {
                a, b, points, ..
            } => {
                for id in [*a, *b] {
                    if let Some(el) = tile_el(doc, id) {
                        let _ = el.class_list().add_2("match-animation", "matched");
                        let _ = el.class_list().remove_1("highlight");
                    }
                }
                if let Some(ctx) = &state.audio {
                    audio::play(ctx, Cue::Match);
                    audio::play(ctx, Cue::Noir);
                }
                let quote = MATCH_QUOTES[state.rng.gen_index(MATCH_QUOTES.len())];
                show_quote_popup(doc, quote, *points);
                update_hud(doc, &state.session);
            }
            GameEvent::Completed {
                final_bonus, score, ..
            } => {
                if let Some(win) = window() {
                    stop_timer(state, &win);
                }
                if let Some(board) = board_el(doc) {
                    let _ = board.class_list().add_1("game-over");
                }
                if let Some(ctx) = &state.audio {
                    audio::play(ctx, Cue::Complete);
                }
                update_hud(doc, &state.session);
                set_disabled(doc, START_ID, false);
                show_toast(
                    doc,
                    &format!("Congratulations! Final Score: {score} (+{final_bonus} time bonus)"),
                    "success",
                );
            }
            GameEvent::TimerTick { elapsed_secs } => {
                set_text(doc, TIMER_ID, &format_elapsed(*elapsed_secs));
            }
            GameEvent::PauseToggled { paused } => {
                show_toast(doc, if *paused { "Game paused" } else { "Game resumed" }, "");
            }
            GameEvent::Reset => {
                if let Some(board) = board_el(doc) {
                    board.set_inner_html("");
                    let _ = board.class_list().remove_1("game-over");
                }
                update_hud_empty(doc);
            }
        }
    }
}

// --- Game control -------------------------------------------------------------

fn do_start(doc: &Document) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            // AudioContext wants a user gesture; the start click is one.
            if st.audio.is_none() {
                st.audio = audio::init();
            }
            st.session.set_bounds(board_bounds(doc));
            let difficulty = read_difficulty(doc);
            let events = st
                .session
                .start(difficulty, CHARACTERS.len(), now_ms(), &mut st.rng);
            if events.is_empty() {
                return; // already playing; restart is the explicit path
            }
            // Present first: a Reset emitted by an Ended→NotStarted re-entry
            // clears the board, so the rebuild must come after.
            present_events(st, doc, &events);
            let _ = rebuild_board_dom(doc, &st.session);
            if let Some(win) = window() {
                start_timer(st, &win);
            }
            set_disabled(doc, START_ID, true);
            set_disabled(doc, RESTART_ID, false);
            show_toast(doc, "Game started! Drag tiles to find matching pairs.", "success");
        }
    });
}

fn do_restart(doc: &Document) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            if let Some(win) = window() {
                stop_timer(st, &win);
            }
            st.drag = None;
            let events = st.session.reset();
            present_events(st, doc, &events);
            set_disabled(doc, START_ID, false);
            set_disabled(doc, RESTART_ID, true);
            show_toast(doc, "Game reset. Choose difficulty and start again!", "");
        }
    });
}

fn do_toggle_pause(doc: &Document) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            if let Some(event) = st.session.toggle_pause() {
                present_events(st, doc, &[event]);
            }
        }
    });
}

// --- Pointer handling ---------------------------------------------------------

fn tile_id_from_target(target: Option<web_sys::EventTarget>) -> Option<TileId> {
    let el = target?.dyn_into::<Element>().ok()?;
    let hit = el.closest("[data-tile]").ok()??;
    hit.get_attribute("data-tile")?.parse().ok().map(TileId)
}

fn on_pointer_down(doc: &Document, client_x: f64, client_y: f64, id: TileId) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            if !st.session.begin_drag(id) {
                return;
            }
            let origin = st.session.tile(id).map(|t| t.pos).unwrap_or_default();
            st.drag = Some(DragGrip {
                tile: id,
                start_x: client_x,
                start_y: client_y,
                origin,
            });
            if let Some(el) = tile_el(doc, id) {
                let _ = el.class_list().add_1("dragging");
                let _ = el.style().set_property("z-index", "1000");
            }
        }
    });
}

/// Returns true while a drag is active so touch handlers know to swallow the
/// event (otherwise the page would scroll under the drag).
fn on_pointer_move(doc: &Document, client_x: f64, client_y: f64) -> bool {
    STATE.with(|cell| {
        let mut cell = cell.borrow_mut();
        let Some(st) = cell.as_mut() else {
            return false;
        };
        let Some(grip) = &st.drag else {
            return false;
        };
        let id = grip.tile;
        let pos = Point::new(
            grip.origin.x + (client_x - grip.start_x),
            grip.origin.y + (client_y - grip.start_y),
        );
        let highlights = st.session.drag_to(pos);
        sync_tile_pos(doc, &st.session, id);
        for tile in st.session.tiles() {
            if tile.id == id || tile.matched {
                continue;
            }
            if let Some(el) = tile_el(doc, tile.id) {
                if highlights.contains(&tile.id) {
                    let _ = el.class_list().add_1("highlight");
                } else {
                    let _ = el.class_list().remove_1("highlight");
                }
            }
        }
        true
    })
}

fn on_pointer_up(doc: &Document) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            let Some(grip) = st.drag.take() else {
                return;
            };
            if let Some(el) = tile_el(doc, grip.tile) {
                let _ = el.class_list().remove_1("dragging");
                let _ = el.style().set_property("z-index", "1");
            }
            for tile in st.session.tiles() {
                if let Some(el) = tile_el(doc, tile.id) {
                    let _ = el.class_list().remove_1("highlight");
                }
            }
            let events = st.session.end_drag(now_ms());
            present_events(st, doc, &events);
        }
    });
}

fn on_resize(doc: &Document) {
    STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            st.session.set_bounds(board_bounds(doc));
            let ids: Vec<TileId> = st
                .session
                .tiles()
                .iter()
                .filter(|t| !t.matched)
                .map(|t| t.id)
                .collect();
            for id in ids {
                sync_tile_pos(doc, &st.session, id);
            }
        }
    });
}

// --- Listener registration ----------------------------------------------------

fn register_listeners(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let board = doc
        .get_element_by_id(BOARD_ID)
        .ok_or_else(|| JsValue::from_str("no game board"))?;

    // Start / restart buttons
    if let Some(btn) = doc.get_element_by_id(START_ID) {
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                do_start(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id(RESTART_ID) {
        let closure = Closure::wrap(Box::new(move |_: MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                do_restart(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Drag start: one delegated listener on the board resolves the hit tile.
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let Some(id) = tile_id_from_target(evt.target()) {
                    evt.prevent_default();
                    on_pointer_down(&doc, evt.client_x() as f64, evt.client_y() as f64, id);
                }
            }
        }) as Box<dyn FnMut(_)>);
        board.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let (Some(touch), Some(id)) =
                    (evt.touches().get(0), tile_id_from_target(evt.target()))
                {
                    evt.prevent_default();
                    on_pointer_down(
                        &doc,
                        touch.client_x() as f64,
                        touch.client_y() as f64,
                        id,
                    );
                }
            }
        }) as Box<dyn FnMut(_)>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        board.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }

    // Drag move / release live on the document so fast pointers can't escape.
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                if on_pointer_move(&doc, evt.client_x() as f64, evt.client_y() as f64) {
                    evt.prevent_default();
                }
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let Some(touch) = evt.touches().get(0) {
                    if on_pointer_move(&doc, touch.client_x() as f64, touch.client_y() as f64) {
                        evt.prevent_default();
                    }
                }
            }
        }) as Box<dyn FnMut(_)>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        doc.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }
    for event in ["mouseup", "touchend", "touchcancel"] {
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                on_pointer_up(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard shortcuts: r = restart (or start when idle), p = pause toggle.
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let Some(doc) = window().and_then(|w| w.document()) else {
                return;
            };
            match evt.key().as_str() {
                "r" | "R" => {
                    let playing = STATE.with(|cell| {
                        cell.borrow()
                            .as_ref()
                            .map(|st| {
                                matches!(st.session.phase(), Phase::Playing | Phase::Paused)
                            })
                            .unwrap_or(false)
                    });
                    if playing {
                        do_restart(&doc);
                    } else {
                        do_start(&doc);
                    }
                }
                "p" | "P" => do_toggle_pause(&doc),
                _ => {}
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keep tiles inside the board when the window shrinks.
    {
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                on_resize(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
