//! Shadow Match core crate.
//!
//! Drag-and-drop memory game: character tiles are scattered across the board
//! and dragging two tiles of the same pair within match range pairs them,
//! scoring points that decay with elapsed time. Gameplay logic lives in
//! `game` (pure, native-testable); `dom` wires it to pointer/touch/keyboard
//! events and the page, `audio` synthesizes the event cues.

use wasm_bindgen::prelude::*;

mod audio;
mod dom;
pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Character roster. Tiles cycle through this table when a difficulty asks for
// more pairs than there are characters; the pair id, not the character, is
// what matching compares.
// -----------------------------------------------------------------------------

pub struct Character {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

pub const CHARACTERS: &[Character] = &[
    Character {
        id: "leo1",
        name: "DiCaprio 1",
        url: "https://ianfarrington.wordpress.com/wp-content/uploads/2015/01/catch-me-if-you-can.jpg",
    },
    Character {
        id: "leo2",
        name: "DiCaprio 2",
        url: "https://www.thomasmason.co.uk/wp-content/uploads/2021/03/TF09_Copertina_Hero.jpg",
    },
    Character {
        id: "detective1",
        name: "Detective 1",
        url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQ6Ib904My-AODlMZcFIxHxBAudDbgNOFbSRCmGDcEAtTQwusYuQLT3RdV3OhLV8MisvDg&usqp=CAU",
    },
    Character {
        id: "detective2",
        name: "Detective 2",
        url: "https://www.slashfilm.com/img/gallery/tom-hanks-catch-me-if-you-can-casting-completely-changed-the-story/needing-a-cat-for-the-mouse-1650304879.jpg",
    },
];

/// Flavor lines for the per-match popup; one is drawn at random per pairing.
pub const MATCH_QUOTES: &[&str] = &[
    "Frankly, Horizon — we saw that prompt leak coming.",
    "The model may generalize, but it can't hide.",
    "Abagnale, but make it AI.",
    "Outrun the past? Not when it's trained on you.",
    "Detective GPT-5 doesn't bluff — it benchmarks.",
    "Nice try, but your patterns are showing.",
    "Catch me if you can? Already caught in the training data.",
    "Some connections can't be encrypted.",
    "Even neural networks leave digital fingerprints.",
    "Plot twist: the AI was the detective all along.",
];

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// Mount the game into the current document: builds the board and HUD if the
/// hosting page did not provide them, registers input listeners and waits for
/// the start button.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::boot()
}
