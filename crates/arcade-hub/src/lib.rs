mod audio;
mod bridge;
mod card;
mod diag;
mod dom;
mod error;
mod fx;
mod glitch;
mod hub;
mod overlay;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arcade_core::config::HubConfig;
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;

use audio::AudioManager;
use error::ClientError;
use hub::HubContext;
use overlay::EffectsOverlay;

thread_local! {
    static CONFIG: HubConfig = HubConfig::load();
    static HUB: RefCell<Option<Rc<HubContext>>> = const { RefCell::new(None) };
    static OVERLAY: RefCell<Option<EffectsOverlay>> = const { RefCell::new(None) };
    static CHROMATIC: RefCell<Vec<EventListener>> = const { RefCell::new(Vec::new()) };
}

fn config() -> HubConfig {
    CONFIG.with(Clone::clone)
}

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    console_error_panic_hook::set_once();

    let config = config();

    if let Err(e) = add_scan_line() {
        diag::console_warn!("Scan line skipped: {e}");
    }

    // The overlay does not depend on the grid; start it first so it runs
    // even when the page has no mount point.
    if config.overlay.enabled {
        match EffectsOverlay::start(&config.overlay) {
            Ok(overlay) => {
                diag::console_log!(
                    "CRT overlay running at {}x{}",
                    overlay.surface().width,
                    overlay.surface().height
                );
                OVERLAY.with(|cell| *cell.borrow_mut() = Some(overlay));
            },
            Err(e) => diag::console_warn!("CRT overlay disabled: {e}"),
        }
    }

    let audio = Rc::new(AudioManager::new(config.audio.clone()));
    let mounted = bridge::with_catalog(|registry| {
        hub::mount(registry, config, audio).map(|ctx| {
            bridge::notify_ready(registry, ctx.card_count());
            ctx
        })
    });
    match mounted {
        Some(Ok(ctx)) => {
            diag::console_log!("Retro Arcade ready: {} games", ctx.card_count());
            HUB.with(|cell| *cell.borrow_mut() = Some(ctx));
        },
        Some(Err(ClientError::MissingMount(id))) => {
            diag::console_error!("Games grid element #{id} not found");
        },
        Some(Err(e)) => diag::console_error!("Hub failed to mount: {e}"),
        // Already reported when the catalog was loaded
        None => {},
    }
}

fn add_scan_line() -> error::ClientResult<()> {
    let document = dom::document()?;
    let body = dom::body(&document)?;
    dom::append_div(&document, &body, "scan-line")?;
    Ok(())
}

/// Scramble an element's text for `duration_ms`, then restore it.
#[wasm_bindgen]
pub fn glitch_effect(element: web_sys::Element, duration_ms: u32) {
    let glitch = CONFIG.with(|c| c.glitch.clone());
    let duration = Duration::from_millis(u64::from(duration_ms));
    if let Err(e) = fx::glitch_element(&element, duration, &glitch) {
        diag::console_warn!("glitch_effect failed: {e}");
    }
}

/// Split-colour text shadow on hover. Lasts for the life of the page.
#[wasm_bindgen]
pub fn add_chromatic_aberration(element: web_sys::HtmlElement) {
    let chromatic = CONFIG.with(|c| c.chromatic.clone());
    let listeners = fx::chromatic_aberration(&element, &chromatic);
    CHROMATIC.with(|cell| cell.borrow_mut().extend(listeners));
}

/// Catalog record for `id` as JSON, or `undefined` if no such game.
#[wasm_bindgen]
pub fn get_game_by_id(id: &str) -> Option<String> {
    bridge::with_catalog(|registry| bridge::record_json(registry, id)).flatten()
}
