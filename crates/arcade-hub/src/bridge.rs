//! JSON hand-off between the WASM hub and page scripts.

use arcade_core::registry::Registry;

#[cfg(target_family = "wasm")]
use wasm_bindgen::JsCast;

thread_local! {
    /// The embedded catalog, parsed on first use.
    static CATALOG: Option<Registry> = match Registry::builtin() {
        Ok(registry) => Some(registry),
        Err(e) => {
            crate::diag::console_error!("Game catalog unusable: {e}");
            None
        },
    };
}

/// Run `f` against the embedded catalog. `None` if it failed to load.
pub fn with_catalog<R>(f: impl FnOnce(&Registry) -> R) -> Option<R> {
    CATALOG.with(|catalog| catalog.as_ref().map(f))
}

/// Payload passed to `window._arcadeHubReady` once the grid is rendered.
pub fn ready_payload(registry: &Registry, rendered: usize) -> serde_json::Value {
    serde_json::json!({
        "rendered": rendered,
        "games": registry.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
    })
}

/// A single catalog record as JSON, for pages resolving `?id=<id>`.
pub fn record_json(registry: &Registry, id: &str) -> Option<String> {
    let record = registry.find_by_id(id)?;
    match serde_json::to_string(record) {
        Ok(json) => Some(json),
        Err(e) => {
            crate::diag::console_warn!("Failed to serialize {id}: {e}");
            None
        },
    }
}

/// Tell the host page the hub is up. Silently skipped if the page does not
/// define the hook.
pub fn notify_ready(registry: &Registry, rendered: usize) {
    #[cfg(target_family = "wasm")]
    {
        match serde_json::to_string(&ready_payload(registry, rendered)) {
            Ok(json_str) => call_window_fn("_arcadeHubReady", &json_str),
            Err(e) => crate::diag::console_warn!("Failed to serialize hub state: {e}"),
        }
    }
    #[cfg(not(target_family = "wasm"))]
    let _ = (registry, rendered);
}

/// Call `window[name](JSON.parse(json))` if the page defines it.
#[cfg(target_family = "wasm")]
fn call_window_fn(name: &str, json: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let hook = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(name))
        .ok()
        .and_then(|val| val.dyn_into::<js_sys::Function>().ok());
    let Some(hook) = hook else {
        return;
    };
    let outcome = js_sys::JSON::parse(json)
        .and_then(|payload| hook.call1(&wasm_bindgen::JsValue::NULL, &payload));
    if let Err(e) = outcome {
        crate::diag::console_warn!("{name} hook failed: {e:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_parsed_once() {
        let first = with_catalog(|r| r as *const Registry).unwrap();
        let second = with_catalog(|r| r as *const Registry).unwrap();
        assert_eq!(first, second);
        assert_eq!(with_catalog(Registry::len), Some(7));
    }

    #[test]
    fn ready_payload_lists_games_in_order() {
        let registry = Registry::builtin().unwrap();
        let payload = ready_payload(&registry, registry.len());
        assert_eq!(payload["rendered"], 7);
        assert_eq!(payload["games"][0], "snake-deluxe");
        assert_eq!(payload["games"][6], "bomberman");
    }

    #[test]
    fn record_json_uses_catalog_field_names() {
        let registry = Registry::builtin().unwrap();
        let json = record_json(&registry, "tetris").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "TETRIS");
        assert_eq!(value["path"], "games/tetris/index.html");
        assert_eq!(value["color"], "#00ffff");
        assert_eq!(value["releaseDate"], "2026-02-07");
        assert!(record_json(&registry, "asteroids").is_none());
    }
}
