//! Text effects exported for use by any page (game pages included).

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arcade_core::config::{ChromaticConfig, GlitchConfig};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::error::ClientResult;
use crate::glitch::TextGlitcher;

/// One shared value per target, handed out to every caller that asks.
struct Shared<T> {
    items: Vec<Rc<T>>,
}

impl<T> Shared<T> {
    const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The entry `is_target` accepts, or a new one from `make`.
    ///
    /// Idle entries that nobody else holds are pruned first.
    fn get_or_try_insert<E>(
        &mut self,
        is_idle: impl Fn(&T) -> bool,
        is_target: impl Fn(&T) -> bool,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<Rc<T>, E> {
        self.items
            .retain(|item| Rc::strong_count(item) > 1 || !is_idle(item));
        if let Some(existing) = self.items.iter().find(|item| is_target(item)) {
            return Ok(Rc::clone(existing));
        }
        let item = Rc::new(make()?);
        self.items.push(Rc::clone(&item));
        Ok(item)
    }
}

thread_local! {
    static GLITCHERS: RefCell<Shared<TextGlitcher>> = const { RefCell::new(Shared::new()) };
}

/// The glitcher that owns `element`'s text.
///
/// Hub cards, the title and the `glitch_effect` export all go through here,
/// so an element's original text is captured once and re-triggers follow
/// the configured policy whoever asks.
pub fn glitcher_for(element: &Element, config: &GlitchConfig) -> ClientResult<Rc<TextGlitcher>> {
    GLITCHERS.with(|cell| {
        cell.borrow_mut().get_or_try_insert(
            |g| !g.is_running(),
            |g| g.element().is_same_node(Some(element)),
            || TextGlitcher::new(element.clone(), config),
        )
    })
}

/// Glitch an arbitrary element. Returns `false` if a running glitch kept it.
pub fn glitch_element(element: &Element, duration: Duration, config: &GlitchConfig) -> ClientResult<bool> {
    Ok(glitcher_for(element, config)?.trigger(duration))
}

/// Red/cyan split text shadow while the pointer is over `element`.
///
/// Returns the two listeners; dropping them removes the effect.
pub fn chromatic_aberration(element: &HtmlElement, config: &ChromaticConfig) -> [EventListener; 2] {
    let shadow = config.text_shadow.clone();
    let on_enter = EventListener::new(element, "mouseenter", move |event| {
        if let Some(el) = event.current_target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
            crate::dom::set_style(&el, "text-shadow", &shadow);
        }
    });
    let on_leave = EventListener::new(element, "mouseleave", |event| {
        if let Some(el) = event.current_target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
            crate::dom::set_style(&el, "text-shadow", "none");
        }
    });
    [on_enter, on_leave]
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Fake {
        target: &'static str,
        running: Cell<bool>,
    }

    fn fake(target: &'static str) -> Result<Fake, ()> {
        Ok(Fake {
            target,
            running: Cell::new(true),
        })
    }

    fn lookup(shared: &mut Shared<Fake>, target: &'static str) -> Rc<Fake> {
        shared
            .get_or_try_insert(|f| !f.running.get(), |f| f.target == target, || fake(target))
            .unwrap()
    }

    #[test]
    fn same_target_shares_one_entry() {
        let mut shared = Shared::new();
        let owned = lookup(&mut shared, "title");
        let from_page = lookup(&mut shared, "title");
        assert!(Rc::ptr_eq(&owned, &from_page));

        let other = lookup(&mut shared, "card");
        assert!(!Rc::ptr_eq(&owned, &other));
    }

    #[test]
    fn held_entry_survives_while_idle() {
        let mut shared = Shared::new();
        let owned = lookup(&mut shared, "title");
        owned.running.set(false);
        let again = lookup(&mut shared, "title");
        assert!(Rc::ptr_eq(&owned, &again));
    }

    #[test]
    fn running_entry_survives_without_holders() {
        let mut shared = Shared::new();
        let first = Rc::as_ptr(&lookup(&mut shared, "title"));
        let again = lookup(&mut shared, "title");
        assert_eq!(first, Rc::as_ptr(&again));
    }

    #[test]
    fn idle_unheld_entry_is_replaced() {
        let mut shared = Shared::new();
        lookup(&mut shared, "title").running.set(false);
        let mut made = false;
        shared
            .get_or_try_insert(
                |f: &Fake| !f.running.get(),
                |f| f.target == "title",
                || {
                    made = true;
                    fake("title")
                },
            )
            .unwrap();
        assert!(made);
        assert_eq!(shared.items.len(), 1);
    }

    #[test]
    fn failed_make_inserts_nothing() {
        let mut shared: Shared<Fake> = Shared::new();
        let result = shared.get_or_try_insert(|_| true, |_| true, || Err::<Fake, _>("no symbols"));
        assert!(result.is_err());
        assert!(shared.items.is_empty());
    }
}
