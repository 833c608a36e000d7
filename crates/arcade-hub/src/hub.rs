use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arcade_core::card::build_cards;
use arcade_core::config::HubConfig;
use arcade_core::navigation::NavigationGate;
use arcade_core::registry::Registry;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use web_sys::Document;

use crate::audio::{AudioManager, Tone};
use crate::card::HubCard;
use crate::diag;
use crate::dom;
use crate::error::{ClientError, ClientResult};
use crate::fx;
use crate::glitch::TextGlitcher;

/// State shared by the hub and its card listeners.
pub struct HubContext {
    pub config: HubConfig,
    pub audio: Rc<AudioManager>,
    document: Document,
    gate: RefCell<NavigationGate>,
    cards: RefCell<Vec<HubCard>>,
    page_listeners: RefCell<Vec<EventListener>>,
    nav_timer: RefCell<Option<Timeout>>,
    title_timer: RefCell<Option<Timeout>>,
    title: RefCell<Option<Rc<TextGlitcher>>>,
}

/// Render every registry entry into the mount point and wire up interaction.
///
/// Fails with [`ClientError::MissingMount`] if the page has no mount point.
/// Every card is built before any is inserted, so a failed mount leaves the
/// grid untouched.
pub fn mount(
    registry: &Registry,
    config: HubConfig,
    audio: Rc<AudioManager>,
) -> ClientResult<Rc<HubContext>> {
    let document = dom::document()?;
    let grid = document
        .get_element_by_id(&config.grid.mount_id)
        .ok_or_else(|| ClientError::MissingMount(config.grid.mount_id.clone()))?;

    let models = build_cards(registry, dom::utc_now(), &config);
    let ctx = Rc::new(HubContext {
        config,
        audio,
        document,
        gate: RefCell::new(NavigationGate::new()),
        cards: RefCell::new(Vec::new()),
        page_listeners: RefCell::new(Vec::new()),
        nav_timer: RefCell::new(None),
        title_timer: RefCell::new(None),
        title: RefCell::new(None),
    });

    let mut cards = models
        .into_iter()
        .map(|model| HubCard::build(&ctx.document, model, &ctx.config.glitch))
        .collect::<ClientResult<Vec<_>>>()?;

    let fragment = ctx.document.create_document_fragment();
    for card in &cards {
        fragment.append_child(card.element())?;
    }
    grid.append_child(&fragment)?;

    for card in &mut cards {
        card.attach(&ctx);
    }
    *ctx.cards.borrow_mut() = cards;

    ctx.listen_for_audio_unlock();
    ctx.schedule_title_glitch();
    Ok(ctx)
}

impl HubContext {
    pub fn card_count(&self) -> usize {
        self.cards.borrow().len()
    }

    /// Click-to-play. Shows the wipe now and changes page once the wipe is
    /// over. Clicks after the first are ignored.
    pub fn begin_navigation(self: &Rc<Self>, href: &str) {
        let delay_ms = self.config.navigation.delay_ms;
        if self
            .gate
            .borrow_mut()
            .begin(href, dom::now_ms(), delay_ms as f64)
            .is_none()
        {
            return;
        }

        // The click itself is a user gesture, so audio may start here.
        self.audio.unlock();
        self.audio.play(Tone::Click);

        if let Err(e) = self.show_wipe() {
            diag::console_warn!("Screen wipe failed: {e}");
        }
        self.schedule_navigation(delay_ms);
    }

    fn schedule_navigation(self: &Rc<Self>, delay_ms: u32) {
        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(ctx) = weak.upgrade() {
                ctx.finish_navigation();
            }
        });
        // At most one navigation timer; a reschedule replaces the fired one.
        *self.nav_timer.borrow_mut() = Some(timeout);
    }

    fn finish_navigation(self: &Rc<Self>) {
        let now = dom::now_ms();
        let due = self.gate.borrow_mut().take_due(now);
        let Some(href) = due else {
            // Timers may fire a hair early; wait out the remainder.
            let remaining = self.gate.borrow().pending().map(|p| p.remaining_ms(now));
            if let Some(remaining) = remaining {
                self.schedule_navigation(remaining.ceil().max(1.0) as u32);
            }
            return;
        };

        self.teardown();
        let result = dom::window()
            .and_then(|w| w.location().set_href(&href).map_err(ClientError::from));
        if let Err(e) = result {
            diag::console_error!("Navigation to {href} failed: {e}");
        }
    }

    fn show_wipe(&self) -> ClientResult<()> {
        let body = dom::body(&self.document)?;
        dom::append_div(&self.document, &body, "screen-wipe")?;
        Ok(())
    }

    /// Remove all card and page listeners.
    pub fn teardown(&self) {
        for card in self.cards.borrow_mut().iter_mut() {
            card.detach();
        }
        self.page_listeners.borrow_mut().clear();
    }

    /// Audio may only start after a user gesture; the first click anywhere unlocks it.
    fn listen_for_audio_unlock(&self) {
        let audio = Rc::clone(&self.audio);
        let listener = EventListener::once(&self.document, "click", move |_| audio.unlock());
        self.page_listeners.borrow_mut().push(listener);
    }

    /// Glitch the page title once, shortly after the grid appears.
    fn schedule_title_glitch(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(self.config.glitch.title_delay_ms, move || {
            if let Some(ctx) = weak.upgrade()
                && let Err(e) = ctx.glitch_title()
            {
                diag::console_warn!("Title glitch skipped: {e}");
            }
        });
        *self.title_timer.borrow_mut() = Some(timeout);
    }

    fn glitch_title(&self) -> ClientResult<()> {
        let selector = &self.config.grid.title_selector;
        let Some(title) = self.document.query_selector(selector)? else {
            return Ok(());
        };
        let glitcher = fx::glitcher_for(&title, &self.config.glitch)?;
        glitcher.trigger(Duration::from_millis(self.config.glitch.title_duration_ms as u64));
        *self.title.borrow_mut() = Some(glitcher);
        Ok(())
    }
}
