use std::rc::Rc;
use std::time::Duration;

use arcade_core::card::CardModel;
use arcade_core::config::GlitchConfig;
use arcade_core::parallax::{parallax_offset, translate_css};
use glam::Vec2;
use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement, HtmlImageElement, MouseEvent};

use crate::audio::Tone;
use crate::dom;
use crate::error::ClientResult;
use crate::fx;
use crate::glitch::TextGlitcher;
use crate::hub::HubContext;

/// One rendered game card and everything attached to it.
///
/// Dropping a card removes its listeners and stops its title glitch.
pub struct HubCard {
    pub model: CardModel,
    anchor: HtmlAnchorElement,
    logo: HtmlImageElement,
    title: Rc<TextGlitcher>,
    listeners: Vec<EventListener>,
}

impl HubCard {
    /// Build the card's DOM subtree. Nothing is attached to the page yet.
    pub fn build(
        document: &Document,
        model: CardModel,
        glitch: &GlitchConfig,
    ) -> ClientResult<Self> {
        let anchor: HtmlAnchorElement = dom::create(document, "a", "game-card")?;
        anchor.set_href(&model.href);
        let anchor_el: &HtmlElement = anchor.unchecked_ref();
        dom::set_style(anchor_el, "--neon-color", &model.accent_css);
        dom::set_style(anchor_el, "animation-delay", &model.animation_delay_css());

        let inner = dom::append_div(document, &anchor, "game-card-inner")?;
        dom::append_div(document, &inner, "game-card-glow")?;
        if model.show_new_badge {
            let badge = dom::append_div(document, &inner, "new-badge")?;
            badge.set_text_content(Some("NEW"));
        }

        let logo_box = dom::append_div(document, &inner, "game-logo")?;
        let logo: HtmlImageElement = dom::create(document, "img", "")?;
        logo.set_src(&model.logo_src);
        logo.set_alt(&model.logo_alt);
        logo_box.append_child(&logo)?;

        let info = dom::append_div(document, &inner, "game-info")?;
        let title: HtmlElement = dom::create(document, "h3", "game-title")?;
        title.set_text_content(Some(&model.title));
        info.append_child(&title)?;
        let year: HtmlElement = dom::create(document, "p", "game-year")?;
        year.set_text_content(Some(&model.display_year));
        info.append_child(&year)?;

        dom::append_div(document, &inner, "scan-lines")?;

        Ok(Self {
            model,
            anchor,
            logo,
            title: fx::glitcher_for(title.as_ref(), glitch)?,
            listeners: Vec::new(),
        })
    }

    pub fn element(&self) -> &Element {
        self.anchor.unchecked_ref()
    }

    /// Hook up parallax, hover glitch, sounds and click-to-play. Listeners
    /// only hold a weak reference to the hub.
    pub fn attach(&mut self, ctx: &Rc<HubContext>) {
        let target = self.anchor.clone();

        // Parallax on the logo
        {
            let logo = self.logo.clone();
            let card = self.anchor.clone();
            let strength = ctx.config.parallax.strength;
            self.listeners.push(EventListener::new(&target, "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = card.get_bounding_client_rect();
                let offset = parallax_offset(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    Vec2::new(rect.left() as f32, rect.top() as f32),
                    Vec2::new(rect.width() as f32, rect.height() as f32),
                    strength,
                );
                dom::set_style(&logo, "transform", &translate_css(offset));
            }));
        }
        {
            let logo = self.logo.clone();
            self.listeners.push(EventListener::new(&target, "mouseleave", move |_| {
                dom::set_style(&logo, "transform", &translate_css(Vec2::ZERO));
            }));
        }

        // Hover: blip, and sometimes glitch the title
        {
            let ctx = Rc::downgrade(ctx);
            let title = Rc::clone(&self.title);
            self.listeners.push(EventListener::new(&target, "mouseenter", move |_| {
                let Some(ctx) = ctx.upgrade() else {
                    return;
                };
                ctx.audio.play(Tone::Hover);
                let glitch = &ctx.config.glitch;
                if rand::random::<f32>() < glitch.hover_chance {
                    title.trigger(Duration::from_millis(glitch.hover_duration_ms as u64));
                }
            }));
        }

        // Click: wipe, then navigate once the wipe is over
        {
            let ctx = Rc::downgrade(ctx);
            let href = self.model.href.clone();
            self.listeners.push(EventListener::new_with_options(
                &target,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    if let Some(ctx) = ctx.upgrade() {
                        ctx.begin_navigation(&href);
                    }
                },
            ));
        }
    }

    /// Remove every listener. The DOM nodes stay in place.
    pub fn detach(&mut self) {
        self.listeners.clear();
    }
}
