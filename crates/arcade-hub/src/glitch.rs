use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use arcade_core::config::GlitchConfig;
use arcade_core::glitch::{GlitchAnimation, GlitchSlot, SymbolSet};
use gloo::timers::callback::Interval;
use web_sys::Element;

use crate::error::{ClientError, ClientResult};

/// Drives glitch animations on one element's text.
///
/// Owns the element's canonical text. Dropping the glitcher stops any
/// running animation and puts the original text back.
pub struct TextGlitcher {
    inner: Rc<Inner>,
}

struct Inner {
    element: Element,
    slot: RefCell<GlitchSlot>,
    symbols: SymbolSet,
    steps: u32,
    interval: RefCell<Option<Interval>>,
}

impl TextGlitcher {
    pub fn new(element: Element, config: &GlitchConfig) -> ClientResult<Self> {
        let symbols = SymbolSet::new(&config.symbols)
            .ok_or_else(|| ClientError::Dom("empty glitch symbol set".into()))?;
        let text = element.text_content().unwrap_or_default();
        Ok(Self {
            inner: Rc::new(Inner {
                element,
                slot: RefCell::new(GlitchSlot::new(text, config.retrigger)),
                symbols,
                steps: config.steps,
                interval: RefCell::new(None),
            }),
        })
    }

    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    pub fn is_running(&self) -> bool {
        self.inner.slot.borrow().is_running()
    }

    /// Start a glitch lasting `duration`. Returns `false` if the trigger was
    /// dropped by the retrigger policy.
    pub fn trigger(&self, duration: Duration) -> bool {
        if !self.inner.slot.borrow_mut().trigger(self.inner.steps) {
            return false;
        }

        let period = GlitchAnimation::interval(duration, self.inner.steps)
            .as_millis()
            .clamp(1, u32::MAX as u128) as u32;
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let interval = Interval::new(period, move || {
            if let Some(inner) = weak.upgrade() {
                inner.step();
            }
        });
        // Replacing a previous interval (restart policy) cancels it.
        *self.inner.interval.borrow_mut() = Some(interval);
        true
    }
}

impl Inner {
    fn step(&self) {
        let frame = self.slot.borrow_mut().tick(&mut rand::rng(), &self.symbols);
        match frame {
            Some(frame) => {
                self.element.set_text_content(Some(&frame.text));
                if frame.finished {
                    self.interval.borrow_mut().take();
                }
            },
            None => {
                self.interval.borrow_mut().take();
            },
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.slot.get_mut().is_running() {
            let text = self.slot.get_mut().text().to_string();
            self.element.set_text_content(Some(&text));
        }
    }
}
