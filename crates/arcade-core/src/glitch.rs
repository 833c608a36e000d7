//! Character-scramble text animation.
//!
//! A glitch on a string of `L` characters runs for `steps` ticks. After tick
//! `k` the first `k` characters are restored and the rest are random symbols;
//! once `k` reaches `steps` the full original text is shown and the
//! animation is finished.

use std::time::Duration;

use rand::Rng;

use crate::config::RetriggerPolicy;

/// Alphabet the scrambled characters are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Vec<char>,
}

impl SymbolSet {
    /// Returns `None` for an empty alphabet.
    pub fn new(symbols: &str) -> Option<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            None
        } else {
            Some(Self { symbols })
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.symbols[rng.random_range(0..self.symbols.len())]
    }
}

/// Output of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlitchFrame {
    pub text: String,
    /// Number of leading characters shown as the original.
    pub revealed: usize,
    pub finished: bool,
}

/// One in-flight glitch. Finite and not restartable.
#[derive(Debug, Clone)]
pub struct GlitchAnimation {
    original: Vec<char>,
    steps: u32,
    tick: u32,
}

impl GlitchAnimation {
    /// `steps` is clamped to at least one tick.
    pub fn new(text: &str, steps: u32) -> Self {
        Self {
            original: text.chars().collect(),
            steps: steps.max(1),
            tick: 0,
        }
    }

    /// Time between ticks so that `steps` ticks span `duration`.
    pub fn interval(duration: Duration, steps: u32) -> Duration {
        duration / steps.max(1)
    }

    pub fn original(&self) -> String {
        self.original.iter().collect()
    }

    pub fn ticks_elapsed(&self) -> u32 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.steps
    }

    /// Advance one tick and render the resulting text.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, symbols: &SymbolSet) -> GlitchFrame {
        if self.tick < self.steps {
            self.tick += 1;
        }

        if self.is_finished() {
            return GlitchFrame {
                text: self.original(),
                revealed: self.original.len(),
                finished: true,
            };
        }

        let revealed = (self.tick as usize).min(self.original.len());
        let text = self
            .original
            .iter()
            .enumerate()
            .map(|(i, &c)| if i < revealed { c } else { symbols.pick(rng) })
            .collect();
        GlitchFrame {
            text,
            revealed,
            finished: false,
        }
    }
}

/// Owns the canonical text of one element and at most one running glitch.
///
/// The canonical text is captured once, so a re-trigger never scrambles
/// already-scrambled text.
#[derive(Debug, Clone)]
pub struct GlitchSlot {
    text: String,
    active: Option<GlitchAnimation>,
    policy: RetriggerPolicy,
}

impl GlitchSlot {
    pub fn new(text: impl Into<String>, policy: RetriggerPolicy) -> Self {
        Self {
            text: text.into(),
            active: None,
            policy,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Request a new glitch. Returns `false` when the trigger was dropped.
    pub fn trigger(&mut self, steps: u32) -> bool {
        if self.active.is_some() && self.policy == RetriggerPolicy::Ignore {
            return false;
        }
        self.active = Some(GlitchAnimation::new(&self.text, steps));
        true
    }

    /// Advance the running glitch. Returns `None` when idle.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, symbols: &SymbolSet) -> Option<GlitchFrame> {
        let anim = self.active.as_mut()?;
        let frame = anim.tick(rng, symbols);
        if frame.finished {
            self.active = None;
        }
        Some(frame)
    }
}
