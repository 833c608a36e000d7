use std::time::Duration;

use chrono::NaiveDateTime;

use crate::config::HubConfig;
use crate::registry::{GameRecord, Registry, is_recently_released, navigation_href};

/// Everything the renderer needs to draw one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardModel {
    pub id: String,
    pub title: String,
    pub display_year: String,
    pub logo_src: String,
    pub logo_alt: String,
    pub href: String,
    pub accent_css: String,
    pub show_new_badge: bool,
    pub entrance_delay: Duration,
}

impl CardModel {
    pub fn from_record(
        record: &GameRecord,
        index: usize,
        now: NaiveDateTime,
        config: &HubConfig,
    ) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            display_year: record.display_year.clone(),
            logo_src: record.logo_path.clone(),
            logo_alt: record.title.clone(),
            href: navigation_href(&config.navigation.target_page, &record.id),
            accent_css: record.accent_color.to_css(),
            show_new_badge: is_recently_released(
                record.release_date,
                now,
                config.release_window(),
            ),
            entrance_delay: Duration::from_millis(config.grid.stagger_ms as u64 * index as u64),
        }
    }

    /// CSS `animation-delay`, in seconds.
    pub fn animation_delay_css(&self) -> String {
        format!("{}s", self.entrance_delay.as_secs_f64())
    }
}

/// One card per record, in registry order.
pub fn build_cards(registry: &Registry, now: NaiveDateTime, config: &HubConfig) -> Vec<CardModel> {
    registry
        .iter()
        .enumerate()
        .map(|(i, record)| CardModel::from_record(record, i, now, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::AccentColor;
    use crate::test_helpers::{at_midnight, date, make_record};

    #[test]
    fn one_card_per_record_in_order() {
        let registry = Registry::builtin().unwrap();
        let cards = build_cards(&registry, at_midnight(2026, 2, 10), &HubConfig::default());
        assert_eq!(cards.len(), registry.len());
        for (card, record) in cards.iter().zip(registry.iter()) {
            assert_eq!(card.id, record.id.as_str());
            assert_eq!(card.title, record.title);
            assert_eq!(card.display_year, record.display_year);
            assert_eq!(card.accent_css, record.accent_color.to_css());
            assert_eq!(card.logo_src, record.logo_path);
        }
    }

    #[test]
    fn badge_follows_release_window() {
        let registry = Registry::builtin().unwrap();
        let cards = build_cards(&registry, at_midnight(2026, 2, 12), &HubConfig::default());
        let badged: Vec<&str> = cards
            .iter()
            .filter(|c| c.show_new_badge)
            .map(|c| c.id.as_str())
            .collect();
        // Feb 7 releases are 5 days old, Feb 8 are 4, Feb 12 is today
        assert_eq!(badged, ["minesweeper", "2048", "space-invaders", "bomberman"]);
    }

    #[test]
    fn stagger_grows_with_index() {
        let mut first = make_record("tetris");
        first.release_date = Some(date(2026, 2, 7));
        let records = vec![first, make_record("pong"), make_record("snake-deluxe")];
        let registry = Registry::new(records).unwrap();
        let cards = build_cards(&registry, at_midnight(2026, 2, 7), &HubConfig::default());
        let delays: Vec<String> = cards.iter().map(CardModel::animation_delay_css).collect();
        assert_eq!(delays, ["0s", "0.1s", "0.2s"]);
    }

    #[test]
    fn href_and_accent() {
        let mut record = make_record("pong");
        record.accent_color = AccentColor::new(0xbb, 0x00, 0xff);
        let card = CardModel::from_record(&record, 0, at_midnight(2026, 1, 1), &HubConfig::default());
        assert_eq!(card.href, "game.html?id=pong");
        assert_eq!(card.accent_css, "#bb00ff");
        assert_eq!(card.logo_alt, card.title);
    }

    #[test]
    fn empty_registry_renders_nothing() {
        let cards = build_cards(&Registry::default(), at_midnight(2026, 1, 1), &HubConfig::default());
        assert!(cards.is_empty());
    }
}
