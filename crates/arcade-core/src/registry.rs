use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::color::AccentColor;
use crate::error::HubError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Short, URL-safe identifier for a registered game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids go verbatim into `?id=` queries, so only unreserved characters are allowed.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the arcade catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub title: String,
    pub description: String,
    #[serde(rename = "logo")]
    pub logo_path: String,
    #[serde(rename = "path")]
    pub page_path: String,
    #[serde(rename = "color")]
    pub accent_color: AccentColor,
    #[serde(rename = "year")]
    pub display_year: String,
    #[serde(default, rename = "releaseDate")]
    pub release_date: Option<NaiveDate>,
}

/// How long a release keeps its "NEW" badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseWindow {
    pub days: u32,
}

impl Default for ReleaseWindow {
    fn default() -> Self {
        Self { days: 4 }
    }
}

/// Ordered, immutable game catalog. Order is display order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<GameRecord>,
}

impl Registry {
    /// Build a registry, rejecting malformed or duplicate ids.
    pub fn new(records: Vec<GameRecord>) -> Result<Self, HubError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !record.id.is_valid() {
                return Err(HubError::InvalidId(record.id.0.clone()));
            }
            if !seen.insert(record.id.as_str()) {
                return Err(HubError::DuplicateId(record.id.0.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, HubError> {
        let records: Vec<GameRecord> = serde_json::from_str(json)?;
        let registry = Self::new(records)?;
        tracing::debug!(games = registry.len(), "Loaded game catalog");
        Ok(registry)
    }

    /// The catalog shipped with the hub.
    pub fn builtin() -> Result<Self, HubError> {
        Self::from_json(include_str!("../data/games.json"))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&GameRecord> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Whether a game released on `release` (at midnight) is still inside `window` at `now`.
///
/// Uses fractional days, so a 4-day window closes exactly 96 hours after
/// release. Future releases and records without a date are never new.
pub fn is_recently_released(
    release: Option<NaiveDate>,
    now: NaiveDateTime,
    window: ReleaseWindow,
) -> bool {
    let Some(release) = release else {
        return false;
    };
    let released_at = release.and_time(NaiveTime::MIN);
    let elapsed = now.signed_duration_since(released_at);
    let days = elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    days >= 0.0 && days <= window.days as f64
}

/// Link target for a card: `<target_page>?id=<id>`.
pub fn navigation_href(target_page: &str, id: &GameId) -> String {
    format!("{target_page}?id={id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{at_midnight, date, make_record};

    #[test]
    fn builtin_catalog_loads_in_order() {
        let registry = Registry::builtin().unwrap();
        let ids: Vec<&str> = registry.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "snake-deluxe",
                "tetris",
                "pong",
                "minesweeper",
                "2048",
                "space-invaders",
                "bomberman"
            ]
        );
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let registry = Registry::builtin().unwrap();
        let pong = registry.find_by_id("pong").unwrap();
        assert_eq!(pong.title, "PONG");
        assert_eq!(pong.accent_color, AccentColor::new(0xbb, 0x00, 0xff));
        assert!(registry.find_by_id("asteroids").is_none());
        assert!(registry.find_by_id("PONG").is_none());
        assert!(registry.find_by_id("").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let records = vec![make_record("pong"), make_record("tetris"), make_record("pong")];
        let err = Registry::new(records).unwrap_err();
        assert!(matches!(err, HubError::DuplicateId(id) if id == "pong"));
    }

    #[test]
    fn unsafe_ids_rejected() {
        for bad in ["", "a b", "x&y", "snake?"] {
            let err = Registry::new(vec![make_record(bad)]).unwrap_err();
            assert!(matches!(err, HubError::InvalidId(_)), "{bad:?}");
        }
    }

    #[test]
    fn missing_release_date_defaults_to_none() {
        let json = r##"[{
            "id": "pong", "title": "PONG", "description": "d",
            "logo": "l.png", "path": "p.html", "color": "#fff", "year": "1972"
        }]"##;
        let registry = Registry::from_json(json).unwrap();
        assert_eq!(registry.find_by_id("pong").unwrap().release_date, None);
    }

    #[test]
    fn bad_color_in_catalog_is_a_catalog_error() {
        let json = r#"[{
            "id": "pong", "title": "PONG", "description": "d",
            "logo": "l.png", "path": "p.html", "color": "purple", "year": "1972"
        }]"#;
        assert!(matches!(Registry::from_json(json), Err(HubError::Catalog(_))));
    }

    #[test]
    fn release_window_examples() {
        let window = ReleaseWindow { days: 4 };
        let release = Some(date(2026, 2, 7));
        assert!(is_recently_released(release, at_midnight(2026, 2, 10), window));
        assert!(!is_recently_released(release, at_midnight(2026, 2, 12), window));
    }

    #[test]
    fn release_window_edges() {
        let window = ReleaseWindow { days: 4 };
        let release = Some(date(2026, 2, 7));
        // Same instant as release.
        assert!(is_recently_released(release, at_midnight(2026, 2, 7), window));
        // Exactly on the boundary.
        assert!(is_recently_released(release, at_midnight(2026, 2, 11), window));
        // One second past the boundary.
        let past = at_midnight(2026, 2, 11) + chrono::Duration::seconds(1);
        assert!(!is_recently_released(release, past, window));
        // Future release.
        assert!(!is_recently_released(release, at_midnight(2026, 2, 6), window));
        // No date at all.
        assert!(!is_recently_released(None, at_midnight(2026, 2, 7), window));
    }

    #[test]
    fn zero_day_window_only_covers_release_instant() {
        let window = ReleaseWindow { days: 0 };
        let release = Some(date(2026, 2, 7));
        assert!(is_recently_released(release, at_midnight(2026, 2, 7), window));
        let later = at_midnight(2026, 2, 7) + chrono::Duration::hours(1);
        assert!(!is_recently_released(release, later, window));
    }

    #[test]
    fn href_uses_query_id() {
        let id = GameId("space-invaders".into());
        assert_eq!(navigation_href("game.html", &id), "game.html?id=space-invaders");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn window_matches_day_arithmetic(
                offset_hours in -240i64..240,
                window_days in 0u32..10,
            ) {
                let release = date(2026, 2, 7);
                let now = at_midnight(2026, 2, 7) + chrono::Duration::hours(offset_hours);
                let expected = offset_hours >= 0 && offset_hours <= window_days as i64 * 24;
                prop_assert_eq!(
                    is_recently_released(Some(release), now, ReleaseWindow { days: window_days }),
                    expected
                );
            }
        }
    }
}
