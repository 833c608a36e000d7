pub mod card;
pub mod color;
pub mod config;
pub mod effects;
pub mod error;
pub mod glitch;
pub mod navigation;
pub mod parallax;
pub mod registry;

pub use error::HubError;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::color::AccentColor;
    use crate::registry::{GameId, GameRecord};

    /// Calendar date shorthand; panics on impossible dates.
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    /// Midnight at the start of the given date.
    pub fn at_midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
        date(year, month, day).and_time(NaiveTime::MIN)
    }

    /// A record with placeholder display fields and no release date.
    pub fn make_record(id: &str) -> GameRecord {
        GameRecord {
            id: GameId(id.to_string()),
            title: id.to_uppercase(),
            description: format!("Test game {id}"),
            logo_path: format!("assets/games/{id}/logo.png"),
            page_path: format!("games/{id}/index.html"),
            accent_color: AccentColor::new(0, 255, 0),
            display_year: "2026".to_string(),
            release_date: None,
        }
    }
}
