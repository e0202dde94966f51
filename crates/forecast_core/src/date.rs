use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{ErrorKind, ExtractError};

/// Bytes taken on each side of the year anchor: `DD.MM` before, `.YYYY` after.
const WINDOW_HALF_WIDTH: usize = 5;

/// Render format for forecast dates.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Text surrounding the year of the forecast date, e.g. `.2026</td>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAnchor {
    pub prefix: String,
    pub suffix: String,
}

impl YearAnchor {
    pub fn render(&self, year: i32) -> String {
        format!("{}{year}{}", self.prefix, self.suffix)
    }
}

impl Default for YearAnchor {
    fn default() -> Self {
        Self {
            prefix: ".".to_string(),
            suffix: "</td>".to_string(),
        }
    }
}

/// Recover the `DD.MM.YYYY` date whose year starts right after `year_anchor`'s
/// leading character.
///
/// Out-of-range day and month values roll over into neighbouring months and
/// years instead of failing (`32.01.2026` is `01.02.2026`).
pub fn resolve_date(doc: &str, year_anchor: &str) -> Result<NaiveDate, ExtractError> {
    let anchor = if year_anchor.is_empty() {
        None
    } else {
        doc.find(year_anchor)
    }
    .ok_or_else(|| {
        ExtractError::new(
            ErrorKind::DateMarkerNotFound,
            format!("date anchor {year_anchor:?} not found"),
        )
    })?;

    let window = anchor
        .checked_sub(WINDOW_HALF_WIDTH)
        .and_then(|start| doc.get(start..anchor + WINDOW_HALF_WIDTH))
        .ok_or_else(|| {
            ExtractError::new(
                ErrorKind::DateWindowMalformed,
                format!("no date window around offset {anchor}"),
            )
        })?;

    let parts: Vec<&str> = window.split('.').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(window_malformed(window, "expected day.month.year"));
    };

    let day = parse_component(window, day)?;
    let month = parse_component(window, month)?;
    let year = parse_component(window, year)?;

    lenient_date(day, month, year)
        .ok_or_else(|| window_malformed(window, "date out of range"))
}

/// `DD.MM.YYYY` rendering of a resolved date.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_component(window: &str, part: &str) -> Result<i64, ExtractError> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Err(window_malformed(window, "empty date component"));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| window_malformed(window, "non-numeric date component"))
}

// Day 1 of the (normalized) month, then walk `day - 1` days from there.
fn lenient_date(day: i64, month: i64, year: i64) -> Option<NaiveDate> {
    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
}

fn window_malformed(window: &str, reason: &str) -> ExtractError {
    ExtractError::new(
        ErrorKind::DateWindowMalformed,
        format!("{reason} in {window:?}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lenient_date_rolls_over_like_a_calendar() {
        assert_eq!(lenient_date(15, 3, 2024), Some(ymd(2024, 3, 15)));
        assert_eq!(lenient_date(32, 1, 2026), Some(ymd(2026, 2, 1)));
        assert_eq!(lenient_date(0, 3, 2024), Some(ymd(2024, 2, 29)));
        assert_eq!(lenient_date(1, 13, 2025), Some(ymd(2026, 1, 1)));
        assert_eq!(lenient_date(1, 0, 2026), Some(ymd(2025, 12, 1)));
    }

    #[test]
    fn year_anchor_renders_prefix_year_suffix() {
        assert_eq!(YearAnchor::default().render(2026), ".2026</td>");
    }
}
