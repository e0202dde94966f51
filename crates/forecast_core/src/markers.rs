use serde::{Deserialize, Serialize};

use crate::date::YearAnchor;
use crate::span::{MarkerPair, Policy};

const CLEAR_SKY_LABEL: &str = "<td height=17 class=xl1525883 style='height:12.75pt'>clear sky:</td>";
const REAL_SKY_LABEL: &str = "real sky:</td>";
const UNITS_CELL: &str = "<td class=xl2425883>kWh/kWp</td>";
const PLACEHOLDER_CELL: &str = "<td class=xl2725883>-</td>";

/// Anchor strings for every field, kept as data so a changed page layout only
/// needs a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTable {
    pub clear_sky: MarkerPair,
    pub real_sky_min: MarkerPair,
    /// Shares its anchors with the other rows; relies on [`Policy::FirstLast`].
    pub real_sky_max: MarkerPair,
    pub forecast_date: YearAnchor,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            clear_sky: MarkerPair::new(CLEAR_SKY_LABEL, UNITS_CELL, Policy::FirstFirst),
            real_sky_min: MarkerPair::new(REAL_SKY_LABEL, PLACEHOLDER_CELL, Policy::FirstFirst),
            real_sky_max: MarkerPair::new(PLACEHOLDER_CELL, UNITS_CELL, Policy::FirstLast),
            forecast_date: YearAnchor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("marker table entry `{entry}` has an empty {which} anchor")]
pub struct MarkerTableError {
    pub entry: &'static str,
    pub which: &'static str,
}

impl MarkerTable {
    /// Every anchor must be non-empty. The year anchor needs at least one of
    /// prefix or suffix so it cannot match bare digits.
    pub fn validate(&self) -> Result<(), MarkerTableError> {
        let pairs = [
            ("clear_sky", &self.clear_sky),
            ("real_sky_min", &self.real_sky_min),
            ("real_sky_max", &self.real_sky_max),
        ];
        for (entry, pair) in pairs {
            if pair.start.is_empty() {
                return Err(MarkerTableError { entry, which: "start" });
            }
            if pair.end.is_empty() {
                return Err(MarkerTableError { entry, which: "end" });
            }
        }
        if self.forecast_date.prefix.is_empty() && self.forecast_date.suffix.is_empty() {
            return Err(MarkerTableError {
                entry: "forecast_date",
                which: "prefix/suffix",
            });
        }
        Ok(())
    }
}
