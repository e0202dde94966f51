use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::date::{format_date, resolve_date};
use crate::decimal::parse_decimal;
use crate::span::{find_span, MarkerPair};
use crate::{ErrorKind, ExtractError, MarkerTable};

/// The four values scraped from a forecast page, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ClearSky,
    RealSkyMin,
    RealSkyMax,
    ForecastDate,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::ClearSky,
        Field::RealSkyMin,
        Field::RealSkyMax,
        Field::ForecastDate,
    ];

    /// Fields that carry a number and get a scaled home-system value.
    pub const NUMERIC: [Field; 3] = [Field::ClearSky, Field::RealSkyMin, Field::RealSkyMax];

    pub fn name(&self) -> &'static str {
        match self {
            Field::ClearSky => "clearSky",
            Field::RealSkyMin => "realSky_min",
            Field::RealSkyMax => "realSky_max",
            Field::ForecastDate => "forecastDate",
        }
    }

    pub fn state_id(&self) -> String {
        format!("forecast.{}", self.name())
    }

    pub fn home_state_id(&self) -> String {
        format!("forecast.home.{}", self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Decimal(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(value) => Some(*value),
            FieldValue::Date(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Decimal(value) => write!(f, "{value:.2}"),
            FieldValue::Date(date) => f.write_str(&format_date(*date)),
        }
    }
}

/// Outcome of one field for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub field: Field,
    pub outcome: Result<FieldValue, ExtractError>,
}

impl ExtractionResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&FieldValue> {
        self.outcome.as_ref().ok()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.outcome.as_ref().err().map(|err| err.kind)
    }
}

/// Run the recipe for `field` against `doc`.
///
/// `today` only matters for [`Field::ForecastDate`], whose anchor embeds the
/// current year.
pub fn extract_field(
    doc: &str,
    field: Field,
    markers: &MarkerTable,
    today: NaiveDate,
) -> ExtractionResult {
    let outcome = match field {
        Field::ClearSky => extract_decimal(doc, &markers.clear_sky),
        Field::RealSkyMin => extract_decimal(doc, &markers.real_sky_min),
        Field::RealSkyMax => extract_decimal(doc, &markers.real_sky_max),
        Field::ForecastDate => {
            let anchor = markers.forecast_date.render(today.year());
            resolve_date(doc, &anchor).map(FieldValue::Date)
        }
    };
    ExtractionResult { field, outcome }
}

fn extract_decimal(doc: &str, pair: &MarkerPair) -> Result<FieldValue, ExtractError> {
    let span = find_span(doc, pair)?;
    parse_decimal(span.slice(doc)).map(FieldValue::Decimal)
}
