use chrono::NaiveDate;
use forecast_logging::{forecast_debug, forecast_trace};

use crate::field::{extract_field, ExtractionResult, Field, FieldValue};
use crate::output::{StateEntry, StateValue};
use crate::MarkerTable;

/// A raw value scaled to the configured system size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeValue {
    pub field: Field,
    /// `None` when the source field failed.
    pub value: Option<f64>,
}

/// Everything one document produced. Results follow [`Field::ALL`] order and
/// home values follow [`Field::NUMERIC`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub results: Vec<ExtractionResult>,
    pub home: Vec<HomeValue>,
}

impl PipelineOutput {
    pub fn result(&self, field: Field) -> Option<&ExtractionResult> {
        self.results.iter().find(|result| result.field == field)
    }

    pub fn home_value(&self, field: Field) -> Option<f64> {
        self.home
            .iter()
            .find(|home| home.field == field)
            .and_then(|home| home.value)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.results.iter().filter(|result| !result.is_ok())
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(ExtractionResult::is_ok)
    }

    /// Flatten into the state entries handed to persistence: raw fields first,
    /// then home values. Failed fields become [`StateValue::Null`].
    pub fn entries(&self) -> Vec<StateEntry> {
        let raw = self.results.iter().map(|result| StateEntry {
            id: result.field.state_id(),
            value: match result.value() {
                Some(value) => StateValue::from(value),
                None => StateValue::Null,
            },
        });
        let home = self.home.iter().map(|home| StateEntry {
            id: home.field.home_state_id(),
            value: home.value.map_or(StateValue::Null, StateValue::Number),
        });
        raw.chain(home).collect()
    }
}

/// Runs every field recipe of a [`MarkerTable`] over one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    markers: MarkerTable,
}

impl ExtractionPipeline {
    pub fn new(markers: MarkerTable) -> Self {
        Self { markers }
    }

    /// Extract all fields; a failing field never stops the others.
    pub fn run(&self, doc: &str, power_kw: f64, today: NaiveDate) -> PipelineOutput {
        forecast_trace!("extracting from {} bytes, power {} kW", doc.len(), power_kw);

        let results: Vec<ExtractionResult> = Field::ALL
            .iter()
            .map(|&field| {
                let result = extract_field(doc, field, &self.markers, today);
                match &result.outcome {
                    Ok(value) => forecast_debug!("{}: {}", field, value),
                    Err(err) => forecast_debug!("{}: {}", field, err),
                }
                result
            })
            .collect();

        let home = Field::NUMERIC
            .iter()
            .map(|&field| HomeValue {
                field,
                value: results
                    .iter()
                    .find(|result| result.field == field)
                    .and_then(ExtractionResult::value)
                    .and_then(FieldValue::as_decimal)
                    .map(|value| value * power_kw),
            })
            .collect();

        PipelineOutput { results, home }
    }
}
