//! Forecast core: marker-based extraction of forecast values from page text.
mod date;
mod decimal;
mod error;
mod field;
mod markers;
mod output;
mod pipeline;
mod span;

pub use date::{format_date, resolve_date, YearAnchor, DATE_FORMAT};
pub use decimal::parse_decimal;
pub use error::{ErrorKind, ExtractError};
pub use field::{extract_field, ExtractionResult, Field, FieldValue};
pub use markers::{MarkerTable, MarkerTableError};
pub use output::{StateEntry, StateValue, REGION_STATE_ID};
pub use pipeline::{ExtractionPipeline, HomeValue, PipelineOutput};
pub use span::{find_span, MarkerPair, Policy, Span};
