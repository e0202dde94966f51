use serde::{Deserialize, Serialize};

use crate::date::format_date;
use crate::field::FieldValue;

/// State id under which the configured region code is recorded.
pub const REGION_STATE_ID: &str = "forecast.Region";

/// A value as written to the key-value state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<&FieldValue> for StateValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Decimal(number) => StateValue::Number(*number),
            FieldValue::Date(date) => StateValue::Text(format_date(*date)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateEntry {
    pub id: String,
    pub value: StateValue,
}
