//! Forecast engine: page retrieval, decoding and state publishing around the
//! extraction core.
mod decode;
mod engine;
mod fetch;
mod persist;
mod source;
mod store;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage, EncodingSource};
pub use engine::{EngineError, ForecastEngine, ForecastRequest, RunReport};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_parent_dir, replace_atomically, PersistError};
pub use source::{forecast_url, RegionCode, SourceError, DEFAULT_BASE_URL};
pub use store::{
    utc_clock, Clock, JsonStateStore, MemoryStateStore, StateStore, StoreError, StoredState,
};
pub use types::{FetchError, FetchFailure, FetchedPage};
