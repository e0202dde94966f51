use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use forecast_core::{ExtractionPipeline, PipelineOutput};
use forecast_logging::{forecast_error, forecast_info};

use crate::decode::{decode_page, DecodeError};
use crate::fetch::Fetcher;
use crate::store::{StateStore, StoreError};
use crate::FetchError;

/// One forecast run: which page, what system size, which day is "today".
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub url: String,
    pub power_kw: f64,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Page URL after redirects.
    pub page_url: String,
    pub page_bytes: usize,
    pub encoding: &'static str,
    pub output: PipelineOutput,
    pub states_written: usize,
}

impl RunReport {
    pub fn failed_fields(&self) -> usize {
        self.output.failures().count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("state store failed: {0}")]
    Store(#[from] StoreError),
    #[error("run did not finish within {0:?}")]
    Watchdog(Duration),
}

/// Fetches a forecast page, extracts it and publishes the values.
pub struct ForecastEngine {
    fetcher: Arc<dyn Fetcher>,
    pipeline: ExtractionPipeline,
}

impl ForecastEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, pipeline: ExtractionPipeline) -> Self {
        Self { fetcher, pipeline }
    }

    /// [`ForecastEngine::run`] bounded by `limit`; an expired run writes nothing
    /// further and fails with [`EngineError::Watchdog`].
    pub async fn run_within(
        &self,
        request: &ForecastRequest,
        store: &mut dyn StateStore,
        limit: Duration,
    ) -> Result<RunReport, EngineError> {
        match tokio::time::timeout(limit, self.run(request, store)).await {
            Ok(result) => result,
            Err(_) => {
                forecast_error!("Forecast run exceeded {:?}, giving up", limit);
                Err(EngineError::Watchdog(limit))
            }
        }
    }

    /// Field failures do not fail the run; they are logged, stored as null
    /// and reported in [`RunReport::output`].
    pub async fn run(
        &self,
        request: &ForecastRequest,
        store: &mut dyn StateStore,
    ) -> Result<RunReport, EngineError> {
        let fetched = self.fetcher.fetch(&request.url).await?;
        let page = decode_page(&fetched.body, fetched.content_type.as_deref())?;
        forecast_info!(
            "Fetched {} ({} bytes, {})",
            fetched.url,
            fetched.body.len(),
            page.encoding
        );

        let output = self.pipeline.run(&page.text, request.power_kw, request.today);
        for failed in output.failures() {
            if let Err(err) = &failed.outcome {
                forecast_error!("Could not extract {}: {}", failed.field, err);
            }
        }

        let entries = output.entries();
        for entry in &entries {
            store.set_state(&entry.id, entry.value.clone())?;
        }
        store.flush()?;
        forecast_info!(
            "Published {} states ({} fields failed)",
            entries.len(),
            output.failures().count()
        );

        Ok(RunReport {
            page_url: fetched.url,
            page_bytes: fetched.body.len(),
            encoding: page.encoding,
            output,
            states_written: entries.len(),
        })
    }
}
