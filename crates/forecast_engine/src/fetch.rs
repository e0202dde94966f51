use std::time::Duration;

use forecast_logging::{forecast_debug, forecast_trace};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::{FetchError, FetchFailure, FetchedPage};

/// Limits applied to the forecast page download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(with = "secs")]
    pub connect_timeout: Duration,
    #[serde(with = "secs")]
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Durations are written as whole seconds in config files.
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Plain HTTP GET of the forecast page.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FetchFailure::Unreachable, err.to_string()))
    }

    /// Only the media type counts; parameters such as `charset` are ignored.
    fn is_html(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn check_size(&self, received: u64) -> Result<(), FetchError> {
        let limit = self.settings.max_bytes;
        if received <= limit {
            return Ok(());
        }
        Err(FetchError::new(
            FetchFailure::TooLarge { limit, received },
            "download aborted",
        ))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let page_url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FetchFailure::BadUrl, err.to_string()))?;

        forecast_debug!("GET {}", page_url);
        let response = self
            .client()?
            .get(page_url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchFailure::Status(status.as_u16()),
                status.canonical_reason().unwrap_or("unknown status"),
            ));
        }
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref().filter(|ct| !self.is_html(ct)) {
            return Err(FetchError::new(
                FetchFailure::NotHtml(ct.to_string()),
                "forecast pages are html",
            ));
        }

        let final_url = response.url().to_string();
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport_error)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
            forecast_trace!("{} bytes so far", body.len());
        }
        forecast_debug!("Got {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            body,
            url: final_url,
            status: status.as_u16(),
            content_type,
        })
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    let failure = if err.is_timeout() {
        FetchFailure::TimedOut
    } else {
        FetchFailure::Unreachable
    };
    FetchError::new(failure, err.to_string())
}
