use std::fmt;

use url::Url;

/// Host serving one forecast page per postal-code region.
pub const DEFAULT_BASE_URL: &str = "http://www.vorhersage-plz-bereich.solar-wetter.com/";

/// Postal-code region the forecast page is published for, e.g. `785`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("region code {0:?} is shorter than 3 characters")]
    RegionTooShort(String),
    #[error("region code {0:?} may only contain ASCII letters and digits")]
    RegionInvalid(String),
    #[error("invalid base url {url:?}: {message}")]
    BaseUrl { url: String, message: String },
}

impl RegionCode {
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let code = raw.trim();
        if code.chars().count() < 3 {
            return Err(SourceError::RegionTooShort(code.to_string()));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SourceError::RegionInvalid(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{base}/html/{region}.html`.
pub fn forecast_url(base: &str, region: &RegionCode) -> Result<Url, SourceError> {
    let base_err = |message: String| SourceError::BaseUrl {
        url: base.to_string(),
        message,
    };
    let mut base_url = Url::parse(base).map_err(|err| base_err(err.to_string()))?;
    if base_url.cannot_be_a_base() {
        return Err(base_err("cannot be a base".to_string()));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
        .join(&format!("html/{region}.html"))
        .map_err(|err| base_err(err.to_string()))
}
