mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use forecast_core::{ExtractionPipeline, PipelineOutput, StateValue, REGION_STATE_ID};
use forecast_engine::{
    forecast_url, utc_clock, EngineError, ForecastEngine, ForecastRequest, JsonStateStore,
    MemoryStateStore, RegionCode, ReqwestFetcher, RunReport, SourceError, StateStore,
};
use forecast_logging::{forecast_error, forecast_info, forecast_warn};

use crate::cli::Cli;
use crate::config::{AppConfig, FailurePolicy};

fn main() -> ExitCode {
    let cli = Cli::parse();
    forecast_logging::initialize(cli.log.into(), cli.log_level());

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            forecast_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let region = match select_region(&config) {
        Ok(Some(region)) => region,
        Ok(None) => {
            forecast_info!("No region selected, nothing to fetch");
            return Ok(RunStatus::Success.into());
        }
        Err(err) => {
            forecast_warn!("{}; stopping", err);
            return Ok(RunStatus::Failure.into());
        }
    };
    forecast_info!("Region: {}", region);

    let url = forecast_url(&config.base_url, &region)?;
    let mut store: Box<dyn StateStore> = if cli.dry_run {
        Box::new(MemoryStateStore::default())
    } else {
        let store = JsonStateStore::open(&config.state_file, utc_clock())
            .context("opening state file")?;
        forecast_info!("State file: {}", store.path().display());
        Box::new(store)
    };
    store.set_state(REGION_STATE_ID, StateValue::Text(region.to_string()))?;
    store.flush()?;

    let request = ForecastRequest {
        url: url.to_string(),
        power_kw: config.power_kw,
        today: Local::now().date_naive(),
    };
    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
    let engine = ForecastEngine::new(fetcher, ExtractionPipeline::new(config.marker_table()));
    let watchdog = Duration::from_secs(config.watchdog_secs);

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let outcome = runtime.block_on(engine.run_within(&request, store.as_mut(), watchdog));
    if let (true, Ok(report)) = (cli.dry_run, &outcome) {
        println!("{}", render_entries(&report.output)?);
    }

    let status = settle(outcome, config.failure_policy)
        .with_context(|| format!("forecast run for region {region}"))?;
    Ok(status.into())
}

/// How the process reports a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// `None` when no region is configured; a blank entry counts as none.
fn select_region(config: &AppConfig) -> Result<Option<RegionCode>, SourceError> {
    config
        .region
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(RegionCode::parse)
        .transpose()
}

/// Maps the engine outcome to a process status. A watchdog stop is a
/// failure, not an error; other engine errors are passed on.
fn settle(
    outcome: Result<RunReport, EngineError>,
    policy: FailurePolicy,
) -> Result<RunStatus, EngineError> {
    let report = match outcome {
        Ok(report) => report,
        Err(EngineError::Watchdog(limit)) => {
            forecast_error!("Force terminating after {:?}", limit);
            return Ok(RunStatus::Failure);
        }
        Err(err) => return Err(err),
    };

    let failed = report.failed_fields();
    if failed > 0 && policy == FailurePolicy::Halt {
        forecast_error!("{} field(s) failed, halting", failed);
        return Ok(RunStatus::Failure);
    }
    forecast_info!("Forecast states written");
    Ok(RunStatus::Success)
}

fn render_entries(output: &PipelineOutput) -> anyhow::Result<String> {
    let mut map = serde_json::Map::new();
    for entry in output.entries() {
        map.insert(entry.id, serde_json::to_value(&entry.value)?);
    }
    Ok(serde_json::to_string_pretty(&serde_json::Value::Object(map))?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use forecast_engine::{FetchError, FetchFailure};

    use super::*;

    const PAGE: &str = "real sky:</td> 0,91 <td class=xl2725883>-</td>";

    fn config_for(region: Option<&str>) -> AppConfig {
        AppConfig {
            region: region.map(str::to_string),
            ..AppConfig::default()
        }
    }

    /// Every field but the real-sky minimum fails on `PAGE`.
    fn partial_report() -> RunReport {
        let output = ExtractionPipeline::default().run(
            PAGE,
            2.0,
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        );
        RunReport {
            page_url: "https://example.invalid/html/785.html".to_string(),
            page_bytes: PAGE.len(),
            encoding: "windows-1252",
            output,
            states_written: 7,
        }
    }

    fn complete_report() -> RunReport {
        let page = include_str!("../../forecast_core/tests/fixtures/forecast_page.html");
        let output = ExtractionPipeline::default().run(
            page,
            2.0,
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        );
        RunReport {
            page_bytes: page.len(),
            output,
            ..partial_report()
        }
    }

    #[test]
    fn missing_or_blank_region_selects_nothing() {
        assert_eq!(select_region(&config_for(None)), Ok(None));
        assert_eq!(select_region(&config_for(Some("  "))), Ok(None));
    }

    #[test]
    fn short_region_is_rejected() {
        assert_eq!(
            select_region(&config_for(Some("78"))),
            Err(SourceError::RegionTooShort("78".to_string()))
        );
    }

    #[test]
    fn valid_region_is_selected() {
        let region = select_region(&config_for(Some("785"))).unwrap().unwrap();
        assert_eq!(region.to_string(), "785");
    }

    #[test]
    fn halt_policy_fails_on_a_missing_field() {
        let report = partial_report();
        assert!(report.failed_fields() > 0);
        let status = settle(Ok(report), FailurePolicy::Halt).unwrap();
        assert_eq!(status, RunStatus::Failure);
    }

    #[test]
    fn continue_policy_succeeds_on_a_missing_field() {
        let status = settle(Ok(partial_report()), FailurePolicy::Continue).unwrap();
        assert_eq!(status, RunStatus::Success);
    }

    #[test]
    fn halt_policy_succeeds_when_every_field_is_found() {
        let report = complete_report();
        assert_eq!(report.failed_fields(), 0);
        let status = settle(Ok(report), FailurePolicy::Halt).unwrap();
        assert_eq!(status, RunStatus::Success);
    }

    #[test]
    fn watchdog_stop_is_a_failure() {
        let outcome = Err(EngineError::Watchdog(Duration::from_secs(60)));
        let status = settle(outcome, FailurePolicy::Continue).unwrap();
        assert_eq!(status, RunStatus::Failure);
    }

    #[test]
    fn fetch_errors_are_passed_on() {
        let outcome = Err(EngineError::Fetch(FetchError {
            failure: FetchFailure::Status(503),
            detail: "Service Unavailable".to_string(),
        }));
        let err = settle(outcome, FailurePolicy::Continue).unwrap_err();
        assert!(matches!(err, EngineError::Fetch(_)));
    }

    #[test]
    fn dry_run_output_lists_every_state() {
        let output = partial_report().output;
        let rendered: serde_json::Value =
            serde_json::from_str(&render_entries(&output).unwrap()).unwrap();

        assert_eq!(rendered["forecast.realSky_min"], 0.91);
        assert_eq!(rendered["forecast.home.realSky_min"], 1.82);
        assert!(rendered["forecast.clearSky"].is_null());
        assert!(rendered["forecast.forecastDate"].is_null());
        assert_eq!(rendered.as_object().unwrap().len(), 7);
    }
}
