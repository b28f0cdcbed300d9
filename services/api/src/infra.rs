use appraisal_engine::scoring::{AppraisalEngine, PeriodKind, ReportingPeriod};
use chrono::NaiveDate;
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<AppraisalEngine>,
}

/// Reporting-period selection shared by the CLI commands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct PeriodArgs {
    /// Reporting period: annual, quarterly or semi-annually
    #[arg(long = "period")]
    pub(crate) period_type: Option<String>,
    /// Quarter (1-4) when the period is quarterly
    #[arg(long)]
    pub(crate) quarter: Option<u8>,
    /// Half (1-2) when the period is semi-annual
    #[arg(long)]
    pub(crate) half: Option<u8>,
    /// Pick the quarter or half containing this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

impl PeriodArgs {
    /// Explicit flags win; otherwise `fallback` (usually the configured
    /// default period) is used.
    pub(crate) fn resolve(&self, fallback: ReportingPeriod) -> ReportingPeriod {
        let Some(period_type) = self.period_type.as_deref() else {
            return fallback;
        };

        if let Some(date) = self.as_of {
            if self.quarter.is_none() && self.half.is_none() {
                return ReportingPeriod::containing(PeriodKind::parse(period_type), date);
            }
        }

        let quarter = self.quarter.map(|value| value.to_string());
        let half = self.half.map(|value| value.to_string());
        ReportingPeriod::from_parts(period_type, quarter.as_deref(), half.as_deref())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
