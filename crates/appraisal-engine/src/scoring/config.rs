use super::period::ReportingPeriod;
use serde::{Deserialize, Serialize};

/// Engine-wide defaults applied when an appraisal does not say otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalConfig {
    pub default_period: ReportingPeriod,
}
