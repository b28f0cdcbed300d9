use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calendar month. Declaration order is calendar order, so `Ord` and
/// `BTreeMap<Month, _>` iterate January through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// The twelve-month domain every component iterates over.
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Jan => "jan",
            Self::Feb => "feb",
            Self::Mar => "mar",
            Self::Apr => "apr",
            Self::May => "may",
            Self::Jun => "jun",
            Self::Jul => "jul",
            Self::Aug => "aug",
            Self::Sep => "sep",
            Self::Oct => "oct",
            Self::Nov => "nov",
            Self::Dec => "dec",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }

    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Jan => "January",
            Self::Feb => "February",
            Self::Mar => "March",
            Self::Apr => "April",
            Self::May => "May",
            Self::Jun => "June",
            Self::Jul => "July",
            Self::Aug => "August",
            Self::Sep => "September",
            Self::Oct => "October",
            Self::Nov => "November",
            Self::Dec => "December",
        }
    }

    /// Zero-based position in the calendar.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Accepts the key (`jan`), the short label (`Jan`) or the full name
    /// (`January`), ignoring case and surrounding whitespace.
    pub fn from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL.into_iter().find(|month| {
            needle.eq_ignore_ascii_case(month.key())
                || needle.eq_ignore_ascii_case(month.full_name())
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::ALL[date.month0() as usize]
    }
}

/// Operator-entered target/actual pair for one month. Missing values
/// compute as zero but are kept distinct so exports stay blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthEntry {
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub actual: Option<f64>,
}

impl MonthEntry {
    pub fn new(target: f64, actual: f64) -> Self {
        Self {
            target: Some(target),
            actual: Some(actual),
        }
    }

    pub fn target_value(&self) -> f64 {
        self.target.unwrap_or(0.0)
    }

    pub fn actual_value(&self) -> f64 {
        self.actual.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCalcType {
    #[default]
    PercentageWeighted,
    TargetRatio,
    Compliance,
}

impl KpiCalcType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PercentageWeighted => "Percentage Weighted",
            Self::TargetRatio => "Target Ratio",
            Self::Compliance => "Compliance",
        }
    }
}

/// Totals typed in by an operator for a KPI row instead of the month sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsOverride {
    pub target_total: f64,
    pub actual_total: f64,
}

/// Calculation branch for a row. Mode-specific inputs live on the variant
/// that uses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RowMode {
    #[default]
    Standard,
    Par {
        #[serde(default = "default_par_weight")]
        par_weight: f64,
    },
    Kpi {
        #[serde(default)]
        calc_type: KpiCalcType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        totals_override: Option<TotalsOverride>,
    },
}

pub(crate) const fn default_par_weight() -> f64 {
    1.0
}

impl RowMode {
    /// Text used in the `Special Type` column; standard rows leave it blank.
    pub const fn special_type_label(&self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::Par { .. } => "PAR",
            Self::Kpi { .. } => "KPI",
        }
    }
}

/// Every field derived by the row calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    pub month_percent: BTreeMap<Month, f64>,
    pub target_total: f64,
    pub actual_total: f64,
    pub percent_achieved: i64,
    pub weight: u8,
    pub actual_rating: i64,
    pub weighted_average: f64,
}

/// One target line under a pillar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(default)]
    pub pillar: String,
    #[serde(default)]
    pub key_result_area: String,
    #[serde(default)]
    pub target_description: String,
    #[serde(default)]
    pub mode: RowMode,
    #[serde(default)]
    pub months: BTreeMap<Month, MonthEntry>,
    #[serde(default)]
    pub metrics: RowMetrics,
}

impl PerformanceRow {
    pub fn new(
        pillar: impl Into<String>,
        key_result_area: impl Into<String>,
        target_description: impl Into<String>,
        mode: RowMode,
    ) -> Self {
        Self {
            pillar: pillar.into(),
            key_result_area: key_result_area.into(),
            target_description: target_description.into(),
            mode,
            months: BTreeMap::new(),
            metrics: RowMetrics::default(),
        }
    }

    pub fn with_month(mut self, month: Month, target: f64, actual: f64) -> Self {
        self.months.insert(month, MonthEntry::new(target, actual));
        self
    }

    pub fn entry(&self, month: Month) -> MonthEntry {
        self.months.get(&month).copied().unwrap_or_default()
    }
}

/// The conventional strategic-objective groupings of an appraisal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTemplate {
    MembershipAndCustomerSatisfaction,
    FinanceAndCredit,
    BusinessOperations,
}

impl SectionTemplate {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::MembershipAndCustomerSatisfaction,
            Self::FinanceAndCredit,
            Self::BusinessOperations,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MembershipAndCustomerSatisfaction => "Membership & Customer Satisfaction",
            Self::FinanceAndCredit => "Finance & Credit",
            Self::BusinessOperations => "Business Operations, Audit, ICT & HR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSection {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<PerformanceRow>,
    #[serde(default)]
    pub subtotal_weight: u32,
    #[serde(default)]
    pub subtotal_weighted_average: f64,
}

impl PerformanceSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The three canonical sections, empty, in template order.
    pub fn standard_set() -> Vec<Self> {
        SectionTemplate::ordered()
            .into_iter()
            .map(|template| Self::new(template.label()))
            .collect()
    }
}

/// Behavioural trait rating. `weight` and `weighted_score` stay `None`
/// until a rating is entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftSkillScore {
    pub skill_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub weight: Option<u8>,
    #[serde(default)]
    pub weighted_score: Option<f64>,
}

impl SoftSkillScore {
    pub fn new(skill_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            skill_name: skill_name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn rated(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Composed result: 70% strategic objectives plus 30% behavioural traits,
/// in whole percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppraisalScore {
    pub strategic_objectives_score: i64,
    pub behavioral_score: i64,
    pub overall_rating: i64,
}
