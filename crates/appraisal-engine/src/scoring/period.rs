use super::domain::Month;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting window an appraisal is scored over.
///
/// Quarter and half selectors are kept as entered; out-of-range values are
/// resolved by [`resolve_active_months`] rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period_type", rename_all = "snake_case")]
pub enum ReportingPeriod {
    Quarterly {
        #[serde(default)]
        quarter: u8,
    },
    SemiAnnually {
        #[serde(default)]
        half: u8,
    },
    #[default]
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Quarterly,
    SemiAnnually,
    Annual,
}

impl PeriodKind {
    pub fn parse(value: &str) -> Self {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "quarterly" | "quarter" | "q" => Self::Quarterly,
            "semiannually" | "semiannual" | "halfyearly" | "biannual" | "biannually" => {
                Self::SemiAnnually
            }
            _ => Self::Annual,
        }
    }
}

impl ReportingPeriod {
    /// Builds a period from the raw strings on an employee/period record.
    /// Unparseable selectors become `0` and fall back at resolution time.
    pub fn from_parts(period_type: &str, quarter: Option<&str>, half: Option<&str>) -> Self {
        match PeriodKind::parse(period_type) {
            PeriodKind::Quarterly => Self::Quarterly {
                quarter: quarter.map(parse_selector).unwrap_or(0),
            },
            PeriodKind::SemiAnnually => Self::SemiAnnually {
                half: half.map(parse_selector).unwrap_or(0),
            },
            PeriodKind::Annual => Self::Annual,
        }
    }

    /// The period of the given kind that contains `date`.
    pub fn containing(kind: PeriodKind, date: NaiveDate) -> Self {
        match kind {
            PeriodKind::Quarterly => Self::Quarterly {
                quarter: (date.month0() / 3 + 1) as u8,
            },
            PeriodKind::SemiAnnually => Self::SemiAnnually {
                half: (date.month0() / 6 + 1) as u8,
            },
            PeriodKind::Annual => Self::Annual,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Self::Quarterly { .. } => PeriodKind::Quarterly,
            Self::SemiAnnually { .. } => PeriodKind::SemiAnnually,
            Self::Annual => PeriodKind::Annual,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Self::Quarterly { quarter } => format!("Quarterly (Q{})", normalize_quarter(quarter)),
            Self::SemiAnnually { half } => format!("Semi-annually (H{})", normalize_half(half)),
            Self::Annual => "Annual".to_string(),
        }
    }

    pub fn active_months(&self) -> Vec<Month> {
        resolve_active_months(self)
    }
}

/// Months whose target/actual values count toward row totals, in calendar
/// order.
pub fn resolve_active_months(period: &ReportingPeriod) -> Vec<Month> {
    match *period {
        ReportingPeriod::Quarterly { quarter } => {
            let start = (normalize_quarter(quarter) as usize - 1) * 3;
            Month::ALL[start..start + 3].to_vec()
        }
        ReportingPeriod::SemiAnnually { half } => {
            let start = (normalize_half(half) as usize - 1) * 6;
            Month::ALL[start..start + 6].to_vec()
        }
        ReportingPeriod::Annual => Month::ALL.to_vec(),
    }
}

fn normalize_quarter(quarter: u8) -> u8 {
    if (1..=4).contains(&quarter) {
        quarter
    } else {
        1
    }
}

fn normalize_half(half: u8) -> u8 {
    if (1..=2).contains(&half) {
        half
    } else {
        1
    }
}

fn parse_selector(value: &str) -> u8 {
    let digits = value
        .trim()
        .trim_start_matches(['q', 'Q', 'h', 'H'])
        .trim();
    digits.parse::<u8>().unwrap_or(0)
}
