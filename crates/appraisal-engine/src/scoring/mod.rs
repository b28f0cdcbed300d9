mod compose;
mod config;
pub mod domain;
mod period;
mod row;
mod section;
pub mod views;
mod weight;

pub use compose::{compose_score, score_soft_skill, BEHAVIORAL_SHARE, STRATEGIC_SHARE};
pub use config::AppraisalConfig;
pub use domain::{
    AppraisalScore, KpiCalcType, Month, MonthEntry, PerformanceRow, PerformanceSection,
    RowMetrics, RowMode, SectionTemplate, SoftSkillScore, TotalsOverride,
};
pub use period::{resolve_active_months, PeriodKind, ReportingPeriod};
pub use row::recalc_row;
pub(crate) use domain::default_par_weight;
pub(crate) use row::active_sums;
pub use section::{recalc_section, recalc_section_rows};
pub use weight::{resolve_weight, round_half_up, round_to};

use serde::{Deserialize, Serialize};
use tracing::info;
use views::{AppraisalSummary, SectionSubtotalEntry, SoftSkillEntry};

/// Inputs for one employee's appraisal over a reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
    #[serde(default)]
    pub sections: Vec<PerformanceSection>,
    #[serde(default)]
    pub soft_skills: Vec<SoftSkillScore>,
}

impl Appraisal {
    /// An appraisal with the three canonical sections and no rows.
    pub fn with_standard_sections(period: ReportingPeriod) -> Self {
        Self {
            period: Some(period),
            sections: PerformanceSection::standard_set(),
            soft_skills: Vec::new(),
        }
    }
}

/// Fully recalculated appraisal together with its composed score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraisalReport {
    pub period: ReportingPeriod,
    pub active_months: Vec<Month>,
    pub sections: Vec<PerformanceSection>,
    pub soft_skills: Vec<SoftSkillScore>,
    pub score: AppraisalScore,
}

impl AppraisalReport {
    pub fn summary(&self) -> AppraisalSummary {
        let sections = self
            .sections
            .iter()
            .map(|section| SectionSubtotalEntry {
                name: section.name.clone(),
                row_count: section.rows.len(),
                subtotal_weight: section.subtotal_weight,
                subtotal_weighted_average: section.subtotal_weighted_average,
            })
            .collect();

        let soft_skills = self
            .soft_skills
            .iter()
            .map(|skill| SoftSkillEntry {
                skill_name: skill.skill_name.clone(),
                rating: skill.rating,
                weight: skill.weight,
                weighted_score: skill.weighted_score,
            })
            .collect();

        AppraisalSummary {
            period_label: self.period.label(),
            active_months: self.active_months.clone(),
            sections,
            soft_skills,
            score: self.score,
        }
    }
}

/// Stateless evaluator running the full recalculation pipeline.
#[derive(Debug, Clone, Default)]
pub struct AppraisalEngine {
    config: AppraisalConfig,
}

impl AppraisalEngine {
    pub fn new(config: AppraisalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppraisalConfig {
        &self.config
    }

    /// Resolves the active months, recalculates every row and section,
    /// scores the soft skills and composes the overall rating.
    pub fn evaluate(&self, appraisal: &Appraisal) -> AppraisalReport {
        let period = appraisal.period.unwrap_or(self.config.default_period);
        let active_months = resolve_active_months(&period);

        let sections: Vec<PerformanceSection> = appraisal
            .sections
            .iter()
            .map(|section| recalc_section_rows(section, &active_months))
            .collect();
        let soft_skills: Vec<SoftSkillScore> =
            appraisal.soft_skills.iter().map(score_soft_skill).collect();
        let score = compose_score(&sections, &soft_skills);

        info!(
            period = %period.label(),
            sections = sections.len(),
            soft_skills = soft_skills.len(),
            overall_rating = score.overall_rating,
            "appraisal evaluated"
        );

        AppraisalReport {
            period,
            active_months,
            sections,
            soft_skills,
            score,
        }
    }
}
